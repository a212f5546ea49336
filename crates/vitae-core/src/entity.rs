use std::collections::{HashMap, HashSet};

use serde::de::Error as _;
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Output categories of the entity classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EntityCategory {
    Person,
    Org,
    Date,
    Location,
    Education,
    Projects,
}

impl EntityCategory {
    /// Every category, in serialization order.
    pub const ALL: [Self; 6] = [
        Self::Person,
        Self::Org,
        Self::Date,
        Self::Location,
        Self::Education,
        Self::Projects,
    ];

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Person => "PERSON",
            Self::Org => "ORG",
            Self::Date => "DATE",
            Self::Location => "LOCATION",
            Self::Education => "EDUCATION",
            Self::Projects => "PROJECTS",
        }
    }

    /// Maps an NER tag to the bucket it feeds. `GPE` and `LOC` both land in
    /// `LOCATION`; tags outside the routed set yield `None`.
    #[must_use]
    pub fn from_ner_label(label: &str) -> Option<Self> {
        match label {
            "PERSON" => Some(Self::Person),
            "ORG" => Some(Self::Org),
            "DATE" => Some(Self::Date),
            "GPE" | "LOC" => Some(Self::Location),
            _ => None,
        }
    }

    const fn index(self) -> usize {
        self as usize
    }
}

impl std::fmt::Display for EntityCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for EntityCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| format!("unknown entity category: {s}"))
    }
}

/// Set of unique spans for one category, kept in first-seen order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityBucket {
    category: EntityCategory,
    items: Vec<String>,
    seen: HashSet<String>,
}

impl EntityBucket {
    #[must_use]
    pub fn new(category: EntityCategory) -> Self {
        Self {
            category,
            items: Vec::new(),
            seen: HashSet::new(),
        }
    }

    #[must_use]
    pub const fn category(&self) -> EntityCategory {
        self.category
    }

    /// Adds `text` unless an identical span is already present.
    pub fn insert(&mut self, text: impl Into<String>) -> bool {
        let text = text.into();
        if self.seen.contains(&text) {
            return false;
        }
        self.seen.insert(text.clone());
        self.items.push(text);
        true
    }

    #[must_use]
    pub fn items(&self) -> &[String] {
        &self.items
    }

    #[must_use]
    pub fn contains(&self, text: &str) -> bool {
        self.seen.contains(text)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// One bucket per [`EntityCategory`].
///
/// Serializes as a JSON object with all six category keys present, each an
/// array of strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityBuckets {
    buckets: [EntityBucket; 6],
}

impl EntityBuckets {
    #[must_use]
    pub fn new() -> Self {
        Self {
            buckets: EntityCategory::ALL.map(EntityBucket::new),
        }
    }

    pub fn insert(&mut self, category: EntityCategory, text: impl Into<String>) -> bool {
        self.buckets[category.index()].insert(text)
    }

    #[must_use]
    pub fn bucket(&self, category: EntityCategory) -> &EntityBucket {
        &self.buckets[category.index()]
    }

    #[must_use]
    pub fn get(&self, category: EntityCategory) -> &[String] {
        self.bucket(category).items()
    }

    pub fn iter(&self) -> impl Iterator<Item = &EntityBucket> {
        self.buckets.iter()
    }

    /// Folds `other` into `self`, keeping first-seen order.
    pub fn merge(&mut self, other: Self) {
        for (mine, theirs) in self.buckets.iter_mut().zip(other.buckets) {
            for item in theirs.items {
                mine.insert(item);
            }
        }
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.buckets.iter().map(EntityBucket::len).sum()
    }
}

impl Default for EntityBuckets {
    fn default() -> Self {
        Self::new()
    }
}

impl Serialize for EntityBuckets {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.buckets.len()))?;
        for bucket in &self.buckets {
            map.serialize_entry(bucket.category.as_str(), bucket.items())?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for EntityBuckets {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = HashMap::<String, Vec<String>>::deserialize(deserializer)?;
        let mut buckets = Self::new();
        for (key, items) in raw {
            let category: EntityCategory = key.parse().map_err(D::Error::custom)?;
            for item in items {
                buckets.insert(category, item);
            }
        }
        Ok(buckets)
    }
}
