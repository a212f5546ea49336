use std::collections::HashSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Skills recognised when no vocabulary is configured.
pub const DEFAULT_SKILLS: &[&str] = &[
    "python",
    "java",
    "c++",
    "c",
    "javascript",
    "html",
    "css",
    "machine learning",
    "deep learning",
    "nlp",
    "data science",
    "sql",
    "mongodb",
    "mysql",
    "tensorflow",
    "pytorch",
    "keras",
    "pandas",
    "numpy",
    "scikit-learn",
    "git",
    "docker",
    "linux",
    "react",
    "node.js",
    "flask",
    "fastapi",
    "ml",
    "dl",
    "ai",
    "dsa",
];

/// Ordered set of skill names. Built once at startup and shared read-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SkillVocabulary {
    entries: Vec<String>,
}

impl SkillVocabulary {
    /// Builds a vocabulary keeping the first occurrence of each entry.
    ///
    /// Entries are trimmed; blank entries and case-insensitive duplicates are
    /// dropped.
    #[must_use]
    pub fn new<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = HashSet::new();
        let entries = entries
            .into_iter()
            .map(|s| s.as_ref().trim().to_string())
            .filter(|s| !s.is_empty() && seen.insert(s.to_lowercase()))
            .collect();
        Self { entries }
    }

    #[must_use]
    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for SkillVocabulary {
    fn default() -> Self {
        Self::new(DEFAULT_SKILLS)
    }
}

impl<'de> Deserialize<'de> for SkillVocabulary {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let entries = Vec::<String>::deserialize(deserializer)?;
        Ok(Self::new(entries))
    }
}

/// How a vocabulary entry must occur in the text to count as present.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillMatchMode {
    /// Plain case-insensitive substring test; `ai` is found in `maintain`.
    #[default]
    Substring,
    /// The occurrence must not be flanked by letters, digits or underscores.
    WordBoundary,
}

impl SkillMatchMode {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Substring => "substring",
            Self::WordBoundary => "word_boundary",
        }
    }
}

impl std::fmt::Display for SkillMatchMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SkillMatchMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "substring" => Ok(Self::Substring),
            "word_boundary" | "word" => Ok(Self::WordBoundary),
            _ => Err(format!("unknown skill match mode: {s}")),
        }
    }
}

/// Case-insensitive substring matching of `text` against `vocabulary`.
///
/// Returns the vocabulary entries found, in vocabulary order and casing.
#[must_use]
pub fn match_skills(text: &str, vocabulary: &SkillVocabulary) -> Vec<String> {
    SkillMatcher::new(Arc::new(vocabulary.clone())).match_skills(text)
}

#[derive(Debug, Clone)]
pub struct SkillMatcher {
    vocabulary: Arc<SkillVocabulary>,
    mode: SkillMatchMode,
}

impl SkillMatcher {
    #[must_use]
    pub const fn new(vocabulary: Arc<SkillVocabulary>) -> Self {
        Self {
            vocabulary,
            mode: SkillMatchMode::Substring,
        }
    }

    #[must_use]
    pub fn with_mode(mut self, mode: SkillMatchMode) -> Self {
        self.mode = mode;
        self
    }

    #[must_use]
    pub fn vocabulary(&self) -> &SkillVocabulary {
        &self.vocabulary
    }

    #[must_use]
    pub const fn mode(&self) -> SkillMatchMode {
        self.mode
    }

    #[must_use]
    pub fn match_skills(&self, text: &str) -> Vec<String> {
        let haystack = text.to_lowercase();

        self.vocabulary
            .iter()
            .filter(|skill| {
                let needle = skill.to_lowercase();
                match self.mode {
                    SkillMatchMode::Substring => haystack.contains(&needle),
                    SkillMatchMode::WordBoundary => contains_word(&haystack, &needle),
                }
            })
            .map(String::from)
            .collect()
    }
}

impl Default for SkillMatcher {
    fn default() -> Self {
        Self::new(Arc::new(SkillVocabulary::default()))
    }
}

fn contains_word(haystack: &str, needle: &str) -> bool {
    haystack
        .match_indices(needle)
        .any(|(start, m)| is_word_bounded(haystack, start, start + m.len()))
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// True when `text[start..end]` is not glued to a word character on either side.
pub(crate) fn is_word_bounded(text: &str, start: usize, end: usize) -> bool {
    let before = text[..start].chars().next_back();
    let after = text[end..].chars().next();
    !before.is_some_and(is_word_char) && !after.is_some_and(is_word_char)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vocab(entries: &[&str]) -> SkillVocabulary {
        SkillVocabulary::new(entries)
    }

    #[test]
    fn test_vocabulary_order_and_casing() {
        let skills = match_skills(
            "Skilled in Python and SQL development",
            &vocab(&["python", "sql"]),
        );
        assert_eq!(skills, vec!["python", "sql"]);
    }

    #[test]
    fn test_result_follows_vocabulary_order() {
        let skills = match_skills("sql first, then python", &vocab(&["python", "sql"]));
        assert_eq!(skills, vec!["python", "sql"]);
    }

    #[test]
    fn test_substring_quirk_is_preserved() {
        let skills = match_skills("We maintain systems", &vocab(&["ai", "java"]));
        assert_eq!(skills, vec!["ai"]);
    }

    #[test]
    fn test_word_boundary_mode() {
        let matcher = SkillMatcher::new(Arc::new(vocab(&["ai", "c++", "node.js", "java"])))
            .with_mode(SkillMatchMode::WordBoundary);

        assert!(matcher.match_skills("We maintain systems").is_empty());
        assert_eq!(
            matcher.match_skills("Built AI tools in C++ and Node.js; no javascript"),
            vec!["ai", "c++", "node.js"]
        );
    }

    #[test]
    fn test_vocabulary_dedup_keeps_first() {
        let v = vocab(&["Python", " python ", "", "SQL"]);
        assert_eq!(v.entries(), ["Python", "SQL"]);
    }

    #[test]
    fn test_canonical_casing_from_vocabulary() {
        let skills = match_skills("i write PYTHON", &vocab(&["Python"]));
        assert_eq!(skills, vec!["Python"]);
    }

    #[test]
    fn test_default_vocabulary() {
        let v = SkillVocabulary::default();
        assert_eq!(v.len(), DEFAULT_SKILLS.len());
        assert_eq!(v.entries()[0], "python");
    }

    #[test]
    fn test_match_mode_from_str() {
        assert_eq!("substring".parse(), Ok(SkillMatchMode::Substring));
        assert_eq!("word-boundary".parse(), Ok(SkillMatchMode::WordBoundary));
        assert!("fuzzy".parse::<SkillMatchMode>().is_err());
    }

    #[test]
    fn test_word_bounded() {
        assert!(is_word_bounded("a ai b", 2, 4));
        assert!(!is_word_bounded("maintain", 1, 3));
        assert!(is_word_bounded("ai", 0, 2));
    }
}
