use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Minimum number of digits a phone candidate must carry.
pub const MIN_PHONE_DIGITS: usize = 10;

/// Contact fields recognised purely by pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContactField {
    Email,
    Phone,
    Linkedin,
    Github,
}

impl ContactField {
    pub const ALL: [Self; 4] = [Self::Email, Self::Phone, Self::Linkedin, Self::Github];

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::Phone => "phone",
            Self::Linkedin => "linkedin",
            Self::Github => "github",
        }
    }

    #[must_use]
    pub const fn pattern(&self) -> &'static str {
        match self {
            Self::Email => r"[\w.-]+@[\w.-]+",
            Self::Phone => r"\+?\d[\d\s-]{8,}\d",
            Self::Linkedin => r"https?://(?:www\.)?linkedin\.com/in/[\w-]+",
            Self::Github => r"https?://(?:www\.)?github\.com/[\w-]+",
        }
    }

    fn accepts(self, candidate: &str) -> bool {
        match self {
            Self::Phone => {
                candidate.chars().filter(|c| c.is_numeric()).count() >= MIN_PHONE_DIGITS
            }
            Self::Email | Self::Linkedin | Self::Github => true,
        }
    }
}

impl std::fmt::Display for ContactField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

pub struct ExtractionPattern {
    pub field: ContactField,
    pub regex: Regex,
}

impl ExtractionPattern {
    pub fn new(field: ContactField) -> Result<Self, regex::Error> {
        Ok(Self {
            field,
            regex: Regex::new(field.pattern())?,
        })
    }

    /// All non-overlapping matches, left to right, duplicates kept.
    #[must_use]
    pub fn find_all(&self, text: &str) -> Vec<String> {
        self.regex
            .find_iter(text)
            .map(|m| m.as_str())
            .filter(|candidate| self.field.accepts(candidate))
            .map(String::from)
            .collect()
    }
}

static PATTERNS: LazyLock<[ExtractionPattern; 4]> = LazyLock::new(|| {
    ContactField::ALL.map(|field| {
        ExtractionPattern::new(field).expect("built-in contact patterns are valid")
    })
});

fn pattern_for(field: ContactField) -> &'static ExtractionPattern {
    &PATTERNS[field as usize]
}

#[must_use]
pub fn extract(field: ContactField, text: &str) -> Vec<String> {
    pattern_for(field).find_all(text)
}

#[must_use]
pub fn extract_emails(text: &str) -> Vec<String> {
    extract(ContactField::Email, text)
}

#[must_use]
pub fn extract_phones(text: &str) -> Vec<String> {
    extract(ContactField::Phone, text)
}

#[must_use]
pub fn extract_linkedin(text: &str) -> Vec<String> {
    extract(ContactField::Linkedin, text)
}

#[must_use]
pub fn extract_github(text: &str) -> Vec<String> {
    extract(ContactField::Github, text)
}

/// Output of the four pattern extractors over one document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactDetails {
    pub email: Vec<String>,
    pub phone: Vec<String>,
    pub linkedin: Vec<String>,
    pub github: Vec<String>,
}

impl ContactDetails {
    #[must_use]
    pub fn extract(text: &str) -> Self {
        Self {
            email: extract_emails(text),
            phone: extract_phones(text),
            linkedin: extract_linkedin(text),
            github: extract_github(text),
        }
    }

    #[must_use]
    pub fn get(&self, field: ContactField) -> &[String] {
        match field {
            ContactField::Email => &self.email,
            ContactField::Phone => &self.phone,
            ContactField::Linkedin => &self.linkedin,
            ContactField::Github => &self.github,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        ContactField::ALL.iter().all(|f| self.get(*f).is_empty())
    }
}
