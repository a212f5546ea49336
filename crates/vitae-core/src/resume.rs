use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::entity::EntityBuckets;
use crate::ingest::ContactDetails;

/// File name used when a result is exported into a directory.
pub const EXPORT_FILE_NAME: &str = "parsed_resume.json";

/// Structured summary of one résumé.
///
/// Every key is always present in the JSON form, empty sequences included.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseResult {
    pub email: Vec<String>,
    pub phone: Vec<String>,
    pub linkedin: Vec<String>,
    pub github: Vec<String>,
    pub skills: Vec<String>,
    pub entities: EntityBuckets,
}

impl ParseResult {
    #[must_use]
    pub fn new(contacts: ContactDetails, skills: Vec<String>, entities: EntityBuckets) -> Self {
        let ContactDetails {
            email,
            phone,
            linkedin,
            github,
        } = contacts;

        Self {
            email,
            phone,
            linkedin,
            github,
            skills,
            entities,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Two-space indented JSON, the format offered for download.
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Writes the pretty JSON form to `target`.
    ///
    /// When `target` is an existing directory the file is created inside it as
    /// [`EXPORT_FILE_NAME`]. Returns the path written.
    pub async fn export(&self, target: &Path) -> crate::Result<PathBuf> {
        let path = if tokio::fs::metadata(target)
            .await
            .is_ok_and(|m| m.is_dir())
        {
            target.join(EXPORT_FILE_NAME)
        } else {
            target.to_path_buf()
        };

        let mut json = self.to_json_pretty()?;
        json.push('\n');
        tokio::fs::write(&path, json).await?;

        tracing::debug!(path = %path.display(), "Exported parse result");
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::EntityCategory;

    #[test]
    fn test_empty_result_has_every_key() {
        let json = serde_json::to_value(ParseResult::default()).unwrap();
        let obj = json.as_object().unwrap();

        let keys: Vec<&str> = obj.keys().map(String::as_str).collect();
        for key in ["email", "phone", "linkedin", "github", "skills", "entities"] {
            assert!(keys.contains(&key), "missing {key}");
        }
        assert_eq!(obj.len(), 6);
        assert_eq!(json["email"], serde_json::json!([]));
        assert_eq!(json["entities"]["EDUCATION"], serde_json::json!([]));
    }

    #[test]
    fn test_json_round_trip_keeps_entities() {
        let mut entities = EntityBuckets::new();
        entities.insert(EntityCategory::Projects, "Built a compiler");
        let result = ParseResult {
            skills: vec!["rust".into()],
            entities,
            ..ParseResult::default()
        };

        let back: ParseResult = serde_json::from_str(&result.to_json().unwrap()).unwrap();
        assert_eq!(back, result);
    }

    #[tokio::test]
    async fn test_export_into_directory() {
        let dir = tempfile::tempdir().unwrap();
        let result = ParseResult {
            email: vec!["jane@example.com".into()],
            ..ParseResult::default()
        };

        let path = result.export(dir.path()).await.unwrap();
        assert_eq!(path, dir.path().join(EXPORT_FILE_NAME));

        let written = std::fs::read_to_string(path).unwrap();
        assert!(written.contains("\n  \"email\": [\n    \"jane@example.com\"\n  ]"));
    }

    #[tokio::test]
    async fn test_export_to_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("out.json");

        let path = ParseResult::default().export(&target).await.unwrap();
        assert_eq!(path, target);
        assert!(target.exists());
    }
}
