use std::collections::BTreeMap;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use super::{EntitySpan, NerError, NerModel, NerResult};
use crate::skills::is_word_bounded;

const MONTH: &str = r"(?:jan(?:uary)?|feb(?:ruary)?|mar(?:ch)?|apr(?:il)?|may|june?|july?|aug(?:ust)?|sep(?:t(?:ember)?)?|oct(?:ober)?|nov(?:ember)?|dec(?:ember)?)\.?";
const YEAR: &str = r"(?:19|20)\d{2}";
const OPEN_END: &str = r"(?:present|current|now|today)";

static DATE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    let point = format!(r"(?:{MONTH}\s+{YEAR}|\d{{1,2}}/{YEAR}|{YEAR})");
    let pattern =
        format!(r"(?i)\b{point}(?:\s*(?:-|–|—|to|until)\s*(?:{point}|{OPEN_END}))?\b");
    Regex::new(&pattern).expect("date pattern is valid")
});

struct LabelMatcher {
    label: String,
    regex: Regex,
}

impl LabelMatcher {
    fn new(label: &str, phrases: &[String]) -> NerResult<Option<Self>> {
        let mut phrases: Vec<&str> = phrases
            .iter()
            .map(|p| p.trim())
            .filter(|p| !p.is_empty())
            .collect();

        if phrases.is_empty() {
            return Ok(None);
        }

        // Longest first so "Acme Corp" wins over "Acme".
        phrases.sort_by_key(|p| std::cmp::Reverse(p.len()));

        let alternation = phrases
            .iter()
            .map(|p| regex::escape(p))
            .collect::<Vec<_>>()
            .join("|");

        let regex = Regex::new(&format!("(?i)(?:{alternation})")).map_err(|e| {
            NerError::ModelUnavailable(format!("gazetteer label {label} is unusable: {e}"))
        })?;

        Ok(Some(Self {
            label: label.to_string(),
            regex,
        }))
    }
}

/// Dictionary-driven recogniser.
///
/// Loaded from a JSON object mapping NER labels (`PERSON`, `ORG`, `GPE`,
/// `LOC`, ...) to phrase lists. Phrases match case-insensitively on word
/// boundaries. Dates are recognised by pattern and reported as `DATE`.
pub struct GazetteerModel {
    name: String,
    matchers: Vec<LabelMatcher>,
}

impl GazetteerModel {
    pub async fn load(path: &Path) -> NerResult<Self> {
        let contents = tokio::fs::read_to_string(path).await.map_err(|e| {
            NerError::ModelUnavailable(format!("cannot read gazetteer {}: {e}", path.display()))
        })?;

        let entries: BTreeMap<String, Vec<String>> =
            serde_json::from_str(&contents).map_err(|e| {
                NerError::ModelUnavailable(format!("invalid gazetteer {}: {e}", path.display()))
            })?;

        let model = Self::from_entries(entries)?;
        tracing::debug!(
            path = %path.display(),
            labels = model.matchers.len(),
            "Loaded gazetteer"
        );
        Ok(model)
    }

    pub fn from_entries(entries: BTreeMap<String, Vec<String>>) -> NerResult<Self> {
        let mut matchers = Vec::new();
        for (label, phrases) in &entries {
            if let Some(matcher) = LabelMatcher::new(label.trim(), phrases)? {
                matchers.push(matcher);
            }
        }

        if matchers.is_empty() {
            return Err(NerError::ModelUnavailable(
                "gazetteer contains no entries".into(),
            ));
        }

        Ok(Self {
            name: "gazetteer".into(),
            matchers,
        })
    }

    fn find_dates(text: &str, spans: &mut Vec<EntitySpan>) {
        for m in DATE_PATTERN.find_iter(text) {
            spans.push(EntitySpan::new(m.as_str(), "DATE", m.start(), m.end()));
        }
    }
}

#[async_trait::async_trait]
impl NerModel for GazetteerModel {
    fn name(&self) -> &str {
        &self.name
    }

    async fn analyze(&self, text: &str) -> NerResult<Vec<EntitySpan>> {
        let mut spans = Vec::new();

        for matcher in &self.matchers {
            for m in matcher.regex.find_iter(text) {
                if is_word_bounded(text, m.start(), m.end()) {
                    spans.push(EntitySpan::new(
                        m.as_str(),
                        matcher.label.clone(),
                        m.start(),
                        m.end(),
                    ));
                }
            }
        }

        Self::find_dates(text, &mut spans);
        spans.sort_by_key(|s| (s.start, s.end));

        Ok(spans)
    }
}
