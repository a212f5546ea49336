use std::sync::Arc;
use std::time::Duration;

use super::normalizer::ResumeText;
use crate::entity::{EntityBuckets, EntityCategory};
use crate::ner::{EntitySpan, NerError, NerModel, NerResult};

pub const EDUCATION_KEYWORDS: &[&str] = &[
    "b.tech",
    "m.tech",
    "bachelor",
    "master",
    "phd",
    "degree",
    "university",
    "college",
    "cgpa",
    "gpa",
];

pub const PROJECT_KEYWORDS: &[&str] = &["project", "built", "developed", "created", "designed"];

/// Project lines must be strictly longer than this many characters...
pub const PROJECT_MIN_CHARS: usize = 5;
/// ...and strictly shorter than this many.
pub const PROJECT_MAX_CHARS: usize = 250;

fn contains_any(line: &str, keywords: &[&str]) -> bool {
    let lower = line.to_lowercase();
    keywords.iter().any(|kw| lower.contains(kw))
}

#[must_use]
pub fn is_education_line(line: &str) -> bool {
    contains_any(line, EDUCATION_KEYWORDS)
}

#[must_use]
pub fn is_project_line(line: &str) -> bool {
    let len = line.chars().count();
    len > PROJECT_MIN_CHARS && len < PROJECT_MAX_CHARS && contains_any(line, PROJECT_KEYWORDS)
}

/// Splits on every line boundary a text extractor may emit, not just `\n`.
fn lines(text: &str) -> impl Iterator<Item = &str> {
    text.split(|c: char| {
        matches!(
            c,
            '\n' | '\r' | '\u{0b}' | '\u{0c}' | '\u{1c}' | '\u{1d}' | '\u{1e}' | '\u{85}'
                | '\u{2028}' | '\u{2029}'
        )
    })
}

/// Adds EDUCATION and PROJECTS lines from the raw document text.
pub fn classify_lines(raw: &str, buckets: &mut EntityBuckets) {
    for line in lines(raw).map(str::trim).filter(|l| !l.is_empty()) {
        if is_education_line(line) {
            buckets.insert(EntityCategory::Education, line);
        }
        if is_project_line(line) {
            buckets.insert(EntityCategory::Projects, line);
        }
    }
}

/// Routes model spans into buckets; labels without a category are dropped.
pub fn route_spans(spans: Vec<EntitySpan>, buckets: &mut EntityBuckets) {
    for span in spans {
        if let Some(category) = EntityCategory::from_ner_label(&span.label) {
            buckets.insert(category, span.text);
        }
    }
}

/// Hybrid classifier: NER spans for PERSON/ORG/DATE/LOCATION, line
/// heuristics for EDUCATION/PROJECTS.
#[derive(Clone)]
pub struct EntityClassifier {
    model: Arc<dyn NerModel>,
    timeout: Option<Duration>,
}

impl EntityClassifier {
    #[must_use]
    pub fn new(model: Arc<dyn NerModel>) -> Self {
        Self {
            model,
            timeout: None,
        }
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    #[must_use]
    pub fn model_name(&self) -> &str {
        self.model.name()
    }

    async fn analyze(&self, text: &str) -> NerResult<Vec<EntitySpan>> {
        match self.timeout {
            Some(limit) => tokio::time::timeout(limit, self.model.analyze(text))
                .await
                .map_err(|_| NerError::Timeout(limit))?,
            None => self.model.analyze(text).await,
        }
    }

    pub async fn classify(&self, text: &ResumeText) -> NerResult<EntityBuckets> {
        let mut buckets = EntityBuckets::new();

        let spans = self.analyze(text.normalized()).await?;
        tracing::debug!(model = self.model.name(), spans = spans.len(), "NER spans");
        route_spans(spans, &mut buckets);

        classify_lines(text.raw(), &mut buckets);

        Ok(buckets)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedModel(Vec<EntitySpan>);

    #[async_trait::async_trait]
    impl NerModel for FixedModel {
        fn name(&self) -> &str {
            "fixed"
        }

        async fn analyze(&self, _text: &str) -> NerResult<Vec<EntitySpan>> {
            Ok(self.0.clone())
        }
    }

    struct SlowModel;

    #[async_trait::async_trait]
    impl NerModel for SlowModel {
        fn name(&self) -> &str {
            "slow"
        }

        async fn analyze(&self, _text: &str) -> NerResult<Vec<EntitySpan>> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(Vec::new())
        }
    }

    struct BrokenModel;

    #[async_trait::async_trait]
    impl NerModel for BrokenModel {
        fn name(&self) -> &str {
            "broken"
        }

        async fn analyze(&self, _text: &str) -> NerResult<Vec<EntitySpan>> {
            Err(NerError::Failed("model crashed".into()))
        }
    }

    #[test]
    fn test_education_heuristic() {
        assert!(is_education_line(
            "B.Tech in Computer Science, XYZ University, CGPA 9.1"
        ));
        assert!(is_education_line("Master of Science"));
        assert!(!is_education_line("Senior engineer at Acme"));
    }

    #[test]
    fn test_project_heuristic_bounds() {
        let long = format!("developed {}", "x".repeat(290));
        assert_eq!(long.chars().count(), 300);
        assert!(!is_project_line(&long));
        assert!(!is_project_line("done"));
        assert!(!is_project_line("built"));
        assert!(is_project_line("Developed a chatbot using Python"));
        assert!(!is_project_line("Maintained legacy systems"));
    }

    #[test]
    fn test_project_length_is_strict() {
        let at_max = format!("built {}", "y".repeat(PROJECT_MAX_CHARS - 6));
        assert_eq!(at_max.chars().count(), PROJECT_MAX_CHARS);
        assert!(!is_project_line(&at_max));

        let below_max = format!("built {}", "y".repeat(PROJECT_MAX_CHARS - 7));
        assert!(is_project_line(&below_max));

        assert!(is_project_line("built!"));
    }

    #[test]
    fn test_classify_lines_trims_and_dedups() {
        let raw = "  B.Tech, XYZ University  \nDesigned a compiler\r\nB.Tech, XYZ University\nHobbies: chess";
        let mut buckets = EntityBuckets::new();
        classify_lines(raw, &mut buckets);

        assert_eq!(
            buckets.get(EntityCategory::Education),
            ["B.Tech, XYZ University"]
        );
        assert_eq!(buckets.get(EntityCategory::Projects), ["Designed a compiler"]);
    }

    #[test]
    fn test_line_in_both_buckets() {
        let mut buckets = EntityBuckets::new();
        classify_lines("Final year project at ABC College", &mut buckets);

        assert_eq!(buckets.get(EntityCategory::Education).len(), 1);
        assert_eq!(buckets.get(EntityCategory::Projects).len(), 1);
    }

    #[test]
    fn test_route_spans() {
        let mut buckets = EntityBuckets::new();
        route_spans(
            vec![
                EntitySpan::new("Jane Doe", "PERSON", 0, 8),
                EntitySpan::new("Acme", "ORG", 10, 14),
                EntitySpan::new("Paris", "GPE", 20, 25),
                EntitySpan::new("Alps", "LOC", 30, 34),
                EntitySpan::new("2021", "DATE", 40, 44),
                EntitySpan::new("$100", "MONEY", 50, 54),
                EntitySpan::new("Acme", "ORG", 60, 64),
            ],
            &mut buckets,
        );

        assert_eq!(buckets.get(EntityCategory::Person), ["Jane Doe"]);
        assert_eq!(buckets.get(EntityCategory::Org), ["Acme"]);
        assert_eq!(buckets.get(EntityCategory::Location), ["Paris", "Alps"]);
        assert_eq!(buckets.get(EntityCategory::Date), ["2021"]);
        assert_eq!(buckets.total(), 5);
    }

    #[tokio::test]
    async fn test_classify_combines_model_and_lines() {
        let model = FixedModel(vec![EntitySpan::new("Jane Doe", "PERSON", 0, 8)]);
        let classifier = EntityClassifier::new(Arc::new(model));

        let text = ResumeText::new("Jane Doe\nPhD, Some University\nBuilt a search engine");
        let buckets = classifier.classify(&text).await.unwrap();

        assert_eq!(buckets.get(EntityCategory::Person), ["Jane Doe"]);
        assert_eq!(
            buckets.get(EntityCategory::Education),
            ["PhD, Some University"]
        );
        assert_eq!(buckets.get(EntityCategory::Projects), ["Built a search engine"]);
    }

    #[tokio::test]
    async fn test_model_failure_propagates() {
        let classifier = EntityClassifier::new(Arc::new(BrokenModel));
        let result = classifier.classify(&ResumeText::new("anything")).await;

        assert!(matches!(result, Err(NerError::Failed(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout() {
        let classifier =
            EntityClassifier::new(Arc::new(SlowModel)).with_timeout(Duration::from_secs(1));
        let result = classifier.classify(&ResumeText::new("anything")).await;

        assert!(matches!(result, Err(NerError::Timeout(_))));
    }
}
