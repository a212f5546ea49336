use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use super::classifier::EntityClassifier;
use super::extractor::ContactDetails;
use super::normalizer::ResumeText;
use super::reader::{CompositeReader, DocumentFormat, RawDocument, Reader};
use crate::config::Config;
use crate::error::Result;
use crate::ner::{load_model, NerModel};
use crate::resume::ParseResult;
use crate::skills::{SkillMatcher, SkillVocabulary};

/// Turns résumé text or documents into a [`ParseResult`].
///
/// Construction requires an already loaded NER model, so a parser can only
/// exist once startup has succeeded.
pub struct ResumeParser {
    reader: Box<dyn Reader>,
    skills: SkillMatcher,
    classifier: EntityClassifier,
}

impl ResumeParser {
    #[must_use]
    pub fn new(model: Arc<dyn NerModel>) -> Self {
        Self {
            reader: Box::new(CompositeReader::default()),
            skills: SkillMatcher::default(),
            classifier: EntityClassifier::new(model),
        }
    }

    /// Loads the configured NER model and builds a parser around it.
    pub async fn from_config(config: &Config) -> Result<Self> {
        let model = load_model(&config.ner).await?;
        Ok(Self::new(model)
            .with_skills(config.skills.matcher())
            .with_ner_timeout(config.ner.timeout()))
    }

    #[must_use]
    pub fn with_reader(mut self, reader: Box<dyn Reader>) -> Self {
        self.reader = reader;
        self
    }

    #[must_use]
    pub fn with_skills(mut self, skills: SkillMatcher) -> Self {
        self.skills = skills;
        self
    }

    #[must_use]
    pub fn with_vocabulary(mut self, vocabulary: SkillVocabulary) -> Self {
        self.skills = SkillMatcher::new(Arc::new(vocabulary)).with_mode(self.skills.mode());
        self
    }

    #[must_use]
    pub fn with_ner_timeout(mut self, timeout: std::time::Duration) -> Self {
        self.classifier = self.classifier.with_timeout(timeout);
        self
    }

    #[must_use]
    pub const fn skills(&self) -> &SkillMatcher {
        &self.skills
    }

    #[must_use]
    pub fn model_name(&self) -> &str {
        self.classifier.model_name()
    }

    #[must_use]
    pub fn can_read(&self, format: DocumentFormat) -> bool {
        self.reader.can_read(format)
    }

    /// Runs every extractor over `raw_text`.
    ///
    /// The extractors share the normalized text read-only and are joined
    /// before the result is assembled. The first error wins; there is no
    /// partial result.
    pub async fn parse(&self, raw_text: &str) -> Result<ParseResult> {
        let start = Instant::now();
        let text = ResumeText::new(raw_text);
        let normalized = text.normalized().as_str();

        let (entities, contacts, skills) = tokio::join!(
            self.classifier.classify(&text),
            async { ContactDetails::extract(normalized) },
            async { self.skills.match_skills(normalized) },
        );
        let entities = entities?;

        tracing::debug!(
            chars = normalized.len(),
            emails = contacts.email.len(),
            phones = contacts.phone.len(),
            skills = skills.len(),
            entities = entities.total(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Parsed resume"
        );

        Ok(ParseResult::new(contacts, skills, entities))
    }

    pub async fn parse_document(&self, document: RawDocument) -> Result<ParseResult> {
        let format = document.format;
        let text = self.reader.read_document(document).await?;
        tracing::debug!(%format, chars = text.len(), "Read document");
        self.parse(&text).await
    }

    pub async fn parse_bytes(&self, data: &[u8], format: DocumentFormat) -> Result<ParseResult> {
        let text = self.reader.read_bytes(data, format).await?;
        self.parse(&text).await
    }

    pub async fn parse_file(&self, path: &Path) -> Result<ParseResult> {
        let text = self.reader.read_file(path).await?;
        tracing::debug!(path = %path.display(), chars = text.len(), "Read document");
        self.parse(&text).await
    }
}
