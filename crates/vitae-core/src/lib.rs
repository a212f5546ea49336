pub mod config;
pub mod entity;
pub mod error;
pub mod ingest;
pub mod ner;
pub mod resume;
pub mod skills;

pub use config::{Config, ConfigError, NerBackend, NerConfig, SkillsConfig};
pub use entity::{EntityBucket, EntityBuckets, EntityCategory};
pub use error::{Error, Result};
pub use ingest::{ContactDetails, DocumentFormat, RawDocument, ResumeParser, ResumeText};
pub use ner::{load_model, EntitySpan, GazetteerModel, NerError, NerModel, RemoteNerModel};
pub use resume::{ParseResult, EXPORT_FILE_NAME};
pub use skills::{match_skills, SkillMatchMode, SkillMatcher, SkillVocabulary, DEFAULT_SKILLS};
