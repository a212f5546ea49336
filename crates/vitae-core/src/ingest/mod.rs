mod classifier;
mod extractor;
mod normalizer;
mod pipeline;
mod reader;

pub use classifier::{
    classify_lines, is_education_line, is_project_line, route_spans, EntityClassifier,
    EDUCATION_KEYWORDS, PROJECT_KEYWORDS, PROJECT_MAX_CHARS, PROJECT_MIN_CHARS,
};
pub use extractor::{
    extract, extract_emails, extract_github, extract_linkedin, extract_phones, ContactDetails,
    ContactField, ExtractionPattern, MIN_PHONE_DIGITS,
};
pub use normalizer::{is_separator, normalize, NormalizedText, ResumeText};
pub use pipeline::ResumeParser;
pub use reader::{
    CompositeReader, DocumentFormat, DocxReader, PdfReader, PlainTextReader, RawDocument,
    ReadError, ReadResult, Reader,
};
