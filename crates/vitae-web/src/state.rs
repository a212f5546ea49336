use std::sync::Arc;

use vitae_core::ResumeParser;

use crate::config::ServerConfig;

/// Application state shared across all requests
///
/// The parser is built once at startup and only read afterwards.
#[derive(Clone)]
pub struct AppState {
    pub parser: Arc<ResumeParser>,
    pub config: ServerConfig,
}

impl AppState {
    pub fn new(parser: ResumeParser, config: ServerConfig) -> Self {
        Self {
            parser: Arc::new(parser),
            config,
        }
    }
}
