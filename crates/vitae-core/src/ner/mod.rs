//! Named-entity recognition collaborators.
//!
//! The classifier only sees the [`NerModel`] trait. A model is loaded once at
//! process start through [`load_model`]; a load failure means the process
//! must not start serving documents.

mod gazetteer;
mod remote;

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::{NerBackend, NerConfig};

pub use gazetteer::GazetteerModel;
pub use remote::RemoteNerModel;

#[derive(Debug, Error)]
pub enum NerError {
    #[error("NER model unavailable: {0}")]
    ModelUnavailable(String),
    #[error("NER analysis failed: {0}")]
    Failed(String),
    #[error("NER analysis timed out after {0:?}")]
    Timeout(Duration),
    #[error("NER service error: {0}")]
    Http(#[from] reqwest::Error),
}

pub type NerResult<T> = Result<T, NerError>;

/// A labelled span reported by a model. Offsets are byte offsets into the
/// analysed text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntitySpan {
    pub text: String,
    pub label: String,
    #[serde(default)]
    pub start: usize,
    #[serde(default)]
    pub end: usize,
}

impl EntitySpan {
    #[must_use]
    pub fn new(text: impl Into<String>, label: impl Into<String>, start: usize, end: usize) -> Self {
        Self {
            text: text.into(),
            label: label.into(),
            start,
            end,
        }
    }
}

#[async_trait::async_trait]
pub trait NerModel: Send + Sync {
    /// Short identifier reported by health checks and logs.
    fn name(&self) -> &str;

    async fn analyze(&self, text: &str) -> NerResult<Vec<EntitySpan>>;
}

/// Initializes the configured model.
///
/// This is the startup gate: callers should abort when it fails rather than
/// continue without entity extraction.
pub async fn load_model(config: &NerConfig) -> NerResult<Arc<dyn NerModel>> {
    let model: Arc<dyn NerModel> = match config.backend {
        NerBackend::Gazetteer => {
            let path = config.gazetteer_path();
            Arc::new(GazetteerModel::load(&path).await?)
        }
        NerBackend::Remote => {
            let endpoint = config.endpoint.clone().ok_or_else(|| {
                NerError::ModelUnavailable("remote backend requires an endpoint".into())
            })?;
            Arc::new(RemoteNerModel::connect(endpoint, config.timeout()).await?)
        }
    };

    tracing::info!(model = model.name(), "NER model loaded");
    Ok(model)
}
