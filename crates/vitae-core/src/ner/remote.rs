use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use url::Url;

use super::{EntitySpan, NerError, NerModel, NerResult};

#[derive(Debug, Serialize)]
struct AnalyzeRequest<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct AnalyzeResponse {
    #[serde(default)]
    ents: Vec<EntitySpan>,
}

/// Client for an NER model served over HTTP.
///
/// The service receives `{"text": ...}` and answers with
/// `{"ents": [{"text", "label", "start", "end"}, ...]}`.
pub struct RemoteNerModel {
    client: Client,
    endpoint: Url,
    name: String,
}

impl RemoteNerModel {
    /// Builds the client and probes the endpoint once.
    ///
    /// Any failure of the probe is reported as `ModelUnavailable` so startup
    /// can refuse to continue.
    pub async fn connect(endpoint: Url, timeout: Duration) -> NerResult<Self> {
        let model = Self::new(endpoint, timeout)?;

        model.request("").await.map_err(|e| {
            NerError::ModelUnavailable(format!("NER service at {} did not answer: {e}", model.endpoint))
        })?;

        Ok(model)
    }

    pub fn new(endpoint: Url, timeout: Duration) -> NerResult<Self> {
        if !matches!(endpoint.scheme(), "http" | "https") {
            return Err(NerError::ModelUnavailable(format!(
                "unsupported NER endpoint scheme: {}",
                endpoint.scheme()
            )));
        }

        let client = Client::builder()
            .connect_timeout(timeout)
            .timeout(timeout)
            .build()
            .map_err(|e| NerError::ModelUnavailable(e.to_string()))?;

        let name = format!("remote:{}", endpoint.host_str().unwrap_or("unknown"));

        Ok(Self {
            client,
            endpoint,
            name,
        })
    }

    #[must_use]
    pub const fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    async fn request(&self, text: &str) -> NerResult<Vec<EntitySpan>> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .json(&AnalyzeRequest { text })
            .send()
            .await?
            .error_for_status()?;

        let body: AnalyzeResponse = response.json().await?;
        Ok(body.ents)
    }
}

#[async_trait::async_trait]
impl NerModel for RemoteNerModel {
    fn name(&self) -> &str {
        &self.name
    }

    async fn analyze(&self, text: &str) -> NerResult<Vec<EntitySpan>> {
        let spans = self.request(text).await?;
        tracing::debug!(endpoint = %self.endpoint, spans = spans.len(), "Remote NER analysis");
        Ok(spans)
    }
}
