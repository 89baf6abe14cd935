use std::future::Future;
use std::time::Duration;

use serde::Serialize;
use serde_json::Value;

use crate::config::AnalysisConfig;
use crate::error::ProviderError;

/// Anything that can turn a keyword into a raw search-results document.
pub trait SearchProvider: Send + Sync {
    fn search(&self, keyword: &str) -> impl Future<Output = Result<Value, ProviderError>> + Send;
}

#[derive(Debug, Serialize)]
struct SerperRequest<'a> {
    q: &'a str,
    gl: &'a str,
    hl: &'a str,
    num: u8,
}

/// Serper.dev Google SERP client. One POST per keyword, no retries.
#[derive(Debug, Clone)]
pub struct SerperClient {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    country: String,
    language: String,
    num_results: u8,
    timeout: Duration,
}

impl SerperClient {
    pub fn new(config: &AnalysisConfig) -> Result<Self, ProviderError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("serp-visibility/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        Ok(SerperClient {
            client,
            endpoint: config.endpoint.clone(),
            api_key: config.api_key.clone(),
            country: config.country.clone(),
            language: config.language.clone(),
            num_results: config.num_results,
            timeout: config.timeout,
        })
    }

    fn map_transport(&self, err: reqwest::Error) -> ProviderError {
        if err.is_timeout() {
            ProviderError::Timeout(self.timeout)
        } else {
            ProviderError::Network(err.to_string())
        }
    }
}

impl SearchProvider for SerperClient {
    async fn search(&self, keyword: &str) -> Result<Value, ProviderError> {
        let request = SerperRequest {
            q: keyword,
            gl: &self.country,
            hl: &self.language,
            num: self.num_results,
        };

        let resp = self
            .client
            .post(&self.endpoint)
            .header("X-API-KEY", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| self.map_transport(e))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ProviderError::Status {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = resp.bytes().await.map_err(|e| self.map_transport(e))?;
        tracing::debug!(keyword, bytes = body.len(), "received search payload");
        let payload: Value = serde_json::from_slice(&body)?;
        Ok(payload)
    }
}
