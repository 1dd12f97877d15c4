//! Real HTTP client using `reqwest`.

use async_trait::async_trait;

use crate::errors::ToolError;
use crate::traits::{HttpClient, HttpResponse};

/// HTTP client backed by `reqwest`.
pub struct ReqwestHttpClient {
    client: reqwest::Client,
}

impl ReqwestHttpClient {
    /// Create a new HTTP client with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(std::time::Duration::from_secs(30))
                .user_agent("trek-orchestrator/0.1")
                .build()
                .unwrap_or_default(),
        }
    }
}

impl Default for ReqwestHttpClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpClient for ReqwestHttpClient {
    async fn get(
        &self,
        url: &str,
        query: &[(&str, String)],
        headers: &[(&str, &str)],
    ) -> Result<HttpResponse, ToolError> {
        let mut request = self.client.get(url).query(query);
        for (name, value) in headers {
            request = request.header(*name, *value);
        }

        let response = request
            .send()
            .await
            .map_err(|e| ToolError::http(format!("request failed: {e}")))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| ToolError::http(format!("failed to read response body: {e}")))?;

        Ok(HttpResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn creates_default_client() {
        let client = ReqwestHttpClient::new();
        // Smoke test — just verify construction doesn't panic
        drop(client);
    }

    #[test]
    fn default_impl() {
        let client = ReqwestHttpClient::default();
        drop(client);
    }
}
