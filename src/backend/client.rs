// src/backend/client.rs — HTTP client for one named backend endpoint

use std::time::Duration;

use tracing::warn;

use super::StreamFormat;
use crate::core::prompt;
use crate::core::types::GenerationContext;
use crate::infra::config::BackendConfig;
use crate::infra::errors::TandemError;

/// Timeout for the liveness probe. Generation requests are not bounded
/// here; slow models are the transport's problem.
const PROBE_TIMEOUT: Duration = Duration::from_secs(3);

/// Client for a single backend (solver or reviewer). Holds the endpoint,
/// the model to request, and the wire shape fixed at construction.
pub struct BackendClient {
    name: String,
    base_url: String,
    model: String,
    format: StreamFormat,
    client: reqwest::Client,
}

impl BackendClient {
    pub fn new(name: impl Into<String>, config: &BackendConfig) -> Self {
        Self {
            name: name.into(),
            base_url: config.url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            format: config.format,
            client: reqwest::Client::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn format(&self) -> StreamFormat {
        self.format
    }

    /// Probe the backend and confirm the configured model is served.
    /// Never fails: every problem is reported as `false` with a logged
    /// reason.
    pub async fn check_availability(&self) -> bool {
        let resp = match self
            .client
            .get(format!("{}/api/tags", self.base_url))
            .timeout(PROBE_TIMEOUT)
            .send()
            .await
        {
            Ok(r) => r,
            Err(e) => {
                warn!(backend = %self.name, "Cannot reach backend: {}", e);
                return false;
            }
        };

        if !resp.status().is_success() {
            warn!(backend = %self.name, status = %resp.status(), "Liveness probe rejected");
            return false;
        }

        let body: serde_json::Value = match resp.json().await {
            Ok(v) => v,
            Err(e) => {
                warn!(backend = %self.name, "Invalid probe response: {}", e);
                return false;
            }
        };

        let present = body["models"]
            .as_array()
            .map(|models| {
                models
                    .iter()
                    .filter_map(|m| m["name"].as_str())
                    .any(|name| name == self.model)
            })
            .unwrap_or(false);

        if !present {
            warn!(
                backend = %self.name,
                model = %self.model,
                "Configured model not served by backend"
            );
        }
        present
    }

    /// Request a solution for the given context. The prompt revises the
    /// prior solution when the context carries one, and generates fresh
    /// otherwise.
    pub async fn generate(
        &self,
        ctx: &GenerationContext,
        stream: bool,
    ) -> Result<reqwest::Response, TandemError> {
        self.send(prompt::solver_prompt(ctx), stream).await
    }

    /// Request a review of one round's solution.
    pub async fn review(
        &self,
        problem: &str,
        solution: &str,
        round: u8,
        stream: bool,
    ) -> Result<reqwest::Response, TandemError> {
        self.send(prompt::review_prompt(problem, solution, round), stream)
            .await
    }

    async fn send(&self, prompt: String, stream: bool) -> Result<reqwest::Response, TandemError> {
        let (path, body) = match self.format {
            StreamFormat::Chat => (
                "/api/chat",
                serde_json::json!({
                    "model": self.model,
                    "messages": [{ "role": "user", "content": prompt }],
                    "stream": stream,
                }),
            ),
            StreamFormat::Generate => (
                "/api/generate",
                serde_json::json!({
                    "model": self.model,
                    "prompt": prompt,
                    "stream": stream,
                }),
            ),
        };

        let response = self
            .client
            .post(format!("{}{}", self.base_url, path))
            .json(&body)
            .send()
            .await
            .map_err(|e| TandemError::Transport {
                backend: self.name.clone(),
                source: e,
            })?;

        // Non-success is fatal to the run; retry policy belongs to the
        // caller, not here.
        if !response.status().is_success() {
            let status = response.status().as_u16();
            let detail = response.text().await.unwrap_or_default();
            return Err(TandemError::Request {
                backend: self.name.clone(),
                status,
                detail,
            });
        }
        Ok(response)
    }
}
