//! Remote-assisted evaluation.
//!
//! Wraps the local criterion evaluator with an optional remote completion
//! call. The remote verdict is used only when it arrives within the deadline
//! and passes validation; every other path ends in the local result. Nothing
//! here returns an error to the caller.

use crate::config::RemoteConfig;
use async_trait::async_trait;
use callsim_shared::evaluator::FALLBACK_TITLE;
use callsim_shared::verdict::{build_evaluation_prompt, SYSTEM_PROMPT};
use callsim_shared::{get_scenario, parse_remote_verdict, CriterionEvaluator, EvaluationResult, VerdictRejection};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Remote transport errors
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RemoteError {
    #[error("remote evaluator has no credentials configured")]
    NotConfigured,

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("HTTP status {0}")]
    Status(u16),

    #[error("remote returned empty content")]
    EmptyResponse,

    #[error("invalid JSON response: {0}")]
    InvalidJson(String),

    #[error("request timeout after {0} seconds")]
    Timeout(u64),
}

/// Why the local evaluator was used instead of the remote verdict
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FallbackReason {
    #[error("remote evaluation not configured")]
    NotConfigured,

    #[error("remote evaluation exceeded {0:?}")]
    Timeout(Duration),

    #[error("remote call failed: {0}")]
    Remote(RemoteError),

    #[error("remote verdict rejected: {0}")]
    Rejected(VerdictRejection),
}

/// Outcome of asking the remote service for a verdict
#[derive(Debug, Clone, PartialEq)]
pub enum RemoteVerdict {
    Accepted(EvaluationResult),
    Fallback(FallbackReason),
}

/// Chat completion transport
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    /// Send one system + user exchange and return the reply text
    async fn complete(&self, system: &str, user: &str) -> Result<String, RemoteError>;
}

/// Real backend over reqwest
pub struct HttpCompletionBackend {
    config: RemoteConfig,
    api_key: String,
    client: reqwest::Client,
}

impl HttpCompletionBackend {
    pub fn new(config: RemoteConfig) -> Result<Self, RemoteError> {
        let api_key = config.credentials().ok_or(RemoteError::NotConfigured)?.to_string();

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| RemoteError::Http(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { config, api_key, client })
    }

    /// Authenticated request for the configured API flavour
    fn request(&self, system: &str, user: &str) -> reqwest::RequestBuilder {
        let endpoint = self.config.endpoint.trim_end_matches('/');
        let builder = match self.config.group() {
            Some(group) => self
                .client
                .post(format!("{}/v1/text/chatcompletion_v2", endpoint))
                .query(&[("GroupId", group)])
                .json(&json!({
                    "model": self.config.group_model,
                    "messages": [
                        {"sender_type": "SYSTEM", "sender_name": "system", "text": system},
                        {"sender_type": "USER", "sender_name": "user", "text": user},
                    ],
                    "temperature": self.config.temperature,
                    "tokens_to_generate": self.config.max_tokens,
                })),
            None => self
                .client
                .post(format!("{}/v1/chat/completions", endpoint))
                .json(&json!({
                    "model": self.config.model,
                    "messages": [
                        {"role": "system", "content": system},
                        {"role": "user", "content": user},
                    ],
                    "temperature": self.config.temperature,
                    "max_tokens": self.config.max_tokens,
                })),
        };
        builder.bearer_auth(&self.api_key)
    }
}

#[async_trait]
impl CompletionBackend for HttpCompletionBackend {
    async fn complete(&self, system: &str, user: &str) -> Result<String, RemoteError> {
        let response = self
            .request(system, user)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    RemoteError::Timeout(self.config.timeout_secs)
                } else {
                    RemoteError::Http(format!("Request failed: {}", e))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            debug!("remote status {} body: {}", status, text);
            return Err(RemoteError::Status(status.as_u16()));
        }

        let response_json: Value = response
            .json()
            .await
            .map_err(|e| RemoteError::InvalidJson(format!("Failed to parse response: {}", e)))?;

        extract_content(&response_json).ok_or(RemoteError::EmptyResponse)
    }
}

/// `choices[0].message.content`, else `reply`; empty strings count as absent
pub fn extract_content(response: &Value) -> Option<String> {
    let chat = response
        .get("choices")
        .and_then(|v| v.get(0))
        .and_then(|v| v.get("message"))
        .and_then(|v| v.get("content"))
        .and_then(Value::as_str);
    let reply = response.get("reply").and_then(Value::as_str);

    chat.filter(|s| !s.is_empty())
        .or(reply.filter(|s| !s.is_empty()))
        .map(str::to_string)
}

/// Fake backend for testing
pub struct FakeCompletionBackend {
    responses: Mutex<Vec<Result<String, RemoteError>>>,
    call_count: Mutex<usize>,
    last_prompt: Mutex<Option<String>>,
    delay: Option<Duration>,
}

impl FakeCompletionBackend {
    /// Pop responses in order; the last one repeats
    pub fn new(responses: Vec<Result<String, RemoteError>>) -> Self {
        Self {
            responses: Mutex::new(responses),
            call_count: Mutex::new(0),
            last_prompt: Mutex::new(None),
            delay: None,
        }
    }

    pub fn always_reply(content: &str) -> Self {
        Self::new(vec![Ok(content.to_string())])
    }

    pub fn always_error(error: RemoteError) -> Self {
        Self::new(vec![Err(error)])
    }

    /// Sleep before answering
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }

    /// User prompt from the most recent call
    pub fn last_prompt(&self) -> Option<String> {
        self.last_prompt.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionBackend for FakeCompletionBackend {
    async fn complete(&self, _system: &str, user: &str) -> Result<String, RemoteError> {
        *self.call_count.lock().unwrap() += 1;
        *self.last_prompt.lock().unwrap() = Some(user.to_string());

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let mut responses = self.responses.lock().unwrap();
        match responses.len() {
            0 => Err(RemoteError::EmptyResponse),
            1 => responses[0].clone(),
            _ => responses.remove(0),
        }
    }
}

/// Local evaluator with an optional remote primary
pub struct RemoteAssistedEvaluator<'a> {
    local: CriterionEvaluator<'a>,
    backend: Option<Arc<dyn CompletionBackend>>,
    deadline: Duration,
}

impl<'a> RemoteAssistedEvaluator<'a> {
    pub fn new(local: CriterionEvaluator<'a>, backend: Arc<dyn CompletionBackend>, deadline: Duration) -> Self {
        Self {
            local,
            backend: Some(backend),
            deadline,
        }
    }

    /// Never contacts the network
    pub fn local_only(local: CriterionEvaluator<'a>) -> Self {
        Self {
            local,
            backend: None,
            deadline: Duration::from_secs(RemoteConfig::default().timeout_secs),
        }
    }

    /// HTTP backend when credentials are present, local only otherwise
    pub fn from_config(local: CriterionEvaluator<'a>, config: &RemoteConfig) -> Self {
        let deadline = Duration::from_secs(config.timeout_secs);
        if config.credentials().is_none() {
            debug!("remote evaluator disabled: no credentials");
            return Self { deadline, ..Self::local_only(local) };
        }

        match HttpCompletionBackend::new(config.clone()) {
            Ok(backend) => Self::new(local, Arc::new(backend), deadline),
            Err(e) => {
                warn!("remote evaluator unavailable: {}", e);
                Self { deadline, ..Self::local_only(local) }
            }
        }
    }

    pub fn has_backend(&self) -> bool {
        self.backend.is_some()
    }

    /// Ask the remote service only; no local fallback applied
    pub async fn request_verdict(&self, scenario_id: &str, transcript: &str) -> RemoteVerdict {
        let backend = match &self.backend {
            Some(backend) => backend,
            None => return RemoteVerdict::Fallback(FallbackReason::NotConfigured),
        };

        let title = get_scenario(scenario_id).map(|s| s.title).unwrap_or(FALLBACK_TITLE);
        let profile = self.local.table().get(scenario_id);
        let prompt = build_evaluation_prompt(title, profile, transcript);

        let content = match tokio::time::timeout(self.deadline, backend.complete(SYSTEM_PROMPT, &prompt)).await {
            Err(_) => return RemoteVerdict::Fallback(FallbackReason::Timeout(self.deadline)),
            Ok(Err(e)) => return RemoteVerdict::Fallback(FallbackReason::Remote(e)),
            Ok(Ok(content)) => content,
        };

        match parse_remote_verdict(&content) {
            Ok(result) => RemoteVerdict::Accepted(result),
            Err(rejection) => RemoteVerdict::Fallback(FallbackReason::Rejected(rejection)),
        }
    }

    /// Evaluate, reporting why the local path was taken when it was
    pub async fn evaluate_with_source(
        &self,
        scenario_id: &str,
        transcript: &str,
    ) -> (EvaluationResult, Option<FallbackReason>) {
        match self.request_verdict(scenario_id, transcript).await {
            RemoteVerdict::Accepted(result) => {
                info!("remote verdict accepted for {}", scenario_id);
                (result, None)
            }
            RemoteVerdict::Fallback(reason) => {
                if reason != FallbackReason::NotConfigured {
                    warn!("falling back to local evaluation for {}: {}", scenario_id, reason);
                }
                (self.local.evaluate(scenario_id, transcript), Some(reason))
            }
        }
    }

    pub async fn evaluate(&self, scenario_id: &str, transcript: &str) -> EvaluationResult {
        self.evaluate_with_source(scenario_id, transcript).await.0
    }
}
