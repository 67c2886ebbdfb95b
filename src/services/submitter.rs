use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::config::BookingSettings;
use crate::errors::ToolError;
use crate::models::BookingPayload;

pub const APPOINTMENTS_PATH: &str = "/api/v1/appointments";

/// A response that made it back from the scheduling API, whatever its status.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpReply {
    pub status: u16,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TransportError {
    #[error("request timed out")]
    Timeout,

    #[error("connection failed: {0}")]
    Connect(String),

    /// The status line arrived but the body could not be read. The server may
    /// already have stored the booking.
    #[error("response body unreadable (HTTP {status}): {message}")]
    Body { status: u16, message: String },
}

impl TransportError {
    /// Only failures where no response came back are safe to re-post.
    pub fn is_retryable(&self) -> bool {
        matches!(self, TransportError::Timeout | TransportError::Connect(_))
    }
}

#[async_trait]
pub trait Transport: Send + Sync {
    async fn post_json(
        &self,
        url: &str,
        payload: &BookingPayload,
        timeout: Duration,
    ) -> Result<HttpReply, TransportError>;
}

#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    /// Reuse a client (and its connection pool) owned by the host.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl Default for ReqwestTransport {
    fn default() -> Self {
        Self::new()
    }
}

fn map_reqwest_error(e: reqwest::Error) -> TransportError {
    if e.is_timeout() {
        TransportError::Timeout
    } else {
        TransportError::Connect(e.to_string())
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn post_json(
        &self,
        url: &str,
        payload: &BookingPayload,
        timeout: Duration,
    ) -> Result<HttpReply, TransportError> {
        let resp = self
            .client
            .post(url)
            .timeout(timeout)
            .json(payload)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = resp.status().as_u16();
        let body = resp.text().await.map_err(|e| TransportError::Body {
            status,
            message: e.to_string(),
        })?;

        Ok(HttpReply { status, body })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub backoff: Duration,
    pub timeout: Duration,
}

impl RetryPolicy {
    pub fn from_settings(settings: &BookingSettings) -> Self {
        Self {
            max_attempts: settings.max_attempts.max(1),
            backoff: settings.backoff,
            timeout: settings.request_timeout,
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 2,
            backoff: Duration::from_secs(1),
            timeout: Duration::from_secs(10),
        }
    }
}

/// Builds `{base}/api/v1/appointments`.
pub fn appointments_url(base_url: Option<&str>) -> Result<String, ToolError> {
    let base = base_url
        .map(str::trim)
        .filter(|b| !b.is_empty())
        .ok_or_else(|| {
            ToolError::Configuration("appointments API base URL is not set".to_string())
        })?;
    Ok(format!("{}{APPOINTMENTS_PATH}", base.trim_end_matches('/')))
}

pub struct BookingSubmitter {
    transport: Arc<dyn Transport>,
    sleeper: Arc<dyn Sleeper>,
    policy: RetryPolicy,
}

impl BookingSubmitter {
    pub fn new(transport: Arc<dyn Transport>, sleeper: Arc<dyn Sleeper>, policy: RetryPolicy) -> Self {
        Self {
            transport,
            sleeper,
            policy,
        }
    }

    /// Posts the payload, retrying only when no response came back. Any
    /// response with status >= 400 is returned as a rejection straight away.
    pub async fn submit(&self, url: &str, payload: &BookingPayload) -> Result<String, ToolError> {
        let max_attempts = self.policy.max_attempts.max(1);
        let mut last_error = None;

        for attempt in 1..=max_attempts {
            match self
                .transport
                .post_json(url, payload, self.policy.timeout)
                .await
            {
                Ok(reply) if reply.status >= 400 => {
                    tracing::error!(
                        attempt,
                        status = reply.status,
                        body = %reply.body,
                        "scheduling API rejected booking"
                    );
                    return Err(ToolError::RemoteRejection {
                        status: reply.status,
                        body: reply.body,
                    });
                }
                Ok(reply) => {
                    tracing::info!(attempt, status = reply.status, "booking submitted");
                    return Ok(reply.body);
                }
                Err(e) if !e.is_retryable() => {
                    tracing::error!(attempt, error = %e, "booking submission failed after response");
                    return Err(ToolError::Network {
                        attempts: attempt,
                        message: e.to_string(),
                    });
                }
                Err(e) => {
                    tracing::warn!(attempt, max_attempts, error = %e, "booking submission failed");
                    last_error = Some(e);
                    if attempt < max_attempts {
                        self.sleeper.sleep(self.policy.backoff).await;
                    }
                }
            }
        }

        let message = last_error.map(|e| e.to_string()).unwrap_or_default();
        tracing::error!(attempts = max_attempts, error = %message, "giving up on booking submission");
        Err(ToolError::Network {
            attempts: max_attempts,
            message,
        })
    }
}
