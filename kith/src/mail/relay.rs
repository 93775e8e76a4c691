//! HTTP mail-relay mailer
//!
//! Posts a JSON payload to a configured relay endpoint that owns the
//! actual SMTP/provider integration. Supports custom headers, a request
//! timeout and bounded exponential-backoff retries.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use tracing::{debug, warn};

use super::Mailer;

/// Retry policy for relay requests
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Maximum number of retry attempts
    pub max_retries: u32,
    /// Initial backoff duration in milliseconds
    pub initial_backoff_ms: u64,
    /// Multiplier for exponential backoff
    pub backoff_multiplier: f32,
    /// Maximum backoff duration in milliseconds
    pub max_backoff_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_backoff_ms: 100,
            backoff_multiplier: 2.0,
            max_backoff_ms: 10000,
        }
    }
}

impl RetryPolicy {
    fn backoff_duration(&self, attempt: u32) -> Duration {
        let backoff_ms =
            (self.initial_backoff_ms as f32 * self.backoff_multiplier.powi(attempt as i32)) as u64;
        Duration::from_millis(backoff_ms.min(self.max_backoff_ms))
    }
}

/// Mailer that delivers through an HTTP relay endpoint
#[derive(Debug, Clone)]
pub struct HttpMailer {
    /// The relay endpoint URL
    pub url: String,
    /// Custom headers to include in requests
    pub headers: HashMap<String, String>,
    /// Request timeout duration
    pub timeout: Duration,
    /// Retry policy for failed requests
    pub retry_policy: RetryPolicy,
}

impl HttpMailer {
    /// Create a mailer posting to the given relay URL
    pub fn new(url: String) -> Self {
        Self {
            url,
            headers: HashMap::new(),
            timeout: Duration::from_secs(10),
            retry_policy: RetryPolicy::default(),
        }
    }

    /// Add a custom header
    pub fn with_header(mut self, key: String, value: String) -> Self {
        self.headers.insert(key, value);
        self
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the retry policy
    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry_policy = policy;
        self
    }

    async fn send_with_retry(&self, payload: serde_json::Value) -> Result<(), String> {
        let client = reqwest::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|e| format!("Failed to create HTTP client: {}", e))?;

        let mut last_error: Option<String> = None;

        for attempt in 0..=self.retry_policy.max_retries {
            match self.send_request(&client, &payload).await {
                Ok(_) => {
                    debug!(
                        url = %self.url,
                        attempts = attempt + 1,
                        "mail relay request succeeded"
                    );
                    return Ok(());
                }
                Err(e) => {
                    last_error = Some(e.clone());
                    if attempt < self.retry_policy.max_retries {
                        let backoff = self.retry_policy.backoff_duration(attempt);
                        warn!(
                            attempt = attempt + 1,
                            max = self.retry_policy.max_retries + 1,
                            backoff_ms = backoff.as_millis() as u64,
                            error = %e,
                            "mail relay request failed, retrying"
                        );
                        tokio::time::sleep(backoff).await;
                    } else {
                        warn!(
                            attempts = self.retry_policy.max_retries + 1,
                            url = %self.url,
                            error = %e,
                            "mail relay request failed after all attempts"
                        );
                    }
                }
            }
        }

        Err(last_error.unwrap_or_else(|| "Unknown error".to_string()))
    }

    async fn send_request(
        &self,
        client: &reqwest::Client,
        payload: &serde_json::Value,
    ) -> Result<(), String> {
        let mut request_builder = client.post(&self.url).json(payload);

        for (key, value) in &self.headers {
            request_builder = request_builder.header(key, value);
        }

        let response = request_builder
            .header("Content-Type", "application/json")
            .header("User-Agent", concat!("Kith-Mailer/", env!("CARGO_PKG_VERSION")))
            .send()
            .await
            .map_err(|e| format!("HTTP request failed: {}", e))?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(format!(
                "HTTP error: {} {}",
                response.status().as_u16(),
                response.status().canonical_reason().unwrap_or("Unknown")
            ))
        }
    }
}

#[async_trait]
impl Mailer for HttpMailer {
    async fn send_verification_email(
        &self,
        to: &str,
        name: &str,
        url: &str,
    ) -> Result<(), String> {
        let payload = serde_json::json!({
            "template": "verify_email",
            "timestamp": Utc::now().to_rfc3339(),
            "to": to,
            "subject": "Verify your email address",
            "data": {
                "name": name,
                "activation_url": url,
            },
        });
        self.send_with_retry(payload).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mailer_defaults() {
        let mailer = HttpMailer::new("http://relay.example.com/send".to_string());
        assert_eq!(mailer.url, "http://relay.example.com/send");
        assert_eq!(mailer.timeout, Duration::from_secs(10));
        assert_eq!(mailer.retry_policy.max_retries, 3);
    }

    #[test]
    fn mailer_builders() {
        let mailer = HttpMailer::new("http://relay.example.com/send".to_string())
            .with_header("Authorization".to_string(), "Bearer token".to_string())
            .with_timeout(Duration::from_secs(30));
        assert_eq!(
            mailer.headers.get("Authorization"),
            Some(&"Bearer token".to_string())
        );
        assert_eq!(mailer.timeout, Duration::from_secs(30));
    }

    #[test]
    fn backoff_grows_and_caps() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.backoff_duration(0).as_millis(), 100);
        assert_eq!(policy.backoff_duration(1).as_millis(), 200);
        assert_eq!(policy.backoff_duration(2).as_millis(), 400);
        assert_eq!(policy.backoff_duration(10).as_millis(), 10000);
    }
}
