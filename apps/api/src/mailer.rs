//! Outbound mail delivery through a transactional-mail HTTP API.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::AppError;

/// Delivery metadata returned to clients after a successful send.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MailInfo {
    pub message_id: String,
    pub accepted: Vec<String>,
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<MailInfo, AppError>;
}

#[derive(Debug, Serialize)]
struct SendRequest<'a> {
    from: &'a str,
    to: Vec<&'a str>,
    subject: &'a str,
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct SendResponse {
    id: String,
}

/// Production mailer posting to the configured mail API endpoint.
pub struct HttpMailer {
    client: Client,
    api_url: String,
    api_key: String,
    from: String,
}

impl HttpMailer {
    pub fn new(api_url: String, api_key: String, from: String) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(30))
                .build()
                .expect("Failed to build HTTP client"),
            api_url,
            api_key,
            from,
        }
    }
}

#[async_trait]
impl Mailer for HttpMailer {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<MailInfo, AppError> {
        let request = SendRequest {
            from: &self.from,
            to: vec![to],
            subject,
            text: body,
        };

        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| AppError::Mail(format!("mail API request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Mail(format!(
                "mail API returned {status}: {body}"
            )));
        }

        let sent: SendResponse = response
            .json()
            .await
            .map_err(|e| AppError::Mail(format!("malformed mail API response: {e}")))?;

        debug!(message_id = %sent.id, "mail accepted for delivery");

        Ok(MailInfo {
            message_id: sent.id,
            accepted: vec![to.to_string()],
        })
    }
}
