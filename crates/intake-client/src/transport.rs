//! Intake transport

use crate::config::ClientConfig;
use crate::{ClientError, Result};
use async_trait::async_trait;
use intake_forms::{IntakeAck, IntakeSubmission};
use tracing::{debug, warn};

/// Delivers one submission to the intake endpoint
#[async_trait]
pub trait IntakeTransport: Send + Sync {
    /// Send the payload and wait for the endpoint's acknowledgment
    async fn send(&self, submission: &IntakeSubmission) -> Result<IntakeAck>;
}

/// HTTP transport over `reqwest`
pub struct HttpTransport {
    client: reqwest::Client,
    intake_url: String,
    products_url: String,
}

impl HttpTransport {
    /// Build a transport with the configured timeout
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .user_agent(concat!("intake-client/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ClientError::Config(e.to_string()))?;

        Ok(Self {
            client,
            intake_url: config.intake_url(),
            products_url: config.products_url(),
        })
    }

    /// Fetch the product catalog as raw JSON
    pub async fn products(&self) -> Result<serde_json::Value> {
        let response = self
            .client
            .get(&self.products_url)
            .send()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(ClientError::Rejected {
                status: response.status().as_u16(),
            });
        }

        response
            .json()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))
    }
}

#[async_trait]
impl IntakeTransport for HttpTransport {
    async fn send(&self, submission: &IntakeSubmission) -> Result<IntakeAck> {
        debug!("POST {} ({} fields)", self.intake_url, submission.len());

        let response = self
            .client
            .post(&self.intake_url)
            .json(submission)
            .send()
            .await
            .map_err(|e| {
                warn!("Intake request failed: {}", e);
                ClientError::Network(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            warn!("Intake endpoint answered {}", status);
            return Err(ClientError::Rejected {
                status: status.as_u16(),
            });
        }

        let ack: IntakeAck = response
            .json()
            .await
            .map_err(|e| ClientError::Network(format!("unreadable acknowledgment: {e}")))?;

        if !ack.is_ok() {
            return Err(ClientError::Network(format!(
                "unexpected acknowledgment status: {}",
                ack.status
            )));
        }
        Ok(ack)
    }
}
