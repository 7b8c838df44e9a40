//! Client configuration

use crate::{ClientError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Site origin, e.g. `http://localhost:3000`
    pub server_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Session-storage key holding this form's draft
    pub draft_key: String,
    /// Outcome message texts
    pub messages: Messages,
    /// Outcome messages disappear after this many milliseconds
    pub dismiss_after_ms: u64,
    /// Counter turns to warning below this many remaining characters
    pub counter_warn_below: i64,
    /// Page to visit after a successful submission
    pub confirmation: Option<Confirmation>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server_url: "http://localhost:3000".into(),
            timeout_secs: 30,
            draft_key: "intakeFormData".into(),
            messages: Messages::default(),
            dismiss_after_ms: 5_000,
            counter_warn_below: 50,
            confirmation: None,
        }
    }
}

impl ClientConfig {
    /// Load from file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ClientError::Config(format!("{}: {e}", path.as_ref().display())))?;
        serde_json::from_str(&content).map_err(|e| ClientError::Config(e.to_string()))
    }

    /// Save to file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let content =
            serde_json::to_string_pretty(self).map_err(|e| ClientError::Config(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| ClientError::Config(e.to_string()))
    }

    /// Intake endpoint URL
    pub fn intake_url(&self) -> String {
        format!("{}/api/intake", self.server_url.trim_end_matches('/'))
    }

    /// Product catalog URL
    pub fn products_url(&self) -> String {
        format!("{}/api/products", self.server_url.trim_end_matches('/'))
    }

    /// Request timeout
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Message lifetime
    pub fn dismiss_after(&self) -> Duration {
        Duration::from_millis(self.dismiss_after_ms)
    }
}

/// User-facing outcome messages
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Messages {
    /// Shown after the endpoint acknowledges
    pub success: String,
    /// Shown on network or server failure
    pub error: String,
    /// Shown when the submit-time validation fails
    pub invalid: String,
}

impl Default for Messages {
    fn default() -> Self {
        Self {
            success: "Thank you! Your intake form has been submitted successfully.".into(),
            error: "There was an error submitting your form. Please try again.".into(),
            invalid: "Please fill in all required fields correctly.".into(),
        }
    }
}

/// Navigation after success
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Confirmation {
    /// Target page
    pub url: String,
    /// Delay before navigating, in milliseconds
    #[serde(default = "default_confirmation_delay")]
    pub delay_ms: u64,
}

fn default_confirmation_delay() -> u64 {
    2_000
}
