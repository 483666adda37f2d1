//! Client configuration.

use std::time::Duration;

use derive_builder::Builder;
use serde::{Deserialize, Serialize};

/// Namenode HTTP address used when none is given.
pub const DEFAULT_URL: &str = "http://localhost:50070";

/// Connection settings for a [`crate::WebHdfsClient`].
#[derive(Debug, Clone, Builder, Serialize, Deserialize)]
#[builder(setter(into), build_fn(validate = "Self::validate"))]
pub struct ClientConfig {
    /// Namenode HTTP address, e.g. `http://namenode:50070`.
    #[builder(default = "DEFAULT_URL.to_string()")]
    pub base_url: String,

    /// Value sent as `user.name` (simple authentication), if any.
    #[builder(default)]
    #[serde(default)]
    pub user: Option<String>,

    /// Per-request timeout.
    #[builder(default = "Duration::from_secs(30)")]
    #[serde(default = "default_timeout")]
    pub timeout: Duration,
}

fn default_timeout() -> Duration {
    Duration::from_secs(30)
}

impl ClientConfigBuilder {
    fn validate(&self) -> Result<(), String> {
        if let Some(ref url) = self.base_url {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(format!("Namenode URL must be http(s): {url}"));
            }
        }
        if let Some(timeout) = self.timeout {
            if timeout.is_zero() {
                return Err("Timeout cannot be zero".to_string());
            }
        }
        Ok(())
    }
}

impl ClientConfig {
    /// Create a new client config builder.
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }

    /// Create a config for the given namenode address.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            user: None,
            timeout: default_timeout(),
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_URL)
    }
}
