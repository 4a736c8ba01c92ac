/*
[INPUT]:  Credential and endpoint settings (config file, refresh service)
[OUTPUT]: Immutable options snapshots and a monitor publishing the latest one
[POS]:    Auth layer - live-reloadable client configuration
[UPDATE]: When adding option fields or changing snapshot distribution
*/

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use reqwest::Url;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;

use crate::http::{Result, TdAmeritradeError};

/// Default REST endpoint for the v1 API
pub const DEFAULT_BASE_URL: &str = "https://api.tdameritrade.com/v1/";

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Client options: current credential plus endpoint settings.
///
/// Field names follow the token endpoint's response so a refreshed token
/// document can be deserialized straight into this type.
#[derive(Clone, PartialEq, Deserialize, Serialize)]
pub struct TdAmeritradeOptions {
    #[serde(default)]
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    #[serde(default)]
    pub expires_in: Option<u64>,
    #[serde(default)]
    pub scope: Option<String>,
    /// Application consumer key (client id)
    #[serde(default)]
    pub consumer_key: Option<String>,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_token_type() -> String {
    "Bearer".to_string()
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Default for TdAmeritradeOptions {
    fn default() -> Self {
        Self {
            access_token: String::new(),
            refresh_token: None,
            token_type: default_token_type(),
            expires_in: None,
            scope: None,
            consumer_key: None,
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl TdAmeritradeOptions {
    /// Options with an access token and the default endpoint
    pub fn with_token(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            ..Self::default()
        }
    }

    /// Override the base endpoint
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// True when the snapshot carries a usable token
    pub fn has_token(&self) -> bool {
        !self.access_token.trim().is_empty()
    }

    /// Request timeout
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Parse the base endpoint, forcing a trailing slash so relative joins
    /// keep the version segment.
    pub fn parsed_base_url(&self) -> Result<Url> {
        let trimmed = self.base_url.trim();
        if trimmed.is_empty() {
            return Err(TdAmeritradeError::Config("base_url is empty".to_string()));
        }
        let mut url = Url::parse(trimmed)?;
        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }
        Ok(url)
    }
}

impl fmt::Debug for TdAmeritradeOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TdAmeritradeOptions")
            .field("access_token", &redact(&self.access_token))
            .field(
                "refresh_token",
                &self.refresh_token.as_deref().map(redact),
            )
            .field("token_type", &self.token_type)
            .field("expires_in", &self.expires_in)
            .field("scope", &self.scope)
            .field("consumer_key", &self.consumer_key.as_deref().map(redact))
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

fn redact(value: &str) -> &'static str {
    if value.is_empty() { "<empty>" } else { "<redacted>" }
}

/// Publishes the latest [`TdAmeritradeOptions`] snapshot to every reader.
///
/// Readers never observe a half-updated value: each update swaps in a new
/// `Arc`. Cloning the monitor shares the same channel.
#[derive(Debug, Clone)]
pub struct OptionsMonitor {
    tx: Arc<watch::Sender<Arc<TdAmeritradeOptions>>>,
}

impl OptionsMonitor {
    pub fn new(initial: TdAmeritradeOptions) -> Self {
        let (tx, _rx) = watch::channel(Arc::new(initial));
        Self { tx: Arc::new(tx) }
    }

    /// Latest snapshot
    pub fn current(&self) -> Arc<TdAmeritradeOptions> {
        self.tx.borrow().clone()
    }

    /// Replace the snapshot; returns false when the value is unchanged.
    pub fn update(&self, options: TdAmeritradeOptions) -> bool {
        self.tx.send_if_modified(|current| {
            if **current == options {
                return false;
            }
            *current = Arc::new(options);
            true
        })
    }

    /// Receiver notified on every change
    pub fn subscribe(&self) -> watch::Receiver<Arc<TdAmeritradeOptions>> {
        self.tx.subscribe()
    }
}
