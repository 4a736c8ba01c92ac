/*
[INPUT]:  Latest options snapshot or a fixed token
[OUTPUT]: Bearer token string for the Authorization header
[POS]:    Auth layer - token accessor consumed by every authorized request
[UPDATE]: When adding token sources or changing token validation
*/

use async_trait::async_trait;

use crate::http::{Result, TdAmeritradeError};

use super::OptionsMonitor;

/// Supplies the current bearer token on demand.
///
/// Implementations must reflect the most recently refreshed credential; the
/// client asks again for every request.
#[async_trait]
pub trait BearerTokenProvider: Send + Sync {
    async fn bearer_token(&self) -> Result<String>;
}

/// Reads the token from the latest [`OptionsMonitor`] snapshot
#[derive(Debug, Clone)]
pub struct OptionsTokenProvider {
    monitor: OptionsMonitor,
}

impl OptionsTokenProvider {
    pub fn new(monitor: OptionsMonitor) -> Self {
        Self { monitor }
    }

    pub fn monitor(&self) -> &OptionsMonitor {
        &self.monitor
    }
}

#[async_trait]
impl BearerTokenProvider for OptionsTokenProvider {
    async fn bearer_token(&self) -> Result<String> {
        let options = self.monitor.current();
        if !options.has_token() {
            return Err(TdAmeritradeError::MissingToken);
        }
        Ok(options.access_token.trim().to_string())
    }
}

/// Fixed token, for scripts and tests
#[derive(Clone)]
pub struct StaticTokenProvider {
    token: String,
}

impl StaticTokenProvider {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

impl std::fmt::Debug for StaticTokenProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaticTokenProvider").finish_non_exhaustive()
    }
}

#[async_trait]
impl BearerTokenProvider for StaticTokenProvider {
    async fn bearer_token(&self) -> Result<String> {
        if self.token.trim().is_empty() {
            return Err(TdAmeritradeError::MissingToken);
        }
        Ok(self.token.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::TdAmeritradeOptions;

    #[tokio::test]
    async fn test_options_provider_reads_latest_token() {
        let monitor = OptionsMonitor::new(TdAmeritradeOptions::with_token("old"));
        let provider = OptionsTokenProvider::new(monitor.clone());
        assert_eq!(provider.bearer_token().await.unwrap(), "old");

        monitor.update(TdAmeritradeOptions::with_token("new"));
        assert_eq!(provider.bearer_token().await.unwrap(), "new");
    }

    #[tokio::test]
    async fn test_options_provider_requires_token() {
        let provider = OptionsTokenProvider::new(OptionsMonitor::new(
            TdAmeritradeOptions::default(),
        ));
        let err = provider.bearer_token().await.unwrap_err();
        assert!(matches!(err, TdAmeritradeError::MissingToken));
    }

    #[tokio::test]
    async fn test_static_provider() {
        let provider = StaticTokenProvider::new("fixed");
        assert_eq!(provider.bearer_token().await.unwrap(), "fixed");
        assert!(StaticTokenProvider::new("").bearer_token().await.is_err());
        assert!(!format!("{provider:?}").contains("fixed"));
    }
}
