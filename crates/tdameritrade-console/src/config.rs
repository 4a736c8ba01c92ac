/*
[INPUT]:  YAML configuration file
[OUTPUT]: Parsed client options and console run settings
[POS]:    Configuration layer - console setup
[UPDATE]: When adding new configuration options
*/

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};
use tdameritrade_adapter::{AccountField, AccountId, TdAmeritradeOptions};

/// Top-level configuration for the console
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ConsoleConfig {
    /// Credential and endpoint options
    #[serde(rename = "td_ameritrade")]
    pub options: TdAmeritradeOptions,
    /// What the one-shot pass queries
    #[serde(default)]
    pub console: ConsoleSettings,
}

/// Console run settings
#[derive(Clone, Deserialize, Serialize)]
pub struct ConsoleSettings {
    /// Symbol used for the price history call
    #[serde(default = "default_symbol")]
    pub symbol: String,
    /// Account fetched individually; skipped when absent
    #[serde(default)]
    pub account_id: Option<String>,
    /// Expansions requested for account calls
    #[serde(default = "default_account_fields")]
    pub account_fields: Vec<String>,
}

impl Default for ConsoleSettings {
    fn default() -> Self {
        Self {
            symbol: default_symbol(),
            account_id: None,
            account_fields: default_account_fields(),
        }
    }
}

impl std::fmt::Debug for ConsoleSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConsoleSettings")
            .field("symbol", &self.symbol)
            .field("account_id", &self.account_id().map(|id| id.masked()))
            .field("account_fields", &self.account_fields)
            .finish()
    }
}

impl ConsoleSettings {
    pub fn account_id(&self) -> Option<AccountId> {
        self.account_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(AccountId::from)
    }

    /// Parsed expansions; unknown names are an error
    pub fn account_fields(&self) -> anyhow::Result<Vec<AccountField>> {
        AccountField::parse_list(self.account_fields.as_slice()).context("invalid console.account_fields")
    }
}

fn default_symbol() -> String {
    "SPY".to_string()
}

fn default_account_fields() -> Vec<String> {
    vec!["positions".to_string(), "orders".to_string()]
}

impl ConsoleConfig {
    /// Load configuration from YAML file
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("read config {}", path.display()))?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> anyhow::Result<Self> {
        let config: Self = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        self.options
            .parsed_base_url()
            .context("invalid td_ameritrade.base_url")?;
        self.console.account_fields()?;
        Ok(())
    }
}

/// `<config dir>/tdameritrade/console.yaml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("tdameritrade").join("console.yaml"))
}
