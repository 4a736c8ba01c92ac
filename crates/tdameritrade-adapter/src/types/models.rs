/*
[INPUT]:  API schema definitions and serde requirements
[OUTPUT]: Typed Rust structs for instruments, candles and accounts
[POS]:    Data layer - type definitions for API communication
[UPDATE]: When API schema changes or new types added
*/

use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::enums::AssetType;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Instrument {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cusip: Option<String>,
    pub symbol: String,
    pub description: String,
    pub exchange: String,
    pub asset_type: AssetType,
    /// Present only for the `fundamental` projection
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fundamental: Option<Fundamental>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Fundamental {
    pub symbol: String,
    #[serde(rename = "high52", deserialize_with = "serde_helpers::deserialize_decimal_or_none")]
    pub high_52: Option<Decimal>,
    #[serde(rename = "low52", deserialize_with = "serde_helpers::deserialize_decimal_or_none")]
    pub low_52: Option<Decimal>,
    #[serde(deserialize_with = "serde_helpers::deserialize_decimal_or_none")]
    pub dividend_amount: Option<Decimal>,
    #[serde(deserialize_with = "serde_helpers::deserialize_decimal_or_none")]
    pub dividend_yield: Option<Decimal>,
    #[serde(deserialize_with = "serde_helpers::deserialize_decimal_or_none")]
    pub pe_ratio: Option<Decimal>,
    #[serde(deserialize_with = "serde_helpers::deserialize_decimal_or_none")]
    pub market_cap: Option<Decimal>,
    #[serde(deserialize_with = "serde_helpers::deserialize_decimal_or_none")]
    pub beta: Option<Decimal>,
    #[serde(deserialize_with = "serde_helpers::deserialize_decimal_or_none")]
    pub shares_outstanding: Option<Decimal>,
}

/// One OHLCV bar
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    pub open: Decimal,
    pub high: Decimal,
    pub low: Decimal,
    pub close: Decimal,
    pub volume: u64,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub datetime: DateTime<Utc>,
}

/// Account identifier. Formatting only ever shows the last four characters.
#[derive(Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(String);

impl AccountId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Raw identifier, for building request paths only
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }

    /// `****1234` style rendering
    pub fn masked(&self) -> String {
        let chars: Vec<char> = self.0.chars().collect();
        let visible = chars.len().saturating_sub(4);
        let tail: String = chars[visible..].iter().collect();
        format!("****{tail}")
    }
}

impl fmt::Debug for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AccountId({})", self.masked())
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.masked())
    }
}

impl From<&str> for AccountId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for AccountId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Securities account, optionally expanded with positions and orders
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Account {
    #[serde(rename = "type")]
    pub account_type: String,
    pub account_id: AccountId,
    pub round_trips: u32,
    pub is_day_trader: bool,
    pub is_closing_only_restricted: bool,
    pub positions: Vec<Position>,
    pub order_strategies: Vec<Order>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub initial_balances: Option<Balances>,
    pub current_balances: Balances,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub projected_balances: Option<Balances>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Balances {
    pub liquidation_value: Option<Decimal>,
    pub cash_balance: Option<Decimal>,
    pub available_funds: Option<Decimal>,
    pub buying_power: Option<Decimal>,
    pub day_trading_buying_power: Option<Decimal>,
    pub equity: Option<Decimal>,
    pub long_market_value: Option<Decimal>,
    pub short_market_value: Option<Decimal>,
    pub margin_balance: Option<Decimal>,
    pub money_market_fund: Option<Decimal>,
    pub savings: Option<Decimal>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Position {
    pub short_quantity: Decimal,
    pub long_quantity: Decimal,
    pub settled_long_quantity: Option<Decimal>,
    pub settled_short_quantity: Option<Decimal>,
    pub average_price: Decimal,
    pub current_day_profit_loss: Option<Decimal>,
    pub current_day_profit_loss_percentage: Option<Decimal>,
    pub market_value: Decimal,
    pub instrument: Instrument,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Order {
    pub order_id: Option<i64>,
    pub session: String,
    pub duration: String,
    pub order_type: String,
    pub quantity: Decimal,
    pub filled_quantity: Decimal,
    pub remaining_quantity: Decimal,
    pub price: Option<Decimal>,
    pub status: String,
    pub entered_time: Option<String>,
    pub close_time: Option<String>,
    pub order_leg_collection: Vec<OrderLeg>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OrderLeg {
    pub order_leg_type: String,
    pub leg_id: Option<i64>,
    pub instruction: String,
    pub position_effect: Option<String>,
    pub quantity: Decimal,
    pub instrument: Instrument,
}

pub(crate) mod serde_helpers {
    use rust_decimal::Decimal;
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;
    use std::str::FromStr;

    /// Numbers, numeric strings, null and the API's `"NaN"` placeholder
    pub fn deserialize_decimal_or_none<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        match value {
            Value::Null => Ok(None),
            Value::String(raw) => parse_decimal(&raw).map_err(serde::de::Error::custom),
            Value::Number(number) => {
                parse_decimal(&number.to_string()).map_err(serde::de::Error::custom)
            }
            _ => Err(serde::de::Error::custom("invalid decimal value")),
        }
    }

    fn parse_decimal(raw: &str) -> Result<Option<Decimal>, rust_decimal::Error> {
        let raw = raw.trim();
        if raw.is_empty() || raw.eq_ignore_ascii_case("nan") {
            return Ok(None);
        }
        Decimal::from_str(raw)
            .or_else(|_| Decimal::from_scientific(raw))
            .map(Some)
    }
}
