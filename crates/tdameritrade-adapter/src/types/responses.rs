/*
[INPUT]:  Raw JSON response shapes
[OUTPUT]: Envelope types unwrapped into the public models
[POS]:    Data layer - response envelopes
[UPDATE]: When API response shapes change
*/

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::models::serde_helpers::deserialize_decimal_or_none;
use super::models::{Account, Candle, Instrument};

/// Instruments endpoint: symbol -> record
pub type InstrumentMap = BTreeMap<String, Instrument>;

/// Price history comes wrapped in an envelope; a bare candle array is also
/// accepted.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum PriceHistoryResponse {
    Envelope {
        candles: Vec<Candle>,
        #[serde(default)]
        symbol: Option<String>,
        #[serde(default)]
        empty: bool,
    },
    Candles(Vec<Candle>),
}

impl PriceHistoryResponse {
    pub fn into_candles(self) -> Vec<Candle> {
        match self {
            PriceHistoryResponse::Envelope { candles, .. } => candles,
            PriceHistoryResponse::Candles(candles) => candles,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountEnvelope {
    #[serde(rename = "securitiesAccount")]
    pub securities_account: Account,
}

/// expiry key (`2024-01-19:5`) -> strike key (`150.0`) -> contracts
pub type ExpDateMap = BTreeMap<String, BTreeMap<String, Vec<OptionContract>>>;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OptionChain {
    pub symbol: String,
    pub status: String,
    pub strategy: String,
    pub is_delayed: bool,
    pub is_index: bool,
    #[serde(deserialize_with = "deserialize_decimal_or_none")]
    pub interval: Option<Decimal>,
    #[serde(deserialize_with = "deserialize_decimal_or_none")]
    pub interest_rate: Option<Decimal>,
    #[serde(deserialize_with = "deserialize_decimal_or_none")]
    pub underlying_price: Option<Decimal>,
    #[serde(deserialize_with = "deserialize_decimal_or_none")]
    pub volatility: Option<Decimal>,
    #[serde(deserialize_with = "deserialize_decimal_or_none")]
    pub days_to_expiration: Option<Decimal>,
    pub number_of_contracts: u32,
    pub call_exp_date_map: ExpDateMap,
    pub put_exp_date_map: ExpDateMap,
}

impl OptionChain {
    /// `status` is `FAILED` for unknown underlyings
    pub fn is_success(&self) -> bool {
        self.status.eq_ignore_ascii_case("SUCCESS")
    }

    pub fn contracts(&self) -> impl Iterator<Item = &OptionContract> {
        self.call_exp_date_map
            .values()
            .chain(self.put_exp_date_map.values())
            .flat_map(|strikes| strikes.values())
            .flatten()
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OptionContract {
    pub put_call: String,
    pub symbol: String,
    pub description: String,
    pub exchange_name: String,
    #[serde(deserialize_with = "deserialize_decimal_or_none")]
    pub bid: Option<Decimal>,
    #[serde(deserialize_with = "deserialize_decimal_or_none")]
    pub ask: Option<Decimal>,
    #[serde(deserialize_with = "deserialize_decimal_or_none")]
    pub last: Option<Decimal>,
    #[serde(deserialize_with = "deserialize_decimal_or_none")]
    pub mark: Option<Decimal>,
    pub bid_size: u64,
    pub ask_size: u64,
    pub total_volume: u64,
    pub open_interest: u64,
    #[serde(deserialize_with = "deserialize_decimal_or_none")]
    pub volatility: Option<Decimal>,
    #[serde(deserialize_with = "deserialize_decimal_or_none")]
    pub delta: Option<Decimal>,
    #[serde(deserialize_with = "deserialize_decimal_or_none")]
    pub gamma: Option<Decimal>,
    #[serde(deserialize_with = "deserialize_decimal_or_none")]
    pub theta: Option<Decimal>,
    #[serde(deserialize_with = "deserialize_decimal_or_none")]
    pub vega: Option<Decimal>,
    #[serde(deserialize_with = "deserialize_decimal_or_none")]
    pub strike_price: Option<Decimal>,
    /// Epoch milliseconds
    pub expiration_date: i64,
    pub days_to_expiration: i64,
    pub in_the_money: bool,
}
