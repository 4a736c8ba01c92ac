/*
[INPUT]:  API vocabulary (projection names, period units, chain filters)
[OUTPUT]: Closed Rust enums mapping 1:1 to the API's string literals
[POS]:    Data layer - type definitions for API communication
[UPDATE]: When API vocabulary changes or new enumerations are needed
*/

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::http::TdAmeritradeError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AssetType {
    Equity,
    Etf,
    Forex,
    Future,
    FutureOption,
    Index,
    Indicator,
    MutualFund,
    Option,
    Bond,
    #[default]
    #[serde(other)]
    Unknown,
}

/// Instrument search mode (`projection` query parameter)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Projection {
    SymbolSearch,
    SymbolRegex,
    DescSearch,
    DescRegex,
    Fundamental,
}

impl Projection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Projection::SymbolSearch => "symbol-search",
            Projection::SymbolRegex => "symbol-regex",
            Projection::DescSearch => "desc-search",
            Projection::DescRegex => "desc-regex",
            Projection::Fundamental => "fundamental",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PeriodType {
    #[default]
    Day,
    Month,
    Year,
    Ytd,
}

impl PeriodType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PeriodType::Day => "day",
            PeriodType::Month => "month",
            PeriodType::Year => "year",
            PeriodType::Ytd => "ytd",
        }
    }

    /// Frequency units the API accepts for this period unit
    pub fn allowed_frequencies(&self) -> &'static [FrequencyType] {
        match self {
            PeriodType::Day => &[FrequencyType::Minute],
            PeriodType::Month => &[FrequencyType::Daily, FrequencyType::Weekly],
            PeriodType::Year => &[
                FrequencyType::Daily,
                FrequencyType::Weekly,
                FrequencyType::Monthly,
            ],
            PeriodType::Ytd => &[FrequencyType::Daily, FrequencyType::Weekly],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FrequencyType {
    #[default]
    Minute,
    Daily,
    Weekly,
    Monthly,
}

impl FrequencyType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FrequencyType::Minute => "minute",
            FrequencyType::Daily => "daily",
            FrequencyType::Weekly => "weekly",
            FrequencyType::Monthly => "monthly",
        }
    }
}

/// Optional account expansions (`fields` query parameter)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountField {
    Positions,
    Orders,
}

impl AccountField {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountField::Positions => "positions",
            AccountField::Orders => "orders",
        }
    }

    /// Parse a list of field names, rejecting anything outside the closed set
    pub fn parse_list<S: AsRef<str>>(values: &[S]) -> Result<Vec<AccountField>, TdAmeritradeError> {
        values.iter().map(|v| v.as_ref().parse()).collect()
    }
}

impl FromStr for AccountField {
    type Err = TdAmeritradeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "positions" => Ok(AccountField::Positions),
            "orders" => Ok(AccountField::Orders),
            _ => Err(TdAmeritradeError::InvalidField(s.to_string())),
        }
    }
}

impl fmt::Display for AccountField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Type of contracts in an option chain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Contract {
    #[default]
    All,
    Call,
    Put,
}

impl Contract {
    pub fn as_str(&self) -> &'static str {
        match self {
            Contract::All => "ALL",
            Contract::Call => "CALL",
            Contract::Put => "PUT",
        }
    }
}

/// Option chain strategy; anything but `Single` returns a strategy chain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Strategy {
    #[default]
    Single,
    Analytical,
    Covered,
    Vertical,
    Calendar,
    Strangle,
    Straddle,
    Butterfly,
    Condor,
    Diagonal,
    Collar,
    Roll,
}

impl Strategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::Single => "SINGLE",
            Strategy::Analytical => "ANALYTICAL",
            Strategy::Covered => "COVERED",
            Strategy::Vertical => "VERTICAL",
            Strategy::Calendar => "CALENDAR",
            Strategy::Strangle => "STRANGLE",
            Strategy::Straddle => "STRADDLE",
            Strategy::Butterfly => "BUTTERFLY",
            Strategy::Condor => "CONDOR",
            Strategy::Diagonal => "DIAGONAL",
            Strategy::Collar => "COLLAR",
            Strategy::Roll => "ROLL",
        }
    }

    /// Spread strategies take a strike `interval`
    pub fn is_spread(&self) -> bool {
        !matches!(
            self,
            Strategy::Single | Strategy::Analytical | Strategy::Covered
        )
    }
}

/// Strike range filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Range {
    #[default]
    All,
    Itm,
    Ntm,
    Otm,
    Sak,
    Sbk,
    Snk,
}

impl Range {
    pub fn as_str(&self) -> &'static str {
        match self {
            Range::All => "ALL",
            Range::Itm => "ITM",
            Range::Ntm => "NTM",
            Range::Otm => "OTM",
            Range::Sak => "SAK",
            Range::Sbk => "SBK",
            Range::Snk => "SNK",
        }
    }
}

/// Expiration month filter, three-letter form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Month {
    #[default]
    All,
    Jan,
    Feb,
    Mar,
    Apr,
    May,
    Jun,
    Jul,
    Aug,
    Sep,
    Oct,
    Nov,
    Dec,
}

impl Month {
    pub fn as_str(&self) -> &'static str {
        match self {
            Month::All => "ALL",
            Month::Jan => "JAN",
            Month::Feb => "FEB",
            Month::Mar => "MAR",
            Month::Apr => "APR",
            Month::May => "MAY",
            Month::Jun => "JUN",
            Month::Jul => "JUL",
            Month::Aug => "AUG",
            Month::Sep => "SEP",
            Month::Oct => "OCT",
            Month::Nov => "NOV",
            Month::Dec => "DEC",
        }
    }
}

/// Standard / non-standard contract filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OptionType {
    #[default]
    All,
    S,
    Ns,
}

impl OptionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            OptionType::All => "ALL",
            OptionType::S => "S",
            OptionType::Ns => "NS",
        }
    }
}
