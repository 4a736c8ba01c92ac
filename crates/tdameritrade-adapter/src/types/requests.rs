/*
[INPUT]:  Caller-chosen request parameters
[OUTPUT]: Validated request values and their query-string pairs
[POS]:    Data layer - request parameter objects
[UPDATE]: When adding request parameters or API validation rules change
*/

use chrono::{DateTime, Duration, Months, Utc};
use serde::{Deserialize, Serialize};

use super::enums::{Contract, FrequencyType, Month, OptionType, PeriodType, Range, Strategy};
use crate::http::{QueryParams, Result, TdAmeritradeError};

/// Price history request. Defaults to ten days of one-minute candles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceHistorySpecs {
    pub symbol: String,
    pub period_type: PeriodType,
    /// Number of periods; ignored by the API when `start_date` is set
    pub period: Option<u32>,
    pub frequency_type: FrequencyType,
    pub frequency: u32,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub need_extended_hours_data: bool,
}

impl Default for PriceHistorySpecs {
    fn default() -> Self {
        Self {
            symbol: String::new(),
            period_type: PeriodType::Day,
            period: Some(10),
            frequency_type: FrequencyType::Minute,
            frequency: 1,
            start_date: None,
            end_date: None,
            need_extended_hours_data: true,
        }
    }
}

impl PriceHistorySpecs {
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            ..Self::default()
        }
    }

    pub fn period(mut self, period_type: PeriodType, period: u32) -> Self {
        self.period_type = period_type;
        self.period = Some(period);
        self
    }

    pub fn frequency(mut self, frequency_type: FrequencyType, frequency: u32) -> Self {
        self.frequency_type = frequency_type;
        self.frequency = frequency;
        self
    }

    pub fn date_range(mut self, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        self.start_date = Some(start);
        self.end_date = Some(end);
        self
    }

    pub fn extended_hours(mut self, include: bool) -> Self {
        self.need_extended_hours_data = include;
        self
    }

    /// Reject combinations the API would refuse
    pub fn validate(&self) -> Result<()> {
        if self.symbol.trim().is_empty() {
            return Err(TdAmeritradeError::InvalidRequest(
                "price history symbol is empty".to_string(),
            ));
        }
        if !self
            .period_type
            .allowed_frequencies()
            .contains(&self.frequency_type)
        {
            return Err(TdAmeritradeError::InvalidRequest(format!(
                "frequency type {} is not valid for period type {}",
                self.frequency_type.as_str(),
                self.period_type.as_str()
            )));
        }
        if self.frequency == 0 || self.period == Some(0) {
            return Err(TdAmeritradeError::InvalidRequest(
                "period and frequency must be positive".to_string(),
            ));
        }
        if let (Some(start), Some(end)) = (self.start_date, self.end_date) {
            if start > end {
                return Err(TdAmeritradeError::InvalidRequest(
                    "start date is after end date".to_string(),
                ));
            }
        }
        Ok(())
    }

    pub(crate) fn to_query(&self) -> QueryParams {
        let mut query: QueryParams = vec![("periodType", self.period_type.as_str().to_string())];
        if self.start_date.is_none() {
            if let Some(period) = self.period {
                query.push(("period", period.to_string()));
            }
        }
        query.push(("frequencyType", self.frequency_type.as_str().to_string()));
        query.push(("frequency", self.frequency.to_string()));
        if let Some(start) = self.start_date {
            query.push(("startDate", start.timestamp_millis().to_string()));
        }
        if let Some(end) = self.end_date {
            query.push(("endDate", end.timestamp_millis().to_string()));
        }
        query.push((
            "needExtendedHoursData",
            self.need_extended_hours_data.to_string(),
        ));
        query
    }
}

/// Option chain request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionChainQuery {
    /// Underlying symbol
    pub symbol: String,
    /// CALL, PUT or ALL
    pub contract_type: Contract,
    /// Number of strikes above and below the at-the-money price
    pub strike_count: Option<u32>,
    /// Include quotes for the options in the chain
    pub include_quotes: bool,
    /// Non-`SINGLE` values return a strategy chain
    pub strategy: Strategy,
    /// Strike interval for spread strategy chains
    pub interval: Option<f64>,
    /// Only options at this strike price
    pub strike: Option<f64>,
    pub range: Range,
    /// Only expirations after this date
    pub from_date: DateTime<Utc>,
    /// Only expirations before this date
    pub to_date: DateTime<Utc>,
    /// ANALYTICAL inputs
    pub volatility: Option<f64>,
    pub underlying_price: Option<f64>,
    pub interest_rate: Option<f64>,
    pub days_to_expiration: Option<u32>,
    pub exp_month: Month,
    pub option_type: OptionType,
}

impl Default for OptionChainQuery {
    fn default() -> Self {
        let now = Utc::now();
        Self {
            symbol: String::new(),
            contract_type: Contract::default(),
            strike_count: None,
            include_quotes: false,
            strategy: Strategy::default(),
            interval: None,
            strike: None,
            range: Range::default(),
            from_date: now
                .checked_sub_months(Months::new(12))
                .unwrap_or(now - Duration::days(365)),
            to_date: now
                .checked_add_months(Months::new(12 * 20))
                .unwrap_or(now + Duration::days(365 * 20)),
            volatility: None,
            underlying_price: None,
            interest_rate: None,
            days_to_expiration: None,
            exp_month: Month::default(),
            option_type: OptionType::default(),
        }
    }
}

impl OptionChainQuery {
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.symbol.trim().is_empty() {
            return Err(TdAmeritradeError::InvalidRequest(
                "option chain symbol is empty".to_string(),
            ));
        }
        if self.from_date > self.to_date {
            return Err(TdAmeritradeError::InvalidRequest(
                "fromDate is after toDate".to_string(),
            ));
        }
        Ok(())
    }

    pub(crate) fn to_query(&self) -> QueryParams {
        let mut query: QueryParams = vec![
            ("symbol", self.symbol.trim().to_ascii_uppercase()),
            ("contractType", self.contract_type.as_str().to_string()),
        ];
        if let Some(count) = self.strike_count {
            query.push(("strikeCount", count.to_string()));
        }
        query.push(("includeQuotes", upper_bool(self.include_quotes)));
        query.push(("strategy", self.strategy.as_str().to_string()));
        if self.strategy.is_spread() {
            if let Some(interval) = self.interval {
                query.push(("interval", interval.to_string()));
            }
        }
        if let Some(strike) = self.strike {
            query.push(("strike", strike.to_string()));
        }
        query.push(("range", self.range.as_str().to_string()));
        query.push(("fromDate", self.from_date.format("%Y-%m-%d").to_string()));
        query.push(("toDate", self.to_date.format("%Y-%m-%d").to_string()));
        if self.strategy == Strategy::Analytical {
            let analytical = [
                ("volatility", self.volatility),
                ("underlyingPrice", self.underlying_price),
                ("interestRate", self.interest_rate),
                ("daysToExpiration", self.days_to_expiration.map(f64::from)),
            ];
            for (name, value) in analytical {
                if let Some(value) = value {
                    query.push((name, value.to_string()));
                }
            }
        }
        query.push(("expMonth", self.exp_month.as_str().to_string()));
        query.push(("optionType", self.option_type.as_str().to_string()));
        query
    }
}

fn upper_bool(value: bool) -> String {
    let literal = if value { "TRUE" } else { "FALSE" };
    literal.to_string()
}
