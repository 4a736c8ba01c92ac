/*
[INPUT]:  Provider implementations and console settings
[OUTPUT]: One logged pass over instruments, price history and accounts
[POS]:    Application layer - console host orchestration
[UPDATE]: When changing the startup pass or what gets reported
*/

use std::future::Future;

use anyhow::{Context, Result};
use rust_decimal::Decimal;
use tdameritrade_adapter::{
    AccountProvider, InstrumentProvider, PriceHistoryProvider, PriceHistorySpecs,
    TdAmeritradeError,
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::config::ConsoleSettings;

/// Figures reported by one pass
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PassSummary {
    pub instrument_count: usize,
    pub futures_count: usize,
    pub candle_count: usize,
    pub first_candle_volume: Option<u64>,
    pub liquidation_value: Option<Decimal>,
    pub account_count: usize,
}

pub struct ConsoleHost<'a> {
    instruments: &'a dyn InstrumentProvider,
    price_history: &'a dyn PriceHistoryProvider,
    accounts: &'a dyn AccountProvider,
    settings: ConsoleSettings,
}

/// Run one provider call unless `cancel` fires first
async fn until_cancelled<T>(
    cancel: &CancellationToken,
    step: impl Future<Output = tdameritrade_adapter::Result<T>>,
) -> tdameritrade_adapter::Result<T> {
    tokio::select! {
        biased;
        _ = cancel.cancelled() => {
            debug!("console pass cancelled");
            Err(TdAmeritradeError::Cancelled)
        }
        result = step => result,
    }
}

impl<'a> ConsoleHost<'a> {
    pub fn new(
        instruments: &'a dyn InstrumentProvider,
        price_history: &'a dyn PriceHistoryProvider,
        accounts: &'a dyn AccountProvider,
        settings: ConsoleSettings,
    ) -> Self {
        Self {
            instruments,
            price_history,
            accounts,
            settings,
        }
    }

    /// Call every provider once, in order. The first failure aborts the pass,
    /// and so does `cancel` at any step.
    pub async fn run_once(&self, cancel: &CancellationToken) -> Result<PassSummary> {
        let fields = self.settings.account_fields()?;
        let mut summary = PassSummary::default();

        let instruments = until_cancelled(cancel, self.instruments.get_instruments(None))
            .await
            .context("fetch equity universe")?;
        summary.instrument_count = instruments.len();
        info!(count = summary.instrument_count, "instruments");

        let futures = until_cancelled(cancel, self.instruments.get_all_futures_instruments())
            .await
            .context("fetch futures instruments")?;
        summary.futures_count = futures.len();
        info!(count = summary.futures_count, "futures instruments");

        let specs = PriceHistorySpecs::new(self.settings.symbol.clone());
        let candles = self
            .price_history
            .get_price_history(&specs, Some(cancel))
            .await
            .with_context(|| format!("fetch price history for {}", specs.symbol))?;
        summary.candle_count = candles.len();
        summary.first_candle_volume = candles.first().map(|candle| candle.volume);
        match summary.first_candle_volume {
            Some(volume) => info!(symbol = %specs.symbol, candles = candles.len(), volume, "price history"),
            None => warn!(symbol = %specs.symbol, "price history returned no candles"),
        }

        if let Some(account_id) = self.settings.account_id() {
            let account = until_cancelled(cancel, self.accounts.get_account(&account_id, &fields))
                .await
                .with_context(|| format!("fetch account {account_id}"))?;
            summary.liquidation_value = account.current_balances.liquidation_value;
            info!(
                account = %account_id,
                liquidation_value = ?summary.liquidation_value,
                positions = account.positions.len(),
                orders = account.order_strategies.len(),
                "account"
            );
        }

        let accounts = until_cancelled(cancel, self.accounts.get_accounts(&fields))
            .await
            .context("fetch accounts")?;
        summary.account_count = accounts.len();
        info!(count = summary.account_count, "accounts");

        Ok(summary)
    }
}
