/*
[INPUT]:  PriceHistorySpecs and an optional cancellation token
[OUTPUT]: Ordered OHLCV candles
[POS]:    Provider layer - price history endpoint (GET /marketdata/{symbol}/pricehistory)
[UPDATE]: When period/frequency rules or the response envelope change
*/

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::http::{Result, TdAmeritradeClient};
use crate::types::{Candle, PriceHistoryResponse, PriceHistorySpecs};

#[async_trait]
pub trait PriceHistoryProvider: Send + Sync {
    /// Candles oldest first. A fired `cancel` aborts the in-flight request.
    async fn get_price_history(
        &self,
        specs: &PriceHistorySpecs,
        cancel: Option<&CancellationToken>,
    ) -> Result<Vec<Candle>>;
}

#[async_trait]
impl PriceHistoryProvider for TdAmeritradeClient {
    async fn get_price_history(
        &self,
        specs: &PriceHistorySpecs,
        cancel: Option<&CancellationToken>,
    ) -> Result<Vec<Candle>> {
        specs.validate()?;
        let segments = ["marketdata", specs.symbol.trim(), "pricehistory"];
        let response: PriceHistoryResponse = self
            .get_json_cancellable("pricehistory", &segments, &specs.to_query(), cancel)
            .await?;

        let mut candles = response.into_candles();
        candles.sort_by_key(|candle| candle.datetime);
        debug!(symbol = %specs.symbol, count = candles.len(), "price history fetched");
        Ok(candles)
    }
}
