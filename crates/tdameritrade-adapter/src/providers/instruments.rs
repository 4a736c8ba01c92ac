/*
[INPUT]:  Symbols, search patterns and projections
[OUTPUT]: Instrument records
[POS]:    Provider layer - instruments endpoint (GET /instruments)
[UPDATE]: When changing search modes or the futures universe
*/

use async_trait::async_trait;
use tracing::debug;

use crate::http::{QueryParams, Result, TdAmeritradeClient, TdAmeritradeError};
use crate::types::{Instrument, InstrumentMap, Projection};

/// Symbol pattern matching the whole equity universe
pub const SYMBOL_UNIVERSE_PATTERN: &str = "[A-Za-z.]*";

/// Continuous futures contracts queried by `get_all_futures_instruments`
pub const FUTURES_SYMBOLS: &[&str] = &[
    "/ES", "/NQ", "/YM", "/RTY", "/CL", "/NG", "/RB", "/HO", "/GC", "/SI", "/HG", "/PL", "/ZB",
    "/ZN", "/ZF", "/ZT", "/6E", "/6J", "/6B", "/6A", "/6C", "/ZC", "/ZS", "/ZW", "/LE", "/HE",
    "/VX",
];

const ROUTE: &str = "instruments";

#[async_trait]
pub trait InstrumentProvider: Send + Sync {
    /// Exact lookup. `Ok(None)` when the API knows no such symbol.
    async fn get_instrument(&self, symbol: &str) -> Result<Option<Instrument>>;

    /// `None` fetches the whole equity universe (ordered by symbol);
    /// `Some` performs an exact search and keeps the requested order.
    async fn get_instruments(&self, symbols: Option<&[String]>) -> Result<Vec<Instrument>>;

    async fn get_all_futures_instruments(&self) -> Result<Vec<Instrument>>;

    async fn get_all_forex_instruments(&self) -> Result<Vec<Instrument>>;

    /// Raw search with any projection
    async fn search_instruments(
        &self,
        pattern: &str,
        projection: Projection,
    ) -> Result<Vec<Instrument>>;
}

pub(crate) fn search_query(pattern: &str, projection: Projection) -> QueryParams {
    vec![
        ("symbol", pattern.to_string()),
        ("projection", projection.as_str().to_string()),
    ]
}

/// Query for `get_instruments`; an empty list is sent as an empty `symbol`
pub(crate) fn instruments_query(symbols: Option<&[String]>) -> QueryParams {
    match symbols {
        None => search_query(SYMBOL_UNIVERSE_PATTERN, Projection::SymbolRegex),
        Some(symbols) => search_query(&symbols.join(","), Projection::SymbolSearch),
    }
}

/// Requested symbols first, in order; anything else the API returned after
fn in_requested_order(mut map: InstrumentMap, symbols: &[String]) -> Vec<Instrument> {
    let mut ordered = Vec::with_capacity(map.len());
    for symbol in symbols {
        if let Some(instrument) = map.remove(symbol) {
            ordered.push(instrument);
        }
    }
    ordered.extend(map.into_values());
    ordered
}

impl TdAmeritradeClient {
    async fn fetch_instruments(&self, query: &QueryParams) -> Result<InstrumentMap> {
        let map: InstrumentMap = self.get_json(ROUTE, &[ROUTE], query).await?;
        debug!(count = map.len(), "instruments fetched");
        Ok(map)
    }
}

#[async_trait]
impl InstrumentProvider for TdAmeritradeClient {
    async fn get_instrument(&self, symbol: &str) -> Result<Option<Instrument>> {
        let query = search_query(symbol, Projection::SymbolSearch);
        let mut map = self.fetch_instruments(&query).await?;
        Ok(map.remove(symbol).or_else(|| map.into_values().next()))
    }

    async fn get_instruments(&self, symbols: Option<&[String]>) -> Result<Vec<Instrument>> {
        let query = instruments_query(symbols);
        let map = self.fetch_instruments(&query).await?;
        Ok(match symbols {
            Some(symbols) => in_requested_order(map, symbols),
            None => map.into_values().collect(),
        })
    }

    async fn get_all_futures_instruments(&self) -> Result<Vec<Instrument>> {
        let symbols: Vec<String> = FUTURES_SYMBOLS.iter().map(|s| s.to_string()).collect();
        self.get_instruments(Some(&symbols)).await
    }

    async fn get_all_forex_instruments(&self) -> Result<Vec<Instrument>> {
        Err(TdAmeritradeError::NotImplemented("forex instruments"))
    }

    async fn search_instruments(
        &self,
        pattern: &str,
        projection: Projection,
    ) -> Result<Vec<Instrument>> {
        let map = self
            .fetch_instruments(&search_query(pattern, projection))
            .await?;
        Ok(map.into_values().collect())
    }
}
