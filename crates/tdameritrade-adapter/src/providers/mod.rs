/*
[INPUT]:  TdAmeritradeClient and request parameter objects
[OUTPUT]: Async provider traits with client implementations
[POS]:    Provider layer - one module per REST endpoint family
[UPDATE]: When adding endpoints or changing provider contracts
*/

pub mod accounts;
pub mod instruments;
pub mod option_chains;
pub mod price_history;

pub use accounts::AccountProvider;
pub use instruments::{FUTURES_SYMBOLS, InstrumentProvider, SYMBOL_UNIVERSE_PATTERN};
pub use option_chains::OptionChainProvider;
pub use price_history::PriceHistoryProvider;
