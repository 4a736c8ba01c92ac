/*
[INPUT]:  Crate modules and public type definitions
[OUTPUT]: Public TD Ameritrade adapter crate surface
[POS]:    Crate root - module wiring
[UPDATE]: When public modules or exports change
*/

pub mod auth;
pub mod http;
pub mod providers;
pub mod types;

// Re-export commonly used types from auth
pub use auth::{
    BearerTokenProvider,
    OptionsMonitor,
    OptionsTokenProvider,
    StaticTokenProvider,
    TdAmeritradeOptions,
};

// Re-export commonly used types from http
pub use http::{ClientConfig, Result, TdAmeritradeClient, TdAmeritradeError};

// Re-export provider traits
pub use providers::{
    AccountProvider,
    FUTURES_SYMBOLS,
    InstrumentProvider,
    OptionChainProvider,
    PriceHistoryProvider,
    SYMBOL_UNIVERSE_PATTERN,
};

// Re-export all types
pub use types::*;
