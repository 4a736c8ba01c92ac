/*
[INPUT]:  Options snapshots published by configuration or a refresh service
[OUTPUT]: Bearer tokens for authorized requests
[POS]:    Auth layer - credential access (acquisition itself lives elsewhere)
[UPDATE]: When token sources or option fields change
*/

pub mod bearer;
pub mod options;

pub use bearer::{BearerTokenProvider, OptionsTokenProvider, StaticTokenProvider};
pub use options::{DEFAULT_BASE_URL, OptionsMonitor, TdAmeritradeOptions};
