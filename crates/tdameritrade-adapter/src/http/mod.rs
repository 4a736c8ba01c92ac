/*
[INPUT]:  HTTP client configuration and API endpoints
[OUTPUT]: Authorized GET requests and typed errors
[POS]:    HTTP layer - REST API communication
[UPDATE]: When changing client behavior or error taxonomy
*/

pub mod client;
pub mod error;

pub use error::{Result, TdAmeritradeError};

pub use client::{ClientConfig, TdAmeritradeClient};
pub(crate) use client::QueryParams;
