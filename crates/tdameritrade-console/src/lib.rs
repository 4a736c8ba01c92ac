/*
[INPUT]:  Public API exports for tdameritrade-console crate
[OUTPUT]: Module declarations and public re-exports
[POS]:    Crate root - library entry point
[UPDATE]: When adding new modules or public exports
*/

pub mod config;
pub mod host;
pub mod reload;

// Re-export main types for convenience
pub use config::{ConsoleConfig, ConsoleSettings};
pub use host::{ConsoleHost, PassSummary};
