/// Shared types for the tontine client
///
/// This crate provides the status vocabulary, the snapshot and membership
/// data model, wire decoding of ledger resources and the error type that
/// are used across the core derivations, the SDK and the CLI.

pub mod address;
pub mod constants;
pub mod errors;
pub mod membership;
pub mod status;
pub mod tontine;
pub mod units;

// Re-export all public types
pub use address::*;
pub use constants::*;
pub use errors::*;
pub use membership::*;
pub use status::*;
pub use tontine::*;
pub use units::*;
