//! Common types, protocol definitions, and errors shared across `envelope-sealer` crates.

pub mod error;
pub mod protocol;

pub use error::SealError;
