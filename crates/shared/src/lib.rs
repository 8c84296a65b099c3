//! # Breakwater Shared
//!
//! Common types and interfaces used across all Breakwater packages.

pub mod actor;
pub mod config;
pub mod error;
pub mod transport;

// Re-exports
pub use actor::*;
pub use config::*;
pub use error::*;
pub use transport::*;
