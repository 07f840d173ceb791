//! Common types shared by the replacement policies and the prefetch engine.
//!
//! 1. **Address Types:** Block-granular addresses used by stream tracking.
//! 2. **Error Handling:** Configuration errors reported when building an instance.

/// Block address type.
pub mod addr;

/// Configuration error type.
pub mod error;

pub use addr::BlockAddr;
pub use error::ConfigError;
