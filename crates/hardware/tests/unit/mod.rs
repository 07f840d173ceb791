//! # Unit Components
//!
//! This module mirrors the library's source tree. Each submodule tests the
//! matching source module in isolation.
