//! The `utils` module provides a collection of utility functions and common
//! definitions used across the `mailroom` crate.
//!
//! It centralizes the error types and the logging setup so the broker, the
//! router and the binary report problems the same way.

pub mod error;
pub mod logging;
