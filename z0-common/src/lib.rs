//! Shared error types for the z0 contract checker.

pub mod error;

pub use error::{Counterexample, Z0Error, Z0Result};
