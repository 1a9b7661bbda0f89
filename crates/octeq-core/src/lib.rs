//! octeq-core: Shared fixed-point types and arithmetic for octeq
//!
//! This crate provides the numeric foundation used by the filter bank:
//! the external/internal sample formats, the conversions between them,
//! saturating Q31 helpers and the error type.

mod error;
mod fixed;
mod sample;

pub use error::*;
pub use fixed::*;
pub use sample::*;
