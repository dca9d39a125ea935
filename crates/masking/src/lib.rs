#![forbid(unsafe_code)]
#![warn(missing_docs)]

//! Wrapper types and traits for secret values so card data, security codes
//! and API keys are not accidentally logged or printed. Inspired by secrecy.
//!
//! Wrap a value in [`Secret`] (or [`StrongSecret`] to also wipe it from
//! memory on drop) and its `Debug`/`Display` output is replaced by the
//! masking [`Strategy`] chosen as the second type parameter.

pub use zeroize::Zeroize as ZeroizableSecret;

mod abs;
mod secret;
mod strategy;
mod strong_secret;

pub use abs::{ExposeInterface, PeekInterface};
pub use secret::Secret;
pub use strategy::{ApiKey, Strategy, WithType, WithoutType};
pub use strong_secret::StrongSecret;

/// This module should be included with asterisk.
///
/// `use masking::prelude::*;`
pub mod prelude {
    pub use super::{ExposeInterface, PeekInterface};
}
