#![forbid(unsafe_code)]
#![warn(missing_docs)]

//! Environment of the payment sheet SDK: logging setup and the `logger`
//! facade the other crates emit through.

pub mod logger;

#[doc(inline)]
pub use logger::*;
pub use tracing;
