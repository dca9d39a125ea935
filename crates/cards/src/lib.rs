#![forbid(unsafe_code)]

//! Card-level validation primitives: Luhn checksum, masked card number
//! wrapper, card network detection and expiry parsing.

mod expiry;
mod network;
mod validate;

pub use expiry::CardExpiry;
pub use network::CardNetwork;
pub use validate::{valid_luhn, CardNumber, CardNumberStrategy, CardNumberValidationError};
