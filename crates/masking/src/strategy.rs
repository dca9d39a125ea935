//! Masking strategies applied when formatting a secret.

use core::fmt;

/// Debugging trait which is specialized for handling secret values.
pub trait Strategy<T> {
    /// Write a masked representation of the secret.
    fn fmt(value: &T, f: &mut fmt::Formatter<'_>) -> fmt::Result;
}

/// Mask the value but keep its type name visible.
pub struct WithType;

impl<T> Strategy<T> for WithType {
    fn fmt(_: &T, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "*** {} ***", std::any::type_name::<T>())
    }
}

/// Mask the value and its type.
pub struct WithoutType;

impl<T> Strategy<T> for WithoutType {
    fn fmt(_: &T, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("*** ***")
    }
}

/// Strategy for API keys and other credentials.
#[derive(Debug)]
pub struct ApiKey;

impl<T> Strategy<T> for ApiKey
where
    T: AsRef<str>,
{
    fn fmt(_: &T, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(" *** api-key *** ")
    }
}
