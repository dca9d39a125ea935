//! Plain secret wrapper.

use std::{fmt, marker::PhantomData};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{abs::ExposeInterface, strategy::Strategy, PeekInterface, WithType};

/// Secret value.
///
/// `Debug` and `Display` go through the masking strategy `I`; access to the
/// actual value requires an explicit [`PeekInterface::peek`] or
/// [`ExposeInterface::expose`] call. Serialization writes the real value, so
/// a `Secret` placed inside a wire model still serializes correctly while
/// staying masked in logs.
pub struct Secret<S, I = WithType>
where
    I: Strategy<S>,
{
    inner_secret: S,
    marker: PhantomData<I>,
}

impl<S, I> Secret<S, I>
where
    I: Strategy<S>,
{
    /// Take ownership of a secret value.
    pub fn new(secret: S) -> Self {
        Self {
            inner_secret: secret,
            marker: PhantomData,
        }
    }

    /// Apply a function to the inner value, producing a new secret with the
    /// default masking strategy.
    pub fn map<T, F>(self, f: F) -> Secret<T>
    where
        F: FnOnce(S) -> T,
    {
        Secret::new(f(self.inner_secret))
    }
}

impl<S, I> PeekInterface<S> for Secret<S, I>
where
    I: Strategy<S>,
{
    fn peek(&self) -> &S {
        &self.inner_secret
    }
}

impl<S, I> ExposeInterface<S> for Secret<S, I>
where
    I: Strategy<S>,
{
    fn expose(self) -> S {
        self.inner_secret
    }
}

impl<S, I> From<S> for Secret<S, I>
where
    I: Strategy<S>,
{
    fn from(secret: S) -> Self {
        Self::new(secret)
    }
}

impl<S, I> Clone for Secret<S, I>
where
    S: Clone,
    I: Strategy<S>,
{
    fn clone(&self) -> Self {
        Self::new(self.inner_secret.clone())
    }
}

impl<S, I> PartialEq for Secret<S, I>
where
    S: PartialEq,
    I: Strategy<S>,
{
    fn eq(&self, other: &Self) -> bool {
        self.peek() == other.peek()
    }
}

impl<S, I> Eq for Secret<S, I>
where
    S: Eq,
    I: Strategy<S>,
{
}

impl<S, I> Default for Secret<S, I>
where
    S: Default,
    I: Strategy<S>,
{
    fn default() -> Self {
        Self::new(S::default())
    }
}

impl<S, I> fmt::Debug for Secret<S, I>
where
    I: Strategy<S>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        I::fmt(&self.inner_secret, f)
    }
}

impl<S, I> fmt::Display for Secret<S, I>
where
    I: Strategy<S>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        I::fmt(&self.inner_secret, f)
    }
}

impl<S, I> Serialize for Secret<S, I>
where
    S: Serialize,
    I: Strategy<S>,
{
    fn serialize<T: Serializer>(&self, serializer: T) -> Result<T::Ok, T::Error> {
        self.peek().serialize(serializer)
    }
}

impl<'de, S, I> Deserialize<'de> for Secret<S, I>
where
    S: Deserialize<'de>,
    I: Strategy<S>,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        S::deserialize(deserializer).map(Self::new)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn debug_output_is_masked() {
        let secret: Secret<String> = Secret::new("pk_test_123".to_string());
        assert_eq!("*** alloc::string::String ***", format!("{secret:?}"));
    }

    #[test]
    fn api_key_strategy_hides_value_and_type() {
        let secret: Secret<String, crate::ApiKey> = Secret::new("pk_test_123".to_string());
        assert_eq!(" *** api-key *** ", format!("{secret:?}"));
    }

    #[test]
    fn serializes_the_inner_value() {
        let secret: Secret<String> = Secret::new("123".to_string());
        assert_eq!(r#""123""#, serde_json::to_string(&secret).unwrap());
    }

    #[test]
    fn peek_and_expose() {
        let secret: Secret<String> = Secret::new("value".to_string());
        assert_eq!("value", secret.peek());
        assert_eq!("value", secret.expose());
    }
}
