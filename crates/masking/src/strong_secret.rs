//! Secret wrapper that wipes its value from memory on drop.

use std::{fmt, marker::PhantomData, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use zeroize::Zeroize;

use crate::{abs::ExposeInterface, strategy::Strategy, PeekInterface, WithType};

/// Like [`crate::Secret`], but the inner value is zeroized when the wrapper
/// is dropped. Use this for values that must not outlive their use, such as
/// full card numbers.
pub struct StrongSecret<S: Zeroize, I = WithType>
where
    I: Strategy<S>,
{
    inner_secret: S,
    marker: PhantomData<I>,
}

impl<S: Zeroize, I> StrongSecret<S, I>
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
}

impl<S: Zeroize, I> PeekInterface<S> for StrongSecret<S, I>
where
    I: Strategy<S>,
{
    fn peek(&self) -> &S {
        &self.inner_secret
    }
}

impl<S: Zeroize + Default, I> ExposeInterface<S> for StrongSecret<S, I>
where
    I: Strategy<S>,
{
    fn expose(mut self) -> S {
        std::mem::take(&mut self.inner_secret)
    }
}

impl<S: Zeroize, I> From<S> for StrongSecret<S, I>
where
    I: Strategy<S>,
{
    fn from(secret: S) -> Self {
        Self::new(secret)
    }
}

impl<S: Zeroize + FromStr, I> FromStr for StrongSecret<S, I>
where
    I: Strategy<S>,
{
    type Err = <S as FromStr>::Err;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(S::from_str(s)?))
    }
}

impl<S: Zeroize + Clone, I> Clone for StrongSecret<S, I>
where
    I: Strategy<S>,
{
    fn clone(&self) -> Self {
        Self::new(self.inner_secret.clone())
    }
}

impl<S: Zeroize + PartialEq, I> PartialEq for StrongSecret<S, I>
where
    I: Strategy<S>,
{
    fn eq(&self, other: &Self) -> bool {
        self.peek() == other.peek()
    }
}

impl<S: Zeroize + Eq, I> Eq for StrongSecret<S, I>
where
    I: Strategy<S>,
{
}

impl<S: Zeroize + Default, I> Default for StrongSecret<S, I>
where
    I: Strategy<S>,
{
    fn default() -> Self {
        Self::new(S::default())
    }
}

impl<S: Zeroize, I> fmt::Debug for StrongSecret<S, I>
where
    I: Strategy<S>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        I::fmt(&self.inner_secret, f)
    }
}

impl<S: Zeroize, I> fmt::Display for StrongSecret<S, I>
where
    I: Strategy<S>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        I::fmt(&self.inner_secret, f)
    }
}

impl<S: Zeroize, I> Drop for StrongSecret<S, I>
where
    I: Strategy<S>,
{
    fn drop(&mut self) {
        self.inner_secret.zeroize();
    }
}

impl<S: Zeroize + Serialize, I> Serialize for StrongSecret<S, I>
where
    I: Strategy<S>,
{
    fn serialize<T: Serializer>(&self, serializer: T) -> Result<T::Ok, T::Error> {
        self.peek().serialize(serializer)
    }
}

impl<'de, S: Zeroize + Deserialize<'de>, I> Deserialize<'de> for StrongSecret<S, I>
where
    I: Strategy<S>,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        S::deserialize(deserializer).map(Self::new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn masked_debug_output() {
        let secret: StrongSecret<String> = StrongSecret::new("4111111111111111".to_string());
        assert_eq!("*** alloc::string::String ***", format!("{secret:?}"));
    }

    #[test]
    fn equality_compares_inner_values() {
        let a: StrongSecret<String> = StrongSecret::new("123".to_string());
        let b: StrongSecret<String> = StrongSecret::new("123".to_string());
        assert_eq!(a, b);
    }

    #[test]
    fn expose_takes_the_value_out() {
        let secret: StrongSecret<String> = StrongSecret::new("123".to_string());
        assert_eq!("123", secret.expose());
    }
}
