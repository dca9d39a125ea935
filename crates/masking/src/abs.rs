//! Abstract interfaces over secret wrappers.

/// Borrow the inner value without consuming the wrapper.
///
/// Callers taking a peek are responsible for not letting the reference leak
/// into logs or serialized output.
pub trait PeekInterface<S> {
    /// Expose a shared reference to the inner value.
    fn peek(&self) -> &S;
}

/// Consume the wrapper and hand the inner value back to the caller.
pub trait ExposeInterface<S> {
    /// Take ownership of the inner value.
    fn expose(self) -> S;
}
