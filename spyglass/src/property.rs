//! Property definition traits for synchronous and asynchronous testing.

use std::future::Future;

use crate::error::PropertyError;

/// Property definition trait for synchronous testing
pub trait Property<T> {
    type Output;

    /// Test the property with the given input
    fn test(&self, input: T) -> Result<Self::Output, PropertyError>;
}

/// Async property trait for asynchronous testing
pub trait AsyncProperty<T> {
    type Output;

    /// Test the property asynchronously with the given input
    fn test(&self, input: T) -> impl Future<Output = Result<Self::Output, PropertyError>> + Send;
}

/// What a property closure may return
///
/// `bool` fails on `false`; `()` always passes, leaving failures to panics
/// such as `assert!`; a `Result` passes its error through.
pub trait Verdict {
    /// Convert into the runner's pass/fail result
    fn into_verdict(self) -> Result<(), PropertyError>;
}

impl Verdict for bool {
    fn into_verdict(self) -> Result<(), PropertyError> {
        if self {
            Ok(())
        } else {
            Err(PropertyError::property_failed("Property returned false"))
        }
    }
}

impl Verdict for () {
    fn into_verdict(self) -> Result<(), PropertyError> {
        Ok(())
    }
}

impl Verdict for Result<(), PropertyError> {
    fn into_verdict(self) -> Result<(), PropertyError> {
        self
    }
}

impl<T, F, V> Property<T> for F
where
    F: Fn(T) -> V,
    V: Verdict,
{
    type Output = ();

    fn test(&self, input: T) -> Result<(), PropertyError> {
        self(input).into_verdict()
    }
}

impl<T, F, Fut, V> AsyncProperty<T> for F
where
    F: Fn(T) -> Fut,
    Fut: Future<Output = V> + Send,
    V: Verdict,
{
    type Output = ();

    fn test(&self, input: T) -> impl Future<Output = Result<(), PropertyError>> + Send {
        let pending = self(input);
        async move { pending.await.into_verdict() }
    }
}
