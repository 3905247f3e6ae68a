//! Two-variant success/failure tag for asynchronous spy results.

/// The recorded outcome of a spied asynchronous call
///
/// Async spies log an `Outcome` for every call so a test can classify results
/// without awaiting anything. Test bodies can also use it to classify the
/// result of the code under test:
///
/// ```rust
/// use spyglass::Outcome;
///
/// let settled: Result<u32, String> = Err("timeout".to_string());
/// let outcome = Outcome::from(settled);
/// assert!(outcome.is_failure());
/// assert_eq!(outcome, Outcome::Failure("timeout".to_string()));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome<E, A> {
    /// The call was rejected with `E`
    Failure(E),
    /// The call resolved with `A`
    Success(A),
}

impl<E, A> Outcome<E, A> {
    /// Returns `true` for the success variant
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// Returns `true` for the failure variant
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failure(_))
    }

    /// The success payload, if any
    pub fn success(self) -> Option<A> {
        match self {
            Self::Success(value) => Some(value),
            Self::Failure(_) => None,
        }
    }

    /// The failure payload, if any
    pub fn failure(self) -> Option<E> {
        match self {
            Self::Failure(error) => Some(error),
            Self::Success(_) => None,
        }
    }

    /// Borrow both payloads
    pub fn as_ref(&self) -> Outcome<&E, &A> {
        match self {
            Self::Failure(error) => Outcome::Failure(error),
            Self::Success(value) => Outcome::Success(value),
        }
    }

    /// Map the success payload
    pub fn map<B>(self, f: impl FnOnce(A) -> B) -> Outcome<E, B> {
        match self {
            Self::Failure(error) => Outcome::Failure(error),
            Self::Success(value) => Outcome::Success(f(value)),
        }
    }

    /// Map the failure payload
    pub fn map_failure<F>(self, f: impl FnOnce(E) -> F) -> Outcome<F, A> {
        match self {
            Self::Failure(error) => Outcome::Failure(f(error)),
            Self::Success(value) => Outcome::Success(value),
        }
    }

    /// Convert into a standard `Result`, success becoming `Ok`
    pub fn into_result(self) -> Result<A, E> {
        match self {
            Self::Failure(error) => Err(error),
            Self::Success(value) => Ok(value),
        }
    }
}

impl<E, A> From<Result<A, E>> for Outcome<E, A> {
    fn from(result: Result<A, E>) -> Self {
        match result {
            Ok(value) => Self::Success(value),
            Err(error) => Self::Failure(error),
        }
    }
}
