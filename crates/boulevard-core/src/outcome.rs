//! Result helpers used across the use-case boundary.
//!
//! `std::result::Result` already is the tagged success/failure union; these
//! are the few combinators it does not ship with.

use std::future::Future;
use std::panic::AssertUnwindSafe;

use futures::FutureExt;

use crate::error::{panic_message, BoxError, Error, Result};

/// Extension combinators over any `Result`.
pub trait OutcomeExt<T, E> {
    /// Data on success, `default` on failure. The error is dropped untouched.
    fn get_or_else(self, default: T) -> T;

    /// Dispatch on the tag; both handlers produce the same type.
    fn fold<U>(self, on_success: impl FnOnce(T) -> U, on_failure: impl FnOnce(E) -> U) -> U;

    /// Convert the failure into a crate [`Error`] so it can be raised with `?`.
    fn get_or_throw(self) -> Result<T>
    where
        E: Into<Error>;
}

impl<T, E> OutcomeExt<T, E> for std::result::Result<T, E> {
    fn get_or_else(self, default: T) -> T {
        match self {
            Ok(data) => data,
            Err(_) => default,
        }
    }

    fn fold<U>(self, on_success: impl FnOnce(T) -> U, on_failure: impl FnOnce(E) -> U) -> U {
        match self {
            Ok(data) => on_success(data),
            Err(err) => on_failure(err),
        }
    }

    fn get_or_throw(self) -> Result<T>
    where
        E: Into<Error>,
    {
        self.map_err(Into::into)
    }
}

/// Collect every success in input order, or return the first failure.
///
/// Results after the first failure are never inspected.
pub fn combine<T, E, I>(results: I) -> std::result::Result<Vec<T>, E>
where
    I: IntoIterator<Item = std::result::Result<T, E>>,
{
    let mut values = Vec::new();
    for result in results {
        values.push(result?);
    }
    Ok(values)
}

/// Await a fallible future at an I/O boundary.
///
/// Errors are boxed into [`Error::Source`]. A panic while polling becomes a
/// failure carrying the panic message, or `"Unknown error"` when the payload
/// is not a string.
pub async fn wrap_async<F, T, E>(future: F) -> Result<T>
where
    F: Future<Output = std::result::Result<T, E>>,
    E: Into<BoxError>,
{
    match AssertUnwindSafe(future).catch_unwind().await {
        Ok(Ok(data)) => Ok(data),
        Ok(Err(err)) => Err(Error::Source(err.into())),
        Err(payload) => Err(Error::Source(
            panic_message(payload.as_ref())
                .unwrap_or_else(|| "Unknown error".to_string())
                .into(),
        )),
    }
}
