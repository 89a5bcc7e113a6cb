//! The handler contract shared by middleware and error handlers.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use futures::FutureExt;

use crate::error::BoxError;

/// A boxed future for async handler steps.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// A registered handler.
///
/// Middleware and error handlers share this signature; error handlers find
/// the pending error on their [`Next`].
pub type Handler<Req, Res> =
    Arc<dyn for<'a> Fn(&'a mut Req, &'a mut Res, Next) -> Flow<'a> + Send + Sync>;

/// Wraps a closure or function as a [`Handler`].
pub fn handler<Req, Res, F>(f: F) -> Handler<Req, Res>
where
    F: for<'a> Fn(&'a mut Req, &'a mut Res, Next) -> Flow<'a> + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Outcome of one chain step.
pub enum Flow<'a> {
    /// Advance to the next entry.
    Continue,
    /// Advance once this future settles; `Err` enters the error channel.
    Defer(BoxFuture<'a, Result<(), BoxError>>),
    /// Enter the error channel with this error.
    Fail(BoxError),
}

impl<'a> Flow<'a> {
    /// Suspends the chain until `future` settles.
    ///
    /// # Example
    ///
    /// ```
    /// use chain_router::{Flow, Next, Request, Response};
    ///
    /// fn load<'a>(req: &'a mut Request, _res: &'a mut Response, _next: Next) -> Flow<'a> {
    ///     Flow::defer(async move {
    ///         req.headers.insert("X-Loaded".into(), "1".into());
    ///         Ok(())
    ///     })
    /// }
    /// ```
    pub fn defer<F>(future: F) -> Self
    where
        F: Future<Output = Result<(), BoxError>> + Send + 'a,
    {
        Self::Defer(future.boxed())
    }

    /// Fails the step with any error convertible into a [`BoxError`].
    pub fn fail(error: impl Into<BoxError>) -> Self {
        Self::Fail(error.into())
    }
}

impl std::fmt::Debug for Flow<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Continue => f.write_str("Continue"),
            Self::Defer(_) => f.write_str("Defer(..)"),
            Self::Fail(e) => f.debug_tuple("Fail").field(e).finish(),
        }
    }
}

/// Continuation handed to every handler.
///
/// Error handlers receive the pending error through it and decide whether to
/// recover ([`Next::proceed`]) or re-raise ([`Next::propagate`]).
#[derive(Debug, Default)]
pub struct Next {
    error: Option<BoxError>,
}

impl Next {
    pub(crate) fn new(error: Option<BoxError>) -> Self {
        Self { error }
    }

    /// Returns the error being handled, if this is an error step.
    pub fn error(&self) -> Option<&BoxError> {
        self.error.as_ref()
    }

    /// Takes the error being handled out of the continuation.
    pub fn take_error(&mut self) -> Option<BoxError> {
        self.error.take()
    }

    /// Continues normally. In an error handler this resolves the error.
    #[must_use]
    pub fn proceed<'a>(self) -> Flow<'a> {
        Flow::Continue
    }

    /// Switches the chain to the error channel with `error`.
    #[must_use]
    pub fn fail<'a>(self, error: impl Into<BoxError>) -> Flow<'a> {
        Flow::Fail(error.into())
    }

    /// Re-raises the error being handled, or continues when there is none.
    #[must_use]
    pub fn propagate<'a>(self) -> Flow<'a> {
        match self.error {
            Some(error) => Flow::Fail(error),
            None => Flow::Continue,
        }
    }
}
