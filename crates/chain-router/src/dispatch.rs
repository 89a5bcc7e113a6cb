//! Sequential execution of a selected chain.
//!
//! Exactly one step is in flight at a time. A step settles when its handler
//! returns [`Flow::Continue`] or [`Flow::Fail`], or when the future carried by
//! [`Flow::Defer`] completes. While an error is pending only error handlers
//! run; before any error they stay dormant.

use tracing::{debug, trace, warn};

use crate::error::BoxError;
use crate::middleware::{Flow, Next};
use crate::request::RouteRequest;
use crate::response::RouteResponse;
use crate::table::{RouteEntry, RouteKind};

/// Drives `chain` to completion against one exchange.
///
/// `req.params` is reset once up front and then accumulates the parameters
/// of every middleware step that is reached. Resolves to the error that
/// reached the end of the chain unhandled, if any.
pub(crate) async fn run_chain<Req, Res>(
    chain: Vec<&RouteEntry<Req, Res>>,
    path: &str,
    req: &mut Req,
    res: &mut Res,
) -> Result<(), BoxError>
where
    Req: RouteRequest + Send,
    Res: RouteResponse + Send,
{
    req.params_mut().clear();

    let mut pending: Option<BoxError> = None;

    for entry in chain {
        let sequence = entry.sequence();

        let error = match (entry.kind(), pending.take()) {
            (RouteKind::Middleware, None) => {
                entry.extract_params(path, req.params_mut())?;
                None
            }
            (RouteKind::Error, Some(error)) => Some(error),
            (RouteKind::Middleware, Some(error)) => {
                trace!(sequence, "error pending, skipping middleware");
                pending = Some(error);
                continue;
            }
            (RouteKind::Error, None) => {
                trace!(sequence, "no error pending, skipping error handler");
                continue;
            }
        };

        if res.is_finished() {
            // A skipped step continues immediately, which resolves any error.
            trace!(sequence, resolved = error.is_some(), "response finished, skipping");
            continue;
        }

        let handling_error = error.is_some();
        trace!(sequence, handling_error, "invoking handler");

        let outcome = match (entry.handler())(req, res, Next::new(error)) {
            Flow::Continue => Ok(()),
            Flow::Fail(error) => Err(error),
            Flow::Defer(future) => future.await,
        };

        match outcome {
            Ok(()) if handling_error => debug!(sequence, "error handler recovered"),
            Ok(()) => {}
            Err(error) => {
                debug!(sequence, %error, "step raised an error");
                pending = Some(error);
            }
        }
    }

    match pending {
        Some(error) => {
            warn!(path, %error, "unhandled error at end of chain");
            Err(error)
        }
        None => Ok(()),
    }
}
