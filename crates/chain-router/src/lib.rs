//! # chain-router
//!
//! Routes a method and path to an ordered chain of middleware and error
//! handlers, then runs that chain one step at a time.
//!
//! This crate provides:
//! - Path patterns with `:name` parameters, or pre-compiled regex matchers
//! - Per-method route lists plus a wildcard `ALL` list, merged back into
//!   registration order at dispatch
//! - Middleware that continues, fails, or suspends on a future
//! - Error handlers that only run once an earlier step has failed
//!
//! ## Quick Start
//!
//! ```
//! use chain_router::{Request, Response, Router};
//!
//! # futures::executor::block_on(async {
//! let mut router: Router = Router::new();
//! router
//!     .middleware("/users/:id", |req, _res, next| {
//!         req.headers.insert("X-User".into(), req.params.get("id").unwrap().into());
//!         next.proceed()
//!     })?
//!     .get("/users/:id", |req, res, next| {
//!         res.send(200, format!("User: {}", req.params.get("id").unwrap()));
//!         next.proceed()
//!     })?;
//!
//! let mut req = Request::get("/users/123");
//! let mut res = Response::default();
//! router.route("GET", "/users/123", &mut req, &mut res)?.await?;
//! assert_eq!(res.body_string(), Some("User: 123".to_string()));
//! # Ok::<(), Box<dyn std::error::Error + Send + Sync>>(())
//! # }).unwrap();
//! ```
//!
//! ## Ordering
//!
//! Every registration receives a sequence number shared across all methods.
//! Entries from `ALL` and from the dispatched method that match the path are
//! merged and run in that order, so a wildcard middleware registered between
//! two `GET` handlers runs between them.
//!
//! ## Errors
//!
//! A step fails by returning [`Flow::Fail`] (usually through
//! [`Next::fail`]) or by returning a deferred future that resolves to `Err`.
//! Middleware is then skipped until the next error handler registered after
//! the failing step. That handler sees the error on its [`Next`] and may
//! recover with [`Next::proceed`] or re-raise with [`Next::propagate`]. An
//! error nobody resolves rejects the dispatch future.
//!
//! ```
//! use chain_router::{Request, Response, Router};
//!
//! # futures::executor::block_on(async {
//! let mut router: Router = Router::new();
//! router
//!     .get("/ping", |_, _, next| next.fail("unavailable"))?
//!     .error("/ping", |_, res, next| {
//!         let message = next.error().map(ToString::to_string).unwrap_or_default();
//!         res.send(503, message);
//!         next.proceed()
//!     })?;
//!
//! let mut req = Request::get("/ping");
//! let mut res = Response::default();
//! router.route("GET", "/ping", &mut req, &mut res)?.await?;
//! assert_eq!(res.status, 503);
//! # Ok::<(), Box<dyn std::error::Error + Send + Sync>>(())
//! # }).unwrap();
//! ```

mod config;
mod dispatch;
mod error;
mod middleware;
mod path;
mod request;
mod response;
mod router;
mod table;

pub use config::{RouterConfig, DEFAULT_METHODS};
pub use error::{BoxError, Result, RouterError};
pub use middleware::{handler, BoxFuture, Flow, Handler, Next};
pub use path::{CompiledPath, ExactMatch, PathSpec};
pub use request::{PathParams, Request, RouteRequest};
pub use response::{Response, RouteResponse};
pub use router::Router;
pub use table::{RouteEntry, RouteKind, RouteTable, ALL};
