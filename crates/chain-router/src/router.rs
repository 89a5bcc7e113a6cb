//! Main router implementation.

use std::future::Future;
use std::pin::Pin;

use tracing::warn;

use crate::config::{RouterConfig, DEFAULT_METHODS};
use crate::dispatch::run_chain;
use crate::error::{BoxError, Result, RouterError};
use crate::middleware::{handler, BoxFuture, Flow, Next};
use crate::path::PathSpec;
use crate::request::{Request, RouteRequest};
use crate::response::{Response, RouteResponse};
use crate::table::{RouteEntry, RouteKind, RouteTable};

/// Maps a method and path to an ordered chain of handlers and runs it.
///
/// Registration takes `&mut self` and must be complete before dispatching;
/// dispatch only reads the table, so one router can serve many concurrent
/// chains.
pub struct Router<Req = Request, Res = Response> {
    table: RouteTable<Req, Res>,
}

impl<Req, Res> Default for Router<Req, Res> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Req, Res> std::fmt::Debug for Router<Req, Res> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Router").field("table", &self.table).finish()
    }
}

impl<Req, Res> Router<Req, Res> {
    /// Creates a router with `ALL`, `GET` and `POST` enabled.
    pub fn new() -> Self {
        let mut table = RouteTable::new();
        for method in DEFAULT_METHODS {
            table.enable_method(method);
        }
        Self { table }
    }

    /// Creates a router and enables the configured methods.
    pub fn with_config(config: &RouterConfig) -> Self {
        let mut router = Self::new();
        for method in &config.methods {
            router.enable_method(method);
        }
        router
    }

    /// Enables `method` and its lower-cased registration verb.
    pub fn enable_method(&mut self, method: &str) -> &mut Self {
        self.table.enable_method(method);
        self
    }

    /// Returns true if `method` has been enabled.
    pub fn has_method(&self, method: &str) -> bool {
        self.table.has_method(method)
    }

    /// Returns the enabled method names, sorted.
    pub fn methods(&self) -> Vec<&str> {
        self.table.methods()
    }

    /// Returns the entries registered directly under `method`.
    pub fn routes(&self, method: &str) -> &[RouteEntry<Req, Res>] {
        self.table.entries(method).unwrap_or_default()
    }

    /// Registers a handler under `method`, or under `ALL` when `None`.
    pub fn add_route<F>(
        &mut self,
        kind: RouteKind,
        method: Option<&str>,
        path: impl Into<PathSpec>,
        f: F,
    ) -> Result<&mut Self>
    where
        F: for<'a> Fn(&'a mut Req, &'a mut Res, Next) -> Flow<'a> + Send + Sync + 'static,
    {
        self.table.add_route(kind, method, path, handler(f))?;
        Ok(self)
    }

    /// Registers middleware for every method.
    ///
    /// # Example
    ///
    /// ```
    /// use chain_router::Router;
    ///
    /// let mut router: Router = Router::new();
    /// router
    ///     .middleware("/users/:id", |req, _res, next| {
    ///         assert!(req.params.get("id").is_some());
    ///         next.proceed()
    ///     })
    ///     .unwrap();
    /// ```
    pub fn middleware<F>(&mut self, path: impl Into<PathSpec>, f: F) -> Result<&mut Self>
    where
        F: for<'a> Fn(&'a mut Req, &'a mut Res, Next) -> Flow<'a> + Send + Sync + 'static,
    {
        self.add_route(RouteKind::Middleware, None, path, f)
    }

    /// Registers middleware for one method.
    pub fn middleware_for<F>(
        &mut self,
        method: &str,
        path: impl Into<PathSpec>,
        f: F,
    ) -> Result<&mut Self>
    where
        F: for<'a> Fn(&'a mut Req, &'a mut Res, Next) -> Flow<'a> + Send + Sync + 'static,
    {
        self.add_route(RouteKind::Middleware, Some(method), path, f)
    }

    /// Registers an error handler for every method.
    ///
    /// It only sees errors raised by steps registered before it.
    pub fn error<F>(&mut self, path: impl Into<PathSpec>, f: F) -> Result<&mut Self>
    where
        F: for<'a> Fn(&'a mut Req, &'a mut Res, Next) -> Flow<'a> + Send + Sync + 'static,
    {
        self.add_route(RouteKind::Error, None, path, f)
    }

    /// Registers an error handler for one method.
    pub fn error_for<F>(
        &mut self,
        method: &str,
        path: impl Into<PathSpec>,
        f: F,
    ) -> Result<&mut Self>
    where
        F: for<'a> Fn(&'a mut Req, &'a mut Res, Next) -> Flow<'a> + Send + Sync + 'static,
    {
        self.add_route(RouteKind::Error, Some(method), path, f)
    }

    /// Registers middleware through a lower-cased method verb such as `"put"`.
    ///
    /// Fails with [`RouterError::UnknownVerb`] if no enabled method
    /// materialized `verb`.
    pub fn verb<F>(&mut self, verb: &str, path: impl Into<PathSpec>, f: F) -> Result<&mut Self>
    where
        F: for<'a> Fn(&'a mut Req, &'a mut Res, Next) -> Flow<'a> + Send + Sync + 'static,
    {
        let method = self.table.method_for_verb(verb)?.to_string();
        self.add_route(RouteKind::Middleware, Some(&method), path, f)
    }

    /// Registers middleware under `ALL`.
    pub fn all<F>(&mut self, path: impl Into<PathSpec>, f: F) -> Result<&mut Self>
    where
        F: for<'a> Fn(&'a mut Req, &'a mut Res, Next) -> Flow<'a> + Send + Sync + 'static,
    {
        self.verb("all", path, f)
    }

    /// Registers GET middleware.
    pub fn get<F>(&mut self, path: impl Into<PathSpec>, f: F) -> Result<&mut Self>
    where
        F: for<'a> Fn(&'a mut Req, &'a mut Res, Next) -> Flow<'a> + Send + Sync + 'static,
    {
        self.verb("get", path, f)
    }

    /// Registers POST middleware.
    pub fn post<F>(&mut self, path: impl Into<PathSpec>, f: F) -> Result<&mut Self>
    where
        F: for<'a> Fn(&'a mut Req, &'a mut Res, Next) -> Flow<'a> + Send + Sync + 'static,
    {
        self.verb("post", path, f)
    }
}

impl<Req, Res> Router<Req, Res>
where
    Req: RouteRequest + Send,
    Res: RouteResponse + Send,
{
    /// Selects the chain for `method` and `path` and returns the future that
    /// runs it.
    ///
    /// Fails immediately, before any handler runs, if `method` was never
    /// enabled or a matched pre-compiled path is malformed. The returned
    /// future resolves once the last step settles, or rejects with an error
    /// no error handler resolved.
    pub fn route<'a>(
        &'a self,
        method: &str,
        path: &'a str,
        req: &'a mut Req,
        res: &'a mut Res,
    ) -> Result<BoxFuture<'a, std::result::Result<(), BoxError>>> {
        let chain = self.table.chain(method, path)?;
        Ok(Box::pin(run_chain(chain, path, req, res)))
    }
}

impl Router<Request, Response> {
    /// Routes a request by its own method and path and produces a response.
    ///
    /// Outcomes the chain does not answer itself are translated: an unknown
    /// method becomes 405, an unhandled error 500, and a chain that never
    /// finished the response 404.
    pub fn handle(
        &self,
        mut request: Request,
    ) -> Pin<Box<dyn Future<Output = Response> + Send + '_>> {
        Box::pin(async move {
            let mut response = Response::default();
            let method = request.method.clone();
            let path = request.path.clone();

            let dispatch = match self.route(&method, &path, &mut request, &mut response) {
                Ok(dispatch) => dispatch,
                Err(RouterError::MethodNotFound { .. }) => {
                    return Response::method_not_allowed();
                }
                Err(e) => {
                    warn!(%method, %path, error = %e, "routing failed");
                    return Response::internal_server_error();
                }
            };
            let outcome = dispatch.await;

            match outcome {
                _ if response.finished => response,
                Ok(()) => Response::not_found(),
                Err(_) => Response::internal_server_error(),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::table::ALL;

    #[test]
    fn test_default_methods() {
        let router: Router = Router::new();
        assert_eq!(router.methods(), vec!["ALL", "GET", "POST"]);
    }

    #[test]
    fn test_with_config() {
        let config = RouterConfig::new().method("PUT").method("GET");
        let router: Router = Router::with_config(&config);
        assert_eq!(router.methods(), vec!["ALL", "GET", "POST", "PUT"]);
    }

    #[test]
    fn test_enable_method_exposes_verb() {
        let mut router: Router = Router::new();
        assert!(matches!(
            router.verb("put", "/a", |_, _, next| next.proceed()),
            Err(RouterError::UnknownVerb(_))
        ));

        router.enable_method("PUT");
        router.verb("put", "/a", |_, _, next| next.proceed()).unwrap();
        assert_eq!(router.routes("PUT").len(), 1);
    }

    #[test]
    fn test_enable_method_does_not_reset() {
        let mut router: Router = Router::new();
        router.get("/a", |_, _, next| next.proceed()).unwrap();
        router.enable_method("GET").enable_method("GET");
        assert_eq!(router.routes("GET").len(), 1);
    }

    #[test]
    fn test_all_verb_registers_wildcard() {
        let mut router: Router = Router::new();
        router.all("/a", |_, _, next| next.proceed()).unwrap();
        router.middleware("/b", |_, _, next| next.proceed()).unwrap();
        assert_eq!(router.routes(ALL).len(), 2);
        assert!(router.routes("GET").is_empty());
    }

    #[test]
    fn test_routes_for_unknown_method_is_empty() {
        let router: Router = Router::new();
        assert!(router.routes("TRACE").is_empty());
    }

    #[test]
    fn test_route_unknown_method_runs_nothing() {
        let calls = Arc::new(Mutex::new(0));
        let mut router: Router = Router::new();
        let counter = Arc::clone(&calls);
        router
            .middleware("/", move |_, _, next| {
                *counter.lock().unwrap() += 1;
                next.proceed()
            })
            .unwrap();

        let mut req = Request::new("PATCH", "/");
        let mut res = Response::default();
        let err = router.route("PATCH", "/", &mut req, &mut res).err().unwrap();

        assert!(matches!(err, RouterError::MethodNotFound { .. }));
        assert_eq!(*calls.lock().unwrap(), 0);
    }

    #[tokio::test]
    async fn test_handle_translates_outcomes() {
        let mut router: Router = Router::new();
        router
            .get("/hello", |_, res, next| {
                res.send(200, "Hello, World!");
                next.proceed()
            })
            .unwrap()
            .get("/boom", |_, _, next| next.fail("boom"))
            .unwrap()
            .get("/quiet", |_, _, next| next.proceed())
            .unwrap();

        let res = router.handle(Request::get("/hello")).await;
        assert_eq!(res.status, 200);
        assert_eq!(res.body_string(), Some("Hello, World!".to_string()));

        assert_eq!(router.handle(Request::get("/boom")).await.status, 500);
        assert_eq!(router.handle(Request::get("/quiet")).await.status, 404);
        assert_eq!(router.handle(Request::get("/missing")).await.status, 404);
        assert_eq!(router.handle(Request::new("PUT", "/hello")).await.status, 405);
    }

    #[tokio::test]
    async fn test_handle_keeps_finished_response_past_error_handler() {
        let mut router: Router = Router::new();
        router
            .get("/late", |_, res, next| {
                res.send(202, "accepted");
                next.fail("after send")
            })
            .unwrap()
            .error("/late", |_, res, next| {
                res.send(500, "unreachable");
                next.propagate()
            })
            .unwrap();

        let res = router.handle(Request::get("/late")).await;
        assert!(res.finished);
        assert_eq!(res.status, 202);
        assert_eq!(res.body_string(), Some("accepted".to_string()));
    }
}
