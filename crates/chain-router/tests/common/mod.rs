#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use chain_router::{Flow, Next, Request, Response};

/// Shared log of the handler steps that ran, in order.
#[derive(Clone, Default)]
pub struct Trail(Arc<Mutex<Vec<String>>>);

impl Trail {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, step: impl Into<String>) {
        self.0.lock().unwrap().push(step.into());
    }

    pub fn steps(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }

    /// A handler that records `name` and continues.
    pub fn step(
        &self,
        name: &'static str,
    ) -> impl for<'a> Fn(&'a mut Request, &'a mut Response, Next) -> Flow<'a> + Send + Sync + 'static
    {
        let trail = self.clone();
        move |_, _, next| {
            trail.push(name);
            next.proceed()
        }
    }

    /// A handler that records `name` and fails with `error`.
    pub fn failing(
        &self,
        name: &'static str,
        error: &'static str,
    ) -> impl for<'a> Fn(&'a mut Request, &'a mut Response, Next) -> Flow<'a> + Send + Sync + 'static
    {
        let trail = self.clone();
        move |_, _, next| {
            trail.push(name);
            next.fail(error)
        }
    }

    /// An error handler that records `name` with the error it saw and
    /// resolves it.
    pub fn recovering(
        &self,
        name: &'static str,
    ) -> impl for<'a> Fn(&'a mut Request, &'a mut Response, Next) -> Flow<'a> + Send + Sync + 'static
    {
        let trail = self.clone();
        move |_, _, next| {
            trail.push(format!("{name}({})", describe(&next)));
            next.proceed()
        }
    }

    /// An error handler that records `name` with the error it saw and
    /// re-raises it.
    pub fn rethrowing(
        &self,
        name: &'static str,
    ) -> impl for<'a> Fn(&'a mut Request, &'a mut Response, Next) -> Flow<'a> + Send + Sync + 'static
    {
        let trail = self.clone();
        move |_, _, next| {
            trail.push(format!("{name}({})", describe(&next)));
            next.propagate()
        }
    }
}

fn describe(next: &Next) -> String {
    next.error().map(ToString::to_string).unwrap_or_default()
}

/// Dispatches `method path` against fresh request and response values.
pub async fn dispatch(
    router: &chain_router::Router,
    method: &str,
    path: &str,
) -> (Request, Response, Result<(), chain_router::BoxError>) {
    let mut req = Request::new(method, path);
    let mut res = Response::default();
    let outcome = router
        .route(method, path, &mut req, &mut res)
        .unwrap_or_else(|e| panic!("Failed to route {method} {path}: {e}"))
        .await;
    (req, res, outcome)
}
