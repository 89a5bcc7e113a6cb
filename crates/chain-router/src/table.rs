//! Per-method route storage.

use std::collections::HashMap;

use tracing::debug;

use crate::error::{Result, RouterError};
use crate::middleware::Handler;
use crate::path::{CompiledPath, PathSpec};
use crate::request::PathParams;

/// The wildcard method whose entries apply to every method.
pub const ALL: &str = "ALL";

/// Role of a registered handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteKind {
    /// Runs on the normal channel.
    Middleware,
    /// Runs only once an earlier step has raised an error.
    Error,
}

/// A single registered handler with its path and global order tag.
pub struct RouteEntry<Req, Res> {
    path: CompiledPath,
    handler: Handler<Req, Res>,
    kind: RouteKind,
    sequence: u64,
}

impl<Req, Res> RouteEntry<Req, Res> {
    /// Returns the compiled path.
    pub fn path(&self) -> &CompiledPath {
        &self.path
    }

    /// Returns the registration sequence number, shared across all methods.
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    /// Returns the handler role.
    pub fn kind(&self) -> RouteKind {
        self.kind
    }

    /// Returns true for error handlers.
    pub fn is_error_handler(&self) -> bool {
        self.kind == RouteKind::Error
    }

    pub(crate) fn handler(&self) -> &Handler<Req, Res> {
        &self.handler
    }

    /// Tests `path` against this entry.
    pub fn matches(&self, path: &str) -> Result<bool> {
        self.path.matches(path)
    }

    /// Adds this entry's parameters captured from `path` to `params`.
    pub fn extract_params(&self, path: &str, params: &mut PathParams) -> Result<()> {
        if self.path.has_params() {
            self.path.extract(path, params)?;
        }
        Ok(())
    }
}

impl<Req, Res> std::fmt::Debug for RouteEntry<Req, Res> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RouteEntry")
            .field("path", &self.path.source())
            .field("kind", &self.kind)
            .field("sequence", &self.sequence)
            .finish_non_exhaustive()
    }
}

/// Entries keyed by method, plus the verb lookup table.
///
/// Grows monotonically; nothing is ever removed.
pub struct RouteTable<Req, Res> {
    routes: HashMap<String, Vec<RouteEntry<Req, Res>>>,
    verbs: HashMap<String, String>,
    next_sequence: u64,
}

impl<Req, Res> Default for RouteTable<Req, Res> {
    fn default() -> Self {
        Self {
            routes: HashMap::new(),
            verbs: HashMap::new(),
            next_sequence: 0,
        }
    }
}

impl<Req, Res> RouteTable<Req, Res> {
    /// Creates an empty table with no methods enabled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enables `method`, registering its lower-cased verb.
    ///
    /// Enabling an already enabled method changes nothing.
    pub fn enable_method(&mut self, method: &str) {
        if self.routes.contains_key(method) {
            return;
        }
        debug!(method, "enabling method");
        self.routes.insert(method.to_string(), Vec::new());
        self.verbs.insert(method.to_lowercase(), method.to_string());
    }

    /// Returns true if `method` has been enabled.
    pub fn has_method(&self, method: &str) -> bool {
        self.routes.contains_key(method)
    }

    /// Returns the method a registration verb maps to.
    pub fn method_for_verb(&self, verb: &str) -> Result<&str> {
        self.verbs
            .get(verb)
            .map(String::as_str)
            .ok_or_else(|| RouterError::UnknownVerb(verb.to_string()))
    }

    /// Returns the enabled method names, sorted.
    pub fn methods(&self) -> Vec<&str> {
        let mut methods: Vec<&str> = self.routes.keys().map(String::as_str).collect();
        methods.sort_unstable();
        methods
    }

    /// Returns the entries registered under `method`, in registration order.
    pub fn entries(&self, method: &str) -> Option<&[RouteEntry<Req, Res>]> {
        self.routes.get(method).map(Vec::as_slice)
    }

    /// Appends an entry under `method`, defaulting to [`ALL`].
    ///
    /// The method is enabled first if needed. Returns the entry's sequence
    /// number.
    pub fn add_route(
        &mut self,
        kind: RouteKind,
        method: Option<&str>,
        path: impl Into<PathSpec>,
        handler: Handler<Req, Res>,
    ) -> Result<u64> {
        let method = method.unwrap_or(ALL);
        self.enable_method(method);

        let path = CompiledPath::compile(path)?;
        let sequence = self.next_sequence;
        self.next_sequence += 1;

        debug!(method, path = path.source(), ?kind, sequence, "registering route");

        self.routes
            .entry(method.to_string())
            .or_default()
            .push(RouteEntry {
                path,
                handler,
                kind,
                sequence,
            });

        Ok(sequence)
    }

    /// Selects the chain for `method` and `path`.
    ///
    /// Wildcard and method entries whose path matches are merged and ordered
    /// by sequence. Fails if `method` is not enabled or if a malformed
    /// pre-compiled path is evaluated.
    pub fn chain(&self, method: &str, path: &str) -> Result<Vec<&RouteEntry<Req, Res>>> {
        let some = self
            .routes
            .get(method)
            .ok_or_else(|| RouterError::MethodNotFound {
                method: method.to_string(),
            })?;

        let all = if method == ALL {
            None
        } else {
            self.routes.get(ALL)
        };

        let mut chain = Vec::new();
        for entry in all.into_iter().flatten().chain(some) {
            if entry.matches(path)? {
                chain.push(entry);
            }
        }
        chain.sort_by_key(|entry| entry.sequence);

        Ok(chain)
    }
}

impl<Req, Res> std::fmt::Debug for RouteTable<Req, Res> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RouteTable")
            .field("routes", &self.routes)
            .field("next_sequence", &self.next_sequence)
            .finish_non_exhaustive()
    }
}
