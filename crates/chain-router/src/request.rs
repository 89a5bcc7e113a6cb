//! Request side of an exchange.

use std::collections::HashMap;

/// What the router needs from a request: a mutable parameter map.
pub trait RouteRequest {
    /// Returns the parameters extracted so far.
    fn params(&self) -> &PathParams;

    /// Returns the parameter map for writing.
    fn params_mut(&mut self) -> &mut PathParams;
}

/// Path parameters extracted from the URL.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathParams {
    params: HashMap<String, String>,
}

impl PathParams {
    /// Creates new empty path params.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a parameter, overwriting any previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.params.insert(key.into(), value.into());
    }

    /// Gets a parameter value.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    /// Parses a parameter as a specific type.
    pub fn parse<T: std::str::FromStr>(&self, key: &str) -> Option<T> {
        self.get(key).and_then(|v| v.parse().ok())
    }

    /// Returns the number of parameters.
    pub fn len(&self) -> usize {
        self.params.len()
    }

    /// Returns true if no parameter has been set.
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Removes every parameter.
    pub fn clear(&mut self) {
        self.params.clear();
    }
}

/// A minimal HTTP-like request.
#[derive(Debug, Clone)]
pub struct Request {
    /// Method name, e.g. `GET`.
    pub method: String,
    /// Request path.
    pub path: String,
    /// Path parameters extracted from URL patterns.
    pub params: PathParams,
    /// Request headers.
    pub headers: HashMap<String, String>,
}

impl Request {
    /// Creates a new request.
    pub fn new(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
            params: PathParams::new(),
            headers: HashMap::new(),
        }
    }

    /// Creates a GET request.
    pub fn get(path: impl Into<String>) -> Self {
        Self::new("GET", path)
    }

    /// Creates a POST request.
    pub fn post(path: impl Into<String>) -> Self {
        Self::new("POST", path)
    }
}

impl RouteRequest for Request {
    fn params(&self) -> &PathParams {
        &self.params
    }

    fn params_mut(&mut self) -> &mut PathParams {
        &mut self.params
    }
}
