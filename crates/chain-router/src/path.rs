//! Path compilation and matching.
//!
//! A path is either a `/`-separated string pattern, where a segment starting
//! with `:` captures a named parameter, or an already compiled matcher that
//! is passed through untouched.

use std::fmt;
use std::sync::Arc;

use regex::Regex;

use crate::error::{Result, RouterError};
use crate::request::PathParams;

/// Capture used for a `:name` segment.
const PARAM_CAPTURE: &str = r"/([^/\s]+)";

/// A pre-compiled path matcher.
///
/// The returned regex is used as the exact-match test for the path, so it
/// should be anchored by the implementor. Returning `None` marks the object as
/// malformed; this is only detected when a dispatch first evaluates it.
pub trait ExactMatch: fmt::Debug + Send + Sync {
    /// Returns the regex that tests a whole path, if there is one.
    fn regex(&self) -> Option<&Regex>;
}

impl ExactMatch for Regex {
    fn regex(&self) -> Option<&Regex> {
        Some(self)
    }
}

/// What a route is registered against.
#[derive(Debug, Clone)]
pub enum PathSpec {
    /// A string pattern such as `/users/:id`.
    Pattern(String),
    /// A matcher supplied by the caller.
    Compiled(Arc<dyn ExactMatch>),
}

impl From<&str> for PathSpec {
    fn from(pattern: &str) -> Self {
        Self::Pattern(pattern.to_string())
    }
}

impl From<String> for PathSpec {
    fn from(pattern: String) -> Self {
        Self::Pattern(pattern)
    }
}

impl From<Regex> for PathSpec {
    fn from(regex: Regex) -> Self {
        Self::Compiled(Arc::new(regex))
    }
}

impl From<Arc<dyn ExactMatch>> for PathSpec {
    fn from(matcher: Arc<dyn ExactMatch>) -> Self {
        Self::Compiled(matcher)
    }
}

/// A segment in a string pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
enum PathSegment<'a> {
    /// A literal segment, matched after escaping.
    Literal(&'a str),
    /// A parameter segment (e.g., `:id`).
    Param(&'a str),
}

impl<'a> PathSegment<'a> {
    fn parse(pattern: &'a str) -> Vec<Self> {
        pattern
            .strip_prefix('/')
            .unwrap_or(pattern)
            .split('/')
            .map(|part| match part.strip_prefix(':') {
                Some(name) => Self::Param(name),
                None => Self::Literal(part),
            })
            .collect()
    }
}

#[derive(Debug, Clone)]
enum Matcher {
    Regex(Regex),
    External(Arc<dyn ExactMatch>),
}

/// A compiled path: an exact-match test plus the ordered parameter names.
///
/// Built once at registration and never mutated afterwards.
#[derive(Debug, Clone)]
pub struct CompiledPath {
    source: String,
    matcher: Matcher,
    param_names: Vec<String>,
}

impl CompiledPath {
    /// Compiles a path specification.
    ///
    /// # Example
    ///
    /// ```
    /// use chain_router::{CompiledPath, PathParams};
    ///
    /// let path = CompiledPath::compile("/users/:id/:action").unwrap();
    /// let mut params = PathParams::new();
    /// assert!(path.extract("/users/42/edit", &mut params).unwrap());
    /// assert_eq!(params.get("id"), Some("42"));
    /// assert_eq!(params.get("action"), Some("edit"));
    /// ```
    pub fn compile(spec: impl Into<PathSpec>) -> Result<Self> {
        match spec.into() {
            PathSpec::Pattern(pattern) => Self::from_pattern(&pattern),
            PathSpec::Compiled(matcher) => Ok(Self {
                source: format!("{matcher:?}"),
                matcher: Matcher::External(matcher),
                param_names: Vec::new(),
            }),
        }
    }

    fn from_pattern(pattern: &str) -> Result<Self> {
        let mut param_names = Vec::new();
        let mut regex_str = String::from("^");

        for segment in PathSegment::parse(pattern) {
            match segment {
                PathSegment::Param(name) => {
                    regex_str.push_str(PARAM_CAPTURE);
                    param_names.push(name.to_string());
                }
                PathSegment::Literal(literal) => {
                    regex_str.push('/');
                    regex_str.push_str(&regex::escape(literal));
                }
            }
        }

        regex_str.push('$');

        let regex =
            Regex::new(&regex_str).map_err(|e| RouterError::InvalidPattern(e.to_string()))?;

        Ok(Self {
            source: pattern.to_string(),
            matcher: Matcher::Regex(regex),
            param_names,
        })
    }

    fn regex(&self) -> Result<&Regex> {
        match &self.matcher {
            Matcher::Regex(regex) => Ok(regex),
            Matcher::External(external) => {
                external.regex().ok_or_else(|| RouterError::InvalidFormat {
                    pattern: self.source.clone(),
                })
            }
        }
    }

    /// Tests whether `path` matches exactly.
    ///
    /// Fails with [`RouterError::InvalidFormat`] for a malformed pre-compiled
    /// matcher.
    pub fn matches(&self, path: &str) -> Result<bool> {
        Ok(self.regex()?.is_match(path))
    }

    /// Writes the captured parameters of `path` into `params`.
    ///
    /// Existing entries in `params` are kept unless a parameter of this path
    /// has the same name. Returns whether the path matched.
    pub fn extract(&self, path: &str, params: &mut PathParams) -> Result<bool> {
        let Some(caps) = self.regex()?.captures(path) else {
            return Ok(false);
        };

        for (i, name) in self.param_names.iter().enumerate() {
            if let Some(value) = caps.get(i + 1) {
                params.insert(name.clone(), value.as_str());
            }
        }

        Ok(true)
    }

    /// Returns the parameter names in left-to-right order.
    pub fn param_names(&self) -> &[String] {
        &self.param_names
    }

    /// Returns whether this path declares any parameters.
    pub fn has_params(&self) -> bool {
        !self.param_names.is_empty()
    }

    /// Returns the pattern this path was compiled from.
    pub fn source(&self) -> &str {
        &self.source
    }
}

impl fmt::Display for CompiledPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}
