//! Router configuration.

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Methods enabled on every router before any configuration is applied.
pub const DEFAULT_METHODS: [&str; 3] = ["ALL", "GET", "POST"];

/// Construction-time settings for a [`Router`](crate::Router).
///
/// # Example
///
/// ```
/// use chain_router::RouterConfig;
///
/// let config = RouterConfig::from_json(r#"{"methods": ["PUT", "DELETE"]}"#).unwrap();
/// assert_eq!(config.methods, ["PUT", "DELETE"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouterConfig {
    /// Extra methods to enable on top of [`DEFAULT_METHODS`].
    pub methods: Vec<String>,
}

impl RouterConfig {
    /// Creates an empty configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a method to enable.
    #[must_use]
    pub fn method(mut self, method: impl Into<String>) -> Self {
        self.methods.push(method.into());
        self
    }

    /// Parses a configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RouterError;

    #[test]
    fn test_empty_json_uses_defaults() {
        let config = RouterConfig::from_json("{}").unwrap();
        assert_eq!(config, RouterConfig::default());
    }

    #[test]
    fn test_builder() {
        let config = RouterConfig::new().method("PUT").method("PATCH");
        assert_eq!(config.methods, ["PUT", "PATCH"]);
    }

    #[test]
    fn test_invalid_json() {
        let err = RouterConfig::from_json(r#"{"methods": 3}"#).unwrap_err();
        assert!(matches!(err, RouterError::Config(_)));
    }
}
