//! Engine configuration.

use serde::Deserialize;

/// Configuration for an [`Engine`](crate::inflate::Engine).
///
/// Deserializable so hosts can ship it next to their templates; missing
/// fields take their defaults.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EngineConfig {
    /// Propagate attribute binding errors instead of recovering to `Null`.
    pub strict_bindings: bool,
    /// Deepest template nesting accepted before building fails.
    pub max_depth: usize,
    /// Input pattern `date()` uses when none is given.
    pub default_date_input: String,
    /// Output pattern `date()` uses when none is given.
    pub default_date_output: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            strict_bindings: false,
            max_depth: 64,
            default_date_input: "yyyy-MM-dd HH:mm:ss".to_owned(),
            default_date_output: "E, d MMM".to_owned(),
        }
    }
}

impl EngineConfig {
    /// Create a new default config.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a config from JSON text.
    pub fn from_json(text: &str) -> crate::error::Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Set strict binding evaluation (builder).
    pub fn with_strict_bindings(mut self, strict: bool) -> Self {
        self.strict_bindings = strict;
        self
    }

    /// Set the nesting limit (builder).
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    /// Set the default `date()` patterns (builder).
    pub fn with_date_formats(mut self, input: impl Into<String>, output: impl Into<String>) -> Self {
        self.default_date_input = input.into();
        self.default_date_output = output.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = EngineConfig::default();
        assert!(!config.strict_bindings);
        assert_eq!(config.max_depth, 64);
        assert_eq!(config.default_date_output, "E, d MMM");
    }

    #[test]
    fn builder_chain() {
        let config = EngineConfig::new()
            .with_strict_bindings(true)
            .with_max_depth(8)
            .with_date_formats("dd/MM/yyyy", "yyyy");
        assert!(config.strict_bindings);
        assert_eq!(config.max_depth, 8);
        assert_eq!(config.default_date_input, "dd/MM/yyyy");
    }

    #[test]
    fn from_json_fills_missing_fields() {
        let config = EngineConfig::from_json(r#"{"strictBindings": true}"#).unwrap();
        assert!(config.strict_bindings);
        assert_eq!(config.max_depth, 64);
        assert!(EngineConfig::from_json("[]").is_err());
    }
}
