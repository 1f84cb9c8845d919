//! Error taxonomy shared by every stage of inflation.
//!
//! Data absence (a missing path, a `Null` collection) is never an error; it
//! resolves to [`Value::Null`](crate::value::Value::Null). The variants below
//! cover malformed expressions, wrong-variant access, unknown node types and
//! structurally invalid templates.

/// Errors produced while parsing templates, evaluating bindings, or building
/// the live node tree.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Malformed expression, unknown function, bad path syntax, or an
    /// attribute that cannot accept the reference kind it was given.
    #[error("binding error: {0}")]
    Binding(String),

    /// A value was accessed as the wrong variant, or a function received an
    /// argument it cannot use.
    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch { expected: String, found: String },

    /// No parser is registered for the node type.
    #[error("unknown node type '{0}'")]
    UnknownType(String),

    /// Structurally invalid template (children configuration, nesting).
    #[error("template error: {0}")]
    Template(String),

    /// An external resolver had nothing for the reference. Handlers recover
    /// from this locally; it only escapes when a caller asks for it directly.
    #[error("resource unavailable: {0}")]
    ResourceUnavailable(String),

    /// Template or data text was not valid JSON.
    #[error("invalid json: {0}")]
    Json(#[from] serde_json::Error),

    /// Template text was not valid XML.
    #[error("invalid xml: {0}")]
    Xml(String),
}

impl Error {
    /// Shorthand for [`Error::Binding`].
    pub fn binding(message: impl Into<String>) -> Self {
        Error::Binding(message.into())
    }

    /// Shorthand for [`Error::Template`].
    pub fn template(message: impl Into<String>) -> Self {
        Error::Template(message.into())
    }

    /// Shorthand for [`Error::TypeMismatch`].
    pub fn mismatch(expected: impl Into<String>, found: impl Into<String>) -> Self {
        Error::TypeMismatch {
            expected: expected.into(),
            found: found.into(),
        }
    }
}

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        Error::Xml(err.to_string())
    }
}

/// Crate-wide result alias.
pub type Result<T, E = Error> = std::result::Result<T, E>;
