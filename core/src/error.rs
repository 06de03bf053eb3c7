//! Error types for signature compilation, token population and file loading.
//!
//! All failures are synchronous and propagate to the immediate caller. A
//! failed [`populate`](crate::Registry::populate) leaves earlier tokens of the
//! same batch applied; nothing is rolled back.

use thiserror::Error;

/// Errors raised while reading signatures or populating a registry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SignatureError {
    /// A literal signature definition is neither a boolean nor a string.
    #[error("unexpected signature type : {0}")]
    SignatureType(String),

    /// A descriptor field carries a value of the wrong kind.
    #[error("invalid signature descriptor for '{key}': {field} must be {expected}")]
    InvalidDescriptor {
        /// Schema key of the offending definition.
        key: String,
        /// Descriptor field name (e.g. `type`, `params`).
        field: String,
        /// Human-readable description of the accepted values.
        expected: String,
    },

    /// A descriptor references a handler id missing from the handler table.
    #[error("unknown handler: {0}")]
    UnknownHandler(String),

    /// A token resolved to a name that has no registered parameter.
    #[error("unknown param: {0}")]
    UnknownParam(String),

    /// An array parameter received a value outside its declared `enum`.
    #[error("{name} param value must be one of {allowed} (not {value})")]
    EnumViolation {
        /// Resolved parameter name from the token.
        name: String,
        /// Comma-joined list of allowed values.
        allowed: String,
        /// The rejected value.
        value: String,
    },

    /// A dashed parameter name was used while one of its ancestors is not
    /// registered.
    #[error("{token} must be used with -{parent}")]
    MissingParent {
        /// The raw token being populated.
        token: String,
        /// The first missing ancestor name.
        parent: String,
    },
}

/// Convenience alias for results with [`SignatureError`].
pub type Result<T> = std::result::Result<T, SignatureError>;

/// Errors that can occur while loading a signature file from disk.
#[derive(Debug, Error)]
pub enum LoadError {
    /// File I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing failure.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML parsing failure.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// The file extension is not one of `json`, `yaml` or `yml`.
    #[error("unsupported signature file format: {0}")]
    UnsupportedFormat(String),

    /// The document parsed but is not a valid signature map.
    #[error(transparent)]
    Signature(#[from] SignatureError),
}
