//! Error types for sqlweave.

use thiserror::Error;

/// The main error type for sqlweave operations.
#[derive(Debug, Error)]
pub enum WeaveError {
    /// Failed to parse the template text.
    #[error("Parse error at position {position}: {message}")]
    Parse { position: usize, message: String },

    /// Expression evaluation failed (missing variable or attribute,
    /// wrong arity or argument type, calling a non-callable value).
    #[error("Eval error: {0}")]
    Eval(String),

    /// A reference string did not resolve to a known resource.
    #[error("Resolution error: unknown resource: '{0}'")]
    Resolution(String),

    /// No macro registered under the active dialect, and no default
    /// pack implementation covers the name.
    #[error("No macro named '{name}' for dialect '{dialect}'")]
    NoSuchMacro { dialect: String, name: String },

    /// Malformed caller input outside of template text.
    #[error("Invalid input: {0}")]
    Invalid(String),

    /// IO error (CLI file handling).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl WeaveError {
    /// Create a parse error at the given byte offset.
    pub fn parse(position: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            position,
            message: message.into(),
        }
    }

    /// Create an evaluation error.
    pub fn eval(message: impl Into<String>) -> Self {
        Self::Eval(message.into())
    }

    /// Create a missing-resource error.
    pub fn resolution(reference: impl Into<String>) -> Self {
        Self::Resolution(reference.into())
    }

    /// Create a macro-lookup error.
    pub fn no_such_macro(dialect: impl Into<String>, name: impl Into<String>) -> Self {
        Self::NoSuchMacro {
            dialect: dialect.into(),
            name: name.into(),
        }
    }
}

/// Result type alias for sqlweave operations.
pub type WeaveResult<T> = Result<T, WeaveError>;
