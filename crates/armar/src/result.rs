//! Result and error types for Armar.

use thiserror::Error;

/// Result type for Armar operations
pub type ArmarResult<T> = Result<T, ArmarError>;

/// Errors that can occur while building or binding a page object
#[derive(Debug, Error)]
pub enum ArmarError {
    /// No registered constructor accepts the supplied argument types
    #[error("no constructor on `{page}` accepts the supplied {arity} argument(s)")]
    NoMatchingConstructor {
        /// Page type name
        page: String,
        /// Number of arguments supplied
        arity: usize,
    },

    /// A caller-supplied constructor argument was absent, so its type
    /// cannot be inferred
    #[error("constructor argument {index} is absent; its type cannot be inferred")]
    ArgumentInference {
        /// Zero-based index among the caller-supplied arguments
        index: usize,
    },

    /// A page or control constructor failed, or no usable constructor
    /// is registered
    #[error("failed to construct `{type_name}`: {message}")]
    Construction {
        /// Type being constructed
        type_name: String,
        /// What went wrong
        message: String,
        /// Original cause, when the constructor itself failed
        #[source]
        source: Option<Box<ArmarError>>,
    },

    /// A bound value could not be assigned onto a field
    #[error("cannot assign bound value to field `{field}`: {message}")]
    Access {
        /// Field name
        field: String,
        /// What went wrong
        message: String,
    },

    /// The driver failed to resolve a locator
    #[error("element lookup failed for `{selector}`: {message}")]
    Lookup {
        /// Selector that failed
        selector: String,
        /// Driver-supplied error message, passed through unmodified
        message: String,
    },

    /// A control field was read before the factory bound it
    #[error("control field was never bound; was the page built by the factory?")]
    Unbound,

    /// JSON error (mock fixture parsing)
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ArmarError {
    /// Wrap a constructor failure, preserving the original cause.
    pub(crate) fn construction(
        type_name: impl Into<String>,
        message: impl Into<String>,
        source: Option<ArmarError>,
    ) -> Self {
        Self::Construction {
            type_name: type_name.into(),
            message: message.into(),
            source: source.map(Box::new),
        }
    }
}
