//! Error types for value synthesis.
//!
//! The taxonomy has three tiers: programmer errors (`InvalidArgument`), a
//! factory declining a shape it cannot build (`UnsupportedType`, recovered by the
//! resolver exactly once through the fallback factory), and hard failures that
//! abort the run (`CannotSynthesizeValue`).

use thiserror::Error;

/// Result type alias for prefab operations
pub type Result<T> = std::result::Result<T, PrefabError>;

/// Errors raised while describing types or synthesizing values
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PrefabError {
    /// Malformed input from the caller, e.g. an empty type identity
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    /// A specific factory cannot handle the requested shape
    #[error("Unsupported type {identity}: {reason}")]
    UnsupportedType { identity: String, reason: String },

    /// Neither a registered factory nor the fallback could produce values
    #[error("Cannot synthesize a value for {identity}: {reason}")]
    CannotSynthesizeValue { identity: String, reason: String },
}

impl PrefabError {
    /// Create an invalid argument error
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Create an unsupported type error
    pub fn unsupported(identity: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::UnsupportedType {
            identity: identity.into(),
            reason: reason.into(),
        }
    }

    /// Create a fatal synthesis error
    pub fn cannot_synthesize(identity: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::CannotSynthesizeValue {
            identity: identity.into(),
            reason: reason.into(),
        }
    }

    /// Turn a declined shape into a fatal failure, leaving other errors untouched.
    ///
    /// Used once the fallback has also been tried: at that point nothing else
    /// can recover the shape.
    pub fn into_fatal(self) -> Self {
        match self {
            Self::UnsupportedType { identity, reason } => {
                Self::CannotSynthesizeValue { identity, reason }
            }
            other => other,
        }
    }

    /// Whether a factory declined the shape (and the fallback may still succeed)
    pub fn is_unsupported(&self) -> bool {
        matches!(self, Self::UnsupportedType { .. })
    }

    /// The type identity this error is about, if any
    pub fn identity(&self) -> Option<&str> {
        match self {
            Self::InvalidArgument { .. } => None,
            Self::UnsupportedType { identity, .. } | Self::CannotSynthesizeValue { identity, .. } => {
                Some(identity)
            }
        }
    }
}
