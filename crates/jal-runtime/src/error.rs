//! Error types for the JAL runtime

use thiserror::Error;

/// Result type alias for runtime operations
pub type Result<T> = std::result::Result<T, RuntimeError>;

/// Errors raised by path-addressed trees and the transformation pipeline
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RuntimeError {
    /// Conversion link not of the form `<source>-<target>`
    #[error("Invalid conversion link: {0}")]
    InvalidLink(String),

    /// Node type the transformation graph does not know about
    #[error("Unknown conversion node type: {0}")]
    UnknownNodeType(String),

    /// Pair of node types with no edge in the transformation graph
    #[error("Unsupported conversion: {from} -> {to}")]
    UnsupportedConversion { from: String, to: String },

    /// A link whose source type does not match the value produced so far
    #[error("Conversion chain mismatch: expected {expected} input, got {found}")]
    ChainMismatch { expected: String, found: String },

    /// Raw or intermediate value rejected by a conversion step
    #[error("Invalid {node} value: {reason}")]
    InvalidValue { node: String, reason: String },

    /// Transformation requested with no links at all
    #[error("Conversion chain must not be empty")]
    EmptyChain,

    /// `put` walked into a leaf where a node was needed, or vice versa
    #[error("Path conflict at {0}")]
    PathConflict(String),

    /// Operation on a zero-length path
    #[error("Path must not be empty")]
    EmptyPath,
}

impl RuntimeError {
    pub fn invalid_value(node: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            node: node.into(),
            reason: reason.into(),
        }
    }

    pub fn unsupported_conversion(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self::UnsupportedConversion {
            from: from.into(),
            to: to.into(),
        }
    }

    pub fn path_conflict(path: impl Into<String>) -> Self {
        Self::PathConflict(path.into())
    }
}
