//! Compiler error types

use jal_runtime::RuntimeError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CompilerError {
    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Invalid JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Target program {0} is not supported")]
    UnsupportedTarget(String),

    #[error("Transformation of {path} failed: {source}")]
    TransformError {
        path: String,
        #[source]
        source: RuntimeError,
    },

    #[error("Missing setup value for {0}")]
    MissingSetupValue(String),

    #[error("Constant variable with name \"{0}\" is not provided")]
    UnknownConstant(String),

    #[error("Reference at {path} points to {target}, which is not a resolvable variable")]
    UnresolvedReference { path: String, target: String },

    #[error("Reference chain starting at {path} exceeds the maximum depth of {limit}")]
    ReferenceDepthExceeded { path: String, limit: usize },

    #[error("Unsupported type for o1js: {0}")]
    UnsupportedType(String),

    #[error("Unrecognized operator: {0}")]
    UnknownOperator(String),

    #[error("Operator {operator} expects {expected} operand(s), got {found}")]
    InvalidArity {
        operator: String,
        expected: String,
        found: usize,
    },

    #[error("Invalid operand for {operator}: {reason}")]
    InvalidOperand { operator: String, reason: String },

    #[error("Transformation link {0} is not supported by the transform function")]
    UnsupportedTransform(String),

    #[error("Reference to undeclared path {0}")]
    UndeclaredReference(String),

    #[error("Expression nesting exceeds the maximum depth of {0}")]
    ExpressionDepthExceeded(usize),

    #[error("Output name {0} is already declared")]
    DuplicateOutput(String),

    #[error("Paths {first} and {second} both map to identifier {name}")]
    NameCollision {
        name: String,
        first: String,
        second: String,
    },

    #[error(transparent)]
    RuntimeError(#[from] RuntimeError),

    #[error("Invalid compiler configuration: {0}")]
    InvalidConfig(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Coarse classification of compiler failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Malformed program, schema or setup document
    Input,
    /// Problems in the input schema or its setup payload
    Schema,
    /// Problems in the command list
    Operation,
    /// Unsupported target identifier
    Entry,
    /// Invalid `CodegenConfig` settings
    Config,
    /// Broken invariant between compiler stages
    Internal,
}

impl CompilerError {
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::ParseError(msg.into())
    }

    pub fn transform(path: impl Into<String>, source: RuntimeError) -> Self {
        Self::TransformError {
            path: path.into(),
            source,
        }
    }

    pub fn arity(operator: impl Into<String>, expected: impl Into<String>, found: usize) -> Self {
        Self::InvalidArity {
            operator: operator.into(),
            expected: expected.into(),
            found,
        }
    }

    pub fn invalid_operand(operator: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidOperand {
            operator: operator.into(),
            reason: reason.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            CompilerError::ParseError(_)
            | CompilerError::JsonError(_)
            | CompilerError::IoError(_) => ErrorCategory::Input,
            CompilerError::UnsupportedTarget(_) => ErrorCategory::Entry,
            CompilerError::TransformError { .. }
            | CompilerError::MissingSetupValue(_)
            | CompilerError::UnknownConstant(_)
            | CompilerError::UnresolvedReference { .. }
            | CompilerError::ReferenceDepthExceeded { .. }
            | CompilerError::UnsupportedType(_)
            | CompilerError::NameCollision { .. }
            | CompilerError::RuntimeError(_) => ErrorCategory::Schema,
            CompilerError::UnknownOperator(_)
            | CompilerError::InvalidArity { .. }
            | CompilerError::InvalidOperand { .. }
            | CompilerError::UnsupportedTransform(_)
            | CompilerError::UndeclaredReference(_)
            | CompilerError::ExpressionDepthExceeded(_)
            | CompilerError::DuplicateOutput(_) => ErrorCategory::Operation,
            CompilerError::InvalidConfig(_) => ErrorCategory::Config,
            CompilerError::Internal(_) => ErrorCategory::Internal,
        }
    }
}

pub type Result<T> = std::result::Result<T, CompilerError>;
