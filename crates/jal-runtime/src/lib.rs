//! JAL Runtime
//!
//! Shared building blocks for the JAL toolkit: path-addressed trees, typed
//! values, and the value transformation pipeline that turns raw scalars into
//! o1js circuit values.

mod country;
pub mod error;
pub mod path;
pub mod transform;
pub mod types;

// Re-export core types for convenience
pub use error::{Result, RuntimeError};
pub use path::{display_path, path_of, Path, Tree};
pub use transform::{TrGraph, Transformer, CIRCUIT_STRING_MAX_LENGTH};
pub use types::{field_from_u128, field_to_hex, field_to_u128, Link, NodeType, TypedValue};
