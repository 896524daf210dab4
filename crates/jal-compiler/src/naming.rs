//! Identifier generation for schema paths

use crate::error::{CompilerError, Result};
use jal_runtime::{display_path, Path};
use regex::Regex;
use std::collections::BTreeMap;
use std::sync::OnceLock;

/// Accessor the zk-program method uses for its structured public input
pub const PUBLIC_INPUT_ACCESSOR: &str = "publicInput";

fn identifier_regex() -> &'static Regex {
    static IDENTIFIER: OnceLock<Regex> = OnceLock::new();
    IDENTIFIER.get_or_init(|| {
        Regex::new(r"^[A-Za-z_$][A-Za-z0-9_$]*$").expect("identifier pattern is valid")
    })
}

/// Replaces every character outside `[A-Za-z0-9_$]` with `_`
pub fn sanitize(segment: &str) -> String {
    segment
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '$' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Joins sanitized segments with `_`; a leading digit gets a `_` prefix
pub fn identifier(segments: &[String]) -> String {
    let joined = segments
        .iter()
        .map(|s| sanitize(s))
        .collect::<Vec<_>>()
        .join("_");
    if joined.starts_with(|c: char| c.is_ascii_digit()) {
        format!("_{}", joined)
    } else {
        joined
    }
}

/// Key of a public-region path inside the public input object (region segment dropped)
pub fn public_input_key(path: &[String]) -> String {
    identifier(path.get(1..).unwrap_or_default())
}

pub fn is_identifier(name: &str) -> bool {
    identifier_regex().is_match(name)
}

/// Tracks generated identifiers so two paths never share one
#[derive(Debug, Clone, Default)]
pub struct NameRegistry {
    taken: BTreeMap<String, Path>,
}

impl NameRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_taken(&self, name: &str) -> bool {
        self.taken.contains_key(name)
    }

    pub fn claim(&mut self, name: &str, path: &[String]) -> Result<()> {
        if let Some(owner) = self.taken.get(name) {
            return Err(CompilerError::NameCollision {
                name: name.to_string(),
                first: display_path(owner),
                second: display_path(path),
            });
        }
        self.taken.insert(name.to_string(), path.to_vec());
        Ok(())
    }
}
