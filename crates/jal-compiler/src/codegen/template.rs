//! Placeholder substitution
//!
//! Templates reference pool entries as `{{ a.b.c }}`. Rendering replaces each
//! placeholder with the leaf found at that dotted path in the data pool.
//! A placeholder without a leaf is an error, never an empty string.

use crate::error::{CompilerError, Result};
use jal_runtime::{display_path, Path, Tree};
use regex::Regex;
use std::sync::OnceLock;

fn placeholder_regex() -> &'static Regex {
    static PLACEHOLDER: OnceLock<Regex> = OnceLock::new();
    PLACEHOLDER.get_or_init(|| {
        Regex::new(r"\{\{\s*([^{}\s]+)\s*\}\}").expect("placeholder pattern is valid")
    })
}

/// Placeholder text for `path`
pub fn placeholder(path: &[String]) -> String {
    format!("{{{{ {} }}}}", display_path(path))
}

pub fn render(template: &str, data: &Tree<String>) -> Result<String> {
    let mut out = String::with_capacity(template.len());
    let mut last = 0;

    for caps in placeholder_regex().captures_iter(template) {
        let (Some(whole), Some(key)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        let path: Path = key.as_str().split('.').map(str::to_string).collect();
        let value = data
            .get_leaf(&path)
            .ok_or_else(|| CompilerError::UndeclaredReference(key.as_str().to_string()))?;

        out.push_str(&template[last..whole.start()]);
        out.push_str(value);
        last = whole.end();
    }

    out.push_str(&template[last..]);
    Ok(out)
}
