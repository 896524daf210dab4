//! Input projection
//!
//! Splits a resolved value pool into the inputs a generated program is
//! invoked with: an ordered list of private values and, for the zk-program
//! shape, a flat map of public values keyed by sanitized identifiers.

use crate::error::{CompilerError, Result};
use crate::naming::{public_input_key, NameRegistry};
use crate::resolver::ValuePool;
use crate::variable::{is_public, InputSchema, Target};
use jal_runtime::{display_path, TypedValue};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Values a generated program is invoked with
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgramInput {
    /// Private values in canonical path order
    pub private_input: Vec<TypedValue>,
    /// Public values by identifier; `None` for the smart-contract shape
    pub public_input: Option<BTreeMap<String, TypedValue>>,
}

impl ProgramInput {
    /// Number of values across both parts
    pub fn len(&self) -> usize {
        self.private_input.len() + self.public_input.as_ref().map_or(0, BTreeMap::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Projects `pool` onto the input shape of `target`.
///
/// Every schema leaf lands in exactly one place. On the smart-contract shape
/// public leaves are dropped with a warning and `public_input` is `None`.
pub fn project(schema: &InputSchema, pool: &ValuePool, target: Target) -> Result<ProgramInput> {
    let mut private_input = Vec::new();
    let mut public_input = BTreeMap::new();
    let mut names = NameRegistry::new();

    for (path, _) in schema.leaves() {
        let value = pool.get_leaf(&path).cloned().ok_or_else(|| {
            CompilerError::Internal(format!("No resolved value for {}", display_path(&path)))
        })?;

        if !is_public(&path) {
            private_input.push(value);
            continue;
        }

        match target {
            Target::ZkProgram => {
                let key = public_input_key(&path);
                names.claim(&key, &path)?;
                public_input.insert(key, value);
            }
            Target::SmartContract => {
                warn!(
                    path = %display_path(&path),
                    "smart contracts take no public input, ignoring variable"
                );
            }
        }
    }

    debug!(
        shape = %target,
        private = private_input.len(),
        public = public_input.len(),
        "projected program input"
    );

    let public_input = match target {
        Target::ZkProgram => Some(public_input),
        Target::SmartContract => None,
    };
    Ok(ProgramInput {
        private_input,
        public_input,
    })
}
