//! Name, type and data pools
//!
//! Pools are trees shaped like the input schema. The name pool maps every
//! declared path to the identifier the generated program uses for it, the
//! type pool maps it to its o1js type token. Both are merged into the data
//! pool the template renderer reads placeholders from.

use crate::constants::constant_info;
use crate::error::{CompilerError, Result};
use crate::naming::{identifier, public_input_key, NameRegistry, PUBLIC_INPUT_ACCESSOR};
use crate::resolver::follow_references;
use crate::variable::{
    is_public, ConversionChain, InputSchema, Target, Variable, PRIVATE_REGION, PUBLIC_REGION,
};
use jal_runtime::{display_path, Path, Tree};

/// Root of the type pool inside the data pool
pub const VARIABLE_TYPES: &str = "VARIABLE_TYPES";

/// Root of the public input keys inside the data pool
pub const PUBLIC_INPUT_NAMES: &str = "PUBLIC_INPUT_NAMES";

/// Final chain types and the o1js types they map to
pub const TYPE_TOKENS: [(&str, &str); 6] = [
    ("field", "Field"),
    ("publickey", "PublicKey"),
    ("uint64", "UInt64"),
    ("bool", "Bool"),
    ("signature", "Signature"),
    ("string", "CircuitString"),
];

pub fn type_token(final_type: &str) -> Result<&'static str> {
    TYPE_TOKENS
        .iter()
        .find(|(name, _)| *name == final_type)
        .map(|(_, token)| *token)
        .ok_or_else(|| CompilerError::UnsupportedType(final_type.to_string()))
}

/// Root keys an output name can never take
const RESERVED_ROOTS: [&str; 5] = [
    PRIVATE_REGION,
    PUBLIC_REGION,
    VARIABLE_TYPES,
    PUBLIC_INPUT_NAMES,
    PUBLIC_INPUT_ACCESSOR,
];

pub type TypePool = Tree<String>;

/// Identifiers for declared schema paths and command outputs
#[derive(Debug, Clone, Default)]
pub struct NamePool {
    names: Tree<String>,
    registry: NameRegistry,
}

impl NamePool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the name pool for `paths` on the given program shape.
    ///
    /// zk-program public paths become `publicInput.<key>`, everything else is
    /// the sanitized path joined with `_`.
    pub fn for_paths(paths: &[Path], target: Target) -> Result<Self> {
        let mut pool = Self::new();
        for path in paths {
            let name = match target {
                Target::ZkProgram if is_public(path) => {
                    format!("{}.{}", PUBLIC_INPUT_ACCESSOR, public_input_key(path))
                }
                _ => identifier(path),
            };
            pool.declare(path, name)?;
        }
        Ok(pool)
    }

    pub fn declare(&mut self, path: &[String], name: String) -> Result<()> {
        self.registry.claim(&name, path)?;
        self.names.put(path, name)?;
        Ok(())
    }

    /// Declares a command output, reachable as a reference to `[name]`
    pub fn register_output(&mut self, name: &str) -> Result<()> {
        let path = vec![name.to_string()];
        if RESERVED_ROOTS.contains(&name)
            || self.names.get(&path).is_some()
            || self.registry.is_taken(name)
        {
            return Err(CompilerError::DuplicateOutput(name.to_string()));
        }
        self.declare(&path, name.to_string())
    }

    pub fn contains(&self, path: &[String]) -> bool {
        self.names.get_leaf(path).is_some()
    }

    pub fn get(&self, path: &[String]) -> Option<&str> {
        self.names.get_leaf(path).map(String::as_str)
    }

    pub fn tree(&self) -> &Tree<String> {
        &self.names
    }
}

/// Schema paths that become program inputs on the given shape
pub fn variable_paths(schema: &InputSchema, target: Target) -> Vec<Path> {
    schema
        .leaves()
        .into_iter()
        .map(|(path, _)| path)
        .filter(|path| target == Target::ZkProgram || !is_public(path))
        .collect()
}

/// Conversion chain a materializable variable ends in
pub fn variable_chain(variable: &Variable) -> Result<ConversionChain> {
    match variable {
        Variable::Static(var) => Ok(var.chain.clone()),
        Variable::Setup(var) => Ok(var.chain.clone()),
        Variable::Constant(var) => constant_info(&var.name)?.chain(),
        other => Err(CompilerError::Internal(format!(
            "{} variable has no conversion chain",
            other.kind()
        ))),
    }
}

/// Maps every path to the type token of the variable its reference chain ends in
pub fn build_type_pool(
    schema: &InputSchema,
    paths: &[Path],
    max_reference_depth: usize,
) -> Result<TypePool> {
    let mut pool = TypePool::new();
    for path in paths {
        let (_, variable) = follow_references(schema, path, max_reference_depth)?;
        let chain = variable_chain(variable)?;
        let token = type_token(chain.final_type()).map_err(|err| match err {
            CompilerError::UnsupportedType(ty) => {
                CompilerError::UnsupportedType(format!("{} (at {})", ty, display_path(path)))
            }
            other => other,
        })?;
        pool.put(path, token.to_string())?;
    }
    Ok(pool)
}

/// Public input keys for the zk-program `PublicInput` struct
pub fn build_public_input_names(paths: &[Path]) -> Result<Tree<String>> {
    let mut names = Tree::new();
    for path in paths.iter().filter(|path| is_public(path)) {
        names.put(path, public_input_key(path))?;
    }
    Ok(names)
}

/// `path` moved under `root` of the data pool
pub fn pooled(root: &str, path: &[String]) -> Path {
    let mut full = Vec::with_capacity(path.len() + 1);
    full.push(root.to_string());
    full.extend_from_slice(path);
    full
}

/// Name pool at the root, type pool under [`VARIABLE_TYPES`], public keys
/// under [`PUBLIC_INPUT_NAMES`]
pub fn data_pool(
    names: &NamePool,
    types: &TypePool,
    public_names: &Tree<String>,
) -> Result<Tree<String>> {
    let mut data = names.tree().clone();
    for (root, tree) in [(VARIABLE_TYPES, types), (PUBLIC_INPUT_NAMES, public_names)] {
        for (path, value) in tree.leaves() {
            data.put(&pooled(root, &path), value.clone())?;
        }
    }
    Ok(data)
}
