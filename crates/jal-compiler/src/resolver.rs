//! Schema resolution
//!
//! Turns an input schema plus its setup payload into a value pool: a tree of
//! the same shape where every variable has been replaced by its typed value.
//!
//! Resolution runs in two phases. The first materializes static, setup and
//! constant variables through the transformation pipeline. The second copies
//! already materialized values to reference variables, following reference
//! chains through the schema. References never trigger a transformation.

use crate::constants::constant_info;
use crate::error::{CompilerError, Result};
use crate::variable::{InputSchema, Variable};
use jal_runtime::{display_path, Link, Path, Transformer, Tree, TypedValue};
use serde_json::Value;
use tracing::debug;

/// Default bound on the number of hops in a reference chain
pub const DEFAULT_MAX_REFERENCE_DEPTH: usize = 64;

/// Materialized values, shaped like the input schema
pub type ValuePool = Tree<TypedValue>;

/// Follows `path` through the schema until it reaches a non-reference variable.
///
/// Returns the terminal path with its variable. Dangling references and chains
/// longer than `max_depth` hops (which includes every cycle) are errors.
pub fn follow_references<'s>(
    schema: &'s InputSchema,
    path: &[String],
    max_depth: usize,
) -> Result<(Path, &'s Variable)> {
    let unresolved = |target: &[String]| CompilerError::UnresolvedReference {
        path: display_path(path),
        target: display_path(target),
    };

    let mut current: Path = path.to_vec();
    let mut variable = schema.get_leaf(&current).ok_or_else(|| unresolved(&current))?;
    let mut hops = 0;

    while let Variable::Reference(reference) = variable {
        hops += 1;
        if hops > max_depth {
            return Err(CompilerError::ReferenceDepthExceeded {
                path: display_path(path),
                limit: max_depth,
            });
        }
        current = reference.path.clone();
        variable = schema.get_leaf(&current).ok_or_else(|| unresolved(&current))?;
    }

    if variable.is_function() {
        return Err(unresolved(&current));
    }
    Ok((current, variable))
}

pub struct SchemaResolver<'a, T: Transformer + ?Sized> {
    schema: &'a InputSchema,
    transformer: &'a T,
    max_reference_depth: usize,
}

impl<'a, T: Transformer + ?Sized> SchemaResolver<'a, T> {
    pub fn new(schema: &'a InputSchema, transformer: &'a T) -> Self {
        Self {
            schema,
            transformer,
            max_reference_depth: DEFAULT_MAX_REFERENCE_DEPTH,
        }
    }

    pub fn with_max_reference_depth(mut self, max_reference_depth: usize) -> Self {
        self.max_reference_depth = max_reference_depth;
        self
    }

    /// Resolves every variable of the schema, or fails as a whole
    pub fn resolve(&self, setup: &Tree<Value>) -> Result<ValuePool> {
        let mut pool = Tree::new();
        let materialized = self.materialize(setup, &mut pool)?;
        let references = self.resolve_references(&mut pool)?;
        debug!(materialized, references, "resolved input schema");
        Ok(pool)
    }

    fn materialize(&self, setup: &Tree<Value>, pool: &mut ValuePool) -> Result<usize> {
        let mut count = 0;
        for (path, variable) in self.schema.leaves() {
            let value = match variable {
                Variable::Static(var) => self.apply(&path, &var.value, var.chain.links())?,
                Variable::Constant(var) => {
                    let info = constant_info(&var.name)?;
                    self.apply(&path, &info.raw_value(), info.chain()?.links())?
                }
                Variable::Setup(var) => {
                    let raw = setup
                        .get_leaf(&path)
                        .filter(|raw| !raw.is_null())
                        .ok_or_else(|| CompilerError::MissingSetupValue(display_path(&path)))?;
                    self.apply(&path, raw, var.chain.links())?
                }
                Variable::Reference(_) | Variable::Function(_) => continue,
            };
            pool.put(&path, value)?;
            count += 1;
        }
        Ok(count)
    }

    fn resolve_references(&self, pool: &mut ValuePool) -> Result<usize> {
        let paths = self.schema.paths_where(Variable::is_reference);
        for path in &paths {
            let (terminal, _) = follow_references(self.schema, path, self.max_reference_depth)?;
            let value = pool.get_leaf(&terminal).cloned().ok_or_else(|| {
                CompilerError::UnresolvedReference {
                    path: display_path(path),
                    target: display_path(&terminal),
                }
            })?;
            pool.put(path, value)?;
        }
        Ok(paths.len())
    }

    fn apply(&self, path: &[String], raw: &Value, links: &[Link]) -> Result<TypedValue> {
        self.transformer
            .transform(raw, links)
            .map_err(|source| CompilerError::transform(display_path(path), source))
    }
}

/// Resolves `schema` against `setup` with the default reference depth bound
pub fn resolve<T: Transformer + ?Sized>(
    schema: &InputSchema,
    setup: &Tree<Value>,
    transformer: &T,
) -> Result<ValuePool> {
    SchemaResolver::new(schema, transformer).resolve(setup)
}
