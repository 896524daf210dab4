//! o1js source generation
//!
//! Both program shapes share the same pipeline: build the name and type
//! pools for the declared paths, translate the command list against them,
//! lay out a template around the statements and render its placeholders.

pub mod commands;
pub mod pools;
pub mod smart_contract;
pub mod template;
pub mod zk_program;

use crate::error::{CompilerError, Result};
use crate::naming::is_identifier;
use crate::resolver::DEFAULT_MAX_REFERENCE_DEPTH;
use crate::variable::{Program, Target};
use commands::{CommandTranslator, DEFAULT_MAX_EXPRESSION_DEPTH};
use jal_runtime::{Path, Transformer};
use pools::{build_type_pool, variable_paths, NamePool, TypePool};
use tracing::debug;

#[derive(Debug, Clone)]
pub struct CodegenConfig {
    /// Maximum hops when following reference chains
    pub max_reference_depth: usize,
    /// Maximum nesting of function operands
    pub max_expression_depth: usize,
    /// Name of the single generated method
    pub method_name: String,
}

impl Default for CodegenConfig {
    fn default() -> Self {
        Self {
            max_reference_depth: DEFAULT_MAX_REFERENCE_DEPTH,
            max_expression_depth: DEFAULT_MAX_EXPRESSION_DEPTH,
            method_name: "execute".to_string(),
        }
    }
}

const O1JS_IMPORTS: [&str; 10] = [
    "Bool",
    "Provable",
    "CircuitString",
    "ZkProgram",
    "Field",
    "Poseidon",
    "PublicKey",
    "Signature",
    "Struct",
    "UInt64",
];

/// `import { .. } from "o1js";` block followed by a blank line
pub(crate) fn import_preamble(extra: &[&str]) -> String {
    let mut out = String::from("import {\n");
    for name in O1JS_IMPORTS.iter().chain(extra) {
        out.push_str(&format!("  {},\n", name));
    }
    out.push_str("} from \"o1js\";\n\n");
    out
}

/// Statements indented by `indent` spaces, one per line
pub(crate) fn statement_block(statements: &[String], indent: usize) -> String {
    statements
        .iter()
        .map(|statement| format!("{:indent$}{}\n", "", statement, indent = indent))
        .collect()
}

/// Everything a program shape needs before laying out its template
pub(crate) struct Assembly {
    pub paths: Vec<Path>,
    pub names: NamePool,
    pub types: TypePool,
    pub statements: Vec<String>,
}

pub(crate) fn assemble<T: Transformer + ?Sized>(
    program: &Program,
    transformer: &T,
    config: &CodegenConfig,
) -> Result<Assembly> {
    if !is_identifier(&config.method_name) {
        return Err(CompilerError::InvalidConfig(format!(
            "Method name \"{}\" is not a valid identifier",
            config.method_name
        )));
    }

    let paths = variable_paths(&program.input_schema, program.target);
    let mut names = NamePool::for_paths(&paths, program.target)?;
    let types = build_type_pool(&program.input_schema, &paths, config.max_reference_depth)?;
    let statements = CommandTranslator::new(transformer)
        .with_max_expression_depth(config.max_expression_depth)
        .translate(&program.commands, &mut names)?;

    debug!(
        shape = %program.target,
        variables = paths.len(),
        statements = statements.len(),
        "assembled program"
    );
    Ok(Assembly {
        paths,
        names,
        types,
        statements,
    })
}

/// Generates the o1js source of `program` for its target shape
pub fn generate<T: Transformer + ?Sized>(
    program: &Program,
    transformer: &T,
    config: &CodegenConfig,
) -> Result<String> {
    match program.target {
        Target::ZkProgram => zk_program::translate_zk_program(program, transformer, config),
        Target::SmartContract => {
            smart_contract::translate_smart_contract(program, transformer, config)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = CodegenConfig::default();
        assert_eq!(config.max_reference_depth, 64);
        assert_eq!(config.max_expression_depth, 64);
        assert_eq!(config.method_name, "execute");
    }

    #[test]
    fn test_import_preamble() {
        let preamble = import_preamble(&["method"]);
        assert!(preamble.starts_with("import {\n  Bool,\n"));
        assert!(preamble.ends_with("  UInt64,\n  method,\n} from \"o1js\";\n\n"));
    }

    #[test]
    fn test_statement_block() {
        let block = statement_block(&["a".to_string(), "b".to_string()], 4);
        assert_eq!(block, "    a\n    b\n");
    }
}
