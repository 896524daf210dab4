//! `SmartContract` shape: one method over the private inputs
//!
//! The public region takes no part in this shape. Its variables are neither
//! parameters nor referenceable from commands.

use super::pools::{data_pool, pooled, VARIABLE_TYPES};
use super::template::{placeholder, render};
use super::{assemble, import_preamble, statement_block, Assembly, CodegenConfig};
use crate::error::Result;
use crate::variable::Program;
use jal_runtime::{Transformer, Tree};

pub fn translate_smart_contract<T: Transformer + ?Sized>(
    program: &Program,
    transformer: &T,
    config: &CodegenConfig,
) -> Result<String> {
    let Assembly {
        paths,
        names,
        types,
        statements,
    } = assemble(program, transformer, config)?;
    let data = data_pool(&names, &types, &Tree::new())?;

    let mut template = import_preamble(&["method", "SmartContract"]);
    template.push_str("export class ZkSmartContract extends SmartContract {\n");
    template.push_str(&format!("  @method {}(\n", config.method_name));
    for path in &paths {
        template.push_str(&format!(
            "    {}: {},\n",
            placeholder(path),
            placeholder(&pooled(VARIABLE_TYPES, path))
        ));
    }
    template.push_str("  ) {\n");
    template.push_str(&statement_block(&statements, 4));
    template.push_str("  }\n");
    template.push_str("}\n");

    render(&template, &data)
}
