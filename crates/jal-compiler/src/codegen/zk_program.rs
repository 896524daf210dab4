//! `ZkProgram` shape: structured public input plus ordered private inputs

use super::pools::{
    build_public_input_names, data_pool, pooled, PUBLIC_INPUT_NAMES, VARIABLE_TYPES,
};
use super::template::{placeholder, render};
use super::{assemble, import_preamble, statement_block, Assembly, CodegenConfig};
use crate::error::Result;
use crate::variable::{is_public, Program};
use jal_runtime::{Path, Transformer};

pub fn translate_zk_program<T: Transformer + ?Sized>(
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
    let public_names = build_public_input_names(&paths)?;
    let data = data_pool(&names, &types, &public_names)?;

    let (public, private): (Vec<&Path>, Vec<&Path>) =
        paths.iter().partition(|path| is_public(path));

    let mut template = import_preamble(&[]);

    template.push_str("export class PublicInput extends Struct({\n");
    for path in &public {
        template.push_str(&format!(
            "  {}: {},\n",
            placeholder(&pooled(PUBLIC_INPUT_NAMES, path)),
            placeholder(&pooled(VARIABLE_TYPES, path))
        ));
    }
    template.push_str("}) {}\n\n");

    template.push_str("export const zkProgram = ZkProgram({\n");
    template.push_str("  publicInput: PublicInput,\n");
    template.push_str("  methods: {\n");
    template.push_str(&format!("    {}: {{\n", config.method_name));
    template.push_str("      privateInputs: [\n");
    for path in &private {
        template.push_str(&format!(
            "        {},\n",
            placeholder(&pooled(VARIABLE_TYPES, path))
        ));
    }
    template.push_str("      ],\n");
    template.push_str("      method(\n");
    template.push_str("        publicInput,\n");
    for path in &private {
        template.push_str(&format!("        {},\n", placeholder(path)));
    }
    template.push_str("      ) {\n");
    template.push_str(&statement_block(&statements, 8));
    template.push_str("      }\n");
    template.push_str("    }\n");
    template.push_str("  }\n");
    template.push_str("});\n");

    render(&template, &data)
}
