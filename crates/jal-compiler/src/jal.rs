//! Entry points
//!
//! [`Jal`] bundles a transformation pipeline with a [`CodegenConfig`] and
//! exposes the two compilation calls: translating a program to o1js source
//! and converting a setup payload into program inputs. The free functions
//! use the built-in [`TrGraph`] pipeline and default configuration.

use crate::codegen::{generate, CodegenConfig};
use crate::error::Result;
use crate::parser::{parse_input_schema, parse_setup};
use crate::projector::{project, ProgramInput};
use crate::resolver::SchemaResolver;
use crate::variable::{InputSchema, Program, Target};
use jal_runtime::{TrGraph, Transformer};
use serde_json::Value;
use tracing::info;

#[derive(Debug, Clone, Default)]
pub struct Jal<T: Transformer = TrGraph> {
    transformer: T,
    config: CodegenConfig,
}

impl Jal<TrGraph> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: CodegenConfig) -> Self {
        Self {
            transformer: TrGraph::new(),
            config,
        }
    }
}

impl<T: Transformer> Jal<T> {
    pub fn with_transformer(transformer: T, config: CodegenConfig) -> Self {
        Self {
            transformer,
            config,
        }
    }

    pub fn config(&self) -> &CodegenConfig {
        &self.config
    }

    pub fn transformer(&self) -> &T {
        &self.transformer
    }

    /// Generates the o1js source for `program`
    pub fn translate(&self, program: &Program) -> Result<String> {
        info!(
            shape = %program.target,
            commands = program.commands.len(),
            "translating program"
        );
        generate(program, &self.transformer, &self.config)
    }

    /// Resolves `setup` against `schema` and projects it onto the inputs of `target`
    pub fn program_input(
        &self,
        target: Target,
        schema: &InputSchema,
        setup: &Value,
    ) -> Result<ProgramInput> {
        info!(
            shape = %target,
            variables = schema.leaf_count(),
            "converting setup to program input"
        );
        let setup = parse_setup(setup)?;
        let pool = SchemaResolver::new(schema, &self.transformer)
            .with_max_reference_depth(self.config.max_reference_depth)
            .resolve(&setup)?;
        project(schema, &pool, target)
    }

    /// Like [`Jal::program_input`], from raw JSON. The target is checked
    /// before the schema is read.
    pub fn convert_to_input(
        &self,
        target: &str,
        input_schema: &Value,
        setup: &Value,
    ) -> Result<ProgramInput> {
        let target: Target = target.parse()?;
        let schema = parse_input_schema(input_schema)?;
        self.program_input(target, &schema, setup)
    }
}

impl<T: Transformer + Clone> Jal<T> {
    /// Binds `program` to a copy of this front-end
    pub fn init_program(&self, program: Program) -> JalProgram<T> {
        JalProgram {
            jal: self.clone(),
            program,
        }
    }
}

/// A program bound to its compilation settings
#[derive(Debug, Clone)]
pub struct JalProgram<T: Transformer = TrGraph> {
    jal: Jal<T>,
    program: Program,
}

impl<T: Transformer> JalProgram<T> {
    pub fn program(&self) -> &Program {
        &self.program
    }

    pub fn translate(&self) -> Result<String> {
        self.jal.translate(&self.program)
    }

    pub fn to_input(&self, setup: &Value) -> Result<ProgramInput> {
        self.jal
            .program_input(self.program.target, &self.program.input_schema, setup)
    }
}

/// Translates `program` with the default pipeline and configuration
pub fn translate(program: &Program) -> Result<String> {
    Jal::new().translate(program)
}

/// Converts `setup` into program inputs with the default pipeline and configuration
pub fn convert_to_input(target: &str, input_schema: &Value, setup: &Value) -> Result<ProgramInput> {
    Jal::new().convert_to_input(target, input_schema, setup)
}

pub fn init_program(program: Program) -> JalProgram {
    Jal::new().init_program(program)
}
