//! JAL Compiler
//!
//! Compiles JAL programs (an input schema plus a list of commands over it)
//! into o1js source code, and converts setup payloads into the inputs the
//! generated program is invoked with.

pub mod codegen;
pub mod constants;
pub mod error;
pub mod jal;
pub mod naming;
pub mod parser;
pub mod projector;
pub mod resolver;
pub mod variable;

pub use codegen::{generate, CodegenConfig};
pub use constants::{constant_info, ConstantInfo, CONSTANTS};
pub use error::{CompilerError, ErrorCategory, Result};
pub use jal::{convert_to_input, init_program, translate, Jal, JalProgram};
pub use parser::{load_program, parse_input_schema, parse_program, parse_setup, program_from_value};
pub use projector::{project, ProgramInput};
pub use resolver::{follow_references, resolve, SchemaResolver, ValuePool};
pub use variable::{
    BinaryOp, ConstVar, ConversionChain, FunctionVar, InputSchema, Operation, Program,
    ReferenceVar, SetupVar, StaticVar, Target, Variable,
};

// Re-export runtime types for convenience
pub use jal_runtime::{Link, TrGraph, Transformer, Tree, TypedValue};
