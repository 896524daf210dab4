//! Operation translation
//!
//! Turns the command list into o1js statements. Each operator has a fixed
//! expression shape; operands nest, so translation recurses through
//! function operands up to a configurable depth.
//!
//! References render as `{{ path }}` placeholders that the template renderer
//! later swaps for pooled identifiers. Static operands render as literal
//! constructors picked by the final type of their conversion chain.

use super::pools::{type_token, NamePool};
use super::template::placeholder;
use crate::constants::constant_info;
use crate::error::{CompilerError, Result};
use crate::variable::{FunctionVar, Operation, StaticVar, Variable};
use jal_runtime::{display_path, field_to_hex, field_to_u128, Link, Transformer, TypedValue};
use serde_json::Value;
use std::fmt;
use tracing::debug;

/// Default bound on operand nesting
pub const DEFAULT_MAX_EXPRESSION_DEPTH: usize = 64;

/// Literal value a static operand carries into the generated source
#[derive(Debug, Clone, PartialEq)]
enum Literal {
    /// Raw JSON number, written as is
    Number(String),
    /// Integer produced by the pipeline, written with a bigint suffix
    BigInt(String),
    Text(String),
    Boolean(bool),
}

impl Literal {
    fn from_raw(value: &Value) -> Result<Self> {
        match value {
            Value::Number(n) => Ok(Literal::Number(n.to_string())),
            Value::String(s) => Ok(Literal::Text(s.clone())),
            Value::Bool(b) => Ok(Literal::Boolean(*b)),
            other => Err(CompilerError::invalid_operand(
                "static",
                format!("value must be a string, number or boolean, got {}", other),
            )),
        }
    }

    fn from_typed(value: &TypedValue) -> Result<Self> {
        Ok(match value {
            TypedValue::Ascii(s)
            | TypedValue::Utf8(s)
            | TypedValue::Base58(s)
            | TypedValue::IsoDate(s)
            | TypedValue::CircuitString(s)
            | TypedValue::Signature(s)
            | TypedValue::PublicKey(s)
            | TypedValue::Iso3166Alpha2(s) => Literal::Text(s.clone()),
            TypedValue::Bytes(bytes) => Literal::BigInt(format!("0x{}", hex::encode(bytes))),
            TypedValue::Uint(_, n) => Literal::BigInt(n.to_string()),
            TypedValue::UInt64(n) => Literal::BigInt(n.to_string()),
            TypedValue::Iso3166Numeric(n) => Literal::BigInt(n.to_string()),
            TypedValue::UnixTime(ms) => Literal::BigInt(ms.to_string()),
            TypedValue::Field(fp) => match field_to_u128(fp) {
                Some(n) => Literal::BigInt(n.to_string()),
                None => Literal::BigInt(field_to_hex(fp)),
            },
            TypedValue::Boolean(b) | TypedValue::Bool(b) => Literal::Boolean(*b),
            TypedValue::Fields(_) => {
                return Err(CompilerError::invalid_operand(
                    "static",
                    "field arrays have no literal form",
                ))
            }
        })
    }

    fn as_text(&self) -> String {
        match self {
            Literal::Number(n) | Literal::BigInt(n) | Literal::Text(n) => n.clone(),
            Literal::Boolean(b) => b.to_string(),
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Number(n) => f.write_str(n),
            Literal::BigInt(n) => write!(f, "{}n", n),
            Literal::Text(s) => write!(f, "\"{}\"", escape_string(s)),
            Literal::Boolean(b) => write!(f, "{}", b),
        }
    }
}

/// Escapes a string for a double-quoted JS literal. Braces are escaped too,
/// so literal text never reads as a placeholder.
pub fn escape_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '{' => out.push_str("\\u007b"),
            '}' => out.push_str("\\u007d"),
            c => out.push(c),
        }
    }
    out
}

fn render_literal(token: &str, literal: &Literal) -> Result<String> {
    let mismatch = || {
        CompilerError::invalid_operand("static", format!("cannot render {} as {}", literal, token))
    };
    match (token, literal) {
        ("Field", literal) => Ok(format!("Field({})", literal)),
        ("UInt64", literal) => Ok(format!("UInt64.from(Field({}))", literal)),
        ("Bool", Literal::Boolean(b)) => Ok(format!("Bool({})", b)),
        // read the way the pipeline reads a raw boolean
        ("Bool", Literal::Text(s)) => match s.as_str() {
            "true" | "false" => Ok(format!("Bool({})", s)),
            _ => Err(mismatch()),
        },
        ("Signature", Literal::Text(_)) => Ok(format!("Signature.fromBase58({})", literal)),
        ("PublicKey", Literal::Text(_)) => Ok(format!("PublicKey.fromBase58({})", literal)),
        ("CircuitString", literal) => Ok(format!(
            "CircuitString.fromString({})",
            Literal::Text(literal.as_text())
        )),
        _ => Err(mismatch()),
    }
}

/// o1js expression for a single-link `transform` command
pub fn transform_expression(operand: &str, link: &Link) -> Result<String> {
    match (link.source_type(), link.target_type()) {
        ("uint64" | "signature" | "publickey" | "string", "fields") => {
            Ok(format!("{}.toFields()", operand))
        }
        ("field", "uint64") => Ok(format!("UInt64.from({})", operand)),
        ("bool", "field") => Ok(format!("{}.toField()", operand)),
        _ => Err(CompilerError::UnsupportedTransform(link.to_string())),
    }
}

pub struct CommandTranslator<'a, T: Transformer + ?Sized> {
    transformer: &'a T,
    max_expression_depth: usize,
}

impl<'a, T: Transformer + ?Sized> CommandTranslator<'a, T> {
    pub fn new(transformer: &'a T) -> Self {
        Self {
            transformer,
            max_expression_depth: DEFAULT_MAX_EXPRESSION_DEPTH,
        }
    }

    pub fn with_max_expression_depth(mut self, max_expression_depth: usize) -> Self {
        self.max_expression_depth = max_expression_depth;
        self
    }

    /// Translates `commands` in order, one statement each.
    ///
    /// Output names are registered in `names` as soon as their command is
    /// translated, so only later commands can reference them.
    pub fn translate(
        &self,
        commands: &[FunctionVar],
        names: &mut NamePool,
    ) -> Result<Vec<String>> {
        let mut statements = Vec::with_capacity(commands.len());
        for (index, command) in commands.iter().enumerate() {
            let expression = self.operation(&command.operation, names, 1)?;
            let statement = match &command.out {
                Some(out) => {
                    names.register_output(out)?;
                    format!("const {} = {}", out, expression)
                }
                None => expression,
            };
            debug!(
                index,
                operator = command.operation.key(),
                out = ?command.out,
                "translated command"
            );
            statements.push(statement);
        }
        Ok(statements)
    }

    fn operation(&self, operation: &Operation, names: &NamePool, depth: usize) -> Result<String> {
        if depth > self.max_expression_depth {
            return Err(CompilerError::ExpressionDepthExceeded(
                self.max_expression_depth,
            ));
        }
        let key = operation.key();
        let operand = |variable: &Variable| self.operand(key, variable, names, depth);

        Ok(match operation {
            Operation::Binary(op, left, right) => {
                format!("{}.{}({})", operand(left)?, op.method(), operand(right)?)
            }
            Operation::Assert(value) => format!("{}.assertTrue()", operand(value)?),
            Operation::Ternary(condition, on_true, on_false) => format!(
                "Provable.if({}, {}, {})",
                operand(condition)?,
                operand(on_true)?,
                operand(on_false)?
            ),
            Operation::Transform(value, link) => transform_expression(&operand(value)?, link)?,
            Operation::VerifySign {
                signature,
                message,
                public_key,
                ..
            } => format!(
                "{}.verify({}, [{}])",
                operand(signature)?,
                operand(public_key)?,
                operand(message)?
            ),
            Operation::Hash { inputs, .. } => {
                let inputs = inputs.iter().map(operand).collect::<Result<Vec<_>>>()?;
                format!("Poseidon.hash([{}])", inputs.join(", "))
            }
            Operation::Spread(value) => format!("...{}", operand(value)?),
            Operation::Not(value) => format!("{}.not()", operand(value)?),
        })
    }

    fn operand(
        &self,
        operator: &str,
        variable: &Variable,
        names: &NamePool,
        depth: usize,
    ) -> Result<String> {
        match variable {
            Variable::Static(var) => self.static_literal(var),
            Variable::Constant(var) => Ok(constant_info(&var.name)?.program_value.to_string()),
            Variable::Reference(var) => {
                if !names.contains(&var.path) {
                    return Err(CompilerError::UndeclaredReference(display_path(&var.path)));
                }
                Ok(placeholder(&var.path))
            }
            Variable::Setup(_) => Err(CompilerError::invalid_operand(
                operator,
                "setup variables have no value inside commands",
            )),
            Variable::Function(function) => {
                if let Some(out) = &function.out {
                    return Err(CompilerError::invalid_operand(
                        operator,
                        format!(
                            "nested {} cannot bind output \"{}\"",
                            function.operation.key(),
                            out
                        ),
                    ));
                }
                self.operation(&function.operation, names, depth + 1)
            }
        }
    }

    /// Literal constructor for a static operand.
    ///
    /// The value goes through every link but the last; the last link only
    /// picks the constructor.
    fn static_literal(&self, var: &StaticVar) -> Result<String> {
        let token = type_token(var.chain.final_type())?;
        let literal = if var.chain.prefix().is_empty() {
            Literal::from_raw(&var.value)?
        } else {
            let value = self
                .transformer
                .transform(&var.value, var.chain.prefix())
                .map_err(|source| {
                    CompilerError::transform(format!("static value {}", var.value), source)
                })?;
            Literal::from_typed(&value)?
        };
        render_literal(token, &literal)
    }
}
