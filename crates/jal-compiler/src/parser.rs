//! Parser for JAL program documents
//!
//! Programs, schemas and setup payloads arrive as JSON. Every entry point
//! canonicalizes its input first (object keys sorted at every level), so the
//! same document always produces the same model whatever its key order.

use crate::error::{CompilerError, Result};
use crate::naming::is_identifier;
use crate::variable::{
    BinaryOp, ConstVar, ConversionChain, FunctionVar, InputSchema, Operation, Program, ReferenceVar,
    SetupVar, StaticVar, Target, Variable, OPERATOR_KEYS, PRIVATE_REGION, PUBLIC_REGION,
};
use jal_runtime::{display_path, Link, Path, Tree};
use serde_json::{Map, Value};
use std::path::Path as FsPath;
use tracing::debug;

/// Deep copy of `value` with object keys sorted at every nesting level
pub fn canonicalize(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(&String, &Value)> = map.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));
            Value::Object(
                entries
                    .into_iter()
                    .map(|(k, v)| (k.clone(), canonicalize(v)))
                    .collect(),
            )
        }
        Value::Array(items) => Value::Array(items.iter().map(canonicalize).collect()),
        other => other.clone(),
    }
}

/// A JSON object is a variable when its `type` member is a string
pub fn is_variable(value: &Value) -> bool {
    matches!(value.get("type"), Some(Value::String(_)))
}

pub fn parse_program(input: &str) -> Result<Program> {
    let value: Value = serde_json::from_str(input)?;
    program_from_value(&value)
}

pub fn load_program(path: impl AsRef<FsPath>) -> Result<Program> {
    let input = std::fs::read_to_string(path.as_ref())?;
    debug!(path = %path.as_ref().display(), "loaded program");
    parse_program(&input)
}

/// Reads a setup payload, the values for every `setup` variable of a schema
pub fn parse_setup(value: &Value) -> Result<Tree<Value>> {
    if !value.is_object() {
        return Err(CompilerError::parse("Setup payload must be an object"));
    }
    Ok(Tree::from_json(&canonicalize(value)))
}

pub fn program_from_value(value: &Value) -> Result<Program> {
    let value = canonicalize(value);
    let object = value
        .as_object()
        .ok_or_else(|| CompilerError::parse("Program must be an object"))?;

    let target = object
        .get("target")
        .and_then(Value::as_str)
        .ok_or_else(|| CompilerError::parse("Program target must be a string"))?
        .parse::<Target>()?;

    let input_schema = parse_input_schema(
        object
            .get("inputSchema")
            .ok_or_else(|| CompilerError::parse("Program has no inputSchema"))?,
    )?;

    let commands = match object.get("commands") {
        Some(Value::Array(items)) => items
            .iter()
            .enumerate()
            .map(|(i, item)| parse_command(item, i))
            .collect::<Result<Vec<_>>>()?,
        Some(_) => return Err(CompilerError::parse("Program commands must be an array")),
        None => Vec::new(),
    };

    let options = match object.get("options") {
        Some(Value::Object(map)) => map.clone(),
        Some(Value::Null) | None => Map::new(),
        Some(_) => return Err(CompilerError::parse("Program options must be an object")),
    };

    debug!(shape = %target, commands = commands.len(), "parsed program");
    Ok(Program {
        target,
        input_schema,
        commands,
        options,
    })
}

/// Parses an input schema: an object with a `private` and an optional `public` region
pub fn parse_input_schema(value: &Value) -> Result<InputSchema> {
    let value = canonicalize(value);
    let object = value
        .as_object()
        .ok_or_else(|| CompilerError::parse("Input schema must be an object"))?;

    if let Some(key) = object
        .keys()
        .find(|key| *key != PRIVATE_REGION && *key != PUBLIC_REGION)
    {
        return Err(CompilerError::parse(format!(
            "Input schema region \"{}\" is not supported, expected \"{}\" or \"{}\"",
            key, PRIVATE_REGION, PUBLIC_REGION
        )));
    }
    if !object.contains_key(PRIVATE_REGION) {
        return Err(CompilerError::parse("Input schema has no private region"));
    }

    let mut schema = Tree::new();
    for (region, subtree) in object {
        if is_variable(subtree) || !subtree.is_object() {
            return Err(CompilerError::parse(format!(
                "Input schema region \"{}\" must be an object",
                region
            )));
        }
        collect_schema(subtree, &mut vec![region.clone()], &mut schema)?;
    }
    Ok(schema)
}

fn collect_schema(value: &Value, path: &mut Path, schema: &mut InputSchema) -> Result<()> {
    if is_variable(value) {
        let variable = parse_variable(value).map_err(|e| at_path(e, path))?;
        if variable.is_function() {
            return Err(CompilerError::parse(format!(
                "Function variable at {} is only allowed inside commands",
                display_path(path)
            )));
        }
        schema.put(path, variable)?;
        return Ok(());
    }

    let object = value.as_object().ok_or_else(|| {
        CompilerError::parse(format!(
            "Expected variable or object at {}, got {}",
            display_path(path),
            value
        ))
    })?;
    for (key, child) in object {
        if !is_schema_key(key) {
            return Err(CompilerError::parse(format!(
                "Input schema key \"{}\" under {} must be non-empty \
                 without dots, braces or whitespace",
                key,
                display_path(path)
            )));
        }
        path.push(key.clone());
        collect_schema(child, path, schema)?;
        path.pop();
    }
    Ok(())
}

/// Schema keys end up inside `{{ a.b }}` placeholders
fn is_schema_key(key: &str) -> bool {
    !key.is_empty()
        && !key
            .chars()
            .any(|c| c == '.' || c == '{' || c == '}' || c.is_whitespace())
}

fn at_path(error: CompilerError, path: &[String]) -> CompilerError {
    match error {
        CompilerError::ParseError(msg) => {
            CompilerError::parse(format!("{} (at {})", msg, display_path(path)))
        }
        other => other,
    }
}

/// Parses one command of the program's command list
pub fn parse_command(value: &Value, index: usize) -> Result<FunctionVar> {
    let object = value
        .as_object()
        .ok_or_else(|| CompilerError::parse(format!("Command #{} must be an object", index)))?;
    parse_function_body(object)
}

/// Parses any variable, including nested function variables
pub fn parse_variable(value: &Value) -> Result<Variable> {
    let object = value
        .as_object()
        .ok_or_else(|| CompilerError::parse(format!("Expected variable, got {}", value)))?;
    let kind = object
        .get("type")
        .and_then(Value::as_str)
        .ok_or_else(|| CompilerError::parse(format!("Variable has no type: {}", value)))?;

    match kind {
        "static" => {
            let literal = object
                .get("value")
                .ok_or_else(|| CompilerError::parse("Static variable has no value"))?;
            if !(literal.is_string() || literal.is_number() || literal.is_boolean()) {
                return Err(CompilerError::parse(format!(
                    "Static variable value must be a string, number or boolean, got {}",
                    literal
                )));
            }
            Ok(Variable::Static(StaticVar {
                value: literal.clone(),
                chain: parse_chain(object)?,
            }))
        }
        "setup" => Ok(Variable::Setup(SetupVar {
            chain: parse_chain(object)?,
        })),
        "constant" => {
            let name = object
                .get("name")
                .and_then(Value::as_str)
                .ok_or_else(|| CompilerError::parse("Constant variable name must be a string"))?;
            Ok(Variable::Constant(ConstVar {
                name: name.to_string(),
            }))
        }
        "reference" => Ok(Variable::Reference(ReferenceVar {
            path: parse_path(object.get("path"))?,
        })),
        "function" => {
            let mut body = object.clone();
            body.remove("type");
            parse_function_body(&body).map(Variable::Function)
        }
        other => Err(CompilerError::parse(format!("Unknown variable type \"{}\"", other))),
    }
}

fn parse_chain(object: &Map<String, Value>) -> Result<ConversionChain> {
    let items = object
        .get("transLinks")
        .and_then(Value::as_array)
        .ok_or_else(|| CompilerError::parse("Variable transLinks must be an array"))?;
    let links = items
        .iter()
        .map(|item| {
            item.as_str()
                .ok_or_else(|| {
                    CompilerError::parse(format!(
                        "Transformation link must be a string, got {}",
                        item
                    ))
                })
                .and_then(|s| s.parse::<Link>().map_err(CompilerError::from))
        })
        .collect::<Result<Vec<_>>>()?;
    ConversionChain::new(links)
}

fn parse_path(value: Option<&Value>) -> Result<Path> {
    let items = value
        .and_then(Value::as_array)
        .ok_or_else(|| CompilerError::parse("Reference path must be an array"))?;
    if items.is_empty() {
        return Err(CompilerError::parse("Reference path must not be empty"));
    }
    items
        .iter()
        .map(|item| {
            item.as_str().map(str::to_string).ok_or_else(|| {
                CompilerError::parse(format!(
                    "Reference path segment must be a string, got {}",
                    item
                ))
            })
        })
        .collect()
}

fn parse_function_body(object: &Map<String, Value>) -> Result<FunctionVar> {
    if let Some(unknown) = object
        .keys()
        .find(|key| !OPERATOR_KEYS.contains(&key.as_str()))
    {
        return Err(CompilerError::UnknownOperator(unknown.clone()));
    }

    let mut entries = object.iter();
    let (key, entry) = match (entries.next(), entries.next()) {
        (Some(first), None) => first,
        (None, _) => return Err(CompilerError::parse("Command declares no operator")),
        (Some(_), Some(_)) => {
            let keys: Vec<&str> = object.keys().map(String::as_str).collect();
            return Err(CompilerError::parse(format!(
                "Command declares several operators: {}",
                keys.join(", ")
            )));
        }
    };

    let entry = entry.as_object().ok_or_else(|| {
        CompilerError::invalid_operand(key.as_str(), "operator body must be an object")
    })?;
    let inputs = entry
        .get("in")
        .and_then(Value::as_array)
        .ok_or_else(|| CompilerError::invalid_operand(key.as_str(), "\"in\" must be an array"))?;

    let operation = parse_operation(key, inputs)?;

    let out = match entry.get("out") {
        None | Some(Value::Null) => None,
        Some(Value::String(name)) => {
            if !operation.binds_output() {
                return Err(CompilerError::invalid_operand(
                    key.as_str(),
                    "operator does not bind an output name",
                ));
            }
            if !is_identifier(name) {
                return Err(CompilerError::invalid_operand(
                    key.as_str(),
                    format!("output name \"{}\" is not a valid identifier", name),
                ));
            }
            Some(name.clone())
        }
        Some(other) => {
            return Err(CompilerError::invalid_operand(
                key.as_str(),
                format!("output name must be a string, got {}", other),
            ))
        }
    };

    Ok(FunctionVar { operation, out })
}

fn parse_operation(key: &str, inputs: &[Value]) -> Result<Operation> {
    let operand = |index: usize| -> Result<Box<Variable>> {
        let value = &inputs[index];
        if !is_variable(value) {
            return Err(CompilerError::invalid_operand(
                key,
                format!("operand #{} is not a variable: {}", index, value),
            ));
        }
        parse_variable(value).map(Box::new)
    };
    let tag = |index: usize| -> Result<String> {
        inputs[index]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| {
                CompilerError::invalid_operand(key, format!("operand #{} must be a string", index))
            })
    };
    let require = |count: usize| -> Result<()> {
        if inputs.len() == count {
            Ok(())
        } else {
            Err(CompilerError::arity(key, count.to_string(), inputs.len()))
        }
    };

    if let Some(op) = BinaryOp::ALL.iter().find(|op| op.key() == key) {
        require(2)?;
        return Ok(Operation::Binary(*op, operand(0)?, operand(1)?));
    }

    match key {
        "assert" => {
            require(1)?;
            Ok(Operation::Assert(operand(0)?))
        }
        "not" => {
            require(1)?;
            Ok(Operation::Not(operand(0)?))
        }
        "spread" => {
            require(1)?;
            Ok(Operation::Spread(operand(0)?))
        }
        "ternary" => {
            require(3)?;
            Ok(Operation::Ternary(operand(0)?, operand(1)?, operand(2)?))
        }
        "transform" => {
            require(2)?;
            let link = tag(1)?.parse::<Link>()?;
            Ok(Operation::Transform(operand(0)?, link))
        }
        "verifySign" => {
            require(4)?;
            Ok(Operation::VerifySign {
                algorithm: tag(0)?,
                signature: operand(1)?,
                message: operand(2)?,
                public_key: operand(3)?,
            })
        }
        "hash" => {
            if inputs.is_empty() {
                return Err(CompilerError::arity(key, "at least 1", 0));
            }
            let inputs = (1..inputs.len())
                .map(|i| operand(i).map(|v| *v))
                .collect::<Result<Vec<_>>>()?;
            Ok(Operation::Hash {
                algorithm: tag(0)?,
                inputs,
            })
        }
        other => Err(CompilerError::UnknownOperator(other.to_string())),
    }
}
