//! Tests for command translation

use jal_compiler::codegen::commands::CommandTranslator;
use jal_compiler::codegen::pools::{NamePool, TYPE_TOKENS};
use jal_compiler::parser::parse_command;
use jal_compiler::{CompilerError, ErrorCategory, FunctionVar, Target};
use jal_runtime::{field_to_u128, path_of, Link, TrGraph, Transformer, TypedValue};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

fn commands(values: Value) -> Vec<FunctionVar> {
    values
        .as_array()
        .unwrap()
        .iter()
        .enumerate()
        .map(|(index, value)| parse_command(value, index).unwrap())
        .collect()
}

fn names() -> NamePool {
    NamePool::for_paths(
        &[path_of(&["private", "name"]), path_of(&["public", "age"])],
        Target::ZkProgram,
    )
    .unwrap()
}

fn translate(values: Value) -> Result<Vec<String>, CompilerError> {
    translate_with(values, &mut names())
}

fn translate_with(values: Value, names: &mut NamePool) -> Result<Vec<String>, CompilerError> {
    CommandTranslator::new(&TrGraph::new()).translate(&commands(values), names)
}

fn field(value: Value) -> Value {
    json!({ "type": "static", "value": value, "transLinks": ["uint64-mina:field"] })
}

fn uint64(value: Value) -> Value {
    json!({ "type": "static", "value": value, "transLinks": ["uint64-mina:uint64"] })
}

fn boolean(value: bool) -> Value {
    json!({ "type": "static", "value": value, "transLinks": ["boolean-mina:bool"] })
}

fn name_ref() -> Value {
    json!({ "type": "reference", "path": ["private", "name"] })
}

// ============================================================================
// OPERATOR TESTS
// ============================================================================

#[test]
fn test_add_with_reference() {
    let result = translate(json!([
        { "add": { "in": [ field(json!(1)), name_ref() ] } }
    ]))
    .unwrap();
    assert_eq!(result, vec!["Field(1).add({{ private.name }})"]);
}

#[test]
fn test_sub_binds_output() {
    let result = translate(json!([
        { "sub": { "in": [ uint64(json!(3)), uint64(json!(1)) ], "out": "threeSubOne" } }
    ]))
    .unwrap();
    assert_eq!(
        result,
        vec!["const threeSubOne = UInt64.from(Field(3)).sub(UInt64.from(Field(1)))"]
    );
}

#[test]
fn test_mul_keeps_operand_order() {
    let result = translate(json!([
        { "mul": { "in": [ field(json!(3)), field(json!(2)) ], "out": "r" } }
    ]))
    .unwrap();
    assert_eq!(result, vec!["const r = Field(3).mul(Field(2))"]);
}

#[test]
fn test_comparisons() {
    let result = translate(json!([
        { "equal": { "in": [ field(json!(3)), field(json!(3)) ], "out": "eq" } },
        { "greater": { "in": [ uint64(json!(1)), uint64(json!(0)) ], "out": "gt" } },
        { "greaterEqual": { "in": [ field(json!(3)), field(json!(3)) ], "out": "ge" } },
        { "less": { "in": [ field(json!(2)), field(json!(5)) ], "out": "lt" } },
        { "lessEqual": { "in": [ uint64(json!(5)), uint64(json!(5)) ], "out": "le" } }
    ]))
    .unwrap();

    assert_eq!(
        result,
        vec![
            "const eq = Field(3).equals(Field(3))",
            "const gt = UInt64.from(Field(1)).greaterThan(UInt64.from(Field(0)))",
            "const ge = Field(3).greaterThanOrEqual(Field(3))",
            "const lt = Field(2).lessThan(Field(5))",
            "const le = UInt64.from(Field(5)).lessThanOrEqual(UInt64.from(Field(5)))",
        ]
    );
}

#[test]
fn test_assert() {
    let result = translate(json!([
        { "assert": { "in": [
            { "type": "static", "value": true, "transLinks": ["uint64-mina:bool"] }
        ] } }
    ]))
    .unwrap();
    assert_eq!(result, vec!["Bool(true).assertTrue()"]);
}

#[test]
fn test_ternary() {
    let result = translate(json!([
        { "ternary": { "in": [
            boolean(false),
            field(json!(1)),
            field(json!(2))
        ], "out": "picked" } }
    ]))
    .unwrap();
    assert_eq!(result, vec!["const picked = Provable.if(Bool(false), Field(1), Field(2))"]);
}

#[test]
fn test_verify_sign() {
    let result = translate(json!([
        { "verifySign": { "in": [
            "pasta",
            { "type": "static", "value": "345...345", "transLinks": ["base58-mina:signature"] },
            field(json!(3)),
            { "type": "static", "value": "123...123", "transLinks": ["base58-mina:publickey"] }
        ], "out": "isVerified" } }
    ]))
    .unwrap();
    assert_eq!(
        result,
        vec![concat!(
            r#"const isVerified = Signature.fromBase58("345...345")"#,
            r#".verify(PublicKey.fromBase58("123...123"), [Field(3)])"#
        )]
    );
}

#[test]
fn test_hash() {
    let result = translate(json!([
        { "hash": { "in": [
            "poseidon",
            field(json!(3)),
            { "type": "static", "value": 1, "transLinks": ["uint128-mina:field"] }
        ], "out": "hash" } }
    ]))
    .unwrap();
    assert_eq!(result, vec!["const hash = Poseidon.hash([Field(3), Field(1)])"]);
}

#[test]
fn test_hash_without_messages() {
    let result = translate(json!([{ "hash": { "in": ["poseidon"], "out": "empty" } }])).unwrap();
    assert_eq!(result, vec!["const empty = Poseidon.hash([])"]);
}

#[test]
fn test_transform() {
    let result = translate(json!([
        { "transform": {
            "in": [ uint64(json!(3)), "mina:uint64-mina:fields" ],
            "out": "fromUint64"
        } },
        { "transform": { "in": [
            { "type": "static", "value": "123...123", "transLinks": ["base58-mina:signature"] },
            "mina:signature-mina:fields"
        ], "out": "fromSignature" } },
        { "transform": { "in": [ field(json!(3)), "mina:field-mina:uint64" ], "out": "toUint64" } },
        { "transform": { "in": [ boolean(true), "mina:bool-mina:field" ], "out": "toField" } }
    ]))
    .unwrap();

    assert_eq!(
        result,
        vec![
            "const fromUint64 = UInt64.from(Field(3)).toFields()",
            r#"const fromSignature = Signature.fromBase58("123...123").toFields()"#,
            "const toUint64 = UInt64.from(Field(3))",
            "const toField = Bool(true).toField()",
        ]
    );
}

#[test]
fn test_unsupported_transform() {
    let err = translate(json!([
        { "transform": { "in": [ field(json!(3)), "mina:field-mina:bool" ], "out": "x" } }
    ]))
    .unwrap_err();
    assert!(matches!(
        err,
        CompilerError::UnsupportedTransform(ref link) if link == "mina:field-mina:bool"
    ));
    assert_eq!(err.category(), ErrorCategory::Operation);
}

#[test]
fn test_spread_inside_hash() {
    let result = translate(json!([
        { "hash": { "in": [
            "poseidon",
            { "type": "function", "spread": { "in": [
                { "type": "function", "transform": { "in": [
                    { "type": "static", "value": "Alice", "transLinks": ["ascii-mina:string"] },
                    "mina:string-mina:fields"
                ] } }
            ] } }
        ], "out": "nameHash" } }
    ]))
    .unwrap();
    assert_eq!(
        result,
        vec![r#"const nameHash = Poseidon.hash([...CircuitString.fromString("Alice").toFields()])"#]
    );
}

#[test]
fn test_not() {
    let result = translate(json!([
        { "not": { "in": [ boolean(true) ], "out": "no" } }
    ]))
    .unwrap();
    assert_eq!(result, vec!["const no = Bool(true).not()"]);
}

// ============================================================================
// OPERAND TESTS
// ============================================================================

#[test]
fn test_constant_operand() {
    let result = translate(json!([
        { "assert": { "in": [ { "type": "function", "equal": { "in": [
            { "type": "constant", "name": "year" },
            field(json!(31557600000u64))
        ] } } ] } }
    ]))
    .unwrap();
    assert_eq!(
        result,
        vec!["Field(365.25 * 24 * 60 * 60 * 1000).equals(Field(31557600000)).assertTrue()"]
    );
}

#[test]
fn test_pipeline_literal_is_bigint() {
    let result = translate(json!([
        { "add": { "in": [
            { "type": "static", "value": 5, "transLinks": ["uint16-uint64", "uint64-mina:field"] },
            {
                "type": "static",
                "value": "2000-06-08",
                "transLinks": ["isodate-unixtime", "unixtime-mina:field"]
            }
        ], "out": "sum" } }
    ]))
    .unwrap();
    assert_eq!(result, vec!["const sum = Field(5n).add(Field(960422400000n))"]);
}

#[test]
fn test_string_literal_is_escaped() {
    let result = translate(json!([
        { "equal": { "in": [
            { "type": "static", "value": "say \"{{ hi }}\"", "transLinks": ["utf8-mina:string"] },
            name_ref()
        ], "out": "same" } }
    ]))
    .unwrap();
    assert_eq!(
        result,
        vec![concat!(
            r#"const same = CircuitString.fromString("say \"\u007b\u007b hi \u007d\u007d\"")"#,
            ".equals({{ private.name }})"
        )]
    );
}

#[test]
fn test_bool_static_from_text() {
    let result = translate(json!([
        { "assert": { "in": [
            { "type": "static", "value": "true", "transLinks": ["boolean-mina:bool"] }
        ] } }
    ]))
    .unwrap();
    assert_eq!(result, vec!["Bool(true).assertTrue()"]);
}

// ============================================================================
// LITERAL ROUND TRIP
// ============================================================================

/// Payload text of a raw value, or of its pipeline result when `prefix` is non-empty
fn expected_payload(raw: &Value, prefix: &[Link]) -> String {
    if prefix.is_empty() {
        return match raw {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
    }
    match TrGraph.transform(raw, prefix).unwrap() {
        TypedValue::Uint(_, n) => n.to_string(),
        TypedValue::UInt64(n) => n.to_string(),
        TypedValue::UnixTime(t) => t.to_string(),
        TypedValue::Field(f) => field_to_u128(&f).unwrap().to_string(),
        TypedValue::Boolean(b) | TypedValue::Bool(b) => b.to_string(),
        TypedValue::Ascii(s) | TypedValue::Utf8(s) | TypedValue::Base58(s) => s,
        other => panic!("no literal payload for {:?}", other),
    }
}

/// Strips the constructor around a rendered literal, then its quotes or bigint suffix
fn rendered_payload(token: &str, literal: &str) -> String {
    let (open, close) = match token {
        "Field" => ("Field(", ")"),
        "UInt64" => ("UInt64.from(Field(", "))"),
        "Bool" => ("Bool(", ")"),
        "Signature" => ("Signature.fromBase58(", ")"),
        "PublicKey" => ("PublicKey.fromBase58(", ")"),
        "CircuitString" => ("CircuitString.fromString(", ")"),
        other => panic!("unknown token {}", other),
    };
    let inner = literal
        .strip_prefix(open)
        .and_then(|rest| rest.strip_suffix(close))
        .unwrap_or_else(|| panic!("{} is not a {} literal", literal, token));
    match inner.strip_prefix('"') {
        Some(quoted) => quoted.strip_suffix('"').unwrap().to_string(),
        None => inner.strip_suffix('n').unwrap_or(inner).to_string(),
    }
}

#[test]
fn test_literal_payload_matches_pipeline() {
    let cases: Vec<(&str, Value, Vec<&str>)> = vec![
        ("field", json!(7), vec!["uint64-mina:field"]),
        ("field", json!("7"), vec!["uint64-mina:field"]),
        ("field", json!(true), vec!["boolean-uint64", "uint64-mina:field"]),
        ("field", json!("A"), vec!["utf8-bytes", "bytes-uint64", "uint64-mina:field"]),
        ("uint64", json!(5), vec!["uint64-mina:uint64"]),
        (
            "uint64",
            json!("2000-06-08"),
            vec!["isodate-unixtime", "unixtime-uint64", "uint64-mina:uint64"],
        ),
        ("bool", json!(true), vec!["boolean-mina:bool"]),
        ("bool", json!("true"), vec!["boolean-mina:bool"]),
        ("bool", json!("false"), vec!["utf8-boolean", "boolean-mina:bool"]),
        (
            "signature",
            json!("7mXGPCbSJdiooxBrU4mnXQRnLqtU5oMHb6QPCSVA4aZAWbW8BMwmQSNX"),
            vec!["base58-mina:signature"],
        ),
        (
            "publickey",
            json!("B62qmNhR2bSWqBzvaLkdhWoXVfZXPm2ALrqxCGBsk2bdvgP3Z3RXfCe"),
            vec!["base58-mina:publickey"],
        ),
        ("string", json!("hello"), vec!["utf8-mina:string"]),
        ("string", json!(42), vec!["utf8-mina:string"]),
        ("string", json!("hi"), vec!["ascii-utf8", "utf8-mina:string"]),
    ];

    for (final_type, token) in TYPE_TOKENS {
        assert!(
            cases.iter().any(|(t, _, _)| *t == final_type),
            "no case for {}",
            final_type
        );
        for (_, raw, chain) in cases.iter().filter(|(t, _, _)| *t == final_type) {
            let statements = translate(json!([
                { "assert": { "in": [ { "type": "static", "value": raw, "transLinks": chain } ] } }
            ]))
            .unwrap();
            let literal = statements[0].strip_suffix(".assertTrue()").unwrap();

            let links: Vec<Link> = chain.iter().map(|l| l.parse().unwrap()).collect();
            let prefix = &links[..links.len() - 1];
            assert_eq!(
                rendered_payload(token, literal),
                expected_payload(raw, prefix),
                "{} via {:?}",
                raw,
                chain
            );
        }
    }
}

#[test]
fn test_output_names_are_visible_to_later_commands() {
    let mut pool = names();
    let result = translate_with(
        json!([
            { "mul": { "in": [ field(json!(3)), field(json!(2)) ], "out": "r" } },
            { "assert": { "in": [ { "type": "function", "equal": { "in": [
                { "type": "reference", "path": ["r"] },
                { "type": "reference", "path": ["public", "age"] }
            ] } } ] } }
        ]),
        &mut pool,
    )
    .unwrap();

    assert_eq!(result[1], "{{ r }}.equals({{ public.age }}).assertTrue()");
    assert_eq!(pool.get(&path_of(&["r"])), Some("r"));
}

#[test]
fn test_reference_before_declaration() {
    let err = translate(json!([
        { "assert": { "in": [ { "type": "reference", "path": ["later"] } ] } },
        { "not": { "in": [ field(json!(1)) ], "out": "later" } }
    ]))
    .unwrap_err();
    assert!(matches!(err, CompilerError::UndeclaredReference(ref p) if p == "later"));
}

#[test]
fn test_undeclared_schema_path() {
    let err = translate(json!([
        { "assert": { "in": [ { "type": "reference", "path": ["private", "missing"] } ] } }
    ]))
    .unwrap_err();
    assert!(matches!(err, CompilerError::UndeclaredReference(ref p) if p == "private.missing"));
}

#[test]
fn test_duplicate_output() {
    let err = translate(json!([
        { "not": { "in": [ field(json!(1)) ], "out": "x" } },
        { "not": { "in": [ field(json!(2)) ], "out": "x" } }
    ]))
    .unwrap_err();
    assert!(matches!(err, CompilerError::DuplicateOutput(ref name) if name == "x"));
}

#[test]
fn test_setup_operand_rejected() {
    let err = translate(json!([
        { "not": {
            "in": [ { "type": "setup", "transLinks": ["boolean-mina:bool"] } ],
            "out": "x"
        } }
    ]))
    .unwrap_err();
    assert!(matches!(err, CompilerError::InvalidOperand { ref operator, .. } if operator == "not"));
}

#[test]
fn test_unsupported_final_type() {
    let err = translate(json!([
        { "spread": { "in": [
            { "type": "static", "value": 1, "transLinks": ["uint64-mina:fields"] }
        ] } }
    ]))
    .unwrap_err();
    assert!(matches!(err, CompilerError::UnsupportedType(ref ty) if ty == "fields"));
}

#[test]
fn test_expression_depth_bound() {
    let mut operand = field(json!(1));
    for _ in 0..5 {
        operand = json!({ "type": "function", "not": { "in": [operand] } });
    }
    let commands = commands(json!([{ "assert": { "in": [operand] } }]));
    let graph = TrGraph::new();

    let ok = CommandTranslator::new(&graph)
        .with_max_expression_depth(6)
        .translate(&commands, &mut names());
    assert_eq!(ok.unwrap(), vec!["Field(1).not().not().not().not().not().assertTrue()"]);

    let err = CommandTranslator::new(&graph)
        .with_max_expression_depth(5)
        .translate(&commands, &mut names())
        .unwrap_err();
    assert!(matches!(err, CompilerError::ExpressionDepthExceeded(5)));
}
