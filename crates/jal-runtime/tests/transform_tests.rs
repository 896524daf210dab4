//! Tests for the built-in transformation graph

use halo2curves::pasta::Fp;
use jal_runtime::{field_from_u128, Link, NodeType, RuntimeError, TrGraph, Transformer, TypedValue};
use serde_json::{json, Value};

fn transform(raw: Value, chain: &[&str]) -> Result<TypedValue, RuntimeError> {
    let links: Vec<Link> = chain.iter().map(|l| l.parse().unwrap()).collect();
    TrGraph::new().transform(&raw, &links)
}

// ============================================================================
// STRING CHAINS
// ============================================================================

#[test]
fn test_ascii_to_circuit_string() {
    let value = transform(json!("Test-test"), &["ascii-mina:string"]).unwrap();
    assert_eq!(value, TypedValue::CircuitString("Test-test".to_string()));
}

#[test]
fn test_ascii_bytes_uint128_field() {
    let value = transform(
        json!("hello"),
        &["ascii-bytes", "bytes-uint128", "uint128-mina:field"],
    )
    .unwrap();
    let expected = u128::from_be_bytes({
        let mut buf = [0u8; 16];
        buf[11..].copy_from_slice(b"hello");
        buf
    });
    assert_eq!(value, TypedValue::Field(field_from_u128(expected)));
}

#[test]
fn test_ascii_rejects_non_ascii() {
    let err = transform(json!("héllo"), &["ascii-bytes"]).unwrap_err();
    assert!(matches!(err, RuntimeError::InvalidValue { .. }));
}

#[test]
fn test_utf8_to_boolean() {
    let value = transform(json!("true"), &["utf8-boolean", "boolean-mina:bool"]).unwrap();
    assert_eq!(value, TypedValue::Bool(true));
}

#[test]
fn test_circuit_string_to_fields_is_padded() {
    let value = transform(json!("ab"), &["ascii-mina:string", "mina:string-mina:fields"]).unwrap();
    match value {
        TypedValue::Fields(fields) => {
            assert_eq!(fields.len(), 128);
            assert_eq!(fields[0], Fp::from(97));
            assert_eq!(fields[1], Fp::from(98));
            assert_eq!(fields[2], Fp::from(0));
        }
        other => panic!("Expected fields, got {:?}", other),
    }
}

#[test]
fn test_circuit_string_too_long() {
    let long = "a".repeat(129);
    assert!(transform(json!(long), &["ascii-mina:string"]).is_err());
}

// ============================================================================
// INTEGER CHAINS
// ============================================================================

#[test]
fn test_uint64_to_mina_uint64() {
    let value = transform(json!(18), &["uint64-mina:uint64"]).unwrap();
    assert_eq!(value, TypedValue::UInt64(18));
}

#[test]
fn test_uint_from_decimal_string() {
    let max = json!("340282366920938463463374607431768211455");
    let value = transform(max, &["uint128-mina:field"]).unwrap();
    assert_eq!(value, TypedValue::Field(field_from_u128(u128::MAX)));
}

#[test]
fn test_uint16_to_bytes_is_fixed_width() {
    let value = transform(json!(2), &["uint16-bytes"]).unwrap();
    assert_eq!(value, TypedValue::Bytes(vec![0, 2]));
}

#[test]
fn test_bytes_too_wide_for_uint16() {
    let err = transform(json!("abc"), &["ascii-bytes", "bytes-uint16"]).unwrap_err();
    assert!(err.to_string().contains("do not fit"));
}

#[test]
fn test_negative_number_rejected() {
    assert!(transform(json!(-1), &["uint64-mina:field"]).is_err());
}

#[test]
fn test_field_to_uint64() {
    let value = transform(json!(7), &["uint64-mina:field", "mina:field-mina:uint64"]).unwrap();
    assert_eq!(value, TypedValue::UInt64(7));
}

#[test]
fn test_field_from_hex() {
    let value = transform(json!("0xff"), &["mina:field-mina:fields"]).unwrap();
    assert_eq!(value, TypedValue::Fields(vec![Fp::from(255)]));
}

// ============================================================================
// DATES, BOOLEANS, KEYS
// ============================================================================

#[test]
fn test_isodate_to_field() {
    let value = transform(
        json!("2000-06-08T00:00:00.000Z"),
        &["isodate-unixtime", "unixtime-uint64", "uint64-mina:field"],
    )
    .unwrap();
    assert_eq!(value, TypedValue::Field(Fp::from(960_422_400_000)));
}

#[test]
fn test_date_only_isodate_is_midnight_utc() {
    let value = transform(json!("2000-06-08"), &["isodate-unixtime"]).unwrap();
    assert_eq!(value, TypedValue::UnixTime(960_422_400_000));
}

#[test]
fn test_invalid_isodate() {
    let err = transform(json!("yesterday"), &["isodate-unixtime"]).unwrap_err();
    assert!(matches!(err, RuntimeError::InvalidValue { .. }));
}

#[test]
fn test_boolean_to_field() {
    let value = transform(json!(true), &["boolean-mina:bool", "mina:bool-mina:field"]).unwrap();
    assert_eq!(value, TypedValue::Field(Fp::from(1)));
}

#[test]
fn test_base58_public_key() {
    let key = "B62qj2aocCw3Ub1BnQXhUj1omS7dmVEvC3z8dsL2MkLcrw1cUgD3Apo";
    let value = transform(json!(key), &["base58-mina:publickey"]).unwrap();
    assert_eq!(value, TypedValue::PublicKey(key.to_string()));
    assert_eq!(value.node_type(), NodeType::MinaPublicKey);
}

#[test]
fn test_base58_rejects_zero_character() {
    let err = transform(json!("B62q0"), &["base58-mina:signature"]).unwrap_err();
    assert!(err.to_string().contains("invalid base58 character"));
}

#[test]
fn test_unsupported_edge() {
    let err = transform(json!("abc"), &["base58-mina:field"]).unwrap_err();
    assert_eq!(err, RuntimeError::unsupported_conversion("base58", "mina:field"));
}

#[test]
fn test_country_code_to_field() {
    let value = transform(
        json!("BR"),
        &["iso3166alpha2-iso3166numeric", "iso3166numeric-uint64", "uint64-mina:field"],
    )
    .unwrap();
    assert_eq!(value, TypedValue::Field(Fp::from(76)));
}

#[test]
fn test_unknown_country_code() {
    let err = transform(json!("XX"), &["iso3166alpha2-iso3166numeric"]).unwrap_err();
    assert!(err.to_string().contains("unknown country code"));
}

#[test]
fn test_numeric_country_code_from_raw() {
    let value = transform(json!(840), &["iso3166numeric-uint16"]).unwrap();
    assert_eq!(value, TypedValue::Uint(NodeType::Uint16, 840));
    assert!(transform(json!(999), &["iso3166numeric-uint16"]).is_err());
}

// ============================================================================
// SERIALIZATION
// ============================================================================

#[test]
fn test_typed_value_serialization() {
    assert_eq!(serde_json::to_value(TypedValue::Bool(true)).unwrap(), json!(true));
    assert_eq!(serde_json::to_value(TypedValue::UInt64(5)).unwrap(), json!("5"));
    assert_eq!(
        serde_json::to_value(TypedValue::CircuitString("x".to_string())).unwrap(),
        json!("x")
    );
    assert_eq!(
        serde_json::to_value(TypedValue::Field(Fp::from(16))).unwrap(),
        json!("0x0000000000000000000000000000000000000000000000000000000000000010")
    );
}
