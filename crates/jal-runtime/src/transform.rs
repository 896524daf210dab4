//! Value transformation pipeline
//!
//! Turns a raw JSON scalar into a [`TypedValue`] by walking a conversion
//! chain. The compiler only depends on the [`Transformer`] trait; [`TrGraph`]
//! is the built-in graph of conversions between the [`NodeType`]s.

use crate::country::{alpha2_to_numeric, is_numeric_code};
use crate::error::{Result, RuntimeError};
use crate::types::{field_from_u128, field_to_u128, Link, NodeType, TypedValue};
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use halo2curves::group::ff::PrimeField;
use halo2curves::pasta::Fp;
use serde_json::Value;

/// Maximum number of characters an o1js `CircuitString` holds
pub const CIRCUIT_STRING_MAX_LENGTH: usize = 128;

const BASE58_ALPHABET: &str = "123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";

/// Largest integer a JSON float can carry without losing precision (2^53 - 1)
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

pub trait Transformer {
    /// Applies every link of `links`, in order, to `raw`.
    ///
    /// The raw value is first read as the source node of the first link.
    fn transform(&self, raw: &Value, links: &[Link]) -> Result<TypedValue>;
}

/// The built-in transformation graph
///
/// Supported edges:
///
/// | from                      | to                                              |
/// |---------------------------|-------------------------------------------------|
/// | `ascii`, `utf8`           | `bytes`, `boolean`, `mina:string`, each other   |
/// | `bytes`                   | `ascii`, `utf8`, `uint16`..`uint128`            |
/// | `uint16`..`uint128`       | `bytes`, other widths, `mina:field`, `mina:uint64` |
/// | `boolean`                 | `mina:bool`, `uint16`..`uint128`                |
/// | `base58`                  | `mina:signature`, `mina:publickey`              |
/// | `isodate`                 | `unixtime`                                      |
/// | `unixtime`                | `uint16`..`uint128`                             |
/// | `mina:field`              | `mina:uint64`, `mina:fields`                    |
/// | `mina:uint64`, `mina:bool`| `mina:field`, `mina:fields`                     |
/// | `mina:string`             | `mina:fields`                                   |
/// | `iso3166alpha2`           | `iso3166numeric`                                |
/// | `iso3166numeric`          | `uint16`..`uint128`                             |
#[derive(Debug, Clone, Copy, Default)]
pub struct TrGraph;

impl TrGraph {
    pub fn new() -> Self {
        Self
    }

    /// Reads a raw JSON value as `node`
    pub fn from_raw(&self, node: NodeType, raw: &Value) -> Result<TypedValue> {
        match node {
            NodeType::Ascii => {
                let s = expect_str(node, raw)?;
                ensure_ascii(node, s)?;
                Ok(TypedValue::Ascii(s.to_string()))
            }
            NodeType::Utf8 => Ok(TypedValue::Utf8(expect_str(node, raw)?.to_string())),
            NodeType::Bytes => read_bytes(raw).map(TypedValue::Bytes),
            NodeType::Uint16 | NodeType::Uint32 | NodeType::Uint64 | NodeType::Uint128 => {
                let n = read_uint(node, raw)?;
                fit_uint(node, n)
            }
            NodeType::Boolean => read_bool(node, raw).map(TypedValue::Boolean),
            NodeType::Base58 => {
                let s = expect_str(node, raw)?;
                ensure_base58(node, s)?;
                Ok(TypedValue::Base58(s.to_string()))
            }
            NodeType::IsoDate => Ok(TypedValue::IsoDate(expect_str(node, raw)?.to_string())),
            NodeType::UnixTime => match raw.as_i64() {
                Some(t) => Ok(TypedValue::UnixTime(t)),
                None => Err(invalid(node, format!("expected integer, got {}", raw))),
            },
            NodeType::MinaField => read_field(node, raw).map(TypedValue::Field),
            NodeType::MinaUInt64 => {
                let n = read_uint(node, raw)?;
                u64::try_from(n)
                    .map(TypedValue::UInt64)
                    .map_err(|_| invalid(node, format!("{} overflows 64 bits", n)))
            }
            NodeType::MinaBool => read_bool(node, raw).map(TypedValue::Bool),
            NodeType::MinaString => {
                let s = expect_str(node, raw)?;
                ensure_circuit_string(node, s)?;
                Ok(TypedValue::CircuitString(s.to_string()))
            }
            NodeType::MinaSignature | NodeType::MinaPublicKey => {
                let s = expect_str(node, raw)?;
                ensure_base58(node, s)?;
                Ok(if node == NodeType::MinaSignature {
                    TypedValue::Signature(s.to_string())
                } else {
                    TypedValue::PublicKey(s.to_string())
                })
            }
            NodeType::MinaFields => match raw {
                Value::Array(items) => items
                    .iter()
                    .map(|item| read_field(node, item))
                    .collect::<Result<Vec<_>>>()
                    .map(TypedValue::Fields),
                other => Err(invalid(node, format!("expected array, got {}", other))),
            },
            NodeType::Iso3166Alpha2 => {
                let code = expect_str(node, raw)?;
                alpha2_to_numeric(code)
                    .map(|_| TypedValue::Iso3166Alpha2(code.to_string()))
                    .ok_or_else(|| invalid(node, format!("unknown country code {:?}", code)))
            }
            NodeType::Iso3166Numeric => {
                let n = read_uint(node, raw)?;
                u16::try_from(n)
                    .ok()
                    .filter(|numeric| is_numeric_code(*numeric))
                    .map(TypedValue::Iso3166Numeric)
                    .ok_or_else(|| invalid(node, format!("unknown country code {}", n)))
            }
        }
    }

    /// Follows a single edge of the graph
    pub fn convert(&self, value: TypedValue, target: NodeType) -> Result<TypedValue> {
        let source = value.node_type();
        let unsupported = || RuntimeError::unsupported_conversion(source.name(), target.name());

        match (value, target) {
            (TypedValue::Ascii(s) | TypedValue::Utf8(s), NodeType::Bytes) => {
                Ok(TypedValue::Bytes(s.into_bytes()))
            }
            (TypedValue::Ascii(s), NodeType::Utf8) => Ok(TypedValue::Utf8(s)),
            (TypedValue::Utf8(s), NodeType::Ascii) => {
                ensure_ascii(target, &s)?;
                Ok(TypedValue::Ascii(s))
            }
            (TypedValue::Ascii(s) | TypedValue::Utf8(s), NodeType::Boolean) => {
                read_bool(target, &Value::String(s)).map(TypedValue::Boolean)
            }
            (TypedValue::Ascii(s) | TypedValue::Utf8(s), NodeType::MinaString) => {
                ensure_circuit_string(target, &s)?;
                Ok(TypedValue::CircuitString(s))
            }
            (TypedValue::Bytes(bytes), NodeType::Ascii) => {
                let s = String::from_utf8(bytes).map_err(|e| invalid(target, e.to_string()))?;
                ensure_ascii(target, &s)?;
                Ok(TypedValue::Ascii(s))
            }
            (TypedValue::Bytes(bytes), NodeType::Utf8) => String::from_utf8(bytes)
                .map(TypedValue::Utf8)
                .map_err(|e| invalid(target, e.to_string())),
            (TypedValue::Bytes(bytes), node) if node.uint_bits().is_some() => {
                let bits = node.uint_bits().unwrap_or(128);
                if bytes.len() * 8 > bits as usize {
                    return Err(invalid(
                        node,
                        format!("{} bytes do not fit in {} bits", bytes.len(), bits),
                    ));
                }
                let n = bytes.iter().fold(0u128, |acc, b| (acc << 8) | u128::from(*b));
                Ok(TypedValue::Uint(node, n))
            }
            (TypedValue::Uint(node, n), NodeType::Bytes) => {
                let width = node.uint_bits().unwrap_or(128) as usize / 8;
                Ok(TypedValue::Bytes(n.to_be_bytes()[16 - width..].to_vec()))
            }
            (TypedValue::Uint(_, n), node) if node.uint_bits().is_some() => fit_uint(node, n),
            (TypedValue::Uint(_, n), NodeType::MinaField) => {
                Ok(TypedValue::Field(field_from_u128(n)))
            }
            (TypedValue::Uint(_, n), NodeType::MinaUInt64) => u64::try_from(n)
                .map(TypedValue::UInt64)
                .map_err(|_| invalid(target, format!("{} overflows 64 bits", n))),
            (TypedValue::Boolean(b), NodeType::MinaBool) => Ok(TypedValue::Bool(b)),
            (TypedValue::Boolean(b), node) if node.uint_bits().is_some() => {
                Ok(TypedValue::Uint(node, u128::from(b)))
            }
            (TypedValue::Base58(s), NodeType::MinaSignature) => Ok(TypedValue::Signature(s)),
            (TypedValue::Base58(s), NodeType::MinaPublicKey) => Ok(TypedValue::PublicKey(s)),
            (TypedValue::IsoDate(s), NodeType::UnixTime) => {
                parse_isodate(&s).map(TypedValue::UnixTime)
            }
            (TypedValue::UnixTime(t), node) if node.uint_bits().is_some() => {
                let n = u128::try_from(t)
                    .map_err(|_| invalid(node, format!("negative timestamp {}", t)))?;
                fit_uint(node, n)
            }
            (TypedValue::Field(f), NodeType::MinaUInt64) => field_to_u128(&f)
                .and_then(|n| u64::try_from(n).ok())
                .map(TypedValue::UInt64)
                .ok_or_else(|| invalid(target, "field element overflows 64 bits")),
            (TypedValue::Field(f), NodeType::MinaFields) => Ok(TypedValue::Fields(vec![f])),
            (TypedValue::UInt64(n), NodeType::MinaField) => Ok(TypedValue::Field(Fp::from(n))),
            (TypedValue::UInt64(n), NodeType::MinaFields) => {
                Ok(TypedValue::Fields(vec![Fp::from(n)]))
            }
            (TypedValue::Bool(b), NodeType::MinaField) => {
                Ok(TypedValue::Field(Fp::from(u64::from(b))))
            }
            (TypedValue::Bool(b), NodeType::MinaFields) => {
                Ok(TypedValue::Fields(vec![Fp::from(u64::from(b))]))
            }
            (TypedValue::CircuitString(s), NodeType::MinaFields) => {
                let mut fields: Vec<Fp> = s.chars().map(|c| Fp::from(u64::from(c))).collect();
                fields.resize(CIRCUIT_STRING_MAX_LENGTH, Fp::from(0));
                Ok(TypedValue::Fields(fields))
            }
            (TypedValue::Iso3166Alpha2(code), NodeType::Iso3166Numeric) => {
                alpha2_to_numeric(&code)
                    .map(TypedValue::Iso3166Numeric)
                    .ok_or_else(|| invalid(target, format!("unknown country code {:?}", code)))
            }
            (TypedValue::Iso3166Numeric(n), node) if node.uint_bits().is_some() => {
                fit_uint(node, u128::from(n))
            }
            _ => Err(unsupported()),
        }
    }
}

impl Transformer for TrGraph {
    fn transform(&self, raw: &Value, links: &[Link]) -> Result<TypedValue> {
        let first = links.first().ok_or(RuntimeError::EmptyChain)?;
        let mut value = self.from_raw(first.source().parse()?, raw)?;

        for link in links {
            let source: NodeType = link.source().parse()?;
            let target: NodeType = link.target().parse()?;
            if value.node_type() != source {
                return Err(RuntimeError::ChainMismatch {
                    expected: source.name().to_string(),
                    found: value.node_type().name().to_string(),
                });
            }
            value = self.convert(value, target)?;
        }

        Ok(value)
    }
}

fn invalid(node: NodeType, reason: impl Into<String>) -> RuntimeError {
    RuntimeError::invalid_value(node.name(), reason)
}

/// Milliseconds since the epoch for an RFC 3339 timestamp or a bare
/// `YYYY-MM-DD` date (midnight UTC)
fn parse_isodate(s: &str) -> Result<i64> {
    if let Ok(date) = DateTime::parse_from_rfc3339(s) {
        return Ok(date.timestamp_millis());
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|midnight| Utc.from_utc_datetime(&midnight).timestamp_millis())
        .ok_or_else(|| invalid(NodeType::IsoDate, format!("{} is not an ISO 8601 date", s)))
}

fn expect_str<'a>(node: NodeType, raw: &'a Value) -> Result<&'a str> {
    raw.as_str()
        .ok_or_else(|| invalid(node, format!("expected string, got {}", raw)))
}

fn ensure_ascii(node: NodeType, s: &str) -> Result<()> {
    if s.is_ascii() {
        Ok(())
    } else {
        Err(invalid(node, format!("{:?} is not ascii", s)))
    }
}

fn ensure_base58(node: NodeType, s: &str) -> Result<()> {
    match s.chars().find(|c| !BASE58_ALPHABET.contains(*c)) {
        None if !s.is_empty() => Ok(()),
        None => Err(invalid(node, "empty base58 string")),
        Some(c) => Err(invalid(node, format!("invalid base58 character {:?}", c))),
    }
}

fn ensure_circuit_string(node: NodeType, s: &str) -> Result<()> {
    let length = s.chars().count();
    if length > CIRCUIT_STRING_MAX_LENGTH {
        return Err(invalid(
            node,
            format!(
                "{} characters exceed the maximum of {}",
                length, CIRCUIT_STRING_MAX_LENGTH
            ),
        ));
    }
    Ok(())
}

fn read_bool(node: NodeType, raw: &Value) -> Result<bool> {
    match raw {
        Value::Bool(b) => Ok(*b),
        Value::String(s) if s == "true" => Ok(true),
        Value::String(s) if s == "false" => Ok(false),
        other => Err(invalid(node, format!("expected boolean, got {}", other))),
    }
}

fn read_uint(node: NodeType, raw: &Value) -> Result<u128> {
    let not_uint = || invalid(node, format!("expected unsigned integer, got {}", raw));
    match raw {
        Value::Number(n) => {
            if let Some(u) = n.as_u64() {
                return Ok(u128::from(u));
            }
            match n.as_f64() {
                Some(f) if f >= 0.0 && f.fract() == 0.0 && f <= MAX_SAFE_INTEGER => Ok(f as u128),
                _ => Err(not_uint()),
            }
        }
        Value::String(s) => s.parse::<u128>().map_err(|_| not_uint()),
        _ => Err(not_uint()),
    }
}

fn fit_uint(node: NodeType, n: u128) -> Result<TypedValue> {
    let bits = node.uint_bits().unwrap_or(128);
    if bits < 128 && n >> bits != 0 {
        return Err(invalid(node, format!("{} overflows {} bits", n, bits)));
    }
    Ok(TypedValue::Uint(node, n))
}

fn read_bytes(raw: &Value) -> Result<Vec<u8>> {
    let node = NodeType::Bytes;
    match raw {
        Value::String(s) => {
            let digits = s.strip_prefix("0x").unwrap_or(s);
            hex::decode(digits).map_err(|e| invalid(node, e.to_string()))
        }
        Value::Array(items) => items
            .iter()
            .map(|item| {
                item.as_u64()
                    .and_then(|b| u8::try_from(b).ok())
                    .ok_or_else(|| invalid(node, format!("{} is not a byte", item)))
            })
            .collect(),
        other => Err(invalid(
            node,
            format!("expected hex string or byte array, got {}", other),
        )),
    }
}

fn read_field(node: NodeType, raw: &Value) -> Result<Fp> {
    if let Some(hex_str) = raw.as_str().and_then(|s| s.strip_prefix("0x")) {
        let mut bytes = hex::decode(hex_str).map_err(|e| invalid(node, e.to_string()))?;
        if bytes.len() > 32 {
            return Err(invalid(node, "more than 32 bytes"));
        }
        bytes.reverse();
        let mut repr = <Fp as PrimeField>::Repr::default();
        repr.as_mut()[..bytes.len()].copy_from_slice(&bytes);
        return Option::from(Fp::from_repr(repr))
            .ok_or_else(|| invalid(node, "not a canonical field element"));
    }
    read_uint(node, raw).map(field_from_u128)
}
