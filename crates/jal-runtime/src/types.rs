//! Core types for JAL values
//!
//! A raw scalar reaches its circuit type through a chain of [`Link`]s. Every
//! intermediate and final value of that chain is a [`TypedValue`], tagged
//! with the [`NodeType`] the link declared for it.

use crate::error::{Result, RuntimeError};
use halo2curves::group::ff::PrimeField;
use halo2curves::pasta::Fp;
use serde::ser::{Serialize, SerializeSeq, Serializer};
use std::fmt;
use std::str::FromStr;

/// Namespace separator inside a node type name (`mina:field`)
pub const NAMESPACE_SEPARATOR: char = ':';

/// Separator between the source and target node of a link (`uint64-mina:field`)
pub const LINK_SEPARATOR: char = '-';

/// One step of a conversion chain
///
/// # Examples
///
/// ```
/// use jal_runtime::Link;
///
/// let link: Link = "uint64-mina:field".parse().unwrap();
/// assert_eq!(link.source(), "uint64");
/// assert_eq!(link.target(), "mina:field");
/// assert_eq!(link.target_type(), "field");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Link {
    source: String,
    target: String,
}

impl Link {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    /// Source node name without its namespace
    pub fn source_type(&self) -> &str {
        strip_namespace(&self.source)
    }

    /// Target node name without its namespace
    pub fn target_type(&self) -> &str {
        strip_namespace(&self.target)
    }
}

fn strip_namespace(node: &str) -> &str {
    node.rsplit(NAMESPACE_SEPARATOR).next().unwrap_or(node)
}

impl FromStr for Link {
    type Err = RuntimeError;

    fn from_str(s: &str) -> Result<Self> {
        let mut parts = s.split(LINK_SEPARATOR);
        match (parts.next(), parts.next(), parts.next()) {
            (Some(source), Some(target), None) if !source.is_empty() && !target.is_empty() => {
                Ok(Link::new(source, target))
            }
            _ => Err(RuntimeError::InvalidLink(s.to_string())),
        }
    }
}

impl fmt::Display for Link {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.source, LINK_SEPARATOR, self.target)
    }
}

/// Value kinds known to the built-in transformation graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeType {
    Ascii,
    Utf8,
    Bytes,
    Uint16,
    Uint32,
    Uint64,
    Uint128,
    Boolean,
    Base58,
    IsoDate,
    UnixTime,
    MinaField,
    MinaUInt64,
    MinaBool,
    MinaString,
    MinaSignature,
    MinaPublicKey,
    MinaFields,
    Iso3166Alpha2,
    Iso3166Numeric,
}

impl NodeType {
    pub const ALL: [NodeType; 20] = [
        NodeType::Ascii,
        NodeType::Utf8,
        NodeType::Bytes,
        NodeType::Uint16,
        NodeType::Uint32,
        NodeType::Uint64,
        NodeType::Uint128,
        NodeType::Boolean,
        NodeType::Base58,
        NodeType::IsoDate,
        NodeType::UnixTime,
        NodeType::MinaField,
        NodeType::MinaUInt64,
        NodeType::MinaBool,
        NodeType::MinaString,
        NodeType::MinaSignature,
        NodeType::MinaPublicKey,
        NodeType::MinaFields,
        NodeType::Iso3166Alpha2,
        NodeType::Iso3166Numeric,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            NodeType::Ascii => "ascii",
            NodeType::Utf8 => "utf8",
            NodeType::Bytes => "bytes",
            NodeType::Uint16 => "uint16",
            NodeType::Uint32 => "uint32",
            NodeType::Uint64 => "uint64",
            NodeType::Uint128 => "uint128",
            NodeType::Boolean => "boolean",
            NodeType::Base58 => "base58",
            NodeType::IsoDate => "isodate",
            NodeType::UnixTime => "unixtime",
            NodeType::MinaField => "mina:field",
            NodeType::MinaUInt64 => "mina:uint64",
            NodeType::MinaBool => "mina:bool",
            NodeType::MinaString => "mina:string",
            NodeType::MinaSignature => "mina:signature",
            NodeType::MinaPublicKey => "mina:publickey",
            NodeType::MinaFields => "mina:fields",
            NodeType::Iso3166Alpha2 => "iso3166alpha2",
            NodeType::Iso3166Numeric => "iso3166numeric",
        }
    }

    /// Bit width of the unsigned integer nodes
    pub fn uint_bits(&self) -> Option<u32> {
        match self {
            NodeType::Uint16 => Some(16),
            NodeType::Uint32 => Some(32),
            NodeType::Uint64 => Some(64),
            NodeType::Uint128 => Some(128),
            _ => None,
        }
    }
}

impl FromStr for NodeType {
    type Err = RuntimeError;

    fn from_str(s: &str) -> Result<Self> {
        NodeType::ALL
            .iter()
            .copied()
            .find(|node| node.name() == s)
            .ok_or_else(|| RuntimeError::UnknownNodeType(s.to_string()))
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A materialized value produced by the transformation pipeline
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypedValue {
    Ascii(String),
    Utf8(String),
    Bytes(Vec<u8>),
    /// Unsigned integer tagged with its declared node (`uint16` .. `uint128`)
    Uint(NodeType, u128),
    Boolean(bool),
    Base58(String),
    IsoDate(String),
    /// Milliseconds since the UNIX epoch
    UnixTime(i64),
    Field(Fp),
    UInt64(u64),
    Bool(bool),
    CircuitString(String),
    Signature(String),
    PublicKey(String),
    Fields(Vec<Fp>),
    /// ISO 3166-1 alpha-2 country code (`BR`)
    Iso3166Alpha2(String),
    /// ISO 3166-1 numeric country code (`76`)
    Iso3166Numeric(u16),
}

impl TypedValue {
    pub fn node_type(&self) -> NodeType {
        match self {
            TypedValue::Ascii(_) => NodeType::Ascii,
            TypedValue::Utf8(_) => NodeType::Utf8,
            TypedValue::Bytes(_) => NodeType::Bytes,
            TypedValue::Uint(node, _) => *node,
            TypedValue::Boolean(_) => NodeType::Boolean,
            TypedValue::Base58(_) => NodeType::Base58,
            TypedValue::IsoDate(_) => NodeType::IsoDate,
            TypedValue::UnixTime(_) => NodeType::UnixTime,
            TypedValue::Field(_) => NodeType::MinaField,
            TypedValue::UInt64(_) => NodeType::MinaUInt64,
            TypedValue::Bool(_) => NodeType::MinaBool,
            TypedValue::CircuitString(_) => NodeType::MinaString,
            TypedValue::Signature(_) => NodeType::MinaSignature,
            TypedValue::PublicKey(_) => NodeType::MinaPublicKey,
            TypedValue::Fields(_) => NodeType::MinaFields,
            TypedValue::Iso3166Alpha2(_) => NodeType::Iso3166Alpha2,
            TypedValue::Iso3166Numeric(_) => NodeType::Iso3166Numeric,
        }
    }
}

impl Serialize for TypedValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            TypedValue::Ascii(s)
            | TypedValue::Utf8(s)
            | TypedValue::Base58(s)
            | TypedValue::IsoDate(s)
            | TypedValue::CircuitString(s)
            | TypedValue::Signature(s)
            | TypedValue::PublicKey(s)
            | TypedValue::Iso3166Alpha2(s) => serializer.serialize_str(s),
            TypedValue::Iso3166Numeric(n) => serializer.serialize_u16(*n),
            TypedValue::Bytes(bytes) => serializer.serialize_str(&hex::encode(bytes)),
            // u128 does not survive every JSON consumer, so large integers travel as text
            TypedValue::Uint(_, n) => serializer.serialize_str(&n.to_string()),
            TypedValue::UInt64(n) => serializer.serialize_str(&n.to_string()),
            TypedValue::Boolean(b) | TypedValue::Bool(b) => serializer.serialize_bool(*b),
            TypedValue::UnixTime(t) => serializer.serialize_i64(*t),
            TypedValue::Field(f) => serializer.serialize_str(&field_to_hex(f)),
            TypedValue::Fields(fields) => {
                let mut seq = serializer.serialize_seq(Some(fields.len()))?;
                for f in fields {
                    seq.serialize_element(&field_to_hex(f))?;
                }
                seq.end()
            }
        }
    }
}

/// Field element from an integer below 2^128
pub fn field_from_u128(value: u128) -> Fp {
    let mut repr = <Fp as PrimeField>::Repr::default();
    repr.as_mut()[..16].copy_from_slice(&value.to_le_bytes());
    // every u128 is below the Pasta modulus, so the canonical check cannot fail
    Option::from(Fp::from_repr(repr)).unwrap_or(Fp::from(0))
}

/// Integer value of a field element, `None` when it does not fit in 128 bits
pub fn field_to_u128(field: &Fp) -> Option<u128> {
    let repr = field.to_repr();
    let bytes = repr.as_ref();
    if bytes[16..].iter().any(|b| *b != 0) {
        return None;
    }
    let mut low = [0u8; 16];
    low.copy_from_slice(&bytes[..16]);
    Some(u128::from_le_bytes(low))
}

/// Big-endian `0x` hex rendering of a field element
pub fn field_to_hex(field: &Fp) -> String {
    let mut bytes = field.to_repr().as_ref().to_vec();
    bytes.reverse();
    format!("0x{}", hex::encode(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_link_parse() {
        let link: Link = "mina:uint64-mina:fields".parse().unwrap();
        assert_eq!(link.source_type(), "uint64");
        assert_eq!(link.target_type(), "fields");
        assert_eq!(link.to_string(), "mina:uint64-mina:fields");
    }

    #[test]
    fn test_link_parse_rejects_malformed() {
        assert!("uint64".parse::<Link>().is_err());
        assert!("a-b-c".parse::<Link>().is_err());
        assert!("-mina:field".parse::<Link>().is_err());
    }

    #[test]
    fn test_node_type_names_round_trip() {
        for node in NodeType::ALL {
            assert_eq!(node.name().parse::<NodeType>().unwrap(), node);
        }
    }

    #[test]
    fn test_field_u128_conversion() {
        let value = u128::MAX - 7;
        assert_eq!(field_to_u128(&field_from_u128(value)), Some(value));
        assert_eq!(field_to_u128(&-Fp::from(1)), None);
    }

    #[test]
    fn test_field_to_hex_is_big_endian() {
        assert_eq!(
            field_to_hex(&Fp::from(255)),
            "0x00000000000000000000000000000000000000000000000000000000000000ff"
        );
    }
}
