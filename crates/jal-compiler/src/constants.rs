//! Constant registry
//!
//! Named constants a schema or command may use instead of a literal. The
//! table is fixed at compile time and never mutated.

use crate::error::{CompilerError, Result};
use crate::variable::ConversionChain;
use jal_runtime::Link;
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstantInfo {
    pub name: &'static str,
    /// Identifier used when the constant is declared in a program
    pub program_name: &'static str,
    pub program_type: &'static str,
    /// o1js expression producing the constant
    pub program_value: &'static str,
    /// Raw value fed to the transformation pipeline
    pub value: u64,
    pub links: &'static [&'static str],
}

impl ConstantInfo {
    pub fn raw_value(&self) -> Value {
        Value::from(self.value)
    }

    pub fn chain(&self) -> Result<ConversionChain> {
        let links = self
            .links
            .iter()
            .map(|link| link.parse::<Link>())
            .collect::<std::result::Result<Vec<_>, _>>()?;
        ConversionChain::new(links)
    }
}

/// 365.25 days in milliseconds
const YEAR_MS: u64 = 31_557_600_000;

pub static CONSTANTS: &[ConstantInfo] = &[ConstantInfo {
    name: "year",
    program_name: "YEAR",
    program_type: "Field",
    program_value: "Field(365.25 * 24 * 60 * 60 * 1000)",
    value: YEAR_MS,
    links: &["uint64-mina:field"],
}];

pub fn constant_info(name: &str) -> Result<&'static ConstantInfo> {
    CONSTANTS
        .iter()
        .find(|constant| constant.name == name)
        .ok_or_else(|| CompilerError::UnknownConstant(name.to_string()))
}
