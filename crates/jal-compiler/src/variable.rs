//! Variable model for JAL programs
//!
//! A JAL program is an input schema, a tree whose leaves are [`Variable`]s,
//! plus an ordered list of [`FunctionVar`] commands over those variables.

use crate::error::{CompilerError, Result};
use jal_runtime::{display_path, Link, Path, Tree};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// First path segment of the private region of an input schema
pub const PRIVATE_REGION: &str = "private";

/// First path segment of the public region of an input schema
pub const PUBLIC_REGION: &str = "public";

/// Whether `path` lies in the public region
pub fn is_public(path: &[String]) -> bool {
    path.first().map(String::as_str) == Some(PUBLIC_REGION)
}

/// Non-empty ordered list of conversion links
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionChain(Vec<Link>);

impl ConversionChain {
    pub fn new(links: Vec<Link>) -> Result<Self> {
        if links.is_empty() {
            return Err(CompilerError::parse("Transformation links must not be empty"));
        }
        Ok(Self(links))
    }

    pub fn links(&self) -> &[Link] {
        &self.0
    }

    pub fn last(&self) -> &Link {
        // non-empty by construction
        &self.0[self.0.len() - 1]
    }

    /// Every link except the last one
    pub fn prefix(&self) -> &[Link] {
        &self.0[..self.0.len() - 1]
    }

    /// Type name the chain ends in, without namespace (`field` for `uint64-mina:field`)
    pub fn final_type(&self) -> &str {
        self.last().target_type()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StaticVar {
    pub value: Value,
    pub chain: ConversionChain,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SetupVar {
    pub chain: ConversionChain,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstVar {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceVar {
    pub path: Path,
}

/// Binary operators, all rendered as `left.<method>(right)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Equal,
    Greater,
    GreaterEqual,
    Less,
    LessEqual,
}

impl BinaryOp {
    pub const ALL: [BinaryOp; 8] = [
        BinaryOp::Add,
        BinaryOp::Sub,
        BinaryOp::Mul,
        BinaryOp::Equal,
        BinaryOp::Greater,
        BinaryOp::GreaterEqual,
        BinaryOp::Less,
        BinaryOp::LessEqual,
    ];

    /// Operator key as written in a program
    pub fn key(&self) -> &'static str {
        match self {
            BinaryOp::Add => "add",
            BinaryOp::Sub => "sub",
            BinaryOp::Mul => "mul",
            BinaryOp::Equal => "equal",
            BinaryOp::Greater => "greater",
            BinaryOp::GreaterEqual => "greaterEqual",
            BinaryOp::Less => "less",
            BinaryOp::LessEqual => "lessEqual",
        }
    }

    /// o1js method invoked on the left operand
    pub fn method(&self) -> &'static str {
        match self {
            BinaryOp::Add => "add",
            BinaryOp::Sub => "sub",
            BinaryOp::Mul => "mul",
            BinaryOp::Equal => "equals",
            BinaryOp::Greater => "greaterThan",
            BinaryOp::GreaterEqual => "greaterThanOrEqual",
            BinaryOp::Less => "lessThan",
            BinaryOp::LessEqual => "lessThanOrEqual",
        }
    }
}

/// One operation node. Operands are boxed variables, so expressions nest.
#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    Binary(BinaryOp, Box<Variable>, Box<Variable>),
    Assert(Box<Variable>),
    Ternary(Box<Variable>, Box<Variable>, Box<Variable>),
    Transform(Box<Variable>, Link),
    VerifySign {
        algorithm: String,
        signature: Box<Variable>,
        message: Box<Variable>,
        public_key: Box<Variable>,
    },
    Hash {
        algorithm: String,
        inputs: Vec<Variable>,
    },
    Spread(Box<Variable>),
    Not(Box<Variable>),
}

/// Operator keys recognized in commands and function variables
pub const OPERATOR_KEYS: [&str; 15] = [
    "add",
    "sub",
    "mul",
    "equal",
    "greater",
    "greaterEqual",
    "less",
    "lessEqual",
    "assert",
    "ternary",
    "transform",
    "verifySign",
    "hash",
    "spread",
    "not",
];

impl Operation {
    pub fn key(&self) -> &'static str {
        match self {
            Operation::Binary(op, _, _) => op.key(),
            Operation::Assert(_) => "assert",
            Operation::Ternary(..) => "ternary",
            Operation::Transform(..) => "transform",
            Operation::VerifySign { .. } => "verifySign",
            Operation::Hash { .. } => "hash",
            Operation::Spread(_) => "spread",
            Operation::Not(_) => "not",
        }
    }

    /// Whether the operator may bind its result to an output name
    pub fn binds_output(&self) -> bool {
        !matches!(self, Operation::Assert(_) | Operation::Spread(_))
    }
}

/// An operation with an optional named result
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionVar {
    pub operation: Operation,
    pub out: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Variable {
    Static(StaticVar),
    Setup(SetupVar),
    Constant(ConstVar),
    Reference(ReferenceVar),
    Function(FunctionVar),
}

impl Variable {
    pub fn kind(&self) -> &'static str {
        match self {
            Variable::Static(_) => "static",
            Variable::Setup(_) => "setup",
            Variable::Constant(_) => "constant",
            Variable::Reference(_) => "reference",
            Variable::Function(_) => "function",
        }
    }

    pub fn is_static(&self) -> bool {
        matches!(self, Variable::Static(_))
    }

    pub fn is_setup(&self) -> bool {
        matches!(self, Variable::Setup(_))
    }

    pub fn is_constant(&self) -> bool {
        matches!(self, Variable::Constant(_))
    }

    pub fn is_reference(&self) -> bool {
        matches!(self, Variable::Reference(_))
    }

    pub fn is_function(&self) -> bool {
        matches!(self, Variable::Function(_))
    }

    /// Static, setup and constant variables carry a value of their own
    pub fn is_materializable(&self) -> bool {
        self.is_static() || self.is_setup() || self.is_constant()
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Variable::Static(v) => write!(f, "static({}, {})", v.value, v.chain.last()),
            Variable::Setup(v) => write!(f, "setup({})", v.chain.last()),
            Variable::Constant(v) => write!(f, "constant({})", v.name),
            Variable::Reference(v) => write!(f, "reference({})", display_path(&v.path)),
            Variable::Function(v) => write!(f, "function({})", v.operation.key()),
        }
    }
}

/// Input schema: `private` and `public` regions of variables
pub type InputSchema = Tree<Variable>;

/// Program shapes the compiler can emit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Target {
    /// Stateless o1js `ZkProgram` with a structured public input
    ZkProgram,
    /// o1js `SmartContract` with a single method over private parameters
    SmartContract,
}

impl Target {
    pub const ALL: [Target; 2] = [Target::ZkProgram, Target::SmartContract];

    pub fn id(&self) -> &'static str {
        match self {
            Target::ZkProgram => "o1js:zk-program",
            Target::SmartContract => "o1js:smart-contract",
        }
    }
}

impl FromStr for Target {
    type Err = CompilerError;

    fn from_str(s: &str) -> Result<Self> {
        Target::ALL
            .iter()
            .copied()
            .find(|target| target.id() == s)
            .ok_or_else(|| CompilerError::UnsupportedTarget(s.to_string()))
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// A parsed JAL program
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub target: Target,
    pub input_schema: InputSchema,
    pub commands: Vec<FunctionVar>,
    pub options: Map<String, Value>,
}
