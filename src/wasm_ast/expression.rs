use crate::wasm_ast::literal::Literal;
use crate::wasm_ast::operators::{AtomicRmwOp, BinaryOp, HostOp, UnaryOp};
use crate::wasm_ast::types::{Name, Type};
use serde::{Deserialize, Serialize};

/// One node of a function body.
///
/// The set of kinds is closed. Node kinds the parsing layer could not map
/// onto this enum arrive as `Unsupported` so the backend can decide whether
/// to fail or degrade.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "node", rename_all = "snake_case")]
pub enum Expression {
    Block {
        #[serde(default)]
        name: Option<Name>,
        list: Vec<Expression>,
    },

    If {
        condition: Box<Expression>,
        if_true: Box<Expression>,
        #[serde(default)]
        if_false: Option<Box<Expression>>,
    },

    Loop {
        #[serde(default)]
        name: Option<Name>,
        body: Box<Expression>,
    },

    Break {
        name: Name,
        #[serde(default)]
        condition: Option<Box<Expression>>,
        #[serde(default)]
        value: Option<Box<Expression>>,
    },

    /// `br_table`. `body[i]` is the statement for `targets[i]`.
    Switch {
        targets: Vec<Name>,
        #[serde(default)]
        default: Option<Name>,
        #[serde(default)]
        value: Option<Box<Expression>>,
        body: Vec<Expression>,
    },

    Call {
        target: Name,
        operands: Vec<Expression>,
    },

    CallImport {
        target: Name,
        operands: Vec<Expression>,
    },

    CallIndirect {
        target: Box<Expression>,
        operands: Vec<Expression>,
        /// Index into the module's function types, when known.
        #[serde(default)]
        function_type: Option<u32>,
    },

    GetLocal {
        index: u32,
    },

    SetLocal {
        index: u32,
        value: Box<Expression>,
        #[serde(default)]
        tee: bool,
    },

    GetGlobal {
        name: Name,
    },

    SetGlobal {
        name: Name,
        value: Box<Expression>,
    },

    Load {
        bytes: u8,
        #[serde(default)]
        signed: bool,
        #[serde(default)]
        offset: u32,
        #[serde(default)]
        align: u32,
        #[serde(default)]
        atomic: bool,
        ptr: Box<Expression>,
        ty: Type,
    },

    Store {
        bytes: u8,
        #[serde(default)]
        offset: u32,
        #[serde(default)]
        align: u32,
        #[serde(default)]
        atomic: bool,
        ptr: Box<Expression>,
        value: Box<Expression>,
        value_type: Type,
    },

    Const {
        value: Literal,
    },

    Unary {
        op: UnaryOp,
        value: Box<Expression>,
    },

    Binary {
        op: BinaryOp,
        left: Box<Expression>,
        right: Box<Expression>,
    },

    Select {
        if_true: Box<Expression>,
        if_false: Box<Expression>,
        condition: Box<Expression>,
    },

    Drop {
        value: Box<Expression>,
    },

    Return {
        #[serde(default)]
        value: Option<Box<Expression>>,
    },

    Host {
        op: HostOp,
        operands: Vec<Expression>,
    },

    Nop,

    Unreachable,

    AtomicRmw {
        op: AtomicRmwOp,
        bytes: u8,
        #[serde(default)]
        offset: u32,
        ptr: Box<Expression>,
        value: Box<Expression>,
        ty: Type,
    },

    AtomicCmpxchg {
        bytes: u8,
        #[serde(default)]
        offset: u32,
        ptr: Box<Expression>,
        expected: Box<Expression>,
        replacement: Box<Expression>,
        ty: Type,
    },

    Unsupported {
        kind: String,
    },
}

impl Expression {
    /// Short name of the node kind, used in diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Expression::Block { .. } => "block",
            Expression::If { .. } => "if",
            Expression::Loop { .. } => "loop",
            Expression::Break { .. } => "break",
            Expression::Switch { .. } => "switch",
            Expression::Call { .. } => "call",
            Expression::CallImport { .. } => "call_import",
            Expression::CallIndirect { .. } => "call_indirect",
            Expression::GetLocal { .. } => "get_local",
            Expression::SetLocal { .. } => "set_local",
            Expression::GetGlobal { .. } => "get_global",
            Expression::SetGlobal { .. } => "set_global",
            Expression::Load { .. } => "load",
            Expression::Store { .. } => "store",
            Expression::Const { .. } => "const",
            Expression::Unary { .. } => "unary",
            Expression::Binary { .. } => "binary",
            Expression::Select { .. } => "select",
            Expression::Drop { .. } => "drop",
            Expression::Return { .. } => "return",
            Expression::Host { .. } => "host",
            Expression::Nop => "nop",
            Expression::Unreachable => "unreachable",
            Expression::AtomicRmw { .. } => "atomic_rmw",
            Expression::AtomicCmpxchg { .. } => "atomic_cmpxchg",
            Expression::Unsupported { .. } => "unsupported",
        }
    }

    /// True for kinds whose translation is a bare expression fragment
    /// that needs a `;` and indentation before it can stand as a statement.
    pub fn is_value_fragment(&self) -> bool {
        match self {
            Expression::SetLocal { tee, .. } => *tee,
            Expression::Const { .. }
            | Expression::GetLocal { .. }
            | Expression::GetGlobal { .. }
            | Expression::Binary { .. }
            | Expression::Unary { .. }
            | Expression::Select { .. }
            | Expression::Load { .. }
            | Expression::Call { .. }
            | Expression::CallImport { .. }
            | Expression::CallIndirect { .. }
            | Expression::Host { .. } => true,
            _ => false,
        }
    }

    // Shorthand constructors for tools and tests that build trees by hand.

    pub fn block(list: Vec<Expression>) -> Self {
        Expression::Block { name: None, list }
    }

    pub fn constant(value: Literal) -> Self {
        Expression::Const { value }
    }

    pub fn get_local(index: u32) -> Self {
        Expression::GetLocal { index }
    }

    pub fn set_local(index: u32, value: Expression) -> Self {
        Expression::SetLocal {
            index,
            value: Box::new(value),
            tee: false,
        }
    }

    pub fn binary(op: BinaryOp, left: Expression, right: Expression) -> Self {
        Expression::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn unary(op: UnaryOp, value: Expression) -> Self {
        Expression::Unary {
            op,
            value: Box::new(value),
        }
    }

    pub fn call(target: impl Into<Name>, operands: Vec<Expression>) -> Self {
        Expression::Call {
            target: target.into(),
            operands,
        }
    }

    pub fn ret(value: Option<Expression>) -> Self {
        Expression::Return {
            value: value.map(Box::new),
        }
    }
}
