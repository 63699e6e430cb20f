//! Read-only WebAssembly syntax tree handed to the C backend.
//!
//! The parsing layer builds these values; the backend only reads them.
//! Every node owns its children, so a function body is a plain tree.

pub mod expression;
pub mod literal;
pub mod module;
pub mod operators;
pub mod types;

pub use expression::Expression;
pub use literal::Literal;
pub use module::{Function, FunctionType, Global, Import, ImportKind, Module};
pub use operators::{AtomicRmwOp, BinaryOp, HostOp, UnaryOp};
pub use types::{Name, Type};
