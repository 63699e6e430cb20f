use serde::{Deserialize, Serialize};

/// A constant operand. Exactly one representation is active and the
/// variant doubles as the type tag.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum Literal {
    /// The value of an unreachable or typeless constant.
    None,
    I32(i32),
    I64(i64),
    F32(f32),
    F64(f64),
    /// Raw little-endian lanes. Carried through, never rendered.
    V128([u8; 16]),
}
