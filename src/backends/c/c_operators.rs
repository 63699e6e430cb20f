//! Operator, type and literal tables for the C backend.

use crate::compiler_messages::compiler_errors::{CompilerError, ErrorMetaDataKey};
use crate::wasm_ast::{BinaryOp, Literal, Type, UnaryOp};

/// Emitted in place of any operator without a C rendering.
pub const UNMAPPED_OPERATOR: &str = "NONE";

const I32_MIN_LITERAL: &str = "(-2147483647 - 1)";
const I64_MIN_LITERAL: &str = "(-9223372036854775807LL - 1)";

/// Infix C operator for a binary instruction.
///
/// Signed and unsigned variants share a symbol; signedness is not modeled.
/// Rotations, min/max and copysign have no infix form.
pub fn binary_operator(op: BinaryOp) -> &'static str {
    use BinaryOp::*;

    match op {
        I32Add | I64Add | F32Add | F64Add => "+",
        I32Sub | I64Sub | F32Sub | F64Sub => "-",
        I32Mul | I64Mul | F32Mul | F64Mul => "*",
        I32DivS | I32DivU | I64DivS | I64DivU | F32Div | F64Div => "/",
        I32RemS | I32RemU | I64RemS | I64RemU => "%",
        I32And | I64And => "&",
        I32Or | I64Or => "|",
        I32Xor | I64Xor => "^",
        I32Shl | I64Shl => "<<",
        I32ShrS | I32ShrU | I64ShrS | I64ShrU => ">>",
        I32Eq | I64Eq | F32Eq | F64Eq => "==",
        I32Ne | I64Ne | F32Ne | F64Ne => "!=",
        I32LtS | I32LtU | I64LtS | I64LtU | F32Lt | F64Lt => "<",
        I32LeS | I32LeU | I64LeS | I64LeU | F32Le | F64Le => "<=",
        I32GtS | I32GtU | I64GtS | I64GtU | F32Gt | F64Gt => ">",
        I32GeS | I32GeU | I64GeS | I64GeU | F32Ge | F64Ge => ">=",

        I32Rotl | I32Rotr | I64Rotl | I64Rotr => UNMAPPED_OPERATOR,
        F32Min | F32Max | F32Copysign | F64Min | F64Max | F64Copysign => UNMAPPED_OPERATOR,
    }
}

/// How a unary instruction wraps its operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryPattern {
    /// `op(x)` for a prefix operator.
    Prefix(&'static str),
    /// `name(x)` for a libm or compiler builtin.
    Call(&'static str),
    /// `(type)(x)`.
    Cast(&'static str),
    /// `(outer)(inner)(x)`, used where an intermediate width matters.
    DoubleCast(&'static str, &'static str),
}

pub fn unary_pattern(op: UnaryOp) -> Option<UnaryPattern> {
    use UnaryOp::*;
    use UnaryPattern::*;

    let pattern = match op {
        I32Clz => Call("__builtin_clz"),
        I32Ctz => Call("__builtin_ctz"),
        I32Popcnt => Call("__builtin_popcount"),
        I64Clz => Call("__builtin_clzll"),
        I64Ctz => Call("__builtin_ctzll"),
        I64Popcnt => Call("__builtin_popcountll"),
        I32Eqz | I64Eqz => Prefix("!"),

        F32Neg | F64Neg => Prefix("-"),
        F32Abs => Call("fabsf"),
        F32Ceil => Call("ceilf"),
        F32Floor => Call("floorf"),
        F32Trunc => Call("truncf"),
        F32Nearest => Call("nearbyintf"),
        F32Sqrt => Call("sqrtf"),
        F64Abs => Call("fabs"),
        F64Ceil => Call("ceil"),
        F64Floor => Call("floor"),
        F64Trunc => Call("trunc"),
        F64Nearest => Call("nearbyint"),
        F64Sqrt => Call("sqrt"),

        I32WrapI64 => Cast("int32_t"),
        I64ExtendI32S => Cast("int64_t"),
        I64ExtendI32U => DoubleCast("int64_t", "uint32_t"),
        I32TruncF32S | I32TruncF64S => Cast("int32_t"),
        I32TruncF32U | I32TruncF64U => Cast("uint32_t"),
        I64TruncF32S | I64TruncF64S => Cast("int64_t"),
        I64TruncF32U | I64TruncF64U => Cast("uint64_t"),
        F32ConvertI32S | F32ConvertI64S | F32DemoteF64 => Cast("float32_t"),
        F32ConvertI32U => DoubleCast("float32_t", "uint32_t"),
        F32ConvertI64U => DoubleCast("float32_t", "uint64_t"),
        F64ConvertI32S | F64ConvertI64S | F64PromoteF32 => Cast("float64_t"),
        F64ConvertI32U => DoubleCast("float64_t", "uint32_t"),
        F64ConvertI64U => DoubleCast("float64_t", "uint64_t"),

        I32Extend8S => DoubleCast("int32_t", "int8_t"),
        I32Extend16S => DoubleCast("int32_t", "int16_t"),
        I64Extend8S => DoubleCast("int64_t", "int8_t"),
        I64Extend16S => DoubleCast("int64_t", "int16_t"),
        I64Extend32S => DoubleCast("int64_t", "int32_t"),

        // Bit reinterpretation needs memory or a union, neither of which
        // a single expression can provide.
        I32ReinterpretF32 | I64ReinterpretF64 | F32ReinterpretI32 | F64ReinterpretI64 => {
            return None;
        }
    };

    Some(pattern)
}

/// Wraps an already translated operand in the C form of `op`.
pub fn unary_expression(op: UnaryOp, operand: &str) -> String {
    match unary_pattern(op) {
        Some(UnaryPattern::Prefix(symbol)) => format!("{}({})", symbol, operand),
        Some(UnaryPattern::Call(function)) => format!("{}({})", function, operand),
        Some(UnaryPattern::Cast(ty)) => format!("({})({})", ty, operand),
        Some(UnaryPattern::DoubleCast(outer, inner)) => {
            format!("({})({})({})", outer, inner, operand)
        }
        None => format!("{}({})", UNMAPPED_OPERATOR, operand),
    }
}

/// C type name for a value type.
pub fn resolve_type(ty: Type) -> Result<&'static str, CompilerError> {
    match ty {
        Type::None | Type::Unreachable => Ok("void"),
        Type::I32 => Ok("int32_t"),
        Type::I64 => Ok("int64_t"),
        Type::F32 => Ok("float32_t"),
        Type::F64 => Ok("float64_t"),
        Type::V128 => Err(CompilerError::input_error(
            "v128 values have no C type in this backend",
        )
        .with_metadata(ErrorMetaDataKey::FoundType, ty.to_string())),
    }
}

/// Formats a constant as C literal text.
///
/// Integers print their exact decimal value. The most negative value of
/// each width is spelled as a subtraction, since C parses `-N` as negating
/// `N` and that `N` does not fit the signed type. Floats print the shortest
/// decimal that parses back to the same bits, always with a fraction or
/// exponent, and f32 carries an `f` suffix. NaN payloads are not kept.
pub fn format_literal(literal: &Literal) -> Result<String, CompilerError> {
    match literal {
        Literal::None => Ok("0".to_owned()),
        Literal::I32(i32::MIN) => Ok(I32_MIN_LITERAL.to_owned()),
        Literal::I64(i64::MIN) => Ok(I64_MIN_LITERAL.to_owned()),
        Literal::I32(value) => Ok(value.to_string()),
        Literal::I64(value) => Ok(value.to_string()),
        Literal::F32(value) => Ok(format_f32(*value)),
        Literal::F64(value) => Ok(format_f64(*value)),
        Literal::V128(_) => Err(CompilerError::input_error(
            "v128 constants have no C literal form in this backend",
        )
        .with_metadata(ErrorMetaDataKey::FoundType, "v128")),
    }
}

fn format_f32(value: f32) -> String {
    if value.is_nan() {
        "NAN".to_owned()
    } else if value.is_infinite() {
        if value.is_sign_positive() {
            "INFINITY".to_owned()
        } else {
            "-INFINITY".to_owned()
        }
    } else {
        format!("{:?}f", value)
    }
}

fn format_f64(value: f64) -> String {
    if value.is_nan() {
        "NAN".to_owned()
    } else if value.is_infinite() {
        if value.is_sign_positive() {
            "INFINITY".to_owned()
        } else {
            "-INFINITY".to_owned()
        }
    } else {
        format!("{:?}", value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn parse_f32_literal(text: &str) -> f32 {
        match text {
            "INFINITY" => f32::INFINITY,
            "-INFINITY" => f32::NEG_INFINITY,
            _ => text
                .strip_suffix('f')
                .expect("f32 literals carry an f suffix")
                .parse()
                .expect("f32 literal should parse"),
        }
    }

    fn parse_f64_literal(text: &str) -> f64 {
        match text {
            "INFINITY" => f64::INFINITY,
            "-INFINITY" => f64::NEG_INFINITY,
            _ => text.parse().expect("f64 literal should parse"),
        }
    }

    proptest! {
        #[test]
        fn i32_literals_round_trip(value in any::<i32>().prop_filter("min is spelled out", |v| *v != i32::MIN)) {
            let text = format_literal(&Literal::I32(value)).unwrap();
            prop_assert_eq!(text.parse::<i32>().unwrap(), value);
        }

        #[test]
        fn i64_literals_round_trip(value in any::<i64>().prop_filter("min is spelled out", |v| *v != i64::MIN)) {
            let text = format_literal(&Literal::I64(value)).unwrap();
            prop_assert_eq!(text.parse::<i64>().unwrap(), value);
        }

        #[test]
        fn f32_literals_round_trip(bits in any::<u32>()) {
            let value = f32::from_bits(bits);
            prop_assume!(!value.is_nan());
            let text = format_literal(&Literal::F32(value)).unwrap();
            prop_assert_eq!(parse_f32_literal(&text).to_bits(), bits);
        }

        #[test]
        fn f64_literals_round_trip(bits in any::<u64>()) {
            let value = f64::from_bits(bits);
            prop_assume!(!value.is_nan());
            let text = format_literal(&Literal::F64(value)).unwrap();
            prop_assert_eq!(parse_f64_literal(&text).to_bits(), bits);
        }
    }

    #[test]
    fn signed_zero_keeps_its_sign() {
        assert_eq!(format_literal(&Literal::F64(-0.0)).unwrap(), "-0.0");
        assert_eq!(format_literal(&Literal::F32(0.0)).unwrap(), "0.0f");
    }

    #[test]
    fn floats_always_look_like_floats() {
        assert_eq!(format_literal(&Literal::F64(1.0)).unwrap(), "1.0");
        assert_eq!(format_literal(&Literal::F32(2.5)).unwrap(), "2.5f");
        assert_eq!(format_literal(&Literal::F64(1e300)).unwrap(), "1e300");
    }

    #[test]
    fn nan_degrades_without_failing() {
        assert_eq!(format_literal(&Literal::F32(f32::NAN)).unwrap(), "NAN");
        assert_eq!(format_literal(&Literal::F64(-f64::NAN)).unwrap(), "NAN");
    }

    #[test]
    fn most_negative_integers_stay_signed_in_c() {
        assert_eq!(
            format_literal(&Literal::I32(i32::MIN)).unwrap(),
            "(-2147483647 - 1)"
        );
        assert_eq!(
            format_literal(&Literal::I64(i64::MIN)).unwrap(),
            "(-9223372036854775807LL - 1)"
        );
        assert_eq!(
            format_literal(&Literal::I64(i64::MIN + 1)).unwrap(),
            "-9223372036854775807"
        );
    }

    #[test]
    fn none_literal_is_zero() {
        assert_eq!(format_literal(&Literal::None).unwrap(), "0");
    }

    #[test]
    fn v128_has_no_literal_or_type() {
        assert!(format_literal(&Literal::V128([0; 16])).is_err());
        assert!(resolve_type(Type::V128).is_err());
    }

    #[test]
    fn value_types_map_to_fixed_width_names() {
        assert_eq!(resolve_type(Type::I32).unwrap(), "int32_t");
        assert_eq!(resolve_type(Type::I64).unwrap(), "int64_t");
        assert_eq!(resolve_type(Type::F32).unwrap(), "float32_t");
        assert_eq!(resolve_type(Type::F64).unwrap(), "float64_t");
        assert_eq!(resolve_type(Type::None).unwrap(), "void");
        assert_eq!(resolve_type(Type::Unreachable).unwrap(), "void");
    }

    #[test]
    fn unmapped_operators_use_the_sentinel() {
        assert_eq!(binary_operator(BinaryOp::I32Rotl), "NONE");
        assert_eq!(binary_operator(BinaryOp::F64Copysign), "NONE");
        assert_eq!(
            unary_expression(UnaryOp::F32ReinterpretI32, "local_0"),
            "NONE(local_0)"
        );
    }

    #[test]
    fn unary_patterns_wrap_the_operand() {
        assert_eq!(unary_expression(UnaryOp::I32Eqz, "local_0"), "!(local_0)");
        assert_eq!(unary_expression(UnaryOp::F64Sqrt, "x"), "sqrt(x)");
        assert_eq!(unary_expression(UnaryOp::I32WrapI64, "x"), "(int32_t)(x)");
        assert_eq!(
            unary_expression(UnaryOp::I64ExtendI32U, "x"),
            "(int64_t)(uint32_t)(x)"
        );
    }
}
