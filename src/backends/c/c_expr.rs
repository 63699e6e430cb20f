use crate::backends::c::TranslationContext;
use crate::backends::c::c_declarations::function_pointer_type;
use crate::backends::c::c_host_functions::resolve_host_function;
use crate::backends::c::c_names::{function_name, local_name, plain_name, variable_name};
use crate::backends::c::c_operators::{
    UNMAPPED_OPERATOR, binary_operator, format_literal, unary_expression, unary_pattern,
};
use crate::codegen_log;
use crate::compiler_messages::compiler_errors::{CompilerError, ErrorMetaDataKey};
use crate::compiler_messages::compiler_warnings::WarningKind;
use crate::wasm_ast::{BinaryOp, Expression, HostOp, Name, UnaryOp};

const NO_ELSE_MARKER: &str = "// <No else block>";
const ATOMIC_UNSUPPORTED: &str = "/* Atomic operation unsupported */";

/// Decoded memory immediates, echoed into the access comment.
#[derive(Debug, Clone, Copy)]
struct MemoryAccess {
    bytes: u8,
    offset: u32,
    align: u32,
    atomic: bool,
}

// Every level of expression nesting passes through `translate_expression`,
// so its frame bounds how deep a tree fits on the stack. Arms that need
// more than a couple of locals live in `#[inline(never)]` helpers below.
impl<'m> TranslationContext<'m> {
    /// Translates `node` in its natural position.
    ///
    /// Statement kinds come back indented for `depth` with a trailing
    /// newline. Value kinds come back as a bare fragment the caller places
    /// inside a larger statement.
    pub fn translate_expression(
        &self,
        node: &Expression,
        depth: i32,
    ) -> Result<String, CompilerError> {
        let ctx = self.descend()?;
        codegen_log!(format!("[C][Expr] {} at depth {}", node.kind_name(), depth));

        match node {
            Expression::Block { list, .. } => ctx.translate_block(list, depth),
            Expression::Binary { op, left, right } => ctx.translate_binary(*op, left, right, depth),
            Expression::Unary { op, value } => ctx.translate_unary(*op, value, depth),
            Expression::GetLocal { index } => ctx.local_reference(*index),
            Expression::SetLocal { index, value, tee } => {
                ctx.translate_set_local(*index, value, *tee, depth)
            }
            Expression::GetGlobal { name } => Ok(ctx.global_reference(name)),
            Expression::SetGlobal { name, value } => ctx.translate_set_global(name, value, depth),
            Expression::Const { value } => format_literal(value),
            Expression::If {
                condition,
                if_true,
                if_false,
            } => ctx.translate_if(condition, if_true, if_false.as_deref(), depth),
            Expression::Loop { name, body } => ctx.translate_loop(name.as_ref(), body, depth),
            Expression::Break {
                name,
                condition,
                value,
            } => ctx.translate_break(name, condition.as_deref(), value.is_some(), depth),
            Expression::Switch {
                targets,
                default,
                value,
                body,
            } => ctx.translate_switch(targets, default.as_ref(), value.as_deref(), body, depth),
            Expression::Call { target, operands } => {
                ctx.translate_call(&function_name(target), operands, depth)
            }
            Expression::CallImport { target, operands } => {
                ctx.translate_call(&plain_name(target), operands, depth)
            }
            Expression::CallIndirect {
                target,
                operands,
                function_type,
            } => ctx.translate_call_indirect(target, operands, *function_type, depth),
            Expression::Load {
                bytes,
                signed,
                offset,
                align,
                atomic,
                ptr,
                ..
            } => {
                let access = MemoryAccess {
                    bytes: *bytes,
                    offset: *offset,
                    align: *align,
                    atomic: *atomic,
                };
                ctx.translate_load(access, *signed, ptr, depth)
            }
            Expression::Store {
                bytes,
                offset,
                align,
                atomic,
                ptr,
                value,
                ..
            } => {
                let access = MemoryAccess {
                    bytes: *bytes,
                    offset: *offset,
                    align: *align,
                    atomic: *atomic,
                };
                ctx.translate_store(access, ptr, value, depth)
            }
            Expression::Select {
                if_true,
                if_false,
                condition,
            } => ctx.translate_select(if_true, if_false, condition, depth),
            Expression::Drop { value } => ctx.translate_drop(value, depth),
            Expression::Return { value } => ctx.translate_return(value.as_deref(), depth),
            Expression::Host { op, operands } => ctx.translate_host(*op, operands, depth),
            Expression::Nop => Ok(ctx.comment_line("// <Nop expression>", depth)),
            Expression::Unreachable => Ok(ctx.comment_line("/* Unreachable */", depth)),
            Expression::AtomicRmw { .. } | Expression::AtomicCmpxchg { .. } => {
                ctx.warn_atomic(node);
                Ok(ctx.comment_line(ATOMIC_UNSUPPORTED, depth))
            }
            Expression::Unsupported { kind } => ctx.translate_unsupported(kind, depth),
        }
    }

    /// Translates `node` where a complete statement is expected, wrapping
    /// bare value fragments into `<indent><expr>;\n`.
    pub(crate) fn translate_statement(
        &self,
        node: &Expression,
        depth: i32,
    ) -> Result<String, CompilerError> {
        if node.is_value_fragment() {
            let value = self.translate_expression(node, depth)?;
            Ok(format!("{}{};\n", self.indentation(depth), value))
        } else {
            self.translate_expression(node, depth)
        }
    }

    /// Translates `node` where C needs an expression. Statement kinds that
    /// have an expression form use it; the rest render as statements, which
    /// covers blocks and ifs that yield values only approximately.
    pub(crate) fn translate_value(
        &self,
        node: &Expression,
        depth: i32,
    ) -> Result<String, CompilerError> {
        match node {
            Expression::SetLocal { index, value, .. } => {
                self.descend()?.translate_set_local(*index, value, true, depth)
            }
            Expression::Nop => Ok("0 /* <Nop expression> */".to_owned()),
            Expression::Unreachable => Ok("0 /* Unreachable */".to_owned()),
            Expression::AtomicRmw { .. } | Expression::AtomicCmpxchg { .. } => {
                self.warn_atomic(node);
                Ok(format!("0 {}", ATOMIC_UNSUPPORTED))
            }
            Expression::Unsupported { kind } => {
                self.check_unsupported(kind)?;
                Ok(format!("0 /* <Unsupported expression: {}> */", kind))
            }
            _ => self.translate_expression(node, depth),
        }
    }

    /// Body of an if arm, loop or switch case at `depth`. Blocks already
    /// indent their children one level deeper; anything else is placed
    /// there as a single statement.
    pub(crate) fn translate_branch(
        &self,
        node: &Expression,
        depth: i32,
    ) -> Result<String, CompilerError> {
        match node {
            Expression::Block { .. } => self.translate_expression(node, depth),
            _ => self.translate_statement(node, depth + 1),
        }
    }

    /// Name a global is referred to by: imported globals keep their extern
    /// name, module globals can be prefixed through the config.
    pub(crate) fn global_reference(&self, name: &Name) -> String {
        if self.config.prefix_globals && self.module.global(name).is_some() {
            variable_name(name)
        } else {
            plain_name(name)
        }
    }

    /// Local indices are checked against the owning function. Module-level
    /// contexts have no locals to check against.
    fn local_reference(&self, index: u32) -> Result<String, CompilerError> {
        if let Some(function) = self.function {
            if function.local_type(index).is_none() {
                return Err(CompilerError::input_error(format!(
                    "Local {} does not exist, '{}' declares {} locals",
                    index,
                    function.name,
                    function.num_locals()
                ))
                .with_metadata(ErrorMetaDataKey::ExpectedCount, function.num_locals().to_string())
                .with_metadata(ErrorMetaDataKey::FoundCount, index.to_string()));
            }
        }

        Ok(local_name(index))
    }

    #[inline(never)]
    fn translate_block(&self, list: &[Expression], depth: i32) -> Result<String, CompilerError> {
        let mut out = String::new();
        for child in list {
            out.push_str(&self.translate_statement(child, depth + 1)?);
        }

        Ok(out)
    }

    #[inline(never)]
    fn translate_binary(
        &self,
        op: BinaryOp,
        left: &Expression,
        right: &Expression,
        depth: i32,
    ) -> Result<String, CompilerError> {
        let left = self.translate_value(left, depth)?;
        let right = self.translate_value(right, depth)?;
        Ok(format!("{} {} {}", left, self.binary_symbol(op), right))
    }

    #[inline(never)]
    fn translate_unary(
        &self,
        op: UnaryOp,
        value: &Expression,
        depth: i32,
    ) -> Result<String, CompilerError> {
        let operand = self.translate_value(value, depth)?;
        if unary_pattern(op).is_none() {
            self.warn(
                WarningKind::UnmappedOperator,
                format!("Unary operator {:?} has no C form", op),
            );
        }

        Ok(unary_expression(op, &operand))
    }

    #[inline(never)]
    fn translate_set_local(
        &self,
        index: u32,
        value: &Expression,
        tee: bool,
        depth: i32,
    ) -> Result<String, CompilerError> {
        let local = self.local_reference(index)?;
        let value = self.translate_value(value, depth)?;

        if tee {
            Ok(format!("({} = {})", local, value))
        } else {
            Ok(format!("{}{} = {};\n", self.indentation(depth), local, value))
        }
    }

    #[inline(never)]
    fn translate_set_global(
        &self,
        name: &Name,
        value: &Expression,
        depth: i32,
    ) -> Result<String, CompilerError> {
        let value = self.translate_value(value, depth)?;
        Ok(format!(
            "{}{} = {};\n",
            self.indentation(depth),
            self.global_reference(name),
            value
        ))
    }

    #[inline(never)]
    fn translate_if(
        &self,
        condition: &Expression,
        if_true: &Expression,
        if_false: Option<&Expression>,
        depth: i32,
    ) -> Result<String, CompilerError> {
        let indent = self.indentation(depth);
        let condition = self.translate_value(condition, depth)?;
        let true_block = self.translate_branch(if_true, depth)?;

        let mut out = format!("{}if ({}) {{\n{}{}}}", indent, condition, true_block, indent);
        match if_false {
            Some(if_false) => {
                let false_block = self.translate_branch(if_false, depth)?;
                out.push_str(&format!(" else {{\n{}{}}}\n", false_block, indent));
            }
            None => {
                out.push(' ');
                out.push_str(NO_ELSE_MARKER);
                out.push('\n');
            }
        }

        Ok(out)
    }

    #[inline(never)]
    fn translate_loop(
        &self,
        name: Option<&Name>,
        body: &Expression,
        depth: i32,
    ) -> Result<String, CompilerError> {
        let indent = self.indentation(depth);
        let body = self.translate_branch(body, depth)?;

        let mut out = format!("{}while (true) {{", indent);
        if let Some(name) = name {
            out.push_str(&format!(" // Loop name: '{}'", name));
        }
        out.push('\n');
        out.push_str(&body);
        out.push_str(&indent);
        out.push('}');
        if let Some(name) = name {
            out.push_str(&format!(" // End of loop '{}'", name));
        }
        out.push('\n');

        Ok(out)
    }

    #[inline(never)]
    fn translate_break(
        &self,
        name: &Name,
        condition: Option<&Expression>,
        has_value: bool,
        depth: i32,
    ) -> Result<String, CompilerError> {
        let mut out = self.indentation(depth);
        match condition {
            Some(condition) => {
                let condition = self.translate_value(condition, depth)?;
                out.push_str(&format!("if ({}) break;", condition));
            }
            None => out.push_str("break;"),
        }

        // Values carried out of a block by a branch are not modeled.
        if has_value {
            self.warn(
                WarningKind::BreakValueDiscarded,
                format!("Value of branch to '{}' was dropped", name),
            );
            out.push_str(" // <Break value discarded>");
        }

        out.push('\n');
        Ok(out)
    }

    /// Case labels sit at the `switch` keyword's level, their bodies and
    /// closing `break;` one level in.
    #[inline(never)]
    fn translate_switch(
        &self,
        targets: &[Name],
        default: Option<&Name>,
        value: Option<&Expression>,
        body: &[Expression],
        depth: i32,
    ) -> Result<String, CompilerError> {
        let Some(value) = value else {
            return Err(CompilerError::input_error(
                "Switch has no discriminant value to branch on",
            )
            .with_metadata(ErrorMetaDataKey::ExpressionKind, "switch"));
        };

        if targets.len() != body.len() {
            return Err(CompilerError::input_error(format!(
                "Switch pairs {} case labels with {} case bodies",
                targets.len(),
                body.len()
            ))
            .with_metadata(ErrorMetaDataKey::ExpressionKind, "switch")
            .with_metadata(ErrorMetaDataKey::ExpectedCount, targets.len().to_string())
            .with_metadata(ErrorMetaDataKey::FoundCount, body.len().to_string()));
        }

        let indent = self.indentation(depth);
        let case_indent = self.indentation(depth + 1);
        let discriminant = self.translate_value(value, depth)?;

        let mut out = format!("{}switch ({}) {{\n", indent, discriminant);

        for (target, statement) in targets.iter().zip(body) {
            out.push_str(&format!("{}case {}:\n", indent, plain_name(target)));
            out.push_str(&self.translate_branch(statement, depth)?);
            out.push_str(&format!("{}break;\n", case_indent));
        }

        if let Some(default) = default {
            out.push_str(&format!("{}default: // '{}'\n", indent, default));
            out.push_str(&format!("{}break;\n", case_indent));
        }

        out.push_str(&format!("{}}}\n", indent));
        Ok(out)
    }

    #[inline(never)]
    fn translate_call(
        &self,
        callee: &str,
        operands: &[Expression],
        depth: i32,
    ) -> Result<String, CompilerError> {
        Ok(format!("{}{}", callee, self.translate_operands(operands, depth)?))
    }

    #[inline(never)]
    fn translate_call_indirect(
        &self,
        target: &Expression,
        operands: &[Expression],
        function_type: Option<u32>,
        depth: i32,
    ) -> Result<String, CompilerError> {
        let callee = self.translate_value(target, depth)?;
        let operands = self.translate_operands(operands, depth)?;

        let signature = match function_type {
            Some(index) => {
                let ty = self.module.function_type(index).ok_or_else(|| {
                    CompilerError::input_error(format!(
                        "Indirect call refers to function type {} which the module does not define",
                        index
                    ))
                })?;
                function_pointer_type(ty)?
            }
            None => "unknown".to_owned(),
        };

        self.warn(
            WarningKind::IndirectCallUnchecked,
            format!("Indirect call through '{}' is not type checked", callee),
        );

        Ok(format!(
            "/* Indirect call: callee type {} not verified */ ({}){}",
            signature, callee, operands
        ))
    }

    #[inline(never)]
    fn translate_load(
        &self,
        access: MemoryAccess,
        signed: bool,
        ptr: &Expression,
        depth: i32,
    ) -> Result<String, CompilerError> {
        let ptr = self.translate_value(ptr, depth)?;
        self.warn(
            WarningKind::MemoryAccessApproximated,
            format!("Load from '{}' rendered as a plain read", ptr),
        );

        Ok(format!(
            "/* Load: offset={}, align={}, bytes={}, atomic={}, signed={} */ {}",
            access.offset, access.align, access.bytes, access.atomic, signed, ptr
        ))
    }

    #[inline(never)]
    fn translate_store(
        &self,
        access: MemoryAccess,
        ptr: &Expression,
        value: &Expression,
        depth: i32,
    ) -> Result<String, CompilerError> {
        let ptr = self.translate_value(ptr, depth)?;
        let value = self.translate_value(value, depth)?;
        self.warn(
            WarningKind::MemoryAccessApproximated,
            format!("Store to '{}' rendered as a plain assignment", ptr),
        );

        let indent = self.indentation(depth);
        let detail = self.indentation(depth + 1);

        let mut out = format!("{}/* Store:\n", indent);
        out.push_str(&format!("{}Offset: {}\n", detail, access.offset));
        out.push_str(&format!("{}Align:  {}\n", detail, access.align));
        out.push_str(&format!("{}Bytes:  {}\n", detail, access.bytes));
        out.push_str(&format!("{}Atomic: {} */\n", detail, access.atomic));
        out.push_str(&format!("{}{} = {};\n", indent, ptr, value));

        Ok(out)
    }

    #[inline(never)]
    fn translate_select(
        &self,
        if_true: &Expression,
        if_false: &Expression,
        condition: &Expression,
        depth: i32,
    ) -> Result<String, CompilerError> {
        let if_true = self.translate_value(if_true, depth)?;
        let if_false = self.translate_value(if_false, depth)?;
        let condition = self.translate_value(condition, depth)?;
        Ok(format!("({}) ? ({}) : ({})", condition, if_true, if_false))
    }

    #[inline(never)]
    fn translate_drop(&self, value: &Expression, depth: i32) -> Result<String, CompilerError> {
        let indent = self.indentation(depth);
        let dropped = if value.is_value_fragment() {
            format!("{}(void)({});\n", indent, self.translate_value(value, depth)?)
        } else {
            self.translate_statement(value, depth)?
        };

        Ok(format!(
            "{}/* Drop routine */\n{}{}/* End of drop routine */\n",
            indent, dropped, indent
        ))
    }

    #[inline(never)]
    fn translate_return(
        &self,
        value: Option<&Expression>,
        depth: i32,
    ) -> Result<String, CompilerError> {
        let indent = self.indentation(depth);
        match value {
            Some(value) => {
                let value = self.translate_value(value, depth)?;
                Ok(format!("{}return {};\n", indent, value))
            }
            None => Ok(format!("{}return;\n", indent)),
        }
    }

    #[inline(never)]
    fn translate_host(
        &self,
        op: HostOp,
        operands: &[Expression],
        depth: i32,
    ) -> Result<String, CompilerError> {
        let operands = self.translate_operands(operands, depth)?;
        Ok(format!(
            "/* Host call */ {}{}",
            resolve_host_function(op),
            operands
        ))
    }

    #[inline(never)]
    fn translate_unsupported(&self, kind: &str, depth: i32) -> Result<String, CompilerError> {
        self.check_unsupported(kind)?;
        Ok(format!(
            "{}/* <Unsupported expression: {}> */\n",
            self.indentation(depth),
            kind
        ))
    }

    /// `(a, b, c)`, operands translated left to right.
    fn translate_operands(
        &self,
        operands: &[Expression],
        depth: i32,
    ) -> Result<String, CompilerError> {
        let operands = operands
            .iter()
            .map(|operand| self.translate_value(operand, depth))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(format!("({})", operands.join(", ")))
    }

    fn comment_line(&self, comment: &str, depth: i32) -> String {
        format!("{}{}\n", self.indentation(depth), comment)
    }

    fn binary_symbol(&self, op: BinaryOp) -> &'static str {
        let symbol = binary_operator(op);
        if symbol == UNMAPPED_OPERATOR {
            self.warn(
                WarningKind::UnmappedOperator,
                format!("Binary operator {:?} has no C infix form", op),
            );
        }

        symbol
    }

    fn warn_atomic(&self, node: &Expression) {
        self.warn(
            WarningKind::AtomicUnsupported,
            format!("'{}' was not translated", node.kind_name()),
        );
    }

    fn check_unsupported(&self, kind: &str) -> Result<(), CompilerError> {
        if self.config.strict {
            return Err(CompilerError::unsupported_expression(kind));
        }

        self.warn(
            WarningKind::UnsupportedExpression,
            format!("'{}' expression replaced by a comment", kind),
        );
        Ok(())
    }
}
