//! C backend.
//!
//! Renders WebAssembly function trees as C-like source text. The output is
//! meant to be read and compiled, not to reproduce the module's runtime
//! behaviour: memory accesses, atomics and indirect calls are approximated
//! and annotated in place.

mod c_declarations;
mod c_expr;
pub mod c_host_functions;
pub mod c_names;
pub mod c_operators;


pub use c_declarations::{
    declare_function, declare_function_type, declare_function_type_named, declare_import,
    function_pointer_type,
};

use crate::compiler_messages::compiler_errors::{CompilerError, CompilerMessages};
use crate::compiler_messages::compiler_warnings::{CompilerWarning, Diagnostics, WarningKind};
use crate::settings::TranslatorConfig;
use crate::timer_log;
use crate::wasm_ast::{Expression, Function, Global, Name, Module};
use rayon::prelude::*;
use std::time::Instant;

/// Per-request translation state.
///
/// Cheap to copy. Child calls get a copy with `nesting` bumped, so
/// nothing is shared or restored between siblings.
#[derive(Debug, Clone, Copy)]
pub struct TranslationContext<'m> {
    pub module: &'m Module,

    /// `None` while rendering module-level items such as globals.
    pub function: Option<&'m Function>,

    pub config: &'m TranslatorConfig,

    nesting: usize,
    diagnostics: Option<&'m Diagnostics>,
}

impl<'m> TranslationContext<'m> {
    pub fn for_function(
        module: &'m Module,
        function: &'m Function,
        config: &'m TranslatorConfig,
    ) -> Self {
        TranslationContext {
            module,
            function: Some(function),
            config,
            nesting: 0,
            diagnostics: None,
        }
    }

    pub fn for_module(module: &'m Module, config: &'m TranslatorConfig) -> Self {
        TranslationContext {
            module,
            function: None,
            config,
            nesting: 0,
            diagnostics: None,
        }
    }

    /// Routes fidelity warnings into a session's diagnostics.
    pub fn with_diagnostics(mut self, diagnostics: &'m Diagnostics) -> Self {
        self.diagnostics = Some(diagnostics);
        self
    }

    pub fn is_global(&self) -> bool {
        self.function.is_none()
    }

    /// Number of translate calls between the root and this context.
    pub fn nesting(&self) -> usize {
        self.nesting
    }

    pub(crate) fn descend(&self) -> Result<Self, CompilerError> {
        if self.nesting >= self.config.max_depth {
            return Err(CompilerError::depth_limit(self.config.max_depth));
        }

        Ok(TranslationContext {
            nesting: self.nesting + 1,
            ..*self
        })
    }

    fn with_function(&self, function: &'m Function) -> Self {
        TranslationContext {
            function: Some(function),
            nesting: 0,
            ..*self
        }
    }

    pub(crate) fn warn(&self, warning_kind: WarningKind, msg: impl Into<String>) {
        if let Some(diagnostics) = self.diagnostics {
            let mut msg = msg.into();
            if let Some(function) = self.function {
                msg = format!("{} (in '{}')", msg, function.name);
            }

            diagnostics.warn(CompilerWarning::new(msg, warning_kind));
        }
    }

    pub(crate) fn indentation(&self, depth: i32) -> String {
        self.config.indentation(depth)
    }
}

/// Translates one node at `depth`. See [`TranslationContext::translate_expression`].
pub fn translate_expression(
    ctx: &TranslationContext,
    node: &Expression,
    depth: i32,
) -> Result<String, CompilerError> {
    ctx.translate_expression(node, depth)
}

/// Renders a function body without its surrounding braces: local
/// declarations followed by the root block at depth -1.
pub fn translate_function_body(
    ctx: &TranslationContext,
    function: &Function,
) -> Result<String, CompilerError> {
    let ctx = ctx.with_function(function);
    let mut body = String::new();

    if ctx.config.declare_locals {
        let first_var = function.params.len();
        for (offset, ty) in function.vars.iter().enumerate() {
            let c_type = c_operators::resolve_type(*ty)
                .map_err(|error| error.in_function(function.name.as_str()))?;
            body.push_str(&format!(
                "{}{} {} = 0;\n",
                ctx.indentation(0),
                c_type,
                c_names::local_name((first_var + offset) as u32)
            ));
        }
    }

    let root = ctx
        .translate_branch(&function.body, -1)
        .map_err(|error| error.in_function(function.name.as_str()))?;
    body.push_str(&root);

    Ok(body)
}

/// Full function text: `<declaration> {\n<body>}`.
pub fn build_function_text(
    ctx: &TranslationContext,
    function: &Function,
) -> Result<String, CompilerError> {
    let time = Instant::now();

    let declaration =
        declare_function(function).map_err(|error| error.in_function(function.name.as_str()))?;
    let body = translate_function_body(ctx, function)?;

    timer_log!(time, "Function translated in: ");

    Ok(format!("{} {{\n{}}}", declaration, body))
}

/// Module-level definition of a global, initialised from its init expression.
pub fn declare_global(ctx: &TranslationContext, global: &Global) -> Result<String, CompilerError> {
    let c_type = c_operators::resolve_type(global.ty)?;
    let init = ctx.translate_value(&global.init, 0)?;
    let qualifier = if global.mutable { "" } else { "const " };

    Ok(format!(
        "{}{} {} = {};",
        qualifier,
        c_type,
        ctx.global_reference(&global.name),
        init
    ))
}

/// Outcome of translating one defined function on its own.
#[derive(Debug)]
pub struct FunctionText {
    pub name: Name,
    pub result: Result<String, CompilerError>,
    pub warnings: Vec<CompilerWarning>,
}

/// Translates every defined function of `module` in parallel.
///
/// Each function gets a fresh context and diagnostics sink. Results keep
/// the module's function order; a failed function does not affect others.
pub fn translate_functions(module: &Module, config: &TranslatorConfig) -> Vec<FunctionText> {
    module
        .functions()
        .par_iter()
        .map(|function| {
            let diagnostics = Diagnostics::new();
            let result = {
                let ctx = TranslationContext::for_function(module, function, config)
                    .with_diagnostics(&diagnostics);
                build_function_text(&ctx, function)
            };

            FunctionText {
                name: function.name.clone(),
                result,
                warnings: diagnostics.into_warnings(),
            }
        })
        .collect()
}

/// Gathers the errors and warnings of a batch run for display.
pub fn collect_messages(texts: &[FunctionText]) -> CompilerMessages {
    let mut messages = CompilerMessages::new();

    for text in texts {
        if let Err(error) = &text.result {
            messages.errors.push(error.clone());
        }
        messages.warnings.extend(text.warnings.iter().cloned());
    }

    messages
}
