//! C code generation backend for a WebAssembly decompiler.
//!
//! Takes an already parsed module and renders C-like declarations and
//! function bodies as text. Parsing, the CLI and the driver that stitches
//! whole files together live outside this crate.

pub mod settings;
pub mod wasm_ast;

pub mod compiler_messages;

pub mod backends {
    pub mod c;
}

pub use backends::c::{
    FunctionText, TranslationContext, build_function_text, collect_messages, declare_function,
    declare_function_type, declare_function_type_named, declare_global, declare_import,
    translate_expression, translate_function_body, translate_functions,
};
pub use compiler_messages::compiler_errors::{CompilerError, CompilerMessages, ErrorType};
pub use compiler_messages::compiler_warnings::{CompilerWarning, Diagnostics, WarningKind};
pub use settings::TranslatorConfig;
