use crate::backends::c::TranslationContext;
use crate::backends::c::c_names::{function_name, local_name, plain_name};
use crate::backends::c::c_operators::resolve_type;
use crate::compiler_messages::compiler_errors::{CompilerError, ErrorMetaDataKey};
use crate::compiler_messages::compiler_warnings::WarningKind;
use crate::wasm_ast::{Function, FunctionType, Import, ImportKind, Module, Name, Type};

/// `<ret> <name>(<T0> local_0, <T1> local_1, ...)` with `name` emitted as given.
pub fn declare_function_type(
    function_type: &FunctionType,
    name: &str,
) -> Result<String, CompilerError> {
    signature(function_type.result, name, &function_type.params)
}

/// Same as [`declare_function_type`] for a symbolic name, mangled as a plain identifier.
pub fn declare_function_type_named(
    function_type: &FunctionType,
    name: &Name,
) -> Result<String, CompilerError> {
    signature(function_type.result, &plain_name(name), &function_type.params)
}

/// Declaration of a defined function. The name gets the `fn_` prefix.
pub fn declare_function(function: &Function) -> Result<String, CompilerError> {
    signature(function.result, &function_name(&function.name), &function.params)
}

/// Extern declaration for one import.
///
/// Memories and tables have no C counterpart here and degrade to a byte
/// pointer and a function pointer respectively, each with a marker comment.
pub fn declare_import(module: &Module, import: &Import) -> Result<String, CompilerError> {
    let name = plain_name(&import.name);

    match import.kind {
        ImportKind::Function { function_type } => {
            let Some(ty) = module.function_type(function_type) else {
                return Err(CompilerError::input_error(format!(
                    "Import '{}' refers to function type {} which the module does not define",
                    import.name, function_type
                ))
                .with_metadata(ErrorMetaDataKey::CompilationStage, "import declaration"));
            };

            Ok(format!("extern {};", declare_function_type(ty, &name)?))
        }
        ImportKind::Global { ty } => Ok(format!("extern {} {};", resolve_type(ty)?, name)),
        ImportKind::Memory => Ok(format!("extern const char* {}; // <Imported memory>", name)),
        ImportKind::Table => Ok(format!("extern void* (*{})(void); // <Imported table>", name)),
    }
}

/// C spelling of a pointer to a function of this type, e.g. `int32_t (*)(int32_t, float64_t)`.
pub fn function_pointer_type(function_type: &FunctionType) -> Result<String, CompilerError> {
    let params = function_type
        .params
        .iter()
        .map(|ty| resolve_type(*ty))
        .collect::<Result<Vec<_>, _>>()?;

    let params = if params.is_empty() {
        "void".to_owned()
    } else {
        params.join(", ")
    };

    Ok(format!(
        "{} (*)({})",
        resolve_type(function_type.result)?,
        params
    ))
}

fn signature(result: Type, name: &str, params: &[Type]) -> Result<String, CompilerError> {
    let mut declaration = format!("{} {}(", resolve_type(result)?, name);

    for (index, ty) in params.iter().enumerate() {
        if index > 0 {
            declaration.push_str(", ");
        }
        declaration.push_str(resolve_type(*ty)?);
        declaration.push(' ');
        declaration.push_str(&local_name(index as u32));
    }

    declaration.push(')');
    Ok(declaration)
}

impl<'m> TranslationContext<'m> {
    /// Extern declarations for every import of the module, one per line,
    /// noting approximated memory and table imports in the diagnostics.
    pub fn declare_imports(&self) -> Result<String, CompilerError> {
        let mut out = String::new();

        for import in self.module.imports() {
            match import.kind {
                ImportKind::Memory => self.warn(
                    WarningKind::MemoryImportApproximated,
                    format!(
                        "Memory '{}' from '{}.{}' declared as a byte pointer",
                        import.name, import.module, import.base
                    ),
                ),
                ImportKind::Table => self.warn(
                    WarningKind::TableImportApproximated,
                    format!(
                        "Table '{}' from '{}.{}' declared as a function pointer",
                        import.name, import.module, import.base
                    ),
                ),
                _ => {}
            }

            out.push_str(&declare_import(self.module, import)?);
            out.push('\n');
        }

        Ok(out)
    }
}
