use crate::compiler_messages::compiler_errors::CompilerError;
use crate::wasm_ast::expression::Expression;
use crate::wasm_ast::types::{Name, Type};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionType {
    #[serde(default)]
    pub name: Option<Name>,
    pub params: Vec<Type>,
    pub result: Type,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Function {
    pub name: Name,
    pub params: Vec<Type>,

    /// Locals declared in the body. Indices continue after the parameters.
    #[serde(default)]
    pub vars: Vec<Type>,

    pub result: Type,
    pub body: Expression,
}

impl Function {
    pub fn num_locals(&self) -> usize {
        self.params.len() + self.vars.len()
    }

    pub fn local_type(&self, index: u32) -> Option<Type> {
        let index = index as usize;
        if index < self.params.len() {
            self.params.get(index).copied()
        } else {
            self.vars.get(index - self.params.len()).copied()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Global {
    pub name: Name,
    pub ty: Type,
    #[serde(default)]
    pub mutable: bool,
    pub init: Expression,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ImportKind {
    Function { function_type: u32 },
    Global { ty: Type },
    Memory,
    Table,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Import {
    /// Internal name the module refers to this import by.
    pub name: Name,
    /// Providing module, e.g. `env`.
    pub module: Name,
    /// Field name within the providing module.
    pub base: Name,
    #[serde(flatten)]
    pub kind: ImportKind,
}

/// Serialized shape of a module. Lookup tables are rebuilt on load.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModuleParts {
    #[serde(default)]
    pub function_types: Vec<FunctionType>,
    #[serde(default)]
    pub imports: Vec<Import>,
    #[serde(default)]
    pub globals: Vec<Global>,
    #[serde(default)]
    pub functions: Vec<Function>,
}

#[derive(Debug, Clone, Default)]
struct ModuleIndex {
    globals: FxHashMap<Name, usize>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "ModuleParts", into = "ModuleParts")]
pub struct Module {
    function_types: Vec<FunctionType>,
    imports: Vec<Import>,
    globals: Vec<Global>,
    functions: Vec<Function>,
    index: ModuleIndex,
}

impl Module {
    pub fn new(parts: ModuleParts) -> Self {
        let mut index = ModuleIndex::default();

        for (position, global) in parts.globals.iter().enumerate() {
            index.globals.insert(global.name.clone(), position);
        }

        Module {
            function_types: parts.function_types,
            imports: parts.imports,
            globals: parts.globals,
            functions: parts.functions,
            index,
        }
    }

    /// Loads a module that was handed over as JSON by a parsing front end.
    pub fn from_json(source: &str) -> Result<Self, CompilerError> {
        serde_json::from_str::<ModuleParts>(source)
            .map(Module::new)
            .map_err(|error| {
                CompilerError::input_error(format!("Module JSON could not be read: {}", error))
            })
    }

    pub fn functions(&self) -> &[Function] {
        &self.functions
    }

    pub fn globals(&self) -> &[Global] {
        &self.globals
    }

    pub fn imports(&self) -> &[Import] {
        &self.imports
    }

    pub fn function_types(&self) -> &[FunctionType] {
        &self.function_types
    }

    pub fn function_type(&self, index: u32) -> Option<&FunctionType> {
        self.function_types.get(index as usize)
    }

    pub fn global(&self, name: &Name) -> Option<&Global> {
        self.index
            .globals
            .get(name)
            .and_then(|position| self.globals.get(*position))
    }
}

impl From<ModuleParts> for Module {
    fn from(parts: ModuleParts) -> Self {
        Module::new(parts)
    }
}

impl From<Module> for ModuleParts {
    fn from(module: Module) -> Self {
        ModuleParts {
            function_types: module.function_types,
            imports: module.imports,
            globals: module.globals,
            functions: module.functions,
        }
    }
}
