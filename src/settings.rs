use crate::compiler_messages::compiler_errors::CompilerError;
use serde::Deserialize;
use std::fs;
use std::path::Path;

pub const CONFIG_FILE_NAME: &str = "wasm-c.toml";

// Each nesting level costs a few translator frames. 100 levels stay inside
// a 2 MiB thread stack in unoptimized builds. Raising the limit means
// translating on a thread with a larger stack.
pub const DEFAULT_MAX_DEPTH: usize = 100;

/// Options threaded through every translation call.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TranslatorConfig {
    /// Fail on node kinds without a C rendering instead of emitting a
    /// comment in their place.
    pub strict: bool,

    /// One level of indentation.
    pub indent: String,

    /// Recursion ceiling for a single function body.
    pub max_depth: usize,

    /// Declare non-parameter locals at the top of each function body.
    pub declare_locals: bool,

    /// Render module-defined globals as `v<name>`.
    pub prefix_globals: bool,
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        TranslatorConfig {
            strict: cfg!(debug_assertions),
            indent: String::from("\t"),
            max_depth: DEFAULT_MAX_DEPTH,
            declare_locals: true,
            prefix_globals: false,
        }
    }
}

impl TranslatorConfig {
    pub fn lenient() -> Self {
        TranslatorConfig {
            strict: false,
            ..TranslatorConfig::default()
        }
    }

    pub fn strict() -> Self {
        TranslatorConfig {
            strict: true,
            ..TranslatorConfig::default()
        }
    }

    pub fn from_toml_str(source: &str) -> Result<Self, CompilerError> {
        let config: TranslatorConfig = toml::from_str(source).map_err(|error| {
            CompilerError::config_error(format!("Invalid translator config: {}", error))
        })?;

        if config.max_depth == 0 {
            return Err(CompilerError::config_error(
                "max_depth must be at least 1",
            ));
        }

        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, CompilerError> {
        let source = fs::read_to_string(path).map_err(|error| {
            CompilerError::config_error(format!(
                "Could not read translator config '{}': {}",
                path.display(),
                error
            ))
        })?;

        Self::from_toml_str(&source)
    }

    /// Indentation for a statement at `depth`. Depth -1 is the top of a
    /// function body and renders no indentation.
    pub fn indentation(&self, depth: i32) -> String {
        let levels = (depth + 1).max(0) as usize;
        self.indent.repeat(levels)
    }
}
