use crate::compiler_messages::compiler_warnings::CompilerWarning;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// Everything a translation run produced besides the text itself.
#[derive(Debug, Default)]
pub struct CompilerMessages {
    pub errors: Vec<CompilerError>,
    pub warnings: Vec<CompilerWarning>,
}

impl CompilerMessages {
    pub fn new() -> Self {
        CompilerMessages::default()
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

#[derive(Debug, Clone, Copy, Eq, Hash, PartialEq, PartialOrd, Ord, Serialize)]
pub enum ErrorMetaDataKey {
    FunctionName,
    ExpressionKind,
    CompilationStage,

    // Counts for mismatched inputs
    ExpectedCount,
    FoundCount,

    // Data type information
    FoundType,

    PrimarySuggestion,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CompilerError {
    pub msg: String,
    pub error_type: ErrorType,

    // Structured context, so tools can tell which function and node failed
    pub metadata: HashMap<ErrorMetaDataKey, String>,
}

impl CompilerError {
    pub fn new(msg: impl Into<String>, error_type: ErrorType) -> Self {
        CompilerError {
            msg: msg.into(),
            error_type,
            metadata: HashMap::new(),
        }
    }

    /// The input tree broke a contract the parsing layer is meant to uphold.
    pub fn input_error(msg: impl Into<String>) -> Self {
        CompilerError::new(msg, ErrorType::InputContract)
    }

    /// Strict mode met a node kind the backend has no rendering for.
    pub fn unsupported_expression(kind: &str) -> Self {
        CompilerError::new(
            format!("No C translation exists for '{}' expressions", kind),
            ErrorType::UnsupportedExpression,
        )
        .with_metadata(ErrorMetaDataKey::ExpressionKind, kind)
    }

    pub fn depth_limit(max_depth: usize) -> Self {
        CompilerError::new(
            format!(
                "Expression nesting exceeds the configured limit of {} levels",
                max_depth
            ),
            ErrorType::DepthLimit,
        )
        .with_metadata(
            ErrorMetaDataKey::PrimarySuggestion,
            "Raise max_depth in the translator config",
        )
    }

    pub fn config_error(msg: impl Into<String>) -> Self {
        CompilerError::new(msg, ErrorType::Config)
    }

    pub fn with_metadata(mut self, key: ErrorMetaDataKey, value: impl Into<String>) -> Self {
        self.metadata.insert(key, value.into());
        self
    }

    /// Tags the error with the function being translated, unless a more
    /// specific caller already did.
    pub fn in_function(mut self, function_name: &str) -> Self {
        self.metadata
            .entry(ErrorMetaDataKey::FunctionName)
            .or_insert_with(|| function_name.to_owned());
        self
    }

    pub fn metadata_value(&self, key: ErrorMetaDataKey) -> Option<&str> {
        self.metadata.get(&key).map(String::as_str)
    }

    pub fn to_json(&self) -> serde_json::Value {
        let metadata = self
            .metadata
            .iter()
            .map(|(key, value)| (format!("{:?}", key), value.clone()))
            .collect::<BTreeMap<_, _>>();

        serde_json::json!({
            "type": self.error_type,
            "message": self.msg,
            "metadata": metadata,
        })
    }
}

impl fmt::Display for CompilerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.error_type.label(), self.msg)?;

        if let Some(function_name) = self.metadata_value(ErrorMetaDataKey::FunctionName) {
            write!(f, " (in function '{}')", function_name)?;
        }

        Ok(())
    }
}

impl std::error::Error for CompilerError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ErrorType {
    InputContract,
    UnsupportedExpression,
    DepthLimit,
    Config,
}

impl ErrorType {
    pub fn label(&self) -> &'static str {
        match self {
            ErrorType::InputContract => "Input contract violation",
            ErrorType::UnsupportedExpression => "Unsupported expression",
            ErrorType::DepthLimit => "Nesting too deep",
            ErrorType::Config => "Config",
        }
    }
}
