use crate::compiler_messages::compiler_errors::{
    CompilerError, CompilerMessages, ErrorMetaDataKey, ErrorType,
};
use crate::compiler_messages::compiler_warnings::{CompilerWarning, WarningKind};
use saying::say;

pub fn print_compiler_messages(messages: CompilerMessages) {
    for err in messages.errors {
        print_formatted_error(err);
    }

    for warning in messages.warnings {
        print_formatted_warning(warning);
    }
}

pub fn print_formatted_error(e: CompilerError) {
    match e.error_type {
        ErrorType::InputContract => {
            say!(Red "Malformed input");
        }

        ErrorType::UnsupportedExpression => {
            say!(Red "Unsupported expression");
        }

        ErrorType::DepthLimit => {
            say!(Red "Nesting limit reached");
        }

        ErrorType::Config => {
            say!(Yellow "Translator config could not be used");
            say!(e.msg);
            return;
        }
    }

    if let Some(function_name) = e.metadata.get(&ErrorMetaDataKey::FunctionName) {
        say!(Dark Magenta "In function ", Bright function_name);
    }

    if let Some(kind) = e.metadata.get(&ErrorMetaDataKey::ExpressionKind) {
        say!(Dark Magenta "Expression ", Bright kind);
    }

    say!(e.msg);

    if let Some(suggestion) = e.metadata.get(&ErrorMetaDataKey::PrimarySuggestion) {
        say!(Green suggestion);
    }
}

pub fn print_formatted_warning(w: CompilerWarning) {
    let heading = match w.warning_kind {
        WarningKind::BreakValueDiscarded => "Break value discarded",
        WarningKind::AtomicUnsupported => "Atomic operation not translated",
        WarningKind::MemoryAccessApproximated => "Memory access approximated",
        WarningKind::IndirectCallUnchecked => "Indirect call type not checked",
        WarningKind::UnmappedOperator => "Operator has no C equivalent",
        WarningKind::UnsupportedExpression => "Expression skipped",
        WarningKind::MemoryImportApproximated => "Imported memory approximated",
        WarningKind::TableImportApproximated => "Imported table approximated",
    };

    say!(Yellow "WARNING: ", heading);
    say!(w.msg);
}
