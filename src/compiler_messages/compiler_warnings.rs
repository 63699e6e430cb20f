use std::cell::RefCell;

#[derive(Clone, Debug, PartialEq)]
pub struct CompilerWarning {
    pub msg: String,
    pub warning_kind: WarningKind,
}

impl CompilerWarning {
    pub fn new(msg: impl Into<String>, warning_kind: WarningKind) -> CompilerWarning {
        CompilerWarning {
            msg: msg.into(),
            warning_kind,
        }
    }
}

/// Places where the emitted C is valid but not equivalent to the module.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WarningKind {
    BreakValueDiscarded,
    AtomicUnsupported,
    MemoryAccessApproximated,
    IndirectCallUnchecked,
    UnmappedOperator,
    UnsupportedExpression,
    MemoryImportApproximated,
    TableImportApproximated,
}

/// Warning sink for one decompilation session.
///
/// Borrowed by translation contexts on a single thread. Recording a
/// warning never changes emitted text.
#[derive(Debug, Default)]
pub struct Diagnostics {
    warnings: RefCell<Vec<CompilerWarning>>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Diagnostics::default()
    }

    pub fn warn(&self, warning: CompilerWarning) {
        self.warnings.borrow_mut().push(warning);
    }

    pub fn len(&self) -> usize {
        self.warnings.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.warnings.borrow().is_empty()
    }

    pub fn count(&self, kind: WarningKind) -> usize {
        self.warnings
            .borrow()
            .iter()
            .filter(|warning| warning.warning_kind == kind)
            .count()
    }

    pub fn into_warnings(self) -> Vec<CompilerWarning> {
        self.warnings.into_inner()
    }
}
