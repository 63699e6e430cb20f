use crate::wasm_ast::HostOp;

/// Intrinsic the emitted C calls for a host operation.
pub fn resolve_host_function(op: HostOp) -> &'static str {
    match op {
        HostOp::MemorySize => "wasm_current_memory",
        HostOp::MemoryGrow => "wasm_grow_memory",
    }
}
