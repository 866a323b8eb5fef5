use std::sync::OnceLock;

use crate::dispatch::deferred::DeferredOps;
use crate::dispatch::direct::DirectOps;
use crate::dispatch::op::ExecutionMode;
use crate::dispatch::ops::PaintOps;

/// One handler per execution mode, indexed by [`ExecutionMode::index`].
pub type DispatchTable = [&'static dyn PaintOps; ExecutionMode::COUNT];

static DIRECT: DirectOps = DirectOps;
static DEFERRED: DeferredOps = DeferredOps;

static TABLE: OnceLock<DispatchTable> = OnceLock::new();

/// Populate the process-wide dispatch table. Later calls are no-ops.
pub fn init() -> &'static DispatchTable {
    TABLE.get_or_init(|| {
        tracing::debug!("dispatch table initialized");
        let table: DispatchTable = [&DIRECT, &DEFERRED];
        debug_assert!(
            ExecutionMode::ALL
                .iter()
                .all(|m| table[m.index()].mode() == *m)
        );
        table
    })
}

/// `true` once [`init`] has run.
pub fn is_initialized() -> bool {
    TABLE.get().is_some()
}

/// Handler of `mode`, initializing the table on first use.
pub fn table(mode: ExecutionMode) -> &'static dyn PaintOps {
    init()[mode.index()]
}

#[cfg(test)]
#[path = "../../tests/unit/dispatch/table.rs"]
mod tests;
