use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::command::arena::ArenaLimits;
use crate::dispatch::op::ExecutionMode;
use crate::foundation::error::{PaintError, PaintResult};

/// Environment variable overriding [`EngineOpts::threads`].
pub const ENV_THREADS: &str = "RASTER_PAINT_THREADS";
/// Environment variable overriding [`EngineOpts::mode`].
pub const ENV_MODE: &str = "RASTER_PAINT_MODE";

/// Options of a [`crate::RasterEngine`] session.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineOpts {
    /// Dispatch mode.
    pub mode: ExecutionMode,
    /// Band workers in deferred mode. `None` uses the available parallelism.
    pub threads: Option<usize>,
    /// Bounded queue capacity (in batches) per band worker.
    pub queue_capacity: usize,
    /// Records per batch sent to band workers.
    pub batch_size: usize,
    /// Command arena limits.
    pub arena: ArenaLimits,
}

impl Default for EngineOpts {
    fn default() -> Self {
        Self {
            mode: ExecutionMode::Direct,
            threads: None,
            queue_capacity: 4,
            batch_size: 64,
            arena: ArenaLimits::default(),
        }
    }
}

impl EngineOpts {
    /// Parse options from JSON. Missing fields take their defaults.
    pub fn from_json_str(s: &str) -> PaintResult<Self> {
        serde_json::from_str(s)
            .map_err(|e| PaintError::invalid_argument(format!("parse engine options JSON: {e}")))
    }

    /// Parse options from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> PaintResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            PaintError::invalid_argument(format!("open engine options '{}': {e}", path.display()))
        })?;
        serde_json::from_reader(BufReader::new(f))
            .map_err(|e| PaintError::invalid_argument(format!("parse engine options JSON: {e}")))
    }

    /// Apply `RASTER_PAINT_THREADS` / `RASTER_PAINT_MODE` from the process environment.
    pub fn with_env_overrides(self) -> PaintResult<Self> {
        self.apply_env(|k| std::env::var(k).ok())
    }

    pub(crate) fn apply_env(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> PaintResult<Self> {
        if let Some(v) = lookup(ENV_THREADS) {
            let n = v.trim().parse::<usize>().map_err(|_| {
                PaintError::invalid_argument(format!("{ENV_THREADS} must be an integer, got '{v}'"))
            })?;
            self.threads = Some(n);
        }
        if let Some(v) = lookup(ENV_MODE) {
            self.mode = ExecutionMode::parse(&v)?;
        }
        Ok(self)
    }

    /// Reject option sets no session can run with.
    pub fn validate(&self) -> PaintResult<()> {
        if self.threads == Some(0) {
            return Err(PaintError::invalid_argument("'threads' must be >= 1 when set"));
        }
        if self.queue_capacity == 0 {
            return Err(PaintError::invalid_argument("'queue_capacity' must be >= 1"));
        }
        if self.batch_size == 0 {
            return Err(PaintError::invalid_argument("'batch_size' must be >= 1"));
        }
        if self.arena.max_commands == 0 || self.arena.max_bytes == 0 {
            return Err(PaintError::invalid_argument("arena limits must be non-zero"));
        }
        Ok(())
    }

    /// Worker count for deferred execution.
    pub fn resolved_threads(&self) -> usize {
        self.threads.unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1)
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/engine/opts.rs"]
mod tests;
