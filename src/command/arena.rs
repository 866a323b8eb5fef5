use std::ops::Range;

use crate::command::record::Command;
use crate::foundation::error::{PaintError, PaintResult};

/// Index handle of a record inside a [`CommandArena`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CmdId(pub u32);

impl CmdId {
    /// Position in the sequence.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Hard limits of a command arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ArenaLimits {
    /// Maximum number of records per sequence.
    pub max_commands: usize,
    /// Maximum charged bytes per sequence.
    pub max_bytes: usize,
}

impl Default for ArenaLimits {
    fn default() -> Self {
        Self {
            max_commands: 1 << 20,
            max_bytes: 256 * 1024 * 1024,
        }
    }
}

/// Arena counters. Peaks survive resets.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ArenaStats {
    /// Records currently held.
    pub commands: usize,
    /// Bytes currently charged.
    pub bytes: usize,
    /// Highest record count seen.
    pub peak_commands: usize,
    /// Highest charged bytes seen.
    pub peak_bytes: usize,
    /// Successful batch commits.
    pub commits: u64,
    /// Batches refused for lack of space.
    pub rejected: u64,
    /// Bulk resets.
    pub resets: u64,
}

/// Append-only storage for one command sequence.
///
/// Batches are committed all-or-nothing: when a batch does not fit, the sequence is left exactly
/// as it was.
#[derive(Debug)]
pub struct CommandArena {
    limits: ArenaLimits,
    cmds: Vec<Command>,
    stats: ArenaStats,
}

impl CommandArena {
    /// Empty arena bounded by `limits`.
    pub fn new(limits: ArenaLimits) -> Self {
        Self {
            limits,
            cmds: Vec::new(),
            stats: ArenaStats::default(),
        }
    }

    /// Configured limits.
    pub fn limits(&self) -> ArenaLimits {
        self.limits
    }

    /// Current counters.
    pub fn stats(&self) -> ArenaStats {
        self.stats.clone()
    }

    /// Records of the current sequence, in order.
    pub fn as_slice(&self) -> &[Command] {
        &self.cmds
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.cmds.len()
    }

    /// `true` when the sequence is empty.
    pub fn is_empty(&self) -> bool {
        self.cmds.is_empty()
    }

    /// Look up a record.
    pub fn get(&self, id: CmdId) -> Option<&Command> {
        self.cmds.get(id.index())
    }

    /// Append a batch atomically and return the handles of the appended records.
    pub fn commit<I>(&mut self, batch: I) -> PaintResult<Range<CmdId>>
    where
        I: IntoIterator<Item = Command>,
        I::IntoIter: ExactSizeIterator,
    {
        let batch = batch.into_iter();
        let n = batch.len();
        let start = self.cmds.len();
        if n == 0 {
            let id = CmdId(start as u32);
            return Ok(id..id);
        }

        let batch: Vec<Command> = batch.collect();
        let bytes: usize = batch.iter().map(Command::footprint).sum();
        let new_len = start.saturating_add(n);
        let new_bytes = self.stats.bytes.saturating_add(bytes);
        if new_len > self.limits.max_commands || new_len > u32::MAX as usize {
            self.stats.rejected += 1;
            return Err(PaintError::out_of_memory("command arena record limit"));
        }
        if new_bytes > self.limits.max_bytes {
            self.stats.rejected += 1;
            return Err(PaintError::out_of_memory("command arena byte limit"));
        }
        if self.cmds.try_reserve(n).is_err() {
            self.stats.rejected += 1;
            return Err(PaintError::out_of_memory("command arena storage"));
        }

        self.cmds.extend(batch);
        self.stats.commands = new_len;
        self.stats.bytes = new_bytes;
        self.stats.peak_commands = self.stats.peak_commands.max(new_len);
        self.stats.peak_bytes = self.stats.peak_bytes.max(new_bytes);
        self.stats.commits += 1;
        Ok(CmdId(start as u32)..CmdId(new_len as u32))
    }

    /// Drop every record, keeping the allocation.
    pub fn reset(&mut self) {
        self.cmds.clear();
        self.stats.commands = 0;
        self.stats.bytes = 0;
        self.stats.resets += 1;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/command/arena.rs"]
mod tests;
