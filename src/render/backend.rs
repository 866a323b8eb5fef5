use crate::command::record::{BlitCmd, Command, FillCmd, FilterCmd, MaskCmd, StateCmd};
use crate::foundation::error::PaintResult;

/// Executor of recorded command sequences. One method per record group.
pub trait CommandBackend {
    /// Apply a state snapshot.
    fn exec_state(&mut self, cmd: &StateCmd) -> PaintResult<()>;

    /// Fill or stroke with the current source.
    fn exec_fill(&mut self, cmd: &FillCmd) -> PaintResult<()>;

    /// Draw an image.
    fn exec_blit(&mut self, cmd: &BlitCmd) -> PaintResult<()>;

    /// Filter pixels already on the target.
    fn exec_filter(&mut self, cmd: &FilterCmd) -> PaintResult<()>;

    /// Update the mask stack.
    fn exec_mask(&mut self, cmd: &MaskCmd) -> PaintResult<()>;
}

/// Route every record of `cmds`, in order, to its group method.
pub fn execute_commands<B: CommandBackend + ?Sized>(
    backend: &mut B,
    cmds: &[Command],
) -> PaintResult<()> {
    for cmd in cmds {
        tracing::trace!(op = ?cmd.op(), "execute");
        match cmd {
            Command::State(c) => backend.exec_state(c)?,
            Command::Fill(c) => backend.exec_fill(c)?,
            Command::Blit(c) => backend.exec_blit(c)?,
            Command::Filter(c) => backend.exec_filter(c)?,
            Command::Mask(c) => backend.exec_mask(c)?,
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/render/backend.rs"]
mod tests;
