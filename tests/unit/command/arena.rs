use super::*;
use crate::command::record::{FillCmd, StateCmd};

fn fill() -> Command {
    Command::Fill(FillCmd::All)
}

#[test]
fn commit_returns_contiguous_handles() {
    let mut a = CommandArena::new(ArenaLimits::default());
    let r1 = a.commit([Command::State(StateCmd::Opacity(1.0)), fill()]).unwrap();
    let r2 = a.commit([fill()]).unwrap();
    assert_eq!(r1, CmdId(0)..CmdId(2));
    assert_eq!(r2, CmdId(2)..CmdId(3));
    assert_eq!(a.len(), 3);
    assert_eq!(a.get(CmdId(1)), Some(&fill()));
    assert!(a.get(CmdId(3)).is_none());
}

#[test]
fn over_limit_batch_leaves_sequence_unchanged() {
    let mut a = CommandArena::new(ArenaLimits {
        max_commands: 2,
        max_bytes: usize::MAX,
    });
    a.commit([fill()]).unwrap();
    let err = a.commit([fill(), fill()]).unwrap_err();
    assert!(err.is_out_of_memory());
    assert_eq!(a.len(), 1);
    assert_eq!(a.stats().rejected, 1);
}

#[test]
fn byte_limit_is_enforced() {
    let one = fill().footprint();
    let mut a = CommandArena::new(ArenaLimits {
        max_commands: 100,
        max_bytes: one * 2,
    });
    a.commit([fill(), fill()]).unwrap();
    assert!(a.commit([fill()]).unwrap_err().is_out_of_memory());
    assert_eq!(a.stats().bytes, one * 2);
}

#[test]
fn reset_keeps_peaks() {
    let mut a = CommandArena::new(ArenaLimits::default());
    a.commit([fill(), fill(), fill()]).unwrap();
    a.reset();
    let s = a.stats();
    assert!(a.is_empty());
    assert_eq!(s.commands, 0);
    assert_eq!(s.bytes, 0);
    assert_eq!(s.peak_commands, 3);
    assert_eq!(s.resets, 1);
    assert_eq!(s.commits, 1);
}

#[test]
fn empty_batch_is_a_noop() {
    let mut a = CommandArena::new(ArenaLimits::default());
    let r = a.commit(Vec::new()).unwrap();
    assert_eq!(r, CmdId(0)..CmdId(0));
    assert_eq!(a.stats().commits, 0);
}
