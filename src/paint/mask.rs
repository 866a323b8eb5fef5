use smallvec::SmallVec;

use crate::command::record::{MaskCmd, PathGeom};
use crate::foundation::core::BoxD;
use crate::foundation::error::{PaintError, PaintResult};

/// One term of a mask intersection.
#[derive(Clone, Debug, PartialEq)]
pub enum MaskLayer {
    /// Device-space box.
    Box(BoxD),
    /// Path coverage.
    Path(PathGeom),
}

/// Mask coverage as the intersection of its layers. No layers means full coverage.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MaskShape {
    layers: SmallVec<[MaskLayer; 2]>,
}

impl MaskShape {
    /// Full coverage.
    pub fn full() -> Self {
        Self::default()
    }

    /// Layers in intersection order.
    pub fn layers(&self) -> &[MaskLayer] {
        &self.layers
    }

    /// `true` when the shape covers everything.
    pub fn is_full(&self) -> bool {
        self.layers.is_empty()
    }

    fn replace(&mut self, layer: MaskLayer) {
        self.layers.clear();
        self.layers.push(layer);
    }

    fn intersect(&mut self, layer: MaskLayer) {
        if let MaskLayer::Box(b) = &layer
            && let Some(MaskLayer::Box(cur)) = self.layers.last_mut()
        {
            *cur = cur.intersect(*b);
            return;
        }
        self.layers.push(layer);
    }
}

/// Mask state machine: an optional active shape plus a LIFO of saved shapes.
///
/// `check` never mutates, `apply` never fails. Callers run `check`, commit the record, then
/// `apply`.
#[derive(Clone, Debug, Default)]
pub struct MaskStack {
    current: Option<MaskShape>,
    saved: Vec<MaskShape>,
}

impl MaskStack {
    /// Inactive manager with an empty stack.
    pub fn new() -> Self {
        Self::default()
    }

    /// `true` in the MASK_ACTIVE state.
    pub fn is_active(&self) -> bool {
        self.current.is_some()
    }

    /// Active shape, if any.
    pub fn current(&self) -> Option<&MaskShape> {
        self.current.as_ref()
    }

    /// Number of saved shapes.
    pub fn depth(&self) -> usize {
        self.saved.len()
    }

    /// Validate a transition without touching the manager.
    pub fn check(&self, cmd: &MaskCmd) -> PaintResult<()> {
        match cmd {
            MaskCmd::Switch if self.is_active() => {
                Err(PaintError::invalid_state("mask is already active"))
            }
            MaskCmd::Switch => Ok(()),
            MaskCmd::Restore if self.saved.is_empty() => Err(PaintError::MaskUnderflow),
            MaskCmd::Restore => Ok(()),
            MaskCmd::Discard | MaskCmd::Save
            | MaskCmd::FromBox(_)
            | MaskCmd::FromPath(_)
            | MaskCmd::IntersectBox(_)
            | MaskCmd::IntersectPath(_)
                if !self.is_active() =>
            {
                Err(PaintError::invalid_state("no active mask"))
            }
            _ => Ok(()),
        }
    }

    /// Perform a transition previously accepted by [`MaskStack::check`].
    pub fn apply(&mut self, cmd: &MaskCmd) {
        debug_assert!(self.check(cmd).is_ok());
        match cmd {
            MaskCmd::Switch => self.current = Some(MaskShape::full()),
            MaskCmd::Discard => {
                self.current = None;
                self.saved.clear();
            }
            MaskCmd::Save => {
                if let Some(cur) = &self.current {
                    self.saved.push(cur.clone());
                }
            }
            MaskCmd::Restore => {
                if let Some(prev) = self.saved.pop() {
                    self.current = Some(prev);
                }
            }
            MaskCmd::FromBox(b) => {
                if let Some(cur) = &mut self.current {
                    cur.replace(MaskLayer::Box(b.to_box_d()));
                }
            }
            MaskCmd::FromPath(g) => {
                if let Some(cur) = &mut self.current {
                    cur.replace(MaskLayer::Path(g.clone()));
                }
            }
            MaskCmd::IntersectBox(b) => {
                if let Some(cur) = &mut self.current {
                    cur.intersect(MaskLayer::Box(b.to_box_d()));
                }
            }
            MaskCmd::IntersectPath(g) => {
                if let Some(cur) = &mut self.current {
                    cur.intersect(MaskLayer::Path(g.clone()));
                }
            }
        }
    }

    /// Drop every mask.
    pub fn reset(&mut self) {
        self.current = None;
        self.saved.clear();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/paint/mask.rs"]
mod tests;
