use std::sync::Arc;

use smallvec::SmallVec;

use crate::foundation::core::{Affine, BoxI, Rgba8Premul};
use crate::foundation::error::{PaintError, PaintResult};
use crate::paint::hints::{PaintHints, StrokeParams};
use crate::paint::pending::PendingFlags;
use crate::paint::source::{PatternSpec, Source};

/// Union of non-overlapping integer boxes.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Region {
    boxes: SmallVec<[BoxI; 4]>,
}

impl Region {
    /// Build a region, dropping empty boxes.
    pub fn from_boxes(boxes: impl IntoIterator<Item = BoxI>) -> Self {
        Self {
            boxes: boxes.into_iter().filter(|b| !b.is_empty()).collect(),
        }
    }

    /// Member boxes.
    pub fn boxes(&self) -> &[BoxI] {
        &self.boxes
    }

    /// `true` when pixel `(x, y)` is inside any member box.
    pub fn contains(&self, x: i32, y: i32) -> bool {
        self.boxes.iter().any(|b| b.contains(x, y))
    }

    /// Bounding box of all members.
    pub fn bounds(&self) -> BoxI {
        let mut it = self.boxes.iter();
        let Some(first) = it.next() else {
            return BoxI::default();
        };
        it.fold(*first, |acc, b| {
            BoxI::new(
                acc.x0.min(b.x0),
                acc.y0.min(b.y0),
                acc.x1.max(b.x1),
                acc.y1.max(b.y1),
            )
        })
    }

    /// Clip every member against `bounds`.
    pub fn intersect_box(&self, bounds: BoxI) -> Region {
        Region::from_boxes(self.boxes.iter().map(|b| b.intersect(bounds)))
    }

    /// `true` when the region collapses to a single box.
    pub fn is_single_box(&self) -> bool {
        self.boxes.len() <= 1
    }
}

/// Current clip: a single box, or a region of boxes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ClipState {
    /// Rectangular clip.
    Box(BoxI),
    /// Multi-box clip.
    Region(Arc<Region>),
}

impl ClipState {
    /// `true` when pixel `(x, y)` passes the clip.
    pub fn contains(&self, x: i32, y: i32) -> bool {
        match self {
            ClipState::Box(b) => b.contains(x, y),
            ClipState::Region(r) => r.contains(x, y),
        }
    }

    /// Bounding box of the clip.
    pub fn bounds(&self) -> BoxI {
        match self {
            ClipState::Box(b) => *b,
            ClipState::Region(r) => r.bounds(),
        }
    }
}

/// Paint state of one painter session.
///
/// Every setter compares against the current value and marks the matching pending category only
/// on a real change, so redundant calls never produce state records.
#[derive(Clone, Debug)]
pub struct EngineContext {
    pub(crate) pending: PendingFlags,
    pub(crate) hints: PaintHints,
    pub(crate) clip: ClipState,
    pub(crate) source: Source,
    pub(crate) opacity: f32,
    pub(crate) transform: Affine,
    pub(crate) stroke: StrokeParams,
    target: BoxI,
}

impl EngineContext {
    /// Fresh context for a target with the given bounds. Every category starts dirty.
    pub fn new(target: BoxI) -> Self {
        Self {
            pending: PendingFlags::ALL_STATE,
            hints: PaintHints::default(),
            clip: ClipState::Box(target),
            source: Source::default(),
            opacity: 1.0,
            transform: Affine::IDENTITY,
            stroke: StrokeParams::default(),
            target,
        }
    }

    /// Dirty categories.
    pub fn pending(&self) -> PendingFlags {
        self.pending
    }

    /// Paint hints.
    pub fn hints(&self) -> PaintHints {
        self.hints
    }

    /// Clip state.
    pub fn clip(&self) -> &ClipState {
        &self.clip
    }

    /// Source.
    pub fn source(&self) -> &Source {
        &self.source
    }

    /// Global opacity.
    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    /// User transform.
    pub fn transform(&self) -> Affine {
        self.transform
    }

    /// Stroke parameters.
    pub fn stroke(&self) -> StrokeParams {
        self.stroke
    }

    /// Set a solid source color.
    pub fn set_source_color(&mut self, color: Rgba8Premul) {
        if matches!(self.source, Source::Solid(c) if c == color) {
            return;
        }
        self.source = Source::Solid(color);
        self.pending.mark(PendingFlags::SOURCE);
    }

    /// Set a pattern source. Validated now, materialized on first flush.
    pub fn set_source_pattern(&mut self, spec: PatternSpec) -> PaintResult<()> {
        spec.validate()?;
        if let Source::Pattern { spec: cur, .. } = &self.source
            && **cur == spec
        {
            return Ok(());
        }
        self.source = Source::Pattern {
            spec: Arc::new(spec),
            raster: None,
        };
        self.pending.mark(PendingFlags::SOURCE);
        Ok(())
    }

    /// Set global opacity in `[0, 1]`.
    pub fn set_opacity(&mut self, opacity: f32) -> PaintResult<()> {
        if !opacity.is_finite() || !(0.0..=1.0).contains(&opacity) {
            return Err(PaintError::invalid_argument(format!(
                "opacity must be in [0, 1], got {opacity}"
            )));
        }
        if self.opacity != opacity {
            self.opacity = opacity;
            self.pending.mark(PendingFlags::OPACITY);
        }
        Ok(())
    }

    /// Replace the paint hints.
    pub fn set_hints(&mut self, hints: PaintHints) {
        if self.hints != hints {
            self.hints = hints;
            self.pending.mark(PendingFlags::PAINT_HINTS);
        }
    }

    /// Replace the user transform.
    pub fn set_transform(&mut self, transform: Affine) {
        if self.transform != transform {
            self.transform = transform;
            self.pending.mark(PendingFlags::TRANSFORM);
        }
    }

    /// Replace the stroke parameters.
    pub fn set_stroke(&mut self, stroke: StrokeParams) -> PaintResult<()> {
        if !stroke.width.is_finite() || stroke.width < 0.0 {
            return Err(PaintError::invalid_argument("stroke width must be >= 0"));
        }
        if self.stroke != stroke {
            self.stroke = stroke;
            self.pending.mark(PendingFlags::STROKE_PARAMS);
        }
        Ok(())
    }

    /// Clip to a box, intersected with the target bounds.
    pub fn set_clip_box(&mut self, clip: BoxI) {
        self.replace_clip(ClipState::Box(clip.intersect(self.target)));
    }

    /// Clip to a region, intersected with the target bounds.
    ///
    /// A region that collapses to at most one box is stored as a box clip.
    pub fn set_clip_region(&mut self, region: Region) {
        let region = region.intersect_box(self.target);
        let clip = if region.is_single_box() {
            ClipState::Box(region.boxes().first().copied().unwrap_or_default())
        } else {
            ClipState::Region(Arc::new(region))
        };
        self.replace_clip(clip);
    }

    /// Remove the clip (clip to the target bounds).
    pub fn reset_clip(&mut self) {
        self.replace_clip(ClipState::Box(self.target));
    }

    fn replace_clip(&mut self, clip: ClipState) {
        if self.clip != clip {
            self.clip = clip;
            self.pending.mark(PendingFlags::CLIP);
        }
    }

    /// Mark every category dirty so the next sequence carries a full snapshot.
    pub(crate) fn mark_all_dirty(&mut self) {
        self.pending.mark(PendingFlags::ALL_STATE);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/paint/context.rs"]
mod tests;
