use std::sync::Arc;

use smallvec::SmallVec;

use crate::command::arena::{ArenaLimits, CommandArena};
use crate::command::record::{
    Command, DomainBox, DomainPath, FillCmd, Filter, FilterCmd, MaskCmd, PathGeom, StateCmd,
};
use crate::dispatch::op::{ExecutionMode, Op};
use crate::foundation::core::{
    Affine, BezPath, BoxD, BoxF, BoxI, PathF, Point, PointF, PointI, RectI,
};
use crate::foundation::error::{PaintError, PaintResult};
use crate::foundation::image::Image;
use crate::paint::context::{ClipState, EngineContext};
use crate::paint::hints::{FillRule, ImageQuality};
use crate::paint::mask::MaskStack;
use crate::paint::pending::PendingFlags;
use crate::paint::source::Source;

/// A batch is the pending state records plus one operation record.
pub(crate) type Batch = SmallVec<[Command; 8]>;

/// State shared by every dispatch entry: paint context, command arena and mask manager.
#[derive(Debug)]
pub struct EngineCore {
    pub(crate) ctx: EngineContext,
    pub(crate) arena: CommandArena,
    pub(crate) masks: MaskStack,
}

impl EngineCore {
    /// Core for a target with the given bounds.
    pub fn new(target: BoxI, limits: ArenaLimits) -> Self {
        Self {
            ctx: EngineContext::new(target),
            arena: CommandArena::new(limits),
            masks: MaskStack::new(),
        }
    }

    /// Paint context.
    pub fn context(&self) -> &EngineContext {
        &self.ctx
    }

    /// Mutable paint context.
    pub fn context_mut(&mut self) -> &mut EngineContext {
        &mut self.ctx
    }

    /// Command arena.
    pub fn arena(&self) -> &CommandArena {
        &self.arena
    }

    /// Mask manager.
    pub fn masks(&self) -> &MaskStack {
        &self.masks
    }

    /// Build the state records for `dirty & required` without touching the flags.
    ///
    /// Returns the records in flush order and the categories they cover.
    pub(crate) fn resolve_pending(
        &mut self,
        required: PendingFlags,
    ) -> PaintResult<(Batch, PendingFlags)> {
        let mut out = Batch::new();
        let pending = self.ctx.pending & required;
        if pending.is_empty() {
            return Ok((out, pending));
        }
        let mut processed = PendingFlags::empty();

        if pending.contains(PendingFlags::SOURCE) {
            let opacity = self.ctx.opacity;
            let rec = if let Source::Solid(color) = self.ctx.source {
                StateCmd::OpacityAndColor { opacity, color }
            } else {
                let pattern = self.ctx.source.ensure_pattern()?.ok_or_else(|| {
                    PaintError::execution("pattern source did not materialize")
                })?;
                StateCmd::OpacityAndPattern { opacity, pattern }
            };
            out.push(Command::State(rec));
            processed |= self.ctx.pending & (PendingFlags::SOURCE | PendingFlags::OPACITY);
        } else if pending.contains(PendingFlags::OPACITY) {
            out.push(Command::State(StateCmd::Opacity(self.ctx.opacity)));
            processed |= PendingFlags::OPACITY;
        }

        if pending.contains(PendingFlags::PAINT_HINTS) {
            out.push(Command::State(StateCmd::PaintHints(self.ctx.hints)));
            processed |= PendingFlags::PAINT_HINTS;
        }

        // Path records snapshot the transform themselves.
        if pending.contains(PendingFlags::TRANSFORM) {
            processed |= PendingFlags::TRANSFORM;
        }

        if pending.contains(PendingFlags::CLIP) {
            let rec = match &self.ctx.clip {
                ClipState::Box(b) => StateCmd::ClipBox(*b),
                ClipState::Region(r) => StateCmd::ClipRegion(r.clone()),
            };
            out.push(Command::State(rec));
            processed |= PendingFlags::CLIP;
        }

        // Stroke records snapshot their parameters.
        if pending.contains(PendingFlags::STROKE_PARAMS) {
            processed |= PendingFlags::STROKE_PARAMS;
        }

        Ok((out, processed))
    }

    /// Flush `dirty & required` into the arena on its own.
    pub fn flush_pending(&mut self, required: PendingFlags) -> PaintResult<usize> {
        let (batch, processed) = self.resolve_pending(required)?;
        let n = batch.len();
        self.arena.commit(batch)?;
        self.ctx.pending.clear_flushed(processed);
        if !processed.is_empty() {
            tracing::debug!(records = n, flags = ?processed, "flushed pending state");
        }
        Ok(n)
    }

    /// Resolve `required`, append `cmd` behind the state records and commit atomically.
    pub(crate) fn emit(&mut self, required: PendingFlags, cmd: Command) -> PaintResult<()> {
        let (mut batch, processed) = self.resolve_pending(required)?;
        let state_records = batch.len();
        tracing::trace!(op = ?cmd.op(), state_records, "record");
        batch.push(cmd);
        self.arena.commit(batch)?;
        self.ctx.pending.clear_flushed(processed);
        if state_records > 0 {
            tracing::debug!(records = state_records, flags = ?processed, "flushed pending state");
        }
        Ok(())
    }

    /// Validate a mask transition, commit its record, then move the manager.
    pub(crate) fn emit_mask(&mut self, required: PendingFlags, cmd: MaskCmd) -> PaintResult<()> {
        self.masks.check(&cmd)?;
        self.emit(required, Command::Mask(cmd.clone()))?;
        self.masks.apply(&cmd);
        Ok(())
    }

    pub(crate) fn path_geom(&self, path: DomainPath, origin: Point, fill_rule: FillRule) -> PathGeom {
        PathGeom {
            path,
            origin,
            fill_rule,
            transform: self.ctx.transform,
        }
    }

    pub(crate) fn fill_box(&mut self, area: DomainBox) -> PaintResult<()> {
        self.emit(PendingFlags::FILL_BOX, Command::Fill(FillCmd::Box(area)))
    }

    pub(crate) fn fill_path(
        &mut self,
        path: DomainPath,
        origin: Point,
        fill_rule: FillRule,
    ) -> PaintResult<()> {
        let geom = self.path_geom(path, origin, fill_rule);
        self.emit(PendingFlags::FILL_PATH, Command::Fill(FillCmd::Path(geom)))
    }

    pub(crate) fn stroke_path(&mut self, path: DomainPath, origin: Point) -> PaintResult<()> {
        let geom = self.path_geom(path, origin, FillRule::NonZero);
        let stroke = self.ctx.stroke;
        self.emit(
            PendingFlags::STROKE,
            Command::Fill(FillCmd::Stroke { geom, stroke }),
        )
    }

    pub(crate) fn filter_box(&mut self, filter: Filter, area: DomainBox) -> PaintResult<()> {
        filter.validate()?;
        self.emit(
            PendingFlags::FILTER_BOX,
            Command::Filter(FilterCmd::Box { filter, area }),
        )
    }

    pub(crate) fn filter_path(
        &mut self,
        filter: Filter,
        path: DomainPath,
        origin: Point,
        fill_rule: FillRule,
    ) -> PaintResult<()> {
        filter.validate()?;
        let geom = self.path_geom(path, origin, fill_rule);
        self.emit(
            PendingFlags::FILTER_PATH,
            Command::Filter(FilterCmd::Path { filter, geom }),
        )
    }

    pub(crate) fn mask_path(
        &mut self,
        path: DomainPath,
        origin: Point,
        fill_rule: FillRule,
        intersect: bool,
    ) -> PaintResult<()> {
        let geom = self.path_geom(path, origin, fill_rule);
        let cmd = if intersect {
            MaskCmd::IntersectPath(geom)
        } else {
            MaskCmd::FromPath(geom)
        };
        self.emit_mask(PendingFlags::MASK_PATH, cmd)
    }
}

fn unwired<T, O: PaintOps + ?Sized>(ops: &O, op: Op) -> PaintResult<T> {
    Err(PaintError::not_implemented(ops.mode(), op))
}

/// Per-mode dispatch entries, one method per operation.
///
/// Every method defaults to [`PaintError::NotImplemented`]; a mode overrides the entries it
/// supports. Callers hold a `&'static dyn PaintOps` and never branch on the mode themselves.
#[allow(missing_docs)]
pub trait PaintOps: Send + Sync {
    /// Mode this handler serves.
    fn mode(&self) -> ExecutionMode;

    fn fill_all(&self, _core: &mut EngineCore) -> PaintResult<()> {
        unwired(self, Op::FillAll)
    }
    fn fill_box_i(&self, _core: &mut EngineCore, _area: BoxI) -> PaintResult<()> {
        unwired(self, Op::FillBoxI)
    }
    fn fill_box_f(&self, _core: &mut EngineCore, _area: BoxF) -> PaintResult<()> {
        unwired(self, Op::FillBoxF)
    }
    fn fill_box_d(&self, _core: &mut EngineCore, _area: BoxD) -> PaintResult<()> {
        unwired(self, Op::FillBoxD)
    }
    fn fill_path_f(
        &self,
        _core: &mut EngineCore,
        _origin: PointF,
        _path: Arc<PathF>,
        _fill_rule: FillRule,
    ) -> PaintResult<()> {
        unwired(self, Op::FillPathF)
    }
    fn fill_path_d(
        &self,
        _core: &mut EngineCore,
        _origin: Point,
        _path: Arc<BezPath>,
        _fill_rule: FillRule,
    ) -> PaintResult<()> {
        unwired(self, Op::FillPathD)
    }
    fn stroke_path_f(
        &self,
        _core: &mut EngineCore,
        _origin: PointF,
        _path: Arc<PathF>,
    ) -> PaintResult<()> {
        unwired(self, Op::StrokePathF)
    }
    fn stroke_path_d(
        &self,
        _core: &mut EngineCore,
        _origin: Point,
        _path: Arc<BezPath>,
    ) -> PaintResult<()> {
        unwired(self, Op::StrokePathD)
    }

    fn blit_image_d(
        &self,
        _core: &mut EngineCore,
        _target: BoxD,
        _image: Arc<Image>,
        _fragment: Option<RectI>,
        _quality: ImageQuality,
    ) -> PaintResult<()> {
        unwired(self, Op::BlitImageD)
    }
    fn blit_normalized_image_a(
        &self,
        _core: &mut EngineCore,
        _at: PointI,
        _image: Arc<Image>,
        _fragment: Option<RectI>,
    ) -> PaintResult<()> {
        unwired(self, Op::BlitNormalizedImageA)
    }
    fn blit_normalized_image_i(
        &self,
        _core: &mut EngineCore,
        _target: BoxI,
        _image: Arc<Image>,
        _fragment: Option<RectI>,
        _transform: Affine,
        _quality: ImageQuality,
    ) -> PaintResult<()> {
        unwired(self, Op::BlitNormalizedImageI)
    }
    fn blit_normalized_image_d(
        &self,
        _core: &mut EngineCore,
        _target: BoxD,
        _image: Arc<Image>,
        _fragment: Option<RectI>,
        _transform: Affine,
        _quality: ImageQuality,
    ) -> PaintResult<()> {
        unwired(self, Op::BlitNormalizedImageD)
    }

    fn filter_box_i(&self, _core: &mut EngineCore, _filter: Filter, _area: BoxI) -> PaintResult<()> {
        unwired(self, Op::FilterBoxI)
    }
    fn filter_box_f(&self, _core: &mut EngineCore, _filter: Filter, _area: BoxF) -> PaintResult<()> {
        unwired(self, Op::FilterBoxF)
    }
    fn filter_box_d(&self, _core: &mut EngineCore, _filter: Filter, _area: BoxD) -> PaintResult<()> {
        unwired(self, Op::FilterBoxD)
    }
    fn filter_path_f(
        &self,
        _core: &mut EngineCore,
        _filter: Filter,
        _origin: PointF,
        _path: Arc<PathF>,
        _fill_rule: FillRule,
    ) -> PaintResult<()> {
        unwired(self, Op::FilterPathF)
    }
    fn filter_path_d(
        &self,
        _core: &mut EngineCore,
        _filter: Filter,
        _origin: Point,
        _path: Arc<BezPath>,
        _fill_rule: FillRule,
    ) -> PaintResult<()> {
        unwired(self, Op::FilterPathD)
    }

    fn switch_to_mask(&self, _core: &mut EngineCore) -> PaintResult<()> {
        unwired(self, Op::SwitchToMask)
    }
    fn discard_mask(&self, _core: &mut EngineCore) -> PaintResult<()> {
        unwired(self, Op::DiscardMask)
    }
    fn save_mask(&self, _core: &mut EngineCore) -> PaintResult<()> {
        unwired(self, Op::SaveMask)
    }
    fn restore_mask(&self, _core: &mut EngineCore) -> PaintResult<()> {
        unwired(self, Op::RestoreMask)
    }
    fn mask_from_box_i(&self, _core: &mut EngineCore, _area: BoxI) -> PaintResult<()> {
        unwired(self, Op::MaskFromBoxI)
    }
    fn mask_from_box_f(&self, _core: &mut EngineCore, _area: BoxF) -> PaintResult<()> {
        unwired(self, Op::MaskFromBoxF)
    }
    fn mask_from_box_d(&self, _core: &mut EngineCore, _area: BoxD) -> PaintResult<()> {
        unwired(self, Op::MaskFromBoxD)
    }
    fn mask_from_path_f(
        &self,
        _core: &mut EngineCore,
        _origin: PointF,
        _path: Arc<PathF>,
        _fill_rule: FillRule,
    ) -> PaintResult<()> {
        unwired(self, Op::MaskFromPathF)
    }
    fn mask_from_path_d(
        &self,
        _core: &mut EngineCore,
        _origin: Point,
        _path: Arc<BezPath>,
        _fill_rule: FillRule,
    ) -> PaintResult<()> {
        unwired(self, Op::MaskFromPathD)
    }
    fn mask_intersect_box_i(&self, _core: &mut EngineCore, _area: BoxI) -> PaintResult<()> {
        unwired(self, Op::MaskIntersectBoxI)
    }
    fn mask_intersect_box_f(&self, _core: &mut EngineCore, _area: BoxF) -> PaintResult<()> {
        unwired(self, Op::MaskIntersectBoxF)
    }
    fn mask_intersect_box_d(&self, _core: &mut EngineCore, _area: BoxD) -> PaintResult<()> {
        unwired(self, Op::MaskIntersectBoxD)
    }
    fn mask_intersect_path_f(
        &self,
        _core: &mut EngineCore,
        _origin: PointF,
        _path: Arc<PathF>,
        _fill_rule: FillRule,
    ) -> PaintResult<()> {
        unwired(self, Op::MaskIntersectPathF)
    }
    fn mask_intersect_path_d(
        &self,
        _core: &mut EngineCore,
        _origin: Point,
        _path: Arc<BezPath>,
        _fill_rule: FillRule,
    ) -> PaintResult<()> {
        unwired(self, Op::MaskIntersectPathD)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/dispatch/ops.rs"]
mod tests;
