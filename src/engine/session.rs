use std::sync::Arc;

use crate::command::arena::ArenaStats;
use crate::command::record::{Command, Filter};
use crate::dispatch::op::{ExecutionMode, Op};
use crate::dispatch::ops::{EngineCore, PaintOps};
use crate::dispatch::table;
use crate::engine::opts::EngineOpts;
use crate::foundation::core::{
    Affine, BezPath, BoxD, BoxF, BoxI, PathF, Point, PointF, PointI, RectI, Rgba8Premul,
};
use crate::foundation::error::PaintResult;
use crate::foundation::image::Image;
use crate::paint::context::{EngineContext, Region};
use crate::paint::hints::{FillRule, ImageQuality, PaintHints, StrokeParams};
use crate::paint::mask::MaskStack;
use crate::paint::source::PatternSpec;
use crate::render::backend::execute_commands;
use crate::render::cpu::CpuBackend;
use crate::render::deferred::DeferredExecutor;

/// A painter session over one target image.
///
/// Drawing calls record commands; nothing touches pixels until [`RasterEngine::flush`]. The
/// dispatch handler is chosen once from [`EngineOpts::mode`] and every call is routed through it,
/// so an operation the mode does not support fails with a not-implemented error instead of being
/// silently dropped.
pub struct RasterEngine {
    target: Image,
    core: EngineCore,
    ops: &'static dyn PaintOps,
    executor: Option<DeferredExecutor>,
    // Mask state at the start of the current sequence.
    mask_base: MaskStack,
    opts: EngineOpts,
}

impl std::fmt::Debug for RasterEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RasterEngine")
            .field("mode", &self.ops.mode())
            .field("width", &self.target.width())
            .field("height", &self.target.height())
            .field("commands", &self.core.arena().len())
            .finish()
    }
}

impl RasterEngine {
    /// Start a session painting into `target`.
    pub fn new(target: Image, opts: EngineOpts) -> PaintResult<Self> {
        opts.validate()?;
        let ops = table::table(opts.mode);
        let executor = match opts.mode {
            ExecutionMode::Direct => None,
            ExecutionMode::Deferred => Some(DeferredExecutor::new(
                opts.resolved_threads(),
                opts.queue_capacity,
                opts.batch_size,
            )?),
        };
        tracing::debug!(mode = ?opts.mode, width = target.width(), height = target.height(), "raster engine created");
        Ok(Self {
            core: EngineCore::new(target.bounds(), opts.arena),
            target,
            ops,
            executor,
            mask_base: MaskStack::new(),
            opts,
        })
    }

    /// Session with default options over a new transparent image.
    pub fn with_size(width: u32, height: u32) -> PaintResult<Self> {
        Self::new(Image::new(width, height)?, EngineOpts::default())
    }

    /// Execution mode of this session.
    pub fn mode(&self) -> ExecutionMode {
        self.ops.mode()
    }

    /// Options the session was created with.
    pub fn opts(&self) -> &EngineOpts {
        &self.opts
    }

    /// Paint state.
    pub fn context(&self) -> &EngineContext {
        self.core.context()
    }

    /// Mask manager.
    pub fn masks(&self) -> &MaskStack {
        self.core.masks()
    }

    /// Records of the current, unflushed sequence.
    pub fn commands(&self) -> &[Command] {
        self.core.arena().as_slice()
    }

    /// Arena counters.
    pub fn arena_stats(&self) -> ArenaStats {
        self.core.arena().stats()
    }

    /// Target pixels as of the last flush.
    pub fn image(&self) -> &Image {
        &self.target
    }

    /// End the session and return the target. Unflushed records are dropped.
    pub fn into_image(self) -> Image {
        self.target
    }

    /// Use a solid color as the source.
    pub fn set_source_color(&mut self, color: Rgba8Premul) {
        self.core.context_mut().set_source_color(color);
    }

    /// Use a gradient or texture as the source.
    pub fn set_source_pattern(&mut self, pattern: PatternSpec) -> PaintResult<()> {
        self.core.context_mut().set_source_pattern(pattern)
    }

    /// Set global opacity in `[0, 1]`.
    pub fn set_opacity(&mut self, opacity: f32) -> PaintResult<()> {
        self.core.context_mut().set_opacity(opacity)
    }

    /// Replace the paint hints.
    pub fn set_hints(&mut self, hints: PaintHints) {
        self.core.context_mut().set_hints(hints);
    }

    /// Replace the user transform.
    pub fn set_transform(&mut self, transform: Affine) {
        self.core.context_mut().set_transform(transform);
    }

    /// Replace the stroke parameters.
    pub fn set_stroke(&mut self, stroke: StrokeParams) -> PaintResult<()> {
        self.core.context_mut().set_stroke(stroke)
    }

    /// Clip to a box.
    pub fn set_clip_box(&mut self, clip: BoxI) {
        self.core.context_mut().set_clip_box(clip);
    }

    /// Clip to a region.
    pub fn set_clip_region(&mut self, region: Region) {
        self.core.context_mut().set_clip_region(region);
    }

    /// Clip to the whole target.
    pub fn reset_clip(&mut self) {
        self.core.context_mut().reset_clip();
    }

    fn route(
        &mut self,
        op: Op,
        f: impl FnOnce(&dyn PaintOps, &mut EngineCore) -> PaintResult<()>,
    ) -> PaintResult<()> {
        let res = f(self.ops, &mut self.core);
        if let Err(e) = &res
            && e.is_not_implemented()
        {
            tracing::warn!(mode = ?self.ops.mode(), ?op, "operation not available in this mode");
        }
        res
    }

    /// Fill the clip with the source.
    pub fn fill_all(&mut self) -> PaintResult<()> {
        self.route(Op::FillAll, |ops, core| ops.fill_all(core))
    }

    /// Integer variant of `fill_box_d`.
    pub fn fill_box_i(&mut self, area: BoxI) -> PaintResult<()> {
        self.route(Op::FillBoxI, |ops, core| ops.fill_box_i(core, area))
    }

    /// Single-precision variant of `fill_box_d`.
    pub fn fill_box_f(&mut self, area: BoxF) -> PaintResult<()> {
        self.route(Op::FillBoxF, |ops, core| ops.fill_box_f(core, area))
    }

    /// Fill a box with the source.
    pub fn fill_box_d(&mut self, area: BoxD) -> PaintResult<()> {
        self.route(Op::FillBoxD, |ops, core| ops.fill_box_d(core, area))
    }

    /// Single-precision variant of `fill_path_d`.
    pub fn fill_path_f(
        &mut self,
        origin: PointF,
        path: Arc<PathF>,
        fill_rule: FillRule,
    ) -> PaintResult<()> {
        self.route(Op::FillPathF, |ops, core| {
            ops.fill_path_f(core, origin, path, fill_rule)
        })
    }

    /// Fill a path offset by `origin`.
    pub fn fill_path_d(
        &mut self,
        origin: Point,
        path: Arc<BezPath>,
        fill_rule: FillRule,
    ) -> PaintResult<()> {
        self.route(Op::FillPathD, |ops, core| {
            ops.fill_path_d(core, origin, path, fill_rule)
        })
    }

    /// Single-precision variant of `stroke_path_d`.
    pub fn stroke_path_f(&mut self, origin: PointF, path: Arc<PathF>) -> PaintResult<()> {
        self.route(Op::StrokePathF, |ops, core| {
            ops.stroke_path_f(core, origin, path)
        })
    }

    /// Stroke a path offset by `origin` with the current stroke parameters.
    pub fn stroke_path_d(&mut self, origin: Point, path: Arc<BezPath>) -> PaintResult<()> {
        self.route(Op::StrokePathD, |ops, core| {
            ops.stroke_path_d(core, origin, path)
        })
    }

    /// Draw an image fragment stretched over `target`, through the user transform.
    pub fn blit_image_d(
        &mut self,
        target: BoxD,
        image: Arc<Image>,
        fragment: Option<RectI>,
        quality: ImageQuality,
    ) -> PaintResult<()> {
        self.route(Op::BlitImageD, |ops, core| {
            ops.blit_image_d(core, target, image, fragment, quality)
        })
    }

    /// Copy an image fragment with its top-left pixel at `at`.
    pub fn blit_normalized_image_a(
        &mut self,
        at: PointI,
        image: Arc<Image>,
        fragment: Option<RectI>,
    ) -> PaintResult<()> {
        self.route(Op::BlitNormalizedImageA, |ops, core| {
            ops.blit_normalized_image_a(core, at, image, fragment)
        })
    }

    /// Integer variant of `blit_normalized_image_d`.
    pub fn blit_normalized_image_i(
        &mut self,
        target: BoxI,
        image: Arc<Image>,
        fragment: Option<RectI>,
        transform: Affine,
        quality: ImageQuality,
    ) -> PaintResult<()> {
        self.route(Op::BlitNormalizedImageI, |ops, core| {
            ops.blit_normalized_image_i(core, target, image, fragment, transform, quality)
        })
    }

    /// Draw an image through a source-to-device transform, bounded by `target`.
    pub fn blit_normalized_image_d(
        &mut self,
        target: BoxD,
        image: Arc<Image>,
        fragment: Option<RectI>,
        transform: Affine,
        quality: ImageQuality,
    ) -> PaintResult<()> {
        self.route(Op::BlitNormalizedImageD, |ops, core| {
            ops.blit_normalized_image_d(core, target, image, fragment, transform, quality)
        })
    }

    /// Integer variant of `filter_box_d`.
    pub fn filter_box_i(&mut self, filter: Filter, area: BoxI) -> PaintResult<()> {
        self.route(Op::FilterBoxI, |ops, core| ops.filter_box_i(core, filter, area))
    }

    /// Single-precision variant of `filter_box_d`.
    pub fn filter_box_f(&mut self, filter: Filter, area: BoxF) -> PaintResult<()> {
        self.route(Op::FilterBoxF, |ops, core| ops.filter_box_f(core, filter, area))
    }

    /// Filter the target inside a box.
    pub fn filter_box_d(&mut self, filter: Filter, area: BoxD) -> PaintResult<()> {
        self.route(Op::FilterBoxD, |ops, core| ops.filter_box_d(core, filter, area))
    }

    /// Single-precision variant of `filter_path_d`.
    pub fn filter_path_f(
        &mut self,
        filter: Filter,
        origin: PointF,
        path: Arc<PathF>,
        fill_rule: FillRule,
    ) -> PaintResult<()> {
        self.route(Op::FilterPathF, |ops, core| {
            ops.filter_path_f(core, filter, origin, path, fill_rule)
        })
    }

    /// Filter the target inside a path.
    pub fn filter_path_d(
        &mut self,
        filter: Filter,
        origin: Point,
        path: Arc<BezPath>,
        fill_rule: FillRule,
    ) -> PaintResult<()> {
        self.route(Op::FilterPathD, |ops, core| {
            ops.filter_path_d(core, filter, origin, path, fill_rule)
        })
    }

    /// Enter mask mode with full coverage.
    pub fn switch_to_mask(&mut self) -> PaintResult<()> {
        self.route(Op::SwitchToMask, |ops, core| ops.switch_to_mask(core))
    }

    /// Leave mask mode and drop every saved mask.
    pub fn discard_mask(&mut self) -> PaintResult<()> {
        self.route(Op::DiscardMask, |ops, core| ops.discard_mask(core))
    }

    /// Push the current mask.
    pub fn save_mask(&mut self) -> PaintResult<()> {
        self.route(Op::SaveMask, |ops, core| ops.save_mask(core))
    }

    /// Pop the last saved mask.
    pub fn restore_mask(&mut self) -> PaintResult<()> {
        self.route(Op::RestoreMask, |ops, core| ops.restore_mask(core))
    }

    /// Integer variant of `mask_from_box_d`.
    pub fn mask_from_box_i(&mut self, area: BoxI) -> PaintResult<()> {
        self.route(Op::MaskFromBoxI, |ops, core| ops.mask_from_box_i(core, area))
    }

    /// Single-precision variant of `mask_from_box_d`.
    pub fn mask_from_box_f(&mut self, area: BoxF) -> PaintResult<()> {
        self.route(Op::MaskFromBoxF, |ops, core| ops.mask_from_box_f(core, area))
    }

    /// Replace the mask with a box.
    pub fn mask_from_box_d(&mut self, area: BoxD) -> PaintResult<()> {
        self.route(Op::MaskFromBoxD, |ops, core| ops.mask_from_box_d(core, area))
    }

    /// Single-precision variant of `mask_from_path_d`.
    pub fn mask_from_path_f(
        &mut self,
        origin: PointF,
        path: Arc<PathF>,
        fill_rule: FillRule,
    ) -> PaintResult<()> {
        self.route(Op::MaskFromPathF, |ops, core| {
            ops.mask_from_path_f(core, origin, path, fill_rule)
        })
    }

    /// Replace the mask with a path.
    pub fn mask_from_path_d(
        &mut self,
        origin: Point,
        path: Arc<BezPath>,
        fill_rule: FillRule,
    ) -> PaintResult<()> {
        self.route(Op::MaskFromPathD, |ops, core| {
            ops.mask_from_path_d(core, origin, path, fill_rule)
        })
    }

    /// Integer variant of `mask_intersect_box_d`.
    pub fn mask_intersect_box_i(&mut self, area: BoxI) -> PaintResult<()> {
        self.route(Op::MaskIntersectBoxI, |ops, core| {
            ops.mask_intersect_box_i(core, area)
        })
    }

    /// Single-precision variant of `mask_intersect_box_d`.
    pub fn mask_intersect_box_f(&mut self, area: BoxF) -> PaintResult<()> {
        self.route(Op::MaskIntersectBoxF, |ops, core| {
            ops.mask_intersect_box_f(core, area)
        })
    }

    /// Narrow the mask by a box.
    pub fn mask_intersect_box_d(&mut self, area: BoxD) -> PaintResult<()> {
        self.route(Op::MaskIntersectBoxD, |ops, core| {
            ops.mask_intersect_box_d(core, area)
        })
    }

    /// Single-precision variant of `mask_intersect_path_d`.
    pub fn mask_intersect_path_f(
        &mut self,
        origin: PointF,
        path: Arc<PathF>,
        fill_rule: FillRule,
    ) -> PaintResult<()> {
        self.route(Op::MaskIntersectPathF, |ops, core| {
            ops.mask_intersect_path_f(core, origin, path, fill_rule)
        })
    }

    /// Narrow the mask by a path.
    pub fn mask_intersect_path_d(
        &mut self,
        origin: Point,
        path: Arc<BezPath>,
        fill_rule: FillRule,
    ) -> PaintResult<()> {
        self.route(Op::MaskIntersectPathD, |ops, core| {
            ops.mask_intersect_path_d(core, origin, path, fill_rule)
        })
    }

    /// Execute the recorded sequence against the target and start a new one.
    ///
    /// The sequence is consumed even when execution fails.
    #[tracing::instrument(level = "debug", skip(self), fields(mode = ?self.ops.mode(), records = self.core.arena().len()))]
    pub fn flush(&mut self) -> PaintResult<()> {
        let res = if self.core.arena().is_empty() {
            Ok(())
        } else {
            match &self.executor {
                Some(exec) => exec.execute(&mut self.target, self.core.arena().as_slice()),
                None => {
                    let mut backend =
                        CpuBackend::new(&mut self.target).with_masks(self.mask_base.clone());
                    execute_commands(&mut backend, self.core.arena.as_slice())
                }
            }
        };
        self.mask_base = self.core.masks().clone();
        self.start_sequence();
        res
    }

    /// Drop the recorded sequence without executing it.
    ///
    /// Mask transitions recorded in the dropped sequence are rolled back.
    pub fn discard(&mut self) {
        self.core.masks = self.mask_base.clone();
        self.start_sequence();
    }

    fn start_sequence(&mut self) {
        self.core.arena.reset();
        self.core.ctx.mark_all_dirty();
        tracing::debug!("command sequence reset");
    }
}

#[cfg(test)]
#[path = "../../tests/unit/engine/session.rs"]
mod tests;
