use std::sync::Arc;

use crate::command::record::{Command, DomainBox, DomainPath, FillCmd};
use crate::dispatch::op::ExecutionMode;
use crate::dispatch::ops::{EngineCore, PaintOps};
use crate::foundation::core::{BezPath, BoxD, BoxF, BoxI, PathF, Point, PointF};
use crate::foundation::error::PaintResult;
use crate::paint::hints::FillRule;
use crate::paint::pending::PendingFlags;

/// Handler of the multi-threaded mode.
///
/// Only the fill family is wired; blit, filter and mask entries keep the not-implemented default
/// so callers can fall back to direct mode for them.
#[derive(Debug, Default)]
pub struct DeferredOps;

impl PaintOps for DeferredOps {
    fn mode(&self) -> ExecutionMode {
        ExecutionMode::Deferred
    }

    fn fill_all(&self, core: &mut EngineCore) -> PaintResult<()> {
        core.emit(PendingFlags::FILL_BOX, Command::Fill(FillCmd::All))
    }
    fn fill_box_i(&self, core: &mut EngineCore, area: BoxI) -> PaintResult<()> {
        core.fill_box(DomainBox::I(area))
    }
    fn fill_box_f(&self, core: &mut EngineCore, area: BoxF) -> PaintResult<()> {
        core.fill_box(DomainBox::F(area))
    }
    fn fill_box_d(&self, core: &mut EngineCore, area: BoxD) -> PaintResult<()> {
        core.fill_box(DomainBox::D(area))
    }
    fn fill_path_f(
        &self,
        core: &mut EngineCore,
        origin: PointF,
        path: Arc<PathF>,
        fill_rule: FillRule,
    ) -> PaintResult<()> {
        core.fill_path(DomainPath::F(path), origin.to_point(), fill_rule)
    }
    fn fill_path_d(
        &self,
        core: &mut EngineCore,
        origin: Point,
        path: Arc<BezPath>,
        fill_rule: FillRule,
    ) -> PaintResult<()> {
        core.fill_path(DomainPath::D(path), origin, fill_rule)
    }
    fn stroke_path_f(
        &self,
        core: &mut EngineCore,
        origin: PointF,
        path: Arc<PathF>,
    ) -> PaintResult<()> {
        core.stroke_path(DomainPath::F(path), origin.to_point())
    }
    fn stroke_path_d(
        &self,
        core: &mut EngineCore,
        origin: Point,
        path: Arc<BezPath>,
    ) -> PaintResult<()> {
        core.stroke_path(DomainPath::D(path), origin)
    }
}
