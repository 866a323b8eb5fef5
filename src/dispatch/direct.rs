use std::sync::Arc;

use crate::command::record::{BlitCmd, Command, DomainBox, DomainPath, FillCmd, Filter, ImageBlit, MaskCmd};
use crate::dispatch::op::ExecutionMode;
use crate::dispatch::ops::{EngineCore, PaintOps};
use crate::foundation::core::{
    Affine, BezPath, BoxD, BoxF, BoxI, PathF, Point, PointF, PointI, RectI,
};
use crate::foundation::error::PaintResult;
use crate::foundation::image::Image;
use crate::paint::hints::{FillRule, ImageQuality};
use crate::paint::pending::PendingFlags;

/// Handler of the single-threaded mode. Every entry is wired.
#[derive(Debug, Default)]
pub struct DirectOps;

fn blit(core: &mut EngineCore, cmd: BlitCmd) -> PaintResult<()> {
    core.emit(PendingFlags::BLIT, Command::Blit(cmd))
}

impl PaintOps for DirectOps {
    fn mode(&self) -> ExecutionMode {
        ExecutionMode::Direct
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

    fn blit_image_d(
        &self,
        core: &mut EngineCore,
        target: BoxD,
        image: Arc<Image>,
        fragment: Option<RectI>,
        quality: ImageQuality,
    ) -> PaintResult<()> {
        let transform = core.ctx.transform;
        blit(
            core,
            BlitCmd::ImageD {
                target,
                blit: ImageBlit {
                    image,
                    fragment,
                    transform,
                    quality,
                },
            },
        )
    }
    fn blit_normalized_image_a(
        &self,
        core: &mut EngineCore,
        at: PointI,
        image: Arc<Image>,
        fragment: Option<RectI>,
    ) -> PaintResult<()> {
        blit(
            core,
            BlitCmd::NormalizedA {
                at,
                image,
                fragment,
            },
        )
    }
    fn blit_normalized_image_i(
        &self,
        core: &mut EngineCore,
        target: BoxI,
        image: Arc<Image>,
        fragment: Option<RectI>,
        transform: Affine,
        quality: ImageQuality,
    ) -> PaintResult<()> {
        blit(
            core,
            BlitCmd::NormalizedI {
                target,
                blit: ImageBlit {
                    image,
                    fragment,
                    transform,
                    quality,
                },
            },
        )
    }
    fn blit_normalized_image_d(
        &self,
        core: &mut EngineCore,
        target: BoxD,
        image: Arc<Image>,
        fragment: Option<RectI>,
        transform: Affine,
        quality: ImageQuality,
    ) -> PaintResult<()> {
        blit(
            core,
            BlitCmd::NormalizedD {
                target,
                blit: ImageBlit {
                    image,
                    fragment,
                    transform,
                    quality,
                },
            },
        )
    }

    fn filter_box_i(&self, core: &mut EngineCore, filter: Filter, area: BoxI) -> PaintResult<()> {
        core.filter_box(filter, DomainBox::I(area))
    }
    fn filter_box_f(&self, core: &mut EngineCore, filter: Filter, area: BoxF) -> PaintResult<()> {
        core.filter_box(filter, DomainBox::F(area))
    }
    fn filter_box_d(&self, core: &mut EngineCore, filter: Filter, area: BoxD) -> PaintResult<()> {
        core.filter_box(filter, DomainBox::D(area))
    }
    fn filter_path_f(
        &self,
        core: &mut EngineCore,
        filter: Filter,
        origin: PointF,
        path: Arc<PathF>,
        fill_rule: FillRule,
    ) -> PaintResult<()> {
        core.filter_path(filter, DomainPath::F(path), origin.to_point(), fill_rule)
    }
    fn filter_path_d(
        &self,
        core: &mut EngineCore,
        filter: Filter,
        origin: Point,
        path: Arc<BezPath>,
        fill_rule: FillRule,
    ) -> PaintResult<()> {
        core.filter_path(filter, DomainPath::D(path), origin, fill_rule)
    }

    fn switch_to_mask(&self, core: &mut EngineCore) -> PaintResult<()> {
        core.emit_mask(PendingFlags::empty(), MaskCmd::Switch)
    }
    fn discard_mask(&self, core: &mut EngineCore) -> PaintResult<()> {
        core.emit_mask(PendingFlags::empty(), MaskCmd::Discard)
    }
    fn save_mask(&self, core: &mut EngineCore) -> PaintResult<()> {
        core.emit_mask(PendingFlags::empty(), MaskCmd::Save)
    }
    fn restore_mask(&self, core: &mut EngineCore) -> PaintResult<()> {
        core.emit_mask(PendingFlags::empty(), MaskCmd::Restore)
    }
    fn mask_from_box_i(&self, core: &mut EngineCore, area: BoxI) -> PaintResult<()> {
        core.emit_mask(PendingFlags::empty(), MaskCmd::FromBox(DomainBox::I(area)))
    }
    fn mask_from_box_f(&self, core: &mut EngineCore, area: BoxF) -> PaintResult<()> {
        core.emit_mask(PendingFlags::empty(), MaskCmd::FromBox(DomainBox::F(area)))
    }
    fn mask_from_box_d(&self, core: &mut EngineCore, area: BoxD) -> PaintResult<()> {
        core.emit_mask(PendingFlags::empty(), MaskCmd::FromBox(DomainBox::D(area)))
    }
    fn mask_from_path_f(
        &self,
        core: &mut EngineCore,
        origin: PointF,
        path: Arc<PathF>,
        fill_rule: FillRule,
    ) -> PaintResult<()> {
        core.mask_path(DomainPath::F(path), origin.to_point(), fill_rule, false)
    }
    fn mask_from_path_d(
        &self,
        core: &mut EngineCore,
        origin: Point,
        path: Arc<BezPath>,
        fill_rule: FillRule,
    ) -> PaintResult<()> {
        core.mask_path(DomainPath::D(path), origin, fill_rule, false)
    }
    fn mask_intersect_box_i(&self, core: &mut EngineCore, area: BoxI) -> PaintResult<()> {
        core.emit_mask(PendingFlags::empty(), MaskCmd::IntersectBox(DomainBox::I(area)))
    }
    fn mask_intersect_box_f(&self, core: &mut EngineCore, area: BoxF) -> PaintResult<()> {
        core.emit_mask(PendingFlags::empty(), MaskCmd::IntersectBox(DomainBox::F(area)))
    }
    fn mask_intersect_box_d(&self, core: &mut EngineCore, area: BoxD) -> PaintResult<()> {
        core.emit_mask(PendingFlags::empty(), MaskCmd::IntersectBox(DomainBox::D(area)))
    }
    fn mask_intersect_path_f(
        &self,
        core: &mut EngineCore,
        origin: PointF,
        path: Arc<PathF>,
        fill_rule: FillRule,
    ) -> PaintResult<()> {
        core.mask_path(DomainPath::F(path), origin.to_point(), fill_rule, true)
    }
    fn mask_intersect_path_d(
        &self,
        core: &mut EngineCore,
        origin: Point,
        path: Arc<BezPath>,
        fill_rule: FillRule,
    ) -> PaintResult<()> {
        core.mask_path(DomainPath::D(path), origin, fill_rule, true)
    }
}
