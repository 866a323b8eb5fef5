use std::sync::Arc;

use crate::command::record::{
    BlitCmd, DomainBox, FillCmd, Filter, FilterCmd, ImageBlit, MaskCmd, PathGeom, StateCmd,
};
use crate::foundation::core::{Affine, BezPath, BoxI, Point, Rect};
use crate::foundation::error::PaintResult;
use crate::foundation::image::Image;
use crate::foundation::math::{copy_px, lerp_px, mul_div255_u8, over_px, unit_to_u8};
use crate::paint::context::ClipState;
use crate::paint::hints::{CompositeOp, FillRule, ImageQuality, PaintHints, RenderQuality};
use crate::paint::mask::{MaskLayer, MaskShape, MaskStack};
use crate::paint::source::RasterPattern;
use crate::render::backend::CommandBackend;
use crate::render::coverage::{Coverage, bbox_to_box_i};

const STROKE_TOLERANCE: f64 = 0.1;

#[derive(Clone, Debug)]
enum Paint {
    Solid([u8; 4]),
    Pattern(Arc<RasterPattern>),
}

impl Paint {
    fn sample(&self, x: i32, y: i32) -> [u8; 4] {
        match self {
            Paint::Solid(c) => *c,
            Paint::Pattern(p) => p.sample(x, y),
        }
    }
}

/// Reference CPU executor writing premultiplied RGBA8 pixels into an [`Image`].
///
/// The target may be a horizontal band of a taller surface: `origin_y` is the device row of the
/// band's first row. Coverage is always rasterized against the whole surface, so splitting a
/// surface into bands never changes edge pixels.
pub struct CpuBackend<'a> {
    target: &'a mut Image,
    origin_y: i32,
    surface: BoxI,

    opacity: f32,
    paint: Paint,
    hints: PaintHints,
    clip: ClipState,

    masks: MaskStack,
    mask_cov: Option<Coverage>,
}

impl<'a> CpuBackend<'a> {
    /// Backend drawing into the whole of `target`.
    pub fn new(target: &'a mut Image) -> Self {
        let surface = target.bounds();
        Self::band(target, 0, surface)
    }

    /// Backend drawing into a band starting at device row `origin_y` of `surface`.
    pub fn band(target: &'a mut Image, origin_y: i32, surface: BoxI) -> Self {
        Self {
            target,
            origin_y,
            surface,
            opacity: 1.0,
            paint: Paint::Solid([0, 0, 0, 255]),
            hints: PaintHints::default(),
            clip: ClipState::Box(surface),
            masks: MaskStack::new(),
            mask_cov: None,
        }
    }

    /// Start from an existing mask state (masks outlive a single command sequence).
    pub fn with_masks(mut self, masks: MaskStack) -> Self {
        self.masks = masks;
        self.mask_cov = None;
        self
    }

    /// Mask state after the executed records.
    pub fn masks(&self) -> &MaskStack {
        &self.masks
    }

    fn band_bounds(&self) -> BoxI {
        BoxI::new(
            0,
            self.origin_y,
            self.target.width() as i32,
            self.origin_y + self.target.height() as i32,
        )
    }

    fn limit(&self) -> BoxI {
        self.clip.bounds().intersect(self.surface)
    }

    fn ensure_mask(&mut self) -> PaintResult<()> {
        if self.mask_cov.is_some() {
            return Ok(());
        }
        if let Some(shape) = self.masks.current()
            && !shape.is_full()
        {
            self.mask_cov = Some(mask_coverage(shape, self.surface)?);
        }
        Ok(())
    }

    fn geometry_coverage(&self, mut cov: Coverage) -> Coverage {
        if self.hints.render_quality == RenderQuality::Aliased {
            cov.threshold();
        }
        cov
    }

    /// Run `f(x, y, dst, coverage)` for every band pixel with non-zero clipped, masked coverage.
    fn apply(
        &mut self,
        cov: &Coverage,
        mut f: impl FnMut(i32, i32, [u8; 4], u8) -> [u8; 4],
    ) -> PaintResult<()> {
        if cov.is_empty() {
            return Ok(());
        }
        self.ensure_mask()?;
        let area = cov.bounds().intersect(self.band_bounds());
        let Self {
            target,
            origin_y,
            clip,
            mask_cov,
            ..
        } = self;
        for y in area.y0..area.y1 {
            for x in area.x0..area.x1 {
                let mut c = cov.at(x, y);
                if c == 0 || !clip.contains(x, y) {
                    continue;
                }
                if let Some(m) = mask_cov.as_ref() {
                    c = mul_div255_u8(u16::from(c), u16::from(m.at(x, y)));
                    if c == 0 {
                        continue;
                    }
                }
                let Some(i) = target.index(x, y - *origin_y) else {
                    continue;
                };
                let data = target.data_mut();
                let dst = [data[i], data[i + 1], data[i + 2], data[i + 3]];
                let out = f(x, y, dst, c);
                data[i..i + 4].copy_from_slice(&out);
            }
        }
        Ok(())
    }

    fn shade(&mut self, cov: Coverage) -> PaintResult<()> {
        let cov = self.geometry_coverage(cov);
        let opacity = unit_to_u8(self.opacity);
        let paint = self.paint.clone();
        let composite = self.hints.composite;
        self.apply(&cov, |x, y, dst, c| {
            let c = mul_div255_u8(u16::from(c), u16::from(opacity));
            composite_px(composite, dst, paint.sample(x, y), c)
        })
    }

    fn blit(
        &mut self,
        image: &Image,
        fragment: BoxI,
        src_to_dev: Affine,
        dev_bounds: Rect,
        quality: ImageQuality,
    ) -> PaintResult<()> {
        if fragment.is_empty() || src_to_dev.determinant().abs() < 1e-12 {
            return Ok(());
        }
        let inv = src_to_dev.inverse();
        let frag_dev = src_to_dev.transform_rect_bbox(fragment.to_box_d());
        let bounds = bbox_to_box_i(frag_dev.intersect(dev_bounds.abs())).intersect(self.limit());
        let cov = Coverage::solid(bounds)?;
        let opacity = unit_to_u8(self.opacity);
        let composite = self.hints.composite;
        self.apply(&cov, |x, y, dst, c| {
            let p = inv * Point::new(f64::from(x) + 0.5, f64::from(y) + 0.5);
            let src = sample_image(image, fragment, p, quality);
            let c = mul_div255_u8(u16::from(c), u16::from(opacity));
            composite_px(composite, dst, src, c)
        })
    }

    fn blit_transformed(&mut self, blit: &ImageBlit, dev_bounds: Rect) -> PaintResult<()> {
        let fragment = blit.fragment_box();
        self.blit(
            &blit.image,
            fragment,
            blit.transform,
            dev_bounds,
            blit.quality,
        )
    }

    fn filter(&mut self, filter: Filter, cov: Coverage) -> PaintResult<()> {
        let cov = self.geometry_coverage(cov);
        self.apply(&cov, |_, _, dst, c| lerp_px(dst, filter_px(filter, dst), c))
    }

    fn path_coverage(&self, geom: &PathGeom) -> PaintResult<Coverage> {
        Coverage::path(&device_path(geom), geom.fill_rule, self.limit())
    }

    fn box_coverage(&self, area: DomainBox) -> PaintResult<Coverage> {
        Coverage::rect(area.to_box_d(), self.limit())
    }
}

impl CommandBackend for CpuBackend<'_> {
    fn exec_state(&mut self, cmd: &StateCmd) -> PaintResult<()> {
        match cmd {
            StateCmd::Opacity(o) => self.opacity = *o,
            StateCmd::OpacityAndColor { opacity, color } => {
                self.opacity = *opacity;
                self.paint = Paint::Solid(color.to_array());
            }
            StateCmd::OpacityAndPattern { opacity, pattern } => {
                self.opacity = *opacity;
                self.paint = Paint::Pattern(pattern.clone());
            }
            StateCmd::PaintHints(h) => self.hints = *h,
            StateCmd::ClipBox(b) => self.clip = ClipState::Box(*b),
            StateCmd::ClipRegion(r) => self.clip = ClipState::Region(r.clone()),
        }
        Ok(())
    }

    fn exec_fill(&mut self, cmd: &FillCmd) -> PaintResult<()> {
        let cov = match cmd {
            FillCmd::All => Coverage::solid(self.limit())?,
            FillCmd::Box(area) => self.box_coverage(*area)?,
            FillCmd::Path(geom) => self.path_coverage(geom)?,
            FillCmd::Stroke { geom, stroke } => {
                if stroke.width <= 0.0 {
                    return Ok(());
                }
                let mut outline = kurbo::stroke(
                    geom.path.to_bez_path().iter(),
                    &stroke.to_kurbo(),
                    &kurbo::StrokeOpts::default(),
                    STROKE_TOLERANCE,
                );
                outline.apply_affine(geom.device_transform());
                Coverage::path(&outline, FillRule::NonZero, self.limit())?
            }
        };
        self.shade(cov)
    }

    fn exec_blit(&mut self, cmd: &BlitCmd) -> PaintResult<()> {
        match cmd {
            BlitCmd::ImageD { target, blit } => {
                let frag = blit.fragment_box();
                if frag.is_empty() {
                    return Ok(());
                }
                let t = target.abs();
                let sx = t.width() / f64::from(frag.width());
                let sy = t.height() / f64::from(frag.height());
                let src_to_dev = blit.transform
                    * Affine::translate((t.x0, t.y0))
                    * Affine::scale_non_uniform(sx, sy)
                    * Affine::translate((-f64::from(frag.x0), -f64::from(frag.y0)));
                let dev_bounds = blit.transform.transform_rect_bbox(t);
                self.blit(&blit.image, frag, src_to_dev, dev_bounds, blit.quality)
            }
            BlitCmd::NormalizedA {
                at,
                image,
                fragment,
            } => {
                let frag = match fragment {
                    Some(f) => f.to_box().intersect(image.bounds()),
                    None => image.bounds(),
                };
                let src_to_dev = Affine::translate((
                    f64::from(at.x) - f64::from(frag.x0),
                    f64::from(at.y) - f64::from(frag.y0),
                ));
                let dev_bounds = src_to_dev.transform_rect_bbox(frag.to_box_d());
                self.blit(image, frag, src_to_dev, dev_bounds, ImageQuality::Nearest)
            }
            BlitCmd::NormalizedI { target, blit } => {
                self.blit_transformed(blit, target.to_box_d())
            }
            BlitCmd::NormalizedD { target, blit } => self.blit_transformed(blit, *target),
        }
    }

    fn exec_filter(&mut self, cmd: &FilterCmd) -> PaintResult<()> {
        match cmd {
            FilterCmd::Box { filter, area } => {
                let cov = self.box_coverage(*area)?;
                self.filter(*filter, cov)
            }
            FilterCmd::Path { filter, geom } => {
                let cov = self.path_coverage(geom)?;
                self.filter(*filter, cov)
            }
        }
    }

    fn exec_mask(&mut self, cmd: &MaskCmd) -> PaintResult<()> {
        self.masks.check(cmd)?;
        self.masks.apply(cmd);
        if !matches!(cmd, MaskCmd::Save) {
            self.mask_cov = None;
        }
        Ok(())
    }
}

fn device_path(geom: &PathGeom) -> BezPath {
    let mut p = geom.path.to_bez_path();
    p.apply_affine(geom.device_transform());
    p
}

fn mask_coverage(shape: &MaskShape, limit: BoxI) -> PaintResult<Coverage> {
    let mut cov = Coverage::solid(limit)?;
    for layer in shape.layers() {
        let lc = match layer {
            MaskLayer::Box(b) => Coverage::rect(*b, limit)?,
            MaskLayer::Path(g) => Coverage::path(&device_path(g), g.fill_rule, limit)?,
        };
        cov.intersect(&lc);
    }
    Ok(cov)
}

fn composite_px(op: CompositeOp, dst: [u8; 4], src: [u8; 4], c: u8) -> [u8; 4] {
    match op {
        CompositeOp::SrcOver => over_px(dst, src, c),
        CompositeOp::Src => copy_px(dst, src, c),
    }
}

fn filter_px(filter: Filter, px: [u8; 4]) -> [u8; 4] {
    let [r, g, b, a] = px;
    match filter {
        Filter::Invert => [a - r.min(a), a - g.min(a), a - b.min(a), a],
        Filter::Grayscale => {
            let l = ((77 * u32::from(r) + 150 * u32::from(g) + 29 * u32::from(b) + 128) >> 8)
                .min(u32::from(a)) as u8;
            [l, l, l, a]
        }
        Filter::Opacity(f) => {
            let k = u16::from(unit_to_u8(f));
            px.map(|v| mul_div255_u8(u16::from(v), k))
        }
    }
}

fn sample_image(image: &Image, frag: BoxI, p: Point, quality: ImageQuality) -> [u8; 4] {
    let tap = |x: i32, y: i32| {
        if frag.contains(x, y) {
            image.px(x, y)
        } else {
            [0; 4]
        }
    };
    match quality {
        ImageQuality::Nearest => tap(p.x.floor() as i32, p.y.floor() as i32),
        ImageQuality::Bilinear => {
            let u = p.x - 0.5;
            let v = p.y - 0.5;
            let x0 = u.floor();
            let y0 = v.floor();
            let fx = (u - x0) as f32;
            let fy = (v - y0) as f32;
            let (x0, y0) = (x0 as i32, y0 as i32);
            let taps = [
                (tap(x0, y0), (1.0 - fx) * (1.0 - fy)),
                (tap(x0 + 1, y0), fx * (1.0 - fy)),
                (tap(x0, y0 + 1), (1.0 - fx) * fy),
                (tap(x0 + 1, y0 + 1), fx * fy),
            ];
            let mut out = [0u8; 4];
            for (ch, o) in out.iter_mut().enumerate() {
                let v: f32 = taps.iter().map(|(px, w)| f32::from(px[ch]) * w).sum();
                *o = v.round().clamp(0.0, 255.0) as u8;
            }
            out
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
