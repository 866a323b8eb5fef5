use kurbo::Shape;

use crate::foundation::core::{Affine, BezPath, BoxI, Rect};
use crate::foundation::error::{PaintError, PaintResult};
use crate::paint::hints::FillRule;

/// Per-pixel coverage (0..=255) over an integer device box.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct Coverage {
    bounds: BoxI,
    alpha: Vec<u8>,
}

impl Coverage {
    /// Full coverage over `bounds`.
    pub(crate) fn solid(bounds: BoxI) -> PaintResult<Self> {
        if bounds.is_empty() {
            return Ok(Self::default());
        }
        let len = bounds.width() as usize * bounds.height() as usize;
        let mut alpha = Vec::new();
        alpha
            .try_reserve_exact(len)
            .map_err(|_| PaintError::out_of_memory("coverage buffer"))?;
        alpha.resize(len, 255);
        Ok(Self { bounds, alpha })
    }

    /// Coverage of a device-space rectangle, restricted to `limit`.
    ///
    /// Pixel-aligned rectangles are exact; anything else goes through the rasterizer.
    pub(crate) fn rect(rect: Rect, limit: BoxI) -> PaintResult<Self> {
        let r = rect.abs();
        if is_integral(r) {
            let b = BoxI::new(r.x0 as i32, r.y0 as i32, r.x1 as i32, r.y1 as i32);
            return Self::solid(b.intersect(limit));
        }
        Self::path(&r.to_path(0.1), FillRule::NonZero, limit)
    }

    /// Coverage of a device-space path, restricted to `limit`.
    ///
    /// Rasterized in tiles of at most [`TILE`] pixels per side.
    pub(crate) fn path(path: &BezPath, fill_rule: FillRule, limit: BoxI) -> PaintResult<Self> {
        let bounds = bbox_to_box_i(path.bounding_box()).intersect(limit);
        if bounds.is_empty() {
            return Ok(Self::default());
        }
        let mut out = Self::solid(bounds)?;
        out.alpha.fill(0);
        let cpu_path = bezpath_to_cpu(path);

        let mut y0 = bounds.y0;
        while y0 < bounds.y1 {
            let y1 = y0.saturating_add(TILE).min(bounds.y1);
            let mut x0 = bounds.x0;
            while x0 < bounds.x1 {
                let x1 = x0.saturating_add(TILE).min(bounds.x1);
                let tile = BoxI::new(x0, y0, x1, y1);
                let alpha = rasterize_tile(&cpu_path, fill_rule, tile)?;
                out.blit_rows(tile, &alpha);
                x0 = x1;
            }
            y0 = y1;
        }
        Ok(out)
    }

    fn blit_rows(&mut self, tile: BoxI, alpha: &[u8]) {
        let stride = self.bounds.width() as usize;
        let tw = tile.width() as usize;
        for (row, src) in alpha.chunks_exact(tw).enumerate() {
            let y = (tile.y0 - self.bounds.y0) as usize + row;
            let start = y * stride + (tile.x0 - self.bounds.x0) as usize;
            self.alpha[start..start + tw].copy_from_slice(src);
        }
    }

    pub(crate) fn bounds(&self) -> BoxI {
        self.bounds
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.alpha.is_empty()
    }

    /// Coverage at device pixel `(x, y)`; zero outside the bounds.
    pub(crate) fn at(&self, x: i32, y: i32) -> u8 {
        if !self.bounds.contains(x, y) {
            return 0;
        }
        let i = (y - self.bounds.y0) as usize * self.bounds.width() as usize
            + (x - self.bounds.x0) as usize;
        self.alpha[i]
    }

    /// Snap to fully in / fully out at half coverage.
    pub(crate) fn threshold(&mut self) {
        for a in &mut self.alpha {
            *a = if *a >= 128 { 255 } else { 0 };
        }
    }

    /// Multiply by `other`; pixels outside `other` drop to zero.
    pub(crate) fn intersect(&mut self, other: &Coverage) {
        let b = self.bounds;
        for y in b.y0..b.y1 {
            for x in b.x0..b.x1 {
                let i = (y - b.y0) as usize * b.width() as usize + (x - b.x0) as usize;
                let o = u16::from(other.at(x, y));
                self.alpha[i] = crate::foundation::math::mul_div255_u8(u16::from(self.alpha[i]), o);
            }
        }
    }
}

/// Side length of one rasterizer tile. A multiple of the rasterizer's 4-pixel strips so tile
/// seams do not shift sample positions.
const TILE: i32 = 4096;

fn rasterize_tile(
    path: &vello_cpu::kurbo::BezPath,
    fill_rule: FillRule,
    tile: BoxI,
) -> PaintResult<Vec<u8>> {
    let (w, h) = pixmap_dims(tile)?;
    let local = Affine::translate((-f64::from(tile.x0), -f64::from(tile.y0)));
    let mut ctx = vello_cpu::RenderContext::new(w, h);
    ctx.set_transform(affine_to_cpu(local));
    ctx.set_fill_rule(match fill_rule {
        FillRule::NonZero => vello_cpu::peniko::Fill::NonZero,
        FillRule::EvenOdd => vello_cpu::peniko::Fill::EvenOdd,
    });
    ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(255, 255, 255, 255));
    ctx.fill_path(path);
    ctx.flush();

    let mut pixmap = vello_cpu::Pixmap::new(w, h);
    ctx.render_to_pixmap(&mut pixmap);

    let alpha: Vec<u8> = pixmap
        .data_as_u8_slice()
        .chunks_exact(4)
        .map(|px| px[3])
        .collect();
    if alpha.len() != usize::from(w) * usize::from(h) {
        return Err(PaintError::execution("coverage pixmap size mismatch"));
    }
    Ok(alpha)
}

fn is_integral(r: Rect) -> bool {
    [r.x0, r.y0, r.x1, r.y1]
        .iter()
        .all(|v| v.fract() == 0.0 && v.abs() < f64::from(i32::MAX))
}

/// Smallest integer box containing `r`.
pub(crate) fn bbox_to_box_i(r: Rect) -> BoxI {
    if !(r.x0.is_finite() && r.y0.is_finite() && r.x1.is_finite() && r.y1.is_finite()) {
        return BoxI::default();
    }
    let lim = f64::from(i32::MAX);
    let c = |v: f64| v.clamp(-lim, lim) as i32;
    BoxI::new(c(r.x0.floor()), c(r.y0.floor()), c(r.x1.ceil()), c(r.y1.ceil()))
}

fn pixmap_dims(b: BoxI) -> PaintResult<(u16, u16)> {
    let w: u16 = b
        .width()
        .try_into()
        .map_err(|_| PaintError::execution(format!("coverage tile width exceeds u16: {}", b.width())))?;
    let h: u16 = b.height().try_into().map_err(|_| {
        PaintError::execution(format!("coverage tile height exceeds u16: {}", b.height()))
    })?;
    Ok((w, h))
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn bezpath_to_cpu(path: &BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let pt = |p: kurbo::Point| vello_cpu::kurbo::Point::new(p.x, p.y);
    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(pt(p)),
            PathEl::LineTo(p) => out.line_to(pt(p)),
            PathEl::QuadTo(p1, p2) => out.quad_to(pt(p1), pt(p2)),
            PathEl::CurveTo(p1, p2, p3) => out.curve_to(pt(p1), pt(p2), pt(p3)),
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/render/coverage.rs"]
mod tests;
