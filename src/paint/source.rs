use std::sync::Arc;

use crate::foundation::core::{Point, Rgba8Premul};
use crate::foundation::error::{PaintError, PaintResult};
use crate::foundation::image::Image;
use crate::foundation::math::lerp_px;

/// Number of entries in a materialized gradient lookup table.
const GRADIENT_LUT_LEN: usize = 256;

/// One gradient color stop.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct GradientStop {
    /// Position in `[0, 1]`.
    pub offset: f32,
    /// Stop color.
    pub color: Rgba8Premul,
}

/// User-level description of a non-solid source.
#[derive(Clone, Debug, PartialEq)]
pub enum PatternSpec {
    /// Linear gradient from `start` to `end` (pad extend).
    LinearGradient {
        /// Gradient start point (offset 0).
        start: Point,
        /// Gradient end point (offset 1).
        end: Point,
        /// Color stops, sorted by offset.
        stops: Vec<GradientStop>,
    },
    /// Repeating image texture anchored at `origin`.
    Texture {
        /// Texture pixels.
        image: Arc<Image>,
        /// Device-space position of the texture's top-left pixel.
        origin: Point,
    },
}

impl PatternSpec {
    /// Validate stops and texture dimensions.
    pub fn validate(&self) -> PaintResult<()> {
        match self {
            PatternSpec::LinearGradient { stops, .. } => {
                if stops.is_empty() {
                    return Err(PaintError::invalid_argument(
                        "gradient needs at least one stop",
                    ));
                }
                let mut prev = 0.0f32;
                for s in stops {
                    if !s.offset.is_finite() || !(0.0..=1.0).contains(&s.offset) {
                        return Err(PaintError::invalid_argument(
                            "gradient stop offset must be in [0, 1]",
                        ));
                    }
                    if s.offset < prev {
                        return Err(PaintError::invalid_argument(
                            "gradient stops must be sorted by offset",
                        ));
                    }
                    prev = s.offset;
                }
                Ok(())
            }
            PatternSpec::Texture { image, .. } => {
                if image.width() == 0 || image.height() == 0 {
                    return Err(PaintError::invalid_argument("texture image is empty"));
                }
                Ok(())
            }
        }
    }

    /// Build the render-ready form.
    pub fn materialize(&self) -> PaintResult<RasterPattern> {
        self.validate()?;
        match self {
            PatternSpec::LinearGradient { start, end, stops } => {
                let mut lut = Vec::new();
                lut.try_reserve_exact(GRADIENT_LUT_LEN)
                    .map_err(|_| PaintError::out_of_memory("gradient lookup table"))?;
                for i in 0..GRADIENT_LUT_LEN {
                    let t = i as f32 / (GRADIENT_LUT_LEN - 1) as f32;
                    lut.push(sample_stops(stops, t));
                }
                let d = *end - *start;
                let len2 = d.hypot2();
                Ok(RasterPattern::Linear {
                    start: *start,
                    // A degenerate vector paints the last stop everywhere.
                    inv_dir: if len2 > 0.0 {
                        (d.x / len2, d.y / len2)
                    } else {
                        (0.0, 0.0)
                    },
                    degenerate: len2 <= 0.0,
                    lut,
                })
            }
            PatternSpec::Texture { image, origin } => Ok(RasterPattern::Texture {
                image: image.clone(),
                ox: origin.x.round() as i64,
                oy: origin.y.round() as i64,
            }),
        }
    }
}

fn sample_stops(stops: &[GradientStop], t: f32) -> [u8; 4] {
    let first = stops[0];
    if t <= first.offset {
        return first.color.to_array();
    }
    for w in stops.windows(2) {
        let (a, b) = (w[0], w[1]);
        if t <= b.offset {
            let span = b.offset - a.offset;
            if span <= f32::EPSILON {
                return b.color.to_array();
            }
            let k = ((t - a.offset) / span * 255.0).round().clamp(0.0, 255.0) as u8;
            return lerp_px(a.color.to_array(), b.color.to_array(), k);
        }
    }
    stops[stops.len() - 1].color.to_array()
}

/// A pattern resolved into something the renderer can sample per pixel.
///
/// Built lazily the first time a pattern source is flushed and then shared by every record that
/// references it.
#[derive(Clone, Debug, PartialEq)]
pub enum RasterPattern {
    /// Linear gradient with a precomputed lookup table.
    Linear {
        /// Gradient start point.
        start: Point,
        /// Gradient direction divided by its squared length.
        inv_dir: (f64, f64),
        /// Start and end coincide.
        degenerate: bool,
        /// Premultiplied colors, evenly spaced over `[0, 1]`.
        lut: Vec<[u8; 4]>,
    },
    /// Repeating texture.
    Texture {
        /// Texture pixels.
        image: Arc<Image>,
        /// Texture origin x in device pixels.
        ox: i64,
        /// Texture origin y in device pixels.
        oy: i64,
    },
}

impl RasterPattern {
    /// Premultiplied color at device pixel `(x, y)` (sampled at the pixel center).
    pub fn sample(&self, x: i32, y: i32) -> [u8; 4] {
        match self {
            RasterPattern::Linear {
                start,
                inv_dir,
                degenerate,
                lut,
            } => {
                if *degenerate {
                    return lut[lut.len() - 1];
                }
                let px = f64::from(x) + 0.5 - start.x;
                let py = f64::from(y) + 0.5 - start.y;
                let t = (px * inv_dir.0 + py * inv_dir.1).clamp(0.0, 1.0);
                lut[(t * (lut.len() - 1) as f64).round() as usize]
            }
            RasterPattern::Texture { image, ox, oy } => {
                let w = i64::from(image.width());
                let h = i64::from(image.height());
                let tx = (i64::from(x) - ox).rem_euclid(w);
                let ty = (i64::from(y) - oy).rem_euclid(h);
                image.px(tx as i32, ty as i32)
            }
        }
    }
}

/// Active source of the engine context.
///
/// The tag decides which payload is live; a solid color and a pattern are never active together.
#[derive(Clone, Debug)]
pub enum Source {
    /// Flat premultiplied color.
    Solid(Rgba8Premul),
    /// Pattern with its lazily materialized raster form.
    Pattern {
        /// User-level description.
        spec: Arc<PatternSpec>,
        /// Render-ready form, built on first flush.
        raster: Option<Arc<RasterPattern>>,
    },
}

impl Default for Source {
    fn default() -> Self {
        Source::Solid(Rgba8Premul {
            r: 0,
            g: 0,
            b: 0,
            a: 255,
        })
    }
}

impl Source {
    /// `true` when the source is a flat color.
    pub fn is_solid(&self) -> bool {
        matches!(self, Source::Solid(_))
    }

    /// Return the materialized pattern, building it on first use.
    pub(crate) fn ensure_pattern(&mut self) -> PaintResult<Option<Arc<RasterPattern>>> {
        match self {
            Source::Solid(_) => Ok(None),
            Source::Pattern { spec, raster } => {
                if let Some(r) = raster {
                    return Ok(Some(r.clone()));
                }
                let built = Arc::new(spec.materialize()?);
                tracing::trace!("materialized pattern source");
                *raster = Some(built.clone());
                Ok(Some(built))
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/paint/source.rs"]
mod tests;
