use std::sync::Arc;

use crate::dispatch::op::Op;
use crate::foundation::core::{
    Affine, BezPath, BoxD, BoxF, BoxI, PathF, Point, PointI, RectI, Rgba8Premul,
};
use crate::foundation::error::{PaintError, PaintResult};
use crate::foundation::image::Image;
use crate::paint::context::Region;
use crate::paint::hints::{FillRule, ImageQuality, PaintHints, StrokeParams};
use crate::paint::source::RasterPattern;

/// A box in one of the three numeric domains.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DomainBox {
    /// Integer.
    I(BoxI),
    /// Single precision.
    F(BoxF),
    /// Double precision.
    D(BoxD),
}

impl DomainBox {
    /// Widen to double precision.
    pub fn to_box_d(self) -> BoxD {
        match self {
            DomainBox::I(b) => b.to_box_d(),
            DomainBox::F(b) => b.to_box_d(),
            DomainBox::D(b) => b,
        }
    }
}

/// A path in the single- or double-precision domain.
#[derive(Clone, Debug, PartialEq)]
pub enum DomainPath {
    /// Single precision.
    F(Arc<PathF>),
    /// Double precision.
    D(Arc<BezPath>),
}

impl DomainPath {
    /// Widen to a double-precision path.
    pub fn to_bez_path(&self) -> BezPath {
        match self {
            DomainPath::F(p) => p.to_bez_path(),
            DomainPath::D(p) => (**p).clone(),
        }
    }

    fn element_count(&self) -> usize {
        match self {
            DomainPath::F(p) => p.len(),
            DomainPath::D(p) => p.elements().len(),
        }
    }
}

/// Path geometry captured by path records.
///
/// Device coordinates are `translate(origin) * transform * p`.
#[derive(Clone, Debug, PartialEq)]
pub struct PathGeom {
    /// Path in its own domain.
    pub path: DomainPath,
    /// Device-space offset.
    pub origin: Point,
    /// Fill rule for coverage.
    pub fill_rule: FillRule,
    /// User transform at record time.
    pub transform: Affine,
}

impl PathGeom {
    /// Full path-to-device transform.
    pub fn device_transform(&self) -> Affine {
        Affine::translate(self.origin.to_vec2()) * self.transform
    }
}

/// Payload shared by the transformed blit records.
#[derive(Clone, Debug, PartialEq)]
pub struct ImageBlit {
    /// Source pixels.
    pub image: Arc<Image>,
    /// Sub-rectangle of the source; `None` means the whole image.
    pub fragment: Option<RectI>,
    /// Transform of the blit.
    pub transform: Affine,
    /// Sampling filter.
    pub quality: ImageQuality,
}

impl ImageBlit {
    /// Effective fragment, clipped to the image.
    pub fn fragment_box(&self) -> BoxI {
        let bounds = self.image.bounds();
        match self.fragment {
            Some(f) => f.to_box().intersect(bounds),
            None => bounds,
        }
    }
}

/// Pixel filter applied inside box or path coverage.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Filter {
    /// Invert color channels (alpha kept).
    Invert,
    /// Replace color by its luma.
    Grayscale,
    /// Scale all channels by a factor in `[0, 1]`.
    Opacity(f32),
}

impl Filter {
    /// Reject an opacity factor outside `[0, 1]`.
    pub fn validate(self) -> PaintResult<()> {
        match self {
            Filter::Opacity(f) if !f.is_finite() || !(0.0..=1.0).contains(&f) => Err(
                PaintError::invalid_argument(format!("filter opacity must be in [0, 1], got {f}")),
            ),
            _ => Ok(()),
        }
    }
}

/// State snapshots emitted by the pending-state resolver.
#[derive(Clone, Debug, PartialEq)]
pub enum StateCmd {
    /// Global opacity alone.
    Opacity(f32),
    /// Opacity folded with a solid color.
    OpacityAndColor {
        /// Global opacity.
        opacity: f32,
        /// Source color.
        color: Rgba8Premul,
    },
    /// Opacity folded with a materialized pattern.
    OpacityAndPattern {
        /// Global opacity.
        opacity: f32,
        /// Render-ready pattern.
        pattern: Arc<RasterPattern>,
    },
    /// Paint hints.
    PaintHints(PaintHints),
    /// Box clip.
    ClipBox(BoxI),
    /// Region clip.
    ClipRegion(Arc<Region>),
}

/// Fill-family records.
#[derive(Clone, Debug, PartialEq)]
pub enum FillCmd {
    /// Fill the whole clip.
    All,
    /// Fill a box.
    Box(DomainBox),
    /// Fill a path.
    Path(PathGeom),
    /// Stroke a path.
    Stroke {
        /// Path to stroke.
        geom: PathGeom,
        /// Stroke parameters at record time.
        stroke: StrokeParams,
    },
}

/// Image blit records.
#[derive(Clone, Debug, PartialEq)]
pub enum BlitCmd {
    /// Fragment stretched over a user-space box, then transformed.
    ImageD {
        /// Target box in user space.
        target: BoxD,
        /// Payload; `transform` is the user transform.
        blit: ImageBlit,
    },
    /// Axis-aligned, untransformed copy at an integer point.
    NormalizedA {
        /// Device position of the fragment's top-left pixel.
        at: PointI,
        /// Source pixels.
        image: Arc<Image>,
        /// Sub-rectangle of the source.
        fragment: Option<RectI>,
    },
    /// Source-to-device transformed blit bounded by an integer box.
    NormalizedI {
        /// Device bounds.
        target: BoxI,
        /// Payload; `transform` maps source pixels to device pixels.
        blit: ImageBlit,
    },
    /// Source-to-device transformed blit bounded by a double box.
    NormalizedD {
        /// Device bounds.
        target: BoxD,
        /// Payload; `transform` maps source pixels to device pixels.
        blit: ImageBlit,
    },
}

/// Filter records.
#[derive(Clone, Debug, PartialEq)]
pub enum FilterCmd {
    /// Filter inside a box.
    Box {
        /// Filter to apply.
        filter: Filter,
        /// Area.
        area: DomainBox,
    },
    /// Filter inside a path.
    Path {
        /// Filter to apply.
        filter: Filter,
        /// Area.
        geom: PathGeom,
    },
}

/// Mask stack records.
#[derive(Clone, Debug, PartialEq)]
pub enum MaskCmd {
    /// Enter mask mode with full coverage.
    Switch,
    /// Leave mask mode and drop saved masks.
    Discard,
    /// Push the current mask.
    Save,
    /// Pop the last saved mask.
    Restore,
    /// Replace the mask with a box.
    FromBox(DomainBox),
    /// Replace the mask with a path.
    FromPath(PathGeom),
    /// Narrow the mask by a box.
    IntersectBox(DomainBox),
    /// Narrow the mask by a path.
    IntersectPath(PathGeom),
}

/// One immutable command record.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// State snapshot.
    State(StateCmd),
    /// Fill or stroke.
    Fill(FillCmd),
    /// Image blit.
    Blit(BlitCmd),
    /// Pixel filter.
    Filter(FilterCmd),
    /// Mask stack change.
    Mask(MaskCmd),
}

fn box_op(b: &DomainBox, ops: [Op; 3]) -> Op {
    match b {
        DomainBox::I(_) => ops[0],
        DomainBox::F(_) => ops[1],
        DomainBox::D(_) => ops[2],
    }
}

fn path_op(g: &PathGeom, ops: [Op; 2]) -> Op {
    match g.path {
        DomainPath::F(_) => ops[0],
        DomainPath::D(_) => ops[1],
    }
}

impl Command {
    /// Opcode of this record.
    pub fn op(&self) -> Op {
        match self {
            Command::State(s) => match s {
                StateCmd::Opacity(_) => Op::SetOpacity,
                StateCmd::OpacityAndColor { .. } => Op::SetOpacityAndColor,
                StateCmd::OpacityAndPattern { .. } => Op::SetOpacityAndPattern,
                StateCmd::PaintHints(_) => Op::SetPaintHints,
                StateCmd::ClipBox(_) => Op::SetClipBox,
                StateCmd::ClipRegion(_) => Op::SetClipRegion,
            },
            Command::Fill(f) => match f {
                FillCmd::All => Op::FillAll,
                FillCmd::Box(b) => box_op(b, [Op::FillBoxI, Op::FillBoxF, Op::FillBoxD]),
                FillCmd::Path(g) => path_op(g, [Op::FillPathF, Op::FillPathD]),
                FillCmd::Stroke { geom, .. } => path_op(geom, [Op::StrokePathF, Op::StrokePathD]),
            },
            Command::Blit(b) => match b {
                BlitCmd::ImageD { .. } => Op::BlitImageD,
                BlitCmd::NormalizedA { .. } => Op::BlitNormalizedImageA,
                BlitCmd::NormalizedI { .. } => Op::BlitNormalizedImageI,
                BlitCmd::NormalizedD { .. } => Op::BlitNormalizedImageD,
            },
            Command::Filter(f) => match f {
                FilterCmd::Box { area, .. } => {
                    box_op(area, [Op::FilterBoxI, Op::FilterBoxF, Op::FilterBoxD])
                }
                FilterCmd::Path { geom, .. } => path_op(geom, [Op::FilterPathF, Op::FilterPathD]),
            },
            Command::Mask(m) => match m {
                MaskCmd::Switch => Op::SwitchToMask,
                MaskCmd::Discard => Op::DiscardMask,
                MaskCmd::Save => Op::SaveMask,
                MaskCmd::Restore => Op::RestoreMask,
                MaskCmd::FromBox(b) => {
                    box_op(b, [Op::MaskFromBoxI, Op::MaskFromBoxF, Op::MaskFromBoxD])
                }
                MaskCmd::FromPath(g) => path_op(g, [Op::MaskFromPathF, Op::MaskFromPathD]),
                MaskCmd::IntersectBox(b) => box_op(
                    b,
                    [
                        Op::MaskIntersectBoxI,
                        Op::MaskIntersectBoxF,
                        Op::MaskIntersectBoxD,
                    ],
                ),
                MaskCmd::IntersectPath(g) => {
                    path_op(g, [Op::MaskIntersectPathF, Op::MaskIntersectPathD])
                }
            },
        }
    }

    /// Approximate arena bytes charged for this record.
    ///
    /// Shared images and patterns are not charged; path elements and region boxes are.
    pub fn footprint(&self) -> usize {
        let base = std::mem::size_of::<Command>();
        let extra = match self {
            Command::State(StateCmd::ClipRegion(r)) => {
                std::mem::size_of_val(r.boxes())
            }
            Command::Fill(FillCmd::Path(g) | FillCmd::Stroke { geom: g, .. })
            | Command::Filter(FilterCmd::Path { geom: g, .. })
            | Command::Mask(MaskCmd::FromPath(g) | MaskCmd::IntersectPath(g)) => {
                g.path.element_count() * std::mem::size_of::<kurbo::PathEl>()
            }
            _ => 0,
        };
        base + extra
    }
}

#[cfg(test)]
#[path = "../../tests/unit/command/record.rs"]
mod tests;
