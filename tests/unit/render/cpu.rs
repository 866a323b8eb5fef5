use super::*;
use crate::foundation::core::{PointI, Rgba8Premul};
use crate::paint::context::Region;

const RED: Rgba8Premul = Rgba8Premul {
    r: 255,
    g: 0,
    b: 0,
    a: 255,
};

fn solid(opacity: f32, color: Rgba8Premul) -> StateCmd {
    StateCmd::OpacityAndColor { opacity, color }
}

fn fill_box(b: BoxI) -> FillCmd {
    FillCmd::Box(DomainBox::I(b))
}

fn run(img: &mut Image, f: impl FnOnce(&mut CpuBackend<'_>) -> PaintResult<()>) {
    let mut be = CpuBackend::new(img);
    f(&mut be).unwrap();
}

#[test]
fn solid_box_fill_covers_exact_pixels() {
    let mut img = Image::new(8, 8).unwrap();
    run(&mut img, |be| {
        be.exec_state(&solid(1.0, RED))?;
        be.exec_fill(&fill_box(BoxI::new(2, 2, 4, 4)))
    });
    assert_eq!(img.pixel(2, 2), RED);
    assert_eq!(img.pixel(3, 3), RED);
    assert_eq!(img.pixel(4, 4), Rgba8Premul::TRANSPARENT);
    assert_eq!(img.pixel(1, 2), Rgba8Premul::TRANSPARENT);
}

#[test]
fn opacity_scales_source() {
    let mut img = Image::new(2, 2).unwrap();
    run(&mut img, |be| {
        be.exec_state(&solid(0.5, RED))?;
        be.exec_fill(&FillCmd::All)
    });
    let px = img.pixel(0, 0);
    assert!((127..=128).contains(&px.r), "{px:?}");
    assert_eq!(px.r, px.a);
    assert_eq!(px.g, 0);
}

#[test]
fn clip_box_limits_fill_all() {
    let mut img = Image::new(6, 6).unwrap();
    run(&mut img, |be| {
        be.exec_state(&solid(1.0, RED))?;
        be.exec_state(&StateCmd::ClipBox(BoxI::new(1, 1, 3, 3)))?;
        be.exec_fill(&FillCmd::All)
    });
    assert_eq!(img.pixel(1, 1), RED);
    assert_eq!(img.pixel(3, 3), Rgba8Premul::TRANSPARENT);
    assert_eq!(img.pixel(0, 0), Rgba8Premul::TRANSPARENT);
}

#[test]
fn clip_region_skips_gap_between_boxes() {
    let mut img = Image::new(6, 2).unwrap();
    let region = Region::from_boxes([BoxI::new(0, 0, 2, 2), BoxI::new(4, 0, 6, 2)]);
    run(&mut img, |be| {
        be.exec_state(&solid(1.0, RED))?;
        be.exec_state(&StateCmd::ClipRegion(Arc::new(region)))?;
        be.exec_fill(&FillCmd::All)
    });
    assert_eq!(img.pixel(1, 0), RED);
    assert_eq!(img.pixel(2, 0), Rgba8Premul::TRANSPARENT);
    assert_eq!(img.pixel(3, 1), Rgba8Premul::TRANSPARENT);
    assert_eq!(img.pixel(5, 1), RED);
}

#[test]
fn src_composite_replaces_destination() {
    let mut img = Image::new(2, 1).unwrap();
    img.clear(RED);
    let half_green = Rgba8Premul::from_straight_rgba(0, 255, 0, 128);
    run(&mut img, |be| {
        be.exec_state(&StateCmd::PaintHints(PaintHints {
            composite: CompositeOp::Src,
            ..PaintHints::default()
        }))?;
        be.exec_state(&solid(1.0, half_green))?;
        be.exec_fill(&fill_box(BoxI::new(0, 0, 1, 1)))
    });
    assert_eq!(img.pixel(0, 0), half_green);
    assert_eq!(img.pixel(1, 0), RED);
}

#[test]
fn mask_box_limits_fill() {
    let mut img = Image::new(8, 8).unwrap();
    run(&mut img, |be| {
        be.exec_state(&solid(1.0, RED))?;
        be.exec_mask(&MaskCmd::Switch)?;
        be.exec_mask(&MaskCmd::FromBox(DomainBox::I(BoxI::new(0, 0, 4, 8))))?;
        be.exec_fill(&FillCmd::All)
    });
    assert_eq!(img.pixel(3, 5), RED);
    assert_eq!(img.pixel(4, 5), Rgba8Premul::TRANSPARENT);
}

#[test]
fn mask_restore_brings_back_saved_shape() {
    let mut img = Image::new(8, 1).unwrap();
    let mut be = CpuBackend::new(&mut img);
    be.exec_state(&solid(1.0, RED)).unwrap();
    be.exec_mask(&MaskCmd::Switch).unwrap();
    be.exec_mask(&MaskCmd::FromBox(DomainBox::I(BoxI::new(0, 0, 6, 1))))
        .unwrap();
    be.exec_mask(&MaskCmd::Save).unwrap();
    be.exec_mask(&MaskCmd::IntersectBox(DomainBox::I(BoxI::new(0, 0, 2, 1))))
        .unwrap();
    be.exec_mask(&MaskCmd::Restore).unwrap();
    be.exec_fill(&FillCmd::All).unwrap();
    assert_eq!(be.masks().depth(), 0);
    drop(be);
    assert_eq!(img.pixel(5, 0), RED);
    assert_eq!(img.pixel(6, 0), Rgba8Premul::TRANSPARENT);
}

#[test]
fn mask_misuse_is_rejected() {
    let mut img = Image::new(2, 2).unwrap();
    let mut be = CpuBackend::new(&mut img);
    assert!(be.exec_mask(&MaskCmd::Save).is_err());
    assert!(be.exec_mask(&MaskCmd::Restore).is_err());
}

#[test]
fn normalized_blit_copies_fragment_at_offset() {
    let mut src = Image::new(4, 4).unwrap();
    src.clear(RED);
    let src = Arc::new(src);
    let mut img = Image::new(8, 8).unwrap();
    run(&mut img, |be| {
        be.exec_blit(&BlitCmd::NormalizedA {
            at: PointI::new(5, 5),
            image: src.clone(),
            fragment: Some(crate::foundation::core::RectI::new(1, 1, 2, 2)),
        })
    });
    assert_eq!(img.pixel(5, 5), RED);
    assert_eq!(img.pixel(6, 6), RED);
    assert_eq!(img.pixel(7, 7), Rgba8Premul::TRANSPARENT);
    assert_eq!(img.pixel(4, 5), Rgba8Premul::TRANSPARENT);
}

#[test]
fn scaled_blit_fills_target_box() {
    let mut src = Image::new(1, 1).unwrap();
    src.clear(RED);
    let mut img = Image::new(8, 8).unwrap();
    run(&mut img, |be| {
        be.exec_blit(&BlitCmd::ImageD {
            target: Rect::new(0.0, 0.0, 4.0, 4.0),
            blit: ImageBlit {
                image: Arc::new(src),
                fragment: None,
                transform: Affine::IDENTITY,
                quality: ImageQuality::Nearest,
            },
        })
    });
    assert_eq!(img.pixel(0, 0), RED);
    assert_eq!(img.pixel(3, 3), RED);
    assert_eq!(img.pixel(4, 4), Rgba8Premul::TRANSPARENT);
}

#[test]
fn invert_filter_keeps_alpha() {
    let mut img = Image::new(2, 1).unwrap();
    img.clear(RED);
    run(&mut img, |be| {
        be.exec_filter(&FilterCmd::Box {
            filter: Filter::Invert,
            area: DomainBox::I(BoxI::new(0, 0, 1, 1)),
        })
    });
    assert_eq!(img.pixel(0, 0).to_array(), [0, 255, 255, 255]);
    assert_eq!(img.pixel(1, 0), RED);
}

#[test]
fn zero_width_stroke_draws_nothing() {
    let mut img = Image::new(4, 4).unwrap();
    let mut p = BezPath::new();
    p.move_to((0.0, 2.0));
    p.line_to((4.0, 2.0));
    run(&mut img, |be| {
        be.exec_fill(&FillCmd::Stroke {
            geom: PathGeom {
                path: crate::command::record::DomainPath::D(Arc::new(p)),
                origin: Point::ZERO,
                fill_rule: FillRule::NonZero,
                transform: Affine::IDENTITY,
            },
            stroke: crate::paint::hints::StrokeParams {
                width: 0.0,
                ..Default::default()
            },
        })
    });
    assert!(img.data().iter().all(|&b| b == 0));
}

#[test]
fn band_writes_only_its_rows() {
    let surface = BoxI::new(0, 0, 4, 8);
    let mut band = Image::new(4, 4).unwrap();
    {
        let mut be = CpuBackend::band(&mut band, 4, surface);
        be.exec_state(&solid(1.0, RED)).unwrap();
        be.exec_fill(&fill_box(BoxI::new(0, 2, 4, 6))).unwrap();
    }
    assert_eq!(band.pixel(0, 0), RED);
    assert_eq!(band.pixel(0, 1), RED);
    assert_eq!(band.pixel(0, 2), Rgba8Premul::TRANSPARENT);
}

#[test]
fn normalized_blit_with_extreme_coordinates_draws_nothing() {
    let mut src = Image::new(4, 4).unwrap();
    src.clear(RED);
    let src = Arc::new(src);
    let mut img = Image::new(4, 4).unwrap();
    run(&mut img, |be| {
        be.exec_blit(&BlitCmd::NormalizedA {
            at: PointI::new(0, 0),
            image: src.clone(),
            fragment: Some(crate::foundation::core::RectI::new(i32::MAX - 1, 0, 4, 4)),
        })?;
        be.exec_blit(&BlitCmd::NormalizedA {
            at: PointI::new(i32::MIN, 0),
            image: src.clone(),
            fragment: Some(crate::foundation::core::RectI::new(1, 0, 2, 2)),
        })
    });
    assert!(img.data().iter().all(|&b| b == 0));
}
