use super::*;

fn ctx() -> EngineContext {
    let mut c = EngineContext::new(BoxI::new(0, 0, 100, 100));
    c.pending = PendingFlags::empty();
    c
}

#[test]
fn new_context_starts_fully_dirty() {
    let c = EngineContext::new(BoxI::new(0, 0, 10, 10));
    assert_eq!(c.pending(), PendingFlags::ALL_STATE);
    assert_eq!(c.clip(), &ClipState::Box(BoxI::new(0, 0, 10, 10)));
}

#[test]
fn unchanged_values_do_not_mark_dirty() {
    let mut c = ctx();
    c.set_opacity(1.0).unwrap();
    c.set_hints(PaintHints::default());
    c.set_transform(Affine::IDENTITY);
    c.set_stroke(StrokeParams::default()).unwrap();
    c.reset_clip();
    c.set_source_color(Rgba8Premul {
        r: 0,
        g: 0,
        b: 0,
        a: 255,
    });
    assert!(c.pending().is_empty());
}

#[test]
fn setters_mark_their_category() {
    let mut c = ctx();
    c.set_opacity(0.5).unwrap();
    assert_eq!(c.pending(), PendingFlags::OPACITY);
    c.set_transform(Affine::scale(2.0));
    c.set_clip_box(BoxI::new(1, 1, 5, 5));
    assert_eq!(
        c.pending(),
        PendingFlags::OPACITY | PendingFlags::TRANSFORM | PendingFlags::CLIP
    );
}

#[test]
fn opacity_out_of_range_is_rejected_without_marking() {
    let mut c = ctx();
    assert!(c.set_opacity(1.5).is_err());
    assert!(c.set_opacity(f32::NAN).is_err());
    assert!(c.pending().is_empty());
    assert_eq!(c.opacity(), 1.0);
}

#[test]
fn clip_box_is_intersected_with_target() {
    let mut c = ctx();
    c.set_clip_box(BoxI::new(-10, 50, 20, 500));
    assert_eq!(c.clip(), &ClipState::Box(BoxI::new(0, 50, 20, 100)));
}

#[test]
fn single_box_region_collapses_to_box_clip() {
    let mut c = ctx();
    c.set_clip_region(Region::from_boxes([BoxI::new(0, 0, 10, 10), BoxI::default()]));
    assert_eq!(c.clip(), &ClipState::Box(BoxI::new(0, 0, 10, 10)));

    c.set_clip_region(Region::from_boxes([
        BoxI::new(0, 0, 10, 10),
        BoxI::new(20, 20, 30, 30),
    ]));
    let ClipState::Region(r) = c.clip() else {
        panic!("expected region clip");
    };
    assert_eq!(r.boxes().len(), 2);
    assert_eq!(r.bounds(), BoxI::new(0, 0, 30, 30));
    assert!(c.clip().contains(25, 25));
    assert!(!c.clip().contains(15, 15));
}

#[test]
fn pattern_source_replaces_solid_and_marks_source() {
    let mut c = ctx();
    let spec = PatternSpec::LinearGradient {
        start: crate::foundation::core::Point::new(0.0, 0.0),
        end: crate::foundation::core::Point::new(1.0, 0.0),
        stops: vec![crate::paint::source::GradientStop {
            offset: 0.0,
            color: Rgba8Premul::TRANSPARENT,
        }],
    };
    c.set_source_pattern(spec.clone()).unwrap();
    assert!(!c.source().is_solid());
    assert_eq!(c.pending(), PendingFlags::SOURCE);

    c.pending = PendingFlags::empty();
    c.set_source_pattern(spec).unwrap();
    assert!(c.pending().is_empty());
}

#[test]
fn mark_all_dirty_restores_full_set() {
    let mut c = ctx();
    c.mark_all_dirty();
    assert_eq!(c.pending(), PendingFlags::ALL_STATE);
}
