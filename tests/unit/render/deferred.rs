use super::*;
use crate::command::record::{DomainBox, DomainPath, FillCmd, PathGeom, StateCmd};
use crate::foundation::core::{Affine, BezPath, Point, Rgba8Premul};
use crate::paint::hints::FillRule;

fn sequence() -> Vec<Command> {
    let mut tri = BezPath::new();
    tri.move_to((1.0, 1.0));
    tri.line_to((14.5, 3.0));
    tri.line_to((6.0, 13.25));
    tri.close_path();
    vec![
        Command::State(StateCmd::OpacityAndColor {
            opacity: 1.0,
            color: Rgba8Premul::from_straight_rgba(10, 200, 30, 255),
        }),
        Command::Fill(FillCmd::Box(DomainBox::I(BoxI::new(0, 0, 16, 5)))),
        Command::State(StateCmd::OpacityAndColor {
            opacity: 0.75,
            color: Rgba8Premul::from_straight_rgba(250, 0, 0, 255),
        }),
        Command::Fill(FillCmd::Path(PathGeom {
            path: DomainPath::D(Arc::new(tri)),
            origin: Point::new(0.5, 0.0),
            fill_rule: FillRule::NonZero,
            transform: Affine::IDENTITY,
        })),
    ]
}

#[test]
fn zero_workers_are_rejected() {
    assert!(DeferredExecutor::new(0, 4, 64).is_err());
    assert!(build_thread_pool(0).is_err());
}

#[test]
fn zero_queue_or_batch_is_rejected() {
    assert!(DeferredExecutor::new(2, 0, 64).is_err());
    assert!(DeferredExecutor::new(2, 4, 0).is_err());
}

#[test]
fn bands_cover_target_in_order() {
    let img = Image::new(3, 10).unwrap();
    let bands = split_bands(&img, 4).unwrap();
    let origins: Vec<i32> = bands.iter().map(|(_, y)| *y).collect();
    assert_eq!(origins, vec![0, 3, 6, 9]);
    let rows: u32 = bands.iter().map(|(b, _)| b.height()).sum();
    assert_eq!(rows, 10);
}

#[test]
fn more_workers_than_rows_uses_one_band_per_row() {
    let img = Image::new(2, 2).unwrap();
    assert_eq!(split_bands(&img, 8).unwrap().len(), 2);
}

#[test]
fn matches_single_threaded_execution() {
    let cmds = sequence();

    let mut direct = Image::new(16, 16).unwrap();
    execute_commands(&mut CpuBackend::new(&mut direct), &cmds).unwrap();

    let exec = DeferredExecutor::new(3, 1, 1).unwrap();
    let mut banded = Image::new(16, 16).unwrap();
    exec.execute(&mut banded, &cmds).unwrap();

    assert_eq!(direct, banded);
}

#[test]
fn worker_error_is_reported() {
    let cmds = vec![Command::Mask(crate::command::record::MaskCmd::Restore)];
    let exec = DeferredExecutor::new(2, 1, 1).unwrap();
    let mut img = Image::new(4, 4).unwrap();
    assert!(exec.execute(&mut img, &cmds).is_err());
}

#[test]
fn empty_sequence_leaves_target_untouched() {
    let exec = DeferredExecutor::new(2, 2, 8).unwrap();
    let mut img = Image::new(4, 4).unwrap();
    img.clear(Rgba8Premul::from_straight_rgba(1, 2, 3, 255));
    let before = img.clone();
    exec.execute(&mut img, &[]).unwrap();
    assert_eq!(img, before);
}
