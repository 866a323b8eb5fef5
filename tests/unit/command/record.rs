use super::*;

fn geom_f() -> PathGeom {
    let mut p = PathF::new();
    p.move_to(0.0, 0.0);
    p.line_to(1.0, 0.0);
    p.line_to(1.0, 1.0);
    p.close();
    PathGeom {
        path: DomainPath::F(Arc::new(p)),
        origin: Point::new(10.0, 20.0),
        fill_rule: FillRule::EvenOdd,
        transform: Affine::scale(2.0),
    }
}

#[test]
fn opcodes_follow_domain_suffix() {
    assert_eq!(
        Command::Fill(FillCmd::Box(DomainBox::I(BoxI::default()))).op(),
        Op::FillBoxI
    );
    assert_eq!(
        Command::Fill(FillCmd::Box(DomainBox::F(BoxF::default()))).op(),
        Op::FillBoxF
    );
    assert_eq!(
        Command::Mask(MaskCmd::IntersectBox(DomainBox::D(BoxD::ZERO))).op(),
        Op::MaskIntersectBoxD
    );
    assert_eq!(Command::Fill(FillCmd::Path(geom_f())).op(), Op::FillPathF);
    assert_eq!(
        Command::Filter(FilterCmd::Path {
            filter: Filter::Invert,
            geom: geom_f(),
        })
        .op(),
        Op::FilterPathF
    );
}

#[test]
fn state_records_report_state_opcodes() {
    let recs = [
        Command::State(StateCmd::Opacity(0.5)),
        Command::State(StateCmd::PaintHints(PaintHints::default())),
        Command::State(StateCmd::ClipBox(BoxI::default())),
    ];
    assert!(recs.iter().all(|c| c.op().is_state()));
    assert!(!Command::Fill(FillCmd::All).op().is_state());
}

#[test]
fn device_transform_applies_user_transform_then_origin() {
    let g = geom_f();
    let p = g.device_transform() * Point::new(1.0, 1.0);
    assert_eq!(p, Point::new(12.0, 22.0));
}

#[test]
fn fragment_box_is_clipped_to_image() {
    let blit = ImageBlit {
        image: Arc::new(Image::new(4, 4).unwrap()),
        fragment: Some(RectI::new(2, 2, 10, 10)),
        transform: Affine::IDENTITY,
        quality: ImageQuality::Nearest,
    };
    assert_eq!(blit.fragment_box(), BoxI::new(2, 2, 4, 4));
}

#[test]
fn path_records_charge_their_elements() {
    let small = Command::Fill(FillCmd::All).footprint();
    let path = Command::Fill(FillCmd::Path(geom_f())).footprint();
    assert!(path > small);
}
