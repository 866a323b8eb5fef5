use super::*;

fn red() -> Rgba8Premul {
    Rgba8Premul {
        r: 255,
        g: 0,
        b: 0,
        a: 255,
    }
}

fn blue() -> Rgba8Premul {
    Rgba8Premul {
        r: 0,
        g: 0,
        b: 255,
        a: 255,
    }
}

fn horizontal(stops: Vec<GradientStop>) -> PatternSpec {
    PatternSpec::LinearGradient {
        start: Point::new(0.0, 0.0),
        end: Point::new(100.0, 0.0),
        stops,
    }
}

#[test]
fn gradient_validation_rejects_bad_stops() {
    assert!(horizontal(vec![]).validate().is_err());
    let unsorted = vec![
        GradientStop {
            offset: 0.8,
            color: red(),
        },
        GradientStop {
            offset: 0.2,
            color: blue(),
        },
    ];
    assert!(horizontal(unsorted).validate().is_err());
    let out_of_range = vec![GradientStop {
        offset: 1.5,
        color: red(),
    }];
    assert!(horizontal(out_of_range).validate().is_err());
}

#[test]
fn gradient_samples_pad_at_both_ends() {
    let spec = horizontal(vec![
        GradientStop {
            offset: 0.0,
            color: red(),
        },
        GradientStop {
            offset: 1.0,
            color: blue(),
        },
    ]);
    let p = spec.materialize().unwrap();
    assert_eq!(p.sample(-50, 0), red().to_array());
    assert_eq!(p.sample(500, 0), blue().to_array());
    let mid = p.sample(49, 7);
    assert!(mid[0] > 100 && mid[0] < 155, "{mid:?}");
    assert!(mid[2] > 100 && mid[2] < 155, "{mid:?}");
    assert_eq!(mid[3], 255);
}

#[test]
fn degenerate_gradient_paints_last_stop() {
    let spec = PatternSpec::LinearGradient {
        start: Point::new(5.0, 5.0),
        end: Point::new(5.0, 5.0),
        stops: vec![
            GradientStop {
                offset: 0.0,
                color: red(),
            },
            GradientStop {
                offset: 1.0,
                color: blue(),
            },
        ],
    };
    assert_eq!(spec.materialize().unwrap().sample(0, 0), blue().to_array());
}

#[test]
fn texture_repeats_from_origin() {
    let mut img = Image::new(2, 1).unwrap();
    img.data_mut()[..4].copy_from_slice(&red().to_array());
    img.data_mut()[4..].copy_from_slice(&blue().to_array());
    let spec = PatternSpec::Texture {
        image: Arc::new(img),
        origin: Point::new(1.0, 0.0),
    };
    let p = spec.materialize().unwrap();
    assert_eq!(p.sample(1, 0), red().to_array());
    assert_eq!(p.sample(2, 3), blue().to_array());
    assert_eq!(p.sample(0, 0), blue().to_array());
}

#[test]
fn ensure_pattern_materializes_once() {
    let mut src = Source::Pattern {
        spec: Arc::new(horizontal(vec![GradientStop {
            offset: 0.0,
            color: red(),
        }])),
        raster: None,
    };
    let a = src.ensure_pattern().unwrap().unwrap();
    let b = src.ensure_pattern().unwrap().unwrap();
    assert!(Arc::ptr_eq(&a, &b));

    let mut solid = Source::Solid(red());
    assert!(solid.ensure_pattern().unwrap().is_none());
    assert!(solid.is_solid());
}
