use super::*;

#[test]
fn defaults_are_valid() {
    let o = EngineOpts::default();
    assert_eq!(o.mode, ExecutionMode::Direct);
    assert_eq!(o.queue_capacity, 4);
    assert_eq!(o.batch_size, 64);
    o.validate().unwrap();
}

#[test]
fn partial_json_keeps_defaults() {
    let o = EngineOpts::from_json_str(r#"{"mode":"deferred","threads":3}"#).unwrap();
    assert_eq!(o.mode, ExecutionMode::Deferred);
    assert_eq!(o.threads, Some(3));
    assert_eq!(o.batch_size, 64);
    assert_eq!(o.resolved_threads(), 3);
}

#[test]
fn unknown_field_is_rejected() {
    let err = EngineOpts::from_json_str(r#"{"workers":2}"#).unwrap_err();
    assert!(matches!(err, PaintError::InvalidArgument(_)));
}

#[test]
fn missing_file_is_invalid_argument() {
    let err = EngineOpts::from_path("/definitely/not/here.json").unwrap_err();
    assert!(err.to_string().contains("open engine options"));
}

#[test]
fn env_overrides_threads_and_mode() {
    let o = EngineOpts::default()
        .apply_env(|k| match k {
            ENV_THREADS => Some(" 6 ".to_owned()),
            ENV_MODE => Some("MT".to_owned()),
            _ => None,
        })
        .unwrap();
    assert_eq!(o.threads, Some(6));
    assert_eq!(o.mode, ExecutionMode::Deferred);
}

#[test]
fn env_rejects_garbage() {
    let bad_threads = EngineOpts::default().apply_env(|k| (k == ENV_THREADS).then(|| "lots".into()));
    assert!(bad_threads.is_err());
    let bad_mode = EngineOpts::default().apply_env(|k| (k == ENV_MODE).then(|| "gpu".into()));
    assert!(bad_mode.is_err());
}

#[test]
fn validate_rejects_zero_knobs() {
    let cases = [
        EngineOpts {
            threads: Some(0),
            ..EngineOpts::default()
        },
        EngineOpts {
            queue_capacity: 0,
            ..EngineOpts::default()
        },
        EngineOpts {
            batch_size: 0,
            ..EngineOpts::default()
        },
        EngineOpts {
            arena: ArenaLimits {
                max_commands: 0,
                ..ArenaLimits::default()
            },
            ..EngineOpts::default()
        },
    ];
    for o in cases {
        assert!(o.validate().is_err(), "{o:?}");
    }
}
