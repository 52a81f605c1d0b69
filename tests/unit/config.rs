use super::*;

#[test]
fn empty_document_uses_defaults() {
    let cfg = SessionConfig::from_reader("{}".as_bytes()).unwrap();
    assert_eq!(cfg, SessionConfig::default());
    assert_eq!(cfg.canvas, CanvasSize::default());
    assert!(cfg.cursor.visible);
    cfg.validate().unwrap();
}

#[test]
fn parses_full_document() {
    let cfg = SessionConfig::from_reader(
        r#"{
            "canvas": {"width": 800, "height": 600},
            "cursor": {"visible": false, "position": [0.5, 0.5]},
            "context": {"speed": 5, "label": "hero"}
        }"#
        .as_bytes(),
    )
    .unwrap();
    cfg.validate().unwrap();
    assert_eq!(cfg.canvas.width, 800);
    assert_eq!(cfg.cursor_position(), Some(Point::new(0.5, 0.5)));
    let scope = cfg.build_scope();
    assert_eq!(scope.get("speed"), Some(&crate::value::Value::Int(5)));
    assert_eq!(scope.len(), 2);
}

#[test]
fn unknown_fields_are_rejected() {
    let err = SessionConfig::from_reader(r#"{"canvass": {}}"#.as_bytes()).unwrap_err();
    assert!(matches!(err, LogicError::Config(_)));
}

#[test]
fn validation_catches_bad_values() {
    let mut cfg = SessionConfig::default();
    cfg.canvas.width = 0;
    assert!(cfg.validate().is_err());

    let mut cfg = SessionConfig::default();
    cfg.cursor.position = Some([1.5, 0.0]);
    assert!(cfg.validate().is_err());

    let mut cfg = SessionConfig::default();
    cfg.context.insert("two words".to_owned(), serde_json::json!(1));
    assert!(cfg.validate().is_err());

    let mut cfg = SessionConfig::default();
    cfg.context.insert("if".to_owned(), serde_json::json!(1));
    assert!(cfg.validate().is_err());
}

#[test]
fn identifier_rule() {
    assert!(is_identifier("speed"));
    assert!(is_identifier("_x1"));
    assert!(!is_identifier("1x"));
    assert!(!is_identifier(""));
    assert!(!is_identifier("a.b"));
}

#[test]
fn missing_file_is_a_config_error() {
    let err = SessionConfig::from_path("does/not/exist.json").unwrap_err();
    assert!(err.to_string().contains("config error"));
}
