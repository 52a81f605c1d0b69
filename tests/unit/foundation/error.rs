use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        LogicError::name_not_found("speed")
            .to_string()
            .contains("name not found: \"speed\"")
    );
    assert!(
        LogicError::context_expired("speed")
            .to_string()
            .contains("no longer alive")
    );
    assert!(
        LogicError::device_unavailable("mouse")
            .to_string()
            .contains("device unavailable:")
    );
    assert!(LogicError::type_error("x").to_string().contains("type error:"));
    assert!(LogicError::config("x").to_string().contains("config error:"));
    assert!(
        LogicError::ReadOnly("events".to_owned())
            .to_string()
            .contains("read-only")
    );
}

#[test]
fn parse_errors_convert() {
    let err: LogicError = ExprError::new(3, "unexpected token").into();
    assert!(matches!(err, LogicError::Parse(_)));
    assert!(err.to_string().contains("at byte 3"));
}

#[test]
fn only_missing_names_report_name_not_found() {
    assert!(LogicError::name_not_found("a").is_name_not_found());
    assert!(!LogicError::context_expired("a").is_name_not_found());
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = LogicError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
