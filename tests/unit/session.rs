use super::*;
use crate::input::canvas::{Canvas, MouseState};

fn config() -> SessionConfig {
    SessionConfig::from_reader(
        r#"{
            "canvas": {"width": 101, "height": 101},
            "cursor": {"visible": false, "position": [0.5, 0.5]},
            "context": {"speed": 5}
        }"#
        .as_bytes(),
    )
    .unwrap()
}

#[test]
fn session_applies_cursor_config() {
    let s = LogicSession::new(&config()).unwrap();
    assert_eq!(s.canvas().borrow().mouse_state(), MouseState::Invisible);
    assert_eq!(s.canvas().borrow().last_warp(), Some((50, 50)));
    assert_eq!(s.mouse().position().unwrap(), Point::new(0.5, 0.5));
}

#[test]
fn session_rejects_invalid_config() {
    let mut cfg = config();
    cfg.canvas.height = 0;
    assert!(LogicSession::new(&cfg).is_err());
}

#[test]
fn session_rejects_canvas_wider_than_pixel_coordinates() {
    let mut cfg = config();
    cfg.canvas.width = 3_000_000_000;
    assert!(cfg.validate().is_err());
    assert!(matches!(
        LogicSession::new(&cfg),
        Err(LogicError::Config(_))
    ));
}

#[test]
fn eval_resolves_against_session_context() {
    let s = LogicSession::new(&config()).unwrap();
    assert_eq!(s.eval("speed").unwrap(), Value::Int(5));
    assert!(s.eval("velocity").unwrap_err().is_name_not_found());

    s.set_var("velocity", 2.0);
    assert_eq!(s.eval("speed * velocity").unwrap(), Value::Float(10.0));
}

#[test]
fn parsed_trees_outlive_nothing() {
    let s = LogicSession::new(&config()).unwrap();
    let e = s.parse("speed + 1").unwrap();
    assert_eq!(e.calculate().unwrap(), Value::Int(6));
    drop(s);
    assert!(matches!(
        e.calculate(),
        Err(LogicError::ContextExpired { .. })
    ));
}

#[test]
fn run_frame_reports_then_advances() {
    let s = LogicSession::default();
    let frame = ScriptFrame {
        actions: vec![MouseAction::Press(MouseInput::LeftMouse)],
        query: vec!["active_events".to_owned()],
        eval: vec!["1 + 1".to_owned(), "missing".to_owned()],
    };
    let report = s.run_frame(&frame).unwrap();
    assert_eq!(report.frame, FrameIndex(0));
    let Value::Map(active) = &report.attrs["active_events"] else {
        panic!("expected map");
    };
    assert_eq!(active["LEFTMOUSE"], Value::Int(1));
    assert_eq!(report.exprs["1 + 1"], serde_json::json!(2));
    assert!(report.exprs["missing"]["error"].is_string());

    let report = s.run_frame(&ScriptFrame {
        query: vec!["active_events".to_owned()],
        ..ScriptFrame::default()
    })
    .unwrap();
    assert_eq!(report.frame, FrameIndex(1));
    let Value::Map(active) = &report.attrs["active_events"] else {
        panic!("expected map");
    };
    assert_eq!(active["LEFTMOUSE"], Value::Int(2));
}

#[test]
fn axes_cannot_be_pressed() {
    let s = LogicSession::default();
    assert!(matches!(
        s.apply(&MouseAction::Press(MouseInput::MouseX)),
        Err(LogicError::Type(_))
    ));
}

#[test]
fn script_json_shape() {
    let script = MouseScript::from_reader(
        r#"{"frames": [
            {"actions": [{"press": "LEFTMOUSE"}, {"move": [3, 4]}, {"scroll": "up"},
                         {"show": false}, {"warp": [0.0, 1.0]}],
             "query": ["visible"]}
        ]}"#
        .as_bytes(),
    )
    .unwrap();
    assert_eq!(script.frames.len(), 1);
    assert_eq!(
        script.frames[0].actions,
        vec![
            MouseAction::Press(MouseInput::LeftMouse),
            MouseAction::Move([3, 4]),
            MouseAction::Scroll(ScrollDirection::Up),
            MouseAction::Show(false),
            MouseAction::Warp([0.0, 1.0]),
        ]
    );
    assert!(MouseScript::from_reader(r#"{"frames": [{"clicks": []}]}"#.as_bytes()).is_err());
}
