use super::*;
use crate::expression::ast::ExpressionId;
use crate::value::Scope;

fn scope() -> crate::value::SharedScope {
    let mut s = Scope::new();
    s.set("speed", 5_i64);
    s.set("boost", 2_i64);
    s.set("grounded", false);
    s.shared()
}

fn eval(src: &str, shared: &crate::value::SharedScope) -> Value {
    parse_expr(src, &ContextHandle::new(shared))
        .unwrap()
        .calculate()
        .unwrap()
}

#[test]
fn parses_arithmetic_precedence() {
    let ctx = ContextHandle::detached();
    let e = parse_expr("=1+2*3", &ctx).unwrap();
    match e {
        Expr::Binary {
            op: BinaryOp::Add, ..
        } => {}
        other => panic!("unexpected ast: {other:?}"),
    }
    assert_eq!(e.calculate().unwrap(), Value::Int(7));
}

#[test]
fn identifiers_bind_to_the_given_context() {
    let shared = scope();
    let ctx = ContextHandle::new(&shared);
    let e = parse_expr("speed", &ctx).unwrap();
    assert_eq!(e.expression_id(), ExpressionId::Identifier);
    let Expr::Identifier(id) = &e else {
        panic!("expected identifier");
    };
    assert_eq!(id.identifier(), "speed");
    assert!(id.context().same_context(&ctx));
    assert_eq!(e.calculate().unwrap(), Value::Int(5));
}

#[test]
fn evaluates_mixed_expressions() {
    let shared = scope();
    assert_eq!(eval("speed * boost - 1", &shared), Value::Int(9));
    assert_eq!(eval("-(speed + 1) % 4", &shared), Value::Int(-2));
    assert_eq!(eval("speed > 3 && !grounded", &shared), Value::Bool(true));
    assert_eq!(eval("\"v=\" + \"fast\"", &shared), Value::from("v=fast"));
    assert_eq!(eval("null == null", &shared), Value::Bool(true));
}

#[test]
fn conditionals_nest_to_the_right() {
    let shared = scope();
    assert_eq!(
        eval("grounded ? 0 : speed > 4 ? 1 : 2", &shared),
        Value::Int(1)
    );
    assert_eq!(
        eval("if grounded then 0 else if speed == 5 then 10 else 20", &shared),
        Value::Int(10)
    );
    let e = parse_expr("if true then 1 else 2", &ContextHandle::detached()).unwrap();
    assert_eq!(e.expression_id(), ExpressionId::If);
}

#[test]
fn identifiers_are_collected_once() {
    let e = parse_expr("a + b * a - c", &ContextHandle::detached()).unwrap();
    assert_eq!(e.identifiers(), vec!["a", "b", "c"]);
}

#[test]
fn display_reparses_to_same_value() {
    let shared = scope();
    let ctx = ContextHandle::new(&shared);
    let e = parse_expr("speed * (boost + 1.5) >= 10 || grounded", &ctx).unwrap();
    let printed = e.to_string();
    let again = parse_expr(&printed, &ctx).unwrap();
    assert_eq!(printed, again.to_string());
    assert_eq!(e.calculate().unwrap(), again.calculate().unwrap());
}

#[test]
fn rejects_trailing_tokens_and_calls() {
    let ctx = ContextHandle::detached();
    assert!(parse_expr("1 2", &ctx).is_err());
    assert!(parse_expr("min(1)", &ctx).is_err());
    assert!(parse_expr("(1 + 2", &ctx).is_err());
    assert!(parse_expr("", &ctx).is_err());
    assert!(parse_expr("a ? b", &ctx).is_err());
}

#[test]
fn error_offsets_point_at_the_problem() {
    let ctx = ContextHandle::detached();
    let err = parse_expr("1 + * 2", &ctx).unwrap_err();
    assert_eq!(err.offset, 4);
}

#[test]
fn error_offsets_index_the_original_source() {
    let ctx = ContextHandle::detached();
    assert_eq!(parse_expr("  = 1 + * 2", &ctx).unwrap_err().offset, 8);
    assert_eq!(parse_expr("  1 + * 2", &ctx).unwrap_err().offset, 6);
    assert_eq!(parse_expr("= 1 +", &ctx).unwrap_err().offset, 5);
    assert_eq!(parse_expr(" x.y", &ctx).unwrap_err().offset, 2);
}

#[test]
fn deep_bracket_nesting_is_an_error() {
    let ctx = ContextHandle::detached();
    let ok = format!("{}1{}", "(".repeat(100), ")".repeat(100));
    assert_eq!(parse_expr(&ok, &ctx).unwrap().calculate().unwrap(), Value::Int(1));

    let n = 200_000;
    let deep = format!("{}1{}", "(".repeat(n), ")".repeat(n));
    let err = parse_expr(&deep, &ctx).unwrap_err();
    assert!(err.message.contains("nested too deeply"));
    assert!(err.offset <= MAX_DEPTH);
}

#[test]
fn long_prefix_runs_are_an_error() {
    let ctx = ContextHandle::detached();
    let ok = format!("{}true", "!".repeat(100));
    assert_eq!(parse_expr(&ok, &ctx).unwrap().calculate().unwrap(), Value::Bool(true));

    let deep = format!("{}1", "-".repeat(200_000));
    let err = parse_expr(&deep, &ctx).unwrap_err();
    assert!(err.message.contains("nested too deeply"));
}

#[test]
fn long_operator_chains_are_an_error() {
    let ctx = ContextHandle::detached();
    let ok = format!("0{}", " + 1".repeat(200));
    assert_eq!(parse_expr(&ok, &ctx).unwrap().calculate().unwrap(), Value::Int(200));

    let deep = format!("0{}", " + 1".repeat(200_000));
    let err = parse_expr(&deep, &ctx).unwrap_err();
    assert!(err.message.contains("nested too deeply"));
}

#[test]
fn string_constants_print_as_lexable_literals() {
    let ctx = ContextHandle::detached();
    for text in ["tab\there", "quote\" and \\slash", "cr\r nul\0 é", "line\nbreak"] {
        let e = Expr::constant(text);
        let again = parse_expr(&e.to_string(), &ctx).unwrap();
        assert_eq!(again.calculate().unwrap(), Value::from(text));
    }
}

#[test]
fn negative_constants_print_bracketed() {
    let e = Expr::binary(BinaryOp::Sub, Expr::constant(3_i64), Expr::constant(-5_i64));
    assert_eq!(e.to_string(), "(3 - (-5))");
    let again = parse_expr(&e.to_string(), &ContextHandle::detached()).unwrap();
    assert_eq!(again.calculate().unwrap(), Value::Int(8));
}
