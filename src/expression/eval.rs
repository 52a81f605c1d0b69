use std::cmp::Ordering;

use crate::expression::ast::{BinaryOp, Expr, IdentifierExpr, UnaryOp};
use crate::foundation::error::{LogicError, LogicResult};
use crate::value::Value;

impl Expr {
    /// Produce this node's value.
    ///
    /// Reads contexts but never writes them. The first failing child aborts the whole calculation;
    /// branches skipped by `&&`, `||` and `if` are not evaluated and cannot fail it.
    pub fn calculate(&self) -> LogicResult<Value> {
        match self {
            Self::Const(v) => Ok(v.clone()),
            Self::Identifier(id) => id.calculate(),
            Self::Unary { op, operand } => unary(*op, operand.calculate()?),
            Self::Binary {
                op: BinaryOp::And,
                left,
                right,
            } => {
                if !expect_bool(left.calculate()?, "&&")? {
                    return Ok(Value::Bool(false));
                }
                Ok(Value::Bool(expect_bool(right.calculate()?, "&&")?))
            }
            Self::Binary {
                op: BinaryOp::Or,
                left,
                right,
            } => {
                if expect_bool(left.calculate()?, "||")? {
                    return Ok(Value::Bool(true));
                }
                Ok(Value::Bool(expect_bool(right.calculate()?, "||")?))
            }
            Self::Binary { op, left, right } => binary(*op, left.calculate()?, right.calculate()?),
            Self::If {
                cond,
                then,
                otherwise,
            } => {
                if expect_bool(cond.calculate()?, "if")? {
                    then.calculate()
                } else {
                    otherwise.calculate()
                }
            }
        }
    }

    /// Calculate the tree rooted here, logging the outcome.
    #[tracing::instrument(level = "debug", skip(self), fields(root = ?self.expression_id()))]
    pub fn evaluate(&self) -> LogicResult<Value> {
        let res = self.calculate();
        match &res {
            Ok(v) => tracing::debug!(kind = v.kind(), "expression evaluated"),
            Err(e) => tracing::debug!(error = %e, "expression failed"),
        }
        res
    }
}

impl IdentifierExpr {
    /// Resolve the identifier in its context. Looked up afresh on every call.
    pub fn calculate(&self) -> LogicResult<Value> {
        match self.context().lookup(self.identifier()) {
            Some(Some(v)) => Ok(v),
            Some(None) => {
                tracing::trace!(identifier = self.identifier(), "identifier not bound");
                Err(LogicError::name_not_found(self.identifier()))
            }
            None => Err(LogicError::context_expired(self.identifier())),
        }
    }
}

fn expect_bool(v: Value, op: &str) -> LogicResult<bool> {
    v.as_bool()
        .ok_or_else(|| LogicError::type_error(format!("'{op}' expects bool, got {}", v.kind())))
}

fn unary(op: UnaryOp, v: Value) -> LogicResult<Value> {
    match (op, v) {
        (UnaryOp::Neg, Value::Int(i)) => i
            .checked_neg()
            .map(Value::Int)
            .ok_or_else(|| LogicError::type_error("integer overflow in negation")),
        (UnaryOp::Neg, Value::Float(x)) => Ok(Value::Float(-x)),
        (UnaryOp::Not, Value::Bool(b)) => Ok(Value::Bool(!b)),
        (UnaryOp::Neg, other) => Err(LogicError::type_error(format!(
            "'-' expects a number, got {}",
            other.kind()
        ))),
        (UnaryOp::Not, other) => Err(LogicError::type_error(format!(
            "'!' expects bool, got {}",
            other.kind()
        ))),
    }
}

fn binary(op: BinaryOp, a: Value, b: Value) -> LogicResult<Value> {
    match op {
        BinaryOp::Add | BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div | BinaryOp::Mod => {
            arithmetic(op, a, b)
        }
        BinaryOp::Eq => Ok(Value::Bool(loose_eq(&a, &b))),
        BinaryOp::Ne => Ok(Value::Bool(!loose_eq(&a, &b))),
        BinaryOp::Lt | BinaryOp::Le | BinaryOp::Gt | BinaryOp::Ge => {
            let ord = compare(op, &a, &b)?;
            Ok(Value::Bool(match op {
                BinaryOp::Lt => ord == Some(Ordering::Less),
                BinaryOp::Le => matches!(ord, Some(Ordering::Less | Ordering::Equal)),
                BinaryOp::Gt => ord == Some(Ordering::Greater),
                _ => matches!(ord, Some(Ordering::Greater | Ordering::Equal)),
            }))
        }
        // Short-circuited in `calculate`; reached only for already-evaluated operands.
        BinaryOp::And => Ok(Value::Bool(
            expect_bool(a, "&&")? && expect_bool(b, "&&")?,
        )),
        BinaryOp::Or => Ok(Value::Bool(
            expect_bool(a, "||")? || expect_bool(b, "||")?,
        )),
    }
}

fn arithmetic(op: BinaryOp, a: Value, b: Value) -> LogicResult<Value> {
    match (a, b) {
        (Value::Int(x), Value::Int(y)) => int_arithmetic(op, x, y),
        (Value::Str(x), Value::Str(y)) if op == BinaryOp::Add => Ok(Value::Str(x + &y)),
        (a, b) => {
            let (Some(x), Some(y)) = (a.as_f64(), b.as_f64()) else {
                return Err(LogicError::type_error(format!(
                    "'{}' not defined for {} and {}",
                    op.symbol(),
                    a.kind(),
                    b.kind()
                )));
            };
            Ok(Value::Float(match op {
                BinaryOp::Add => x + y,
                BinaryOp::Sub => x - y,
                BinaryOp::Mul => x * y,
                BinaryOp::Div => x / y,
                _ => x % y,
            }))
        }
    }
}

fn int_arithmetic(op: BinaryOp, x: i64, y: i64) -> LogicResult<Value> {
    let overflow = || LogicError::type_error(format!("integer overflow in '{}'", op.symbol()));
    match op {
        BinaryOp::Add => x.checked_add(y).map(Value::Int).ok_or_else(overflow),
        BinaryOp::Sub => x.checked_sub(y).map(Value::Int).ok_or_else(overflow),
        BinaryOp::Mul => x.checked_mul(y).map(Value::Int).ok_or_else(overflow),
        BinaryOp::Div => {
            if y == 0 {
                return Err(LogicError::type_error("integer division by zero"));
            }
            match x.checked_rem(y) {
                Some(0) => x.checked_div(y).map(Value::Int).ok_or_else(overflow),
                Some(_) => Ok(Value::Float(x as f64 / y as f64)),
                None => Err(overflow()),
            }
        }
        _ => {
            if y == 0 {
                return Err(LogicError::type_error("integer modulo by zero"));
            }
            x.checked_rem(y).map(Value::Int).ok_or_else(overflow)
        }
    }
}

/// Equality where `Int` and `Float` compare by numeric value.
fn loose_eq(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Int(_) | Value::Float(_), Value::Int(_) | Value::Float(_)) => {
            a.as_f64() == b.as_f64()
        }
        _ => a == b,
    }
}

/// `None` for unordered numbers (NaN); strings order lexicographically.
fn compare(op: BinaryOp, a: &Value, b: &Value) -> LogicResult<Option<Ordering>> {
    match (a, b) {
        (Value::Int(x), Value::Int(y)) => Ok(Some(x.cmp(y))),
        (Value::Str(x), Value::Str(y)) => Ok(Some(x.cmp(y))),
        _ => match (a.as_f64(), b.as_f64()) {
            (Some(x), Some(y)) => Ok(x.partial_cmp(&y)),
            _ => Err(LogicError::type_error(format!(
                "'{}' cannot order {} and {}",
                op.symbol(),
                a.kind(),
                b.kind()
            ))),
        },
    }
}

#[cfg(test)]
#[path = "../../tests/unit/expression/eval.rs"]
mod tests;
