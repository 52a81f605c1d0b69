use std::fmt;

use crate::value::{ContextHandle, Value};

/// One node of an expression tree.
///
/// The set of node kinds is closed; evaluation and dispatch match on it exhaustively.
#[derive(Debug, Clone)]
pub enum Expr {
    Const(Value),
    Identifier(IdentifierExpr),
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    If {
        cond: Box<Expr>,
        then: Box<Expr>,
        otherwise: Box<Expr>,
    },
}

/// Stable per-variant tag, for hosts that serialize or dispatch on node kind.
///
/// Discriminants never change once assigned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum ExpressionId {
    Const = 1,
    Unary = 2,
    Binary = 3,
    If = 4,
    Identifier = 5,
}

impl ExpressionId {
    pub fn tag(self) -> u8 {
        self as u8
    }

    pub fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            1 => Some(Self::Const),
            2 => Some(Self::Unary),
            3 => Some(Self::Binary),
            4 => Some(Self::If),
            5 => Some(Self::Identifier),
            _ => None,
        }
    }
}

/// A name resolved against a context on every evaluation.
///
/// The node does not own the context; see [`ContextHandle`].
#[derive(Debug, Clone)]
pub struct IdentifierExpr {
    identifier: String,
    context: ContextHandle,
}

impl IdentifierExpr {
    pub fn new(identifier: impl Into<String>, context: ContextHandle) -> Self {
        Self {
            identifier: identifier.into(),
            context,
        }
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn context(&self) -> &ContextHandle {
        &self.context
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Neg,
    Not,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    And,
    Or,
}

impl BinaryOp {
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Mod => "%",
            Self::Eq => "==",
            Self::Ne => "!=",
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Gt => ">",
            Self::Ge => ">=",
            Self::And => "&&",
            Self::Or => "||",
        }
    }
}

impl Expr {
    pub fn constant(v: impl Into<Value>) -> Self {
        Self::Const(v.into())
    }

    pub fn identifier(name: impl Into<String>, context: ContextHandle) -> Self {
        Self::Identifier(IdentifierExpr::new(name, context))
    }

    pub fn unary(op: UnaryOp, operand: Expr) -> Self {
        Self::Unary {
            op,
            operand: Box::new(operand),
        }
    }

    pub fn binary(op: BinaryOp, left: Expr, right: Expr) -> Self {
        Self::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn if_else(cond: Expr, then: Expr, otherwise: Expr) -> Self {
        Self::If {
            cond: Box::new(cond),
            then: Box::new(then),
            otherwise: Box::new(otherwise),
        }
    }

    pub fn expression_id(&self) -> ExpressionId {
        match self {
            Self::Const(_) => ExpressionId::Const,
            Self::Identifier(_) => ExpressionId::Identifier,
            Self::Unary { .. } => ExpressionId::Unary,
            Self::Binary { .. } => ExpressionId::Binary,
            Self::If { .. } => ExpressionId::If,
        }
    }

    /// Identifier names referenced anywhere in the tree, in first-use order, without duplicates.
    pub fn identifiers(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.collect_identifiers(&mut out);
        out
    }

    fn collect_identifiers<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            Self::Const(_) => {}
            Self::Identifier(id) => {
                if !out.contains(&id.identifier()) {
                    out.push(id.identifier());
                }
            }
            Self::Unary { operand, .. } => operand.collect_identifiers(out),
            Self::Binary { left, right, .. } => {
                left.collect_identifiers(out);
                right.collect_identifiers(out);
            }
            Self::If {
                cond,
                then,
                otherwise,
            } => {
                cond.collect_identifiers(out);
                then.collect_identifiers(out);
                otherwise.collect_identifiers(out);
            }
        }
    }
}

// Fully parenthesized. Trees the parser produces print back to source that reparses to the same
// tree; negative, non-finite, list and map constants have no literal form and print readably.
impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Const(Value::Str(s)) => write_str_literal(f, s),
            Self::Const(v) if v.as_f64().is_some_and(|x| x < 0.0) => write!(f, "({v})"),
            Self::Const(v) => write!(f, "{v}"),
            Self::Identifier(id) => f.write_str(id.identifier()),
            Self::Unary { op, operand } => match op {
                UnaryOp::Neg => write!(f, "(-{operand})"),
                UnaryOp::Not => write!(f, "(!{operand})"),
            },
            Self::Binary { op, left, right } => write!(f, "({left} {} {right})", op.symbol()),
            Self::If {
                cond,
                then,
                otherwise,
            } => write!(f, "(if {cond} then {then} else {otherwise})"),
        }
    }
}

/// Quote `s` using only the escapes the expression lexer understands.
fn write_str_literal(f: &mut fmt::Formatter<'_>, s: &str) -> fmt::Result {
    f.write_str("\"")?;
    for ch in s.chars() {
        match ch {
            '"' => f.write_str("\\\"")?,
            '\\' => f.write_str("\\\\")?,
            '\n' => f.write_str("\\n")?,
            '\t' => f.write_str("\\t")?,
            other => write!(f, "{other}")?,
        }
    }
    f.write_str("\"")
}
