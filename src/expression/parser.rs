use crate::expression::ast::{BinaryOp, Expr, UnaryOp};
use crate::expression::error::ExprError;
use crate::expression::lexer::{Token, TokenKind, lex};
use crate::value::{ContextHandle, Value};

/// Deepest tree, and deepest bracket or prefix nesting, the parser accepts.
pub(crate) const MAX_DEPTH: usize = 256;

/// Parse expression source into a tree whose identifiers all resolve against `context`.
///
/// A leading `=` is accepted and ignored. Error offsets index into `src` as given.
#[tracing::instrument(level = "debug", skip(context))]
pub fn parse_expr(src: &str, context: &ContextHandle) -> Result<Expr, ExprError> {
    let lead = src.len() - src.trim_start().len();
    let body = src.trim();
    let (body, base) = match body.strip_prefix('=') {
        Some(rest) => (rest, lead + 1),
        None => (body, lead),
    };
    parse_body(body, context).map_err(|e| e.shifted(base))
}

fn parse_body(src: &str, context: &ContextHandle) -> Result<Expr, ExprError> {
    let tokens = lex(src)?;
    let mut p = Parser {
        tokens,
        pos: 0,
        nesting: 0,
        context,
    };
    let (expr, _) = p.conditional()?;
    p.require(TokenKind::Eof, "end of input")?;
    Ok(expr)
}

struct Parser<'a> {
    tokens: Vec<Token>,
    pos: usize,
    nesting: usize,
    context: &'a ContextHandle,
}

/// A parsed subtree and its height.
type Parsed = (Expr, usize);

/// Binding strength of each infix operator; all of them associate to the left.
fn infix(kind: &TokenKind) -> Option<(BinaryOp, u8)> {
    let entry = match kind {
        TokenKind::OrOr => (BinaryOp::Or, 1),
        TokenKind::AndAnd => (BinaryOp::And, 2),
        TokenKind::EqEq => (BinaryOp::Eq, 3),
        TokenKind::Ne => (BinaryOp::Ne, 3),
        TokenKind::Lt => (BinaryOp::Lt, 4),
        TokenKind::Le => (BinaryOp::Le, 4),
        TokenKind::Gt => (BinaryOp::Gt, 4),
        TokenKind::Ge => (BinaryOp::Ge, 4),
        TokenKind::Plus => (BinaryOp::Add, 5),
        TokenKind::Minus => (BinaryOp::Sub, 5),
        TokenKind::Star => (BinaryOp::Mul, 6),
        TokenKind::Slash => (BinaryOp::Div, 6),
        TokenKind::Percent => (BinaryOp::Mod, 6),
        _ => return None,
    };
    Some(entry)
}

impl Parser<'_> {
    fn peek(&self) -> &TokenKind {
        &self.tokens[self.pos].kind
    }

    fn offset(&self) -> usize {
        self.tokens[self.pos].span.start
    }

    // Stays on the trailing `Eof`.
    fn advance(&mut self) -> Token {
        let t = self.tokens[self.pos].clone();
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
        t
    }

    fn eat(&mut self, kind: &TokenKind) -> bool {
        let hit = self.peek() == kind;
        if hit {
            self.advance();
        }
        hit
    }

    fn require(&mut self, kind: TokenKind, what: &str) -> Result<(), ExprError> {
        if self.eat(&kind) {
            return Ok(());
        }
        Err(ExprError::new(
            self.offset(),
            format!("expected {what}, found {:?}", self.peek()),
        ))
    }

    /// Run `f` one recursion level deeper, refusing to go past [`MAX_DEPTH`].
    fn nested<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<T, ExprError>,
    ) -> Result<T, ExprError> {
        if self.nesting >= MAX_DEPTH {
            return Err(ExprError::new(self.offset(), "expression nested too deeply"));
        }
        self.nesting += 1;
        let res = f(self);
        self.nesting -= 1;
        res
    }

    /// Wrap `expr` as a node one level above its tallest child.
    fn node(expr: Expr, child_height: usize, at: usize) -> Result<Parsed, ExprError> {
        let height = child_height + 1;
        if height > MAX_DEPTH {
            return Err(ExprError::new(at, "expression nested too deeply"));
        }
        Ok((expr, height))
    }

    // `if c then a else b` and `c ? a : b` bind loosest and nest to the right.
    fn conditional(&mut self) -> Result<Parsed, ExprError> {
        self.nested(|p| {
            let at = p.offset();
            if p.eat(&TokenKind::If) {
                let (cond, hc) = p.conditional()?;
                p.require(TokenKind::Then, "'then'")?;
                let (then, ht) = p.conditional()?;
                p.require(TokenKind::Else, "'else'")?;
                let (otherwise, ho) = p.conditional()?;
                return Self::node(Expr::if_else(cond, then, otherwise), hc.max(ht).max(ho), at);
            }

            let (cond, hc) = p.infix_chain(1)?;
            if !p.eat(&TokenKind::Question) {
                return Ok((cond, hc));
            }
            let (then, ht) = p.conditional()?;
            p.require(TokenKind::Colon, "':'")?;
            let (otherwise, ho) = p.conditional()?;
            Self::node(Expr::if_else(cond, then, otherwise), hc.max(ht).max(ho), at)
        })
    }

    fn infix_chain(&mut self, min_strength: u8) -> Result<Parsed, ExprError> {
        let (mut lhs, mut height) = self.prefix()?;
        while let Some((op, strength)) = infix(self.peek()) {
            if strength < min_strength {
                break;
            }
            let at = self.offset();
            self.advance();
            let (rhs, hr) = self.infix_chain(strength + 1)?;
            (lhs, height) = Self::node(Expr::binary(op, lhs, rhs), height.max(hr), at)?;
        }
        Ok((lhs, height))
    }

    fn prefix(&mut self) -> Result<Parsed, ExprError> {
        let op = match self.peek() {
            TokenKind::Minus => UnaryOp::Neg,
            TokenKind::Bang => UnaryOp::Not,
            _ => return self.atom(),
        };
        let at = self.offset();
        self.nested(|p| {
            p.advance();
            let (operand, h) = p.prefix()?;
            Self::node(Expr::unary(op, operand), h, at)
        })
    }

    fn atom(&mut self) -> Result<Parsed, ExprError> {
        let Token { kind, span } = self.advance();
        let value = match kind {
            TokenKind::Int(v) => Value::Int(v),
            TokenKind::Float(v) => Value::Float(v),
            TokenKind::Str(s) => Value::Str(s),
            TokenKind::True => Value::Bool(true),
            TokenKind::False => Value::Bool(false),
            TokenKind::Null => Value::Null,
            TokenKind::Ident(name) => {
                if *self.peek() == TokenKind::LParen {
                    return Err(ExprError::new(
                        self.offset(),
                        format!("'{name}' is not callable"),
                    ));
                }
                return Ok((Expr::identifier(name, self.context.clone()), 1));
            }
            TokenKind::LParen => {
                let inner = self.conditional()?;
                self.require(TokenKind::RParen, "')'")?;
                return Ok(inner);
            }
            other => {
                return Err(ExprError::new(
                    span.start,
                    format!("unexpected {other:?}"),
                ));
            }
        };
        Ok((Expr::Const(value), 1))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/expression/parser.rs"]
mod tests;
