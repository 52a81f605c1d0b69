use crate::expression::error::ExprError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Span {
    pub(crate) start: usize,
    pub(crate) end: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Token {
    pub(crate) kind: TokenKind,
    pub(crate) span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum TokenKind {
    Ident(String),
    Int(i64),
    Float(f64),
    Str(String),
    True,
    False,
    Null,

    If,
    Then,
    Else,

    LParen,
    RParen,

    Plus,
    Minus,
    Star,
    Slash,
    Percent,

    Bang,

    EqEq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,

    AndAnd,
    OrOr,

    Question,
    Colon,

    Eof,
}

/// Split expression source into tokens, always terminated by [`TokenKind::Eof`].
pub(crate) fn lex(input: &str) -> Result<Vec<Token>, ExprError> {
    let mut cur = Cursor { input, pos: 0 };
    let mut out = Vec::new();

    loop {
        cur.eat_while(|b| b.is_ascii_whitespace());
        let start = cur.pos;
        let Some(b) = cur.peek() else {
            break;
        };

        let leading_dot = b == b'.' && cur.peek_at(1).is_some_and(|n| n.is_ascii_digit());
        let kind = if b.is_ascii_digit() || leading_dot {
            cur.number()?
        } else if b.is_ascii_alphabetic() || b == b'_' {
            let kind = cur.word();
            if cur.peek() == Some(b'.') {
                return Err(ExprError::new(
                    cur.pos,
                    "member access is not supported; identifiers are single names",
                ));
            }
            kind
        } else if b == b'"' {
            let (text, end) = lex_string(input, start)?;
            cur.pos = end;
            TokenKind::Str(text)
        } else {
            cur.operator()?
        };

        out.push(Token {
            kind,
            span: Span {
                start,
                end: cur.pos,
            },
        });
    }

    out.push(Token {
        kind: TokenKind::Eof,
        span: Span {
            start: input.len(),
            end: input.len(),
        },
    });
    Ok(out)
}

struct Cursor<'a> {
    input: &'a str,
    pos: usize,
}

impl Cursor<'_> {
    fn peek(&self) -> Option<u8> {
        self.peek_at(0)
    }

    fn peek_at(&self, ahead: usize) -> Option<u8> {
        self.input.as_bytes().get(self.pos + ahead).copied()
    }

    fn eat_while(&mut self, pred: impl Fn(u8) -> bool) -> usize {
        let from = self.pos;
        while self.peek().is_some_and(&pred) {
            self.pos += 1;
        }
        self.pos - from
    }

    // digits [. digits] [(e|E) [+|-] digits], or a leading-dot fraction
    fn number(&mut self) -> Result<TokenKind, ExprError> {
        let start = self.pos;
        let mut float = false;

        self.eat_while(|b| b.is_ascii_digit());
        if self.peek() == Some(b'.') && self.peek_at(1).is_some_and(|b| b.is_ascii_digit()) {
            float = true;
            self.pos += 1;
            self.eat_while(|b| b.is_ascii_digit());
        }
        if matches!(self.peek(), Some(b'e' | b'E')) {
            let marker = self.pos;
            float = true;
            self.pos += 1;
            if matches!(self.peek(), Some(b'+' | b'-')) {
                self.pos += 1;
            }
            if self.eat_while(|b| b.is_ascii_digit()) == 0 {
                return Err(ExprError::new(marker, "exponent needs at least one digit"));
            }
        }

        let text = &self.input[start..self.pos];
        if float {
            text.parse()
                .map(TokenKind::Float)
                .map_err(|_| ExprError::new(start, format!("malformed number '{text}'")))
        } else {
            text.parse()
                .map(TokenKind::Int)
                .map_err(|_| ExprError::new(start, "integer literal out of range"))
        }
    }

    fn word(&mut self) -> TokenKind {
        let start = self.pos;
        self.eat_while(|b| b.is_ascii_alphanumeric() || b == b'_');
        match &self.input[start..self.pos] {
            "true" => TokenKind::True,
            "false" => TokenKind::False,
            "null" => TokenKind::Null,
            "if" => TokenKind::If,
            "then" => TokenKind::Then,
            "else" => TokenKind::Else,
            name => TokenKind::Ident(name.to_owned()),
        }
    }

    fn operator(&mut self) -> Result<TokenKind, ExprError> {
        const PAIRS: [(&[u8; 2], TokenKind); 6] = [
            (b"&&", TokenKind::AndAnd),
            (b"||", TokenKind::OrOr),
            (b"==", TokenKind::EqEq),
            (b"!=", TokenKind::Ne),
            (b"<=", TokenKind::Le),
            (b">=", TokenKind::Ge),
        ];

        let rest = &self.input.as_bytes()[self.pos..];
        for (pat, kind) in PAIRS {
            if rest.starts_with(pat) {
                self.pos += 2;
                return Ok(kind);
            }
        }

        let kind = match rest.first().copied() {
            Some(b'(') => TokenKind::LParen,
            Some(b')') => TokenKind::RParen,
            Some(b'+') => TokenKind::Plus,
            Some(b'-') => TokenKind::Minus,
            Some(b'*') => TokenKind::Star,
            Some(b'/') => TokenKind::Slash,
            Some(b'%') => TokenKind::Percent,
            Some(b'!') => TokenKind::Bang,
            Some(b'<') => TokenKind::Lt,
            Some(b'>') => TokenKind::Gt,
            Some(b'?') => TokenKind::Question,
            Some(b':') => TokenKind::Colon,
            _ => {
                let ch = self.input[self.pos..].chars().next().unwrap_or('?');
                return Err(ExprError::new(
                    self.pos,
                    format!("unexpected character '{ch}'"),
                ));
            }
        };
        self.pos += 1;
        Ok(kind)
    }
}

/// Lex a double-quoted string starting at `start`. Returns the unescaped text and the end offset.
fn lex_string(input: &str, start: usize) -> Result<(String, usize), ExprError> {
    let mut out = String::new();
    let mut chars = input[start + 1..].char_indices();
    while let Some((off, ch)) = chars.next() {
        let pos = start + 1 + off;
        match ch {
            '"' => return Ok((out, pos + 1)),
            '\\' => match chars.next() {
                Some((_, '"')) => out.push('"'),
                Some((_, '\\')) => out.push('\\'),
                Some((_, 'n')) => out.push('\n'),
                Some((_, 't')) => out.push('\t'),
                Some((_, other)) => {
                    return Err(ExprError::new(pos, format!("unknown escape '\\{other}'")));
                }
                None => break,
            },
            _ => out.push(ch),
        }
    }
    Err(ExprError::new(start, "unterminated string literal"))
}

#[cfg(test)]
#[path = "../../tests/unit/expression/lexer.rs"]
mod tests;
