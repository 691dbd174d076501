//! Recursive-descent parser for embedding expressions.
//!
//! ```text
//! expr    := term (('+' | '-') term)*
//! term    := unary (('*' | '/') unary)*
//! unary   := ('-' | '+') unary | power
//! power   := primary (('^' | '**') unary)?
//! primary := number | ident | ident '(' expr ')' | '(' expr ')'
//! ```
//!
//! Exponents must be integer literals, optionally negated, of magnitude at
//! most [`MAX_EXPONENT`]. Decimal literals become exact rationals. Nesting
//! (parentheses, unary signs, powers, division chains) is capped at
//! [`MAX_NESTING`] levels.

use crate::error::AlgebraError;
use crate::expr::{Expr, Function};
use crate::lower::MAX_EXPONENT;
use num::{BigInt, BigRational, ToPrimitive};

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Number(BigRational),
    Ident(String),
    Plus,
    Minus,
    Star,
    Slash,
    Caret,
    LParen,
    RParen,
    End,
}

pub fn parse(source: &str) -> Result<Expr, AlgebraError> {
    let tokens = tokenize(source)?;
    let mut parser = Parser {
        tokens,
        pos: 0,
        depth: 0,
    };
    let expr = parser.expr()?;
    match parser.peek() {
        Token::End => Ok(expr),
        _ => Err(parser.error("unexpected trailing input")),
    }
}

fn tokenize(source: &str) -> Result<Vec<(Token, usize)>, AlgebraError> {
    let bytes = source.as_bytes();
    let mut tokens = Vec::new();
    let mut i = 0;
    while i < bytes.len() {
        let c = bytes[i];
        let start = i;
        let token = match c {
            b' ' | b'\t' | b'\n' | b'\r' => {
                i += 1;
                continue;
            }
            b'+' => Token::Plus,
            b'-' => Token::Minus,
            b'*' if bytes.get(i + 1) == Some(&b'*') => {
                i += 1;
                Token::Caret
            }
            b'*' => Token::Star,
            b'/' => Token::Slash,
            b'^' => Token::Caret,
            b'(' => Token::LParen,
            b')' => Token::RParen,
            b'0'..=b'9' | b'.' => {
                while i < bytes.len() && (bytes[i].is_ascii_digit() || bytes[i] == b'.') {
                    i += 1;
                }
                tokens.push((Token::Number(number(&source[start..i], start)?), start));
                continue;
            }
            c if c.is_ascii_alphabetic() || c == b'_' => {
                while i < bytes.len() && (bytes[i].is_ascii_alphanumeric() || bytes[i] == b'_') {
                    i += 1;
                }
                tokens.push((Token::Ident(source[start..i].to_string()), start));
                continue;
            }
            _ => {
                let found = source[start..].chars().next().unwrap_or('?');
                return Err(AlgebraError::Parse {
                    position: start,
                    message: format!("unexpected character `{found}`"),
                });
            }
        };
        i += 1;
        tokens.push((token, start));
    }
    tokens.push((Token::End, source.len()));
    Ok(tokens)
}

fn number(text: &str, position: usize) -> Result<BigRational, AlgebraError> {
    let invalid = || AlgebraError::Parse {
        position,
        message: format!("invalid number `{text}`"),
    };
    let (whole, fraction) = text.split_once('.').unwrap_or((text, ""));
    if (whole.is_empty() && fraction.is_empty()) || fraction.contains('.') {
        return Err(invalid());
    }
    let digits = format!("{whole}{fraction}");
    let numer: BigInt = digits.parse().map_err(|_| invalid())?;
    let denom = num::pow(BigInt::from(10), fraction.len());
    Ok(BigRational::new(numer, denom))
}

/// Deepest expression the parser builds.
pub const MAX_NESTING: usize = 256;

struct Parser {
    tokens: Vec<(Token, usize)>,
    pos: usize,
    depth: usize,
}

impl Parser {
    /// The token stream always ends in `End`, which absorbs overruns.
    fn current(&self) -> &(Token, usize) {
        let last = self.tokens.len().saturating_sub(1);
        &self.tokens[self.pos.min(last)]
    }

    fn peek(&self) -> &Token {
        &self.current().0
    }

    fn position(&self) -> usize {
        self.current().1
    }

    fn advance(&mut self) -> Token {
        let token = self.peek().clone();
        self.pos += 1;
        token
    }

    fn error(&self, message: &str) -> AlgebraError {
        AlgebraError::Parse {
            position: self.position(),
            message: message.to_string(),
        }
    }

    fn descend(&mut self) -> Result<(), AlgebraError> {
        self.depth += 1;
        if self.depth > MAX_NESTING {
            return Err(self.error("expression nests too deeply"));
        }
        Ok(())
    }

    fn expect(&mut self, token: Token, message: &str) -> Result<(), AlgebraError> {
        if *self.peek() == token {
            self.pos += 1;
            Ok(())
        } else {
            Err(self.error(message))
        }
    }

    fn expr(&mut self) -> Result<Expr, AlgebraError> {
        let mut lhs = self.term()?;
        loop {
            match self.peek() {
                Token::Plus => {
                    self.pos += 1;
                    lhs = lhs + self.term()?;
                }
                Token::Minus => {
                    self.pos += 1;
                    lhs = lhs - self.term()?;
                }
                _ => return Ok(lhs),
            }
        }
    }

    /// Each `/` nests the quotient one level deeper.
    fn term(&mut self) -> Result<Expr, AlgebraError> {
        let mut lhs = self.unary()?;
        let mut divisions = 0;
        loop {
            match self.peek() {
                Token::Star => {
                    self.pos += 1;
                    lhs = lhs * self.unary()?;
                }
                Token::Slash => {
                    self.pos += 1;
                    self.descend()?;
                    divisions += 1;
                    lhs = lhs / self.unary()?;
                }
                _ => {
                    self.depth -= divisions;
                    return Ok(lhs);
                }
            }
        }
    }

    fn unary(&mut self) -> Result<Expr, AlgebraError> {
        self.descend()?;
        let expr = match self.peek() {
            Token::Minus => {
                self.pos += 1;
                self.unary().map(|inner| -inner)
            }
            Token::Plus => {
                self.pos += 1;
                self.unary()
            }
            _ => self.power(),
        };
        self.depth -= 1;
        expr
    }

    fn power(&mut self) -> Result<Expr, AlgebraError> {
        let base = self.primary()?;
        if *self.peek() != Token::Caret {
            return Ok(base);
        }
        self.pos += 1;
        let position = self.position();
        let exponent = self.unary()?;
        let n = integer_exponent(&exponent).ok_or_else(|| AlgebraError::Parse {
            position,
            message: "exponent must be an integer literal".to_string(),
        })?;
        let n = n
            .to_i32()
            .filter(|n| n.unsigned_abs() <= MAX_EXPONENT.unsigned_abs())
            .ok_or_else(|| AlgebraError::Parse {
                position,
                message: format!("exponent {n} exceeds ±{MAX_EXPONENT}"),
            })?;
        Ok(base.pow(n))
    }

    fn primary(&mut self) -> Result<Expr, AlgebraError> {
        let position = self.position();
        match self.advance() {
            Token::Number(q) => Ok(Expr::Num(q)),
            Token::Ident(name) => {
                if *self.peek() != Token::LParen {
                    return Ok(Expr::sym(name));
                }
                let function = Function::from_name(&name).ok_or_else(|| AlgebraError::Parse {
                    position,
                    message: format!("unknown function `{name}`"),
                })?;
                self.pos += 1;
                let arg = self.expr()?;
                self.expect(Token::RParen, "expected `)` after function argument")?;
                Ok(Expr::apply(function, arg))
            }
            Token::LParen => {
                let inner = self.expr()?;
                self.expect(Token::RParen, "expected `)`")?;
                Ok(inner)
            }
            _ => Err(AlgebraError::Parse {
                position,
                message: "expected a number, symbol or `(`".to_string(),
            }),
        }
    }
}

fn integer_exponent(expr: &Expr) -> Option<BigInt> {
    match expr {
        Expr::Num(q) if q.is_integer() => Some(q.to_integer()),
        Expr::Neg(inner) => integer_exponent(inner).map(|n| -n),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::{cos, sin};
    use num::One;

    #[test]
    fn parses_products_of_functions() {
        let (r, t) = (Expr::sym("r"), Expr::sym("t"));
        assert_eq!(parse("r*cos(t)"), Ok(r.clone() * cos(t.clone())));
        assert_eq!(parse(" r * sin( t ) "), Ok(r * sin(t)));
    }

    #[test]
    fn both_power_spellings() {
        let u = Expr::sym("u");
        assert_eq!(parse("u^2"), Ok(u.clone().pow(2)));
        assert_eq!(parse("u**2"), Ok(u.clone().pow(2)));
        assert_eq!(parse("u^-1"), Ok(u.pow(-1)));
    }

    #[test]
    fn precedence_and_associativity() {
        let e = parse("u^2 - v^2 - 2*u*v/w").expect("parses");
        assert_eq!(e.to_string(), "u^2 - v^2 - 2*u*v/w");
        let e = parse("-(a + b)*c").expect("parses");
        assert_eq!(e, -(Expr::sym("a") + Expr::sym("b")) * Expr::sym("c"));
    }

    #[test]
    fn decimals_are_exact() {
        let e = parse("0.25").expect("parses");
        assert_eq!(e, Expr::Num(BigRational::new(BigInt::one(), BigInt::from(4))));
        assert_eq!(parse("3"), Ok(Expr::int(3)));
        assert!(matches!(parse("1.2.3"), Err(AlgebraError::Parse { position: 0, .. })));
    }

    #[test]
    fn errors_carry_positions() {
        assert_eq!(
            parse("r*"),
            Err(AlgebraError::Parse {
                position: 2,
                message: "expected a number, symbol or `(`".to_string(),
            })
        );
        assert!(matches!(parse("r $ t"), Err(AlgebraError::Parse { position: 2, .. })));
        assert!(matches!(parse("log(t)"), Err(AlgebraError::Parse { position: 0, .. })));
        assert!(matches!(parse("t^s"), Err(AlgebraError::Parse { position: 2, .. })));
        assert!(matches!(parse("sin(t"), Err(AlgebraError::Parse { position: 5, .. })));
        assert!(matches!(parse("(r))"), Err(AlgebraError::Parse { position: 3, .. })));
    }

    #[test]
    fn exponents_are_bounded() {
        assert_eq!(parse("u^1024"), Ok(Expr::sym("u").pow(1024)));
        assert_eq!(
            parse("u^2147483647*u"),
            Err(AlgebraError::Parse {
                position: 2,
                message: "exponent 2147483647 exceeds ±1024".to_string(),
            })
        );
        assert!(matches!(
            parse("u^-99999999999"),
            Err(AlgebraError::Parse { position: 2, .. })
        ));
    }

    #[test]
    fn nesting_is_bounded() {
        let shallow = format!("{}u{}", "(".repeat(100), ")".repeat(100));
        assert_eq!(parse(&shallow), Ok(Expr::sym("u")));

        let too_deep = [
            format!("{}u{}", "(".repeat(200_000), ")".repeat(200_000)),
            format!("{}u", "-".repeat(200_000)),
            format!("u{}", "/u".repeat(200_000)),
            format!("u{}", "^-1".repeat(200_000)),
        ];
        for source in &too_deep {
            match parse(source) {
                Err(AlgebraError::Parse { message, .. }) => {
                    assert_eq!(message, "expression nests too deeply")
                }
                other => panic!("expected a nesting error, got {other:?}"),
            }
        }
    }
}
