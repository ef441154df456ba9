//! Eevo reader / parser.
//!
//! Supports: integers, decimals, strings (with escapes), symbols, lists,
//! quote ('), and line comments (;).

use super::expr::{Expr, ParseError};

/// Deepest list/quote nesting the reader accepts.
pub const MAX_NESTING: usize = 1000;

pub fn parse_forms(input: &str) -> Result<Vec<Expr>, ParseError> {
    let mut parser = Parser::new(input);
    let mut forms = Vec::new();
    while parser.skip_ws_and_comments() {
        forms.push(parser.parse_expr()?);
    }
    Ok(forms)
}

struct Parser<'a> {
    input: &'a str,
    pos: usize,
    depth: usize,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            depth: 0,
        }
    }

    /// Returns false at end of input.
    fn skip_ws_and_comments(&mut self) -> bool {
        loop {
            let Some(ch) = self.current() else {
                return false;
            };
            if ch.is_whitespace() {
                self.bump();
                continue;
            }
            if ch == ';' {
                while let Some(c) = self.current() {
                    self.bump();
                    if c == '\n' {
                        break;
                    }
                }
                continue;
            }
            return true;
        }
    }

    fn parse_expr(&mut self) -> Result<Expr, ParseError> {
        if self.depth >= MAX_NESTING {
            return Err(self.error("nesting too deep"));
        }
        self.depth += 1;
        let result = self.parse_nested();
        self.depth -= 1;
        result
    }

    fn parse_nested(&mut self) -> Result<Expr, ParseError> {
        self.skip_ws_and_comments();
        let Some(ch) = self.current() else {
            return Err(self.error("unexpected end of input"));
        };

        match ch {
            '(' => self.parse_list(),
            ')' => Err(self.error("unexpected ')'")),
            '\'' => {
                self.bump();
                if !self.skip_ws_and_comments() {
                    return Err(self.error("nothing to quote"));
                }
                let quoted = self.parse_expr()?;
                Ok(Expr::List(vec![Expr::Symbol("quote".into()), quoted]))
            }
            '"' => self.parse_string(),
            _ => self.parse_atom(),
        }
    }

    fn parse_list(&mut self) -> Result<Expr, ParseError> {
        self.expect('(')?;
        let mut items = Vec::new();
        loop {
            if !self.skip_ws_and_comments() {
                return Err(self.error("unterminated list"));
            }
            if self.current() == Some(')') {
                self.bump();
                return Ok(Expr::List(items));
            }
            items.push(self.parse_expr()?);
        }
    }

    fn parse_string(&mut self) -> Result<Expr, ParseError> {
        self.expect('"')?;
        let mut s = String::new();
        loop {
            let Some(ch) = self.current() else {
                return Err(self.error("unterminated string"));
            };
            self.bump();
            match ch {
                '"' => return Ok(Expr::Str(s)),
                '\\' => {
                    let Some(esc) = self.current() else {
                        return Err(self.error("unterminated escape in string"));
                    };
                    self.bump();
                    match esc {
                        'n' => s.push('\n'),
                        'r' => s.push('\r'),
                        't' => s.push('\t'),
                        '0' => s.push('\0'),
                        'e' => s.push('\x1B'),
                        '\\' => s.push('\\'),
                        '"' => s.push('"'),
                        '\n' => {}
                        other => s.push(other),
                    }
                }
                other => s.push(other),
            }
        }
    }

    fn parse_atom(&mut self) -> Result<Expr, ParseError> {
        let start = self.pos;
        while let Some(ch) = self.current() {
            if ch.is_whitespace() || matches!(ch, '(' | ')' | '\'' | '"' | ';') {
                break;
            }
            self.bump();
        }
        let token = &self.input[start..self.pos];
        if token.is_empty() {
            return Err(self.error("expected atom"));
        }

        if let Ok(n) = token.parse::<i64>() {
            return Ok(Expr::Int(n));
        }
        if looks_like_dec(token) {
            if let Ok(f) = token.parse::<f64>() {
                return Ok(Expr::Dec(f));
            }
        }
        Ok(Expr::Symbol(token.to_string()))
    }

    fn expect(&mut self, expected: char) -> Result<(), ParseError> {
        match self.current() {
            Some(ch) if ch == expected => {
                self.bump();
                Ok(())
            }
            _ => Err(self.error(&format!("expected '{}'", expected))),
        }
    }

    fn current(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn bump(&mut self) {
        if let Some(ch) = self.current() {
            self.pos += ch.len_utf8();
        }
    }

    fn error(&self, message: &str) -> ParseError {
        ParseError {
            position: self.pos,
            message: message.to_string(),
        }
    }
}

/// Decimal literals need a digit and a '.' or exponent; keeps symbols such
/// as `inf` or `e` from reading as numbers.
fn looks_like_dec(token: &str) -> bool {
    let body = token.strip_prefix(&['+', '-'][..]).unwrap_or(token);
    body.chars().any(|c| c.is_ascii_digit())
        && body.chars().all(|c| c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E' | '+' | '-'))
        && body.chars().next().is_some_and(|c| c.is_ascii_digit() || c == '.')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn one(src: &str) -> Expr {
        let mut forms = parse_forms(src).expect("parse");
        assert_eq!(forms.len(), 1, "expected one form in {src:?}");
        forms.remove(0)
    }

    #[test]
    fn parse_numbers() {
        assert_eq!(one("42"), Expr::Int(42));
        assert_eq!(one("-7"), Expr::Int(-7));
        assert_eq!(one("1.5"), Expr::Dec(1.5));
        assert_eq!(one("-.5"), Expr::Dec(-0.5));
        assert_eq!(one("2e3"), Expr::Dec(2000.0));
    }

    #[test]
    fn parse_symbols() {
        assert_eq!(one("sys"), Expr::Symbol("sys".into()));
        assert_eq!(one("cd!"), Expr::Symbol("cd!".into()));
        assert_eq!(one("-"), Expr::Symbol("-".into()));
        assert_eq!(one("e"), Expr::Symbol("e".into()));
    }

    #[test]
    fn parse_string_escapes() {
        assert_eq!(one(r#""a\nb""#), Expr::Str("a\nb".into()));
        assert_eq!(one(r#""say \"hi\"""#), Expr::Str("say \"hi\"".into()));
        assert_eq!(one(r#""nul\0""#), Expr::Str("nul\0".into()));
    }

    #[test]
    fn parse_call_with_comment() {
        let forms = parse_forms("; run it\n(sys \"echo\" \"hi\") ; trailing\n(now)").unwrap();
        assert_eq!(
            forms,
            vec![
                Expr::List(vec![
                    Expr::Symbol("sys".into()),
                    Expr::Str("echo".into()),
                    Expr::Str("hi".into()),
                ]),
                Expr::List(vec![Expr::Symbol("now".into())]),
            ]
        );
    }

    #[test]
    fn parse_quote() {
        assert_eq!(
            one("'(a 1)"),
            Expr::List(vec![
                Expr::Symbol("quote".into()),
                Expr::List(vec![Expr::Symbol("a".into()), Expr::Int(1)]),
            ])
        );
    }

    #[test]
    fn parse_errors() {
        let err = parse_forms("(sys \"echo\"").unwrap_err();
        assert_eq!(err.message, "unterminated list");
        let err = parse_forms(")").unwrap_err();
        assert_eq!(err.position, 0);
        assert!(parse_forms("\"open").is_err());
        assert!(parse_forms("'").is_err());
    }

    #[test]
    fn nesting_limit() {
        let ok = format!("{}x{}", "(".repeat(MAX_NESTING - 1), ")".repeat(MAX_NESTING - 1));
        assert!(parse_forms(&ok).is_ok());

        let deep = format!("{}{}", "(".repeat(200_000), ")".repeat(200_000));
        let err = parse_forms(&deep).unwrap_err();
        assert_eq!(err.message, "nesting too deep");
        assert_eq!(err.position, MAX_NESTING);

        let quotes = format!("{}x", "'".repeat(200_000));
        assert_eq!(parse_forms(&quotes).unwrap_err().message, "nesting too deep");
    }

    #[test]
    fn empty_input_has_no_forms() {
        assert!(parse_forms("  ; only a comment\n").unwrap().is_empty());
    }
}
