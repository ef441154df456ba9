//! AST (expression) types produced by the parser.

use std::error::Error;
use std::fmt::{self, Display, Formatter};

/// Parsed Eevo expression (AST node).
#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    Int(i64),
    Dec(f64),
    Symbol(String),
    Str(String),
    List(Vec<Expr>),
}

#[derive(Clone, Debug)]
pub struct ParseError {
    pub position: usize,
    pub message: String,
}

impl Display for ParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "parse error at {}: {}", self.position, self.message)
    }
}

impl Error for ParseError {}

/// Print an expression as Eevo source.
pub fn print_expr(expr: &Expr) -> String {
    match expr {
        Expr::Int(v) => v.to_string(),
        Expr::Dec(v) => format_dec(*v),
        Expr::Symbol(s) => s.clone(),
        Expr::Str(s) => format!("{:?}", s),
        Expr::List(items) => {
            if items.is_empty() {
                return "Nil".to_string();
            }
            if let [Expr::Symbol(s), quoted] = items.as_slice() {
                if s == "quote" {
                    return format!("'{}", print_expr(quoted));
                }
            }
            let parts: Vec<String> = items.iter().map(print_expr).collect();
            format!("({})", parts.join(" "))
        }
    }
}

pub(crate) fn format_dec(f: f64) -> String {
    if f.fract() == 0.0 && f.is_finite() {
        format!("{:.1}", f)
    } else {
        format!("{}", f)
    }
}
