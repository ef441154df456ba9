//! Eevo interpreter module.
//!
//! Provides the native bridge of the Eevo scripting language:
//! - Value types: Void, Nil, integer, decimal, text, symbol, pair, record, primitive
//! - Reader for integers, decimals, strings, symbols, lists and quote sugar
//! - Special forms: quote, def, do, time
//! - OS primitives: cd, pwd, exit, now, and sys for running external commands

pub mod value;
pub mod expr;
pub mod parser;
pub mod error;
pub mod eval;
pub mod print;
pub mod builtins;
pub mod config;
pub mod host;
pub mod os;
pub mod sys;

pub use value::{ConsCell, Value, ValueTag};
pub use expr::{print_expr, Expr, ParseError};
pub use parser::parse_forms;
pub use error::{format_eval_result, EvalError};
pub use eval::Evaluator;
pub use print::print_value;
pub use config::EvalConfig;
pub use host::SystemHost;
