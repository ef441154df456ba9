//! Error and signal types for the evaluator.

use std::error::Error;
use std::fmt::{self, Display, Formatter};

use super::print::print_value;
use super::value::Value;

/// Public-facing evaluation error.
#[derive(Clone, Debug, PartialEq)]
pub struct EvalError {
    pub symbol: String,
    pub data: Vec<Value>,
}

impl Display for EvalError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "signal {} {}", self.symbol, print_signal_data(&self.data))
    }
}

impl Error for EvalError {}

/// Internal non-local control flow: a signalled error on its way out to the
/// top level.  The value slot of the failed call is never filled.
#[derive(Clone, Debug)]
pub(crate) struct Flow {
    pub symbol: String,
    pub data: Vec<Value>,
}

pub(crate) type EvalResult = Result<Value, Flow>;

/// Create a signal flow.
pub(crate) fn signal(symbol: &str, data: Vec<Value>) -> Flow {
    Flow {
        symbol: symbol.to_string(),
        data,
    }
}

/// Shorthand for `(error "message")`.
pub(crate) fn error_message(message: impl Into<String>) -> Flow {
    signal("error", vec![Value::text(message)])
}

pub(crate) fn map_flow(flow: Flow) -> EvalError {
    EvalError {
        symbol: flow.symbol,
        data: flow.data,
    }
}

fn io_error_symbol(kind: std::io::ErrorKind) -> &'static str {
    match kind {
        std::io::ErrorKind::NotFound => "file-missing",
        std::io::ErrorKind::PermissionDenied => "permission-denied",
        _ => "file-error",
    }
}

/// Signal for a failed OS call: `(SYMBOL ACTION MESSAGE [TARGET])`.
pub(crate) fn signal_io(action: &str, target: Option<&str>, err: &std::io::Error) -> Flow {
    let mut data = vec![Value::text(action), Value::text(err.to_string())];
    if let Some(target) = target {
        data.push(Value::text(target));
    }
    signal(io_error_symbol(err.kind()), data)
}

/// Format an eval result for the runner and the tests.
pub fn format_eval_result(result: &Result<Value, EvalError>) -> String {
    match result {
        Ok(value) => format!("OK {}", print_value(value)),
        Err(EvalError { symbol, data }) => format!("ERR ({} {})", symbol, print_signal_data(data)),
    }
}

/// Print signal data element by element, so a payload such as `(quote 0)`
/// keeps its list form.
fn print_signal_data(data: &[Value]) -> String {
    if data.is_empty() {
        return "Nil".to_string();
    }
    let parts: Vec<String> = data.iter().map(print_value).collect();
    format!("({})", parts.join(" "))
}
