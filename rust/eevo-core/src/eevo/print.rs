//! Value printing (Eevo representation).

use super::expr::format_dec;
use super::value::Value;

/// Print a `Value` as Eevo source.
pub fn print_value(value: &Value) -> String {
    match value {
        Value::Void => "Void".to_string(),
        Value::Nil => "Nil".to_string(),
        Value::Int(v) => v.to_string(),
        Value::Dec(f) => format_dec(*f),
        Value::Text(s) => format!("{:?}", s.as_str()),
        Value::Symbol(s) => s.clone(),
        Value::Pair(_) => {
            if let Some(shorthand) = print_quote_shorthand(value) {
                return shorthand;
            }
            let mut out = String::from("(");
            print_pair(value, &mut out);
            out.push(')');
            out
        }
        Value::Record(fields) => {
            let parts: Vec<String> = fields
                .iter()
                .map(|(name, v)| format!("{}: {}", name, print_value(v)))
                .collect();
            format!("{{{}}}", parts.join(", "))
        }
        Value::Prim(name) => format!("#<primitive {}>", name),
    }
}

fn print_quote_shorthand(value: &Value) -> Option<String> {
    let Value::Pair(cell) = value else {
        return None;
    };
    if !matches!(&cell.car, Value::Symbol(s) if s == "quote") {
        return None;
    }
    match &cell.cdr {
        Value::Pair(rest) if rest.cdr.is_nil() => Some(format!("'{}", print_value(&rest.car))),
        _ => None,
    }
}

fn print_pair(value: &Value, out: &mut String) {
    let mut cursor = value.clone();
    let mut first = true;
    loop {
        match cursor {
            Value::Pair(cell) => {
                if !first {
                    out.push(' ');
                }
                out.push_str(&print_value(&cell.car));
                cursor = cell.cdr.clone();
                first = false;
            }
            Value::Nil => return,
            other => {
                out.push_str(" . ");
                out.push_str(&print_value(&other));
                return;
            }
        }
    }
}
