//! Evaluator: special forms, argument evaluation and primitive dispatch.

use std::collections::HashMap;

use eevo_host_abi::{ArgPolicy, EffectClass, HostAbi};

use super::builtins::{self, Builtin};
use super::config::EvalConfig;
use super::error::*;
use super::expr::Expr;
use super::host::SystemHost;
use super::value::*;

/// The Eevo evaluator.
pub struct Evaluator {
    /// Global bindings made with `def`.
    pub(crate) globals: HashMap<String, Value>,
    /// The OS surface every primitive goes through.
    pub(crate) host: Box<dyn HostAbi>,
    pub(crate) config: EvalConfig,
    /// Warnings emitted since the last `take_warnings`.
    warnings: Vec<String>,
    depth: usize,
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::new()
    }
}

impl Evaluator {
    pub fn new() -> Self {
        Self::with_config(EvalConfig::default())
    }

    pub fn with_config(config: EvalConfig) -> Self {
        Self::with_host(Box::new(SystemHost::new()), config)
    }

    pub fn with_host(host: Box<dyn HostAbi>, config: EvalConfig) -> Self {
        Self {
            globals: HashMap::new(),
            host,
            config,
            warnings: Vec::new(),
            depth: 0,
        }
    }

    // -----------------------------------------------------------------------
    // Public API
    // -----------------------------------------------------------------------

    pub fn eval_expr(&mut self, expr: &Expr) -> Result<Value, EvalError> {
        self.eval(expr).map_err(map_flow)
    }

    pub fn eval_forms(&mut self, forms: &[Expr]) -> Vec<Result<Value, EvalError>> {
        forms.iter().map(|form| self.eval_expr(form)).collect()
    }

    /// Drain the warnings reported since the previous call.
    pub fn take_warnings(&mut self) -> Vec<String> {
        std::mem::take(&mut self.warnings)
    }

    /// Report a non-fatal diagnostic.  Evaluation continues.
    pub(crate) fn warn(&mut self, message: String) {
        log::warn!("{message}");
        self.warnings.push(message);
    }

    // -----------------------------------------------------------------------
    // Core eval
    // -----------------------------------------------------------------------

    pub(crate) fn eval(&mut self, expr: &Expr) -> EvalResult {
        self.depth += 1;
        if self.depth > self.config.max_depth {
            self.depth -= 1;
            return Err(signal(
                "excessive-nesting",
                vec![Value::Int(self.config.max_depth as i64)],
            ));
        }
        let result = self.eval_inner(expr);
        self.depth -= 1;
        result
    }

    fn eval_inner(&mut self, expr: &Expr) -> EvalResult {
        match expr {
            Expr::Int(v) => Ok(Value::Int(*v)),
            Expr::Dec(v) => Ok(Value::Dec(*v)),
            Expr::Str(s) => Ok(Value::text(s.clone())),
            Expr::Symbol(symbol) => self.eval_symbol(symbol),
            Expr::List(items) => self.eval_list(items),
        }
    }

    fn eval_symbol(&self, symbol: &str) -> EvalResult {
        match symbol {
            "Nil" => return Ok(Value::Nil),
            "Void" => return Ok(Value::Void),
            _ => {}
        }
        if let Some(desc) = builtins::descriptor(symbol) {
            if !desc.is_special_form() {
                return Ok(Value::Prim(desc.name));
            }
        }
        match self.globals.get(symbol) {
            Some(value) => Ok(value.clone()),
            None => Err(signal("void-variable", vec![Value::symbol(symbol)])),
        }
    }

    fn eval_list(&mut self, items: &[Expr]) -> EvalResult {
        let Some((head, tail)) = items.split_first() else {
            return Ok(Value::Nil);
        };

        if let Expr::Symbol(name) = head {
            if let Some(builtin) = builtins::lookup(name) {
                return self.call_builtin(builtin, tail);
            }
            if !self.globals.contains_key(name) {
                return Err(signal("void-function", vec![Value::symbol(name.clone())]));
            }
        }

        match self.eval(head)? {
            Value::Prim(name) => match builtins::lookup(name) {
                Some(builtin) => self.call_builtin(builtin, tail),
                None => Err(signal("invalid-function", vec![Value::Prim(name)])),
            },
            other => Err(signal("invalid-function", vec![other])),
        }
    }

    /// Check arity against the descriptor, then hand the argument
    /// expressions over as the descriptor's `ArgPolicy` says.  Evaluated
    /// arguments go left to right and the first failure aborts the call
    /// before any OS action.
    fn call_builtin(&mut self, builtin: Builtin, tail: &[Expr]) -> EvalResult {
        let desc = builtin.descriptor();
        builtins::check_arity(desc.name, desc.arity, tail.len())?;
        match desc.args {
            ArgPolicy::Unevaluated => {
                log::trace!("special form {}", desc.name);
                match builtin {
                    Builtin::Form(id) => builtins::dispatch_special_form(self, id, tail),
                    Builtin::Primitive(_) => Err(signal(
                        "invalid-function",
                        vec![Value::symbol(desc.name)],
                    )),
                }
            }
            ArgPolicy::Evaluated => {
                let mut args = Vec::with_capacity(tail.len());
                for expr in tail {
                    args.push(self.eval(expr)?);
                }
                if desc.effect != EffectClass::PureRead {
                    log::debug!("{} {:?}", desc.name, desc.effect);
                }
                match builtin {
                    Builtin::Primitive(id) => builtins::dispatch_primitive(self, id, args),
                    Builtin::Form(_) => Err(signal(
                        "invalid-function",
                        vec![Value::symbol(desc.name)],
                    )),
                }
            }
        }
    }

    // -----------------------------------------------------------------------
    // Special forms
    // -----------------------------------------------------------------------

    pub(crate) fn sf_quote(&self, tail: &[Expr]) -> EvalResult {
        match tail {
            [expr] => Ok(quote_to_value(expr)),
            _ => Err(signal(
                "wrong-number-of-arguments",
                vec![Value::symbol("quote"), Value::Int(tail.len() as i64)],
            )),
        }
    }

    pub(crate) fn sf_def(&mut self, tail: &[Expr]) -> EvalResult {
        let [target, expr] = tail else {
            return Err(signal(
                "wrong-number-of-arguments",
                vec![Value::symbol("def"), Value::Int(tail.len() as i64)],
            ));
        };
        let Expr::Symbol(name) = target else {
            return Err(builtins::wrong_type(ValueTag::Symbol, &quote_to_value(target)));
        };
        // Builtin names and constants cannot be rebound.
        if matches!(name.as_str(), "Nil" | "Void") || builtins::lookup(name).is_some() {
            return Err(signal("setting-constant", vec![Value::symbol(name.clone())]));
        }
        let value = self.eval(expr)?;
        self.globals.insert(name.clone(), value);
        Ok(Value::Void)
    }

    pub(crate) fn sf_do(&mut self, tail: &[Expr]) -> EvalResult {
        let mut last = Value::Void;
        for expr in tail {
            last = self.eval(expr)?;
        }
        Ok(last)
    }
}

/// Convert a quoted expression to its literal value.
pub(crate) fn quote_to_value(expr: &Expr) -> Value {
    match expr {
        Expr::Int(v) => Value::Int(*v),
        Expr::Dec(v) => Value::Dec(*v),
        Expr::Str(s) => Value::text(s.clone()),
        Expr::Symbol(s) => Value::symbol(s.clone()),
        Expr::List(items) => Value::list(items.iter().map(quote_to_value).collect()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eevo::host::fake::RecordingHost;
    use crate::eevo::{format_eval_result, parse_forms};

    fn eval_one(src: &str) -> String {
        let forms = parse_forms(src).expect("parse");
        let mut ev = Evaluator::new();
        let result = ev.eval_expr(&forms[0]);
        format_eval_result(&result)
    }

    fn eval_all(src: &str) -> Vec<String> {
        let forms = parse_forms(src).expect("parse");
        let mut ev = Evaluator::new();
        ev.eval_forms(&forms)
            .iter()
            .map(format_eval_result)
            .collect()
    }

    #[test]
    fn literals_evaluate_to_themselves() {
        assert_eq!(eval_one("42"), "OK 42");
        assert_eq!(eval_one("2.5"), "OK 2.5");
        assert_eq!(eval_one(r#""hi""#), r#"OK "hi""#);
        assert_eq!(eval_one("Nil"), "OK Nil");
        assert_eq!(eval_one("Void"), "OK Void");
        assert_eq!(eval_one("()"), "OK Nil");
    }

    #[test]
    fn quote_returns_structure() {
        assert_eq!(eval_one("'(a 1 \"b\")"), r#"OK (a 1 "b")"#);
        assert_eq!(eval_one("'x"), "OK x");
        assert_eq!(eval_one("(quote)"), "ERR (wrong-number-of-arguments (quote 0))");
    }

    #[test]
    fn def_and_lookup() {
        let results = eval_all("(def dir \"/tmp\") dir (def 5 1)");
        assert_eq!(results[0], "OK Void");
        assert_eq!(results[1], r#"OK "/tmp""#);
        assert_eq!(results[2], "ERR (wrong-type-argument (symbolp 5))");
    }

    #[test]
    fn do_sequences() {
        assert_eq!(eval_one("(do)"), "OK Void");
        assert_eq!(eval_one("(do 1 2 3)"), "OK 3");
        assert_eq!(
            eval_all("(do (def a 1) (def b 2)) b"),
            vec!["OK Void", "OK 2"]
        );
    }

    #[test]
    fn unknown_names() {
        assert_eq!(eval_one("missing"), "ERR (void-variable (missing))");
        assert_eq!(eval_one("(missing 1)"), "ERR (void-function (missing))");
        assert_eq!(eval_all("(def n 3) (n)")[1], "ERR (invalid-function (3))");
    }

    #[test]
    fn primitives_are_values() {
        assert_eq!(eval_one("sys"), "OK #<primitive sys>");
        assert_eq!(eval_one("cd!"), "OK #<primitive cd>");
        let (host, log) = RecordingHost::new();
        let mut ev = Evaluator::with_host(Box::new(host), EvalConfig::default());
        let forms = parse_forms("(def run sys) (run \"make\" \"all\")").unwrap();
        let results: Vec<_> = ev.eval_forms(&forms).iter().map(format_eval_result).collect();
        assert_eq!(results, vec!["OK Void", "OK Void"]);
        assert_eq!(log.borrow().spawned, vec![vec!["make".to_string(), "all".to_string()]]);
    }

    #[test]
    fn arity_is_checked_before_arguments_are_evaluated() {
        let (host, log) = RecordingHost::new();
        let mut ev = Evaluator::with_host(Box::new(host), EvalConfig::default());
        let forms = parse_forms("(cd (def touched 1) \"/tmp\") touched").unwrap();
        let results: Vec<_> = ev.eval_forms(&forms).iter().map(format_eval_result).collect();
        assert_eq!(results[0], "ERR (wrong-number-of-arguments (cd 2))");
        assert_eq!(results[1], "ERR (void-variable (touched))");
        assert!(log.borrow().chdirs.is_empty());
    }

    #[test]
    fn argument_failure_short_circuits() {
        let (host, log) = RecordingHost::new();
        let mut ev = Evaluator::with_host(Box::new(host), EvalConfig::default());
        let forms = parse_forms("(sys \"echo\" (undefined) (def later 1)) later").unwrap();
        let results: Vec<_> = ev.eval_forms(&forms).iter().map(format_eval_result).collect();
        assert_eq!(results[0], "ERR (void-function (undefined))");
        assert_eq!(results[1], "ERR (void-variable (later))");
        assert!(log.borrow().spawned.is_empty());
    }

    #[test]
    fn builtin_names_cannot_be_rebound() {
        let (host, log) = RecordingHost::new();
        let mut ev = Evaluator::with_host(Box::new(host), EvalConfig::default());
        let forms = parse_forms(r#"(def cd 5) cd (cd "/tmp") (def cd! 1) (def time 1) (def Nil 1)"#)
            .unwrap();
        let results: Vec<_> = ev.eval_forms(&forms).iter().map(format_eval_result).collect();
        assert_eq!(
            results,
            vec![
                "ERR (setting-constant (cd))",
                "OK #<primitive cd>",
                "OK Void",
                "ERR (setting-constant (cd!))",
                "ERR (setting-constant (time))",
                "ERR (setting-constant (Nil))",
            ]
        );
        assert_eq!(log.borrow().chdirs, vec![std::path::PathBuf::from("/tmp")]);
    }

    #[test]
    fn special_forms_receive_raw_expressions() {
        // `quote` is unevaluated, so its operand is never looked up.
        assert_eq!(eval_one("(quote undefined-name)"), "OK undefined-name");
        // A primitive evaluates the same operand and fails before running.
        assert_eq!(eval_one("(pwd undefined-name)"), "ERR (wrong-number-of-arguments (pwd 1))");
        assert_eq!(eval_one("(cd undefined-name)"), "ERR (void-variable (undefined-name))");
        // Special forms are not first-class values.
        assert_eq!(eval_one("time"), "ERR (void-variable (time))");
    }

    #[test]
    fn long_quoted_list_is_discarded() {
        let src = format!("(do '({}) 0)", "1 ".repeat(300_000));
        assert_eq!(eval_one(&src), "OK 0");
    }

    #[test]
    fn nesting_limit() {
        let config = EvalConfig {
            max_depth: 3,
            ..EvalConfig::default()
        };
        let mut ev = Evaluator::with_config(config);
        let forms = parse_forms("(do (do (do (do 1))))").unwrap();
        assert_eq!(
            format_eval_result(&ev.eval_expr(&forms[0])),
            "ERR (excessive-nesting (3))"
        );
        // The depth counter unwinds after the failure.
        let ok = parse_forms("(do 1)").unwrap();
        assert_eq!(format_eval_result(&ev.eval_expr(&ok[0])), "OK 1");
    }

    #[test]
    fn warnings_are_drained() {
        let mut ev = Evaluator::new();
        ev.warn("first".into());
        ev.warn("second".into());
        assert_eq!(ev.take_warnings(), vec!["first", "second"]);
        assert!(ev.take_warnings().is_empty());
    }
}
