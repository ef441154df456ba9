//! OS state primitives: `cd`, `pwd`, `exit`, `now`, and the `time` form.

use std::path::Path;

use eevo_host_abi::Arity;

use super::builtins::{check_arity, expect_args, expect_int, expect_text};
use super::error::{signal_io, EvalResult};
use super::eval::Evaluator;
use super::expr::Expr;
use super::value::Value;

/// `(cd PATH)` -- change the process working directory.
pub(crate) fn builtin_cd(eval: &mut Evaluator, args: Vec<Value>) -> EvalResult {
    expect_args("cd", &args, 1)?;
    let path = expect_text(&args[0])?;
    if let Err(err) = eval.host.set_current_dir(Path::new(path)) {
        eval.warn(format!("cd: {path}: {err}"));
        return Err(signal_io("Changing directory", Some(path), &err));
    }
    log::debug!("cd {path:?}");
    Ok(Value::Void)
}

/// `(pwd)` -- the current working directory as text.
///
/// When the directory cannot be read (e.g. it was removed under us) this
/// warns and falls back to the host's last known directory, then to empty
/// text.
pub(crate) fn builtin_pwd(eval: &mut Evaluator, args: Vec<Value>) -> EvalResult {
    expect_args("pwd", &args, 0)?;
    match eval.host.current_dir() {
        Ok(dir) => Ok(Value::text(dir.to_string_lossy().into_owned())),
        Err(err) => {
            eval.warn(format!("pwd: could not get current directory: {err}"));
            let fallback = eval
                .host
                .pwd_hint()
                .map(|dir| dir.to_string_lossy().into_owned())
                .unwrap_or_default();
            Ok(Value::text(fallback))
        }
    }
}

/// `(exit CODE)` -- terminate with the low eight bits of CODE.
pub(crate) fn builtin_exit(eval: &mut Evaluator, args: Vec<Value>) -> EvalResult {
    expect_args("exit", &args, 1)?;
    let code = expect_int(&args[0])?;
    let status = (code & 0xff) as i32;
    log::debug!("exit {code} (status {status})");
    eval.host.exit(status);
    // Only reached when the host does not really terminate.
    Ok(Value::Void)
}

pub(crate) fn builtin_now(eval: &mut Evaluator, args: Vec<Value>) -> EvalResult {
    expect_args("now", &args, 0)?;
    Ok(Value::Int(eval.host.unix_time()))
}

/// `(time EXPR)` -- evaluate EXPR for effect and return the CPU time it
/// consumed, in seconds multiplied by `time_scale`.
pub(crate) fn sf_time(eval: &mut Evaluator, tail: &[Expr]) -> EvalResult {
    check_arity("time", Arity::Exact(1), tail.len())?;
    let start = eval.host.cpu_time();
    eval.eval(&tail[0])?;
    let end = eval.host.cpu_time();
    let elapsed = end.saturating_sub(start);
    Ok(Value::Dec(elapsed.as_secs_f64() * eval.config.time_scale))
}
