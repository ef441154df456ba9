//! `sys` -- run a command as a child process and wait for it.
//!
//! Arguments arrive already evaluated.  Only text values become part of the
//! child's argument vector; anything else is reported and skipped (or
//! rejected when `strict_sys_args` is set).  The command is looked up on
//! `PATH` and inherits the interpreter's environment, working directory and
//! standard streams.

use eevo_host_abi::{ArgVector, ProcessOutcome};

use super::builtins::wrong_type;
use super::error::{error_message, signal_io, EvalResult};
use super::eval::Evaluator;
use super::print::print_value;
use super::value::{Value, ValueTag};

pub(crate) fn builtin_sys(eval: &mut Evaluator, args: Vec<Value>) -> EvalResult {
    let mut words: Vec<&str> = Vec::with_capacity(args.len());
    for (index, arg) in args.iter().enumerate() {
        match arg.as_text() {
            Some(text) => words.push(text),
            None if eval.config.strict_sys_args => return Err(wrong_type(ValueTag::Text, arg)),
            None => eval.warn(format!(
                "sys: argument {index} is not text, skipping: {}",
                print_value(arg)
            )),
        }
    }

    if words.is_empty() {
        return Err(error_message("sys: Missing system command to run"));
    }

    let argv = ArgVector::new(&words).map_err(|err| {
        log::debug!("sys: {err}");
        error_message("sys: argument contains a NUL byte")
    })?;
    let command = argv.program_lossy();

    log::debug!("sys: spawning {:?}", words);
    let outcome = match eval.host.run_process(&argv) {
        Ok(outcome) => outcome,
        Err(err) => {
            eval.warn(format!("sys: {command}: {err}"));
            return Err(signal_io("Searching for program", Some(&command), &err));
        }
    };
    log::debug!("sys: {command} finished with {outcome:?}");
    if outcome.success() {
        return Ok(Value::Void);
    }

    Ok(match outcome {
        ProcessOutcome::Exited(code) => Value::Int(i64::from(code)),
        ProcessOutcome::Signaled(sig) => {
            eval.warn(format!("sys: {command}: Did not exit normally"));
            Value::record(vec![
                ("command".to_string(), Value::text(command)),
                ("signal".to_string(), Value::Int(i64::from(sig))),
            ])
        }
    })
}
