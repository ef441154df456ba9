//! Primitive registry, calling convention, and argument contract checks.
//!
//! Every callable has a `PrimitiveDescriptor`.  Primitives (`PrimitiveId`)
//! always receive pre-evaluated argument values; special forms
//! (`SpecialFormId`) receive the raw argument expressions and evaluate them
//! themselves.  The evaluator checks arity from the descriptor before it
//! evaluates anything, and each callable checks the types it needs before it
//! touches OS state.

use eevo_host_abi::{ArgPolicy, Arity, EffectClass, PrimitiveDescriptor};
use strum::{EnumIter, EnumString};

use super::error::{signal, EvalResult, Flow};
use super::eval::Evaluator;
use super::expr::Expr;
use super::value::{Value, ValueTag};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, EnumString, EnumIter)]
pub(crate) enum PrimitiveId {
    #[strum(serialize = "cd", serialize = "cd!")]
    Cd,
    #[strum(serialize = "pwd")]
    Pwd,
    #[strum(serialize = "exit", serialize = "exit!")]
    Exit,
    #[strum(serialize = "now")]
    Now,
    #[strum(serialize = "sys")]
    Sys,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, EnumString, EnumIter)]
pub(crate) enum SpecialFormId {
    #[strum(serialize = "quote")]
    Quote,
    #[strum(serialize = "def")]
    Def,
    #[strum(serialize = "do")]
    Do,
    #[strum(serialize = "time")]
    Time,
}

const fn evaluated(name: &'static str, arity: Arity, effect: EffectClass) -> PrimitiveDescriptor {
    PrimitiveDescriptor {
        name,
        arity,
        args: ArgPolicy::Evaluated,
        effect,
    }
}

const fn unevaluated(name: &'static str, arity: Arity, effect: EffectClass) -> PrimitiveDescriptor {
    PrimitiveDescriptor {
        name,
        arity,
        args: ArgPolicy::Unevaluated,
        effect,
    }
}

impl PrimitiveId {
    pub(crate) fn descriptor(self) -> PrimitiveDescriptor {
        match self {
            PrimitiveId::Cd => evaluated("cd", Arity::Exact(1), EffectClass::StateWrite),
            PrimitiveId::Pwd => evaluated("pwd", Arity::Exact(0), EffectClass::StateRead),
            PrimitiveId::Exit => evaluated("exit", Arity::Exact(1), EffectClass::Terminate),
            PrimitiveId::Now => evaluated("now", Arity::Exact(0), EffectClass::StateRead),
            // Missing-command is reported by `sys` itself after non-text
            // arguments are filtered out.
            PrimitiveId::Sys => evaluated("sys", Arity::AtLeast(0), EffectClass::BlockingIo),
        }
    }
}

impl SpecialFormId {
    pub(crate) fn descriptor(self) -> PrimitiveDescriptor {
        match self {
            SpecialFormId::Quote => unevaluated("quote", Arity::Exact(1), EffectClass::PureRead),
            SpecialFormId::Def => unevaluated("def", Arity::Exact(2), EffectClass::StateWrite),
            SpecialFormId::Do => unevaluated("do", Arity::AtLeast(0), EffectClass::PureRead),
            SpecialFormId::Time => unevaluated("time", Arity::Exact(1), EffectClass::StateRead),
        }
    }
}

/// Any callable the evaluator knows by name.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Builtin {
    Form(SpecialFormId),
    Primitive(PrimitiveId),
}

impl Builtin {
    pub(crate) fn descriptor(self) -> PrimitiveDescriptor {
        match self {
            Builtin::Form(id) => id.descriptor(),
            Builtin::Primitive(id) => id.descriptor(),
        }
    }
}

/// Resolve a callable name, aliases included.
pub(crate) fn lookup(name: &str) -> Option<Builtin> {
    if let Ok(form) = name.parse::<SpecialFormId>() {
        return Some(Builtin::Form(form));
    }
    name.parse::<PrimitiveId>().ok().map(Builtin::Primitive)
}

pub(crate) fn descriptor(name: &str) -> Option<PrimitiveDescriptor> {
    lookup(name).map(Builtin::descriptor)
}

// ---------------------------------------------------------------------------
// Contract checks
// ---------------------------------------------------------------------------

pub(crate) fn check_arity(name: &str, arity: Arity, count: usize) -> Result<(), Flow> {
    if arity.accepts(count) {
        Ok(())
    } else {
        Err(signal(
            "wrong-number-of-arguments",
            vec![Value::symbol(name), Value::Int(count as i64)],
        ))
    }
}

pub(crate) fn check_type(value: &Value, expected: ValueTag) -> Result<(), Flow> {
    if value.tag() == expected {
        Ok(())
    } else {
        Err(wrong_type(expected, value))
    }
}

pub(crate) fn wrong_type(expected: ValueTag, value: &Value) -> Flow {
    signal(
        "wrong-type-argument",
        vec![Value::symbol(expected.predicate()), value.clone()],
    )
}

/// Expect exactly N arguments.
pub(crate) fn expect_args(name: &str, args: &[Value], n: usize) -> Result<(), Flow> {
    check_arity(name, Arity::Exact(n), args.len())
}

pub(crate) fn expect_text(value: &Value) -> Result<&str, Flow> {
    check_type(value, ValueTag::Text)?;
    value.as_text().ok_or_else(|| wrong_type(ValueTag::Text, value))
}

pub(crate) fn expect_int(value: &Value) -> Result<i64, Flow> {
    match value {
        Value::Int(n) => Ok(*n),
        other => Err(wrong_type(ValueTag::Int, other)),
    }
}

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub(crate) fn dispatch_primitive(
    eval: &mut Evaluator,
    id: PrimitiveId,
    args: Vec<Value>,
) -> EvalResult {
    match id {
        PrimitiveId::Cd => super::os::builtin_cd(eval, args),
        PrimitiveId::Pwd => super::os::builtin_pwd(eval, args),
        PrimitiveId::Exit => super::os::builtin_exit(eval, args),
        PrimitiveId::Now => super::os::builtin_now(eval, args),
        PrimitiveId::Sys => super::sys::builtin_sys(eval, args),
    }
}

pub(crate) fn dispatch_special_form(
    eval: &mut Evaluator,
    id: SpecialFormId,
    tail: &[Expr],
) -> EvalResult {
    match id {
        SpecialFormId::Quote => eval.sf_quote(tail),
        SpecialFormId::Def => eval.sf_def(tail),
        SpecialFormId::Do => eval.sf_do(tail),
        SpecialFormId::Time => super::os::sf_time(eval, tail),
    }
}
