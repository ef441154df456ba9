use std::error::Error;
use std::ffi::{CStr, CString};
use std::fmt::{Display, Formatter};
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EffectClass {
    PureRead,
    StateRead,
    StateWrite,
    BlockingIo,
    Terminate,
}

/// Whether the evaluator hands a callable its argument values or the raw
/// argument expressions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArgPolicy {
    Evaluated,
    Unevaluated,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Arity {
    Exact(usize),
    AtLeast(usize),
}

impl Arity {
    pub fn accepts(self, count: usize) -> bool {
        match self {
            Arity::Exact(n) => count == n,
            Arity::AtLeast(n) => count >= n,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PrimitiveDescriptor {
    pub name: &'static str,
    pub arity: Arity,
    pub args: ArgPolicy,
    pub effect: EffectClass,
}

impl PrimitiveDescriptor {
    pub fn is_special_form(&self) -> bool {
        self.args == ArgPolicy::Unevaluated
    }
}

/// How a waited-on child process terminated.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProcessOutcome {
    Exited(u8),
    Signaled(i32),
}

impl ProcessOutcome {
    pub fn success(self) -> bool {
        self == ProcessOutcome::Exited(0)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NulByteError {
    pub index: usize,
    pub position: usize,
}

impl Display for NulByteError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "argument {} contains a NUL byte at offset {}",
            self.index, self.position
        )
    }
}

impl Error for NulByteError {}

/// Native argument vector handed to process-image replacement.
///
/// Every slot is an owned, NUL-terminated copy of the interpreter's text, so
/// the vector outlives nothing it borrowed from.  Element 0 is the program.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArgVector {
    args: Vec<CString>,
}

impl ArgVector {
    pub fn new<I, S>(args: I) -> Result<Self, NulByteError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let args = args
            .into_iter()
            .enumerate()
            .map(|(index, arg)| {
                CString::new(arg.as_ref()).map_err(|err| NulByteError {
                    index,
                    position: err.nul_position(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { args })
    }

    pub fn len(&self) -> usize {
        self.args.len()
    }

    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }

    pub fn program(&self) -> Option<&CStr> {
        self.args.first().map(CString::as_c_str)
    }

    /// Arguments after the program name.
    pub fn args(&self) -> impl Iterator<Item = &CStr> {
        self.args.iter().skip(1).map(CString::as_c_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CStr> {
        self.args.iter().map(CString::as_c_str)
    }

    /// Lossy rendering of the program name, for diagnostics.
    pub fn program_lossy(&self) -> String {
        self.program()
            .map(|p| p.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// The OS surface the primitives are allowed to touch.
///
/// The interpreter talks to the process-wide state (working directory,
/// clocks, children, exit) only through this trait, so tests can swap in a
/// host that records calls instead of mutating the real process.
pub trait HostAbi {
    fn current_dir(&self) -> io::Result<PathBuf>;

    fn set_current_dir(&mut self, path: &Path) -> io::Result<()>;

    /// Last known working directory, for when `current_dir` fails.
    fn pwd_hint(&self) -> Option<PathBuf>;

    /// Seconds since the Unix epoch.
    fn unix_time(&self) -> i64;

    /// CPU time consumed by this process so far.
    fn cpu_time(&self) -> Duration;

    /// Spawn `argv`, block until it terminates, and report how it ended.
    fn run_process(&mut self, argv: &ArgVector) -> io::Result<ProcessOutcome>;

    /// Terminate with `status`.  The real host never returns.
    fn exit(&mut self, status: i32);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arity_accepts() {
        assert!(Arity::Exact(1).accepts(1));
        assert!(!Arity::Exact(1).accepts(0));
        assert!(!Arity::Exact(1).accepts(2));
        assert!(Arity::AtLeast(0).accepts(0));
        assert!(Arity::AtLeast(1).accepts(5));
        assert!(!Arity::AtLeast(2).accepts(1));
    }

    #[test]
    fn arg_vector_owns_copies() {
        let source = vec![String::from("sh"), String::from("-c"), String::from("exit 7")];
        let argv = ArgVector::new(&source).expect("no NUL bytes");
        drop(source);
        assert_eq!(argv.len(), 3);
        assert_eq!(argv.program().unwrap().to_str().unwrap(), "sh");
        let rest: Vec<_> = argv.args().map(|a| a.to_str().unwrap()).collect();
        assert_eq!(rest, vec!["-c", "exit 7"]);
        assert_eq!(argv.program_lossy(), "sh");
    }

    #[test]
    fn arg_vector_rejects_interior_nul() {
        let err = ArgVector::new(["echo", "a\0b"]).unwrap_err();
        assert_eq!(err, NulByteError { index: 1, position: 1 });
        assert_eq!(
            err.to_string(),
            "argument 1 contains a NUL byte at offset 1"
        );
    }

    #[test]
    fn empty_arg_vector_has_no_program() {
        let argv = ArgVector::new(Vec::<String>::new()).unwrap();
        assert!(argv.is_empty());
        assert!(argv.program().is_none());
        assert_eq!(argv.program_lossy(), "");
    }

    #[test]
    fn outcome_success() {
        assert!(ProcessOutcome::Exited(0).success());
        assert!(!ProcessOutcome::Exited(1).success());
        assert!(!ProcessOutcome::Signaled(9).success());
    }

    #[test]
    fn special_form_descriptor() {
        let desc = PrimitiveDescriptor {
            name: "time",
            arity: Arity::Exact(1),
            args: ArgPolicy::Unevaluated,
            effect: EffectClass::StateRead,
        };
        assert!(desc.is_special_form());
    }
}
