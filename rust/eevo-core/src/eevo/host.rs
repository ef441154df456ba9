//! The real OS behind `HostAbi`.
//!
//! Directory and exit calls go straight to `std`; CPU time comes from
//! `clock_gettime(CLOCK_PROCESS_CPUTIME_ID)`; child processes are run with
//! `std::process::Command`, which forks, replaces the child image with a PATH
//! lookup of the program, and waits on that one child.

use std::ffi::OsStr;
use std::io;
use std::os::unix::ffi::OsStrExt;
use std::os::unix::process::ExitStatusExt;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use eevo_host_abi::{ArgVector, HostAbi, ProcessOutcome};

#[derive(Clone, Copy, Debug, Default)]
pub struct SystemHost;

impl SystemHost {
    pub fn new() -> Self {
        SystemHost
    }
}

impl HostAbi for SystemHost {
    fn current_dir(&self) -> io::Result<PathBuf> {
        std::env::current_dir()
    }

    fn set_current_dir(&mut self, path: &Path) -> io::Result<()> {
        std::env::set_current_dir(path)
    }

    fn pwd_hint(&self) -> Option<PathBuf> {
        std::env::var_os("PWD").map(PathBuf::from)
    }

    fn unix_time(&self) -> i64 {
        match SystemTime::now().duration_since(UNIX_EPOCH) {
            Ok(dur) => dur.as_secs() as i64,
            Err(e) => -(e.duration().as_secs() as i64),
        }
    }

    fn cpu_time(&self) -> Duration {
        let mut ts = libc::timespec {
            tv_sec: 0,
            tv_nsec: 0,
        };
        let rc = unsafe { libc::clock_gettime(libc::CLOCK_PROCESS_CPUTIME_ID, &mut ts) };
        if rc != 0 {
            log::warn!(
                "clock_gettime(CLOCK_PROCESS_CPUTIME_ID) failed: {}",
                io::Error::last_os_error()
            );
            return Duration::ZERO;
        }
        Duration::new(ts.tv_sec.max(0) as u64, ts.tv_nsec.clamp(0, 999_999_999) as u32)
    }

    fn run_process(&mut self, argv: &ArgVector) -> io::Result<ProcessOutcome> {
        let program = argv.program().ok_or_else(|| {
            io::Error::new(io::ErrorKind::InvalidInput, "empty argument vector")
        })?;
        let status = Command::new(OsStr::from_bytes(program.to_bytes()))
            .args(argv.args().map(|arg| OsStr::from_bytes(arg.to_bytes())))
            .status()?;
        Ok(outcome_from_status(status))
    }

    fn exit(&mut self, status: i32) {
        std::process::exit(status)
    }
}

fn outcome_from_status(status: ExitStatus) -> ProcessOutcome {
    match status.code() {
        Some(code) => ProcessOutcome::Exited((code & 0xff) as u8),
        None => ProcessOutcome::Signaled(
            status
                .signal()
                .or_else(|| status.stopped_signal())
                .unwrap_or(0),
        ),
    }
}
