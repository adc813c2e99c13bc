//! Entry point of the `tc` binary.
//!
//! Delegates to [`tc_cli::run`] with the process arguments and the locked
//! standard streams.

use std::io::{self, StderrLock, StdinLock, StdoutLock};
use std::process::ExitCode;

fn main() -> ExitCode {
    let mut stdin: StdinLock<'_> = io::stdin().lock();
    let mut stdout: StdoutLock<'_> = io::stdout().lock();
    let mut stderr: StderrLock<'_> = io::stderr().lock();
    tc_cli::run(std::env::args_os(), &mut stdin, &mut stdout, &mut stderr)
}
