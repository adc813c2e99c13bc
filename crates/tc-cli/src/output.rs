//! Output streams handed to command routines.

use std::fmt;
use std::io::{self, Write};

use tracing::debug;

/// Borrowed standard output and standard error writers.
///
/// Routines print object listings on `stdout` and diagnostics on `stderr`.
pub struct CommandOutput<'a> {
    /// Object listings.
    pub stdout: &'a mut dyn Write,
    /// Diagnostics and usage text.
    pub stderr: &'a mut dyn Write,
}

impl<'a> CommandOutput<'a> {
    /// Wraps the two writers.
    #[must_use]
    pub const fn new(stdout: &'a mut dyn Write, stderr: &'a mut dyn Write) -> Self {
        Self { stdout, stderr }
    }

    /// Writes one line to standard output.
    ///
    /// # Errors
    ///
    /// Propagates write failures.
    pub fn stdout_line(&mut self, args: fmt::Arguments<'_>) -> io::Result<()> {
        self.stdout.write_fmt(args)?;
        self.stdout.write_all(b"\n")?;
        self.stdout.flush()
    }

    /// Writes one line to standard error.
    ///
    /// # Errors
    ///
    /// Propagates write failures.
    pub fn stderr_line(&mut self, args: fmt::Arguments<'_>) -> io::Result<()> {
        self.stderr.write_fmt(args)?;
        self.stderr.write_all(b"\n")?;
        self.stderr.flush()
    }

    /// Writes a diagnostic line, logging rather than failing when standard
    /// error is gone.
    pub fn report(&mut self, args: fmt::Arguments<'_>) {
        if let Err(error) = self.stderr_line(args) {
            debug!(target: "tc::output", %error, "failed to write diagnostic");
        }
    }
}

impl fmt::Debug for CommandOutput<'_> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_struct("CommandOutput").finish_non_exhaustive()
    }
}
