//! Batch execution: replaying a script of `tc` commands in one session.
//!
//! The session is started once before the first line and stopped once after
//! the last. Every physical line read advances the line counter, so a failure
//! is reported as `Command failed <name>:<line>` with the number of the line
//! that completed the command. Without `-force` the first failure ends the
//! run; with it the remaining lines still execute. Either way the exit status
//! is failure when any line failed.

use std::fmt;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::process::ExitCode;

use camino::Utf8PathBuf;
use tracing::debug;

use crate::dispatch::Dispatcher;
use crate::errors::CommandError;
use crate::output::CommandOutput;
use crate::routines::ObjectRoutines;
use crate::session::{ChannelOpener, SessionLifecycle};
use crate::tokenizer::tokenize;

/// Where a script is read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchSource {
    /// Standard input, selected by the name `-`.
    Stdin,
    /// A script file.
    File(Utf8PathBuf),
}

impl BatchSource {
    /// Interprets the argument of `-batch`.
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        if name == "-" {
            Self::Stdin
        } else {
            Self::File(Utf8PathBuf::from(name))
        }
    }

    /// The name used in diagnostics.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Stdin => "-",
            Self::File(path) => path.as_str(),
        }
    }
}

impl fmt::Display for BatchSource {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.name())
    }
}

/// Progress through a script.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSession {
    line: usize,
    force: bool,
    failed: bool,
}

impl BatchSession {
    /// A fresh run; `force` keeps going after failures.
    #[must_use]
    pub const fn new(force: bool) -> Self {
        Self {
            line: 0,
            force,
            failed: false,
        }
    }

    /// Number of physical lines read so far.
    #[must_use]
    pub const fn line(&self) -> usize {
        self.line
    }

    /// True once any line has failed.
    #[must_use]
    pub const fn failed(&self) -> bool {
        self.failed
    }

    const fn advance(&mut self) {
        self.line = self.line.saturating_add(1);
    }

    /// Records a failed line and reports whether the run continues.
    const fn record_failure(&mut self) -> bool {
        self.failed = true;
        self.force
    }
}

/// Reads logical commands, joining lines that end in `\`.
struct ScriptReader<'a> {
    inner: &'a mut dyn BufRead,
}

impl<'a> ScriptReader<'a> {
    const fn new(inner: &'a mut dyn BufRead) -> Self {
        Self { inner }
    }

    /// The next command, or `None` at end of input.
    fn next_command(&mut self, progress: &mut BatchSession) -> io::Result<Option<String>> {
        let mut command = String::new();
        let mut started = false;
        loop {
            let mut line = String::new();
            if self.inner.read_line(&mut line)? == 0 {
                return Ok(started.then_some(command));
            }
            progress.advance();
            started = true;
            let content = line.trim_end_matches(['\n', '\r']);
            if let Some(head) = content.strip_suffix('\\') {
                command.push_str(head);
                continue;
            }
            command.push_str(content);
            return Ok(Some(command));
        }
    }
}

/// Replays scripts through a dispatcher inside one session.
pub struct BatchEngine<'a, O, R> {
    lifecycle: &'a SessionLifecycle<O>,
    dispatcher: &'a mut Dispatcher<R>,
    force: bool,
}

impl<'a, O: ChannelOpener, R: ObjectRoutines> BatchEngine<'a, O, R> {
    /// Creates an engine; `force` keeps going after failing lines.
    #[must_use]
    pub const fn new(
        lifecycle: &'a SessionLifecycle<O>,
        dispatcher: &'a mut Dispatcher<R>,
        force: bool,
    ) -> Self {
        Self {
            lifecycle,
            dispatcher,
            force,
        }
    }

    /// Runs the script from `source`; `stdin` serves [`BatchSource::Stdin`].
    pub fn run(
        &mut self,
        source: &BatchSource,
        stdin: &mut dyn BufRead,
        out: &mut CommandOutput<'_>,
    ) -> ExitCode {
        match source {
            BatchSource::Stdin => self.replay(source, stdin, out),
            BatchSource::File(path) => match File::open(path) {
                Ok(file) => self.replay(source, &mut BufReader::new(file), out),
                Err(error) => {
                    out.report(format_args!(
                        "Cannot open file \"{path}\" for reading: {error}"
                    ));
                    ExitCode::FAILURE
                }
            },
        }
    }

    fn replay(
        &mut self,
        source: &BatchSource,
        reader: &mut dyn BufRead,
        out: &mut CommandOutput<'_>,
    ) -> ExitCode {
        let mut session = match self.lifecycle.start() {
            Ok(session) => session,
            Err(error) => {
                out.report(format_args!("{error}"));
                return ExitCode::FAILURE;
            }
        };

        let mut progress = BatchSession::new(self.force);
        let mut script = ScriptReader::new(reader);
        loop {
            let command = match script.next_command(&mut progress) {
                Ok(Some(command)) => command,
                Ok(None) => break,
                Err(error) => {
                    out.report(format_args!("Cannot read \"{source}\": {error}"));
                    progress.record_failure();
                    break;
                }
            };
            let outcome = tokenize(&command)
                .map_err(CommandError::from)
                .and_then(|args| self.dispatcher.dispatch(&mut session, &args, out));
            if let Err(error) = outcome {
                debug!(target: "tc::batch", line = progress.line(), %error, "command failed");
                out.report(format_args!("{error}"));
                out.report(format_args!("Command failed {source}:{}", progress.line()));
                if !progress.record_failure() {
                    break;
                }
            }
        }

        self.lifecycle.stop(session);
        if progress.failed() {
            ExitCode::FAILURE
        } else {
            ExitCode::SUCCESS
        }
    }
}
