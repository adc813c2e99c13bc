//! Command-line runtime for the `tc` traffic-control frontend.
//!
//! The runtime splits leading configuration flags off the command line,
//! loads configuration, parses the global tc options and then either runs a
//! single command or replays a batch script. Commands are routed by the
//! [`Dispatcher`] to [`ObjectRoutines`], which drive the handler resolver and
//! the control channel owned by the [`Session`]. Configuration loading, the
//! channel and the routines are all substitutable so tests can exercise the
//! runtime without a kernel.

use std::ffi::OsString;
use std::io::{BufRead, Write};
use std::process::ExitCode;

use tc_config::Config;

mod abbrev;
pub mod batch;
mod config;
pub mod dispatch;
mod errors;
pub mod logging;
pub mod names;
mod netns;
mod options;
pub mod output;
pub mod routines;
pub mod session;
mod tokenizer;

#[cfg(test)]
mod tests;

pub use self::batch::{BatchEngine, BatchSession, BatchSource};
use self::config::{ConfigLoader, OrthoConfigLoader, split_config_arguments};
pub use self::dispatch::{Dispatcher, ObjectKind};
use self::errors::AppError;
pub use self::errors::CommandError;
pub use self::names::{ClassNames, NamesError};
pub use self::netns::NetnsError;
use self::options::{GlobalOptions, Invocation, USAGE};
pub use self::options::{DisplayOptions, OptionsError};
pub use self::output::CommandOutput;
pub use self::routines::{KernelRoutines, ObjectRoutines};
pub use self::session::{ChannelOpener, NetlinkOpener, Session, SessionError, SessionLifecycle};
pub use self::tokenizer::TokenizeError;

/// CLI flags recognised by the configuration loader.
///
/// MAINTENANCE: keep in sync with the fields of `tc_config::Config`.
const CONFIG_CLI_FLAGS: &[&str] = &[
    "--config-path",
    "--lib-dir",
    "--names-path",
    "--netns-dir",
    "--log-filter",
    "--log-format",
];

/// The standard streams handed to the runtime.
pub(crate) struct IoStreams<'a> {
    stdin: &'a mut dyn BufRead,
    stdout: &'a mut dyn Write,
    stderr: &'a mut dyn Write,
}

impl<'a> IoStreams<'a> {
    pub(crate) const fn new(
        stdin: &'a mut dyn BufRead,
        stdout: &'a mut dyn Write,
        stderr: &'a mut dyn Write,
    ) -> Self {
        Self {
            stdin,
            stdout,
            stderr,
        }
    }
}

struct CliRunner<'a, L, O, R> {
    io: IoStreams<'a>,
    loader: &'a L,
    opener: O,
    dispatcher: Dispatcher<R>,
}

impl<'a, L, O, R> CliRunner<'a, L, O, R>
where
    L: ConfigLoader,
    O: ChannelOpener + Clone,
    R: ObjectRoutines,
{
    const fn new(io: IoStreams<'a>, loader: &'a L, opener: O, routines: R) -> Self {
        Self {
            io,
            loader,
            opener,
            dispatcher: Dispatcher::new(routines),
        }
    }

    fn run<I>(&mut self, args: I) -> ExitCode
    where
        I: IntoIterator<Item = OsString>,
    {
        let args: Vec<OsString> = args.into_iter().collect();
        match self.execute(&args) {
            Ok(exit_code) => exit_code,
            Err(error) => {
                CommandOutput::new(&mut *self.io.stdout, &mut *self.io.stderr)
                    .report(format_args!("{error}"));
                ExitCode::FAILURE
            }
        }
    }

    fn execute(&mut self, args: &[OsString]) -> Result<ExitCode, AppError> {
        let split = split_config_arguments(args);
        let config = self.loader.load(&split.config_arguments)?;
        logging::initialise(&config)?;

        let words = tc_words(args.get(split.command_start..).unwrap_or_default())?;
        match options::parse(&words)? {
            Invocation::Version => {
                writeln!(self.io.stdout, "tc utility, tc-rs {}", env!("CARGO_PKG_VERSION"))
                    .map_err(AppError::Output)?;
                Ok(ExitCode::SUCCESS)
            }
            Invocation::Help | Invocation::Bare(_) => {
                writeln!(self.io.stderr, "{USAGE}").map_err(AppError::Output)?;
                Ok(ExitCode::SUCCESS)
            }
            Invocation::Batch { options, file } => {
                let lifecycle = self.prepare(&config, &options)?;
                let source = BatchSource::from_name(&file);
                let mut out = CommandOutput::new(&mut *self.io.stdout, &mut *self.io.stderr);
                let mut engine = BatchEngine::new(&lifecycle, &mut self.dispatcher, options.force);
                Ok(engine.run(&source, &mut *self.io.stdin, &mut out))
            }
            Invocation::Command { options, args } => {
                let lifecycle = self.prepare(&config, &options)?;
                let mut session = lifecycle.start()?;
                let mut out = CommandOutput::new(&mut *self.io.stdout, &mut *self.io.stderr);
                let result = self.dispatcher.dispatch(&mut session, &args, &mut out);
                lifecycle.stop(session);
                result?;
                Ok(ExitCode::SUCCESS)
            }
        }
    }

    /// Enters the requested namespace and describes the session to start.
    fn prepare(
        &self,
        config: &Config,
        options: &GlobalOptions,
    ) -> Result<SessionLifecycle<O>, AppError> {
        if let Some(name) = &options.netns {
            netns::switch(config.netns_dir(), name)?;
        }
        let lifecycle =
            SessionLifecycle::new(self.opener.clone(), config.lib_dir(), options.display);
        if !options.use_names {
            return Ok(lifecycle);
        }
        let Some(path) = options.names_path.clone() else {
            return Ok(lifecycle.with_default_names(config.names_path()));
        };
        Ok(lifecycle.with_names(path))
    }
}

fn tc_words(args: &[OsString]) -> Result<Vec<String>, AppError> {
    args.iter()
        .map(|argument| {
            argument
                .clone()
                .into_string()
                .map_err(|raw| AppError::NonUtf8Argument {
                    argument: raw.to_string_lossy().into_owned(),
                })
        })
        .collect()
}

/// Runs `tc` with `args` (program name first) against the given streams.
#[must_use]
pub fn run<I, R, W, E>(args: I, stdin: &mut R, stdout: &mut W, stderr: &mut E) -> ExitCode
where
    I: IntoIterator<Item = OsString>,
    R: BufRead,
    W: Write,
    E: Write,
{
    let io = IoStreams::new(stdin, stdout, stderr);
    CliRunner::new(io, &OrthoConfigLoader, NetlinkOpener, KernelRoutines).run(args)
}
