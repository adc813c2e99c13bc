//! Configuration loading helpers for the `tc` binary.
//!
//! Leading `--` flags naming configuration keys are split off and handed to
//! `ortho_config`; everything from the first other word onwards is the tc
//! command line proper.

use std::ffi::{OsStr, OsString};

use ortho_config::OrthoConfig as _;
use tc_config::Config;

use crate::errors::AppError;

pub(crate) trait ConfigLoader {
    /// Loads configuration for the CLI.
    ///
    /// Configuration flags (listed in `CONFIG_CLI_FLAGS`) must precede the tc
    /// options; later occurrences are treated as tc words.
    fn load(&self, args: &[OsString]) -> Result<Config, AppError>;
}

pub(crate) struct OrthoConfigLoader;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FlagAction {
    Include { needs_value: bool },
    Skip,
}

impl ConfigLoader for OrthoConfigLoader {
    fn load(&self, args: &[OsString]) -> Result<Config, AppError> {
        Config::load_from_iter(args.iter().cloned()).map_err(AppError::LoadConfiguration)
    }
}

impl OrthoConfigLoader {
    fn process_config_flag(argument: &OsStr) -> FlagAction {
        let argument_text = argument.to_string_lossy();
        if !argument_text.starts_with("--") {
            return FlagAction::Skip;
        }

        let (flag, has_inline_value) = argument_text
            .split_once('=')
            .map_or((&*argument_text, false), |(flag, _)| (flag, true));

        if super::CONFIG_CLI_FLAGS.contains(&flag) {
            return FlagAction::Include {
                needs_value: !has_inline_value,
            };
        }

        FlagAction::Skip
    }
}

pub(crate) struct ConfigArgumentSplit {
    pub(crate) config_arguments: Vec<OsString>,
    pub(crate) command_start: usize,
}

pub(crate) fn split_config_arguments(args: &[OsString]) -> ConfigArgumentSplit {
    let Some((program, rest)) = args.split_first() else {
        return ConfigArgumentSplit {
            config_arguments: Vec::new(),
            command_start: 0,
        };
    };

    let mut filtered = vec![program.clone()];
    let mut command_start = 1usize;
    let mut pending_value = false;

    for argument in rest {
        if pending_value {
            filtered.push(argument.clone());
            pending_value = false;
            command_start = command_start.saturating_add(1);
            continue;
        }

        match OrthoConfigLoader::process_config_flag(argument.as_os_str()) {
            FlagAction::Include { needs_value } => {
                filtered.push(argument.clone());
                command_start = command_start.saturating_add(1);
                pending_value = needs_value;
            }
            FlagAction::Skip => break,
        }
    }

    ConfigArgumentSplit {
        config_arguments: filtered,
        command_start,
    }
}
