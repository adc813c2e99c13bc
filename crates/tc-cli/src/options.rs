//! Global option parsing.
//!
//! Options precede the object keyword and are processed left to right. Each
//! word selects the first option in [`FLAGS`] order that it abbreviates, which
//! is why `-n` means `-netns` and `-nm` still reaches the names switch.

use camino::Utf8PathBuf;
use thiserror::Error;

use crate::abbrev::first_match;

/// Top-level usage text, printed on standard error.
pub(crate) const USAGE: &str = "\
Usage: tc [ OPTIONS ] OBJECT { COMMAND | help }
       tc [-force] -batch filename
where  OBJECT := { qdisc | class | filter | actions | monitor | exec }
       OPTIONS := { -V[ersion] | -s[tatistics] | -d[etails] | -r[aw] |
                    -p[retty] | -g[raph] | -i[ec] | -f[orce] |
                    -b[atch] [filename] | -n[etns] name |
                    -nm | -nam[es] | { -cf | -conf } path |
                    -t[imestamp] | -ts[hort] }";

/// Switches that change how objects are printed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DisplayOptions {
    /// `-stats` repetitions.
    pub stats: u32,
    /// `-details` repetitions.
    pub details: u32,
    /// `-raw` repetitions.
    pub raw: u32,
    /// `-pretty` repetitions.
    pub pretty: u32,
    /// `-graph` was given.
    pub graph: bool,
    /// `-iec` repetitions.
    pub iec: u32,
    /// `-timestamp` or `-tshort` repetitions.
    pub timestamp: u32,
    /// `-tshort` was given.
    pub timestamp_short: bool,
}

/// Every global option seen before the object keyword.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct GlobalOptions {
    pub(crate) display: DisplayOptions,
    pub(crate) force: bool,
    pub(crate) netns: Option<String>,
    pub(crate) use_names: bool,
    pub(crate) names_path: Option<Utf8PathBuf>,
}

/// What the command line asks for once options are consumed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Invocation {
    /// `-Version`.
    Version,
    /// `-help`.
    Help,
    /// No object keyword followed the options.
    Bare(GlobalOptions),
    /// `-batch FILE`.
    Batch { options: GlobalOptions, file: String },
    /// A single command starting with the object keyword.
    Command { options: GlobalOptions, args: Vec<String> },
}

/// Rejected global options.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OptionsError {
    /// The word abbreviates no known option.
    #[error("Option \"{option}\" is unknown, try \"tc -help\".")]
    Unknown {
        /// Word as typed.
        option: String,
    },
    /// An option that takes a value ended the line.
    #[error("Command line is not complete. Try option \"help\"")]
    Incomplete,
    /// The option combination is only explained by the usage text.
    #[error("{}", USAGE)]
    Usage,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flag {
    Stats,
    Details,
    Raw,
    Pretty,
    Graph,
    Version,
    Iec,
    Help,
    Force,
    Batch,
    Netns,
    Names,
    ConfFile,
    Timestamp,
    TimestampShort,
}

const FLAGS: &[(&str, Flag)] = &[
    ("-stats", Flag::Stats),
    ("-statistics", Flag::Stats),
    ("-details", Flag::Details),
    ("-raw", Flag::Raw),
    ("-pretty", Flag::Pretty),
    ("-graph", Flag::Graph),
    ("-Version", Flag::Version),
    ("-iec", Flag::Iec),
    ("-help", Flag::Help),
    ("-force", Flag::Force),
    ("-batch", Flag::Batch),
    ("-netns", Flag::Netns),
    ("-names", Flag::Names),
    ("-nm", Flag::Names),
    ("-cf", Flag::ConfFile),
    ("-conf", Flag::ConfFile),
    ("-timestamp", Flag::Timestamp),
    ("-tshort", Flag::TimestampShort),
];

/// Consumes global options and classifies the invocation.
pub(crate) fn parse(args: &[String]) -> Result<Invocation, OptionsError> {
    let mut options = GlobalOptions::default();
    let mut batch = None;
    let mut remaining = args;

    while let Some((word, tail)) = remaining.split_first() {
        if !word.starts_with('-') {
            break;
        }
        remaining = tail;
        let flag = (word != "-")
            .then(|| first_match(word, FLAGS))
            .flatten()
            .ok_or_else(|| OptionsError::Unknown {
                option: word.clone(),
            })?;
        let display = &mut options.display;
        match flag {
            Flag::Stats => display.stats = display.stats.saturating_add(1),
            Flag::Details => display.details = display.details.saturating_add(1),
            Flag::Raw => display.raw = display.raw.saturating_add(1),
            Flag::Pretty => display.pretty = display.pretty.saturating_add(1),
            Flag::Graph => display.graph = true,
            Flag::Iec => display.iec = display.iec.saturating_add(1),
            Flag::Timestamp => display.timestamp = display.timestamp.saturating_add(1),
            Flag::TimestampShort => {
                display.timestamp = display.timestamp.saturating_add(1);
                display.timestamp_short = true;
            }
            Flag::Version => return Ok(Invocation::Version),
            Flag::Help => return Ok(Invocation::Help),
            Flag::Force => options.force = true,
            Flag::Names => options.use_names = true,
            Flag::Batch => {
                let (file, after) = remaining.split_first().ok_or(OptionsError::Usage)?;
                batch = Some(file.clone());
                remaining = after;
            }
            Flag::Netns => {
                let (name, after) = remaining.split_first().ok_or(OptionsError::Incomplete)?;
                options.netns = Some(name.clone());
                remaining = after;
            }
            Flag::ConfFile => {
                let (path, after) = remaining.split_first().ok_or(OptionsError::Incomplete)?;
                options.names_path = Some(Utf8PathBuf::from(path));
                remaining = after;
            }
        }
    }

    if let Some(file) = batch {
        return Ok(Invocation::Batch { options, file });
    }
    if remaining.is_empty() {
        return Ok(Invocation::Bare(options));
    }
    Ok(Invocation::Command {
        options,
        args: remaining.to_vec(),
    })
}
