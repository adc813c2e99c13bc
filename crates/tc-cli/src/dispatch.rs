//! Routing of a command's first word to its object routine.

use crate::abbrev::unambiguous;
use crate::errors::CommandError;
use crate::options::USAGE;
use crate::output::CommandOutput;
use crate::routines::ObjectRoutines;
use crate::session::Session;

/// Objects a command can address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectKind {
    /// Queueing disciplines.
    Qdisc,
    /// Classes of classful qdiscs.
    Class,
    /// Classifiers.
    Filter,
    /// Filter actions.
    Actions,
    /// Event stream.
    Monitor,
    /// Program execution.
    Exec,
    /// Top-level usage.
    Help,
}

impl ObjectKind {
    /// Every object with its keyword.
    pub const ALL: [(&'static str, Self); 7] = [
        ("qdisc", Self::Qdisc),
        ("class", Self::Class),
        ("filter", Self::Filter),
        ("actions", Self::Actions),
        ("monitor", Self::Monitor),
        ("exec", Self::Exec),
        ("help", Self::Help),
    ];

    /// The object `word` names, exactly or by unambiguous prefix.
    #[must_use]
    pub fn lookup(word: &str) -> Option<Self> {
        unambiguous(word, &Self::ALL)
    }
}

/// Routes commands to a set of object routines.
#[derive(Debug, Default)]
pub struct Dispatcher<R> {
    routines: R,
}

impl<R: ObjectRoutines> Dispatcher<R> {
    /// Wraps `routines`.
    #[must_use]
    pub const fn new(routines: R) -> Self {
        Self { routines }
    }

    /// Runs one command. `args` starts with the object keyword; an empty
    /// command succeeds without doing anything.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError::UnknownObject`] for an unrecognised keyword and
    /// otherwise whatever the routine reports.
    pub fn dispatch(
        &mut self,
        session: &mut Session,
        args: &[String],
        out: &mut CommandOutput<'_>,
    ) -> Result<(), CommandError> {
        let Some((keyword, rest)) = args.split_first() else {
            return Ok(());
        };
        let Some(object) = ObjectKind::lookup(keyword) else {
            return Err(CommandError::UnknownObject {
                keyword: keyword.clone(),
            });
        };
        match object {
            ObjectKind::Qdisc => self.routines.qdisc(session, rest, out),
            ObjectKind::Class => self.routines.class(session, rest, out),
            ObjectKind::Filter => self.routines.filter(session, rest, out),
            ObjectKind::Actions => self.routines.actions(session, rest, out),
            ObjectKind::Monitor => self.routines.monitor(session, rest, out),
            ObjectKind::Exec => self.routines.exec(session, rest, out),
            ObjectKind::Help => {
                out.stderr_line(format_args!("{USAGE}"))?;
                Ok(())
            }
        }
    }

    /// The wrapped routines.
    #[must_use]
    pub const fn routines(&self) -> &R {
        &self.routines
    }
}
