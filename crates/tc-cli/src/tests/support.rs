//! Test doubles shared by the CLI tests.

use std::collections::VecDeque;
use std::ffi::OsString;
use std::io;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use tc_config::Config;
use tc_netlink::{ChannelError, ControlChannel, TcMessage, TcMsg, TcRequest};

use crate::config::ConfigLoader;
use crate::errors::{AppError, CommandError};
use crate::options::DisplayOptions;
use crate::output::CommandOutput;
use crate::routines::ObjectRoutines;
use crate::session::{ChannelOpener, Session, SessionLifecycle};

// ---------------------------------------------------------------------------
// Control channel
// ---------------------------------------------------------------------------

/// Everything the fake channels did, shared with the test body.
#[derive(Debug, Default)]
pub(crate) struct ChannelLog {
    opened: AtomicUsize,
    closed: AtomicUsize,
    subscribed: AtomicBool,
    requests: Mutex<Vec<TcRequest>>,
    dumps: Mutex<VecDeque<Vec<TcMessage>>>,
    events: Mutex<VecDeque<Vec<TcMessage>>>,
}

impl ChannelLog {
    pub(crate) fn shared() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub(crate) fn opened(&self) -> usize {
        self.opened.load(Ordering::SeqCst)
    }

    pub(crate) fn closed(&self) -> usize {
        self.closed.load(Ordering::SeqCst)
    }

    pub(crate) fn subscribed(&self) -> bool {
        self.subscribed.load(Ordering::SeqCst)
    }

    pub(crate) fn requests(&self) -> Vec<TcRequest> {
        self.requests.lock().expect("requests lock").clone()
    }

    pub(crate) fn last_request(&self) -> TcRequest {
        self.requests().pop().expect("a request was sent")
    }

    pub(crate) fn queue_dump(&self, messages: Vec<TcMessage>) {
        self.dumps.lock().expect("dumps lock").push_back(messages);
    }

    pub(crate) fn queue_events(&self, messages: Vec<TcMessage>) {
        self.events.lock().expect("events lock").push_back(messages);
    }
}

/// In-memory channel knowing the interfaces `lo` (1) and `eth0` (2).
#[derive(Debug)]
pub(crate) struct FakeChannel {
    log: Arc<ChannelLog>,
}

const INTERFACES: &[(&str, u32)] = &[("lo", 1), ("eth0", 2)];

impl ControlChannel for FakeChannel {
    fn talk(&mut self, request: &TcRequest) -> Result<(), ChannelError> {
        self.log
            .requests
            .lock()
            .expect("requests lock")
            .push(request.clone());
        Ok(())
    }

    fn dump(&mut self, request: &TcRequest) -> Result<Vec<TcMessage>, ChannelError> {
        self.talk(request)?;
        Ok(self
            .log
            .dumps
            .lock()
            .expect("dumps lock")
            .pop_front()
            .unwrap_or_default())
    }

    fn subscribe(&mut self) -> Result<(), ChannelError> {
        self.log.subscribed.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn receive(&mut self) -> Result<Vec<TcMessage>, ChannelError> {
        Ok(self
            .log
            .events
            .lock()
            .expect("events lock")
            .pop_front()
            .unwrap_or_default())
    }

    fn interface_index(&self, name: &str) -> Result<u32, ChannelError> {
        INTERFACES
            .iter()
            .find(|(known, _)| *known == name)
            .map(|&(_, index)| index)
            .ok_or_else(|| ChannelError::unknown_device(name))
    }

    fn interface_name(&self, index: u32) -> Option<String> {
        INTERFACES
            .iter()
            .find(|&&(_, known)| known == index)
            .map(|&(name, _)| name.to_owned())
    }

    fn close(self: Box<Self>) {
        self.log.closed.fetch_add(1, Ordering::SeqCst);
    }
}

/// Opens [`FakeChannel`]s, or fails every time when `fail` is set.
#[derive(Debug, Clone)]
pub(crate) struct FakeOpener {
    log: Arc<ChannelLog>,
    fail: bool,
}

impl FakeOpener {
    pub(crate) fn new(log: &Arc<ChannelLog>) -> Self {
        Self {
            log: Arc::clone(log),
            fail: false,
        }
    }

    pub(crate) fn failing(log: &Arc<ChannelLog>) -> Self {
        Self {
            log: Arc::clone(log),
            fail: true,
        }
    }
}

impl ChannelOpener for FakeOpener {
    fn open(&self) -> Result<Box<dyn ControlChannel>, ChannelError> {
        if self.fail {
            return Err(ChannelError::Open(io::Error::from(
                io::ErrorKind::PermissionDenied,
            )));
        }
        self.log.opened.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(FakeChannel {
            log: Arc::clone(&self.log),
        }))
    }
}

/// A started session over a [`FakeChannel`].
pub(crate) fn session(log: &Arc<ChannelLog>, display: DisplayOptions) -> Session {
    SessionLifecycle::new(FakeOpener::new(log), "/usr/lib/tc", display)
        .start()
        .expect("session starts")
}

/// A kernel message as the channel would decode it.
pub(crate) fn message(
    message_type: u16,
    header: TcMsg,
    build: impl FnOnce(&mut TcRequest),
) -> TcMessage {
    let mut request = TcRequest::new(message_type, 0);
    *request.header_mut() = header;
    build(&mut request);
    TcMessage::from(request)
}

// ---------------------------------------------------------------------------
// Routines
// ---------------------------------------------------------------------------

/// Records every routine call; a call whose words include `fail` fails.
#[derive(Debug, Default)]
pub(crate) struct RecordingRoutines {
    pub(crate) calls: Vec<(&'static str, Vec<String>)>,
}

impl RecordingRoutines {
    pub(crate) fn objects(&self) -> Vec<&'static str> {
        self.calls.iter().map(|(object, _)| *object).collect()
    }

    fn record(&mut self, object: &'static str, args: &[String]) -> Result<(), CommandError> {
        self.calls.push((object, args.to_vec()));
        if args.iter().any(|word| word == "fail") {
            return Err(CommandError::InvalidArgument {
                value: "fail".to_owned(),
                what: "requested failure",
            });
        }
        Ok(())
    }
}

impl ObjectRoutines for RecordingRoutines {
    fn qdisc(
        &mut self,
        _session: &mut Session,
        args: &[String],
        _out: &mut CommandOutput<'_>,
    ) -> Result<(), CommandError> {
        self.record("qdisc", args)
    }

    fn class(
        &mut self,
        _session: &mut Session,
        args: &[String],
        _out: &mut CommandOutput<'_>,
    ) -> Result<(), CommandError> {
        self.record("class", args)
    }

    fn filter(
        &mut self,
        _session: &mut Session,
        args: &[String],
        _out: &mut CommandOutput<'_>,
    ) -> Result<(), CommandError> {
        self.record("filter", args)
    }

    fn actions(
        &mut self,
        _session: &mut Session,
        args: &[String],
        _out: &mut CommandOutput<'_>,
    ) -> Result<(), CommandError> {
        self.record("actions", args)
    }

    fn monitor(
        &mut self,
        _session: &mut Session,
        args: &[String],
        _out: &mut CommandOutput<'_>,
    ) -> Result<(), CommandError> {
        self.record("monitor", args)
    }

    fn exec(
        &mut self,
        _session: &mut Session,
        args: &[String],
        _out: &mut CommandOutput<'_>,
    ) -> Result<(), CommandError> {
        self.record("exec", args)
    }
}

// ---------------------------------------------------------------------------
// Streams and arguments
// ---------------------------------------------------------------------------

pub(crate) fn words(line: &str) -> Vec<String> {
    line.split_whitespace().map(str::to_owned).collect()
}

pub(crate) fn os_args(line: &str) -> Vec<OsString> {
    line.split_whitespace().map(OsString::from).collect()
}

/// Captured standard output and standard error.
#[derive(Debug, Default)]
pub(crate) struct Captured {
    pub(crate) stdout: Vec<u8>,
    pub(crate) stderr: Vec<u8>,
}

impl Captured {
    pub(crate) fn output(&mut self) -> CommandOutput<'_> {
        CommandOutput::new(&mut self.stdout, &mut self.stderr)
    }

    pub(crate) fn stdout_text(&self) -> String {
        String::from_utf8(self.stdout.clone()).expect("utf-8 stdout")
    }

    pub(crate) fn stderr_text(&self) -> String {
        String::from_utf8(self.stderr.clone()).expect("utf-8 stderr")
    }
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Hands out a fixed configuration and records the arguments it was given.
#[derive(Debug, Default)]
pub(crate) struct StaticConfigLoader {
    config: Config,
    seen: Mutex<Vec<OsString>>,
}

impl StaticConfigLoader {
    pub(crate) fn new(config: Config) -> Self {
        Self {
            config,
            seen: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn seen(&self) -> Vec<OsString> {
        self.seen.lock().expect("seen lock").clone()
    }
}

impl ConfigLoader for StaticConfigLoader {
    fn load(&self, args: &[OsString]) -> Result<Config, AppError> {
        self.seen.lock().expect("seen lock").extend_from_slice(args);
        Ok(self.config.clone())
    }
}
