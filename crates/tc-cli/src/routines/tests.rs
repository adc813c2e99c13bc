//! Tests for the object routines against an in-memory channel.

use std::sync::Arc;

use rstest::{fixture, rstest};
use tc_netlink::attr::{attributes, read_str, read_u32};
use tc_netlink::consts::{
    NLA_F_NESTED, NLM_F_CREATE, NLM_F_DUMP, NLM_F_EXCL, NLM_F_REPLACE, NLM_F_REQUEST,
    RTM_DELQDISC, RTM_DELTFILTER, RTM_GETQDISC, RTM_NEWQDISC, RTM_NEWTCLASS, RTM_NEWTFILTER,
    TC_H_INGRESS, TC_H_ROOT, TCA_KIND, TCA_OPTIONS,
};
use tc_netlink::{TcMsg, TcStats};
use tc_plugins::builtin::drr::TCA_DRR_QUANTUM;
use tc_plugins::builtin::matchall::TCA_MATCHALL_CLASSID;

use super::{KernelRoutines, ObjectRoutines, protocol};
use crate::errors::CommandError;
use crate::options::DisplayOptions;
use crate::tests::support::{Captured, ChannelLog, message, session, words};

struct Harness {
    log: Arc<ChannelLog>,
    display: DisplayOptions,
    captured: Captured,
}

impl Harness {
    fn run(&mut self, line: &str) -> Result<(), CommandError> {
        let mut session = session(&self.log, self.display);
        let args = words(line);
        let (object, rest) = args.split_first().expect("object keyword");
        let mut out = self.captured.output();
        let mut routines = KernelRoutines;
        match object.as_str() {
            "qdisc" => routines.qdisc(&mut session, rest, &mut out),
            "class" => routines.class(&mut session, rest, &mut out),
            "filter" => routines.filter(&mut session, rest, &mut out),
            "actions" => routines.actions(&mut session, rest, &mut out),
            "monitor" => routines.monitor(&mut session, rest, &mut out),
            "exec" => routines.exec(&mut session, rest, &mut out),
            other => panic!("unexpected object {other}"),
        }
    }

    fn failure(&mut self, line: &str) -> String {
        self.run(line).expect_err("command should fail").to_string()
    }
}

#[fixture]
fn harness() -> Harness {
    Harness {
        log: ChannelLog::shared(),
        display: DisplayOptions::default(),
        captured: Captured::default(),
    }
}

fn kind(request: &tc_netlink::TcRequest) -> Option<&str> {
    request.attribute(TCA_KIND).and_then(read_str)
}

// ---------------------------------------------------------------------------
// qdisc
// ---------------------------------------------------------------------------

#[rstest]
fn qdisc_add_builds_a_create_request(mut harness: Harness) {
    harness
        .run("qdisc add dev lo root pfifo limit 10")
        .expect("add succeeds");

    let request = harness.log.last_request();
    assert_eq!(request.message_type(), RTM_NEWQDISC);
    assert_eq!(request.flags(), NLM_F_REQUEST | NLM_F_EXCL | NLM_F_CREATE);
    assert_eq!(request.header().ifindex, 1);
    assert_eq!(request.header().parent, TC_H_ROOT);
    assert_eq!(kind(&request), Some("pfifo"));
    assert_eq!(request.attribute(TCA_OPTIONS).and_then(read_u32), Some(10));
}

#[rstest]
#[case("qdisc del dev lo root", RTM_DELQDISC, 0)]
#[case("qdisc replace dev lo root pfifo", RTM_NEWQDISC, NLM_F_CREATE | NLM_F_REPLACE)]
#[case("qdisc l dev lo root pfifo", RTM_NEWQDISC, NLM_F_REPLACE)]
#[case("qdisc c dev lo root pfifo", RTM_NEWQDISC, 0)]
fn qdisc_subcommands_select_message_and_flags(
    mut harness: Harness,
    #[case] line: &str,
    #[case] message_type: u16,
    #[case] flags: u16,
) {
    harness.run(line).expect("command succeeds");
    let request = harness.log.last_request();
    assert_eq!(request.message_type(), message_type);
    assert_eq!(request.flags(), NLM_F_REQUEST | flags);
}

#[rstest]
fn qdisc_handle_and_bundled_unit_kind(mut harness: Harness) {
    harness
        .run("qdisc add dev eth0 handle 1: root prio bands 4")
        .expect("add succeeds");
    let request = harness.log.last_request();
    assert_eq!(request.header().handle, 0x0001_0000);
    assert_eq!(request.header().ifindex, 2);
    assert_eq!(kind(&request), Some("prio"));
}

#[rstest]
fn ingress_sets_parent_and_handle(mut harness: Harness) {
    harness.run("qdisc add dev lo ingress").expect("add succeeds");
    let request = harness.log.last_request();
    assert_eq!(request.header().parent, TC_H_INGRESS);
    assert_eq!(request.header().handle, 0xffff_0000);
    assert_eq!(kind(&request), Some("ingress"));
}

#[rstest]
#[case(
    "qdisc add dev lo dev eth0 root pfifo",
    "Error: duplicate \"dev\": \"eth0\" is the second value."
)]
#[case("qdisc add dev nosuch root pfifo", "Cannot find device \"nosuch\"")]
#[case("qdisc add dev", "Command line is not complete. Try option \"help\"")]
#[case(
    "qdisc add dev lo handle 1:2 root pfifo",
    "Error: argument \"1:2\" is wrong: invalid qdisc ID"
)]
#[case("qdisc frob", "Command \"frob\" is unknown, try \"tc qdisc help\".")]
#[case(
    "qdisc add dev lo root sfq quantum 1",
    "Unknown qdisc \"sfq\", hence option \"quantum\" is unparsable"
)]
#[case("qdisc show bogus", "What is \"bogus\"? Try \"tc qdisc help\".")]
fn qdisc_rejections(mut harness: Harness, #[case] line: &str, #[case] message: &str) {
    assert_eq!(harness.failure(line), message);
    assert!(harness.log.requests().is_empty(), "nothing should be sent");
}

#[rstest]
fn qdisc_help_is_usage(mut harness: Harness) {
    let error = harness.run("qdisc help").expect_err("help fails");
    assert!(matches!(error, CommandError::Usage { .. }));
    assert!(error.to_string().starts_with("Usage: tc qdisc"));
}

#[rstest]
#[case("qdisc add dev lo root help")]
#[case("class add dev lo parent 1: classid 1:10 help")]
#[case("filter add dev lo parent 1: help")]
fn help_at_the_kind_position_is_usage(mut harness: Harness, #[case] line: &str) {
    let error = harness.run(line).expect_err("help fails");
    assert!(matches!(error, CommandError::Usage { .. }));
    assert!(harness.log.requests().is_empty());
}

#[rstest]
#[case("qdisc add dev lo root he", "he")]
#[case("filter add dev lo parent 1: h", "h")]
fn help_prefixes_are_kinds(mut harness: Harness, #[case] line: &str, #[case] expected: &str) {
    harness.run(line).expect("stub accepts no options");
    assert_eq!(kind(&harness.log.last_request()), Some(expected));
}

fn pfifo_message() -> tc_netlink::TcMessage {
    let header = TcMsg {
        ifindex: 1,
        handle: 0x0001_0000,
        parent: TC_H_ROOT,
        info: 2,
        ..TcMsg::default()
    };
    message(RTM_NEWQDISC, header, |request| {
        request.push_str(TCA_KIND, "pfifo");
        request.push_u32(TCA_OPTIONS, 10);
        request.push_attr(
            tc_netlink::consts::TCA_STATS,
            &TcStats {
                bytes: 1500,
                packets: 3,
                backlog: 64,
                qlen: 1,
                ..TcStats::default()
            }
            .to_bytes(),
        );
    })
}

#[rstest]
fn qdisc_show_dumps_and_prints(mut harness: Harness) {
    harness.log.queue_dump(vec![pfifo_message()]);
    harness.run("qdisc show dev lo").expect("show succeeds");

    let request = harness.log.last_request();
    assert_eq!(request.message_type(), RTM_GETQDISC);
    assert_eq!(request.flags(), NLM_F_REQUEST | NLM_F_DUMP);
    assert_eq!(request.header().ifindex, 1);
    assert_eq!(
        harness.captured.stdout_text(),
        "qdisc pfifo 1: dev lo root refcnt 2 limit 10p\n"
    );
}

#[rstest]
fn bare_qdisc_lists_everything(mut harness: Harness) {
    harness.log.queue_dump(vec![pfifo_message()]);
    harness.run("qdisc").expect("list succeeds");
    assert_eq!(harness.log.last_request().header().ifindex, 0);
    assert!(harness.captured.stdout_text().starts_with("qdisc pfifo 1:"));
}

#[rstest]
fn qdisc_show_filters_by_parent(mut harness: Harness) {
    harness.log.queue_dump(vec![pfifo_message()]);
    harness.run("qdisc show ingress").expect("show succeeds");
    assert_eq!(harness.captured.stdout_text(), "");
}

#[cfg(target_endian = "little")]
#[rstest]
fn statistics_and_raw_follow_the_listing(mut harness: Harness) {
    harness.display = DisplayOptions {
        stats: 1,
        raw: 1,
        ..DisplayOptions::default()
    };
    harness.log.queue_dump(vec![pfifo_message()]);
    harness.run("qdisc show").expect("show succeeds");
    assert_eq!(
        harness.captured.stdout_text(),
        "qdisc pfifo 1: dev lo root refcnt 2 limit 10p\n raw 0a000000\n \
         Sent 1500 bytes 3 pkt (dropped 0, overlimits 0) \n backlog 64b 1p \n"
    );
}

// ---------------------------------------------------------------------------
// class
// ---------------------------------------------------------------------------

#[rstest]
fn class_add_parses_class_options(mut harness: Harness) {
    harness
        .run("class add dev lo parent 1: classid 1:10 drr quantum 1500")
        .expect("add succeeds");

    let request = harness.log.last_request();
    assert_eq!(request.message_type(), RTM_NEWTCLASS);
    assert_eq!(request.header().parent, 0x0001_0000);
    assert_eq!(request.header().handle, 0x0001_0010);
    assert_eq!(kind(&request), Some("drr"));
    let options = request.attribute(TCA_OPTIONS).expect("options nest");
    let quantum = attributes(options)
        .find(|(kind, _)| *kind == TCA_DRR_QUANTUM)
        .and_then(|(_, value)| read_u32(value));
    assert_eq!(quantum, Some(1500));
}

#[rstest]
#[case(
    "class add dev lo parent 1: classid 1:1 pfifo",
    "Qdisc \"pfifo\" is classless."
)]
#[case(
    "class add dev lo handle 1:1 drr",
    "Error: try \"classid\" instead of \"handle\""
)]
#[case("class show", "Error: \"class show\" requires \"dev\".")]
fn class_rejections(mut harness: Harness, #[case] line: &str, #[case] message: &str) {
    assert_eq!(harness.failure(line), message);
    assert!(harness.log.requests().is_empty());
}

#[rstest]
fn class_show_prints_class_options(mut harness: Harness) {
    let header = TcMsg {
        ifindex: 1,
        handle: 0x0001_0010,
        parent: 0x0001_0000,
        ..TcMsg::default()
    };
    harness.log.queue_dump(vec![message(RTM_NEWTCLASS, header, |request| {
        request.push_str(TCA_KIND, "drr");
        let nest = request.begin_nest(TCA_OPTIONS | NLA_F_NESTED);
        request.push_u32(TCA_DRR_QUANTUM, 1514);
        request.end_nest(nest);
    })]);
    harness.run("class show dev lo").expect("show succeeds");
    assert_eq!(
        harness.captured.stdout_text(),
        "class drr 1:10 parent 1: quantum 1514b \n"
    );
}

// ---------------------------------------------------------------------------
// filter
// ---------------------------------------------------------------------------

#[rstest]
fn filter_add_packs_preference_and_protocol(mut harness: Harness) {
    harness
        .run("filter add dev lo parent 1: protocol ip pref 10 matchall classid 1:10")
        .expect("add succeeds");

    let request = harness.log.last_request();
    assert_eq!(request.message_type(), RTM_NEWTFILTER);
    assert_eq!(request.header().parent, 0x0001_0000);
    assert_eq!(request.header().info, protocol::pack_info(10, 0x0800));
    assert_eq!(kind(&request), Some("matchall"));
}

#[rstest]
fn filter_accepts_the_highest_preference(mut harness: Harness) {
    harness
        .run("filter add dev lo parent 1: protocol ip pref 65535 matchall classid 1:10")
        .expect("add succeeds");

    let info = harness.log.last_request().header().info;
    assert_eq!(info >> 16, 0xffff);
    assert_eq!(protocol::split_info(info), (0xffff, 0x0800));
}

#[rstest]
fn filter_handle_reaches_the_stub(mut harness: Harness) {
    harness
        .run("filter add dev lo parent 1: handle 0x2a u32")
        .expect("stub accepts a bare handle");
    let request = harness.log.last_request();
    assert_eq!(request.header().handle, 0x2a);
    assert_eq!(kind(&request), Some("u32"));
}

#[rstest]
#[case("filter add dev lo handle 1", "Must specify filter type when using \"handle\"")]
#[case("filter add dev lo handle zz u32", "Unparsable filter ID \"zz\"")]
#[case(
    "filter add dev lo protocol bogus matchall",
    "Error: argument \"bogus\" is wrong: invalid protocol"
)]
#[case(
    "filter add dev lo pref x matchall",
    "Error: argument \"x\" is wrong: invalid priority value"
)]
#[case(
    "filter add dev lo parent 1: protocol ip pref 65536 matchall classid 1:10",
    "Error: argument \"65536\" is wrong: invalid priority value"
)]
#[case("filter show", "Error: \"filter show\" requires \"dev\".")]
fn filter_rejections(mut harness: Harness, #[case] line: &str, #[case] message: &str) {
    assert_eq!(harness.failure(line), message);
    assert!(harness.log.requests().is_empty());
}

#[rstest]
fn filter_show_prints_handler_output(mut harness: Harness) {
    let header = TcMsg {
        ifindex: 1,
        handle: 1,
        parent: 0x0001_0000,
        info: protocol::pack_info(10, 0x0800),
        ..TcMsg::default()
    };
    harness.log.queue_dump(vec![message(RTM_NEWTFILTER, header, |request| {
        request.push_str(TCA_KIND, "matchall");
        let nest = request.begin_nest(TCA_OPTIONS | NLA_F_NESTED);
        request.push_u32(TCA_MATCHALL_CLASSID, 0x0001_0010);
        request.end_nest(nest);
    })]);
    harness.run("filter show dev lo").expect("show succeeds");
    assert_eq!(
        harness.captured.stdout_text(),
        "filter parent 1: protocol ip pref 10 matchall handle 0x1 flowid 1:10 \n"
    );
}

// ---------------------------------------------------------------------------
// monitor and unsupported objects
// ---------------------------------------------------------------------------

#[rstest]
fn monitor_prints_events_until_the_stream_ends(mut harness: Harness) {
    let deleted = message(
        RTM_DELTFILTER,
        TcMsg {
            ifindex: 2,
            parent: TC_H_ROOT,
            ..TcMsg::default()
        },
        |request| request.push_str(TCA_KIND, "u32"),
    );
    harness.log.queue_events(vec![pfifo_message()]);
    harness.log.queue_events(vec![deleted]);

    harness.run("monitor").expect("monitor ends cleanly");

    assert!(harness.log.subscribed());
    assert_eq!(
        harness.captured.stdout_text(),
        "qdisc pfifo 1: dev lo root refcnt 2 limit 10p\n\
         deleted filter dev eth0 root u32 \n"
    );
}

#[rstest]
#[case("actions list", "Object \"actions\" is not supported by this build.")]
#[case("exec bpf", "Object \"exec\" is not supported by this build.")]
#[case("monitor file x", "What is \"file\"? Try \"tc monitor help\".")]
fn unsupported_objects(mut harness: Harness, #[case] line: &str, #[case] message: &str) {
    assert_eq!(harness.failure(line), message);
}
