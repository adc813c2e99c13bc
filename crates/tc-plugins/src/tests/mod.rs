//! Crate-level integration and BDD tests.

use std::sync::Arc;

use tc_netlink::TcRequest;
use tc_netlink::consts::{NLM_F_REQUEST, RTM_NEWQDISC, TCA_OPTIONS};

use crate::extension::{BuiltinImage, ExtensionCatalog, Exports};
use crate::resolver::PluginResolver;
use crate::stub::UnknownQdisc;

mod behaviour;

#[test]
fn installed_unit_overrides_linked_handler() {
    let mut catalog = ExtensionCatalog::bundled("/usr/lib/tc");
    catalog.install(
        "q_pfifo.so",
        Exports::new().with_qdisc(Arc::new(UnknownQdisc::new("pfifo"))),
    );
    let mut resolver = PluginResolver::new("/usr/lib/tc", catalog, BuiltinImage);

    let handler = resolver.qdisc("pfifo");
    let mut request = TcRequest::new(RTM_NEWQDISC, NLM_F_REQUEST);
    let err = handler
        .parse_options(&[String::from("limit"), String::from("5")], &mut request)
        .expect_err("unit handler is the stub");
    assert!(err.to_string().starts_with("Unknown qdisc \"pfifo\""));
}

#[test]
fn linked_handler_fills_request() {
    let mut resolver = PluginResolver::with_bundled("/usr/lib/tc");
    let handler = resolver.qdisc("bfifo");
    let mut request = TcRequest::new(RTM_NEWQDISC, NLM_F_REQUEST);
    handler
        .parse_options(&[String::from("limit"), String::from("1k")], &mut request)
        .expect("options parse");
    assert_eq!(request.attribute(TCA_OPTIONS), Some(&1024u32.to_ne_bytes()[..]));
}
