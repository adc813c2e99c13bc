//! Behaviour-driven tests for handler resolution.

use std::sync::Arc;

use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use tc_netlink::TcRequest;
use tc_netlink::consts::{NLM_F_REQUEST, RTM_NEWQDISC};

use crate::extension::{BuiltinImage, ExtensionCatalog};
use crate::handler::{FilterHandler, QdiscHandler};
use crate::resolver::PluginResolver;

// ---------------------------------------------------------------------------
// Test world
// ---------------------------------------------------------------------------

#[derive(Default)]
struct TestWorld {
    resolver: Option<PluginResolver>,
    qdiscs: Vec<Arc<dyn QdiscHandler>>,
    filter: Option<Arc<dyn FilterHandler>>,
}

#[fixture]
fn world() -> TestWorld {
    TestWorld::default()
}

fn resolver(world: &mut TestWorld) -> &mut PluginResolver {
    world.resolver.as_mut().expect("resolver configured")
}

fn first_qdisc(world: &TestWorld) -> &Arc<dyn QdiscHandler> {
    world.qdiscs.first().expect("qdisc resolved")
}

// ---------------------------------------------------------------------------
// Given steps
// ---------------------------------------------------------------------------

#[given("a resolver for extension directory {dir}")]
fn given_resolver(world: &mut TestWorld, dir: String) {
    world.resolver = Some(PluginResolver::with_bundled(dir.trim_matches('"')));
}

#[given("a resolver whose units live in {units} but which probes {probed}")]
fn given_mismatched_resolver(world: &mut TestWorld, units: String, probed: String) {
    let catalog = ExtensionCatalog::bundled(units.trim_matches('"'));
    world.resolver = Some(PluginResolver::new(
        probed.trim_matches('"'),
        catalog,
        BuiltinImage,
    ));
}

// ---------------------------------------------------------------------------
// When steps
// ---------------------------------------------------------------------------

#[when("qdisc {kind} is resolved twice")]
fn when_qdisc_twice(world: &mut TestWorld, kind: String) {
    let id = kind.trim_matches('"');
    for _ in 0..2 {
        let handler = resolver(world).qdisc(id);
        world.qdiscs.push(handler);
    }
}

#[when("filter {kind} is resolved")]
fn when_filter(world: &mut TestWorld, kind: String) {
    let handler = resolver(world).filter(kind.trim_matches('"'));
    world.filter = Some(handler);
}

// ---------------------------------------------------------------------------
// Then steps
// ---------------------------------------------------------------------------

#[then("both resolutions return the same handler")]
fn then_same_handler(world: &mut TestWorld) {
    let [first, second] = world.qdiscs.as_slice() else {
        panic!("expected two resolutions, got {}", world.qdiscs.len());
    };
    assert!(Arc::ptr_eq(first, second));
}

#[then("{count} qdisc handler(s) are registered")]
fn then_registered(world: &mut TestWorld, count: usize) {
    let registered = resolver(world).registries().qdiscs.len();
    assert_eq!(registered, count);
}

#[then("the handler prints {expected} for a limit of {limit}")]
fn then_prints_limit(world: &mut TestWorld, expected: String, limit: u32) {
    let mut out = Vec::new();
    first_qdisc(world)
        .print_options(&mut out, Some(&limit.to_ne_bytes()))
        .expect("write");
    assert_eq!(
        String::from_utf8(out).expect("utf8"),
        expected.trim_matches('"')
    );
}

#[then("the handler rejects option {option} as unparsable")]
fn then_rejects(world: &mut TestWorld, option: String) {
    let word = option.trim_matches('"');
    let mut request = TcRequest::new(RTM_NEWQDISC, NLM_F_REQUEST);
    let before = request.clone();
    let err = first_qdisc(world)
        .parse_options(&[word.to_owned()], &mut request)
        .expect_err("stub rejects options");
    assert!(
        err.to_string()
            .ends_with(&format!("hence option \"{word}\" is unparsable")),
        "unexpected error: {err}"
    );
    assert_eq!(request, before);
}

#[then("the filter prints {expected} for handle {handle} with {len} option bytes")]
fn then_filter_prints(world: &mut TestWorld, expected: String, handle: String, len: usize) {
    let raw = u32::from_str_radix(&handle, 16).expect("hex handle");
    let options = vec![0; len];
    let mut out = Vec::new();
    world
        .filter
        .as_ref()
        .expect("filter resolved")
        .print_options(&mut out, Some(&options), raw)
        .expect("write");
    assert_eq!(
        String::from_utf8(out).expect("utf8"),
        expected.trim_matches('"')
    );
}

// ---------------------------------------------------------------------------
// Scenario registration
// ---------------------------------------------------------------------------

#[scenario(path = "tests/features/handler_resolution.feature")]
fn handler_resolution_behaviour(world: TestWorld) {
    let _ = world;
}
