//! Unit tests for export tables and the extension catalog.

use std::sync::Arc;

use camino::Utf8Path;
use rstest::{fixture, rstest};

use super::*;
use crate::stub::{UnknownFilter, UnknownQdisc};

#[fixture]
fn catalog() -> ExtensionCatalog {
    let mut catalog = ExtensionCatalog::new("/opt/tc");
    catalog.install(
        "q_sfq.so",
        Exports::new().with_qdisc(Arc::new(UnknownQdisc::new("sfq"))),
    );
    catalog
}

#[test]
fn exports_are_keyed_by_family_symbol() {
    let exports = Exports::new()
        .with_qdisc(Arc::new(UnknownQdisc::new("sfq")))
        .with_filter(Arc::new(UnknownFilter::new("u32")));
    assert_eq!(exports.len(), 2);
    assert!(matches!(
        exports.lookup("sfq_qdisc_util"),
        Some(Symbol::Qdisc(_))
    ));
    assert!(matches!(
        exports.lookup("u32_filter_util"),
        Some(Symbol::Filter(_))
    ));
    assert!(exports.lookup("sfq_filter_util").is_none());
}

#[rstest]
fn catalog_loads_installed_unit(catalog: ExtensionCatalog) {
    let exports = catalog
        .load(Utf8Path::new("/opt/tc/q_sfq.so"))
        .expect("unit installed");
    assert!(exports.lookup("sfq_qdisc_util").is_some());
}

#[rstest]
#[case("/opt/tc/q_cake.so")]
#[case("/usr/lib/tc/q_sfq.so")]
#[case("q_sfq.so")]
fn catalog_rejects_other_paths(catalog: ExtensionCatalog, #[case] path: &str) {
    let err = catalog.load(Utf8Path::new(path)).expect_err("not installed");
    assert_eq!(
        err,
        LoadError::NotFound {
            path: Utf8PathBuf::from(path)
        }
    );
}

#[test]
fn bundled_catalog_ships_prio_and_matchall() {
    let catalog = ExtensionCatalog::bundled("/usr/lib/tc");
    assert_eq!(catalog.units(), vec!["f_matchall.so", "q_prio.so"]);
    assert_eq!(catalog.dir(), Utf8Path::new("/usr/lib/tc"));
}

#[test]
fn builtin_image_exports_linked_handlers() {
    let image = BuiltinImage.open().expect("image opens");
    for symbol in [
        "pfifo_qdisc_util",
        "bfifo_qdisc_util",
        "pfifo_head_drop_qdisc_util",
        "drr_qdisc_util",
    ] {
        assert!(image.lookup(symbol).is_some(), "missing {symbol}");
    }
    assert!(image.lookup("prio_qdisc_util").is_none());
}
