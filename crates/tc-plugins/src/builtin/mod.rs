//! Handlers shipped with the tool.
//!
//! The FIFO family and `drr` are linked into the process image; `prio` and
//! `matchall` are packaged as extension units so the unit path of the
//! resolver is exercised by real handlers too.

mod args;
pub mod drr;
pub mod fifo;
pub mod matchall;
pub mod prio;
pub mod size;

use std::sync::Arc;

use crate::extension::{ExtensionCatalog, Exports};
use crate::family::{FilterFamily, HandlerFamily, QdiscFamily};

use self::drr::Drr;
use self::fifo::Fifo;
use self::matchall::Matchall;
use self::prio::Prio;

/// Export table of the handlers linked into the binary.
pub(crate) fn image_exports() -> Exports {
    Exports::new()
        .with_qdisc(Arc::new(Fifo::packets()))
        .with_qdisc(Arc::new(Fifo::bytes()))
        .with_qdisc(Arc::new(Fifo::head_drop()))
        .with_qdisc(Arc::new(Drr))
}

/// Installs the bundled extension units into `catalog`.
pub(crate) fn install_units(catalog: &mut ExtensionCatalog) {
    catalog.install(
        QdiscFamily::unit_name(prio::KIND),
        Exports::new().with_qdisc(Arc::new(Prio)),
    );
    catalog.install(
        FilterFamily::unit_name(matchall::KIND),
        Exports::new().with_filter(Arc::new(Matchall)),
    );
}
