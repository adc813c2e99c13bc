//! Crate-level tests for the CLI runtime.

pub(crate) mod support;
