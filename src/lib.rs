//! The workspace root carries no library code of its own — every piece of
//! behavior lives in `territory-core`, `territory-wire`, or
//! `territory-server`. This crate exists only so the root `Cargo.toml` can
//! declare the cross-crate integration test suite under `tests/`, the same
//! way a sibling pack repo's workspace root wires up its own
//! `tests/integration_tests.rs`.
