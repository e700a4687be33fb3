//! srcdom_tests: Cross-crate conformance tests for the source DOM.
//!
//! The actual suites live under `tests/`; this crate only ties the
//! workspace members together so one `cargo test -p srcdom_tests`
//! exercises the full event-to-tree pipeline.
