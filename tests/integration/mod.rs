//! Integration tests for sitehealth
//!
//! Scenario tests drive the public engine API against fixed fact snapshots.
//! Internal server tests bind the HTTP server to an ephemeral port on
//! 127.0.0.1 and query it with reqwest; nothing external is required.
//!
//! Run with: cargo test --test integration

mod helpers;

mod internal_server;
mod scenarios;
