//! Internal HTTP server.
//!
//! | Path | Response |
//! |---|---|
//! | `GET /health` | JSON report; 503 when it fails the configured threshold |
//! | `GET /info` | JSON debug-information panels |
//! | `GET /metrics` | Prometheus text format |
//!
//! Every `/health` request performs a fresh run.

mod internal;

pub use internal::{run_internal_server, serve, InternalState};
