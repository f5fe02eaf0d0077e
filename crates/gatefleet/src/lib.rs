//! gatefleet HTTP surface.
//!
//! The binary (`src/main.rs`) owns the CLI; this library half exposes the
//! axum router so it can be served by `gatefleet serve` and driven
//! in-process by tests.

pub mod api;
