// gatefleet-api: Async Rust client for gatefleet access-control devices

pub mod client;
mod control;
pub mod error;
mod sync;
pub mod transport;

pub use client::DeviceClient;
pub use error::Error;
pub use transport::{RequestTimeouts, TransportConfig};
