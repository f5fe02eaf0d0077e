// Shared transport configuration for building reqwest::Client instances.
//
// Every DeviceClient in a fleet shares one connection pool; the per-call
// budgets live in `RequestTimeouts` and are applied request by request.

use std::time::Duration;

/// Per-request time budgets, by kind of device call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestTimeouts {
    /// Health/info probe.
    pub probe: Duration,
    /// Clock push.
    pub time_sync: Duration,
    /// Full user database push.
    pub push: Duration,
    /// Active-device control and passthrough reads.
    pub control: Duration,
}

impl Default for RequestTimeouts {
    fn default() -> Self {
        Self {
            probe: Duration::from_secs(3),
            time_sync: Duration::from_secs(3),
            push: Duration::from_secs(5),
            control: Duration::from_secs(3),
        }
    }
}

/// Shared transport configuration for building HTTP clients.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    pub timeouts: RequestTimeouts,
    /// TCP connect budget, applied to every request.
    pub connect_timeout: Duration,
    /// Accept self-signed certificates on `https://` device endpoints.
    pub accept_invalid_certs: bool,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeouts: RequestTimeouts::default(),
            connect_timeout: Duration::from_secs(3),
            accept_invalid_certs: false,
        }
    }
}

impl TransportConfig {
    /// Build a `reqwest::Client` from this config.
    pub fn build_client(&self) -> Result<reqwest::Client, crate::error::Error> {
        let builder = reqwest::Client::builder()
            .connect_timeout(self.connect_timeout)
            .user_agent(concat!("gatefleet/", env!("CARGO_PKG_VERSION")))
            .danger_accept_invalid_certs(self.accept_invalid_certs);

        builder.build().map_err(crate::error::Error::Transport)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_budgets_match_device_contract() {
        let t = RequestTimeouts::default();
        assert_eq!(t.probe, Duration::from_secs(3));
        assert_eq!(t.time_sync, Duration::from_secs(3));
        assert_eq!(t.push, Duration::from_secs(5));
    }
}
