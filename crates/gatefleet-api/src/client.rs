// Device HTTP client
//
// Wraps `reqwest::Client` with device URL construction, per-request
// time budgets, and response classification. The endpoint groups
// (replication, control) are implemented as inherent methods in
// separate files to keep this module focused on transport mechanics.

use std::time::Duration;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, trace};
use url::Url;

use crate::error::Error;
use crate::transport::{RequestTimeouts, TransportConfig};

/// How much of an error body is kept in error messages.
const BODY_PREVIEW_LEN: usize = 200;

/// Raw HTTP client for one access-control device.
///
/// Every call carries its own timeout; there is no request that can
/// block indefinitely. All device endpoints live under `{base}/api/`.
#[derive(Debug, Clone)]
pub struct DeviceClient {
    http: reqwest::Client,
    base_url: Url,
    timeouts: RequestTimeouts,
}

impl DeviceClient {
    /// Create a new device client from a `TransportConfig`.
    ///
    /// The `base_url` is the device root (e.g. `http://10.0.0.5`).
    pub fn new(base_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self {
            http,
            base_url,
            timeouts: transport.timeouts,
        })
    }

    /// Create a device client with a pre-built `reqwest::Client`.
    ///
    /// Use this to share one connection pool across a whole fleet.
    pub fn with_client(http: reqwest::Client, base_url: Url, timeouts: RequestTimeouts) -> Self {
        Self {
            http,
            base_url,
            timeouts,
        }
    }

    /// The device base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The per-request budgets this client applies.
    pub fn timeouts(&self) -> RequestTimeouts {
        self.timeouts
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// Build a full URL for a device API path: `{base}/api/{path}`.
    pub(crate) fn api_url(&self, path: &str) -> Result<Url, Error> {
        let base = self.base_url.as_str().trim_end_matches('/');
        let full = format!("{base}/api/{path}");
        Ok(Url::parse(&full)?)
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// Send a GET request and decode the JSON body.
    pub(crate) async fn get<T: DeserializeOwned>(
        &self,
        url: Url,
        timeout: Duration,
    ) -> Result<T, Error> {
        debug!("GET {}", url);

        let resp = self
            .http
            .get(url)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| Error::from_reqwest(e, timeout))?;

        Self::parse_response(resp, timeout).await
    }

    /// Send a POST request with a JSON body and decode the JSON reply.
    pub(crate) async fn post<T: DeserializeOwned>(
        &self,
        url: Url,
        body: &(impl Serialize + Sync),
        timeout: Duration,
    ) -> Result<T, Error> {
        debug!("POST {}", url);

        let resp = self
            .http
            .post(url)
            .json(body)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| Error::from_reqwest(e, timeout))?;

        Self::parse_response(resp, timeout).await
    }

    /// Classify the status, then decode the body.
    ///
    /// Device firmware answers some commands with an empty body; that is
    /// decoded as JSON `null` so `serde_json::Value` callers get `Null`.
    async fn parse_response<T: DeserializeOwned>(
        resp: reqwest::Response,
        timeout: Duration,
    ) -> Result<T, Error> {
        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| Error::from_reqwest(e, timeout))?;

        if !status.is_success() {
            return Err(Error::Device {
                status: status.as_u16(),
                message: preview(&body).to_owned(),
            });
        }

        trace!(bytes = body.len(), "device response body");

        let text = if body.trim().is_empty() { "null" } else { &body };
        serde_json::from_str(text).map_err(|e| Error::Deserialization {
            message: format!("{e} (body preview: {:?})", preview(&body)),
            body: body.clone(),
        })
    }
}

fn preview(body: &str) -> &str {
    match body.char_indices().nth(BODY_PREVIEW_LEN) {
        Some((idx, _)) => &body[..idx],
        None => body,
    }
}
