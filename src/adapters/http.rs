//! HTTPS client adapter.
//!
//! Implements [`SinkTransport`]: form POSTs to the bot API and GETs for
//! command polling.  Each request opens its own connection and runs to
//! completion; there is no keep-alive and no cancellation.
//!
//! - **`target_os = "espidf"`**: `EspHttpConnection` with the ESP-IDF
//!   certificate bundle for TLS.
//! - **`not(target_os = "espidf")`**: a simulated sink that logs every
//!   request and answers 200.

use log::debug;
#[cfg(not(target_os = "espidf"))]
use log::info;

use crate::app::ports::{HttpResponse, SinkTransport, TransportError};

#[cfg(target_os = "espidf")]
use esp_idf_svc::http::Method;
#[cfg(target_os = "espidf")]
use esp_idf_svc::http::client::{Configuration, EspHttpConnection};
#[cfg(target_os = "espidf")]
use esp_idf_svc::io::{Read, Write};

/// Bodies larger than this are truncated; a `getUpdates` page is far smaller.
const MAX_BODY: usize = 8 * 1024;

pub struct HttpAdapter {
    #[cfg(target_os = "espidf")]
    timeout_ms: u32,
    /// Simulation: (method, url, body) of every request.
    #[cfg(not(target_os = "espidf"))]
    sim_log: Vec<(&'static str, String, String)>,
    /// Simulation: status returned for POSTs.
    #[cfg(not(target_os = "espidf"))]
    sim_post_status: u16,
    /// Simulation: body returned for GETs.
    #[cfg(not(target_os = "espidf"))]
    sim_updates: String,
}

impl HttpAdapter {
    #[cfg(target_os = "espidf")]
    pub fn new(timeout_ms: u32) -> Self {
        Self { timeout_ms }
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn new(_timeout_ms: u32) -> Self {
        Self {
            sim_log: Vec::new(),
            sim_post_status: 200,
            sim_updates: String::from(r#"{"ok":true,"result":[]}"#),
        }
    }

    // ── Platform-specific ─────────────────────────────────────

    #[cfg(target_os = "espidf")]
    fn open(&self) -> Result<EspHttpConnection, TransportError> {
        EspHttpConnection::new(&Configuration {
            timeout: Some(core::time::Duration::from_millis(u64::from(self.timeout_ms))),
            crt_bundle_attach: Some(esp_idf_sys::esp_crt_bundle_attach),
            ..Default::default()
        })
        .map_err(|_| TransportError::NotConnected)
    }

    #[cfg(target_os = "espidf")]
    fn map_err(e: esp_idf_sys::EspError) -> TransportError {
        if e.code() == esp_idf_sys::ESP_ERR_TIMEOUT {
            TransportError::Timeout
        } else {
            TransportError::Io
        }
    }

    // ── Simulation controls ───────────────────────────────────

    #[cfg(not(target_os = "espidf"))]
    pub fn sim_set_post_status(&mut self, status: u16) {
        self.sim_post_status = status;
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn sim_set_updates(&mut self, body: &str) {
        self.sim_updates = body.to_owned();
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn sim_requests(&self) -> &[(&'static str, String, String)] {
        &self.sim_log
    }
}

impl SinkTransport for HttpAdapter {
    #[cfg(target_os = "espidf")]
    fn post_form(&mut self, url: &str, body: &str) -> Result<u16, TransportError> {
        let mut conn = self.open()?;
        let len = body.len().to_string();
        let headers = [
            ("Content-Type", "application/x-www-form-urlencoded"),
            ("Content-Length", len.as_str()),
        ];
        conn.initiate_request(Method::Post, url, &headers).map_err(Self::map_err)?;
        conn.write_all(body.as_bytes()).map_err(|e| Self::map_err(e.0))?;
        conn.initiate_response().map_err(Self::map_err)?;
        let status = conn.status();
        debug!("HTTP: POST -> {}", status);
        Ok(status)
    }

    #[cfg(target_os = "espidf")]
    fn get(&mut self, url: &str) -> Result<HttpResponse, TransportError> {
        let mut conn = self.open()?;
        conn.initiate_request(Method::Get, url, &[]).map_err(Self::map_err)?;
        conn.initiate_response().map_err(Self::map_err)?;
        let status = conn.status();

        let mut body = Vec::new();
        let mut buf = [0u8; 512];
        loop {
            let n = conn.read(&mut buf).map_err(|e| Self::map_err(e.0))?;
            if n == 0 {
                break;
            }
            let room = MAX_BODY - body.len();
            body.extend_from_slice(&buf[..n.min(room)]);
            if body.len() >= MAX_BODY {
                break;
            }
        }
        debug!("HTTP: GET -> {} ({} bytes)", status, body.len());
        Ok(HttpResponse {
            status,
            body: String::from_utf8_lossy(&body).into_owned(),
        })
    }

    #[cfg(not(target_os = "espidf"))]
    fn post_form(&mut self, url: &str, body: &str) -> Result<u16, TransportError> {
        info!("HTTP(sim): POST {} ({} bytes)", url, body.len());
        self.sim_log.push(("POST", url.to_owned(), body.to_owned()));
        debug!("HTTP(sim): POST -> {}", self.sim_post_status);
        Ok(self.sim_post_status)
    }

    #[cfg(not(target_os = "espidf"))]
    fn get(&mut self, url: &str) -> Result<HttpResponse, TransportError> {
        info!("HTTP(sim): GET {}", url);
        self.sim_log.push(("GET", url.to_owned(), String::new()));
        let mut body = self.sim_updates.clone();
        body.truncate(MAX_BODY);
        debug!("HTTP(sim): GET -> 200 ({} bytes)", body.len());
        Ok(HttpResponse { status: 200, body })
    }
}
