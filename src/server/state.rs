//! Server state and configuration.

use std::time::{SystemTime, UNIX_EPOCH};

use crate::controller::Controller;
use crate::locations::LocationSource;
use crate::render::QrOptions;

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to listen on (e.g., "127.0.0.1:8080")
    pub listen_addr: String,
    /// Where the known locations come from
    pub locations: LocationSource,
    /// Program (with arguments) that receives copied text on stdin
    pub clipboard_command: String,
    /// QR image appearance
    pub qr: QrOptions,
}

/// Application state shared across handlers.
pub struct AppState {
    pub controller: Controller,
    /// Unix timestamp of server boot for cache busting.
    pub boot_time: u64,
}

impl AppState {
    pub fn new(controller: Controller) -> Self {
        let boot_time = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or_default();
        Self {
            controller,
            boot_time,
        }
    }
}
