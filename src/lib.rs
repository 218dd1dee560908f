//! # bonqr - Payment-Code QR Generator
//!
//! bonqr builds `*`-delimited payment payloads from a location's BON and
//! operator codes plus a timestamp and amount, and renders them as QR
//! images. It provides:
//!
//! - **Location registry**: known locations loaded once from JSON (file or URL)
//! - **Selection state**: known-location vs. custom entry, with locked fields
//! - **Payload encoding**: deterministic `BON*OPERATOR*DATE*TIME*AMOUNT`
//! - **Render serialization**: ordered, non-overlapping QR rendering
//! - **Clipboard feedback**: copy with a transient confirmation label
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use bonqr::{
//!     clipboard::CommandClipboard,
//!     controller::{Controller, SubmitForm},
//!     locations::LocationSource,
//!     render::{PngQrRenderer, QrOptions},
//! };
//!
//! # async fn example() -> Result<(), bonqr::BonqrError> {
//! let controller = Controller::start(
//!     &LocationSource::parse("locations.json"),
//!     Arc::new(PngQrRenderer),
//!     QrOptions::default(),
//!     Arc::new(CommandClipboard::parse("pbcopy")?),
//! )
//! .await;
//!
//! controller.select_location("__custom__").await;
//! let submission = controller
//!     .submit(SubmitForm {
//!         bon: "123".into(),
//!         operator: "456".into(),
//!         amount: "12.5".into(),
//!         offset: "5".into(),
//!     })
//!     .await;
//!
//! if let Some(submission) = submission {
//!     println!("{}", submission.result.payload);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Overview
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`locations`] | Known locations and their source |
//! | [`selection`] | Location selection state machine |
//! | [`payload`] | Payload encoding |
//! | [`render`] | QR rendering and render serialization |
//! | [`clipboard`] | Clipboard copy with label feedback |
//! | [`controller`] | Application state owner |
//! | [`server`] | HTTP interface |
//! | [`error`] | Error types |

pub mod clipboard;
pub mod controller;
pub mod error;
pub mod locations;
pub mod payload;
pub mod render;
pub mod selection;
pub mod server;

// Re-exports for convenience
pub use controller::Controller;
pub use error::BonqrError;
pub use locations::{Location, LocationRegistry};
