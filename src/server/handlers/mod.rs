//! HTTP handlers for the server.

pub mod form;
pub mod locations;
pub mod qr;
