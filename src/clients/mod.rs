//! Clients - HTTP clients for Google APIs
//!
//! Sheets y Drive comparten un único `reqwest::Client` y la misma cuenta de
//! servicio.

pub mod drive_client;
pub mod google_auth;
pub mod sheets_client;

pub use drive_client::DriveClient;
pub use google_auth::{GoogleAuth, ServiceAccountKey};
pub use sheets_client::SheetsClient;
