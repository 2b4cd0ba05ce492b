//! Solar CRM
//!
//! CRM de ventas de energía solar: usuarios, clientes y oportunidades
//! guardados en una planilla de Google Sheets, documentos en Google Drive.

pub mod clients;
pub mod config;
pub mod models;
pub mod repositories;
pub mod services;
pub mod state;
pub mod storage;
pub mod utils;
