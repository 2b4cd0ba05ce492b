//! Utilidades del sistema
//!
//! Manejo de errores, contraseñas, normalización de valores de celda y
//! marcas de tiempo.

pub mod errors;
pub mod normalize;
pub mod password;
pub mod time;

pub use normalize::{format_br_currency, parse_locale_number, rescale, Normalized};
