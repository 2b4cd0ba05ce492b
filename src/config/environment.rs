//! Configuración de variables de entorno
//!
//! Este módulo lee la configuración del proceso. `.env` se carga en `main`
//! con dotenvy antes de llamar a `EnvironmentConfig::from_env`.

use std::env;
use std::str::FromStr;

use crate::utils::errors::{AppError, AppResult};

pub const DEFAULT_SHEETS_API_URL: &str = "https://sheets.googleapis.com/v4";
pub const DEFAULT_DRIVE_API_URL: &str = "https://www.googleapis.com/drive/v3";
pub const DEFAULT_DRIVE_UPLOAD_URL: &str = "https://www.googleapis.com/upload/drive/v3";

/// Configuración del entorno
#[derive(Debug, Clone)]
pub struct EnvironmentConfig {
    pub environment: String,
    /// JSON de la cuenta de servicio de Google
    pub google_credentials: String,
    pub spreadsheet_id: String,
    /// Carpeta de Drive donde se guardan los documentos
    pub drive_folder_id: Option<String>,
    pub sheets_api_url: String,
    pub drive_api_url: String,
    pub drive_upload_url: String,
    pub http_timeout_secs: u64,
    /// Desplazamiento horario para `datacad` (Brasília = -3)
    pub utc_offset_hours: i32,
    pub bcrypt_cost: u32,
}

impl EnvironmentConfig {
    pub fn from_env() -> AppResult<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Construye la configuración a partir de cualquier fuente clave -> valor
    pub fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let required = |name: &str| {
            get(name).ok_or_else(|| AppError::Config(format!("{} must be set", name)))
        };

        Ok(Self {
            environment: get("ENVIRONMENT").unwrap_or_else(|| "development".to_string()),
            google_credentials: required("GOOGLE_CREDS_ADM")?,
            spreadsheet_id: required("PLANILHA_ADM_ID")?,
            drive_folder_id: get("GOOGLE_DRIVE_PASTA_ID"),
            sheets_api_url: get("SHEETS_API_URL")
                .unwrap_or_else(|| DEFAULT_SHEETS_API_URL.to_string()),
            drive_api_url: get("DRIVE_API_URL")
                .unwrap_or_else(|| DEFAULT_DRIVE_API_URL.to_string()),
            drive_upload_url: get("DRIVE_UPLOAD_URL")
                .unwrap_or_else(|| DEFAULT_DRIVE_UPLOAD_URL.to_string()),
            http_timeout_secs: parse_or("HTTP_TIMEOUT_SECS", get("HTTP_TIMEOUT_SECS"), 30)?,
            utc_offset_hours: parse_or(
                "LOCAL_UTC_OFFSET_HOURS",
                get("LOCAL_UTC_OFFSET_HOURS"),
                -3,
            )?,
            bcrypt_cost: parse_or("BCRYPT_COST", get("BCRYPT_COST"), bcrypt::DEFAULT_COST)?,
        })
    }

    /// Verificar si estamos en modo desarrollo
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

fn parse_or<T: FromStr>(name: &str, value: Option<String>, default: T) -> AppResult<T> {
    match value {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| AppError::Config(format!("{} must be a valid number, got '{}'", name, raw))),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> AppResult<EnvironmentConfig> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        EnvironmentConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[("GOOGLE_CREDS_ADM", "{}"), ("PLANILHA_ADM_ID", "sheet-1")]).unwrap();

        assert!(config.is_development());
        assert_eq!(config.http_timeout_secs, 30);
        assert_eq!(config.utc_offset_hours, -3);
        assert_eq!(config.sheets_api_url, DEFAULT_SHEETS_API_URL);
        assert!(config.drive_folder_id.is_none());
    }

    #[test]
    fn test_missing_required() {
        let err = config_from(&[("GOOGLE_CREDS_ADM", "{}")]).unwrap_err();
        assert_eq!(err.code(), "CONFIG_ERROR");
        assert!(err.to_string().contains("PLANILHA_ADM_ID"));
    }

    #[test]
    fn test_invalid_number() {
        let err = config_from(&[
            ("GOOGLE_CREDS_ADM", "{}"),
            ("PLANILHA_ADM_ID", "sheet-1"),
            ("HTTP_TIMEOUT_SECS", "soon"),
        ])
        .unwrap_err();
        assert!(err.to_string().contains("HTTP_TIMEOUT_SECS"));
    }
}
