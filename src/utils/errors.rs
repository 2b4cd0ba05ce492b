//! Sistema de manejo de errores
//!
//! Este módulo define los tipos de errores del sistema. Los fallos del backend
//! (hojas de cálculo / almacenamiento de archivos) se convierten aquí en
//! variantes propias, nunca se propaga el tipo nativo del cliente HTTP.

use thiserror::Error;

/// Errores principales de la aplicación
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Backend error: {0}")]
    Backend(String),

    #[error("Schema error: {0}")]
    Schema(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("JWT error: {0}")]
    Jwt(String),

    #[error("Hash error: {0}")]
    Hash(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl AppError {
    /// Código estable del error, útil para logs y para la capa web
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Backend(_) => "BACKEND_ERROR",
            AppError::Schema(_) => "SCHEMA_ERROR",
            AppError::Config(_) => "CONFIG_ERROR",
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::Forbidden(_) => "FORBIDDEN",
            AppError::Conflict(_) => "CONFLICT",
            AppError::Jwt(_) => "JWT_ERROR",
            AppError::Hash(_) => "HASH_ERROR",
            AppError::Io(_) => "IO_ERROR",
        }
    }
}

impl From<reqwest::Error> for AppError {
    fn from(e: reqwest::Error) -> Self {
        AppError::Backend(format!("HTTP error: {}", e))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(e: serde_json::Error) -> Self {
        AppError::Backend(format!("Invalid JSON payload: {}", e))
    }
}

/// Resultado tipado para operaciones que pueden fallar
pub type AppResult<T> = Result<T, AppError>;

/// Función helper para crear errores de conflicto
pub fn conflict_error(resource: &str, field: &str, value: &str) -> AppError {
    AppError::Conflict(format!("{} with {} '{}' already exists", resource, field, value))
}

/// Función helper para crear errores de acceso prohibido
pub fn forbidden_error(operation: &str, reason: &str) -> AppError {
    AppError::Forbidden(format!("Cannot {}: {}", operation, reason))
}

/// Función helper para errores del backend de hojas / archivos
pub fn backend_error(operation: &str, detail: impl std::fmt::Display) -> AppError {
    AppError::Backend(format!("{}: {}", operation, detail))
}

/// Función helper para columnas ausentes en el cabecero de una hoja
pub fn schema_error(sheet: &str, missing: &[String]) -> AppError {
    AppError::Schema(format!(
        "sheet '{}' is missing columns: {}",
        sheet,
        missing.join(", ")
    ))
}
