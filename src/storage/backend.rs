//! Contratos de los backends externos
//!
//! La capa de persistencia sólo conoce estas dos interfaces; los clientes de
//! Google y el backend en memoria de los tests las implementan.

use async_trait::async_trait;
use std::path::Path;

use super::record::CellValue;
use crate::utils::errors::AppResult;

/// Almacén tabular direccionado por nombre de hoja
#[async_trait]
pub trait SheetBackend: Send + Sync {
    /// Todas las filas crudas, incluida la de cabecero
    async fn get_values(&self, sheet: &str) -> AppResult<Vec<Vec<String>>>;

    /// Añade una fila al final de la hoja
    async fn append_row(&self, sheet: &str, cells: Vec<CellValue>) -> AppResult<()>;

    /// Actualiza una celda; `row` y `column` empiezan en 1
    async fn update_cell(
        &self,
        sheet: &str,
        row: usize,
        column: usize,
        value: CellValue,
    ) -> AppResult<()>;
}

/// Almacenamiento de archivos con enlace público de lectura
#[async_trait]
pub trait FileStorage: Send + Sync {
    /// Sube el archivo local y devuelve un enlace visible para cualquiera con el link
    async fn upload(&self, local_path: &Path, file_name: &str) -> AppResult<String>;
}
