//! Backends en memoria
//!
//! Implementaciones de `SheetBackend` y `FileStorage` sin red, usadas por los
//! tests. Permiten inyectar fallos para ejercitar los caminos de error. Sólo
//! se compilan en tests o con la feature `test-support`.

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tokio::sync::RwLock;

use super::backend::{FileStorage, SheetBackend};
use super::record::CellValue;
use crate::utils::errors::{backend_error, AppResult};

/// Planilla en memoria: nombre de hoja -> filas (la primera es el cabecero)
#[derive(Default)]
pub struct MemoryBackend {
    sheets: RwLock<HashMap<String, Vec<Vec<String>>>>,
    fail_reads: AtomicBool,
    /// Número de escrituras de celda que se aceptan antes de empezar a fallar
    update_budget: AtomicUsize,
    limit_updates: AtomicBool,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Crea (o reemplaza) una hoja con su cabecero
    pub async fn create_sheet(&self, sheet: &str, header: &[&str]) {
        let header = header.iter().map(|h| h.to_string()).collect();
        self.sheets.write().await.insert(sheet.to_string(), vec![header]);
    }

    /// Inserta filas crudas tal cual, sin pasar por el cabecero
    pub async fn push_raw_row(&self, sheet: &str, row: &[&str]) {
        let row = row.iter().map(|c| c.to_string()).collect();
        self.sheets
            .write()
            .await
            .entry(sheet.to_string())
            .or_default()
            .push(row);
    }

    /// Copia de todas las filas de una hoja
    pub async fn snapshot(&self, sheet: &str) -> Vec<Vec<String>> {
        self.sheets.read().await.get(sheet).cloned().unwrap_or_default()
    }

    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Acepta `n` escrituras de celda más y luego falla todas las siguientes
    pub fn fail_updates_after(&self, n: usize) {
        self.update_budget.store(n, Ordering::SeqCst);
        self.limit_updates.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl SheetBackend for MemoryBackend {
    async fn get_values(&self, sheet: &str) -> AppResult<Vec<Vec<String>>> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(backend_error("read sheet", "simulated outage"));
        }
        self.sheets
            .read()
            .await
            .get(sheet)
            .cloned()
            .ok_or_else(|| backend_error("read sheet", format!("unknown sheet '{}'", sheet)))
    }

    async fn append_row(&self, sheet: &str, cells: Vec<CellValue>) -> AppResult<()> {
        let mut sheets = self.sheets.write().await;
        let rows = sheets
            .get_mut(sheet)
            .ok_or_else(|| backend_error("append row", format!("unknown sheet '{}'", sheet)))?;
        rows.push(cells.iter().map(CellValue::to_cell_string).collect());
        Ok(())
    }

    async fn update_cell(
        &self,
        sheet: &str,
        row: usize,
        column: usize,
        value: CellValue,
    ) -> AppResult<()> {
        if self.limit_updates.load(Ordering::SeqCst) {
            let remaining = self.update_budget.load(Ordering::SeqCst);
            if remaining == 0 {
                return Err(backend_error("update cell", "simulated outage"));
            }
            self.update_budget.store(remaining - 1, Ordering::SeqCst);
        }

        if row == 0 || column == 0 {
            return Err(backend_error("update cell", "row and column are 1-based"));
        }

        let mut sheets = self.sheets.write().await;
        let rows = sheets
            .get_mut(sheet)
            .ok_or_else(|| backend_error("update cell", format!("unknown sheet '{}'", sheet)))?;

        while rows.len() < row {
            rows.push(Vec::new());
        }
        let cells = &mut rows[row - 1];
        while cells.len() < column {
            cells.push(String::new());
        }
        cells[column - 1] = value.to_cell_string();
        Ok(())
    }
}

/// Almacenamiento de archivos que sólo registra lo subido
#[derive(Default)]
pub struct RecordingStorage {
    uploads: RwLock<Vec<(PathBuf, String)>>,
    fail: AtomicBool,
}

impl RecordingStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_fail(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    /// Nombres de archivo subidos, en orden de llegada
    pub async fn uploaded_names(&self) -> Vec<String> {
        self.uploads.read().await.iter().map(|(_, n)| n.clone()).collect()
    }
}

#[async_trait]
impl FileStorage for RecordingStorage {
    async fn upload(&self, local_path: &Path, file_name: &str) -> AppResult<String> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(backend_error("upload file", "simulated outage"));
        }
        let mut uploads = self.uploads.write().await;
        uploads.push((local_path.to_path_buf(), file_name.to_string()));
        Ok(format!("https://files.local/{}/{}", uploads.len(), file_name))
    }
}
