//! Adaptador de persistencia sobre la planilla
//!
//! Convierte filas de un `SheetBackend` en registros indexados por nombre de
//! columna: lecturas completas, búsquedas lineales, altas y actualización de
//! celdas sueltas. El orden de columnas siempre se toma del cabecero actual.

use std::sync::Arc;

use crate::storage::{CellValue, Record, RowData, SheetBackend, TableSchema};
use crate::utils::errors::{AppError, AppResult};

/// Hoja leída: cabecero mapeado + filas de datos crudas
pub struct Table {
    pub schema: TableSchema,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    /// Registros en orden de inserción, sin las filas incompletas
    pub fn records(&self) -> Vec<Record> {
        self.rows
            .iter()
            .filter_map(|row| self.schema.map_row(row))
            .collect()
    }
}

/// Página de registros filtrados
#[derive(Debug, Clone)]
pub struct Page {
    pub items: Vec<Record>,
    pub page: usize,
    pub page_size: usize,
    pub has_next: bool,
}

#[derive(Clone)]
pub struct SheetRepository {
    backend: Arc<dyn SheetBackend>,
}

impl SheetRepository {
    pub fn new(backend: Arc<dyn SheetBackend>) -> Self {
        Self { backend }
    }

    /// Lee la hoja completa y construye su esquema
    pub async fn load_table(&self, sheet: &str) -> AppResult<Table> {
        let mut values = self.backend.get_values(sheet).await.map_err(|e| {
            log::error!("❌ Error leyendo hoja '{}': {}", sheet, e);
            e
        })?;

        if values.is_empty() {
            return Ok(Table {
                schema: TableSchema::from_header(sheet, &[]),
                rows: Vec::new(),
            });
        }

        let header = values.remove(0);
        Ok(Table {
            schema: TableSchema::from_header(sheet, &header),
            rows: values,
        })
    }

    /// Verifica que el cabecero contenga las columnas esperadas
    pub async fn verify_schema(&self, sheet: &str, columns: &[&str]) -> AppResult<()> {
        let table = self.load_table(sheet).await?;
        table.schema.require(columns)?;
        log::info!("✅ Hoja '{}' verificada ({} filas)", sheet, table.rows.len());
        Ok(())
    }

    pub async fn list_all(&self, sheet: &str) -> AppResult<Vec<Record>> {
        Ok(self.load_table(sheet).await?.records())
    }

    /// Primer registro que cumple el predicado
    pub async fn find_one<F>(&self, sheet: &str, predicate: F) -> AppResult<Option<Record>>
    where
        F: Fn(&Record) -> bool,
    {
        let table = self.load_table(sheet).await?;
        Ok(table
            .rows
            .iter()
            .filter_map(|row| table.schema.map_row(row))
            .find(|record| predicate(record)))
    }

    /// Registros cuyo `column` coincide con `value` (recortado, sin mayúsculas)
    pub async fn find_all_by(&self, sheet: &str, column: &str, value: &str) -> AppResult<Vec<Record>> {
        Ok(self
            .list_all(sheet)
            .await?
            .into_iter()
            .filter(|record| record.matches(column, value))
            .collect())
    }

    /// Añade una fila en el orden del cabecero leído en este momento
    pub async fn append_row(&self, sheet: &str, data: &RowData) -> AppResult<()> {
        let table = self.load_table(sheet).await?;
        if table.schema.width() == 0 {
            return Err(AppError::Schema(format!("sheet '{}' has no header row", sheet)));
        }

        let dropped = table.schema.unknown_columns(data);
        if !dropped.is_empty() {
            log::debug!("🔍 Campos sin columna en '{}' ignorados: {:?}", sheet, dropped);
        }

        let row = table.schema.build_row(data);
        self.backend.append_row(sheet, row).await.map_err(|e| {
            log::error!("❌ Error añadiendo fila en '{}': {}", sheet, e);
            e
        })?;

        log::info!("💾 Fila añadida en '{}'", sheet);
        Ok(())
    }

    /// Actualiza celdas de la fila cuyo `key_column` es exactamente `key`
    /// (recortado). Devuelve `Ok(false)` si no hay tal fila.
    ///
    /// Cada celda se escribe por separado: si una escritura falla, las
    /// anteriores quedan aplicadas.
    pub async fn update_cells(
        &self,
        sheet: &str,
        key_column: &str,
        key: &str,
        fields: &[(&str, CellValue)],
    ) -> AppResult<bool> {
        let table = self.load_table(sheet).await?;

        let mut required = vec![key_column];
        required.extend(fields.iter().map(|(column, _)| *column));
        table.schema.require(&required)?;

        let key_idx = table
            .schema
            .column_index(key_column)
            .ok_or_else(|| AppError::Schema(format!("missing key column '{}'", key_column)))?;
        let wanted = key.trim();

        let position = table.rows.iter().position(|row| {
            row.get(key_idx)
                .map(|cell| cell.trim() == wanted)
                .unwrap_or(false)
        });

        let Some(position) = position else {
            log::warn!("⚠️ Ninguna fila con {} = '{}' en '{}'", key_column, wanted, sheet);
            return Ok(false);
        };

        // +1 por el cabecero, +1 porque las filas empiezan en 1
        let sheet_row = position + 2;
        for (column, value) in fields {
            let column_number = table.schema.column_index(column).map(|i| i + 1).ok_or_else(|| {
                AppError::Schema(format!("missing column '{}' in '{}'", column, sheet))
            })?;

            self.backend
                .update_cell(sheet, sheet_row, column_number, value.clone())
                .await
                .map_err(|e| {
                    log::error!(
                        "❌ Error actualizando {}!{} (fila {}): {}",
                        sheet,
                        column,
                        sheet_row,
                        e
                    );
                    e
                })?;
        }

        log::info!("✅ Fila {} de '{}' actualizada", sheet_row, sheet);
        Ok(true)
    }

    /// Registros de un propietario, paginados en orden de inserción.
    /// `has_next` se infiere de una página llena.
    pub async fn list_paginated(
        &self,
        sheet: &str,
        owner_column: &str,
        owner: &str,
        page: usize,
        page_size: usize,
    ) -> AppResult<Page> {
        let page = page.max(1);
        let filtered = self.find_all_by(sheet, owner_column, owner).await?;

        let start = (page - 1).saturating_mul(page_size);
        let items: Vec<Record> = filtered.into_iter().skip(start).take(page_size).collect();
        let has_next = page_size > 0 && items.len() == page_size;

        Ok(Page {
            items,
            page,
            page_size,
            has_next,
        })
    }
}
