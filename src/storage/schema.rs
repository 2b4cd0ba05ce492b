//! Mapeo cabecero -> índice de columna
//!
//! Se construye una vez por acceso a la hoja a partir de la fila de cabecero
//! actual, así el orden de las columnas en la planilla puede cambiar sin tocar
//! el código.

use std::collections::HashMap;

use super::record::{normalize_header, CellValue, Record, RowData};
use crate::utils::errors::{schema_error, AppResult};

#[derive(Debug, Clone)]
pub struct TableSchema {
    sheet: String,
    headers: Vec<String>,
    index: HashMap<String, usize>,
}

impl TableSchema {
    pub fn from_header(sheet: &str, header_row: &[String]) -> Self {
        let headers: Vec<String> = header_row.iter().map(|h| normalize_header(h)).collect();
        let mut index = HashMap::new();
        for (i, name) in headers.iter().enumerate() {
            if !name.is_empty() {
                index.entry(name.clone()).or_insert(i);
            }
        }
        Self {
            sheet: sheet.to_string(),
            headers,
            index,
        }
    }

    /// Número de columnas del cabecero (incluye cabeceros vacíos)
    pub fn width(&self) -> usize {
        self.headers.len()
    }

    /// Índice 0-based de la columna
    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.index.get(&normalize_header(column)).copied()
    }

    /// Falla si falta alguna de las columnas esperadas
    pub fn require(&self, columns: &[&str]) -> AppResult<()> {
        let missing: Vec<String> = columns
            .iter()
            .filter(|c| self.column_index(c).is_none())
            .map(|c| c.to_string())
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(schema_error(&self.sheet, &missing))
        }
    }

    /// Mapea una fila de datos posicionalmente. Las filas con menos celdas que
    /// el cabecero se descartan.
    pub fn map_row(&self, row: &[String]) -> Option<Record> {
        if row.len() < self.headers.len() {
            return None;
        }

        let mut record = Record::new();
        for (name, &i) in &self.index {
            record.insert(name, row[i].clone());
        }
        Some(record)
    }

    /// Construye la fila a escribir en el orden del cabecero. Las columnas sin
    /// valor quedan vacías; los campos que no están en el cabecero se ignoran.
    pub fn build_row(&self, data: &RowData) -> Vec<CellValue> {
        self.headers
            .iter()
            .map(|name| data.get(name).cloned().unwrap_or_else(CellValue::empty))
            .collect()
    }

    /// Campos de `data` que no tienen columna en el cabecero
    pub fn unknown_columns<'a>(&self, data: &'a RowData) -> Vec<&'a String> {
        data.columns()
            .filter(|c| !self.index.contains_key(c.as_str()))
            .collect()
    }
}
