//! Registros de hoja de cálculo
//!
//! Un `Record` es una fila leída y mapeada por nombre de cabecero; un
//! `RowData` es una fila por escribir, también indexada por nombre de columna.
//! Los nombres se comparan siempre recortados y en minúsculas.

use serde::Serialize;
use std::collections::HashMap;

/// Normaliza un nombre de columna (`" wpPainel "` -> `"wppainel"`)
pub fn normalize_header(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Comparación de identificadores y emails: recortada e insensible a mayúsculas
pub fn same_identifier(a: &str, b: &str) -> bool {
    a.trim().to_lowercase() == b.trim().to_lowercase()
}

/// Valor de una celda a escribir
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CellValue {
    Text(String),
    Number(f64),
    Bool(bool),
}

impl CellValue {
    pub fn empty() -> Self {
        CellValue::Text(String::new())
    }

    /// Convierte texto numérico simple en número, como hace la hoja al leer
    /// registros; cualquier otro texto se escribe tal cual.
    pub fn numericise(text: &str) -> Self {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return CellValue::Text(text.to_string());
        }
        match trimmed.parse::<f64>() {
            Ok(n) if n.is_finite() => CellValue::Number(n),
            _ => CellValue::Text(text.to_string()),
        }
    }

    /// Representación textual tal como la devuelve la hoja (FORMATTED_VALUE)
    pub fn to_cell_string(&self) -> String {
        match self {
            CellValue::Text(s) => s.clone(),
            CellValue::Number(n) => n.to_string(),
            CellValue::Bool(true) => "TRUE".to_string(),
            CellValue::Bool(false) => "FALSE".to_string(),
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::Text(value)
    }
}

impl From<Option<String>> for CellValue {
    fn from(value: Option<String>) -> Self {
        CellValue::Text(value.unwrap_or_default())
    }
}

impl From<bool> for CellValue {
    fn from(value: bool) -> Self {
        CellValue::Bool(value)
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Number(value)
    }
}

/// Fila leída de una hoja, indexada por cabecero normalizado
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Record {
    fields: HashMap<String, String>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, column: &str, value: impl Into<String>) {
        self.fields.insert(normalize_header(column), value.into());
    }

    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields.get(&normalize_header(column)).map(String::as_str)
    }

    /// Valor de la columna o cadena vacía si no existe
    pub fn text(&self, column: &str) -> String {
        self.get(column).unwrap_or_default().to_string()
    }

    /// Primer valor no vacío entre varios nombres de columna posibles
    pub fn first_of(&self, columns: &[&str]) -> Option<&str> {
        columns
            .iter()
            .filter_map(|c| self.get(c))
            .find(|v| !v.trim().is_empty())
    }

    /// Igualdad recortada e insensible a mayúsculas sobre una columna
    pub fn matches(&self, column: &str, expected: &str) -> bool {
        self.get(column)
            .map(|v| same_identifier(v, expected))
            .unwrap_or(false)
    }
}

/// Fila a escribir: columna -> valor
#[derive(Debug, Clone, Default)]
pub struct RowData {
    cells: HashMap<String, CellValue>,
}

impl RowData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(mut self, column: &str, value: impl Into<CellValue>) -> Self {
        self.cells.insert(normalize_header(column), value.into());
        self
    }

    pub fn get(&self, column: &str) -> Option<&CellValue> {
        self.cells.get(&normalize_header(column))
    }

    pub fn columns(&self) -> impl Iterator<Item = &String> {
        self.cells.keys()
    }
}
