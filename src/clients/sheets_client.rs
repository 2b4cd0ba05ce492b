//! Cliente de Google Sheets (API v4, recurso `values`)
//!
//! Implementa `SheetBackend` sobre una única planilla. Las hojas se
//! direccionan por nombre; las celdas en notación A1.

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

use super::google_auth::GoogleAuth;
use crate::storage::{CellValue, SheetBackend};
use crate::utils::errors::{backend_error, AppResult};

#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<Value>>,
}

pub struct SheetsClient {
    client: Client,
    auth: Arc<GoogleAuth>,
    base_url: String,
    spreadsheet_id: String,
}

impl SheetsClient {
    pub fn new(client: Client, auth: Arc<GoogleAuth>, base_url: &str, spreadsheet_id: &str) -> Self {
        Self {
            client,
            auth,
            base_url: base_url.trim_end_matches('/').to_string(),
            spreadsheet_id: spreadsheet_id.to_string(),
        }
    }

    fn values_url(&self, range: &str) -> String {
        format!(
            "{}/spreadsheets/{}/values/{}",
            self.base_url,
            self.spreadsheet_id,
            urlencoding::encode(range)
        )
    }

    async fn check(operation: &str, response: Response) -> AppResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        log::error!("❌ Sheets API {} falló ({}): {}", operation, status, body);
        Err(backend_error(operation, format!("status {}", status)))
    }
}

#[async_trait]
impl SheetBackend for SheetsClient {
    async fn get_values(&self, sheet: &str) -> AppResult<Vec<Vec<String>>> {
        let token = self.auth.access_token().await?;
        let response = self
            .client
            .get(self.values_url(sheet))
            .bearer_auth(token)
            .send()
            .await?;

        let range: ValueRange = Self::check("read sheet", response).await?.json().await?;
        log::debug!("📄 Hoja '{}' leída: {} filas", sheet, range.values.len());
        Ok(fill_gaps(range.values))
    }

    async fn append_row(&self, sheet: &str, cells: Vec<CellValue>) -> AppResult<()> {
        let token = self.auth.access_token().await?;
        let url = format!(
            "{}:append?valueInputOption=RAW&insertDataOption=INSERT_ROWS",
            self.values_url(sheet)
        );

        let response = self
            .client
            .post(url)
            .bearer_auth(token)
            .json(&json!({ "values": [cells] }))
            .send()
            .await?;

        Self::check("append row", response).await?;
        Ok(())
    }

    async fn update_cell(
        &self,
        sheet: &str,
        row: usize,
        column: usize,
        value: CellValue,
    ) -> AppResult<()> {
        let range = a1_cell(sheet, row, column)?;
        let token = self.auth.access_token().await?;
        let url = format!("{}?valueInputOption=USER_ENTERED", self.values_url(&range));

        let response = self
            .client
            .put(url)
            .bearer_auth(token)
            .json(&json!({ "range": range, "values": [[value]] }))
            .send()
            .await?;

        Self::check("update cell", response).await?;
        Ok(())
    }
}

/// Rellena con celdas vacías hasta el ancho de la fila más larga; la API
/// omite las celdas vacías del final de cada fila.
fn fill_gaps(values: Vec<Vec<Value>>) -> Vec<Vec<String>> {
    let width = values.iter().map(Vec::len).max().unwrap_or(0);
    values
        .into_iter()
        .map(|row| {
            let mut cells: Vec<String> = row.into_iter().map(cell_text).collect();
            cells.resize(width, String::new());
            cells
        })
        .collect()
}

fn cell_text(value: Value) -> String {
    match value {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Letra de columna en notación A1 (1 -> A, 27 -> AA)
fn column_letter(mut column: usize) -> String {
    let mut letters = Vec::new();
    while column > 0 {
        let rem = (column - 1) % 26;
        letters.push(b'A' + rem as u8);
        column = (column - 1) / 26;
    }
    letters.reverse();
    String::from_utf8_lossy(&letters).into_owned()
}

fn a1_cell(sheet: &str, row: usize, column: usize) -> AppResult<String> {
    if row == 0 || column == 0 {
        return Err(backend_error("update cell", "row and column are 1-based"));
    }
    Ok(format!(
        "'{}'!{}{}",
        sheet.replace('\'', "''"),
        column_letter(column),
        row
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_letter() {
        assert_eq!(column_letter(1), "A");
        assert_eq!(column_letter(13), "M");
        assert_eq!(column_letter(26), "Z");
        assert_eq!(column_letter(27), "AA");
        assert_eq!(column_letter(703), "AAA");
    }

    #[test]
    fn test_a1_cell() {
        assert_eq!(a1_cell("oportunidades", 5, 11).unwrap(), "'oportunidades'!K5");
        assert_eq!(a1_cell("d'água", 2, 1).unwrap(), "'d''água'!A2");
        assert!(a1_cell("x", 0, 1).is_err());
    }

    #[test]
    fn test_fill_gaps() {
        let values = vec![
            vec![json!("id"), json!("nome"), json!("estado")],
            vec![json!("1"), json!(42)],
            vec![],
        ];
        let rows = fill_gaps(values);
        assert_eq!(rows[1], vec!["1".to_string(), "42".to_string(), String::new()]);
        assert_eq!(rows[2].len(), 3);
    }
}
