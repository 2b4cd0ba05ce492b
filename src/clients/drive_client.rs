//! Cliente de Google Drive (API v3)
//!
//! Sube un archivo, lo mueve a la carpeta configurada y le da permiso de
//! lectura a cualquiera con el enlace.

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::Deserialize;
use serde_json::json;
use std::path::Path;
use std::sync::Arc;

use super::google_auth::GoogleAuth;
use crate::storage::FileStorage;
use crate::utils::errors::{backend_error, AppResult};

#[derive(Debug, Deserialize)]
struct DriveFile {
    id: String,
}

pub struct DriveClient {
    client: Client,
    auth: Arc<GoogleAuth>,
    api_url: String,
    upload_url: String,
    folder_id: Option<String>,
}

impl DriveClient {
    pub fn new(
        client: Client,
        auth: Arc<GoogleAuth>,
        api_url: &str,
        upload_url: &str,
        folder_id: Option<String>,
    ) -> Self {
        Self {
            client,
            auth,
            api_url: api_url.trim_end_matches('/').to_string(),
            upload_url: upload_url.trim_end_matches('/').to_string(),
            folder_id,
        }
    }

    async fn check(operation: &str, response: Response) -> AppResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        log::error!("❌ Drive API {} falló ({}): {}", operation, status, body);
        Err(backend_error(operation, format!("status {}", status)))
    }
}

#[async_trait]
impl FileStorage for DriveClient {
    async fn upload(&self, local_path: &Path, file_name: &str) -> AppResult<String> {
        let bytes = tokio::fs::read(local_path).await?;
        let token = self.auth.access_token().await?;
        log::info!("📤 Subiendo '{}' a Drive ({} bytes)", file_name, bytes.len());

        let response = self
            .client
            .post(format!("{}/files?uploadType=media", self.upload_url))
            .bearer_auth(&token)
            .header(reqwest::header::CONTENT_TYPE, content_type(file_name))
            .body(bytes)
            .send()
            .await?;
        let file: DriveFile = Self::check("upload file", response).await?.json().await?;

        // La subida simple no admite metadatos: nombre y carpeta van aparte
        let mut metadata_url = format!("{}/files/{}", self.api_url, file.id);
        if let Some(folder) = &self.folder_id {
            metadata_url.push_str(&format!("?addParents={}", urlencoding::encode(folder)));
        }
        let response = self
            .client
            .patch(metadata_url)
            .bearer_auth(&token)
            .json(&json!({ "name": file_name }))
            .send()
            .await?;
        Self::check("rename file", response).await?;

        let response = self
            .client
            .post(format!("{}/files/{}/permissions", self.api_url, file.id))
            .bearer_auth(&token)
            .json(&json!({ "type": "anyone", "role": "reader" }))
            .send()
            .await?;
        Self::check("share file", response).await?;

        Ok(view_link(&file.id))
    }
}

pub fn view_link(file_id: &str) -> String {
    format!("https://drive.google.com/file/d/{}/view", file_id)
}

fn content_type(file_name: &str) -> &'static str {
    let extension = Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();

    match extension.as_str() {
        "pdf" => "application/pdf",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        _ => "application/octet-stream",
    }
}
