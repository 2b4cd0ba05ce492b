//! Subida de documentos adjuntos
//!
//! Los archivos llegan guardados en disco local; se suben al almacén de
//! archivos y la copia local se borra aunque la subida falle.

use std::sync::Arc;

use crate::models::opportunity::{Attachments, UploadedFile};
use crate::storage::FileStorage;
use crate::utils::errors::AppResult;

#[derive(Clone)]
pub struct DocumentService {
    storage: Arc<dyn FileStorage>,
}

impl DocumentService {
    pub fn new(storage: Arc<dyn FileStorage>) -> Self {
        Self { storage }
    }

    /// Sube un archivo y devuelve su enlace público
    pub async fn store(&self, file: &UploadedFile) -> AppResult<String> {
        let result = self.storage.upload(&file.local_path, &file.file_name).await;

        if let Err(e) = tokio::fs::remove_file(&file.local_path).await {
            log::warn!(
                "⚠️ No se pudo borrar el archivo local {}: {}",
                file.local_path.display(),
                e
            );
        }

        match &result {
            Ok(link) => log::info!("📤 Archivo '{}' subido: {}", file.file_name, link),
            Err(e) => log::error!("❌ Error subiendo '{}': {}", file.file_name, e),
        }
        result
    }

    async fn store_optional(&self, file: Option<&UploadedFile>) -> AppResult<String> {
        match file {
            Some(file) => self.store(file).await,
            None => Ok(String::new()),
        }
    }

    /// Sube documento principal y conta de luz a la vez; los ausentes quedan
    /// como enlace vacío. Las dos subidas terminan (y borran su copia local)
    /// aunque una de ellas falle.
    pub async fn store_pair(
        &self,
        main_document: Option<&UploadedFile>,
        energy_bill: Option<&UploadedFile>,
    ) -> AppResult<Attachments> {
        let (main_document, energy_bill) = futures::join!(
            self.store_optional(main_document),
            self.store_optional(energy_bill)
        );

        Ok(Attachments {
            main_document: main_document?,
            energy_bill: energy_bill?,
        })
    }
}
