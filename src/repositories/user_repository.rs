use crate::models::user::{
    RegisterUserRequest, User, PASSWORD_COLUMNS, USERS_SHEET, USER_COLUMNS,
};
use crate::repositories::sheet_repository::SheetRepository;
use crate::services::identifier_service::{IdentifierService, RecordIdentifier, RecordType};
use crate::storage::RowData;
use crate::utils::errors::{schema_error, AppResult};

#[derive(Clone)]
pub struct UserRepository {
    sheets: SheetRepository,
    identifiers: IdentifierService,
}

impl UserRepository {
    pub fn new(sheets: SheetRepository) -> Self {
        Self {
            sheets,
            identifiers: IdentifierService::new(),
        }
    }

    /// Además de las columnas fijas, exige una columna para el hash
    /// (`senha` o `senha_hash`)
    pub async fn verify_schema(&self) -> AppResult<()> {
        let table = self.sheets.load_table(USERS_SHEET).await?;
        table.schema.require(USER_COLUMNS)?;
        if PASSWORD_COLUMNS
            .iter()
            .all(|c| table.schema.column_index(c).is_none())
        {
            return Err(schema_error(USERS_SHEET, &[PASSWORD_COLUMNS.join(" | ")]));
        }
        log::info!("✅ Hoja '{}' verificada ({} filas)", USERS_SHEET, table.rows.len());
        Ok(())
    }

    /// Alta de usuario: inactivo y sin rol asignado
    pub async fn create(
        &self,
        request: &RegisterUserRequest,
        password_hash: &str,
    ) -> AppResult<RecordIdentifier> {
        let ident = self.identifiers.generate(RecordType::User);

        // Sólo se escribe la columna de hash que exista en el cabecero
        let [primary, alternate] = PASSWORD_COLUMNS;
        let row = RowData::new()
            .set("id", ident.id.as_str())
            .set("codigo", ident.code.as_str())
            .set("email", request.email.trim())
            .set(primary, password_hash)
            .set(alternate, password_hash)
            .set("ativo", false)
            .set("nome", request.name.as_str())
            .set("sobrenome", request.surname.as_str())
            .set("cidade", request.city.as_str())
            .set("telefone", request.phone.as_str());

        self.sheets.append_row(USERS_SHEET, &row).await?;
        Ok(ident)
    }

    pub async fn list_all(&self) -> AppResult<Vec<User>> {
        let records = self.sheets.list_all(USERS_SHEET).await?;
        Ok(records.iter().map(User::from_record).collect())
    }

    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<User>> {
        let record = self
            .sheets
            .find_one(USERS_SHEET, |r| r.matches("id", id))
            .await?;
        Ok(record.as_ref().map(User::from_record))
    }

    pub async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let record = self
            .sheets
            .find_one(USERS_SHEET, |r| r.matches("email", email))
            .await?;
        Ok(record.as_ref().map(User::from_record))
    }

    pub async fn email_exists(&self, email: &str) -> AppResult<bool> {
        Ok(self.find_by_email(email).await?.is_some())
    }
}
