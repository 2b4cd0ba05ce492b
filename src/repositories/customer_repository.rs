use crate::models::customer::{Customer, NewCustomerRequest, CUSTOMERS_SHEET, CUSTOMER_COLUMNS};
use crate::repositories::sheet_repository::SheetRepository;
use crate::services::identifier_service::{IdentifierService, RecordIdentifier, RecordType};
use crate::storage::RowData;
use crate::utils::errors::AppResult;

#[derive(Clone)]
pub struct CustomerRepository {
    sheets: SheetRepository,
    identifiers: IdentifierService,
}

impl CustomerRepository {
    pub fn new(sheets: SheetRepository) -> Self {
        Self {
            sheets,
            identifiers: IdentifierService::new(),
        }
    }

    pub async fn verify_schema(&self) -> AppResult<()> {
        self.sheets.verify_schema(CUSTOMERS_SHEET, CUSTOMER_COLUMNS).await
    }

    pub async fn create(
        &self,
        request: &NewCustomerRequest,
        owner_id: &str,
        created_at: &str,
    ) -> AppResult<RecordIdentifier> {
        let ident = self.identifiers.generate(RecordType::Customer);

        let row = RowData::new()
            .set("id", ident.id.as_str())
            .set("codigo", ident.code.as_str())
            .set("nome", request.name.as_str())
            .set("cpf", request.cpf.clone())
            .set("nascimento", request.birth_date.clone())
            .set("email", request.email.as_str())
            .set("telefone", request.phone.clone())
            .set("proprietario", owner_id)
            .set("datacad", created_at)
            .set("cep", request.cep.clone())
            .set("estado", request.state.clone())
            .set("municipio", request.municipality.clone())
            .set("logradouro", request.street.clone())
            .set("numero", request.number.clone());

        self.sheets.append_row(CUSTOMERS_SHEET, &row).await?;
        Ok(ident)
    }

    pub async fn list_by_owner(&self, owner_id: &str) -> AppResult<Vec<Customer>> {
        let records = self
            .sheets
            .find_all_by(CUSTOMERS_SHEET, "proprietario", owner_id)
            .await?;
        Ok(records.iter().map(Customer::from_record).collect())
    }

    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<Customer>> {
        let record = self
            .sheets
            .find_one(CUSTOMERS_SHEET, |r| r.matches("id", id))
            .await?;
        Ok(record.as_ref().map(Customer::from_record))
    }

    /// Cliente de un propietario con ese email
    pub async fn find_by_email_and_owner(
        &self,
        email: &str,
        owner_id: &str,
    ) -> AppResult<Option<Customer>> {
        let record = self
            .sheets
            .find_one(CUSTOMERS_SHEET, |r| {
                r.matches("email", email) && r.matches("proprietario", owner_id)
            })
            .await?;
        Ok(record.as_ref().map(Customer::from_record))
    }
}
