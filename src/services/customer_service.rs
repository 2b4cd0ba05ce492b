use validator::Validate;

use crate::models::customer::{Customer, NewCustomerRequest};
use crate::models::user::SessionUser;
use crate::repositories::CustomerRepository;
use crate::services::access_policy::{allows, Action};
use crate::services::identifier_service::RecordIdentifier;
use crate::storage::record::same_identifier;
use crate::utils::errors::{forbidden_error, AppResult};
use crate::utils::time::local_timestamp;

/// Alta y consulta de clientes; cada cliente pertenece a quien lo registra
#[derive(Clone)]
pub struct CustomerService {
    customers: CustomerRepository,
    utc_offset_hours: i32,
}

impl CustomerService {
    pub fn new(customers: CustomerRepository, utc_offset_hours: i32) -> Self {
        Self {
            customers,
            utc_offset_hours,
        }
    }

    pub async fn register(
        &self,
        user: &SessionUser,
        request: NewCustomerRequest,
    ) -> AppResult<RecordIdentifier> {
        if !allows(user.role, Action::RegisterCustomer) {
            return Err(forbidden_error("register customer", user.role.as_str()));
        }
        request.validate()?;

        let created_at = local_timestamp(self.utc_offset_hours);
        let ident = self.customers.create(&request, &user.id, &created_at).await?;
        log::info!("🧾 Cliente {} registrado por {}", ident.code, user.id);
        Ok(ident)
    }

    pub async fn list_mine(&self, user: &SessionUser) -> AppResult<Vec<Customer>> {
        if !allows(user.role, Action::ViewCustomers) {
            return Err(forbidden_error("list customers", user.role.as_str()));
        }
        self.customers.list_by_owner(&user.id).await
    }

    /// Cliente por ID, sólo si pertenece al usuario
    pub async fn find_mine(&self, user: &SessionUser, id: &str) -> AppResult<Option<Customer>> {
        if !allows(user.role, Action::ViewCustomers) {
            return Err(forbidden_error("view customer", user.role.as_str()));
        }
        Ok(self
            .customers
            .find_by_id(id)
            .await?
            .filter(|c| same_identifier(&c.owner_id, &user.id)))
    }
}
