//! Shared application state
//!
//! Agrupa la configuración, los repositorios y los servicios construidos una
//! sola vez en `main` sobre los backends elegidos. Los backends se comparten
//! por `Arc`, sin singletons globales.

use std::sync::Arc;

use crate::config::environment::EnvironmentConfig;
use crate::repositories::{
    CustomerRepository, OpportunityRepository, ProductRepository, SheetRepository, UserRepository,
};
use crate::services::{CustomerService, DocumentService, DraftStore, OpportunityWorkflow, UserService};
use crate::storage::{FileStorage, SheetBackend};
use crate::utils::errors::AppResult;

#[derive(Clone)]
pub struct AppState {
    pub config: EnvironmentConfig,
    pub users: UserRepository,
    pub customers: CustomerRepository,
    pub opportunities: OpportunityRepository,
    pub products: ProductRepository,
    pub drafts: DraftStore,
    pub user_service: UserService,
    pub customer_service: CustomerService,
    pub workflow: OpportunityWorkflow,
}

impl AppState {
    pub fn new(
        config: EnvironmentConfig,
        sheets: Arc<dyn SheetBackend>,
        files: Arc<dyn FileStorage>,
    ) -> Self {
        let adapter = SheetRepository::new(sheets);
        let users = UserRepository::new(adapter.clone());
        let customers = CustomerRepository::new(adapter.clone());
        let opportunities = OpportunityRepository::new(adapter.clone());
        let products = ProductRepository::new(adapter);
        let drafts = DraftStore::new();

        let workflow = OpportunityWorkflow::new(
            opportunities.clone(),
            customers.clone(),
            products.clone(),
            DocumentService::new(files),
            drafts.clone(),
            config.utc_offset_hours,
        );

        Self {
            user_service: UserService::new(users.clone(), config.bcrypt_cost),
            customer_service: CustomerService::new(customers.clone(), config.utc_offset_hours),
            workflow,
            config,
            users,
            customers,
            opportunities,
            products,
            drafts,
        }
    }

    /// Comprueba el cabecero de todas las hojas; falla en la primera incompleta
    pub async fn verify_schemas(&self) -> AppResult<()> {
        log::info!("🔍 Verificando esquema de la planilla...");
        self.users.verify_schema().await?;
        self.customers.verify_schema().await?;
        self.opportunities.verify_schema().await?;
        self.products.verify_schema().await?;
        log::info!("✅ Esquema verificado");
        Ok(())
    }
}
