//! Services module
//!
//! Lógica de negocio: flujo de oportunidades, política de acceso, usuarios,
//! clientes y documentos. Los servicios trabajan sobre los repositorios y
//! nunca hablan directamente con el backend.

pub mod access_policy;
pub mod customer_service;
pub mod document_service;
pub mod draft_store;
pub mod identifier_service;
pub mod opportunity_workflow;
pub mod user_service;

pub use customer_service::CustomerService;
pub use document_service::DocumentService;
pub use draft_store::DraftStore;
pub use identifier_service::{IdentifierService, RecordIdentifier, RecordType};
pub use opportunity_workflow::{OpportunityWorkflow, WorkflowError, WorkflowResult};
pub use user_service::UserService;
