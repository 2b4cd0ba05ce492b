//! Datos temporales del flujo "nueva / continuar oportunidad"
//!
//! Viven en la sesión de un único usuario entre el inicio del flujo y el envío
//! del formulario; se borran tras cada envío.

use serde::{Deserialize, Serialize};

use super::opportunity::Opportunity;
use super::product::ProductCategory;
use crate::services::identifier_service::RecordIdentifier;

/// Borrador de la sesión
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpportunityDraft {
    /// Oportunidad a continuar
    pub opportunity_id: Option<String>,
    pub continuing: bool,
    pub customer_name: Option<String>,
    pub customer_email: Option<String>,
    /// Cliente elegido explícitamente al iniciar el flujo
    pub customer_id: Option<String>,
}

/// Cómo se inicia el flujo
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub enum FlowStart {
    /// Desde la lista de oportunidades: adjuntar documentos a una existente
    Continue { opportunity_id: String },
    /// Desde la lista de clientes o un enlace directo
    New {
        customer_id: Option<String>,
        name: Option<String>,
        email: Option<String>,
    },
}

/// Datos que necesita el formulario de oportunidad
#[derive(Debug, Clone, Serialize)]
pub struct FormContext {
    pub categories: Vec<ProductCategory>,
    /// Oportunidad a continuar, ya comprobado el propietario
    pub opportunity: Option<Opportunity>,
    pub continuing: bool,
    pub customer_name: Option<String>,
    pub customer_email: Option<String>,
}

/// Resultado de un envío del formulario
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum SubmissionOutcome {
    Created(RecordIdentifier),
    Continued { opportunity_id: String },
}
