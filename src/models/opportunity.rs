//! Modelo de Opportunity
//!
//! Mapea la hoja `oportunidades`. Los importes se exponen también
//! normalizados porque la planilla los devuelve con formato brasileño.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::product::TechnicalAttributes;
use crate::storage::Record;
use crate::utils::normalize::{parse_locale_number, Normalized};

pub const OPPORTUNITIES_SHEET: &str = "oportunidades";

pub const OPPORTUNITY_COLUMNS: &[&str] = &[
    "id",
    "codigo",
    "nome",
    "email",
    "proprietario",
    "cliente_id",
    "documento",
    "comprovante",
    "estado",
];

/// Estado del flujo de una oportunidad
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum OpportunityState {
    Created,
    PendingReview,
    /// Estados fuera del flujo modelado (aprobación, rechazo...), se conservan tal cual
    Other(String),
}

impl OpportunityState {
    pub fn as_str(&self) -> &str {
        match self {
            OpportunityState::Created => "Criado",
            OpportunityState::PendingReview => "Em análise",
            OpportunityState::Other(s) => s.as_str(),
        }
    }

    pub fn from_cell(value: &str) -> Self {
        match value.trim() {
            "Criado" => OpportunityState::Created,
            "Em análise" => OpportunityState::PendingReview,
            other => OpportunityState::Other(other.to_string()),
        }
    }
}

/// Importes de la oportunidad ya normalizados
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Amounts {
    pub value: Normalized,
    pub price: Normalized,
    pub installment_value: Normalized,
    pub installment_interest: Normalized,
}

/// Opportunity - una fila de la hoja `oportunidades`
#[derive(Debug, Clone, Serialize)]
pub struct Opportunity {
    pub id: String,
    pub code: String,
    pub customer_name: String,
    pub customer_email: String,
    pub description: String,
    pub power: String,
    pub value: String,
    pub owner_id: String,
    pub created_at: String,
    pub customer_id: Option<String>,
    pub document_link: String,
    pub energy_bill_link: String,
    pub state: OpportunityState,
    pub attributes: TechnicalAttributes,
    pub amounts: Amounts,
}

impl Opportunity {
    pub fn from_record(record: &Record) -> Self {
        let attributes = TechnicalAttributes::from_record(record);
        let value = record.text("valor");
        let customer_id = record.text("cliente_id").trim().to_string();

        let amounts = Amounts {
            value: parse_locale_number(&value),
            price: parse_locale_number(&attributes.price),
            installment_value: parse_locale_number(&attributes.installment_value),
            installment_interest: parse_locale_number(&attributes.installment_interest),
        };

        Self {
            id: record.text("id").trim().to_string(),
            code: record.text("codigo"),
            customer_name: record.text("nome"),
            customer_email: record.text("email"),
            description: record.text("descricao"),
            power: record.text("potencia"),
            value,
            owner_id: record.text("proprietario").trim().to_string(),
            created_at: record.text("datacad"),
            customer_id: (!customer_id.is_empty()).then_some(customer_id),
            document_link: record.text("documento"),
            energy_bill_link: record.text("comprovante"),
            state: OpportunityState::from_cell(&record.text("estado")),
            attributes,
            amounts,
        }
    }

    pub fn has_both_documents(&self) -> bool {
        !self.document_link.trim().is_empty() && !self.energy_bill_link.trim().is_empty()
    }
}

/// Cliente de la nueva oportunidad: selección explícita o nombre/email sueltos
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CustomerRef {
    pub customer_id: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
}

/// Enlaces de documentos ya subidos
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachments {
    pub main_document: String,
    pub energy_bill: String,
}

/// Datos para crear una oportunidad
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateOpportunityRequest {
    pub customer: CustomerRef,
    /// Potencia elegida; se compara como texto exacto con el catálogo
    pub power: String,
    pub value: String,
    pub description: String,
    #[serde(default)]
    pub attachments: Attachments,
}

/// Fila nueva de `oportunidades`, ya resuelta (cliente, kit y documentos)
#[derive(Debug, Clone)]
pub struct NewOpportunity {
    pub customer_name: String,
    pub customer_email: String,
    pub customer_id: Option<String>,
    pub description: String,
    pub power: String,
    pub value: String,
    pub owner_id: String,
    pub created_at: String,
    pub attachments: Attachments,
    /// Copia del kit del catálogo, si la potencia existe
    pub product: Option<TechnicalAttributes>,
}

/// Archivo recibido por la capa web y guardado en disco local
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    pub local_path: PathBuf,
    pub file_name: String,
}

/// Modo del envío del formulario de oportunidad
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum SubmissionMode {
    #[default]
    New,
    Continue,
}

/// Envío del formulario de oportunidad
#[derive(Debug, Clone, Default)]
pub struct OpportunitySubmission {
    pub mode: SubmissionMode,
    pub name: Option<String>,
    pub email: Option<String>,
    pub description: String,
    pub power: String,
    pub value: String,
    pub main_document: Option<UploadedFile>,
    pub energy_bill: Option<UploadedFile>,
}

/// Página de oportunidades de un propietario
#[derive(Debug, Clone, Serialize)]
pub struct OpportunityPage {
    pub items: Vec<Opportunity>,
    pub page: usize,
    pub page_size: usize,
    /// Heurística: página llena => hay siguiente (falso positivo si la última
    /// página queda exactamente llena)
    pub has_next: bool,
}
