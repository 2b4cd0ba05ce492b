//! Vista previa de la propuesta comercial
//!
//! Reúne la oportunidad, el cliente vinculado (si existe) y los importes ya
//! formateados en reales para imprimir.

use serde::Serialize;

use super::customer::Customer;
use super::opportunity::Opportunity;
use crate::utils::normalize::{format_br_currency, Normalized};

#[derive(Debug, Clone, Serialize)]
pub struct Proposal {
    pub opportunity: Opportunity,
    pub customer: Option<Customer>,
    pub value_display: String,
    pub price_display: String,
    pub installment_display: String,
}

impl Proposal {
    pub fn new(opportunity: Opportunity, customer: Option<Customer>) -> Self {
        let amounts = &opportunity.amounts;
        Self {
            value_display: display_amount(&amounts.value),
            price_display: display_amount(&amounts.price),
            installment_display: display_amount(&amounts.installment_value),
            opportunity,
            customer,
        }
    }
}

/// Número -> `28.000,00`; vacío -> `0,00`; cualquier otro texto tal cual
pub fn display_amount(value: &Normalized) -> String {
    match value {
        Normalized::Number(n) => format_br_currency(*n),
        Normalized::Unchanged(text) if text.trim().is_empty() => "0,00".to_string(),
        Normalized::Unchanged(text) => text.clone(),
    }
}
