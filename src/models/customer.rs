//! Modelo de Customer
//!
//! Mapea la hoja `clientes`. Cada cliente pertenece al usuario que lo creó.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::storage::Record;

pub const CUSTOMERS_SHEET: &str = "clientes";

pub const CUSTOMER_COLUMNS: &[&str] = &["id", "codigo", "nome", "email", "proprietario"];

/// Customer - una fila de la hoja `clientes`
#[derive(Debug, Clone, Serialize)]
pub struct Customer {
    pub id: String,
    pub code: String,
    pub name: String,
    pub cpf: String,
    pub birth_date: String,
    pub email: String,
    pub phone: String,
    pub owner_id: String,
    pub created_at: String,
    pub cep: String,
    pub state: String,
    pub municipality: String,
    pub street: String,
    pub number: String,
}

impl Customer {
    pub fn from_record(record: &Record) -> Self {
        Self {
            id: record.text("id").trim().to_string(),
            code: record.text("codigo"),
            name: record.text("nome"),
            cpf: record.text("cpf"),
            birth_date: record.text("nascimento"),
            email: record.text("email"),
            phone: record.text("telefone"),
            owner_id: record.text("proprietario").trim().to_string(),
            created_at: record.text("datacad"),
            cep: record.text("cep"),
            state: record.text("estado"),
            municipality: record.text("municipio"),
            street: record.text("logradouro"),
            number: record.text("numero"),
        }
    }
}

/// Request para registrar un cliente
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct NewCustomerRequest {
    #[validate(length(min = 1))]
    pub name: String,

    #[validate(length(min = 1))]
    pub email: String,

    pub phone: Option<String>,
    pub cpf: Option<String>,
    pub birth_date: Option<String>,
    pub cep: Option<String>,
    pub state: Option<String>,
    pub municipality: Option<String>,
    pub street: Option<String>,
    pub number: Option<String>,
}
