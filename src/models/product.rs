//! Catálogo de productos (hoja `produtos`, sólo lectura)

use serde::Serialize;

use crate::storage::Record;

pub const PRODUCTS_SHEET: &str = "produtos";

pub const PRODUCT_COLUMNS: &[&str] = &["potencia", "preco"];

/// Bloque técnico y de precio de un kit; se copia en la oportunidad al crearla
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TechnicalAttributes {
    pub package: String,
    pub kwp: String,
    pub kw: String,
    pub inverter: String,
    pub panel_wp: String,
    pub panel_count: String,
    pub physical_space: String,
    pub price: String,
    pub interest: String,
    pub installment_value: String,
    pub installment_interest: String,
}

impl TechnicalAttributes {
    pub fn from_record(record: &Record) -> Self {
        Self {
            package: record.text("pacote"),
            kwp: record.text("kwp"),
            kw: record.text("kw"),
            inverter: record.text("inversor"),
            panel_wp: record.text("wpPainel"),
            panel_count: record.text("unidadePainel"),
            physical_space: record.text("espacoFisico"),
            price: record.text("preco"),
            interest: record.text("juros"),
            installment_value: record.text("valorParcela"),
            installment_interest: record.text("valorJuros"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Product {
    pub power: String,
    pub attributes: TechnicalAttributes,
}

impl Product {
    pub fn from_record(record: &Record) -> Self {
        Self {
            power: record.text("potencia"),
            attributes: TechnicalAttributes::from_record(record),
        }
    }
}

/// Opción del selector de potencia del formulario
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ProductCategory {
    pub power: String,
    pub price: String,
}
