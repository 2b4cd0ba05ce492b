//! Generación de identificadores
//!
//! Cada registro nuevo recibe un ID técnico (UUID v4, la clave real) y un
//! código corto legible (`OPO-0042-A1F`) que sólo sirve para mostrar.

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::Serialize;
use sha1::{Digest, Sha1};
use uuid::Uuid;

/// Tipo de registro; define el prefijo del código corto
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordType {
    User,
    Customer,
    Opportunity,
}

impl RecordType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordType::User => "usuario",
            RecordType::Customer => "cliente",
            RecordType::Opportunity => "oportunidade",
        }
    }

    /// Tres primeras letras en mayúsculas
    pub fn prefix(&self) -> String {
        self.as_str().chars().take(3).collect::<String>().to_uppercase()
    }
}

/// Par ID técnico / código corto asignado a un registro
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordIdentifier {
    pub id: String,
    pub code: String,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct IdentifierService;

impl IdentifierService {
    pub fn new() -> Self {
        Self
    }

    pub fn generate(&self, record_type: RecordType) -> RecordIdentifier {
        let id = Uuid::new_v4().to_string();
        let number = rand::thread_rng().gen_range(1..=9999);
        let code = short_code(record_type, &id, Utc::now(), number);
        RecordIdentifier { id, code }
    }
}

/// `{PREFIJO}-{número con 4 dígitos}-{3 hex del SHA-1 de id + fecha}`
pub fn short_code(
    record_type: RecordType,
    technical_id: &str,
    now: DateTime<Utc>,
    number: u32,
) -> String {
    let seed = format!("{}-{}", technical_id, now.format("%Y%m%d%H%M%S"));
    let digest = format!("{:X}", Sha1::digest(seed.as_bytes()));
    format!("{}-{:04}-{}", record_type.prefix(), number, &digest[..3])
}
