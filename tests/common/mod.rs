//! Utilidades compartidas por los tests de integración

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;

use solar_crm::config::EnvironmentConfig;
use solar_crm::models::user::{SessionUser, UserRole};
use solar_crm::state::AppState;
use solar_crm::storage::{MemoryBackend, RecordingStorage};

pub const USER_HEADER: &[&str] = &[
    "id", "codigo", "email", "senha", "ativo", "nome", "sobrenome", "cidade", "telefone", "acesso",
];

pub const CUSTOMER_HEADER: &[&str] = &[
    "id", "codigo", "nome", "cpf", "nascimento", "email", "telefone", "proprietario", "datacad",
    "cep", "estado", "municipio", "logradouro", "numero",
];

pub const OPPORTUNITY_HEADER: &[&str] = &[
    "id", "codigo", "nome", "email", "descricao", "potencia", "valor", "proprietario", "datacad",
    "cliente_id", "documento", "comprovante", "estado", "pacote", "kwp", "kw", "inversor",
    "wpPainel", "unidadePainel", "espacoFisico", "preco", "juros", "valorParcela", "valorJuros",
];

pub const PRODUCT_HEADER: &[&str] = &[
    "pacote", "potencia", "kwp", "kw", "inversor", "wpPainel", "unidadePainel", "espacoFisico",
    "preco", "juros", "valorParcela", "valorJuros",
];

pub struct TestApp {
    pub state: AppState,
    pub sheets: Arc<MemoryBackend>,
    pub files: Arc<RecordingStorage>,
}

pub fn test_config() -> EnvironmentConfig {
    let vars: HashMap<&str, &str> = [
        ("GOOGLE_CREDS_ADM", "{}"),
        ("PLANILHA_ADM_ID", "test-sheet"),
        ("BCRYPT_COST", "4"),
        ("LOCAL_UTC_OFFSET_HOURS", "-3"),
    ]
    .into_iter()
    .collect();
    EnvironmentConfig::from_lookup(|name| vars.get(name).map(|v| v.to_string()))
        .expect("test config")
}

/// Planilla con las cuatro hojas y un kit de 5 kWp en el catálogo
pub async fn setup() -> TestApp {
    let sheets = Arc::new(MemoryBackend::new());
    sheets.create_sheet("usuarios", USER_HEADER).await;
    sheets.create_sheet("clientes", CUSTOMER_HEADER).await;
    sheets.create_sheet("oportunidades", OPPORTUNITY_HEADER).await;
    sheets.create_sheet("produtos", PRODUCT_HEADER).await;
    sheets
        .push_raw_row(
            "produtos",
            &[
                "Kit Residencial", "5 kWp", "550", "5", "Growatt 5K", "550", "10", "30 m2",
                "28.000,00", "1,5", "183556", "1.2",
            ],
        )
        .await;

    let files = Arc::new(RecordingStorage::new());
    let state = AppState::new(test_config(), sheets.clone(), files.clone());

    TestApp {
        state,
        sheets,
        files,
    }
}

pub fn salesperson(id: &str) -> SessionUser {
    SessionUser {
        id: id.to_string(),
        role: UserRole::Salesperson,
    }
}

pub fn session_user(id: &str, role: UserRole) -> SessionUser {
    SessionUser {
        id: id.to_string(),
        role,
    }
}
