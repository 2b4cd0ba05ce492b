use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use solar_crm::clients::{DriveClient, GoogleAuth, ServiceAccountKey, SheetsClient};
use solar_crm::config::EnvironmentConfig;
use solar_crm::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    // Configurar logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("☀️ Solar CRM - planilla y documentos");
    info!("================================================");

    let config = EnvironmentConfig::from_env().context("Error de configuración")?;
    info!("⚙️ Entorno: {}", config.environment);
    if config.is_development() {
        info!("🛠️ Modo desarrollo: usa RUST_LOG=debug para ver el detalle de cada hoja");
    }

    let http_client = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.http_timeout_secs))
        .build()
        .context("No se pudo crear el cliente HTTP")?;

    let key = ServiceAccountKey::from_json(&config.google_credentials)?;
    let auth = Arc::new(GoogleAuth::new(http_client.clone(), key)?);

    let sheets = Arc::new(SheetsClient::new(
        http_client.clone(),
        auth.clone(),
        &config.sheets_api_url,
        &config.spreadsheet_id,
    ));
    let drive = Arc::new(DriveClient::new(
        http_client,
        auth,
        &config.drive_api_url,
        &config.drive_upload_url,
        config.drive_folder_id.clone(),
    ));

    let state = AppState::new(config, sheets, drive);

    if let Err(e) = state.verify_schemas().await {
        error!("❌ La planilla no tiene el esquema esperado: {}", e);
        return Err(e.into());
    }

    let users = state.users.list_all().await?;
    let active = users.iter().filter(|u| u.active).count();
    info!("👥 Usuarios: {} ({} activos)", users.len(), active);

    let categories = state.products.categories().await?;
    info!("📦 Categorías de producto: {}", categories.len());

    for (estado, total) in state.opportunities.count_by_state().await? {
        info!("📊 Oportunidades '{}': {}", estado, total);
    }

    info!("✅ Solar CRM listo");
    Ok(())
}
