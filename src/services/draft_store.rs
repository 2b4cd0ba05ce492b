use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::models::flow::OpportunityDraft;

/// Vida de un borrador sin envío
pub const DEFAULT_DRAFT_TTL_HOURS: i64 = 2;

#[derive(Debug, Clone)]
struct StoredDraft {
    draft: OpportunityDraft,
    expires_at: DateTime<Utc>,
}

impl StoredDraft {
    fn is_expired(&self) -> bool {
        Utc::now() > self.expires_at
    }
}

/// Borradores del flujo de oportunidad, uno por sesión
#[derive(Clone)]
pub struct DraftStore {
    drafts: Arc<RwLock<HashMap<String, StoredDraft>>>,
    ttl: Duration,
}

impl Default for DraftStore {
    fn default() -> Self {
        Self::with_ttl(Duration::hours(DEFAULT_DRAFT_TTL_HOURS))
    }
}

impl DraftStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            drafts: Arc::new(RwLock::new(HashMap::new())),
            ttl,
        }
    }

    /// Borrador vigente de la sesión; los caducados no se devuelven
    pub async fn get(&self, session_id: &str) -> Option<OpportunityDraft> {
        self.drafts
            .read()
            .await
            .get(session_id)
            .filter(|stored| !stored.is_expired())
            .map(|stored| stored.draft.clone())
    }

    pub async fn put(&self, session_id: &str, draft: OpportunityDraft) {
        log::debug!("💾 Borrador guardado para sesión '{}'", session_id);
        let stored = StoredDraft {
            draft,
            expires_at: Utc::now() + self.ttl,
        };
        self.drafts.write().await.insert(session_id.to_string(), stored);
    }

    pub async fn clear(&self, session_id: &str) {
        if self.drafts.write().await.remove(session_id).is_some() {
            log::debug!("🧹 Borrador eliminado para sesión '{}'", session_id);
        }
    }

    /// Limpiar borradores caducados; devuelve cuántos se eliminaron
    pub async fn cleanup_expired(&self) -> usize {
        let mut drafts = self.drafts.write().await;
        let before = drafts.len();
        drafts.retain(|_, stored| !stored.is_expired());
        let removed = before - drafts.len();
        if removed > 0 {
            log::info!("🧹 {} borradores caducados eliminados", removed);
        }
        removed
    }

    pub async fn len(&self) -> usize {
        self.drafts.read().await.len()
    }
}
