use std::collections::BTreeMap;

use crate::models::opportunity::{
    Attachments, NewOpportunity, Opportunity, OpportunityPage, OpportunityState,
    OPPORTUNITIES_SHEET, OPPORTUNITY_COLUMNS,
};
use crate::repositories::sheet_repository::SheetRepository;
use crate::services::identifier_service::{IdentifierService, RecordIdentifier, RecordType};
use crate::storage::{CellValue, RowData};
use crate::utils::errors::AppResult;

#[derive(Clone)]
pub struct OpportunityRepository {
    sheets: SheetRepository,
    identifiers: IdentifierService,
}

impl OpportunityRepository {
    pub fn new(sheets: SheetRepository) -> Self {
        Self {
            sheets,
            identifiers: IdentifierService::new(),
        }
    }

    pub async fn verify_schema(&self) -> AppResult<()> {
        self.sheets
            .verify_schema(OPPORTUNITIES_SHEET, OPPORTUNITY_COLUMNS)
            .await
    }

    /// Alta en estado "Criado". Los campos numéricos del kit se escriben como
    /// número cuando lo son.
    pub async fn create(&self, new: &NewOpportunity) -> AppResult<RecordIdentifier> {
        let ident = self.identifiers.generate(RecordType::Opportunity);

        let mut row = RowData::new()
            .set("id", ident.id.as_str())
            .set("codigo", ident.code.as_str())
            .set("nome", new.customer_name.as_str())
            .set("email", new.customer_email.as_str())
            .set("descricao", new.description.as_str())
            .set("potencia", new.power.as_str())
            .set("valor", new.value.as_str())
            .set("proprietario", new.owner_id.as_str())
            .set("datacad", new.created_at.as_str())
            .set("cliente_id", new.customer_id.clone())
            .set("documento", new.attachments.main_document.as_str())
            .set("comprovante", new.attachments.energy_bill.as_str())
            .set("estado", OpportunityState::Created.as_str());

        if let Some(kit) = &new.product {
            row = row
                .set("pacote", kit.package.as_str())
                .set("kwp", CellValue::numericise(&kit.kwp))
                .set("kw", CellValue::numericise(&kit.kw))
                .set("inversor", kit.inverter.as_str())
                .set("wpPainel", CellValue::numericise(&kit.panel_wp))
                .set("unidadePainel", CellValue::numericise(&kit.panel_count))
                .set("espacoFisico", kit.physical_space.as_str())
                .set("preco", CellValue::numericise(&kit.price))
                .set("juros", CellValue::numericise(&kit.interest))
                .set("valorParcela", CellValue::numericise(&kit.installment_value))
                .set("valorJuros", CellValue::numericise(&kit.installment_interest));
        }

        self.sheets.append_row(OPPORTUNITIES_SHEET, &row).await?;
        log::info!("🆕 Oportunidad {} creada para {}", ident.code, new.owner_id);
        Ok(ident)
    }

    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<Opportunity>> {
        let record = self
            .sheets
            .find_one(OPPORTUNITIES_SHEET, |r| r.matches("id", id))
            .await?;
        Ok(record.as_ref().map(Opportunity::from_record))
    }

    pub async fn list_paginated(
        &self,
        owner_id: &str,
        page: usize,
        page_size: usize,
    ) -> AppResult<OpportunityPage> {
        let page = self
            .sheets
            .list_paginated(OPPORTUNITIES_SHEET, "proprietario", owner_id, page, page_size)
            .await?;

        Ok(OpportunityPage {
            items: page.items.iter().map(Opportunity::from_record).collect(),
            page: page.page,
            page_size: page.page_size,
            has_next: page.has_next,
        })
    }

    /// Número de oportunidades por estado
    pub async fn count_by_state(&self) -> AppResult<BTreeMap<String, usize>> {
        let mut counts = BTreeMap::new();
        for record in self.sheets.list_all(OPPORTUNITIES_SHEET).await? {
            let state = OpportunityState::from_cell(&record.text("estado"));
            *counts.entry(state.as_str().to_string()).or_insert(0) += 1;
        }
        Ok(counts)
    }

    /// Guarda los enlaces de documentos y pasa la oportunidad a "Em análise".
    /// `Ok(false)` si el id no existe.
    pub async fn attach_documents(&self, id: &str, attachments: &Attachments) -> AppResult<bool> {
        self.sheets
            .update_cells(
                OPPORTUNITIES_SHEET,
                "id",
                id,
                &[
                    ("documento", CellValue::from(attachments.main_document.as_str())),
                    ("comprovante", CellValue::from(attachments.energy_bill.as_str())),
                    ("estado", CellValue::from(OpportunityState::PendingReview.as_str())),
                ],
            )
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::product::TechnicalAttributes;
    use crate::storage::MemoryBackend;
    use std::sync::Arc;

    const HEADER: &[&str] = &[
        "id", "codigo", "nome", "email", "descricao", "potencia", "valor", "proprietario",
        "datacad", "cliente_id", "documento", "comprovante", "estado", "pacote", "kwp",
        "preco", "valorParcela",
    ];

    async fn repository() -> (Arc<MemoryBackend>, OpportunityRepository) {
        let backend = Arc::new(MemoryBackend::new());
        backend.create_sheet(OPPORTUNITIES_SHEET, HEADER).await;
        let repo = OpportunityRepository::new(SheetRepository::new(backend.clone()));
        (backend, repo)
    }

    fn new_opportunity(owner: &str) -> NewOpportunity {
        NewOpportunity {
            customer_name: "Maria".to_string(),
            customer_email: "maria@x.com".to_string(),
            customer_id: None,
            description: "telhado sul".to_string(),
            power: "5 kWp".to_string(),
            value: "28.000,00".to_string(),
            owner_id: owner.to_string(),
            created_at: "2024-05-01 10:00:00".to_string(),
            attachments: Attachments::default(),
            product: Some(TechnicalAttributes {
                package: "Kit 5".to_string(),
                kwp: "5.5".to_string(),
                price: "28000".to_string(),
                installment_value: "sob consulta".to_string(),
                ..Default::default()
            }),
        }
    }

    #[tokio::test]
    async fn test_create_then_find() {
        let (backend, repo) = repository().await;
        let ident = repo.create(&new_opportunity("u-1")).await.unwrap();

        let found = repo.find_by_id(&ident.id).await.unwrap().unwrap();
        assert_eq!(found.code, ident.code);
        assert_eq!(found.state, OpportunityState::Created);
        assert_eq!(found.owner_id, "u-1");
        assert_eq!(found.attributes.kwp, "5.5");
        assert_eq!(found.attributes.installment_value, "sob consulta");
        assert!(found.customer_id.is_none());

        let rows = backend.snapshot(OPPORTUNITIES_SHEET).await;
        assert_eq!(rows[1].len(), HEADER.len());
        assert_eq!(rows[1][12], "Criado");
    }

    #[tokio::test]
    async fn test_attach_documents_moves_to_review() {
        let (_, repo) = repository().await;
        let ident = repo.create(&new_opportunity("u-1")).await.unwrap();

        let attachments = Attachments {
            main_document: "https://files/doc".to_string(),
            energy_bill: "https://files/conta".to_string(),
        };
        assert!(repo.attach_documents(&ident.id, &attachments).await.unwrap());

        let found = repo.find_by_id(&ident.id).await.unwrap().unwrap();
        assert_eq!(found.state, OpportunityState::PendingReview);
        assert!(found.has_both_documents());
    }

    #[tokio::test]
    async fn test_attach_documents_unknown_id() {
        let (_, repo) = repository().await;
        let updated = repo
            .attach_documents("missing", &Attachments::default())
            .await
            .unwrap();
        assert!(!updated);
    }

    #[tokio::test]
    async fn test_list_paginated_only_owner() {
        let (_, repo) = repository().await;
        repo.create(&new_opportunity("u-1")).await.unwrap();
        repo.create(&new_opportunity("u-2")).await.unwrap();
        repo.create(&new_opportunity("U-1")).await.unwrap();

        let page = repo.list_paginated("u-1", 1, 10).await.unwrap();
        assert_eq!(page.items.len(), 2);
        assert!(!page.has_next);

        let counts = repo.count_by_state().await.unwrap();
        assert_eq!(counts.get("Criado"), Some(&3));
    }
}
