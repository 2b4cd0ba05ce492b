//! Flujo de oportunidades
//!
//! Una oportunidad nace en "Criado" y pasa a "Em análise" cuando se adjuntan
//! el documento principal y la conta de luz. Aprobación y rechazo quedan fuera
//! de este flujo; la vista previa de la propuesta sí está aquí.
//!
//! Los resultados de validación y de acceso denegado se devuelven como
//! variantes distintas de `WorkflowError`; los fallos del backend se envuelven
//! sin ocultarlos.

use thiserror::Error;

use crate::models::flow::{FlowStart, FormContext, OpportunityDraft, SubmissionOutcome};
use crate::models::opportunity::{
    Attachments, CreateOpportunityRequest, CustomerRef, NewOpportunity, OpportunityPage,
    OpportunitySubmission, SubmissionMode,
};
use crate::models::proposal::Proposal;
use crate::models::user::SessionUser;
use crate::repositories::{CustomerRepository, OpportunityRepository, ProductRepository};
use crate::services::access_policy::{allows, Action};
use crate::services::document_service::DocumentService;
use crate::services::draft_store::DraftStore;
use crate::services::identifier_service::RecordIdentifier;
use crate::storage::record::same_identifier;
use crate::utils::errors::AppError;
use crate::utils::normalize::rescale;
use crate::utils::time::local_timestamp;

/// Los importes de kit del catálogo vienen multiplicados por 100
const CATALOG_SCALE: f64 = 100.0;

#[derive(Error, Debug)]
pub enum WorkflowError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Access denied: {0}")]
    AccessDenied(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    Backend(#[from] AppError),
}

pub type WorkflowResult<T> = Result<T, WorkflowError>;

#[derive(Clone)]
pub struct OpportunityWorkflow {
    opportunities: OpportunityRepository,
    customers: CustomerRepository,
    products: ProductRepository,
    documents: DocumentService,
    drafts: DraftStore,
    utc_offset_hours: i32,
}

impl OpportunityWorkflow {
    pub fn new(
        opportunities: OpportunityRepository,
        customers: CustomerRepository,
        products: ProductRepository,
        documents: DocumentService,
        drafts: DraftStore,
        utc_offset_hours: i32,
    ) -> Self {
        Self {
            opportunities,
            customers,
            products,
            documents,
            drafts,
            utc_offset_hours,
        }
    }

    /// Crea una oportunidad en estado "Criado"
    pub async fn create(
        &self,
        owner_id: &str,
        request: CreateOpportunityRequest,
    ) -> WorkflowResult<RecordIdentifier> {
        let selected_id = non_blank(request.customer.customer_id.as_deref());

        let (mut name, mut email) = (
            request.customer.name.clone().unwrap_or_default(),
            request.customer.email.clone().unwrap_or_default(),
        );
        if let Some(customer_id) = &selected_id {
            match self.customers.find_by_id(customer_id).await? {
                Some(customer) => {
                    name = customer.name;
                    email = customer.email;
                }
                None => log::warn!("⚠️ Cliente {} no encontrado, se usan los datos del formulario", customer_id),
            }
        }

        let name = name.trim().to_string();
        let email = email.trim().to_string();
        if name.is_empty() || email.is_empty() {
            return Err(WorkflowError::Validation(
                "customer name and email are required".to_string(),
            ));
        }

        let product = match self.products.find_by_power(&request.power).await? {
            Some(product) => {
                let mut kit = product.attributes;
                kit.kwp = rescale(&kit.kwp, CATALOG_SCALE).into_text();
                kit.installment_value = rescale(&kit.installment_value, CATALOG_SCALE).into_text();
                Some(kit)
            }
            None => {
                log::warn!("⚠️ Potencia '{}' sin producto en el catálogo", request.power);
                None
            }
        };

        let customer_id = match selected_id {
            Some(id) => Some(id),
            None => self
                .customers
                .find_by_email_and_owner(&email, owner_id)
                .await?
                .map(|c| c.id),
        };

        let new = NewOpportunity {
            customer_name: name,
            customer_email: email,
            customer_id,
            description: request.description,
            power: request.power,
            value: request.value,
            owner_id: owner_id.trim().to_string(),
            created_at: local_timestamp(self.utc_offset_hours),
            attachments: request.attachments,
            product,
        };

        Ok(self.opportunities.create(&new).await?)
    }

    /// Adjunta los dos documentos y pasa la oportunidad a "Em análise".
    /// No modifica nada si el solicitante no es el propietario o falta algún enlace.
    pub async fn continue_with_attachments(
        &self,
        opportunity_id: &str,
        requesting_owner_id: &str,
        main_document: &str,
        energy_bill: &str,
    ) -> WorkflowResult<()> {
        let opportunity = self
            .opportunities
            .find_by_id(opportunity_id)
            .await?
            .ok_or_else(|| WorkflowError::NotFound(format!("opportunity '{}'", opportunity_id)))?;

        if !same_identifier(&opportunity.owner_id, requesting_owner_id) {
            log::warn!(
                "🚫 Usuario {} intentó continuar la oportunidad {} de otro propietario",
                requesting_owner_id,
                opportunity.code
            );
            return Err(WorkflowError::AccessDenied(
                "opportunity belongs to another user".to_string(),
            ));
        }

        if main_document.trim().is_empty() || energy_bill.trim().is_empty() {
            return Err(WorkflowError::Validation(
                "both the main document and the energy bill are required".to_string(),
            ));
        }

        let attachments = Attachments {
            main_document: main_document.to_string(),
            energy_bill: energy_bill.to_string(),
        };
        if !self
            .opportunities
            .attach_documents(&opportunity.id, &attachments)
            .await?
        {
            return Err(WorkflowError::NotFound(format!("opportunity '{}'", opportunity_id)));
        }

        log::info!("📎 Oportunidad {} enviada a análisis", opportunity.code);
        Ok(())
    }

    /// Inicia el flujo para la sesión, descartando cualquier borrador previo
    pub async fn start_flow(
        &self,
        session_id: &str,
        user: &SessionUser,
        start: FlowStart,
    ) -> WorkflowResult<OpportunityDraft> {
        self.drafts.cleanup_expired().await;
        self.drafts.clear(session_id).await;

        let draft = match start {
            FlowStart::Continue { opportunity_id } => OpportunityDraft {
                opportunity_id: Some(opportunity_id),
                continuing: true,
                ..Default::default()
            },
            FlowStart::New {
                customer_id,
                name,
                email,
            } => match non_blank(customer_id.as_deref()) {
                Some(customer_id) => {
                    let customer = self
                        .customers
                        .find_by_id(&customer_id)
                        .await?
                        .ok_or_else(|| WorkflowError::NotFound(format!("customer '{}'", customer_id)))?;
                    if !same_identifier(&customer.owner_id, &user.id) {
                        return Err(WorkflowError::AccessDenied(
                            "customer belongs to another user".to_string(),
                        ));
                    }
                    OpportunityDraft {
                        customer_id: Some(customer.id),
                        customer_name: Some(customer.name),
                        customer_email: Some(customer.email),
                        ..Default::default()
                    }
                }
                None => OpportunityDraft {
                    customer_name: name,
                    customer_email: email,
                    ..Default::default()
                },
            },
        };

        self.drafts.put(session_id, draft.clone()).await;
        Ok(draft)
    }

    /// Lo que necesita el formulario: categorías de producto, la oportunidad
    /// a continuar (si la hay) y el cliente pendiente
    pub async fn form_context(
        &self,
        session_id: &str,
        user: &SessionUser,
    ) -> WorkflowResult<FormContext> {
        let draft = self.drafts.get(session_id).await.unwrap_or_default();
        let categories = self.products.categories().await?;

        let mut opportunity = None;
        if draft.continuing {
            if let Some(id) = &draft.opportunity_id {
                match self.opportunities.find_by_id(id).await? {
                    Some(found) if same_identifier(&found.owner_id, &user.id) => {
                        opportunity = Some(found)
                    }
                    Some(_) => {
                        self.drafts.clear(session_id).await;
                        return Err(WorkflowError::AccessDenied(
                            "opportunity belongs to another user".to_string(),
                        ));
                    }
                    None => {
                        self.drafts.clear(session_id).await;
                        return Err(WorkflowError::NotFound(format!("opportunity '{}'", id)));
                    }
                }
            }
        }

        let (customer_name, customer_email) = match &opportunity {
            Some(o) => (Some(o.customer_name.clone()), Some(o.customer_email.clone())),
            None => (draft.customer_name.clone(), draft.customer_email.clone()),
        };

        Ok(FormContext {
            categories,
            continuing: opportunity.is_some(),
            opportunity,
            customer_name,
            customer_email,
        })
    }

    /// Envío del formulario: sube los documentos y crea o continúa según el
    /// modo. El borrador de la sesión se borra siempre.
    pub async fn submit(
        &self,
        session_id: &str,
        user: &SessionUser,
        submission: OpportunitySubmission,
    ) -> WorkflowResult<SubmissionOutcome> {
        let draft = self.drafts.get(session_id).await.unwrap_or_default();
        let result = self.dispatch(user, draft, submission).await;
        self.drafts.clear(session_id).await;

        if let Err(e) = &result {
            log::warn!("⚠️ Envío de oportunidad rechazado para {}: {}", user.id, e);
        }
        result
    }

    async fn dispatch(
        &self,
        user: &SessionUser,
        draft: OpportunityDraft,
        submission: OpportunitySubmission,
    ) -> WorkflowResult<SubmissionOutcome> {
        let attachments = self
            .documents
            .store_pair(submission.main_document.as_ref(), submission.energy_bill.as_ref())
            .await?;

        match submission.mode {
            SubmissionMode::Continue => {
                let opportunity_id = draft.opportunity_id.ok_or_else(|| {
                    WorkflowError::Validation("no opportunity in progress".to_string())
                })?;
                self.continue_with_attachments(
                    &opportunity_id,
                    &user.id,
                    &attachments.main_document,
                    &attachments.energy_bill,
                )
                .await?;
                Ok(SubmissionOutcome::Continued { opportunity_id })
            }
            SubmissionMode::New => {
                let request = CreateOpportunityRequest {
                    customer: CustomerRef {
                        customer_id: draft.customer_id,
                        name: non_blank(submission.name.as_deref()).or(draft.customer_name),
                        email: non_blank(submission.email.as_deref()).or(draft.customer_email),
                    },
                    power: submission.power,
                    value: submission.value,
                    description: submission.description,
                    attachments,
                };
                let ident = self.create(&user.id, request).await?;
                Ok(SubmissionOutcome::Created(ident))
            }
        }
    }

    /// Propuesta para imprimir: la oportunidad y, si tiene `cliente_id`, el
    /// cliente vinculado. Un cliente que ya no existe se omite.
    pub async fn proposal(
        &self,
        user: &SessionUser,
        opportunity_id: &str,
    ) -> WorkflowResult<Proposal> {
        if !allows(user.role, Action::GeneratePdf) {
            return Err(WorkflowError::AccessDenied(format!(
                "role '{}' cannot generate proposals",
                user.role.as_str()
            )));
        }

        let opportunity = self
            .opportunities
            .find_by_id(opportunity_id)
            .await?
            .ok_or_else(|| WorkflowError::NotFound(format!("opportunity '{}'", opportunity_id)))?;

        let customer = match &opportunity.customer_id {
            Some(customer_id) => {
                let customer = self.customers.find_by_id(customer_id).await?;
                if customer.is_none() {
                    log::warn!(
                        "⚠️ Cliente {} de la oportunidad {} no encontrado",
                        customer_id,
                        opportunity.code
                    );
                }
                customer
            }
            None => None,
        };

        log::info!("🖨️ Propuesta {} generada por {}", opportunity.code, user.id);
        Ok(Proposal::new(opportunity, customer))
    }

    /// Oportunidades del usuario, paginadas
    pub async fn list_for_owner(
        &self,
        user: &SessionUser,
        page: usize,
        page_size: usize,
    ) -> WorkflowResult<OpportunityPage> {
        if !allows(user.role, Action::ViewOpportunities) {
            return Err(WorkflowError::AccessDenied(format!(
                "role '{}' cannot view opportunities",
                user.role.as_str()
            )));
        }
        Ok(self
            .opportunities
            .list_paginated(&user.id, page, page_size)
            .await?)
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
