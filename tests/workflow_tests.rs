mod common;

use std::path::PathBuf;

use common::{salesperson, session_user, setup};
use solar_crm::models::flow::{FlowStart, SubmissionOutcome};
use solar_crm::models::opportunity::{
    Attachments, CreateOpportunityRequest, CustomerRef, OpportunityState, OpportunitySubmission,
    SubmissionMode, UploadedFile,
};
use solar_crm::models::customer::NewCustomerRequest;
use solar_crm::models::user::UserRole;
use solar_crm::services::WorkflowError;
use solar_crm::utils::Normalized;

fn request(name: &str, email: &str, power: &str) -> CreateOpportunityRequest {
    CreateOpportunityRequest {
        customer: CustomerRef {
            customer_id: None,
            name: Some(name.to_string()),
            email: Some(email.to_string()),
        },
        power: power.to_string(),
        value: "30.000,00".to_string(),
        description: "Telhado cerâmico".to_string(),
        attachments: Attachments::default(),
    }
}

fn temp_upload(name: &str) -> UploadedFile {
    let dir = std::env::temp_dir().join(format!("solar_crm_it_{}", uuid::Uuid::new_v4()));
    std::fs::create_dir_all(&dir).unwrap();
    let local_path: PathBuf = dir.join(name);
    std::fs::write(&local_path, b"conteudo").unwrap();
    UploadedFile {
        local_path,
        file_name: name.to_string(),
    }
}

#[tokio::test]
async fn test_create_copies_and_rescales_product() {
    let app = setup().await;
    let ident = app
        .state
        .workflow
        .create("u-1", request("Maria", "maria@x.com", "5 kWp"))
        .await
        .unwrap();

    assert!(ident.code.starts_with("OPO-"));

    let opp = app.state.opportunities.find_by_id(&ident.id).await.unwrap().unwrap();
    assert_eq!(opp.state, OpportunityState::Created);
    assert_eq!(opp.owner_id, "u-1");
    assert_eq!(opp.attributes.package, "Kit Residencial");
    assert_eq!(opp.attributes.kwp, "5.5");
    assert_eq!(opp.amounts.installment_value, Normalized::Number(1835.56));
    assert_eq!(opp.amounts.price, Normalized::Number(28000.0));
    assert_eq!(opp.amounts.value, Normalized::Number(30000.0));
    assert!(opp.customer_id.is_none());
}

#[tokio::test]
async fn test_create_without_matching_product() {
    let app = setup().await;
    let ident = app
        .state
        .workflow
        .create("u-1", request("Maria", "maria@x.com", "5kWp"))
        .await
        .unwrap();

    let opp = app.state.opportunities.find_by_id(&ident.id).await.unwrap().unwrap();
    assert_eq!(opp.power, "5kWp");
    assert!(opp.attributes.package.is_empty());
    assert!(opp.attributes.kwp.is_empty());
}

#[tokio::test]
async fn test_create_requires_name_and_email() {
    let app = setup().await;
    let err = app
        .state
        .workflow
        .create("u-1", request("  ", "maria@x.com", "5 kWp"))
        .await
        .unwrap_err();

    assert!(matches!(err, WorkflowError::Validation(_)));
    assert_eq!(app.sheets.snapshot("oportunidades").await.len(), 1);
}

#[tokio::test]
async fn test_create_links_customer_by_email_and_owner() {
    let app = setup().await;
    let user = salesperson("u-1");
    let customer = app
        .state
        .customer_service
        .register(
            &user,
            NewCustomerRequest {
                name: "Maria".to_string(),
                email: "maria@x.com".to_string(),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let ident = app
        .state
        .workflow
        .create("u-1", request("Maria", " MARIA@x.com ", "5 kWp"))
        .await
        .unwrap();
    let opp = app.state.opportunities.find_by_id(&ident.id).await.unwrap().unwrap();
    assert_eq!(opp.customer_id, Some(customer.id));

    // Mismo email, otro propietario: sin vínculo
    let other = app
        .state
        .workflow
        .create("u-2", request("Maria", "maria@x.com", "5 kWp"))
        .await
        .unwrap();
    let opp = app.state.opportunities.find_by_id(&other.id).await.unwrap().unwrap();
    assert!(opp.customer_id.is_none());
}

#[tokio::test]
async fn test_create_with_explicit_customer_uses_its_data() {
    let app = setup().await;
    let user = salesperson("u-1");
    let customer = app
        .state
        .customer_service
        .register(
            &user,
            NewCustomerRequest {
                name: "João".to_string(),
                email: "joao@x.com".to_string(),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let mut req = request("", "", "5 kWp");
    req.customer.customer_id = Some(customer.id.clone());
    let ident = app.state.workflow.create("u-1", req).await.unwrap();

    let opp = app.state.opportunities.find_by_id(&ident.id).await.unwrap().unwrap();
    assert_eq!(opp.customer_name, "João");
    assert_eq!(opp.customer_email, "joao@x.com");
    assert_eq!(opp.customer_id, Some(customer.id));
}

#[tokio::test]
async fn test_continue_by_non_owner_is_denied_without_mutation() {
    let app = setup().await;
    let ident = app
        .state
        .workflow
        .create("u-1", request("Maria", "maria@x.com", "5 kWp"))
        .await
        .unwrap();
    let before = app.sheets.snapshot("oportunidades").await;

    let err = app
        .state
        .workflow
        .continue_with_attachments(&ident.id, "u-2", "https://doc", "https://conta")
        .await
        .unwrap_err();

    assert!(matches!(err, WorkflowError::AccessDenied(_)));
    assert_eq!(app.sheets.snapshot("oportunidades").await, before);
}

#[tokio::test]
async fn test_continue_with_missing_link_is_rejected_without_mutation() {
    let app = setup().await;
    let ident = app
        .state
        .workflow
        .create("u-1", request("Maria", "maria@x.com", "5 kWp"))
        .await
        .unwrap();
    let before = app.sheets.snapshot("oportunidades").await;

    let err = app
        .state
        .workflow
        .continue_with_attachments(&ident.id, "u-1", "https://doc", " ")
        .await
        .unwrap_err();

    assert!(matches!(err, WorkflowError::Validation(_)));
    assert_eq!(app.sheets.snapshot("oportunidades").await, before);
}

#[tokio::test]
async fn test_continue_unknown_opportunity() {
    let app = setup().await;
    let err = app
        .state
        .workflow
        .continue_with_attachments("nope", "u-1", "https://doc", "https://conta")
        .await
        .unwrap_err();
    assert!(matches!(err, WorkflowError::NotFound(_)));
}

#[tokio::test]
async fn test_continue_moves_to_pending_review() {
    let app = setup().await;
    let ident = app
        .state
        .workflow
        .create("u-1", request("Maria", "maria@x.com", "5 kWp"))
        .await
        .unwrap();

    app.state
        .workflow
        .continue_with_attachments(&ident.id, " U-1 ", "https://doc", "https://conta")
        .await
        .unwrap();

    let opp = app.state.opportunities.find_by_id(&ident.id).await.unwrap().unwrap();
    assert_eq!(opp.state, OpportunityState::PendingReview);
    assert_eq!(opp.document_link, "https://doc");
    assert_eq!(opp.energy_bill_link, "https://conta");
}

#[tokio::test]
async fn test_backend_outage_surfaces_as_backend_error() {
    let app = setup().await;
    app.sheets.set_fail_reads(true);

    let err = app
        .state
        .workflow
        .continue_with_attachments("o-1", "u-1", "https://doc", "https://conta")
        .await
        .unwrap_err();
    assert!(matches!(err, WorkflowError::Backend(_)));
}

#[tokio::test]
async fn test_submit_continuation_uploads_and_clears_draft() {
    let app = setup().await;
    let user = salesperson("u-1");
    let ident = app
        .state
        .workflow
        .create("u-1", request("Maria", "maria@x.com", "5 kWp"))
        .await
        .unwrap();

    app.state
        .workflow
        .start_flow("s-1", &user, FlowStart::Continue { opportunity_id: ident.id.clone() })
        .await
        .unwrap();

    let context = app.state.workflow.form_context("s-1", &user).await.unwrap();
    assert!(context.continuing);
    assert_eq!(context.customer_name.as_deref(), Some("Maria"));
    assert_eq!(context.categories.len(), 1);

    let main_document = temp_upload("rg.pdf");
    let energy_bill = temp_upload("conta.pdf");
    let outcome = app
        .state
        .workflow
        .submit(
            "s-1",
            &user,
            OpportunitySubmission {
                mode: SubmissionMode::Continue,
                main_document: Some(main_document.clone()),
                energy_bill: Some(energy_bill.clone()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(
        outcome,
        SubmissionOutcome::Continued {
            opportunity_id: ident.id.clone()
        }
    );
    assert!(app.state.drafts.get("s-1").await.is_none());

    let mut names = app.files.uploaded_names().await;
    names.sort();
    assert_eq!(names, vec!["conta.pdf".to_string(), "rg.pdf".to_string()]);
    assert!(!main_document.local_path.exists());

    let opp = app.state.opportunities.find_by_id(&ident.id).await.unwrap().unwrap();
    assert_eq!(opp.state, OpportunityState::PendingReview);
    assert!(opp.has_both_documents());
}

#[tokio::test]
async fn test_submit_continuation_with_one_file_fails_and_clears_draft() {
    let app = setup().await;
    let user = salesperson("u-1");
    let ident = app
        .state
        .workflow
        .create("u-1", request("Maria", "maria@x.com", "5 kWp"))
        .await
        .unwrap();

    app.state
        .workflow
        .start_flow("s-1", &user, FlowStart::Continue { opportunity_id: ident.id.clone() })
        .await
        .unwrap();

    let err = app
        .state
        .workflow
        .submit(
            "s-1",
            &user,
            OpportunitySubmission {
                mode: SubmissionMode::Continue,
                main_document: Some(temp_upload("rg.pdf")),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();

    assert!(matches!(err, WorkflowError::Validation(_)));
    assert!(app.state.drafts.get("s-1").await.is_none());
    let opp = app.state.opportunities.find_by_id(&ident.id).await.unwrap().unwrap();
    assert_eq!(opp.state, OpportunityState::Created);
}

#[tokio::test]
async fn test_submit_new_from_customer_flow() {
    let app = setup().await;
    let user = salesperson("u-1");
    let customer = app
        .state
        .customer_service
        .register(
            &user,
            NewCustomerRequest {
                name: "Ana".to_string(),
                email: "ana@x.com".to_string(),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let draft = app
        .state
        .workflow
        .start_flow(
            "s-1",
            &user,
            FlowStart::New {
                customer_id: Some(customer.id.clone()),
                name: None,
                email: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(draft.customer_email.as_deref(), Some("ana@x.com"));

    let outcome = app
        .state
        .workflow
        .submit(
            "s-1",
            &user,
            OpportunitySubmission {
                mode: SubmissionMode::New,
                power: "5 kWp".to_string(),
                value: "28.000,00".to_string(),
                description: "Casa de praia".to_string(),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let SubmissionOutcome::Created(ident) = outcome else {
        panic!("expected a new opportunity");
    };
    let opp = app.state.opportunities.find_by_id(&ident.id).await.unwrap().unwrap();
    assert_eq!(opp.customer_name, "Ana");
    assert_eq!(opp.customer_id, Some(customer.id));
    assert!(opp.document_link.is_empty());
    assert!(app.state.drafts.get("s-1").await.is_none());
}

#[tokio::test]
async fn test_start_flow_with_foreign_customer_is_denied() {
    let app = setup().await;
    let owner = salesperson("u-1");
    let customer = app
        .state
        .customer_service
        .register(
            &owner,
            NewCustomerRequest {
                name: "Ana".to_string(),
                email: "ana@x.com".to_string(),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let err = app
        .state
        .workflow
        .start_flow(
            "s-2",
            &salesperson("u-2"),
            FlowStart::New {
                customer_id: Some(customer.id),
                name: None,
                email: None,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, WorkflowError::AccessDenied(_)));
}

#[tokio::test]
async fn test_form_context_for_foreign_opportunity_clears_draft() {
    let app = setup().await;
    let ident = app
        .state
        .workflow
        .create("u-1", request("Maria", "maria@x.com", "5 kWp"))
        .await
        .unwrap();
    let intruder = salesperson("u-2");

    app.state
        .workflow
        .start_flow("s-9", &intruder, FlowStart::Continue { opportunity_id: ident.id })
        .await
        .unwrap();

    let err = app.state.workflow.form_context("s-9", &intruder).await.unwrap_err();
    assert!(matches!(err, WorkflowError::AccessDenied(_)));
    assert!(app.state.drafts.get("s-9").await.is_none());
}

#[tokio::test]
async fn test_list_for_owner_pages_and_policy() {
    let app = setup().await;
    for i in 0..25 {
        let owner = if i % 5 == 0 { "u-2" } else { "u-1" };
        app.state
            .workflow
            .create(owner, request("Maria", "maria@x.com", "5 kWp"))
            .await
            .unwrap();
    }

    let user = salesperson("u-1");
    let p1 = app.state.workflow.list_for_owner(&user, 1, 10).await.unwrap();
    let p2 = app.state.workflow.list_for_owner(&user, 2, 10).await.unwrap();
    assert_eq!((p1.items.len(), p1.has_next), (10, true));
    assert_eq!((p2.items.len(), p2.has_next), (10, true));
    assert!(p2.items.iter().all(|o| o.owner_id == "u-1"));

    let intern = session_user("u-1", UserRole::Intern);
    let err = app.state.workflow.list_for_owner(&intern, 1, 10).await.unwrap_err();
    assert!(matches!(err, WorkflowError::AccessDenied(_)));
}

#[tokio::test]
async fn test_proposal_includes_linked_customer() {
    let app = setup().await;
    let customer = app
        .state
        .customer_service
        .register(
            &salesperson("u-1"),
            NewCustomerRequest {
                name: "João".to_string(),
                email: "joao@x.com".to_string(),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let mut req = request("", "", "5 kWp");
    req.customer.customer_id = Some(customer.id.clone());
    let ident = app.state.workflow.create("u-1", req).await.unwrap();

    let designer = session_user("u-9", UserRole::Designer);
    let proposal = app.state.workflow.proposal(&designer, &ident.id).await.unwrap();

    assert_eq!(proposal.opportunity.id, ident.id);
    assert_eq!(proposal.customer.map(|c| c.id), Some(customer.id));
    assert_eq!(proposal.value_display, "30.000,00");
    assert_eq!(proposal.price_display, "28.000,00");
    assert_eq!(proposal.installment_display, "1.835,56");
}

#[tokio::test]
async fn test_proposal_with_missing_customer() {
    let app = setup().await;
    let mut req = request("Maria", "maria@x.com", "5 kWp");
    req.customer.customer_id = Some("c-removed".to_string());
    let ident = app.state.workflow.create("u-1", req).await.unwrap();

    let admin = session_user("u-9", UserRole::Administrator);
    let proposal = app.state.workflow.proposal(&admin, &ident.id).await.unwrap();
    assert_eq!(proposal.opportunity.customer_id.as_deref(), Some("c-removed"));
    assert!(proposal.customer.is_none());

    let err = app.state.workflow.proposal(&admin, "nao-existe").await.unwrap_err();
    assert!(matches!(err, WorkflowError::NotFound(_)));
}

#[tokio::test]
async fn test_proposal_denied_for_salesperson() {
    let app = setup().await;
    let ident = app
        .state
        .workflow
        .create("u-1", request("Maria", "maria@x.com", "5 kWp"))
        .await
        .unwrap();

    let err = app
        .state
        .workflow
        .proposal(&salesperson("u-1"), &ident.id)
        .await
        .unwrap_err();
    assert!(matches!(err, WorkflowError::AccessDenied(_)));
}
