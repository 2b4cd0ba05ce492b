//! Política de acceso por rol
//!
//! Tabla fija rol -> acciones permitidas. Cualquier rol o acción que no esté en
//! la tabla se deniega.

use lazy_static::lazy_static;
use std::collections::{HashMap, HashSet};

use crate::models::user::UserRole;

/// Acciones controladas por la política
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    RegisterCustomer,
    ViewCustomers,
    ViewOpportunities,
    GeneratePdf,
    ApproveProposal,
    ManageUsers,
}

impl Action {
    pub const ALL: [Action; 6] = [
        Action::RegisterCustomer,
        Action::ViewCustomers,
        Action::ViewOpportunities,
        Action::GeneratePdf,
        Action::ApproveProposal,
        Action::ManageUsers,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Action::RegisterCustomer => "cadastrar_cliente",
            Action::ViewCustomers => "ver_clientes",
            Action::ViewOpportunities => "ver_oportunidades",
            Action::GeneratePdf => "gerar_pdf",
            Action::ApproveProposal => "aprovar_proposta",
            Action::ManageUsers => "gerenciar_usuarios",
        }
    }
}

lazy_static! {
    static ref PERMISSIONS: HashMap<&'static str, HashSet<&'static str>> = {
        let mut table = HashMap::new();
        for role in UserRole::ALL {
            let actions: HashSet<&'static str> = actions_for_role(role)
                .iter()
                .map(Action::as_str)
                .collect();
            table.insert(role.as_str(), actions);
        }
        table
    };
}

/// Acciones permitidas para un rol
pub fn actions_for_role(role: UserRole) -> &'static [Action] {
    match role {
        UserRole::Visitor => &[],
        UserRole::Salesperson => &[
            Action::RegisterCustomer,
            Action::ViewCustomers,
            Action::ViewOpportunities,
        ],
        UserRole::Designer => &[
            Action::RegisterCustomer,
            Action::ViewCustomers,
            Action::ViewOpportunities,
            Action::GeneratePdf,
            Action::ApproveProposal,
        ],
        UserRole::Intern => &[Action::RegisterCustomer, Action::ViewCustomers],
        UserRole::Administrator => &Action::ALL,
    }
}

/// Comprobación por nombre, tal como llegan rol y acción desde la sesión.
/// Rol o acción desconocidos => `false`.
pub fn check(role: &str, action: &str) -> bool {
    PERMISSIONS
        .get(role)
        .map(|actions| actions.contains(action))
        .unwrap_or(false)
}

pub fn allows(role: UserRole, action: Action) -> bool {
    check(role.as_str(), action.as_str())
}
