//! Modelo de User
//!
//! Mapea la hoja `usuarios`. El rol y el hash de la contraseña se normalizan
//! aquí, al leer la fila, para que el resto del código no dependa de
//! nombres de columna alternativos.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::storage::Record;

pub const USERS_SHEET: &str = "usuarios";

/// Columnas que deben existir en el cabecero de `usuarios`
pub const USER_COLUMNS: &[&str] = &["id", "codigo", "email", "ativo"];

/// Nombres aceptados para la columna del hash; debe existir al menos uno
pub const PASSWORD_COLUMNS: [&str; 2] = ["senha", "senha_hash"];

/// Roles del sistema
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UserRole {
    Visitor,
    Salesperson,
    Designer,
    Intern,
    Administrator,
}

impl UserRole {
    pub const ALL: [UserRole; 5] = [
        UserRole::Visitor,
        UserRole::Salesperson,
        UserRole::Designer,
        UserRole::Intern,
        UserRole::Administrator,
    ];

    /// Nombre tal como aparece en la planilla
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Visitor => "Visitante",
            UserRole::Salesperson => "Vendedor",
            UserRole::Designer => "Projetista",
            UserRole::Intern => "Estagiário",
            UserRole::Administrator => "Administrador",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        let wanted = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|role| role.as_str().to_lowercase() == wanted)
    }

    /// Rol de una fila de `usuarios`: columna `acesso` (o `nivel`); vacío o
    /// desconocido equivale a Visitante.
    pub fn from_record(record: &Record) -> Self {
        record
            .first_of(&["acesso", "nivel"])
            .and_then(Self::from_str)
            .unwrap_or(UserRole::Visitor)
    }
}

/// User - una fila de la hoja `usuarios`
#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub id: String,
    pub code: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub active: bool,
    pub role: UserRole,
    pub name: String,
    pub surname: String,
    pub city: String,
    pub phone: String,
}

impl User {
    pub fn from_record(record: &Record) -> Self {
        Self {
            id: record.text("id").trim().to_string(),
            code: record.text("codigo"),
            email: record.text("email"),
            password_hash: record
                .first_of(&PASSWORD_COLUMNS)
                .unwrap_or_default()
                .to_string(),
            active: parse_flag(record.get("ativo").unwrap_or_default()),
            role: UserRole::from_record(record),
            name: record.text("nome"),
            surname: record.text("sobrenome"),
            city: record.text("cidade"),
            phone: record.text("telefone"),
        }
    }
}

/// `TRUE`/`true` activan; cualquier otro valor no
fn parse_flag(value: &str) -> bool {
    value.trim().eq_ignore_ascii_case("true")
}

/// Request para registrar un nuevo usuario
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterUserRequest {
    #[validate(length(min = 1))]
    pub email: String,

    #[validate(length(min = 1))]
    pub password: String,

    pub name: String,
    pub surname: String,
    pub city: String,
    pub phone: String,
}

/// Perfil del usuario sin datos sensibles
#[derive(Debug, Clone, Serialize)]
pub struct UserProfile {
    pub id: String,
    pub code: String,
    pub email: String,
    pub role: UserRole,
    pub name: String,
    pub surname: String,
    pub city: String,
    pub phone: String,
}

impl From<User> for UserProfile {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            code: user.code,
            email: user.email,
            role: user.role,
            name: user.name,
            surname: user.surname,
            city: user.city,
            phone: user.phone,
        }
    }
}

/// Usuario autenticado de la sesión actual
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: String,
    pub role: UserRole,
}
