//! Registro y credenciales de usuarios
//!
//! Las contraseñas nuevas se guardan con bcrypt; los hashes de werkzeug ya
//! presentes en la planilla siguen valiendo para el login. Una cuenta nueva
//! queda inactiva y sin rol hasta que un administrador la habilite.

use validator::Validate;

use crate::models::user::{RegisterUserRequest, SessionUser, UserProfile};
use crate::repositories::UserRepository;
use crate::services::identifier_service::RecordIdentifier;
use crate::utils::errors::{conflict_error, AppResult};
use crate::utils::password::{hash_password, verify_password};

#[derive(Clone)]
pub struct UserService {
    users: UserRepository,
    bcrypt_cost: u32,
}

impl UserService {
    pub fn new(users: UserRepository, bcrypt_cost: u32) -> Self {
        Self { users, bcrypt_cost }
    }

    pub async fn register(&self, request: RegisterUserRequest) -> AppResult<RecordIdentifier> {
        request.validate()?;

        if self.users.email_exists(&request.email).await? {
            log::warn!("⚠️ Email ya registrado: {}", request.email.trim());
            return Err(conflict_error("User", "email", request.email.trim()));
        }

        let password_hash = hash_password(&request.password, self.bcrypt_cost)?;

        let ident = self.users.create(&request, &password_hash).await?;
        log::info!("👤 Usuario {} registrado ({})", ident.code, request.email.trim());
        Ok(ident)
    }

    /// Comprueba email y contraseña. `None` si no existe, está inactivo o la
    /// contraseña no coincide.
    pub async fn validate_login(&self, email: &str, password: &str) -> AppResult<Option<SessionUser>> {
        let Some(user) = self.users.find_by_email(email).await? else {
            log::warn!("🔐 Login con email desconocido: {}", email.trim());
            return Ok(None);
        };

        if !user.active {
            log::warn!("🔐 Login rechazado, cuenta inactiva: {}", user.code);
            return Ok(None);
        }

        let valid = match verify_password(password, &user.password_hash) {
            Ok(valid) => valid,
            Err(e) => {
                log::error!("❌ Hash de contraseña ilegible para {}: {}", user.code, e);
                false
            }
        };

        if !valid {
            log::warn!("🔐 Contraseña incorrecta para {}", user.code);
            return Ok(None);
        }

        log::info!("✅ Login correcto: {} ({})", user.code, user.role.as_str());
        Ok(Some(SessionUser {
            id: user.id,
            role: user.role,
        }))
    }

    pub async fn profile(&self, user_id: &str) -> AppResult<Option<UserProfile>> {
        Ok(self.users.find_by_id(user_id).await?.map(UserProfile::from))
    }
}
