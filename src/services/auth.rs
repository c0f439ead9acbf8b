// src/services/auth.rs

use std::sync::Arc;

use crate::{
    common::error::AppError,
    db::{backend::call_once, procedures, value::first_row, SalesBackend},
    models::auth::LoginUser,
};

#[derive(Clone)]
pub struct AuthService {
    backend: Arc<dyn SalesBackend>,
}

impl AuthService {
    pub fn new(backend: Arc<dyn SalesBackend>) -> Self {
        Self { backend }
    }

    /// Valida as credenciais via `auth.sp_Login`. Recordset vazio = credenciais inválidas.
    pub async fn login(&self, username: &str, password: &str) -> Result<LoginUser, AppError> {
        tracing::info!("🔐 Intento de login: {}", username);

        let recordsets = call_once(self.backend.as_ref(), &procedures::login(username, password))
            .await
            .map_err(|e| AppError::backend("Error de base de datos", e))?;

        let row = first_row(&recordsets, 0).ok_or_else(|| {
            tracing::info!("🚫 Credenciales inválidas para {}", username);
            AppError::InvalidCredentials
        })?;

        let user = LoginUser {
            user_id: row.int("UserId").unwrap_or_default(),
            username: row.text("Username").unwrap_or_else(|| username.to_string()),
            role: row.text("Rol").unwrap_or_default(),
            last_login_at: row.text("LastLoginAt"),
        };

        tracing::info!("✅ Login exitoso: {} ({})", user.username, user.role);
        Ok(user)
    }
}
