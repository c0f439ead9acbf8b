// src/common/error.rs

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Map, Value};
use thiserror::Error;

// Erros do adaptador de banco (SQL Server ou mock).
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("{0}")]
    Sql(#[from] tiberius::error::Error),

    #[error("No se pudo abrir la conexión TCP: {0}")]
    Io(#[from] std::io::Error),

    #[error("Tiempo de espera agotado ({seconds}s) en {operation}")]
    Timeout { operation: String, seconds: u64 },

    #[error("Configuración de base de datos inválida: {0}")]
    Config(String),

    #[error("Procedimiento almacenado desconocido: {0}")]
    UnknownProcedure(String),

    #[error("{0}")]
    Procedure(String),
}

impl BackendError {
    /// Número do erro reportado pelo servidor (ex: 2812 = procedure inexistente).
    pub fn code(&self) -> Option<String> {
        match self {
            BackendError::Sql(tiberius::error::Error::Server(token)) => {
                Some(token.code().to_string())
            }
            BackendError::Io(e) => Some(format!("{:?}", e.kind())),
            BackendError::Timeout { .. } => Some("ETIMEOUT".to_string()),
            _ => None,
        }
    }

    pub fn sql_state(&self) -> Option<u8> {
        match self {
            BackendError::Sql(tiberius::error::Error::Server(token)) => Some(token.state()),
            _ => None,
        }
    }
}

// Erro da aplicação: cada variante sabe em qual status HTTP se transforma.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Error de validación")]
    Validation(#[from] validator::ValidationErrors),

    #[error("JSON inválido")]
    MalformedJson(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("Credenciales inválidas")]
    InvalidCredentials,

    #[error("Usuario no encontrado")]
    UserNotFound,

    #[error("Ruta no encontrada")]
    RouteNotFound,

    #[error("{context}: {source}")]
    Backend {
        context: &'static str,
        #[source]
        source: BackendError,
    },

    #[error("Error interno")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn backend(context: &'static str, source: BackendError) -> Self {
        AppError::Backend { context, source }
    }
}

impl From<BackendError> for AppError {
    fn from(source: BackendError) -> Self {
        AppError::backend("Error de base de datos", source)
    }
}

// Junta as mensagens de validação por campo, em ordem estável.
fn validation_body(errors: &validator::ValidationErrors) -> Value {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by(|a, b| a.0.cmp(&b.0));

    let mut details = Map::new();
    let mut summary = Vec::new();
    for (field, field_errors) in fields {
        let messages: Vec<String> = field_errors
            .iter()
            .map(|e| {
                e.message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("{field} es inválido"))
            })
            .collect();
        summary.extend(messages.iter().cloned());
        details.insert(field.to_string(), json!(messages));
    }

    json!({
        "ok": false,
        "error": summary.join("; "),
        "details": details,
    })
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            AppError::Validation(errors) => (StatusCode::BAD_REQUEST, validation_body(errors)),
            AppError::MalformedJson(details) => (
                StatusCode::BAD_REQUEST,
                json!({ "ok": false, "error": "JSON inválido", "details": details }),
            ),
            AppError::BadRequest(message) => (
                StatusCode::BAD_REQUEST,
                json!({ "ok": false, "error": message }),
            ),
            // Mensagem genérica: nunca indica se o usuário ou a senha estava errado.
            AppError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                json!({ "ok": false, "error": "Credenciales inválidas" }),
            ),
            AppError::UserNotFound => (
                StatusCode::NOT_FOUND,
                json!({ "ok": false, "error": "Usuario no encontrado" }),
            ),
            AppError::RouteNotFound => (
                StatusCode::NOT_FOUND,
                json!({ "ok": false, "error": "Ruta no encontrada" }),
            ),
            AppError::Backend { context, source } => {
                tracing::error!("❌ {}: {} (código: {:?})", context, source, source.code());
                let mut body = json!({
                    "ok": false,
                    "error": context,
                    "details": source.to_string(),
                });
                if let Some(code) = source.code() {
                    body["code"] = json!(code);
                }
                if let Some(state) = source.sql_state() {
                    body["sqlState"] = json!(state);
                }
                (StatusCode::INTERNAL_SERVER_ERROR, body)
            }
            AppError::Internal(e) => {
                tracing::error!("❌ Erro interno do servidor: {:#}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "ok": false, "error": "Error interno", "details": e.to_string() }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}
