// src/handlers/static_files.rs

use axum::{
    extract::State,
    http::{Method, Uri},
    response::{IntoResponse, Response},
};

use crate::{common::error::AppError, config::AppState};

// Fallback do roteador: GET/HEAD vão para os arquivos estáticos, o resto é 404 JSON.
pub async fn fallback(State(app_state): State<AppState>, method: Method, uri: Uri) -> Response {
    if method == Method::GET || method == Method::HEAD {
        tracing::debug!("📁 {}", uri.path());
        return app_state.static_files.serve(uri.path()).await;
    }

    tracing::debug!("🚫 Rota inexistente: {} {}", method, uri.path());
    AppError::RouteNotFound.into_response()
}
