// src/handlers/users.rs

use axum::{
    body::Bytes,
    extract::{Path, State},
    Json,
};

use crate::{
    common::{error::AppError, extract::validated_body, response::OkResponse},
    config::AppState,
    models::auth::{DirectoryUser, SetActivePayload, SetVisibilityPayload},
    services::user_directory::SELLERS,
};

// Segmento `\d+`; qualquer outra coisa é rota inexistente.
fn user_id(raw: &str) -> Result<u32, AppError> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(AppError::RouteNotFound);
    }
    raw.parse().map_err(|_| AppError::RouteNotFound)
}

// GET /api/sellers
#[utoipa::path(
    get,
    path = "/api/sellers",
    tag = "Users",
    responses(
        (status = 200, description = "Nomes dos vendedores", body = Vec<String>)
    )
)]
pub async fn list_sellers() -> Json<Vec<&'static str>> {
    Json(SELLERS.to_vec())
}

// GET /api/users
#[utoipa::path(
    get,
    path = "/api/users",
    tag = "Users",
    responses(
        (status = 200, description = "Diretório de usuários", body = Vec<DirectoryUser>)
    )
)]
pub async fn list_users(State(app_state): State<AppState>) -> Json<Vec<DirectoryUser>> {
    Json(app_state.user_directory.list().await)
}

// POST /api/users/{id}/active
#[utoipa::path(
    post,
    path = "/api/users/{id}/active",
    tag = "Users",
    request_body = SetActivePayload,
    params(
        ("id" = u32, Path, description = "ID do usuário")
    ),
    responses(
        (status = 200, description = "Usuário atualizado", body = OkResponse),
        (status = 400, description = "active es requerido"),
        (status = 404, description = "Usuário inexistente")
    )
)]
pub async fn set_active(
    State(app_state): State<AppState>,
    Path(raw): Path<String>,
    body: Bytes,
) -> Result<OkResponse, AppError> {
    let id = user_id(&raw)?;
    let payload: SetActivePayload = validated_body(&body)?;

    app_state
        .user_directory
        .set_active(id, payload.active.unwrap_or_default())
        .await?;
    Ok(OkResponse::new())
}

// POST /api/users/{id}/visibility
#[utoipa::path(
    post,
    path = "/api/users/{id}/visibility",
    tag = "Users",
    request_body = SetVisibilityPayload,
    params(
        ("id" = u32, Path, description = "ID do usuário")
    ),
    responses(
        (status = 200, description = "Usuário atualizado", body = OkResponse),
        (status = 400, description = "mode es requerido"),
        (status = 404, description = "Usuário inexistente")
    )
)]
pub async fn set_visibility(
    State(app_state): State<AppState>,
    Path(raw): Path<String>,
    body: Bytes,
) -> Result<OkResponse, AppError> {
    let id = user_id(&raw)?;
    let payload: SetVisibilityPayload = validated_body(&body)?;

    let Some(mode) = payload.mode else {
        return Err(AppError::BadRequest("mode es requerido".into()));
    };
    app_state.user_directory.set_visibility(id, mode).await?;
    Ok(OkResponse::new())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_digit_segments_are_ids() {
        assert_eq!(user_id("42").unwrap(), 42);
        for raw in ["", "abc", "-1", "4a", "99999999999"] {
            assert!(matches!(user_id(raw), Err(AppError::RouteNotFound)), "{raw}");
        }
    }
}
