// src/handlers/auth.rs

use axum::{extract::State, Json};

use crate::{
    common::{error::AppError, extract::ValidatedJson},
    config::AppState,
    models::auth::{LoginPayload, LoginResponse},
};

// POST /api/login
#[utoipa::path(
    post,
    path = "/api/login",
    tag = "Auth",
    request_body = LoginPayload,
    responses(
        (status = 200, description = "Login realizado; `role` decide o painel", body = LoginResponse),
        (status = 400, description = "username ou password ausente"),
        (status = 401, description = "Credenciales inválidas"),
        (status = 500, description = "Erro do banco de dados")
    )
)]
pub async fn login(
    State(app_state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<LoginPayload>,
) -> Result<Json<LoginResponse>, AppError> {
    // `validate()` já garantiu os dois campos
    let username = payload.username.unwrap_or_default();
    let password = payload.password.unwrap_or_default();

    let user = app_state.auth_service.login(&username, &password).await?;

    Ok(Json(LoginResponse { ok: true, user }))
}
