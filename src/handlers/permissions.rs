// src/handlers/permissions.rs

use axum::{extract::State, Json};
use chrono::Datelike;

use crate::{
    common::{
        error::AppError,
        extract::{QueryParams, ValidatedJson},
        response::OkResponse,
    },
    config::AppState,
    models::admin::{
        MonthStatus, MonthsStatusQuery, UpdateMonthVisibilityPayload, UpdatePermissionPayload,
        VendorPermission,
    },
};

// GET /api/vendors-permissions
#[utoipa::path(
    get,
    path = "/api/vendors-permissions",
    tag = "Admin",
    responses(
        (status = 200, description = "Vendedores e suas permissões", body = Vec<VendorPermission>),
        (status = 500, description = "Erro do banco de dados")
    )
)]
pub async fn list_vendors(State(app_state): State<AppState>) -> Result<Json<Vec<VendorPermission>>, AppError> {
    let vendors = app_state.admin_service.list_vendors().await?;
    Ok(Json(vendors))
}

// POST /api/update-permission
#[utoipa::path(
    post,
    path = "/api/update-permission",
    tag = "Admin",
    request_body = UpdatePermissionPayload,
    responses(
        (status = 200, description = "Permissão atualizada", body = OkResponse),
        (status = 400, description = "userId y permission son requeridos"),
        (status = 500, description = "Erro do banco de dados")
    )
)]
pub async fn update_permission(
    State(app_state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<UpdatePermissionPayload>,
) -> Result<OkResponse, AppError> {
    let user_id = payload.user_id.unwrap_or_default();
    let permission = payload.permission.unwrap_or_default();

    app_state.admin_service.update_permission(user_id, &permission).await?;
    Ok(OkResponse::new())
}

// GET /api/months-status
#[utoipa::path(
    get,
    path = "/api/months-status",
    tag = "Admin",
    params(MonthsStatusQuery),
    responses(
        (status = 200, description = "Visibilidade de cada mês do ano", body = Vec<MonthStatus>),
        (status = 500, description = "Erro do banco de dados")
    )
)]
pub async fn months_status(
    State(app_state): State<AppState>,
    QueryParams(query): QueryParams<MonthsStatusQuery>,
) -> Result<Json<Vec<MonthStatus>>, AppError> {
    let year = query
        .year
        .as_deref()
        .and_then(|y| y.trim().parse::<i32>().ok())
        .unwrap_or_else(|| chrono::Local::now().year());

    let months = app_state.admin_service.months_status(year).await?;
    Ok(Json(months))
}

// POST /api/update-month-visibility
#[utoipa::path(
    post,
    path = "/api/update-month-visibility",
    tag = "Admin",
    request_body = UpdateMonthVisibilityPayload,
    responses(
        (status = 200, description = "Visibilidade atualizada", body = OkResponse),
        (status = 400, description = "yearMonth e isVisible son requeridos"),
        (status = 500, description = "Erro do banco de dados")
    )
)]
pub async fn update_month_visibility(
    State(app_state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<UpdateMonthVisibilityPayload>,
) -> Result<OkResponse, AppError> {
    let (Some(year_month), Some(is_visible)) = (payload.year_month, payload.is_visible) else {
        return Err(AppError::BadRequest("yearMonth e isVisible son requeridos".into()));
    };

    app_state
        .admin_service
        .update_month_visibility(year_month, is_visible)
        .await?;
    Ok(OkResponse::new())
}
