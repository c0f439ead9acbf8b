// src/handlers/dashboard.rs

use axum::{extract::State, Json};

use crate::{
    common::{error::AppError, extract::QueryParams},
    config::AppState,
    models::{
        dashboard::{DashboardMetrics, DashboardQuery, VendorDashboard, VendorDashboardQuery},
        periods::YearMonth,
    },
};

// GET /api/dashboard
#[utoipa::path(
    get,
    path = "/api/dashboard",
    tag = "Dashboard",
    params(DashboardQuery),
    responses(
        (status = 200, description = "Totais do mês e desempenho por vendedor", body = DashboardMetrics),
        (status = 500, description = "Erro do banco de dados")
    )
)]
pub async fn get_dashboard(
    State(app_state): State<AppState>,
    QueryParams(query): QueryParams<DashboardQuery>,
) -> Result<Json<DashboardMetrics>, AppError> {
    let year_month = YearMonth::parse_or_current(query.month.as_deref());
    let metrics = app_state.dashboard_service.get_dashboard(year_month).await?;
    Ok(Json(metrics))
}

// GET /api/vendor-dashboard
#[utoipa::path(
    get,
    path = "/api/vendor-dashboard",
    tag = "Dashboard",
    params(VendorDashboardQuery),
    responses(
        (status = 200, description = "Painel pessoal do vendedor", body = VendorDashboard),
        (status = 400, description = "userId ausente ou não numérico"),
        (status = 500, description = "Erro do banco de dados")
    )
)]
pub async fn get_vendor_dashboard(
    State(app_state): State<AppState>,
    QueryParams(query): QueryParams<VendorDashboardQuery>,
) -> Result<Json<VendorDashboard>, AppError> {
    let user_id = parse_user_id(query.user_id.as_deref())?;
    let year_month = YearMonth::parse_or_current(query.month.as_deref());

    let dashboard = app_state
        .dashboard_service
        .get_vendor_dashboard(user_id, year_month)
        .await?;
    Ok(Json(dashboard))
}

fn parse_user_id(raw: Option<&str>) -> Result<i32, AppError> {
    let raw = raw
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| AppError::BadRequest("userId es requerido".into()))?;

    raw.parse::<i32>()
        .ok()
        .filter(|id| *id > 0)
        .ok_or_else(|| AppError::BadRequest("userId debe ser un entero positivo".into()))
}
