// src/handlers/periods.rs

use axum::{
    body::Bytes,
    extract::{Path, State},
    Json,
};

use crate::{
    common::{
        error::AppError,
        extract::{validated_body, ValidatedJson},
        response::OkResponse,
    },
    config::AppState,
    models::periods::{PeriodState, PeriodsUpdatePayload, PeriodsUpdateResponse, WeeksPayload, YearMonth},
};

// GET /api/periods
#[utoipa::path(
    get,
    path = "/api/periods",
    tag = "Periods",
    responses(
        (status = 200, description = "Meses liberados, mês padrão e semanas", body = PeriodState)
    )
)]
pub async fn get_periods(State(app_state): State<AppState>) -> Json<PeriodState> {
    Json(app_state.period_store.snapshot().await)
}

// POST /api/periods
#[utoipa::path(
    post,
    path = "/api/periods",
    tag = "Periods",
    request_body = PeriodsUpdatePayload,
    responses(
        (status = 200, description = "Estado após a atualização", body = PeriodsUpdateResponse),
        (status = 400, description = "JSON inválido ou mês fora do formato YYYY-MM")
    )
)]
pub async fn update_periods(
    State(app_state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<PeriodsUpdatePayload>,
) -> Json<PeriodsUpdateResponse> {
    let state = app_state.period_store.update(payload).await;
    Json(PeriodsUpdateResponse { ok: true, state })
}

// POST /api/periods/{year_month}/weeks
#[utoipa::path(
    post,
    path = "/api/periods/{year_month}/weeks",
    tag = "Periods",
    request_body = WeeksPayload,
    params(
        ("year_month" = String, Path, description = "Mês no formato YYYY-MM")
    ),
    responses(
        (status = 200, description = "Semanas gravadas", body = OkResponse),
        (status = 404, description = "Mês fora do formato YYYY-MM")
    )
)]
pub async fn set_weeks(
    State(app_state): State<AppState>,
    Path(raw): Path<String>,
    body: Bytes,
) -> Result<OkResponse, AppError> {
    let year_month: YearMonth = raw.parse().map_err(|_| AppError::RouteNotFound)?;
    let payload: WeeksPayload = validated_body(&body)?;

    // Sem `weeks` no corpo o mês fica como está
    if let Some(weeks) = payload.weeks {
        app_state.period_store.set_weeks(year_month, weeks).await;
    }
    Ok(OkResponse::new())
}
