// src/services/dashboard_service.rs

use std::sync::Arc;

use rust_decimal::Decimal;

use crate::{
    common::error::{AppError, BackendError},
    db::{
        backend::release,
        mock::DEFAULT_PERMISSION,
        procedures,
        value::{first_row, rows, Recordset},
        BackendSession, SalesBackend,
    },
    models::{
        dashboard::{
            DashboardMetrics, DashboardTotals, ReportPeriod, SellerPerformance, VendorDashboard,
            VendorTotals, WeekAmount,
        },
        periods::YearMonth,
    },
};

const DASHBOARD_ERROR: &str = "Error al obtener datos del dashboard";
const VENDOR_ERROR: &str = "Error al obtener datos del vendedor";

#[derive(Clone)]
pub struct DashboardService {
    backend: Arc<dyn SalesBackend>,
}

impl DashboardService {
    pub fn new(backend: Arc<dyn SalesBackend>) -> Self {
        Self { backend }
    }

    pub async fn get_dashboard(&self, year_month: YearMonth) -> Result<DashboardMetrics, AppError> {
        tracing::info!("📊 Consultando dashboard para {}", year_month);

        let recordsets = {
            let mut session = self.open(DASHBOARD_ERROR).await?;
            let outcome = session.call(&procedures::dashboard_metrics(year_month)).await;
            release(session).await;
            outcome.map_err(|e| AppError::backend(DASHBOARD_ERROR, e))?
        };

        let metrics = build_dashboard(year_month, &recordsets);
        tracing::info!(
            "📈 Dashboard {}: total {} / {} vendedores",
            year_month,
            metrics.totals.monthly,
            metrics.performance.len()
        );
        Ok(metrics)
    }

    /// Duas chamadas na mesma conexão; a conexão é fechada mesmo se a segunda falhar.
    pub async fn get_vendor_dashboard(
        &self,
        user_id: i32,
        year_month: YearMonth,
    ) -> Result<VendorDashboard, AppError> {
        tracing::info!("📅 Consultando datos del vendedor {} para {}", user_id, year_month);

        let mut session = self.open(VENDOR_ERROR).await?;
        let outcome = vendor_calls(session.as_mut(), user_id, year_month).await;
        release(session).await;
        let (dashboard, permission) = outcome.map_err(|e| AppError::backend(VENDOR_ERROR, e))?;

        Ok(build_vendor_dashboard(year_month, &dashboard, &permission))
    }

    async fn open(&self, context: &'static str) -> Result<Box<dyn BackendSession>, AppError> {
        self.backend
            .open()
            .await
            .map_err(|e| AppError::backend(context, e))
    }
}

async fn vendor_calls(
    session: &mut dyn BackendSession,
    user_id: i32,
    year_month: YearMonth,
) -> Result<(Vec<Recordset>, Vec<Recordset>), BackendError> {
    let dashboard = session.call(&procedures::vendor_dashboard(user_id, year_month)).await?;
    let permission = session.call(&procedures::user_permission(user_id)).await?;
    Ok((dashboard, permission))
}

fn period(year_month: YearMonth, week_no: Option<i64>) -> ReportPeriod {
    // WeekNo ausente ou zero vira S1
    let week = week_no.filter(|w| *w != 0).unwrap_or(1);
    ReportPeriod {
        month: year_month.month_name().to_string(),
        year: year_month.year(),
        week: format!("S{week}"),
    }
}

/// Recordsets de `ventas.sp_GetDashboardMetrics`:
/// [0] TotalMensualUSD, [1] PromedioPorVendedorUSD, [2] WeekNo, [3] linhas por vendedor.
pub fn build_dashboard(year_month: YearMonth, recordsets: &[Recordset]) -> DashboardMetrics {
    let amount = |index: usize, column: &str| {
        first_row(recordsets, index)
            .and_then(|r| r.decimal(column))
            .unwrap_or_default()
    };

    let performance = rows(recordsets, 3)
        .iter()
        .map(|row| {
            let week = |column: &str| row.decimal(column).unwrap_or_default();
            SellerPerformance {
                name: row.text("Vendedor").unwrap_or_default(),
                s1: week("S1"),
                s2: week("S2"),
                s3: week("S3"),
                s4: week("S4"),
                s5: week("S5"),
                total: week("Total"),
            }
        })
        .collect();

    DashboardMetrics {
        period: period(year_month, first_row(recordsets, 2).and_then(|r| r.int("WeekNo"))),
        totals: DashboardTotals {
            monthly: amount(0, "TotalMensualUSD"),
            per_seller_avg: amount(1, "PromedioPorVendedorUSD").round_dp(2),
        },
        performance,
    }
}

/// Recordsets de `ventas.sp_GetVendorDashboard` ([0] TotalPersonalUSD, [1] WeekNo, [2] semanas)
/// mais o de `auth.sp_GetUserPermission`.
pub fn build_vendor_dashboard(
    year_month: YearMonth,
    dashboard: &[Recordset],
    permission: &[Recordset],
) -> VendorDashboard {
    let weeks = rows(dashboard, 2)
        .iter()
        .map(|row| WeekAmount {
            week: row.int("WeekNo").unwrap_or_default(),
            amount: row.decimal("TotalUSD").unwrap_or(Decimal::ZERO),
        })
        .collect();

    VendorDashboard {
        period: period(year_month, first_row(dashboard, 1).and_then(|r| r.int("WeekNo"))),
        totals: VendorTotals {
            personal: first_row(dashboard, 0)
                .and_then(|r| r.decimal("TotalPersonalUSD"))
                .unwrap_or_default(),
        },
        weeks,
        permission: first_row(permission, 0)
            .and_then(|r| r.text("Permission"))
            .filter(|p| !p.is_empty())
            .unwrap_or_else(|| DEFAULT_PERMISSION.to_string()),
    }
}
