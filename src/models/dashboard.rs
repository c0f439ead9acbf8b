// src/models/dashboard.rs

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

// Query string dos painéis. Tudo opcional: a validação é feita no handler.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DashboardQuery {
    /// Mês no formato YYYY-MM; ausente ou inválido = mês corrente
    pub month: Option<String>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct VendorDashboardQuery {
    /// ID do vendedor (inteiro positivo, obrigatório)
    #[serde(rename = "userId")]
    pub user_id: Option<String>,

    /// Mês no formato YYYY-MM; ausente ou inválido = mês corrente
    pub month: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ReportPeriod {
    #[schema(example = "NOVIEMBRE")]
    pub month: String,

    #[schema(example = 2025)]
    pub year: i32,

    #[schema(example = "S2")]
    pub week: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardTotals {
    pub monthly: Decimal,
    /// Sempre arredondado a 2 casas
    pub per_seller_avg: Decimal,
}

// Linha da tabela de desempenho (uma por vendedor, S1..S5 = semanas do mês)
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct SellerPerformance {
    #[schema(example = "Ana Pérez")]
    pub name: String,
    pub s1: Decimal,
    pub s2: Decimal,
    pub s3: Decimal,
    pub s4: Decimal,
    pub s5: Decimal,
    pub total: Decimal,
}

// Painel mensal do administrador
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct DashboardMetrics {
    pub period: ReportPeriod,
    pub totals: DashboardTotals,
    pub performance: Vec<SellerPerformance>,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct VendorTotals {
    pub personal: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct WeekAmount {
    #[schema(example = 1)]
    pub week: i64,
    pub amount: Decimal,
}

// Painel do vendedor
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct VendorDashboard {
    pub period: ReportPeriod,
    pub totals: VendorTotals,
    pub weeks: Vec<WeekAmount>,

    #[schema(example = "datos_personales")]
    pub permission: String,
}
