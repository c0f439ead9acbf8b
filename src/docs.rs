// src/docs.rs

use utoipa::OpenApi;
use crate::common;
use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Auth ---
        handlers::auth::login,

        // --- Dashboard ---
        handlers::dashboard::get_dashboard,
        handlers::dashboard::get_vendor_dashboard,

        // --- Admin ---
        handlers::permissions::list_vendors,
        handlers::permissions::update_permission,
        handlers::permissions::months_status,
        handlers::permissions::update_month_visibility,

        // --- Periods ---
        handlers::periods::get_periods,
        handlers::periods::update_periods,
        handlers::periods::set_weeks,

        // --- Users ---
        handlers::users::list_sellers,
        handlers::users::list_users,
        handlers::users::set_active,
        handlers::users::set_visibility,
    ),
    components(
        schemas(
            common::response::OkResponse,

            // --- Auth ---
            models::auth::Role,
            models::auth::VisibilityScope,
            models::auth::LoginPayload,
            models::auth::LoginUser,
            models::auth::LoginResponse,
            models::auth::DirectoryUser,
            models::auth::SetActivePayload,
            models::auth::SetVisibilityPayload,

            // --- Dashboard ---
            models::dashboard::ReportPeriod,
            models::dashboard::DashboardTotals,
            models::dashboard::SellerPerformance,
            models::dashboard::DashboardMetrics,
            models::dashboard::VendorTotals,
            models::dashboard::WeekAmount,
            models::dashboard::VendorDashboard,

            // --- Admin ---
            models::admin::VendorPermission,
            models::admin::UpdatePermissionPayload,
            models::admin::MonthStatus,
            models::admin::UpdateMonthVisibilityPayload,

            // --- Periods ---
            models::periods::WeekDescriptor,
            models::periods::PeriodState,
            models::periods::PeriodsUpdatePayload,
            models::periods::PeriodsUpdateResponse,
            models::periods::WeeksPayload,
        )
    ),
    tags(
        (name = "Auth", description = "Login contra auth.sp_Login ou o mock"),
        (name = "Dashboard", description = "Painéis mensal e do vendedor"),
        (name = "Admin", description = "Permissões de vendedores e visibilidade dos meses"),
        (name = "Periods", description = "Meses liberados e semanas (em memória)"),
        (name = "Users", description = "Diretório de usuários e vendedores")
    )
)]
pub struct ApiDoc;
