// src/db/procedures.rs
// Catálogo dos stored procedures que o backend espera encontrar no banco.

use crate::models::periods::YearMonth;

pub const SP_LOGIN: &str = "auth.sp_Login";
pub const SP_GET_USER_PERMISSION: &str = "auth.sp_GetUserPermission";
pub const SP_GET_VENDORS_WITH_PERMISSIONS: &str = "auth.sp_GetVendorsWithPermissions";
pub const SP_UPDATE_USER_PERMISSION: &str = "auth.sp_UpdateUserPermission";
pub const SP_GET_ALL_MONTHS_STATUS: &str = "auth.sp_GetAllMonthsStatus";
pub const SP_UPDATE_MONTH_VISIBILITY: &str = "auth.sp_UpdateMonthVisibility";
pub const SP_GET_DASHBOARD_METRICS: &str = "ventas.sp_GetDashboardMetrics";
pub const SP_GET_VENDOR_DASHBOARD: &str = "ventas.sp_GetVendorDashboard";

pub const ALL: [&str; 8] = [
    SP_LOGIN,
    SP_GET_USER_PERMISSION,
    SP_GET_VENDORS_WITH_PERMISSIONS,
    SP_UPDATE_USER_PERMISSION,
    SP_GET_ALL_MONTHS_STATUS,
    SP_UPDATE_MONTH_VISIBILITY,
    SP_GET_DASHBOARD_METRICS,
    SP_GET_VENDOR_DASHBOARD,
];

// Valor de parâmetro com o tipo SQL que o procedure declara.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    NVarChar(String),
    Char(String),
    Int(i32),
    Bit(bool),
}

#[derive(Debug, Clone, PartialEq)]
pub struct SqlParam {
    pub name: &'static str,
    pub value: ParamValue,
}

// Uma chamada parametrizada: `EXEC <name> @P = valor, ...`
#[derive(Debug, Clone, PartialEq)]
pub struct ProcedureCall {
    pub name: &'static str,
    pub params: Vec<SqlParam>,
}

impl ProcedureCall {
    pub fn new(name: &'static str) -> Self {
        Self { name, params: Vec::new() }
    }

    pub fn param(mut self, name: &'static str, value: ParamValue) -> Self {
        self.params.push(SqlParam { name, value });
        self
    }

    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.params.iter().find(|p| p.name == name).map(|p| &p.value)
    }

    pub fn int(&self, name: &str) -> Option<i32> {
        match self.get(name)? {
            ParamValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn text(&self, name: &str) -> Option<&str> {
        match self.get(name)? {
            ParamValue::NVarChar(v) | ParamValue::Char(v) => Some(v),
            _ => None,
        }
    }

    pub fn bit(&self, name: &str) -> Option<bool> {
        match self.get(name)? {
            ParamValue::Bit(v) => Some(*v),
            _ => None,
        }
    }

    /// Texto T-SQL com placeholders posicionais (`@P1`, `@P2`...) na ordem de `params`.
    pub fn to_sql(&self) -> String {
        let assignments: Vec<String> = self
            .params
            .iter()
            .enumerate()
            .map(|(i, p)| format!("@{} = @P{}", p.name, i + 1))
            .collect();

        if assignments.is_empty() {
            format!("EXEC {}", self.name)
        } else {
            format!("EXEC {} {}", self.name, assignments.join(", "))
        }
    }
}

pub fn login(username: &str, password: &str) -> ProcedureCall {
    ProcedureCall::new(SP_LOGIN)
        .param("Username", ParamValue::NVarChar(username.to_string()))
        .param("Password", ParamValue::NVarChar(password.to_string()))
}

pub fn user_permission(user_id: i32) -> ProcedureCall {
    ProcedureCall::new(SP_GET_USER_PERMISSION).param("UserId", ParamValue::Int(user_id))
}

pub fn vendors_with_permissions() -> ProcedureCall {
    ProcedureCall::new(SP_GET_VENDORS_WITH_PERMISSIONS)
}

pub fn update_user_permission(user_id: i32, permission: &str) -> ProcedureCall {
    ProcedureCall::new(SP_UPDATE_USER_PERMISSION)
        .param("UserId", ParamValue::Int(user_id))
        .param("PermissionType", ParamValue::NVarChar(permission.to_string()))
}

pub fn all_months_status(year: i32) -> ProcedureCall {
    ProcedureCall::new(SP_GET_ALL_MONTHS_STATUS).param("Year", ParamValue::Int(year))
}

pub fn update_month_visibility(year_month: YearMonth, is_visible: bool) -> ProcedureCall {
    ProcedureCall::new(SP_UPDATE_MONTH_VISIBILITY)
        .param("YearMonth", ParamValue::Char(year_month.to_string()))
        .param("IsVisible", ParamValue::Bit(is_visible))
}

pub fn dashboard_metrics(year_month: YearMonth) -> ProcedureCall {
    ProcedureCall::new(SP_GET_DASHBOARD_METRICS)
        .param("YearMonth", ParamValue::Char(year_month.to_string()))
}

pub fn vendor_dashboard(user_id: i32, year_month: YearMonth) -> ProcedureCall {
    ProcedureCall::new(SP_GET_VENDOR_DASHBOARD)
        .param("UserID", ParamValue::Int(user_id))
        .param("YearMonth", ParamValue::Char(year_month.to_string()))
}
