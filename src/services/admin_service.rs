// src/services/admin_service.rs

use std::sync::Arc;

use crate::{
    common::error::AppError,
    db::{backend::call_once, mock::DEFAULT_PERMISSION, procedures, value::rows, SalesBackend},
    models::{
        admin::{MonthStatus, VendorPermission},
        periods::YearMonth,
    },
};

// Operações do painel de administração que passam pelos stored procedures.
#[derive(Clone)]
pub struct AdminService {
    backend: Arc<dyn SalesBackend>,
}

impl AdminService {
    pub fn new(backend: Arc<dyn SalesBackend>) -> Self {
        Self { backend }
    }

    pub async fn list_vendors(&self) -> Result<Vec<VendorPermission>, AppError> {
        let recordsets = call_once(self.backend.as_ref(), &procedures::vendors_with_permissions())
            .await
            .map_err(|e| AppError::backend("Error al obtener vendedores", e))?;

        let vendors: Vec<VendorPermission> = rows(&recordsets, 0)
            .iter()
            .map(|row| VendorPermission {
                user_id: row.int("UserId").unwrap_or_default(),
                username: row.text("Username").unwrap_or_default(),
                role: row.text("Rol").unwrap_or_default(),
                permission: row
                    .text("Permission")
                    .unwrap_or_else(|| DEFAULT_PERMISSION.to_string()),
            })
            .collect();

        tracing::info!("👥 {} vendedores encontrados", vendors.len());
        Ok(vendors)
    }

    pub async fn update_permission(&self, user_id: i32, permission: &str) -> Result<(), AppError> {
        tracing::info!("🔑 Actualizando permiso: usuario {} -> {}", user_id, permission);

        call_once(self.backend.as_ref(), &procedures::update_user_permission(user_id, permission))
            .await
            .map_err(|e| AppError::backend("Error al actualizar permiso", e))?;
        Ok(())
    }

    pub async fn months_status(&self, year: i32) -> Result<Vec<MonthStatus>, AppError> {
        let recordsets = call_once(self.backend.as_ref(), &procedures::all_months_status(year))
            .await
            .map_err(|e| AppError::backend("Error al obtener estado de meses", e))?;

        Ok(rows(&recordsets, 0)
            .iter()
            .map(|row| MonthStatus {
                year_month: row.text("YearMonth").unwrap_or_default(),
                is_visible: row.boolean("IsVisible").unwrap_or(false),
            })
            .collect())
    }

    pub async fn update_month_visibility(&self, year_month: YearMonth, is_visible: bool) -> Result<(), AppError> {
        tracing::info!("📅 Actualizando visibilidad de {}: {}", year_month, is_visible);

        call_once(self.backend.as_ref(), &procedures::update_month_visibility(year_month, is_visible))
            .await
            .map_err(|e| AppError::backend("Error al actualizar visibilidad del mes", e))?;
        Ok(())
    }
}
