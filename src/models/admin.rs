// src/models/admin.rs

use serde::{Deserialize, Deserializer, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::models::periods::YearMonth;

// Vendedor com o seu tipo de permissão (auth.sp_GetVendorsWithPermissions)
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VendorPermission {
    #[schema(example = 2)]
    pub user_id: i64,

    #[schema(example = "harold")]
    pub username: String,

    #[schema(example = "Vendedor")]
    pub role: String,

    #[schema(example = "todos_vendedores")]
    pub permission: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePermissionPayload {
    #[validate(
        required(message = "userId y permission son requeridos"),
        range(min = 1, message = "userId debe ser un entero positivo")
    )]
    #[schema(example = 2)]
    pub user_id: Option<i32>,

    // O vocabulário (datos_personales, todos_vendedores...) pertence ao banco.
    #[validate(
        required(message = "userId y permission son requeridos"),
        length(min = 1, message = "permission no puede estar vacío")
    )]
    #[schema(example = "todos_vendedores")]
    pub permission: Option<String>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct MonthsStatusQuery {
    /// Ano (inteiro); ausente ou inválido = ano corrente
    pub year: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MonthStatus {
    #[schema(example = "2025-11")]
    pub year_month: String,

    pub is_visible: bool,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMonthVisibilityPayload {
    #[validate(required(message = "yearMonth e isVisible son requeridos"))]
    #[schema(value_type = Option<String>, example = "2025-11")]
    pub year_month: Option<YearMonth>,

    #[validate(required(message = "yearMonth e isVisible son requeridos"))]
    #[serde(default, deserialize_with = "deserialize_flag")]
    #[schema(value_type = Option<bool>, example = true)]
    pub is_visible: Option<bool>,
}

// Aceita `true`/`false` e também 0/1, como uma coluna BIT.
fn deserialize_flag<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Int(i64),
    }

    match Option::<Flag>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Flag::Bool(value)) => Ok(Some(value)),
        Some(Flag::Int(0)) => Ok(Some(false)),
        Some(Flag::Int(1)) => Ok(Some(true)),
        Some(Flag::Int(other)) => Err(serde::de::Error::custom(format!(
            "isVisible debe ser booleano, recibido {other}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn visibility_flag_accepts_bits() {
        let payload: UpdateMonthVisibilityPayload =
            serde_json::from_str(r#"{"yearMonth": "2025-11", "isVisible": 0}"#).unwrap();
        assert_eq!(payload.is_visible, Some(false));
        assert!(payload.validate().is_ok());

        let missing: UpdateMonthVisibilityPayload =
            serde_json::from_str(r#"{"yearMonth": "2025-11"}"#).unwrap();
        assert!(missing.validate().is_err());

        assert!(serde_json::from_str::<UpdateMonthVisibilityPayload>(r#"{"isVisible": "sí"}"#).is_err());
    }

    #[test]
    fn permission_update_rejects_zero_user() {
        let payload: UpdatePermissionPayload =
            serde_json::from_str(r#"{"userId": 0, "permission": "todos_vendedores"}"#).unwrap();
        let errors = payload.validate().unwrap_err();
        let messages: Vec<String> = errors
            .field_errors()
            .values()
            .flat_map(|errs| errs.iter().filter_map(|e| e.message.as_ref().map(|m| m.to_string())))
            .collect();
        assert_eq!(messages, vec!["userId debe ser un entero positivo".to_string()]);
    }
}
