// src/models/auth.rs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

// Papel do usuário; o rótulo é o texto que o banco devolve na coluna `Rol`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum Role {
    #[serde(rename = "Administrador")]
    Administrator,
    #[serde(rename = "Vendedor")]
    Seller,
}

impl Role {
    pub fn label(&self) -> &'static str {
        match self {
            Role::Administrator => "Administrador",
            Role::Seller => "Vendedor",
        }
    }
}

/// O front-end manda para o painel de admin quando o papel contém "admin" (sem caixa).
pub fn is_admin_role(role: &str) -> bool {
    role.to_lowercase().contains("admin")
}

// Escopo de visibilidade: só as próprias vendas ou as de todos os vendedores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum VisibilityScope {
    #[serde(rename = "personal")]
    Personal,
    #[serde(rename = "todos", alias = "todo", alias = "all")]
    All,
}

// Dados para login
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginPayload {
    #[validate(
        required(message = "username es requerido"),
        length(min = 1, message = "username es requerido")
    )]
    #[schema(example = "henryoo")]
    pub username: Option<String>,

    #[validate(
        required(message = "password es requerido"),
        length(min = 1, message = "password es requerido")
    )]
    #[schema(example = "Admin*2025!")]
    pub password: Option<String>,
}

// Usuário resolvido pelo login; nunca parcialmente preenchido.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginUser {
    #[schema(example = 1)]
    pub user_id: i64,

    #[schema(example = "henryoo")]
    pub username: String,

    #[schema(example = "Administrador")]
    pub role: String,

    #[schema(example = "2025-11-03T14:21:09.000")]
    pub last_login_at: Option<String>,
}

impl LoginUser {
    pub fn is_admin(&self) -> bool {
        is_admin_role(&self.role)
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    pub ok: bool,
    pub user: LoginUser,
}

// Usuário do diretório exibido em /api/users
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct DirectoryUser {
    #[schema(example = 2)]
    pub id: u32,

    #[schema(example = "harold")]
    pub username: String,

    pub role: Role,

    pub active: bool,

    pub visibility: VisibilityScope,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SetActivePayload {
    #[validate(required(message = "active es requerido"))]
    pub active: Option<bool>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SetVisibilityPayload {
    #[validate(required(message = "mode es requerido"))]
    pub mode: Option<VisibilityScope>,
}
