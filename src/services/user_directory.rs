// src/services/user_directory.rs

use tokio::sync::RwLock;

use crate::{
    common::error::AppError,
    db::mock::MOCK_USERS,
    models::auth::{DirectoryUser, Role, VisibilityScope},
};

// Nomes exibidos no seletor de vendedores do painel.
pub const SELLERS: [&str; 3] = ["Ana Pérez", "Juan Gómez", "Luis Soto"];

pub struct UserDirectory {
    users: RwLock<Vec<DirectoryUser>>,
}

impl UserDirectory {
    pub fn seeded() -> Self {
        let users = MOCK_USERS
            .iter()
            .map(|u| {
                let role = if u.role == Role::Administrator.label() {
                    Role::Administrator
                } else {
                    Role::Seller
                };
                DirectoryUser {
                    id: u.id as u32,
                    username: u.username.to_string(),
                    role,
                    active: u.active,
                    visibility: match role {
                        Role::Administrator => VisibilityScope::All,
                        Role::Seller => VisibilityScope::Personal,
                    },
                }
            })
            .collect();

        Self { users: RwLock::new(users) }
    }

    pub async fn list(&self) -> Vec<DirectoryUser> {
        self.users.read().await.clone()
    }

    pub async fn set_active(&self, id: u32, active: bool) -> Result<(), AppError> {
        self.modify(id, |user| user.active = active).await
    }

    pub async fn set_visibility(&self, id: u32, visibility: VisibilityScope) -> Result<(), AppError> {
        self.modify(id, |user| user.visibility = visibility).await
    }

    async fn modify(&self, id: u32, change: impl FnOnce(&mut DirectoryUser)) -> Result<(), AppError> {
        let mut users = self.users.write().await;
        let user = users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or(AppError::UserNotFound)?;
        change(user);
        tracing::info!("👤 Usuario {} actualizado: activo={} visibilidad={:?}", user.username, user.active, user.visibility);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn seeded_directory_matches_login_table() {
        let users = UserDirectory::seeded().list().await;
        let names: Vec<&str> = users.iter().map(|u| u.username.as_str()).collect();
        assert_eq!(names, vec!["henryoo", "harold", "luis"]);
        assert_eq!(users[0].visibility, VisibilityScope::All);
        assert!(!users[2].active);
    }

    #[tokio::test]
    async fn updates_are_reflected_and_unknown_ids_rejected() {
        let directory = UserDirectory::seeded();

        directory.set_active(3, true).await.unwrap();
        directory.set_visibility(2, VisibilityScope::All).await.unwrap();

        let users = directory.list().await;
        assert!(users[2].active);
        assert_eq!(users[1].visibility, VisibilityScope::All);

        assert!(matches!(directory.set_active(77, false).await, Err(AppError::UserNotFound)));
    }
}
