use std::sync::Arc;

use crate::db::{Database, DbError};
use crate::error::{ApiError, ApiResult};

use super::model::{UpdateUserDto, User};

/// New account data after credential hashing.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub given_name: Option<String>,
    pub family_name: Option<String>,
    pub password_hash: String,
}

#[derive(Debug, Clone)]
pub struct UserService {
    db: Arc<Database>,
}

impl UserService {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    pub fn find_one_by_id(&self, id: i64) -> ApiResult<User> {
        self.db
            .read(|t| t.users.get(id).cloned())
            .ok_or(ApiError::NotFound)
    }

    pub fn find_by_email(&self, email: &str) -> Option<User> {
        self.db.read(|t| t.user_by_email(email).cloned())
    }

    pub fn exists(&self, id: i64) -> bool {
        self.db.read(|t| t.users.contains(id))
    }

    pub fn create(&self, new_user: NewUser) -> ApiResult<User> {
        let user = self.db.transaction(|t| {
            if t.user_by_email(&new_user.email).is_some() {
                return Err(DbError::UniqueViolation("email"));
            }
            let user = t.users.insert_with(|id| {
                User::new(
                    id,
                    new_user.email,
                    new_user.given_name,
                    new_user.family_name,
                    new_user.password_hash,
                )
            });
            Ok(user.clone())
        })?;

        tracing::info!(user_id = user.id, "User created");
        Ok(user)
    }

    pub fn update(&self, id: i64, dto: UpdateUserDto) -> ApiResult<User> {
        let user = self.db.transaction(|t| {
            let user = t.users.get_mut(id)?;
            if let Some(given_name) = dto.given_name {
                user.given_name = Some(given_name);
            }
            if let Some(family_name) = dto.family_name {
                user.family_name = Some(family_name);
            }
            Ok(user.clone())
        })?;
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_user(email: &str) -> NewUser {
        NewUser {
            email: email.into(),
            given_name: Some("Ada".into()),
            family_name: None,
            password_hash: "salt$hash".into(),
        }
    }

    #[test]
    fn test_duplicate_email_conflicts() {
        let users = UserService::new(Arc::new(Database::new()));
        users.create(new_user("ada@example.com")).unwrap();
        let err = users.create(new_user("ADA@example.com")).unwrap_err();
        assert_eq!(err, ApiError::Conflict("email already exists".into()));
    }

    #[test]
    fn test_update_missing_user_is_not_found() {
        let users = UserService::new(Arc::new(Database::new()));
        let err = users.update(5, UpdateUserDto::default()).unwrap_err();
        assert_eq!(err, ApiError::NotFound);
    }

    #[test]
    fn test_update_keeps_absent_fields() {
        let users = UserService::new(Arc::new(Database::new()));
        let user = users.create(new_user("ada@example.com")).unwrap();
        let updated = users
            .update(
                user.id,
                UpdateUserDto {
                    given_name: None,
                    family_name: Some("Lovelace".into()),
                },
            )
            .unwrap();
        assert_eq!(updated.given_name.as_deref(), Some("Ada"));
        assert_eq!(updated.family_name.as_deref(), Some("Lovelace"));
    }
}
