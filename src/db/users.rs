//! User records

use serde::Serialize;
use sqlx::{FromRow, SqlitePool};

use crate::auth::models::UserRole;
use crate::error::{Error, Result};

use super::unique_violation_to_duplicate;

/// A row of the `users` table
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    /// Password hash, never rendered
    #[serde(skip_serializing)]
    pub password: String,
    pub role: String,
}

impl User {
    /// Parsed role; unknown values read as `UserRole::User`
    pub fn role(&self) -> UserRole {
        self.role.parse().unwrap_or_default()
    }

    pub fn is_admin(&self) -> bool {
        self.role() == UserRole::Admin
    }
}

/// Values for inserting a user. `role: None` leaves the column default in place.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: Option<UserRole>,
}

impl NewUser {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        password_hash: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            password_hash: password_hash.into(),
            role: None,
        }
    }

    pub fn with_role(mut self, role: UserRole) -> Self {
        self.role = Some(role);
        self
    }
}

/// Insert a user, failing with `Error::DuplicateUser` if the name or email is taken
pub async fn insert_user(pool: &SqlitePool, new_user: &NewUser) -> Result<User> {
    let result = match new_user.role {
        Some(role) => {
            sqlx::query("INSERT INTO users (name, email, password, role) VALUES (?, ?, ?, ?)")
                .bind(&new_user.name)
                .bind(&new_user.email)
                .bind(&new_user.password_hash)
                .bind(role.to_string())
                .execute(pool)
                .await
        }
        None => {
            sqlx::query("INSERT INTO users (name, email, password) VALUES (?, ?, ?)")
                .bind(&new_user.name)
                .bind(&new_user.email)
                .bind(&new_user.password_hash)
                .execute(pool)
                .await
        }
    }
    .map_err(unique_violation_to_duplicate)?;

    find_user_by_id(pool, result.last_insert_rowid())
        .await?
        .ok_or_else(|| Error::UserNotFound(new_user.name.clone()))
}

pub async fn find_user_by_id(pool: &SqlitePool, id: i64) -> Result<Option<User>> {
    let user = sqlx::query_as::<_, User>(
        "SELECT id, name, email, password, role FROM users WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(user)
}

pub async fn find_user_by_name(pool: &SqlitePool, name: &str) -> Result<Option<User>> {
    let user = sqlx::query_as::<_, User>(
        "SELECT id, name, email, password, role FROM users WHERE name = ?",
    )
    .bind(name)
    .fetch_optional(pool)
    .await?;
    Ok(user)
}

pub async fn list_users(pool: &SqlitePool) -> Result<Vec<User>> {
    let users = sqlx::query_as::<_, User>(
        "SELECT id, name, email, password, role FROM users ORDER BY id",
    )
    .fetch_all(pool)
    .await?;
    Ok(users)
}

/// Number of users holding exactly this (name, email) pair
pub async fn count_users_with(pool: &SqlitePool, name: &str, email: &str) -> Result<i64> {
    let count = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM users WHERE name = ? AND email = ?",
    )
    .bind(name)
    .bind(email)
    .fetch_one(pool)
    .await?;
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DatabaseConfig;
    use crate::db::Database;
    use tempfile::TempDir;

    async fn setup() -> (TempDir, Database) {
        let dir = TempDir::new().unwrap();
        let config = DatabaseConfig {
            path: dir.path().join("test.db"),
            max_connections: 1,
        };
        let db = Database::connect(&config).await.unwrap();
        db.create_all().await.unwrap();
        (dir, db)
    }

    #[tokio::test]
    async fn test_insert_without_role_defaults_to_user() {
        let (_dir, db) = setup().await;

        let user = insert_user(db.pool(), &NewUser::new("Johnny", "john@doe.com", "hash"))
            .await
            .unwrap();

        assert_eq!(user.role, "user");
        assert_eq!(user.role(), UserRole::User);
        assert!(!user.is_admin());
    }

    #[tokio::test]
    async fn test_insert_with_admin_role() {
        let (_dir, db) = setup().await;

        let new_user =
            NewUser::new("Superman", "admin@example.com", "hash").with_role(UserRole::Admin);
        let user = insert_user(db.pool(), &new_user).await.unwrap();

        assert_eq!(user.role, "admin");
        assert!(user.is_admin());
    }

    #[tokio::test]
    async fn test_duplicate_name_is_rejected() {
        let (_dir, db) = setup().await;
        insert_user(db.pool(), &NewUser::new("Michael", "michael@example.com", "hash"))
            .await
            .unwrap();

        let clash = NewUser::new("Michael", "other@example.com", "hash");
        let result = insert_user(db.pool(), &clash).await;

        assert!(matches!(result, Err(Error::DuplicateUser)));
        assert_eq!(list_users(db.pool()).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_email_is_rejected() {
        let (_dir, db) = setup().await;
        insert_user(db.pool(), &NewUser::new("Michael", "michael@example.com", "hash"))
            .await
            .unwrap();

        let clash = NewUser::new("Michaela", "michael@example.com", "hash");
        let result = insert_user(db.pool(), &clash).await;

        assert!(matches!(result, Err(Error::DuplicateUser)));
    }

    #[tokio::test]
    async fn test_find_user_by_name() {
        let (_dir, db) = setup().await;
        insert_user(db.pool(), &NewUser::new("Fletcher", "fletcher@example.com", "hash"))
            .await
            .unwrap();

        let found = find_user_by_name(db.pool(), "Fletcher").await.unwrap();
        assert_eq!(found.map(|u| u.email), Some("fletcher@example.com".to_string()));

        let missing = find_user_by_name(db.pool(), "nobody").await.unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_count_users_with_pair() {
        let (_dir, db) = setup().await;
        insert_user(db.pool(), &NewUser::new("Michael", "michael@example.com", "hash"))
            .await
            .unwrap();

        assert_eq!(count_users_with(db.pool(), "Michael", "michael@example.com").await.unwrap(), 1);
        assert_eq!(count_users_with(db.pool(), "Michael", "nope@example.com").await.unwrap(), 0);
    }

    #[test]
    fn test_password_hash_not_serialized() {
        let user = User {
            id: 1,
            name: "alice".to_string(),
            email: "alice@example.com".to_string(),
            password: "secret-hash".to_string(),
            role: "user".to_string(),
        };
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("secret-hash"));
        assert!(json.contains("\"role\":\"user\""));
    }
}
