//! SQLite persistence for users and tasks

pub mod tasks;
pub mod users;

pub use tasks::{NewTask, Task, TaskStatus};
pub use users::{NewUser, User};

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};

use crate::config::DatabaseConfig;
use crate::error::{Error, Result};

const CREATE_USERS: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id       INTEGER PRIMARY KEY AUTOINCREMENT,
    name     TEXT NOT NULL UNIQUE,
    email    TEXT NOT NULL UNIQUE,
    password TEXT NOT NULL,
    role     TEXT NOT NULL DEFAULT 'user'
)
"#;

const CREATE_TASKS: &str = r#"
CREATE TABLE IF NOT EXISTS tasks (
    task_id     INTEGER PRIMARY KEY AUTOINCREMENT,
    name        TEXT NOT NULL,
    due_date    DATE NOT NULL,
    priority    INTEGER NOT NULL,
    posted_date DATE NOT NULL,
    status      INTEGER NOT NULL DEFAULT 1,
    user_id     INTEGER NOT NULL REFERENCES users(id)
)
"#;

/// Handle to the application database
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Open (creating if missing) the configured database file
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        if let Some(parent) = config.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let options = SqliteConnectOptions::new()
            .filename(&config.path)
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections.max(1))
            .connect_with(options)
            .await?;

        tracing::debug!("Connected to database {}", config.path.display());

        Ok(Self { pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Create every table that does not exist yet
    pub async fn create_all(&self) -> Result<()> {
        sqlx::query(CREATE_USERS).execute(&self.pool).await?;
        sqlx::query(CREATE_TASKS).execute(&self.pool).await?;
        Ok(())
    }

    /// Drop every table, children first
    pub async fn drop_all(&self) -> Result<()> {
        sqlx::query("DROP TABLE IF EXISTS tasks")
            .execute(&self.pool)
            .await?;
        sqlx::query("DROP TABLE IF EXISTS users")
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

/// Map a UNIQUE constraint failure to `Error::DuplicateUser`
pub(crate) fn unique_violation_to_duplicate(err: sqlx::Error) -> Error {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            return Error::DuplicateUser;
        }
    }
    Error::Database(err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    async fn open(dir: &TempDir) -> Database {
        let config = DatabaseConfig {
            path: dir.path().join("test.db"),
            max_connections: 1,
        };
        Database::connect(&config).await.expect("connect")
    }

    #[tokio::test]
    async fn test_create_all_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let db = open(&dir).await;

        db.create_all().await.unwrap();
        db.create_all().await.unwrap();

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(db.pool())
            .await
            .unwrap();
        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn test_drop_all_removes_tables() {
        let dir = TempDir::new().unwrap();
        let db = open(&dir).await;
        db.create_all().await.unwrap();

        db.drop_all().await.unwrap();

        let result = sqlx::query("SELECT COUNT(*) FROM users")
            .execute(db.pool())
            .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_connect_creates_missing_directory() {
        let dir = TempDir::new().unwrap();
        let config = DatabaseConfig {
            path: dir.path().join("nested").join("app.db"),
            max_connections: 1,
        };

        let db = Database::connect(&config).await.unwrap();
        db.create_all().await.unwrap();

        assert!(config.path.exists());
    }
}
