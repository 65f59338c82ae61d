//! CLI command implementations

use anyhow::Result;
use std::fs;
use std::path::Path;

use crate::api;
use crate::auth::{self, UserRole};
use crate::cli::{error, info, print_user_table, success, warn, OutputFormat};
use crate::config::{self, loader::CONFIG_FILENAME, Config};
use crate::db::{users, Database};
use crate::error::Error;

/// Write a new taskr.toml configuration file
pub async fn init() -> Result<()> {
    let config_path = Path::new(CONFIG_FILENAME);

    if config_path.exists() {
        warn(&format!("{} already exists", CONFIG_FILENAME));
        return Ok(());
    }

    fs::write(config_path, config::loader::default_config_content())?;

    success(&format!("Created {}", CONFIG_FILENAME));
    info("Run 'taskr create-db' and then 'taskr serve' to get started");

    Ok(())
}

/// Create the database tables
pub async fn create_db() -> Result<()> {
    let config = load_config()?;
    let db = Database::connect(&config.database).await?;
    db.create_all().await?;
    db.close().await;

    success(&format!("Database ready at {}", config.database.path.display()));
    Ok(())
}

/// Create an administrator account
pub async fn create_admin(name: &str, email: &str, password: &str) -> Result<()> {
    let config = load_config()?;
    let db = Database::connect(&config.database).await?;
    db.create_all().await?;

    let result = auth::create_user(
        &db,
        &config.security,
        name,
        email,
        password,
        Some(UserRole::Admin),
    )
    .await;
    db.close().await;

    match result {
        Ok(user) => {
            success(&format!("Created admin user {} (id {})", user.name, user.id));
            Ok(())
        }
        Err(Error::DuplicateUser) => {
            error(&Error::DuplicateUser.to_string());
            Err(Error::DuplicateUser.into())
        }
        Err(e) => {
            error(&format!("Failed to create admin user: {}", e));
            Err(e.into())
        }
    }
}

/// List registered users
pub async fn list_users(format: OutputFormat) -> Result<()> {
    let config = load_config()?;
    let db = Database::connect(&config.database).await?;
    db.create_all().await?;

    let all = users::list_users(db.pool()).await?;
    db.close().await;

    match format {
        OutputFormat::Table => print_user_table(&all),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&all)?),
    }

    Ok(())
}

/// Start the web server
pub async fn serve(host: Option<String>, port: Option<u16>) -> Result<()> {
    let config = load_config()?;
    let host = host.unwrap_or_else(|| config.server.host.clone());
    let port = port.unwrap_or(config.server.port);

    info(&format!("Starting taskr on http://{}:{}", host, port));

    api::run_server(config, &host, port).await?;
    Ok(())
}

fn load_config() -> Result<Config> {
    Ok(config::load_config_or_default()?)
}
