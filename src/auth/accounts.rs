//! Account creation and credential checks

use crate::auth::models::UserRole;
use crate::auth::password::{hash_password, verify_password};
use crate::config::SecurityConfig;
use crate::db::{users, Database, NewUser, User};
use crate::error::{Error, Result};

/// Hash the password and insert a new user.
///
/// `role: None` stores the column default (`user`). Fails with
/// `Error::DuplicateUser` when the name or email is already registered;
/// nothing is written in that case.
pub async fn create_user(
    db: &Database,
    security: &SecurityConfig,
    name: &str,
    email: &str,
    password: &str,
    role: Option<UserRole>,
) -> Result<User> {
    let password = password.to_string();
    let cost = security.bcrypt_cost;
    let password_hash = tokio::task::spawn_blocking(move || hash_password(&password, cost))
        .await
        .map_err(|e| Error::Other(format!("Password hashing task failed: {}", e)))??;

    let mut new_user = NewUser::new(name, email, password_hash);
    new_user.role = role;

    let user = users::insert_user(db.pool(), &new_user).await?;
    tracing::info!(user_id = user.id, name = %user.name, role = %user.role, "Created user");
    Ok(user)
}

/// Look up a user by name and check the password.
///
/// Every mismatch (unknown name, wrong password, unreadable stored hash)
/// is reported as `Error::InvalidCredentials`.
pub async fn authenticate(db: &Database, name: &str, password: &str) -> Result<User> {
    let user = match users::find_user_by_name(db.pool(), name).await? {
        Some(user) => user,
        None => return Err(Error::InvalidCredentials),
    };

    let password = password.to_string();
    let hash = user.password.clone();
    let verified = tokio::task::spawn_blocking(move || verify_password(&password, &hash))
        .await
        .map_err(|e| Error::Other(format!("Password check task failed: {}", e)))?;

    match verified {
        Ok(true) => Ok(user),
        Ok(false) => Err(Error::InvalidCredentials),
        Err(e) => {
            tracing::warn!(user_id = user.id, "Stored password hash is unreadable: {}", e);
            Err(Error::InvalidCredentials)
        }
    }
}
