//! Request helpers shared by the integration tests

use taskr::auth::{self, UserRole};
use taskr::db::User;

use super::{TestApp, TestResponse};

pub async fn login(app: &mut TestApp, name: &str, password: &str) -> TestResponse {
    app.client
        .post_form_follow("/", &[("name", name), ("password", password)])
        .await
}

pub async fn register(
    app: &mut TestApp,
    name: &str,
    email: &str,
    password: &str,
    confirm: &str,
) -> TestResponse {
    app.client
        .post_form_follow(
            "/register/",
            &[("name", name), ("email", email), ("password", password), ("confirm", confirm)],
        )
        .await
}

pub async fn logout(app: &mut TestApp) -> TestResponse {
    app.client.get_follow("/logout/").await
}

/// Insert a user directly, bypassing the registration form
pub async fn create_user(app: &TestApp, name: &str, email: &str, password: &str) -> User {
    auth::create_user(app.db(), &app.state.config.security, name, email, password, None)
        .await
        .expect("create user")
}

pub async fn create_task(app: &mut TestApp) -> TestResponse {
    app.client
        .post_form_follow(
            "/add/",
            &[
                ("name", "Go to the bank"),
                ("due_date", "02/05/2015"),
                ("priority", "1"),
                ("posted_date", "02/04/2015"),
                ("status", "1"),
            ],
        )
        .await
}

pub async fn create_admin_user(app: &TestApp) -> User {
    auth::create_user(
        app.db(),
        &app.state.config.security,
        "Superman",
        "admin@realpython.com",
        "allpowerful",
        Some(UserRole::Admin),
    )
    .await
    .expect("create admin user")
}
