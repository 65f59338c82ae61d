//! HTTP server

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tower_http::trace::TraceLayer;

use crate::auth::{load_session, require_login, SessionManager};
use crate::config::Config;
use crate::db::Database;
use crate::error::Result;
use crate::ui::{self, Templates};

use super::routes;

const SESSION_CLEANUP_INTERVAL: Duration = Duration::from_secs(60);

/// Application state shared across handlers
pub struct AppState {
    pub config: Config,
    pub db: Database,
    pub sessions: SessionManager,
    pub templates: Templates,
}

pub type SharedState = Arc<AppState>;

impl AppState {
    /// Validate the configuration, connect to the configured database, make
    /// sure the schema exists and set up an empty session store
    pub async fn from_config(config: Config) -> Result<Self> {
        config.validate()?;

        let db = Database::connect(&config.database).await?;
        db.create_all().await?;

        let sessions = SessionManager::with_idle_timeout(chrono::Duration::minutes(
            config.session.idle_timeout_minutes,
        ));

        Ok(Self {
            config,
            db,
            sessions,
            templates: Templates::new(),
        })
    }
}

/// Run the HTTP server
pub async fn run_server(config: Config, host: &str, port: u16) -> Result<()> {
    let state = Arc::new(AppState::from_config(config).await?);

    if !state.config.testing {
        spawn_session_cleanup(state.sessions.clone());
    }

    let app = create_router(state);

    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Periodically drop idle sessions
fn spawn_session_cleanup(sessions: SessionManager) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(SESSION_CLEANUP_INTERVAL);
        loop {
            interval.tick().await;
            sessions.cleanup_expired().await;
        }
    });
}

/// Create the router with all routes
pub fn create_router(state: SharedState) -> Router {
    let protected = Router::new()
        .route("/tasks/", get(ui::tasks))
        .route("/add/", post(ui::add_task))
        .route("/logout/", get(ui::logout))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_login));

    Router::new()
        // API routes
        .route("/api/health", get(routes::health))
        // UI routes
        .route("/", get(ui::login_page).post(ui::login))
        .route("/register/", get(ui::register_page).post(ui::register))
        .merge(protected)
        // Middleware
        .layer(middleware::from_fn_with_state(state.clone(), load_session))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
