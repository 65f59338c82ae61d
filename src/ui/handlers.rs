//! Web UI handlers

use axum::{
    extract::State,
    response::{Html, IntoResponse, Redirect, Response},
    Extension, Form,
};
use minijinja::{context, Value};

use crate::api::server::SharedState;
use crate::auth::{self, SessionId, SessionUser};
use crate::db::{tasks, NewTask, TaskStatus};
use crate::error::{Error, Result};
use crate::forms::{self, FormErrors, LoginForm, RegisterForm, TaskForm};

pub const WELCOME_MESSAGE: &str = "Welcome!";
pub const GOODBYE_MESSAGE: &str = "Goodbye!";
pub const REGISTERED_MESSAGE: &str = "Thanks for registering. Please login.";
pub const TASK_ADDED_MESSAGE: &str = "New entry was successfully posted. Thanks.";

/// Render a page with the session's pending flashes and current user.
///
/// Flashes and `error` are server-generated text and are inserted
/// unescaped; everything in `ctx` goes through auto-escaping.
async fn render_page(
    state: &SharedState,
    session: &SessionId,
    template: &str,
    error: Option<&str>,
    ctx: Value,
) -> Result<Html<String>> {
    let flashes: Vec<Value> = state
        .sessions
        .take_flashes(session.as_str())
        .await
        .into_iter()
        .map(Value::from_safe_string)
        .collect();
    let current_user = state.sessions.current_user(session.as_str()).await;
    let error = error.map(|e| Value::from_safe_string(e.to_string()));

    let html = state.templates.render(
        template,
        context! {
            flashes => flashes,
            error => error,
            current_user => current_user,
            ..ctx
        },
    )?;
    Ok(Html(html))
}

async fn render_login(
    state: &SharedState,
    session: &SessionId,
    form: &LoginForm,
    error: Option<&str>,
) -> Result<Html<String>> {
    render_page(state, session, "login.html", error, context! { form => form }).await
}

async fn render_register(
    state: &SharedState,
    session: &SessionId,
    form: &RegisterForm,
    errors: &FormErrors,
    error: Option<&str>,
) -> Result<Html<String>> {
    render_page(
        state,
        session,
        "register.html",
        error,
        context! { form => form, errors => errors },
    )
    .await
}

/// Login page
pub async fn login_page(
    State(state): State<SharedState>,
    Extension(session): Extension<SessionId>,
) -> Result<Html<String>> {
    render_login(&state, &session, &LoginForm::default(), None).await
}

/// Login form submission
pub async fn login(
    State(state): State<SharedState>,
    Extension(session): Extension<SessionId>,
    Form(form): Form<LoginForm>,
) -> Result<Response> {
    let invalid = Error::InvalidCredentials.to_string();

    if !form.is_complete() {
        let page = render_login(&state, &session, &form, Some(&invalid)).await?;
        return Ok(page.into_response());
    }

    match auth::authenticate(&state.db, form.name.trim(), &form.password).await {
        Ok(user) => {
            let session_id = state
                .sessions
                .login(session.as_str(), SessionUser::from(&user))
                .await;
            state.sessions.flash(&session_id, WELCOME_MESSAGE).await;
            tracing::info!(user_id = user.id, name = %user.name, "User logged in");
            Ok((Extension(SessionId(session_id)), Redirect::to("/tasks/")).into_response())
        }
        Err(Error::InvalidCredentials) => {
            tracing::warn!("Rejected login attempt");
            let page = render_login(&state, &session, &form, Some(&invalid)).await?;
            Ok(page.into_response())
        }
        Err(e) => Err(e),
    }
}

/// Registration page
pub async fn register_page(
    State(state): State<SharedState>,
    Extension(session): Extension<SessionId>,
) -> Result<Html<String>> {
    let form = RegisterForm::default();
    render_register(&state, &session, &form, &FormErrors::default(), None).await
}

/// Registration form submission
pub async fn register(
    State(state): State<SharedState>,
    Extension(session): Extension<SessionId>,
    Form(form): Form<RegisterForm>,
) -> Result<Response> {
    if let Err(errors) = form.validate() {
        let page = render_register(&state, &session, &form, &errors, None).await?;
        return Ok(page.into_response());
    }

    let created = auth::create_user(
        &state.db,
        &state.config.security,
        form.name.trim(),
        form.email.trim(),
        &form.password,
        None,
    )
    .await;

    match created {
        Ok(_) => {
            state.sessions.flash(session.as_str(), REGISTERED_MESSAGE).await;
            Ok(Redirect::to("/").into_response())
        }
        Err(Error::DuplicateUser) => {
            tracing::warn!(name = %form.name.trim(), "Registration rejected: duplicate user");
            let message = Error::DuplicateUser.to_string();
            let errors = FormErrors::default();
            let page = render_register(&state, &session, &form, &errors, Some(&message)).await?;
            Ok(page.into_response())
        }
        Err(e) => Err(e),
    }
}

/// Logout; mounted behind the login-required guard
pub async fn logout(
    State(state): State<SharedState>,
    Extension(session): Extension<SessionId>,
) -> Response {
    if let Some(user) = state.sessions.logout(session.as_str()).await {
        tracing::info!(user_id = user.id, name = %user.name, "User logged out");
        state.sessions.flash(session.as_str(), GOODBYE_MESSAGE).await;
    }
    Redirect::to("/").into_response()
}

/// Task list page
pub async fn tasks(
    State(state): State<SharedState>,
    Extension(session): Extension<SessionId>,
) -> Result<Response> {
    let Some(user) = state.sessions.current_user(session.as_str()).await else {
        return Ok(Redirect::to("/").into_response());
    };

    let open_tasks = tasks::tasks_for_user(state.db.pool(), user.id, TaskStatus::Open).await?;
    let closed_tasks =
        tasks::tasks_for_user(state.db.pool(), user.id, TaskStatus::Closed).await?;

    let page = render_page(
        &state,
        &session,
        "tasks.html",
        None,
        context! { open_tasks => open_tasks, closed_tasks => closed_tasks },
    )
    .await?;
    Ok(page.into_response())
}

/// Task form submission
pub async fn add_task(
    State(state): State<SharedState>,
    Extension(session): Extension<SessionId>,
    Form(form): Form<TaskForm>,
) -> Result<Response> {
    let Some(user) = state.sessions.current_user(session.as_str()).await else {
        return Ok(Redirect::to("/").into_response());
    };

    let today = chrono::Utc::now().date_naive();
    match form.validate(today) {
        Ok(valid) => {
            let task_id = tasks::insert_task(
                state.db.pool(),
                &NewTask {
                    name: valid.name,
                    due_date: valid.due_date,
                    priority: valid.priority,
                    posted_date: valid.posted_date,
                    status: valid.status,
                    user_id: user.id,
                },
            )
            .await?;
            tracing::info!(task_id, user_id = user.id, "Task created");
            state.sessions.flash(session.as_str(), TASK_ADDED_MESSAGE).await;
        }
        Err(errors) => {
            for message in forms::task_error_messages(&errors) {
                state.sessions.flash(session.as_str(), message).await;
            }
        }
    }

    Ok(Redirect::to("/tasks/").into_response())
}
