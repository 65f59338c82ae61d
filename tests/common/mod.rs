//! Shared test harness: an in-process HTTP client and per-test app setup
#![allow(dead_code)]

pub mod helpers;

use axum::{
    body::Body,
    http::{header, HeaderMap, Method, Request, StatusCode},
    Router,
};
use std::collections::BTreeMap;
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

use taskr::{create_router, AppState, Config, Database, SharedState};

pub const TEST_DB: &str = "test.db";
const MAX_REDIRECTS: usize = 10;

/// A response with its body read into a string
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl TestResponse {
    pub fn contains(&self, text: &str) -> bool {
        self.body.contains(text)
    }

    pub fn location(&self) -> Option<&str> {
        self.headers.get(header::LOCATION).and_then(|v| v.to_str().ok())
    }
}

/// Drives the router in-process, keeping cookies between requests like a browser
pub struct TestClient {
    router: Router,
    cookies: BTreeMap<String, String>,
}

impl TestClient {
    pub fn new(router: Router) -> Self {
        Self {
            router,
            cookies: BTreeMap::new(),
        }
    }

    pub fn cookie(&self, name: &str) -> Option<&str> {
        self.cookies.get(name).map(String::as_str)
    }

    pub async fn get(&mut self, path: &str) -> TestResponse {
        self.send(Method::GET, path, None).await
    }

    pub async fn get_follow(&mut self, path: &str) -> TestResponse {
        let response = self.get(path).await;
        self.follow_redirects(response).await
    }

    pub async fn post_form(&mut self, path: &str, fields: &[(&str, &str)]) -> TestResponse {
        self.send(Method::POST, path, Some(encode_form(fields))).await
    }

    pub async fn post_form_follow(&mut self, path: &str, fields: &[(&str, &str)]) -> TestResponse {
        let response = self.post_form(path, fields).await;
        self.follow_redirects(response).await
    }

    async fn follow_redirects(&mut self, mut response: TestResponse) -> TestResponse {
        for _ in 0..MAX_REDIRECTS {
            if !response.status.is_redirection() {
                return response;
            }
            let location = response
                .location()
                .expect("redirect without a Location header")
                .to_string();
            response = self.get(&location).await;
        }
        panic!("too many redirects");
    }

    async fn send(&mut self, method: Method, path: &str, form: Option<String>) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(path);

        if !self.cookies.is_empty() {
            let cookie = self
                .cookies
                .iter()
                .map(|(name, value)| format!("{}={}", name, value))
                .collect::<Vec<_>>()
                .join("; ");
            builder = builder.header(header::COOKIE, cookie);
        }

        let body = match form {
            Some(form) => {
                builder = builder.header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
                Body::from(form)
            }
            None => Body::empty(),
        };

        let request = builder.body(body).expect("valid request");
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");

        for value in response.headers().get_all(header::SET_COOKIE) {
            if let Some((name, value)) = value
                .to_str()
                .ok()
                .and_then(|cookie| cookie.split(';').next())
                .and_then(|pair| pair.split_once('='))
            {
                self.cookies.insert(name.trim().to_string(), value.trim().to_string());
            }
        }

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("readable body");

        TestResponse {
            status,
            headers,
            body: String::from_utf8_lossy(&bytes).into_owned(),
        }
    }
}

fn encode_form(fields: &[(&str, &str)]) -> String {
    fields
        .iter()
        .map(|(name, value)| {
            format!("{}={}", urlencoding::encode(name), urlencoding::encode(value))
        })
        .collect::<Vec<_>>()
        .join("&")
}

/// A fresh application with its own database file, created per test
pub struct TestApp {
    pub state: SharedState,
    pub client: TestClient,
    dir: TempDir,
}

impl TestApp {
    /// Create the database schema in a new temporary directory
    pub async fn setup() -> Self {
        let dir = TempDir::new().expect("temp dir");
        let config = Config::for_testing(dir.path().join(TEST_DB));
        let state = Arc::new(AppState::from_config(config).await.expect("app state"));
        state.db.create_all().await.expect("create tables");

        let client = TestClient::new(create_router(state.clone()));
        Self { state, client, dir }
    }

    pub fn db(&self) -> &Database {
        &self.state.db
    }

    /// A second browser against the same application
    pub fn new_client(&self) -> TestClient {
        TestClient::new(create_router(self.state.clone()))
    }

    /// Whether the default client's session is logged in
    pub async fn is_logged_in(&self) -> bool {
        match self.client.cookie(&self.state.config.session.cookie_name) {
            Some(id) => self.state.sessions.current_user(id).await.is_some(),
            None => false,
        }
    }

    /// Drop every table and remove the database file
    pub async fn teardown(self) {
        self.state.db.drop_all().await.expect("drop tables");
        self.state.db.close().await;
        self.dir.close().expect("remove temp dir");
    }
}
