//! In-process harness: full router over an in-memory database

#![allow(dead_code)]

use axum::Router;
use axum::body::Body;
use http::{Method, Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use eventia_server::{Config, ServerState, build_app};

pub const ADMIN_EMAIL: &str = "admin@eventia.test";
pub const ADMIN_PASSWORD: &str = "admin-password-1";

pub struct TestApp {
    pub state: ServerState,
    pub router: Router,
}

impl TestApp {
    /// Fresh database with the seeded permissions, `Admin` role and admin user
    pub async fn new() -> Self {
        let mut config = Config::for_tests();
        config.admin_email = Some(ADMIN_EMAIL.into());
        config.admin_password = Some(ADMIN_PASSWORD.into());

        let state = ServerState::in_memory(config).await.unwrap();
        let router = build_app(&state).with_state(state.clone());
        Self { state, router }
    }

    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    pub async fn get(&self, uri: &str, token: &str) -> (StatusCode, Value) {
        self.send(Method::GET, uri, Some(token), None).await
    }

    pub async fn post(&self, uri: &str, token: &str, body: Value) -> (StatusCode, Value) {
        self.send(Method::POST, uri, Some(token), Some(body)).await
    }

    pub async fn login(&self, email: &str, password: &str) -> (StatusCode, Value) {
        self.send(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({ "email": email, "password": password })),
        )
        .await
    }

    pub async fn admin_token(&self) -> String {
        let (status, body) = self.login(ADMIN_EMAIL, ADMIN_PASSWORD).await;
        assert_eq!(status, StatusCode::OK, "admin login failed: {body}");
        body["token"].as_str().unwrap().to_string()
    }

    /// Id of a permission by key
    pub async fn permission_id(&self, token: &str, key: &str) -> i64 {
        let (_, list) = self.get("/api/security/permissions", token).await;
        list.as_array()
            .unwrap()
            .iter()
            .find(|p| p["key"] == key)
            .and_then(|p| p["id"].as_i64())
            .unwrap()
    }

    pub async fn create_role(&self, token: &str, name: &str) -> i64 {
        let (status, role) = self
            .post("/api/security/roles", token, json!({ "name": name }))
            .await;
        assert_eq!(status, StatusCode::OK, "{role}");
        role["id"].as_i64().unwrap()
    }

    pub async fn create_user(&self, token: &str, name: &str, email: &str, password: &str) -> i64 {
        let (status, user) = self
            .post(
                "/api/users",
                token,
                json!({ "name": name, "email": email, "password": password }),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "{user}");
        user["id"].as_i64().unwrap()
    }

    /// Audit rows for one entity, newest first
    pub async fn audit_for(&self, token: &str, entity_type: &str, id: i64) -> Vec<Value> {
        let (status, rows) = self
            .get(&format!("/api/audit/entity/{entity_type}/{id}"), token)
            .await;
        assert_eq!(status, StatusCode::OK);
        rows.as_array().unwrap().clone()
    }
}

pub fn error_code(body: &Value) -> u64 {
    body["code"].as_u64().unwrap()
}
