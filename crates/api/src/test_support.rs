//! Router harness over the in-memory repositories.

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use petcare_core::StorageService;
use petcare_core::testing::{Fixture, TEST_BASE_URL};
use petcare_shared::{JwtConfig, JwtService, Role};
use serde_json::Value;
use tower::ServiceExt;

use crate::{AppState, Repositories, create_router};

pub(crate) const BOUNDARY: &str = "petcare-test-boundary";

pub(crate) struct TestApp {
    pub fixture: Fixture,
    pub state: AppState,
}

impl TestApp {
    pub fn new() -> Self {
        Self::from_fixture(Fixture::new())
    }

    pub fn with_storage(storage: StorageService) -> Self {
        Self::from_fixture(Fixture::with_storage(storage))
    }

    fn from_fixture(fixture: Fixture) -> Self {
        let db = fixture.db.clone();
        let repos = Repositories {
            media: db.clone(),
            pets: db.clone(),
            posts: db.clone(),
            appointments: db.clone(),
            customers: db.clone(),
            employees: db,
        };
        let jwt = Arc::new(JwtService::new(JwtConfig {
            secret: "router-test-secret".to_string(),
            access_token_expires_minutes: 15,
        }));
        let state = AppState::new(jwt, fixture.storage.clone(), repos, TEST_BASE_URL);
        Self { fixture, state }
    }

    pub fn router(&self) -> Router {
        create_router(self.state.clone())
    }

    pub fn token(&self, user_id: i32, role: Role) -> String {
        self.state
            .jwt_service
            .generate_access_token(user_id, role)
            .expect("should generate token")
    }

    pub fn bearer(&self, user_id: i32, role: Role) -> String {
        format!("Bearer {}", self.token(user_id, role))
    }

    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }
}

/// A file part for [`multipart_body`].
pub(crate) struct FilePart<'a> {
    pub field: &'a str,
    pub filename: &'a str,
    pub content_type: &'a str,
    pub data: &'a [u8],
}

impl<'a> FilePart<'a> {
    pub fn png(field: &'a str, filename: &'a str) -> Self {
        Self {
            field,
            filename,
            content_type: "image/png",
            data: b"\x89PNG\r\n\x1a\n",
        }
    }
}

pub(crate) fn multipart_content_type() -> String {
    format!("multipart/form-data; boundary={BOUNDARY}")
}

pub(crate) fn multipart_body(fields: &[(&str, &str)], file: Option<FilePart<'_>>) -> Body {
    multipart_body_with_files(fields, file.as_slice())
}

pub(crate) fn multipart_body_with_files(fields: &[(&str, &str)], files: &[FilePart<'_>]) -> Body {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    for file in files {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: {}\r\n\r\n",
                file.field, file.filename, file.content_type
            )
            .as_bytes(),
        );
        body.extend_from_slice(file.data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    Body::from(body)
}
