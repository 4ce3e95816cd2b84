//! Role guards, layered inside `auth_middleware`.

use axum::{
    Json,
    extract::Request,
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};
use petcare_shared::{Claims, Role};
use serde_json::json;

/// Lets employees and admins through.
pub async fn require_staff(request: Request, next: Next) -> Response {
    guard(request, next, Role::is_staff, "Employee role required").await
}

/// Lets admins through.
pub async fn require_admin(request: Request, next: Next) -> Response {
    guard(request, next, |role| *role == Role::Admin, "Admin role required").await
}

async fn guard(
    request: Request,
    next: Next,
    allowed: impl Fn(&Role) -> bool,
    message: &'static str,
) -> Response {
    let role = request.extensions().get::<Claims>().map(|c| c.role);
    match role {
        Some(role) if allowed(&role) => next.run(request).await,
        Some(_) => (
            StatusCode::FORBIDDEN,
            Json(json!({ "error": "forbidden", "message": message })),
        )
            .into_response(),
        None => (
            StatusCode::UNAUTHORIZED,
            Json(json!({
                "error": "unauthorized",
                "message": "Authentication required"
            })),
        )
            .into_response(),
    }
}
