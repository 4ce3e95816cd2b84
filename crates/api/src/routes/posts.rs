//! Company posts and the public feed.
//!
//! Posts belong to the employee whose token published them.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, post, put},
};
use petcare_core::OwnerContext;
use petcare_core::post::PostView;

use crate::AppState;
use crate::error::ApiError;
use crate::extractors::{Listing, Midia, ResourceId, UploadForm};
use crate::middleware::AuthUser;

fn author(auth: &AuthUser) -> OwnerContext {
    OwnerContext::new(auth.user_id())
}

// ============================================================================
// Route Handlers
// ============================================================================

/// GET `/posts?page=&order=&u=`
async fn list_posts(
    State(state): State<AppState>,
    Listing(query): Listing,
) -> Result<Json<Vec<PostView>>, ApiError> {
    Ok(Json(state.posts.list(query).await?))
}

/// POST `/company/post`
/// Multipart `title?` and an optional `midia` file; at least one is required.
async fn create_post(
    State(state): State<AppState>,
    auth: AuthUser,
    UploadForm(submission, _): UploadForm<Midia>,
) -> Result<Json<PostView>, ApiError> {
    Ok(Json(state.posts.create(author(&auth), submission).await?))
}

/// PUT `/company/post/{id}`
async fn update_post(
    State(state): State<AppState>,
    auth: AuthUser,
    ResourceId(id): ResourceId,
    UploadForm(submission, _): UploadForm<Midia>,
) -> Result<Json<PostView>, ApiError> {
    Ok(Json(state.posts.update(author(&auth), id, submission).await?))
}

/// DELETE `/company/post/{id}`
async fn delete_post(
    State(state): State<AppState>,
    auth: AuthUser,
    ResourceId(id): ResourceId,
) -> Result<StatusCode, ApiError> {
    state.posts.delete(author(&auth), id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// Router
// ============================================================================

/// Feed readable by any signed-in account.
pub fn feed_routes() -> Router<AppState> {
    Router::new()
        .route("/posts", get(list_posts))
        .route("/company/post", get(list_posts))
}

/// Publishing for company staff.
pub fn company_routes() -> Router<AppState> {
    Router::new()
        .route("/company/post", post(create_post))
        .route("/company/post/{id}", put(update_post).delete(delete_post))
}

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{
            Request, StatusCode,
            header::{AUTHORIZATION, CONTENT_TYPE},
        },
    };
    use petcare_core::testing::Table;
    use petcare_shared::Role;

    use crate::test_support::{FilePart, TestApp, multipart_body, multipart_content_type};

    fn upload(
        app: &TestApp,
        method: &str,
        uri: &str,
        employee_id: i32,
        fields: &[(&str, &str)],
        file: Option<FilePart<'_>>,
    ) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(AUTHORIZATION, app.bearer(employee_id, Role::Employee))
            .header(CONTENT_TYPE, multipart_content_type())
            .body(multipart_body(fields, file))
            .unwrap()
    }

    #[tokio::test]
    async fn test_publish_with_author() {
        let app = TestApp::new();
        let bia = app.fixture.db.seed_employee("Bia", "bia@petcare.io", Role::Employee);

        let request = upload(
            &app,
            "POST",
            "/company/post",
            bia.id,
            &[("title", "Vaccination week")],
            Some(FilePart::png("midia", "banner.png")),
        );
        let (status, body) = app.send(request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["title"], "Vaccination week");
        assert_eq!(body["employee_id"], bia.id);
        assert_eq!(body["employee"]["name"], "Bia");
        assert!(body["midia"]["url"].is_string());
    }

    #[tokio::test]
    async fn test_avatar_field_is_not_a_post_attachment() {
        let app = TestApp::new();
        let bia = app.fixture.db.seed_employee("Bia", "bia@petcare.io", Role::Employee);

        let request = upload(
            &app,
            "POST",
            "/company/post",
            bia.id,
            &[("title", "Vaccination week")],
            Some(FilePart::png("avatar", "banner.png")),
        );
        let (status, body) = app.send(request).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "validation_error");
        assert_eq!(app.fixture.db.post_count(), 0);
        assert_eq!(app.fixture.db.media_count(), 0);
    }

    #[tokio::test]
    async fn test_post_needs_content() {
        let app = TestApp::new();

        let request = upload(&app, "POST", "/company/post", 1, &[("title", "  ")], None);
        let (status, body) = app.send(request).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "no_content");
        assert_eq!(app.fixture.db.post_count(), 0);
    }

    #[tokio::test]
    async fn test_replace_midia_reclaims_old_file() {
        let app = TestApp::new();
        let bia = app.fixture.db.seed_employee("Bia", "bia@petcare.io", Role::Employee);

        let (_, created) = app
            .send(upload(
                &app,
                "POST",
                "/company/post",
                bia.id,
                &[("title", "Adoption fair")],
                Some(FilePart::png("midia", "old.png")),
            ))
            .await;
        let old_path = created["midia"]["path"].as_str().unwrap().to_string();

        let (status, updated) = app
            .send(upload(
                &app,
                "PUT",
                &format!("/company/post/{}", created["id"]),
                bia.id,
                &[],
                Some(FilePart::png("midia", "new.png")),
            ))
            .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["title"], "Adoption fair");
        let new_path = updated["midia"]["path"].as_str().unwrap();
        assert_ne!(new_path, old_path);
        assert!(app.fixture.stored(new_path).await);
        assert!(!app.fixture.stored(&old_path).await);
        assert_eq!(app.fixture.db.media_count(), 1);
    }

    #[tokio::test]
    async fn test_failed_update_reclaims_new_file() {
        let app = TestApp::new();
        let bia = app.fixture.db.seed_employee("Bia", "bia@petcare.io", Role::Employee);

        let (_, created) = app
            .send(upload(
                &app,
                "POST",
                "/company/post",
                bia.id,
                &[("title", "Adoption fair")],
                Some(FilePart::png("midia", "old.png")),
            ))
            .await;
        let old_path = created["midia"]["path"].as_str().unwrap().to_string();

        app.fixture.db.set_failing(Table::Posts, true);
        let (status, _) = app
            .send(upload(
                &app,
                "PUT",
                &format!("/company/post/{}", created["id"]),
                bia.id,
                &[],
                Some(FilePart::png("midia", "new.png")),
            ))
            .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(app.fixture.stored(&old_path).await);
        assert_eq!(app.fixture.db.media_count(), 1);
    }

    #[tokio::test]
    async fn test_only_author_deletes() {
        let app = TestApp::new();
        let bia = app.fixture.db.seed_employee("Bia", "bia@petcare.io", Role::Employee);

        let (_, created) = app
            .send(upload(&app, "POST", "/company/post", bia.id, &[("title", "Hello")], None))
            .await;

        let delete = |employee_id: i32| {
            Request::builder()
                .method("DELETE")
                .uri(format!("/company/post/{}", created["id"]))
                .header(AUTHORIZATION, app.bearer(employee_id, Role::Employee))
                .body(Body::empty())
                .unwrap()
        };

        let (status, _) = app.send(delete(bia.id + 100)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = app.send(delete(bia.id)).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        assert_eq!(app.fixture.db.post_count(), 0);
    }

    #[tokio::test]
    async fn test_feed_open_to_customers() {
        let app = TestApp::new();
        let bia = app.fixture.db.seed_employee("Bia", "bia@petcare.io", Role::Employee);
        app.send(upload(&app, "POST", "/company/post", bia.id, &[("title", "Hello")], None))
            .await;

        let feed = Request::builder()
            .method("GET")
            .uri(format!("/posts?u={}", bia.id))
            .header(AUTHORIZATION, app.bearer(42, Role::Customer))
            .body(Body::empty())
            .unwrap();
        let (status, body) = app.send(feed).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 1);
        assert_eq!(body[0]["title"], "Hello");
    }
}
