use serde_json::json;

use super::*;
use crate::resource::{ListQuery, OwnerContext, ResourceError, Submission};
use crate::testing::{Fixture, Table};
use crate::validation::FormFields;
use petcare_shared::Role;

fn titled(title: &str) -> FormFields {
    json!({ "title": title }).as_object().cloned().unwrap_or_default()
}

fn service(fx: &Fixture) -> PostService {
    PostService::new(fx.db.clone(), fx.saga.clone())
}

#[tokio::test]
async fn test_create_includes_author_and_media() {
    let fx = Fixture::new();
    let author = fx.db.seed_employee("Ana", "ana@petcare.test", Role::Employee);
    let file = fx.stage("bath.png").await;

    let post = service(&fx)
        .create(
            OwnerContext::new(author.id),
            Submission::multipart(titled("Bath day"), Some(file)),
        )
        .await
        .unwrap();

    assert_eq!(post.title.as_deref(), Some("Bath day"));
    assert_eq!(post.employee_id, author.id);
    assert!(post.midia.is_some());
    let employee = post.employee.expect("author loaded");
    assert_eq!(employee.name, "Ana");
    assert!(employee.avatar.is_none());
}

#[tokio::test]
async fn test_create_media_only() {
    let fx = Fixture::new();
    let file = fx.stage("bath.png").await;

    let post = service(&fx)
        .create(
            OwnerContext::new(3),
            Submission::multipart(FormFields::new(), Some(file)),
        )
        .await
        .unwrap();

    assert!(post.title.is_none());
    assert!(post.midia_id.is_some());
}

#[tokio::test]
async fn test_create_without_content() {
    let fx = Fixture::new();

    let err = service(&fx)
        .create(
            OwnerContext::new(3),
            Submission::multipart(titled("   "), None),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, ResourceError::NoContent));
    assert_eq!(fx.db.post_count(), 0);
}

#[tokio::test]
async fn test_create_failure_reclaims_midia() {
    let fx = Fixture::new();
    fx.db.set_failing(Table::Posts, true);
    let file = fx.stage("bath.png").await;
    let path = file.stored_path.clone();

    let err = service(&fx)
        .create(
            OwnerContext::new(3),
            Submission::multipart(titled("Bath day"), Some(file)),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, ResourceError::Persistence(_)));
    assert_eq!(fx.db.media_count(), 0);
    assert!(!fx.stored(&path).await);
}

#[tokio::test]
async fn test_update_swaps_midia() {
    let fx = Fixture::new();
    let posts = service(&fx);
    let old = fx.stage("old.png").await;
    let old_path = old.stored_path.clone();
    let post = posts
        .create(OwnerContext::new(3), Submission::multipart(titled("v1"), Some(old)))
        .await
        .unwrap();

    let new = fx.stage("new.png").await;
    let new_path = new.stored_path.clone();
    let updated = posts
        .update(
            OwnerContext::new(3),
            post.id,
            Submission::multipart(FormFields::new(), Some(new)),
        )
        .await
        .unwrap();

    assert_eq!(updated.title.as_deref(), Some("v1"));
    assert_eq!(updated.midia.map(|m| m.path), Some(new_path.clone()));
    assert_eq!(fx.db.media_count(), 1);
    assert!(!fx.stored(&old_path).await);
    assert!(fx.stored(&new_path).await);
}

#[tokio::test]
async fn test_failed_update_keeps_old_midia() {
    let fx = Fixture::new();
    let posts = service(&fx);
    let old = fx.stage("old.png").await;
    let old_path = old.stored_path.clone();
    let post = posts
        .create(OwnerContext::new(3), Submission::multipart(titled("v1"), Some(old)))
        .await
        .unwrap();

    fx.db.set_failing(Table::Posts, true);
    let new = fx.stage("new.png").await;
    let new_path = new.stored_path.clone();
    let err = posts
        .update(
            OwnerContext::new(3),
            post.id,
            Submission::multipart(titled("v2"), Some(new)),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, ResourceError::Persistence(_)));
    assert_eq!(fx.db.media_count(), 1);
    assert!(fx.stored(&old_path).await);
    assert!(!fx.stored(&new_path).await);
}

#[tokio::test]
async fn test_update_by_other_author_discards_upload() {
    let fx = Fixture::new();
    let posts = service(&fx);
    let post = posts
        .create(OwnerContext::new(3), Submission::multipart(titled("v1"), None))
        .await
        .unwrap();

    let file = fx.stage("new.png").await;
    let path = file.stored_path.clone();
    let err = posts
        .update(
            OwnerContext::new(4),
            post.id,
            Submission::multipart(titled("v2"), Some(file)),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, ResourceError::NotFound("Post")));
    assert!(!fx.stored(&path).await);
}

#[tokio::test]
async fn test_delete_reclaims_midia() {
    let fx = Fixture::new();
    let posts = service(&fx);
    let file = fx.stage("bath.png").await;
    let path = file.stored_path.clone();
    let post = posts
        .create(OwnerContext::new(3), Submission::multipart(titled("v1"), Some(file)))
        .await
        .unwrap();

    posts.delete(OwnerContext::new(3), post.id).await.unwrap();

    assert_eq!(fx.db.post_count(), 0);
    assert_eq!(fx.db.media_count(), 0);
    assert!(!fx.stored(&path).await);
}

#[tokio::test]
async fn test_list_filters_by_author() {
    let fx = Fixture::new();
    let posts = service(&fx);
    for author in [3, 4, 3] {
        posts
            .create(OwnerContext::new(author), Submission::multipart(titled("hi"), None))
            .await
            .unwrap();
    }

    let all = posts.list(ListQuery::default()).await.unwrap();
    let mine = posts
        .list(ListQuery {
            owner: Some(3),
            ..ListQuery::default()
        })
        .await
        .unwrap();

    assert_eq!(all.len(), 3);
    assert_eq!(mine.len(), 2);
    assert!(mine.iter().all(|p| p.employee_id == 3));
}
