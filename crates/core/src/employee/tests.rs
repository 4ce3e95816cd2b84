use serde_json::json;

use super::*;
use crate::post::PostService;
use crate::resource::{OwnerContext, ResourceError, Submission};
use crate::testing::Fixture;
use crate::validation::FormFields;
use petcare_shared::Role;

fn fields(value: serde_json::Value) -> FormFields {
    value.as_object().cloned().unwrap_or_default()
}

fn service(fx: &Fixture) -> EmployeeService {
    EmployeeService::new(fx.db.clone(), fx.db.clone(), fx.saga.clone())
}

#[tokio::test]
async fn test_create_defaults_to_employee_role() {
    let fx = Fixture::new();

    let employee = service(&fx)
        .create(Submission::multipart(
            fields(json!({"name": "Ana", "email": "ana@petcare.test"})),
            None,
        ))
        .await
        .unwrap();

    assert_eq!(employee.role, Role::Employee);
}

#[tokio::test]
async fn test_rejects_customer_role() {
    let fx = Fixture::new();
    let file = fx.stage("ana.png").await;
    let path = file.stored_path.clone();

    let err = service(&fx)
        .create(Submission::multipart(
            fields(json!({"name": "Ana", "email": "ana@petcare.test", "role": "customer"})),
            Some(file),
        ))
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "role must be one of employee, admin");
    assert!(!fx.stored(&path).await);
}

#[tokio::test]
async fn test_update_keeps_role_when_absent() {
    let fx = Fixture::new();
    let admin = fx.db.seed_employee("Root", "root@petcare.test", Role::Admin);

    let updated = service(&fx)
        .update(
            admin.id,
            &fields(json!({"name": "Root", "email": "root@petcare.test", "phone": "1"})),
        )
        .await
        .unwrap();

    assert_eq!(updated.role, Role::Admin);
    assert_eq!(updated.phone.as_deref(), Some("1"));
}

#[tokio::test]
async fn test_delete_reclaims_avatar_and_post_media() {
    let fx = Fixture::new();
    let employees = service(&fx);
    let posts = PostService::new(fx.db.clone(), fx.saga.clone());

    let avatar = fx.stage("ana.png").await;
    let avatar_path = avatar.stored_path.clone();
    let employee = employees
        .create(Submission::multipart(
            fields(json!({"name": "Ana", "email": "ana@petcare.test"})),
            Some(avatar),
        ))
        .await
        .unwrap();

    let midia = fx.stage("bath.png").await;
    let midia_path = midia.stored_path.clone();
    posts
        .create(
            OwnerContext::new(employee.id),
            Submission::multipart(FormFields::new(), Some(midia)),
        )
        .await
        .unwrap();

    // Spawned like a router handler, so the future must be `Send`.
    let id = employee.id;
    tokio::spawn(async move { employees.delete(id).await })
        .await
        .unwrap()
        .unwrap();

    assert_eq!(fx.db.post_count(), 0);
    assert_eq!(fx.db.media_count(), 0);
    assert!(!fx.stored(&avatar_path).await);
    assert!(!fx.stored(&midia_path).await);
}

#[tokio::test]
async fn test_missing_employee() {
    let fx = Fixture::new();
    assert!(matches!(
        service(&fx).show(1).await,
        Err(ResourceError::NotFound("Employee"))
    ));
}
