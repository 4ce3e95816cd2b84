use serde_json::json;

use super::*;
use crate::pet::PetService;
use crate::resource::{OwnerContext, ResourceError, Submission};
use crate::testing::{Fixture, Table};
use crate::validation::FormFields;

fn fields(value: serde_json::Value) -> FormFields {
    value.as_object().cloned().unwrap_or_default()
}

fn lia() -> FormFields {
    fields(json!({"name": "Lia", "email": "Lia@PetCare.test", "phone": "555-0100"}))
}

fn service(fx: &Fixture) -> CustomerService {
    CustomerService::new(fx.db.clone(), fx.db.clone(), fx.saga.clone())
}

#[tokio::test]
async fn test_register_with_avatar() {
    let fx = Fixture::new();
    let file = fx.stage("lia.png").await;

    let customer = service(&fx)
        .register(Submission::multipart(lia(), Some(file)))
        .await
        .unwrap();

    assert_eq!(customer.email, "lia@petcare.test");
    assert_eq!(customer.phone.as_deref(), Some("555-0100"));
    assert!(customer.avatar.is_some());
}

#[tokio::test]
async fn test_register_rejects_invalid_email_and_discards_upload() {
    let fx = Fixture::new();
    let file = fx.stage("lia.png").await;
    let path = file.stored_path.clone();

    let err = service(&fx)
        .register(Submission::multipart(
            fields(json!({"name": "Lia", "email": "not-an-email"})),
            Some(file),
        ))
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "email must be a valid email");
    assert!(!fx.stored(&path).await);
}

#[tokio::test]
async fn test_register_duplicate_email() {
    let fx = Fixture::new();
    fx.db.seed_customer("Lia", "lia@petcare.test");
    let file = fx.stage("lia.png").await;
    let path = file.stored_path.clone();

    let err = service(&fx)
        .register(Submission::multipart(lia(), Some(file)))
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "email is already in use");
    assert_eq!(fx.db.customer_count(), 1);
    assert!(!fx.stored(&path).await);
}

#[tokio::test]
async fn test_register_failure_reclaims_avatar() {
    let fx = Fixture::new();
    fx.db.set_failing(Table::Customers, true);
    let file = fx.stage("lia.png").await;
    let path = file.stored_path.clone();

    let err = service(&fx)
        .register(Submission::multipart(lia(), Some(file)))
        .await
        .unwrap_err();

    assert!(matches!(err, ResourceError::Persistence(_)));
    assert_eq!(fx.db.media_count(), 0);
    assert!(!fx.stored(&path).await);
}

#[tokio::test]
async fn test_update_keeps_own_email() {
    let fx = Fixture::new();
    let customers = service(&fx);
    let customer = customers
        .register(Submission::multipart(lia(), None))
        .await
        .unwrap();

    let updated = customers
        .update(
            customer.id,
            &fields(json!({"name": "Lia Souza", "email": "lia@petcare.test"})),
        )
        .await
        .unwrap();

    assert_eq!(updated.name, "Lia Souza");
    assert!(updated.phone.is_none());
}

#[tokio::test]
async fn test_delete_reclaims_own_and_pet_avatars() {
    let fx = Fixture::new();
    let customers = service(&fx);
    let pets = PetService::new(fx.db.clone(), fx.saga.clone());

    let own = fx.stage("lia.png").await;
    let own_path = own.stored_path.clone();
    let customer = customers
        .register(Submission::multipart(lia(), Some(own)))
        .await
        .unwrap();

    let pet_file = fx.stage("rex.png").await;
    let pet_path = pet_file.stored_path.clone();
    pets.create(
        Some(OwnerContext::new(customer.id)),
        Submission::multipart(
            fields(json!({"name": "Rex", "type": "dog", "sex": "M", "breed": "Lab"})),
            Some(pet_file),
        ),
    )
    .await
    .unwrap();

    // Spawned like a router handler, so the future must be `Send`.
    let id = customer.id;
    tokio::spawn(async move { customers.delete(id).await })
        .await
        .unwrap()
        .unwrap();

    assert_eq!(fx.db.customer_count(), 0);
    assert_eq!(fx.db.pet_count(), 0);
    assert_eq!(fx.db.media_count(), 0);
    assert!(!fx.stored(&own_path).await);
    assert!(!fx.stored(&pet_path).await);
}

#[tokio::test]
async fn test_missing_customer() {
    let fx = Fixture::new();
    let customers = service(&fx);

    assert!(matches!(
        customers.show(404).await,
        Err(ResourceError::NotFound("Customer"))
    ));
    assert!(matches!(
        customers.delete(404).await,
        Err(ResourceError::NotFound("Customer"))
    ));
}
