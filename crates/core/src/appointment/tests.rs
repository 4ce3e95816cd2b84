use serde_json::json;

use super::*;
use crate::resource::{ListQuery, OwnerContext, ResourceError};
use crate::testing::Fixture;
use crate::validation::FormFields;

fn fields(value: serde_json::Value) -> FormFields {
    value.as_object().cloned().unwrap_or_default()
}

fn service(fx: &Fixture) -> AppointmentService {
    AppointmentService::new(fx.db.clone(), fx.db.clone())
}

#[tokio::test]
async fn test_create_for_own_pet() {
    let fx = Fixture::new();
    let owner = fx.db.seed_customer("Lia", "lia@petcare.test");
    let pet = fx.db.seed_pet("Rex", owner.id);

    let appointment = service(&fx)
        .create(
            OwnerContext::new(owner.id),
            &fields(json!({"pet_id": pet.id.to_string(), "date": "2999-01-01T10:00:00Z", "service": "grooming"})),
        )
        .await
        .unwrap();

    assert_eq!(appointment.pet_id, pet.id);
    assert_eq!(appointment.customer_id, owner.id);
    assert_eq!(appointment.service.as_deref(), Some("grooming"));
}

#[tokio::test]
async fn test_numeric_pet_id_accepted() {
    let fx = Fixture::new();
    let pet = fx.db.seed_pet("Rex", 5);

    let appointment = service(&fx)
        .create(
            OwnerContext::new(5),
            &fields(json!({"pet_id": pet.id, "date": "2999-01-01T10:00:00+02:00"})),
        )
        .await
        .unwrap();

    assert_eq!(appointment.date.to_rfc3339(), "2999-01-01T08:00:00+00:00");
}

#[tokio::test]
async fn test_foreign_pet_is_not_found() {
    let fx = Fixture::new();
    let pet = fx.db.seed_pet("Rex", 5);

    let err = service(&fx)
        .create(
            OwnerContext::new(6),
            &fields(json!({"pet_id": pet.id, "date": "2999-01-01T10:00:00Z"})),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, ResourceError::NotFound("Pet")));
}

#[tokio::test]
async fn test_rejects_bad_dates() {
    let fx = Fixture::new();
    let pet = fx.db.seed_pet("Rex", 5);
    let appointments = service(&fx);

    let past = appointments
        .create(
            OwnerContext::new(5),
            &fields(json!({"pet_id": pet.id, "date": "2000-01-01T10:00:00Z"})),
        )
        .await
        .unwrap_err();
    let garbage = appointments
        .create(
            OwnerContext::new(5),
            &fields(json!({"pet_id": pet.id, "date": "next tuesday"})),
        )
        .await
        .unwrap_err();
    let missing = appointments
        .create(OwnerContext::new(5), &FormFields::new())
        .await
        .unwrap_err();

    assert_eq!(past.to_string(), "date must not be in the past");
    assert_eq!(garbage.to_string(), "date must be a valid RFC 3339 date");
    assert_eq!(
        missing.to_string(),
        "date is a required field. pet_id is a required field"
    );
}

#[tokio::test]
async fn test_update_and_delete_scoped_to_owner() {
    let fx = Fixture::new();
    let pet = fx.db.seed_pet("Rex", 5);
    let appointments = service(&fx);
    let booked = appointments
        .create(
            OwnerContext::new(5),
            &fields(json!({"pet_id": pet.id, "date": "2999-01-01T10:00:00Z"})),
        )
        .await
        .unwrap();

    let moved = appointments
        .update(
            OwnerContext::new(5),
            booked.id,
            &fields(json!({"pet_id": pet.id, "date": "2999-02-01T10:00:00Z"})),
        )
        .await
        .unwrap();
    assert_eq!(moved.date.to_rfc3339(), "2999-02-01T10:00:00+00:00");

    let foreign = appointments
        .delete(OwnerContext::new(6), booked.id)
        .await
        .unwrap_err();
    assert!(matches!(foreign, ResourceError::NotFound("Appointment")));

    appointments.delete(OwnerContext::new(5), booked.id).await.unwrap();
    let remaining = appointments.list(ListQuery::default()).await.unwrap();
    assert!(remaining.is_empty());
}
