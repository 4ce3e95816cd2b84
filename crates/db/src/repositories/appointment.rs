//! Appointment repository for database operations.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Unchanged, ColumnTrait, DatabaseConnection, EntityTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};

use super::{db_err, direction, now, updated};
use crate::entities::appointments;
use petcare_core::appointment::{
    Appointment, AppointmentChanges, AppointmentRepository as AppointmentRepoTrait,
    NewAppointment,
};
use petcare_core::resource::{ListParams, RepositoryError};

/// Appointment repository implementation.
#[derive(Debug, Clone)]
pub struct AppointmentRepository {
    db: DatabaseConnection,
}

impl AppointmentRepository {
    /// Create a new appointment repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl AppointmentRepoTrait for AppointmentRepository {
    async fn create(&self, input: NewAppointment) -> Result<Appointment, RepositoryError> {
        let now = now();
        let model = appointments::ActiveModel {
            pet_id: Set(input.pet_id),
            customer_id: Set(input.customer_id),
            employee_id: Set(input.employee_id),
            date: Set(input.date.into()),
            service: Set(input.service),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(db_err)?;

        Ok(to_domain(model))
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Appointment>, RepositoryError> {
        let model = appointments::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;

        Ok(model.map(to_domain))
    }

    async fn list(&self, params: &ListParams) -> Result<Vec<Appointment>, RepositoryError> {
        let mut query = appointments::Entity::find();
        if let Some(customer) = params.owner {
            query = query.filter(appointments::Column::CustomerId.eq(customer));
        }

        let models = query
            .order_by(appointments::Column::CreatedAt, direction(params.order))
            .order_by(appointments::Column::Id, direction(params.order))
            .offset(params.page.offset())
            .limit(params.page.limit())
            .all(&self.db)
            .await
            .map_err(db_err)?;

        Ok(models.into_iter().map(to_domain).collect())
    }

    async fn update(
        &self,
        id: i32,
        changes: AppointmentChanges,
    ) -> Result<Option<Appointment>, RepositoryError> {
        let result = appointments::ActiveModel {
            id: Unchanged(id),
            pet_id: Set(changes.pet_id),
            employee_id: Set(changes.employee_id),
            date: Set(changes.date.into()),
            service: Set(changes.service),
            updated_at: Set(now()),
            ..Default::default()
        }
        .update(&self.db)
        .await;

        Ok(updated(result)?.map(to_domain))
    }

    async fn delete(&self, id: i32) -> Result<bool, RepositoryError> {
        let result = appointments::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(db_err)?;

        Ok(result.rows_affected > 0)
    }
}

/// Convert database model to domain model.
fn to_domain(model: appointments::Model) -> Appointment {
    Appointment {
        id: model.id,
        pet_id: model.pet_id,
        customer_id: model.customer_id,
        employee_id: model.employee_id,
        date: model.date.with_timezone(&chrono::Utc),
        service: model.service,
        created_at: model.created_at.with_timezone(&chrono::Utc),
        updated_at: model.updated_at.with_timezone(&chrono::Utc),
    }
}
