//! Customer repository for database operations.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Unchanged, ColumnTrait, DatabaseConnection, EntityTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};

use super::{db_err, direction, now, to_media, updated};
use crate::entities::{customers, files};
use petcare_core::customer::{
    Customer, CustomerChanges, CustomerRepository as CustomerRepoTrait, NewCustomer,
};
use petcare_core::resource::{ListParams, RepositoryError, WithMedia};

/// Customer repository implementation.
#[derive(Debug, Clone)]
pub struct CustomerRepository {
    db: DatabaseConnection,
}

impl CustomerRepository {
    /// Create a new customer repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CustomerRepoTrait for CustomerRepository {
    async fn create(&self, input: NewCustomer) -> Result<Customer, RepositoryError> {
        let now = now();
        let model = customers::ActiveModel {
            name: Set(input.name),
            email: Set(input.email),
            phone: Set(input.phone),
            avatar_id: Set(input.avatar_id),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(db_err)?;

        Ok(to_domain(model))
    }

    async fn find_with_avatar(
        &self,
        id: i32,
    ) -> Result<Option<WithMedia<Customer>>, RepositoryError> {
        let row = customers::Entity::find_by_id(id)
            .find_also_related(files::Entity)
            .one(&self.db)
            .await
            .map_err(db_err)?;

        Ok(row.map(with_avatar))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Customer>, RepositoryError> {
        let model = customers::Entity::find()
            .filter(customers::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(db_err)?;

        Ok(model.map(to_domain))
    }

    async fn list(&self, params: &ListParams) -> Result<Vec<WithMedia<Customer>>, RepositoryError> {
        let rows = customers::Entity::find()
            .find_also_related(files::Entity)
            .order_by(customers::Column::CreatedAt, direction(params.order))
            .order_by(customers::Column::Id, direction(params.order))
            .offset(params.page.offset())
            .limit(params.page.limit())
            .all(&self.db)
            .await
            .map_err(db_err)?;

        Ok(rows.into_iter().map(with_avatar).collect())
    }

    async fn update(
        &self,
        id: i32,
        changes: CustomerChanges,
    ) -> Result<Option<Customer>, RepositoryError> {
        let result = customers::ActiveModel {
            id: Unchanged(id),
            name: Set(changes.name),
            email: Set(changes.email),
            phone: Set(changes.phone),
            updated_at: Set(now()),
            ..Default::default()
        }
        .update(&self.db)
        .await;

        Ok(updated(result)?.map(to_domain))
    }

    async fn delete(&self, id: i32) -> Result<bool, RepositoryError> {
        let result = customers::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(db_err)?;

        Ok(result.rows_affected > 0)
    }
}

fn with_avatar((customer, avatar): (customers::Model, Option<files::Model>)) -> WithMedia<Customer> {
    WithMedia::new(to_domain(customer), avatar.map(to_media))
}

/// Convert database model to domain model.
fn to_domain(model: customers::Model) -> Customer {
    Customer {
        id: model.id,
        name: model.name,
        email: model.email,
        phone: model.phone,
        avatar_id: model.avatar_id,
        created_at: model.created_at.with_timezone(&chrono::Utc),
        updated_at: model.updated_at.with_timezone(&chrono::Utc),
    }
}
