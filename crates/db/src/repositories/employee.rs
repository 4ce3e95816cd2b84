//! Employee repository for database operations.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Unchanged, ColumnTrait, DatabaseConnection, EntityTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};

use super::{db_err, direction, now, to_media, updated};
use crate::entities::{employees, files};
use petcare_core::employee::{
    Employee, EmployeeChanges, EmployeeRepository as EmployeeRepoTrait, NewEmployee,
};
use petcare_core::resource::{ListParams, RepositoryError, WithMedia};
use petcare_shared::Role;

/// Employee repository implementation.
#[derive(Debug, Clone)]
pub struct EmployeeRepository {
    db: DatabaseConnection,
}

impl EmployeeRepository {
    /// Create a new employee repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl EmployeeRepoTrait for EmployeeRepository {
    async fn create(&self, input: NewEmployee) -> Result<Employee, RepositoryError> {
        let now = now();
        let model = employees::ActiveModel {
            name: Set(input.name),
            email: Set(input.email),
            phone: Set(input.phone),
            role: Set(input.role.as_str().to_string()),
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
    ) -> Result<Option<WithMedia<Employee>>, RepositoryError> {
        let row = employees::Entity::find_by_id(id)
            .find_also_related(files::Entity)
            .one(&self.db)
            .await
            .map_err(db_err)?;

        Ok(row.map(with_avatar))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Employee>, RepositoryError> {
        let model = employees::Entity::find()
            .filter(employees::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(db_err)?;

        Ok(model.map(to_domain))
    }

    async fn list(&self, params: &ListParams) -> Result<Vec<WithMedia<Employee>>, RepositoryError> {
        let rows = employees::Entity::find()
            .find_also_related(files::Entity)
            .order_by(employees::Column::CreatedAt, direction(params.order))
            .order_by(employees::Column::Id, direction(params.order))
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
        changes: EmployeeChanges,
    ) -> Result<Option<Employee>, RepositoryError> {
        let result = employees::ActiveModel {
            id: Unchanged(id),
            name: Set(changes.name),
            email: Set(changes.email),
            phone: Set(changes.phone),
            role: Set(changes.role.as_str().to_string()),
            updated_at: Set(now()),
            ..Default::default()
        }
        .update(&self.db)
        .await;

        Ok(updated(result)?.map(to_domain))
    }

    async fn delete(&self, id: i32) -> Result<bool, RepositoryError> {
        let result = employees::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(db_err)?;

        Ok(result.rows_affected > 0)
    }
}

fn with_avatar((employee, avatar): (employees::Model, Option<files::Model>)) -> WithMedia<Employee> {
    WithMedia::new(to_domain(employee), avatar.map(to_media))
}

/// Convert database model to domain model. The `role` column is
/// constrained to staff roles.
fn to_domain(model: employees::Model) -> Employee {
    Employee {
        id: model.id,
        name: model.name,
        email: model.email,
        phone: model.phone,
        role: Role::parse(&model.role).unwrap_or(Role::Employee),
        avatar_id: model.avatar_id,
        created_at: model.created_at.with_timezone(&chrono::Utc),
        updated_at: model.updated_at.with_timezone(&chrono::Utc),
    }
}
