//! Employee repository seam and service.

use std::sync::Arc;

use async_trait::async_trait;
use petcare_shared::Role;
use tracing::info;

use super::types::{Employee, EmployeeChanges, EmployeePayload, EmployeeView, NewEmployee};
use crate::post::PostRepository;
use crate::resource::{
    ListParams, ListQuery, MediaSaga, RepositoryError, ResourceError, Submission, WithMedia,
};
use crate::validation::{FormFields, ValidationFailure, validate_payload};

/// Repository trait for employee persistence.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EmployeeRepository: Send + Sync {
    /// Insert an employee.
    async fn create(&self, input: NewEmployee) -> Result<Employee, RepositoryError>;

    /// Find an employee with its avatar.
    async fn find_with_avatar(
        &self,
        id: i32,
    ) -> Result<Option<WithMedia<Employee>>, RepositoryError>;

    /// Find an employee by email.
    async fn find_by_email(&self, email: &str) -> Result<Option<Employee>, RepositoryError>;

    /// One page of employees with their avatars.
    async fn list(&self, params: &ListParams)
    -> Result<Vec<WithMedia<Employee>>, RepositoryError>;

    /// Replace profile fields. `None` if the row is gone.
    async fn update(&self, id: i32, changes: EmployeeChanges)
    -> Result<Option<Employee>, RepositoryError>;

    /// Delete an employee. Their posts go with them.
    async fn delete(&self, id: i32) -> Result<bool, RepositoryError>;
}

/// Employee operations.
pub struct EmployeeService {
    employees: Arc<dyn EmployeeRepository>,
    posts: Arc<dyn PostRepository>,
    saga: MediaSaga,
}

impl EmployeeService {
    /// Create an employee service.
    #[must_use]
    pub fn new(
        employees: Arc<dyn EmployeeRepository>,
        posts: Arc<dyn PostRepository>,
        saga: MediaSaga,
    ) -> Self {
        Self {
            employees,
            posts,
            saga,
        }
    }

    /// Hire an employee, attaching the uploaded avatar if present.
    pub async fn create(&self, submission: Submission) -> Result<EmployeeView, ResourceError> {
        let cleanup = self.saga.cleanup();
        let admitted = submission.admit::<EmployeePayload>(cleanup).await?;
        let changes = admitted.payload.clone().into_changes(Role::Employee);

        if let Err(e) = self.ensure_email_free(&changes.email, None).await {
            return Err(admitted.reject(cleanup, e).await);
        }

        let (employee, _) = self
            .saga
            .run(admitted.file, move |avatar_id| async move {
                let employee = self
                    .employees
                    .create(NewEmployee {
                        name: changes.name,
                        email: changes.email,
                        phone: changes.phone,
                        role: changes.role,
                        avatar_id,
                    })
                    .await?;
                Ok(employee)
            })
            .await?;

        info!(employee_id = employee.id, role = employee.role.as_str(), "Employee created");
        self.show(employee.id).await
    }

    /// A single employee.
    pub async fn show(&self, id: i32) -> Result<EmployeeView, ResourceError> {
        let employee = self.find(id).await?;
        Ok(self.view(employee))
    }

    /// One page of employees.
    pub async fn list(&self, query: ListQuery) -> Result<Vec<EmployeeView>, ResourceError> {
        let params = query.into_params()?;
        let employees = self.employees.list(&params).await?;
        Ok(employees.into_iter().map(|e| self.view(e)).collect())
    }

    /// Replace an employee's profile fields.
    pub async fn update(&self, id: i32, fields: &FormFields) -> Result<EmployeeView, ResourceError> {
        let payload: EmployeePayload = validate_payload(fields)?;
        let current = self.find(id).await?;
        let changes = payload.into_changes(current.item.role);
        self.ensure_email_free(&changes.email, Some(id)).await?;

        self.employees
            .update(id, changes)
            .await?
            .ok_or(ResourceError::NotFound("Employee"))?;

        info!(employee_id = id, "Employee updated");
        self.show(id).await
    }

    /// Delete an employee, reclaiming their avatar and their posts' media.
    pub async fn delete(&self, id: i32) -> Result<(), ResourceError> {
        let employee = self.find(id).await?;
        let posts = self.posts.list_by_author(id).await?;

        if !self.employees.delete(id).await? {
            return Err(ResourceError::NotFound("Employee"));
        }

        let cleanup = self.saga.cleanup();
        let post_media: Vec<_> = posts.iter().map(|p| p.midia.as_ref()).collect();
        cleanup.reclaim_all(&[employee.media.as_ref()]).await;
        cleanup.reclaim_all(&post_media).await;

        info!(employee_id = id, posts = posts.len(), "Employee deleted");
        Ok(())
    }

    async fn find(&self, id: i32) -> Result<WithMedia<Employee>, ResourceError> {
        self.employees
            .find_with_avatar(id)
            .await?
            .ok_or(ResourceError::NotFound("Employee"))
    }

    async fn ensure_email_free(&self, email: &str, except: Option<i32>) -> Result<(), ResourceError> {
        match self.employees.find_by_email(email).await? {
            Some(existing) if Some(existing.id) != except => {
                Err(ValidationFailure::single("email is already in use").into())
            }
            _ => Ok(()),
        }
    }

    fn view(&self, record: WithMedia<Employee>) -> EmployeeView {
        let avatar = self.saga.store().view_opt(record.media.as_ref());
        let employee = record.item;
        EmployeeView {
            id: employee.id,
            name: employee.name,
            email: employee.email,
            phone: employee.phone,
            role: employee.role,
            avatar_id: employee.avatar_id,
            avatar,
            created_at: employee.created_at,
            updated_at: employee.updated_at,
        }
    }
}
