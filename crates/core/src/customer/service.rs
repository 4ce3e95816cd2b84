//! Customer repository seam and service.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use super::types::{Customer, CustomerChanges, CustomerPayload, CustomerView, NewCustomer};
use crate::pet::PetRepository;
use crate::resource::{
    ListParams, ListQuery, MediaSaga, RepositoryError, ResourceError, Submission, WithMedia,
};
use crate::validation::{FormFields, ValidationFailure, validate_payload};

/// Repository trait for customer persistence.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CustomerRepository: Send + Sync {
    /// Insert a customer.
    async fn create(&self, input: NewCustomer) -> Result<Customer, RepositoryError>;

    /// Find a customer with its avatar.
    async fn find_with_avatar(
        &self,
        id: i32,
    ) -> Result<Option<WithMedia<Customer>>, RepositoryError>;

    /// Find a customer by email.
    async fn find_by_email(&self, email: &str) -> Result<Option<Customer>, RepositoryError>;

    /// One page of customers with their avatars.
    async fn list(&self, params: &ListParams)
    -> Result<Vec<WithMedia<Customer>>, RepositoryError>;

    /// Replace profile fields. `None` if the row is gone.
    async fn update(&self, id: i32, changes: CustomerChanges)
    -> Result<Option<Customer>, RepositoryError>;

    /// Delete a customer. Their pets and appointments go with them.
    async fn delete(&self, id: i32) -> Result<bool, RepositoryError>;
}

/// Customer operations.
pub struct CustomerService {
    customers: Arc<dyn CustomerRepository>,
    pets: Arc<dyn PetRepository>,
    saga: MediaSaga,
}

impl CustomerService {
    /// Create a customer service.
    #[must_use]
    pub fn new(
        customers: Arc<dyn CustomerRepository>,
        pets: Arc<dyn PetRepository>,
        saga: MediaSaga,
    ) -> Self {
        Self {
            customers,
            pets,
            saga,
        }
    }

    /// Sign up a customer, attaching the uploaded avatar if present.
    pub async fn register(&self, submission: Submission) -> Result<CustomerView, ResourceError> {
        let cleanup = self.saga.cleanup();
        let admitted = submission.admit::<CustomerPayload>(cleanup).await?;
        let changes = admitted.payload.clone().into_changes();

        if let Err(e) = self.ensure_email_free(&changes.email, None).await {
            return Err(admitted.reject(cleanup, e).await);
        }

        let (customer, _) = self
            .saga
            .run(admitted.file, move |avatar_id| async move {
                let customer = self
                    .customers
                    .create(NewCustomer {
                        name: changes.name,
                        email: changes.email,
                        phone: changes.phone,
                        avatar_id,
                    })
                    .await?;
                Ok(customer)
            })
            .await?;

        info!(customer_id = customer.id, "Customer registered");
        self.show(customer.id).await
    }

    /// A single customer.
    pub async fn show(&self, id: i32) -> Result<CustomerView, ResourceError> {
        let customer = self.find(id).await?;
        Ok(self.view(customer))
    }

    /// One page of customers.
    pub async fn list(&self, query: ListQuery) -> Result<Vec<CustomerView>, ResourceError> {
        let params = query.into_params()?;
        let customers = self.customers.list(&params).await?;
        Ok(customers.into_iter().map(|c| self.view(c)).collect())
    }

    /// Replace a customer's profile fields.
    pub async fn update(&self, id: i32, fields: &FormFields) -> Result<CustomerView, ResourceError> {
        let changes = validate_payload::<CustomerPayload>(fields)?.into_changes();
        self.find(id).await?;
        self.ensure_email_free(&changes.email, Some(id)).await?;

        self.customers
            .update(id, changes)
            .await?
            .ok_or(ResourceError::NotFound("Customer"))?;

        info!(customer_id = id, "Customer updated");
        self.show(id).await
    }

    /// Delete a customer, reclaiming their avatar and their pets' avatars.
    pub async fn delete(&self, id: i32) -> Result<(), ResourceError> {
        let customer = self.find(id).await?;
        let pets = self.pets.list_by_owner(id).await?;

        if !self.customers.delete(id).await? {
            return Err(ResourceError::NotFound("Customer"));
        }

        let cleanup = self.saga.cleanup();
        let pet_media: Vec<_> = pets.iter().map(|p| p.media.as_ref()).collect();
        cleanup.reclaim_all(&[customer.media.as_ref()]).await;
        cleanup.reclaim_all(&pet_media).await;

        info!(customer_id = id, pets = pets.len(), "Customer deleted");
        Ok(())
    }

    async fn find(&self, id: i32) -> Result<WithMedia<Customer>, ResourceError> {
        self.customers
            .find_with_avatar(id)
            .await?
            .ok_or(ResourceError::NotFound("Customer"))
    }

    async fn ensure_email_free(&self, email: &str, except: Option<i32>) -> Result<(), ResourceError> {
        match self.customers.find_by_email(email).await? {
            Some(existing) if Some(existing.id) != except => {
                Err(ValidationFailure::single("email is already in use").into())
            }
            _ => Ok(()),
        }
    }

    fn view(&self, record: WithMedia<Customer>) -> CustomerView {
        let avatar = self.saga.store().view_opt(record.media.as_ref());
        let customer = record.item;
        CustomerView {
            id: customer.id,
            name: customer.name,
            email: customer.email,
            phone: customer.phone,
            avatar_id: customer.avatar_id,
            avatar,
            created_at: customer.created_at,
            updated_at: customer.updated_at,
        }
    }
}
