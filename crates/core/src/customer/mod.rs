//! Customer accounts.

mod service;
mod types;

#[cfg(test)]
mod tests;

#[cfg(test)]
pub use service::MockCustomerRepository;
pub use service::{CustomerRepository, CustomerService};
pub use types::{Customer, CustomerChanges, CustomerPayload, CustomerView, NewCustomer};
