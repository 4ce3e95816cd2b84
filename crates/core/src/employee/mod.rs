//! Company employees and administrators.

mod service;
mod types;

#[cfg(test)]
mod tests;

#[cfg(test)]
pub use service::MockEmployeeRepository;
pub use service::{EmployeeRepository, EmployeeService};
pub use types::{Employee, EmployeeChanges, EmployeePayload, EmployeeView, NewEmployee};
