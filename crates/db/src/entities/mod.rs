//! `SeaORM` entity definitions.

pub mod appointments;
pub mod customers;
pub mod employees;
pub mod files;
pub mod pets;
pub mod posts;

pub mod prelude {
    //! Entity aliases.
    pub use super::appointments::Entity as Appointments;
    pub use super::customers::Entity as Customers;
    pub use super::employees::Entity as Employees;
    pub use super::files::Entity as Files;
    pub use super::pets::Entity as Pets;
    pub use super::posts::Entity as Posts;
}
