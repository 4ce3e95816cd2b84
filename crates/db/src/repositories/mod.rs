//! Repository implementations for data access.
//!
//! Each repository implements the matching trait from `petcare-core` over a
//! shared `DatabaseConnection`, hiding the `SeaORM` details from the services.

pub mod appointment;
pub mod customer;
pub mod employee;
pub mod media;
pub mod pet;
pub mod post;

pub use appointment::AppointmentRepository;
pub use customer::CustomerRepository;
pub use employee::EmployeeRepository;
pub use media::MediaRepository;
pub use pet::PetRepository;
pub use post::PostRepository;

use chrono::Utc;
use petcare_core::resource::RepositoryError;
use petcare_shared::types::SortOrder;
use sea_orm::{DbErr, Order, prelude::DateTimeWithTimeZone};

use crate::entities::files;
use petcare_core::media::Media;

/// Convert a `SeaORM` error into the core repository error.
pub(crate) fn db_err(err: DbErr) -> RepositoryError {
    RepositoryError::new(err.to_string())
}

/// Result of an `UPDATE ... RETURNING`; `None` when no row matched.
pub(crate) fn updated<M>(result: Result<M, DbErr>) -> Result<Option<M>, RepositoryError> {
    match result {
        Ok(model) => Ok(Some(model)),
        Err(DbErr::RecordNotUpdated) => Ok(None),
        Err(err) => Err(db_err(err)),
    }
}

/// `ORDER BY` direction for a sort order.
pub(crate) fn direction(order: SortOrder) -> Order {
    if order.is_descending() {
        Order::Desc
    } else {
        Order::Asc
    }
}

/// Current time as stored in timestamp columns.
pub(crate) fn now() -> DateTimeWithTimeZone {
    Utc::now().into()
}

/// Convert a files row to a media row.
pub(crate) fn to_media(model: files::Model) -> Media {
    Media {
        id: model.id,
        name: model.name,
        path: model.path,
    }
}
