//! Building blocks shared by every resource service.
//!
//! A request moves through owner resolution, intake (content type and
//! payload checks), the media saga and persistence. Each stage returns a
//! `Result`, and stages that hold an upload hand it to [`JunkCleanup`] on the
//! way out.
//!
//! [`JunkCleanup`]: crate::cleanup::JunkCleanup

mod context;
mod error;
mod intake;
mod listing;
mod saga;

pub use context::{OwnerContext, is_multipart_form};
pub use error::{RepositoryError, ResourceError};
pub use intake::{Admitted, Submission};
pub use listing::{ListParams, ListQuery};
pub use saga::MediaSaga;

use crate::media::Media;

/// An entity loaded together with its media row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WithMedia<T> {
    /// The entity.
    pub item: T,
    /// Its avatar or post media, if any.
    pub media: Option<Media>,
}

impl<T> WithMedia<T> {
    /// Pair an entity with its media.
    pub fn new(item: T, media: Option<Media>) -> Self {
        Self { item, media }
    }
}
