//! Posts published by company employees.

mod service;
mod types;

#[cfg(test)]
mod tests;

#[cfg(test)]
pub use service::MockPostRepository;
pub use service::{PostRepository, PostService};
pub use types::{
    NewPost, Post, PostAuthor, PostAuthorView, PostChanges, PostPayload, PostRecord, PostView,
};
