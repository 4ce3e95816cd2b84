//! Post types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::media::{Media, MediaView};

/// A stored post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Post {
    /// Row id.
    pub id: i32,
    /// Optional title.
    pub title: Option<String>,
    /// Authoring employee.
    pub employee_id: i32,
    /// Attached media row.
    pub midia_id: Option<i32>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Author summary loaded with a post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostAuthor {
    /// Employee id.
    pub id: i32,
    /// Employee name.
    pub name: String,
    /// Employee avatar.
    pub avatar: Option<Media>,
}

/// A post with its media and author.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostRecord {
    /// The post.
    pub post: Post,
    /// Attached media.
    pub midia: Option<Media>,
    /// Author, missing only if the employee row is gone.
    pub author: Option<PostAuthor>,
}

/// Input for creating a post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPost {
    /// Optional title.
    pub title: Option<String>,
    /// Authoring employee.
    pub employee_id: i32,
    /// Attached media row.
    pub midia_id: Option<i32>,
}

/// Partial post update. `None` keeps the stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostChanges {
    /// New title.
    pub title: Option<String>,
    /// New media row.
    pub midia_id: Option<i32>,
}

/// Accepted post fields.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct PostPayload {
    /// Optional title.
    #[validate(length(max = 255, message = "title must be at most 255 characters"))]
    pub title: Option<String>,
}

/// Author as rendered in responses.
#[derive(Debug, Clone, Serialize)]
pub struct PostAuthorView {
    /// Employee name.
    pub name: String,
    /// Employee avatar.
    pub avatar: Option<MediaView>,
}

/// Post as rendered in responses.
#[derive(Debug, Clone, Serialize)]
pub struct PostView {
    /// Row id.
    pub id: i32,
    /// Optional title.
    pub title: Option<String>,
    /// Authoring employee.
    pub employee_id: i32,
    /// Attached media row id.
    pub midia_id: Option<i32>,
    /// Attached media with its URL.
    pub midia: Option<MediaView>,
    /// Author summary.
    pub employee: Option<PostAuthorView>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}
