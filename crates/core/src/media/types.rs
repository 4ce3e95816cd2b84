//! Media types.

use serde::Serialize;

/// Stored media metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Media {
    /// Row id.
    pub id: i32,
    /// Original filename sent by the client.
    pub name: String,
    /// Storage key of the file.
    pub path: String,
}

/// Input for creating a media row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMedia {
    /// Original filename.
    pub name: String,
    /// Storage key.
    pub path: String,
}

/// Media as rendered in responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MediaView {
    /// Row id.
    pub id: i32,
    /// Storage key.
    pub path: String,
    /// Public retrieval URL.
    pub url: String,
}
