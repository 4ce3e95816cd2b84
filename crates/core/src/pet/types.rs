//! Pet types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::media::MediaView;

/// A stored pet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pet {
    /// Row id.
    pub id: i32,
    /// Pet name.
    pub name: String,
    /// Species, serialized as `type`.
    pub kind: String,
    /// Sex.
    pub sex: String,
    /// Breed.
    pub breed: String,
    /// Owning customer.
    pub owner_id: i32,
    /// Avatar media row.
    pub avatar_id: Option<i32>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a pet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPet {
    /// Pet name.
    pub name: String,
    /// Species.
    pub kind: String,
    /// Sex.
    pub sex: String,
    /// Breed.
    pub breed: String,
    /// Owning customer.
    pub owner_id: i32,
    /// Avatar media row.
    pub avatar_id: Option<i32>,
}

/// Full replacement of a pet's descriptive fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PetChanges {
    /// Pet name.
    pub name: String,
    /// Species.
    pub kind: String,
    /// Sex.
    pub sex: String,
    /// Breed.
    pub breed: String,
}

/// Accepted pet fields.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct PetPayload {
    /// Pet name.
    #[validate(
        required(message = "name is a required field"),
        length(min = 1, message = "name is a required field")
    )]
    pub name: Option<String>,
    /// Species.
    #[serde(rename = "type")]
    #[validate(
        required(message = "type is a required field"),
        length(min = 1, message = "type is a required field")
    )]
    pub kind: Option<String>,
    /// Sex.
    #[validate(
        required(message = "sex is a required field"),
        length(min = 1, message = "sex is a required field")
    )]
    pub sex: Option<String>,
    /// Breed.
    #[validate(
        required(message = "breed is a required field"),
        length(min = 1, message = "breed is a required field")
    )]
    pub breed: Option<String>,
}

impl PetPayload {
    /// Descriptive fields of a validated payload.
    #[must_use]
    pub fn into_changes(self) -> PetChanges {
        PetChanges {
            name: self.name.unwrap_or_default(),
            kind: self.kind.unwrap_or_default(),
            sex: self.sex.unwrap_or_default(),
            breed: self.breed.unwrap_or_default(),
        }
    }
}

/// Pet as rendered in responses.
#[derive(Debug, Clone, Serialize)]
pub struct PetView {
    /// Row id.
    pub id: i32,
    /// Pet name.
    pub name: String,
    /// Species.
    #[serde(rename = "type")]
    pub kind: String,
    /// Sex.
    pub sex: String,
    /// Breed.
    pub breed: String,
    /// Owning customer.
    pub owner_id: i32,
    /// Avatar media row id.
    pub avatar_id: Option<i32>,
    /// Avatar with its URL.
    pub avatar: Option<MediaView>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}
