//! Owner resolution.

use super::error::ResourceError;

/// The account a request acts for.
///
/// Resolved once per request and passed to every ownership check instead of
/// each operation reading query strings and headers on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OwnerContext {
    owner_id: i32,
}

impl OwnerContext {
    /// Context for a known owner id.
    #[must_use]
    pub const fn new(owner_id: i32) -> Self {
        Self { owner_id }
    }

    /// Resolve from candidate values in priority order.
    ///
    /// The first non-blank candidate wins. It must parse as an integer.
    pub fn resolve<'a, I>(candidates: I) -> Result<Self, ResourceError>
    where
        I: IntoIterator<Item = Option<&'a str>>,
    {
        let raw = candidates
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|v| !v.is_empty())
            .ok_or(ResourceError::OwnerMissing)?;

        raw.parse::<i32>()
            .map(Self::new)
            .map_err(|_| ResourceError::OwnerMissing)
    }

    /// The owner id.
    #[must_use]
    pub const fn owner_id(&self) -> i32 {
        self.owner_id
    }

    /// Whether a record owned by `owner_id` belongs to this context.
    #[must_use]
    pub const fn owns(&self, owner_id: i32) -> bool {
        self.owner_id == owner_id
    }

    /// Unwrap an optional context or fail with `OwnerMissing`.
    pub fn require(owner: Option<Self>) -> Result<Self, ResourceError> {
        owner.ok_or(ResourceError::OwnerMissing)
    }
}

/// Whether a `Content-Type` value declares a multipart form body.
#[must_use]
pub fn is_multipart_form(content_type: Option<&str>) -> bool {
    content_type
        .and_then(|ct| ct.split(';').next())
        .is_some_and(|mime| mime.trim().eq_ignore_ascii_case("multipart/form-data"))
}
