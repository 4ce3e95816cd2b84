//! Request extractors shared by the resource routes.

use std::marker::PhantomData;

use axum::{
    Json,
    extract::{FromRequest, FromRequestParts, Multipart, Path, Query, Request},
    http::{header::CONTENT_TYPE, request::Parts},
};
use petcare_core::resource::{ListQuery, Submission, is_multipart_form};
use petcare_core::storage::StagedFile;
use petcare_core::validation::FormFields;
use petcare_core::{JunkCleanup, OwnerContext, ResourceError};
use petcare_shared::AppError;
use serde::Deserialize;
use serde_json::Value;

use crate::{AppState, error::ApiError};

/// Headers checked for the owner id, after the `c` query parameter.
const OWNER_HEADERS: [&str; 2] = ["user_id", "u"];

#[derive(Deserialize)]
struct OwnerQuery {
    c: Option<String>,
}

/// Owner id taken from query `c`, then header `user_id`, then header `u`.
///
/// `None` when none of them carries a numeric id; handlers decide whether
/// that is an error.
#[derive(Debug, Clone, Copy)]
pub struct OwnerId(pub Option<OwnerContext>);

impl OwnerId {
    /// The owner, or `OwnerMissing`.
    pub fn require(self) -> Result<OwnerContext, ResourceError> {
        OwnerContext::require(self.0)
    }
}

impl<S> FromRequestParts<S> for OwnerId
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let query = Query::<OwnerQuery>::try_from_uri(&parts.uri)
            .ok()
            .and_then(|Query(q)| q.c);

        let headers = OWNER_HEADERS
            .iter()
            .map(|name| parts.headers.get(*name).and_then(|v| v.to_str().ok()));

        let owner = OwnerContext::resolve(std::iter::once(query.as_deref()).chain(headers)).ok();
        Ok(Self(owner))
    }
}

/// Numeric id from the single path parameter.
#[derive(Debug, Clone, Copy)]
pub struct ResourceId(pub i32);

impl<S> FromRequestParts<S> for ResourceId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|_| ResourceError::InvalidId)?;
        parse_id(&raw).map(Self).map_err(ApiError::from)
    }
}

/// Parse a path id.
pub fn parse_id(raw: &str) -> Result<i32, ResourceError> {
    raw.trim().parse().map_err(|_| ResourceError::InvalidId)
}

/// `page`, `order` and `owner`/`u` query parameters.
#[derive(Debug, Clone, Default)]
pub struct Listing(pub ListQuery);

impl<S> FromRequestParts<S> for Listing
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Query::<ListQuery>::try_from_uri(&parts.uri)
            .map(|Query(q)| Self(q))
            .map_err(|e| AppError::Validation(e.body_text()).into())
    }
}

/// JSON object body for update endpoints.
#[derive(Debug, Clone, Default)]
pub struct JsonFields(pub FormFields);

impl<S> FromRequest<S> for JsonFields
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(fields) = Json::<FormFields>::from_request(req, state)
            .await
            .map_err(|e| AppError::Validation(e.body_text()))?;
        Ok(Self(fields))
    }
}

/// Multipart field an upload endpoint takes its file from.
pub trait FileField {
    /// Field name.
    const NAME: &'static str;
}

/// Profile and pet pictures, sent as `avatar`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Avatar;

impl FileField for Avatar {
    const NAME: &'static str = "avatar";
}

/// Post attachments, sent as `midia`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Midia;

impl FileField for Midia {
    const NAME: &'static str = "midia";
}

/// Body of an upload endpoint.
///
/// A multipart body has its `F` file part (if any) written to storage before
/// the handler runs; text parts become form fields. A file under any other
/// field name rejects the request. Any other body is kept as fields only so
/// the resource can reject the content type itself.
#[derive(Debug, Clone, Default)]
pub struct UploadForm<F>(pub Submission, pub PhantomData<F>);

impl<F: FileField> FromRequest<AppState> for UploadForm<F> {
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &AppState) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);

        if !is_multipart_form(content_type.as_deref()) {
            let fields = Json::<FormFields>::from_request(req, state)
                .await
                .map(|Json(fields)| fields)
                .unwrap_or_default();
            return Ok(Self(
                Submission {
                    content_type,
                    fields,
                    file: None,
                },
                PhantomData,
            ));
        }

        let mut multipart = Multipart::from_request(req, state)
            .await
            .map_err(|e| AppError::Validation(e.body_text()))?;

        let mut staging = Staging::new(&state.cleanup);
        loop {
            let field = match multipart.next_field().await {
                Ok(Some(field)) => field,
                Ok(None) => break,
                Err(e) => return Err(staging.abort(AppError::Validation(e.body_text())).await),
            };
            let Some(name) = field.name().map(str::to_owned) else {
                continue;
            };

            if let Some(original_name) = field.file_name().map(str::to_owned) {
                if name != F::NAME && !original_name.is_empty() {
                    let err = AppError::Validation(format!("Unexpected file field '{name}'"));
                    return Err(staging.abort(err).await);
                }
                let mime = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_owned();
                let data = match field.bytes().await {
                    Ok(data) => data,
                    Err(e) => return Err(staging.abort(AppError::Validation(e.body_text())).await),
                };
                // Browsers send an empty part for an untouched file input.
                let untouched = original_name.is_empty() && data.is_empty();
                if untouched || name != F::NAME || staging.file.is_some() {
                    continue;
                }
                match state.storage.stage_upload(&original_name, &mime, data).await {
                    Ok(staged) => staging.file = Some(staged),
                    Err(e) => return Err(staging.abort(e).await),
                }
            } else {
                let text = match field.text().await {
                    Ok(text) => text,
                    Err(e) => return Err(staging.abort(AppError::Validation(e.body_text())).await),
                };
                staging.fields.insert(name, Value::String(text));
            }
        }

        Ok(Self(
            Submission {
                content_type,
                fields: staging.fields,
                file: staging.file,
            },
            PhantomData,
        ))
    }
}

/// Parts collected so far while reading a multipart body.
struct Staging<'a> {
    cleanup: &'a JunkCleanup,
    fields: FormFields,
    file: Option<StagedFile>,
}

impl<'a> Staging<'a> {
    fn new(cleanup: &'a JunkCleanup) -> Self {
        Self {
            cleanup,
            fields: FormFields::new(),
            file: None,
        }
    }

    async fn abort(self, err: impl Into<ApiError>) -> ApiError {
        self.cleanup.discard(self.file.as_ref()).await;
        err.into()
    }
}
