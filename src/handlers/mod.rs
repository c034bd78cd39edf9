//! HTTP handlers, grouped by resource. Each handler extracts its inputs, delegates to a
//! service and maps the result onto JSON.

pub mod auth;
pub mod categories;
pub mod posts;
pub mod properties;
pub mod stats;
pub mod users;

use axum::{
    Json,
    extract::{Multipart, multipart::MultipartError},
    http::StatusCode,
};
use std::collections::HashMap;
use utoipa::ToSchema;

use crate::{
    error::{AppError, AppResult},
    models::MessageResponse,
    services::MediaUpload,
};

/// root
///
/// [Public Route] Welcome message.
#[utoipa::path(
    get,
    path = "/api/",
    responses((status = 200, description = "Welcome", body = MessageResponse))
)]
pub async fn root() -> Json<MessageResponse> {
    Json(MessageResponse::new("Welcome to the Realty Portal API"))
}

/// health
///
/// [Public Route] Liveness probe for load balancers.
#[utoipa::path(
    get,
    path = "/api/health",
    responses((status = 200, description = "Service is up", body = String))
)]
pub async fn health() -> &'static str {
    "ok"
}

/// UploadForm
///
/// Documents the multipart body of the upload endpoints: a `file` part and, for property
/// images, an optional `main` flag.
#[derive(ToSchema)]
#[allow(dead_code)]
pub struct UploadForm {
    #[schema(value_type = String, format = Binary)]
    file: Vec<u8>,
    main: Option<bool>,
}

/// A body over the route's `DefaultBodyLimit` surfaces as a multipart error carrying 413.
fn multipart_error(context: &str, err: MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge("upload exceeds the maximum allowed size".to_string())
    } else {
        AppError::BadRequest(format!("{}: {}", context, err))
    }
}

/// MultipartForm
///
/// The `file` part of an upload plus every other part read as text.
pub(crate) struct MultipartForm {
    pub file: Option<MediaUpload>,
    pub fields: HashMap<String, String>,
}

impl MultipartForm {
    pub async fn read(mut multipart: Multipart) -> AppResult<Self> {
        let mut form = MultipartForm {
            file: None,
            fields: HashMap::new(),
        };

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| multipart_error("malformed multipart body", e))?
        {
            let name = field.name().unwrap_or_default().to_string();
            if name == "file" {
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| multipart_error("unreadable file part", e))?;
                form.file = Some(MediaUpload {
                    bytes: bytes.to_vec(),
                    content_type,
                });
            } else {
                let value = field
                    .text()
                    .await
                    .map_err(|e| multipart_error("unreadable form field", e))?;
                form.fields.insert(name, value);
            }
        }
        Ok(form)
    }

    /// The uploaded file; a form without one is a client error.
    pub fn require_file(&mut self) -> AppResult<MediaUpload> {
        self.file
            .take()
            .ok_or_else(|| AppError::BadRequest("missing file part".to_string()))
    }

    /// Reads a boolean form field; absent means `false`.
    pub fn flag(&self, name: &str) -> AppResult<bool> {
        match self.fields.get(name).map(|v| v.trim().to_ascii_lowercase()) {
            None => Ok(false),
            Some(v) => match v.as_str() {
                "true" | "1" | "on" | "yes" => Ok(true),
                "false" | "0" | "off" | "no" | "" => Ok(false),
                _ => Err(AppError::BadRequest(format!("invalid boolean for '{}'", name))),
            },
        }
    }
}
