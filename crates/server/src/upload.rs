// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Multipart extraction for order uploads.
//!
//! Photos arrive as `photos` file fields; the order description arrives as
//! an `order_details` text field holding JSON.

use axum::extract::Multipart;
use axum::http::StatusCode;
use fotoexpres::OrderRequest;
use fotoexpres_api::UploadedFile;
use tracing::debug;

use crate::HttpError;

/// Form field carrying one photo.
pub const PHOTOS_FIELD: &str = "photos";
/// Form field carrying the order description as JSON.
pub const ORDER_DETAILS_FIELD: &str = "order_details";

/// The parts of an order upload form.
#[derive(Debug, Default)]
pub struct OrderForm {
    /// The parsed order description, if the form carried one.
    pub order_details: Option<OrderRequest>,
    /// The uploaded photos, in form order.
    pub photos: Vec<UploadedFile>,
}

impl OrderForm {
    /// Reads every field of a multipart body.
    ///
    /// Unknown fields are skipped.
    ///
    /// # Errors
    ///
    /// Returns a 400 error if the body is not valid multipart, a photo has
    /// no file name, or `order_details` is not valid JSON. A body over the
    /// configured limit is rejected with 413.
    pub async fn read(mut multipart: Multipart) -> Result<Self, HttpError> {
        let mut form: Self = Self::default();

        while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
            let name: Option<String> = field.name().map(str::to_string);
            match name.as_deref() {
                Some(PHOTOS_FIELD) => {
                    let file_name: String = field
                        .file_name()
                        .map(str::to_string)
                        .ok_or_else(|| bad_request("Every photo must carry a file name"))?;
                    let bytes: Vec<u8> = field.bytes().await.map_err(multipart_error)?.to_vec();
                    debug!(file_name = %file_name, size = bytes.len(), "Received photo");
                    form.photos.push(UploadedFile { file_name, bytes });
                }
                Some(ORDER_DETAILS_FIELD) => {
                    let text: String = field.text().await.map_err(multipart_error)?;
                    let details: OrderRequest = serde_json::from_str(&text).map_err(|e| {
                        bad_request(format!("Invalid {ORDER_DETAILS_FIELD}: {e}"))
                    })?;
                    form.order_details = Some(details);
                }
                other => {
                    debug!(field = ?other, "Ignoring unknown form field");
                }
            }
        }

        Ok(form)
    }

    /// Returns the order description, which order creation requires.
    ///
    /// # Errors
    ///
    /// Returns a 400 error if the form had no `order_details` field.
    pub fn require_order_details(&mut self) -> Result<OrderRequest, HttpError> {
        self.order_details
            .take()
            .ok_or_else(|| bad_request(format!("Missing {ORDER_DETAILS_FIELD} field")))
    }
}

fn multipart_error(err: axum::extract::multipart::MultipartError) -> HttpError {
    HttpError {
        status: err.status(),
        message: format!("Invalid upload: {}", err.body_text()),
    }
}

fn bad_request(message: impl Into<String>) -> HttpError {
    HttpError {
        status: StatusCode::BAD_REQUEST,
        message: message.into(),
    }
}
