use axum::extract::FromRequest;

use crate::error::AppError;

/// `Json` extractor whose rejections are 400 `MalformedPayload` rather than axum's 415/422.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct Payload<T>(pub T);
