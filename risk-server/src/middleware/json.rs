//! JSON body extractor with the API's error shape

use axum::extract::FromRequest;

use crate::AppError;

/// `axum::Json` whose rejections render as `{"error", "status"}` bodies
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);
