//! Standard API response types

use axum::{
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Every successful body is wrapped as `{ "data": ... }`
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}

impl<T: Serialize> DataResponse<T> {
    pub fn new(data: T) -> Self {
        Self { data }
    }
}

impl<T: Serialize> IntoResponse for DataResponse<T> {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}
