//! Request ID middleware for request tracing

use axum::http::HeaderName;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};

pub const X_REQUEST_ID: &str = "x-request-id";

/// Set a UUID v4 request ID when the caller sent none, and echo it on the
/// response
pub fn request_id_layer() -> (SetRequestIdLayer<MakeRequestUuid>, PropagateRequestIdLayer) {
    let header_name = HeaderName::from_static(X_REQUEST_ID);

    (
        SetRequestIdLayer::new(header_name.clone(), MakeRequestUuid),
        PropagateRequestIdLayer::new(header_name),
    )
}

pub trait RequestIdExt {
    fn request_id(&self) -> Option<&str>;
}

impl RequestIdExt for axum::http::HeaderMap {
    fn request_id(&self) -> Option<&str> {
        self.get(X_REQUEST_ID)?.to_str().ok()
    }
}
