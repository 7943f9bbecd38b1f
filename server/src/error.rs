use atlas::AtlasError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Malformed request: {0}")]
    MalformedRequest(String),

    #[error(transparent)]
    Atlas(#[from] AtlasError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::MalformedRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Atlas(AtlasError::UnknownRegion(_)) => StatusCode::BAD_REQUEST,
            AppError::Atlas(AtlasError::GeometryFetch { .. }) => StatusCode::BAD_GATEWAY,
        };

        (status, self.to_string()).into_response()
    }
}
