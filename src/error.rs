use {
    crate::{model::ValidationError, store::StoreError},
    actix_web::{http::StatusCode, HttpResponse, ResponseError},
    serde::Serialize,
};

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Name parameter is required")]
    MissingName,

    /// Malformed body or query string, rejected before any handler runs.
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Validation(String),

    #[error("Pokemon not found")]
    NotFound,

    /// Insert failed in the store. Still a 400, without the driver's text.
    #[error("Failed to create Pokemon")]
    CreateFailed(#[source] StoreError),

    #[error("Internal Server Error")]
    Internal(#[source] StoreError),
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::Validation(err.to_string())
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Validation(err) => err.into(),
            err => ApiError::Internal(err),
        }
    }
}

impl ApiError {
    /// Every create failure is answered with a 400.
    pub fn create_failed(err: StoreError) -> Self {
        match err {
            StoreError::Validation(err) => err.into(),
            err => ApiError::CreateFailed(err),
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::MissingName
            | ApiError::BadRequest(_)
            | ApiError::Validation(_)
            | ApiError::CreateFailed(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if let ApiError::Internal(source) | ApiError::CreateFailed(source) = self {
            tracing::error!(error = %source, "data store failure");
        }

        HttpResponse::build(self.status_code()).json(ErrorBody {
            error: self.to_string(),
        })
    }
}
