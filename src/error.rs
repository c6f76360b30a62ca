use axum::extract::multipart::{MultipartError, MultipartRejection};
use axum::extract::rejection::FormRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use tracing::error;

pub type ApiResult<T> = std::result::Result<T, ApiError>;

#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ApiError {
    #[error("paste not found")]
    NotFound,
    #[error("paste content must not be empty")]
    EmptyContent,
    #[error("paste id already exists")]
    Conflict,
    #[error("could not allocate a unique paste id")]
    KeysExhausted,
    #[error("invalid form data: {}", .source.body_text())]
    Form {
        #[from]
        source: FormRejection,
    },
    #[error("invalid multipart request")]
    MultipartRequest {
        #[from]
        source: MultipartRejection,
    },
    #[error("error reading multipart data")]
    Multipart {
        #[from]
        source: MultipartError,
    },
    #[error("database error")]
    Database {
        #[from]
        source: sqlx::Error,
    },
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::EmptyContent => StatusCode::BAD_REQUEST,
            ApiError::Conflict => StatusCode::CONFLICT,
            ApiError::KeysExhausted => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Form { source } => source.status(),
            ApiError::MultipartRequest { source } => source.status(),
            ApiError::Multipart { source } => source.status(),
            ApiError::Database { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status_code = self.status_code();

        if status_code.is_server_error() {
            match &self {
                ApiError::Database { source } => error!("{self}: {source}"),
                _ => error!("{self}"),
            }
        }

        (status_code, format!("{self}")).into_response()
    }
}
