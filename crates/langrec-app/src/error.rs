use axum::response::{IntoResponse, Response};
use http::StatusCode;
use tracing::{debug, error};

pub type ApiResult<T, E = ApiError> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    #[error("Path id {path_id} does not match record id {record_id}")]
    IdMismatch { path_id: i64, record_id: i64 },

    #[error("Resource not found: {0}")]
    ResourceNotFound(String),

    #[error("Conflicting update: {0}")]
    Conflict(String),

    #[error("Store error: {0}")]
    StoreError(#[source] langrec_dal::Error),
}

impl From<langrec_dal::Error> for ApiError {
    fn from(error: langrec_dal::Error) -> Self {
        match error {
            langrec_dal::Error::RecordNotFound(r) => ApiError::ResourceNotFound(r),
            langrec_dal::Error::InvalidOrderByField(f) => {
                ApiError::InvalidQuery(format!("Invalid sort field {f}"))
            }
            e @ langrec_dal::Error::FailedUpdate { .. } => ApiError::Conflict(e.to_string()),
            e => ApiError::StoreError(e),
        }
    }
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::InvalidQuery(_) | ApiError::IdMismatch { .. } => StatusCode::BAD_REQUEST,
            ApiError::ResourceNotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::StoreError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!("Request failed: {self}");
            (status, "Internal server error").into_response()
        } else {
            debug!("Request rejected ({status}): {self}");
            (status, self.to_string()).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dal_error_mapping() {
        let e: ApiError = langrec_dal::Error::RecordNotFound("Language 1".into()).into();
        assert_eq!(StatusCode::NOT_FOUND, e.status_code());

        let e: ApiError = langrec_dal::Error::FailedUpdate { id: 1, version: 2 }.into();
        assert_eq!(StatusCode::CONFLICT, e.status_code());

        let e: ApiError = langrec_dal::Error::InvalidOrderByField("x".into()).into();
        assert_eq!(StatusCode::BAD_REQUEST, e.status_code());

        let e: ApiError = langrec_dal::Error::DatabaseError(langrec_dal::SqlxError::PoolClosed).into();
        assert_eq!(StatusCode::INTERNAL_SERVER_ERROR, e.status_code());
    }
}
