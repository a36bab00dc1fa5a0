use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use thiserror::Error;

/// Read-path failures; writes report through `ResponseEnvelope` instead.
#[derive(Debug, Error)]
pub enum ProductError {
    #[error("Product requested not found")]
    NotFound,

    #[error("No product found!")]
    NoProducts,

    /// Storage failure; carries only the client-safe message
    #[error("{0}")]
    Storage(String),
}

pub type ProductResult<T> = Result<T, ProductError>;

impl From<ProductError> for AppError {
    fn from(err: ProductError) -> Self {
        match err {
            ProductError::NotFound | ProductError::NoProducts => AppError::NotFound(err.to_string()),
            ProductError::Storage(msg) => AppError::InternalServerError(msg),
        }
    }
}

impl IntoResponse for ProductError {
    fn into_response(self) -> Response {
        AppError::from(self).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn test_not_found_messages() {
        assert_eq!(ProductError::NotFound.to_string(), "Product requested not found");
        assert_eq!(ProductError::NoProducts.to_string(), "No product found!");
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ProductError::NoProducts.into_response().status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ProductError::Storage("Error occurred retrieving products".into())
                .into_response()
                .status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
