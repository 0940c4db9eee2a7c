use rocket::http::Status;
use rocket::response::Responder;
use rocket::serde::json::Json;
use thiserror::Error;

use crate::store::StoreError;
use shared::fraud::FraudReason;
use shared::models::ErrorResponse;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Invalid timestamp! Expected format: YYYY-MM-DDTHH:MM:SSZ")]
    InvalidTimestamp,
    #[error("{0}")]
    Fraud(#[from] FraudReason),
    #[error("Duplicate entry detected in the database!")]
    DuplicateEntry,
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<StoreError> for ApiError {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::Duplicate => ApiError::DuplicateEntry,
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl<'r, 'o: 'r> Responder<'r, 'o> for ApiError {
    fn respond_to(self, req: &'r rocket::Request<'_>) -> rocket::response::Result<'o> {
        let status = match self {
            ApiError::InvalidTimestamp | ApiError::Fraud(_) | ApiError::DuplicateEntry => {
                Status::BadRequest
            }
            ApiError::Internal(_) => Status::InternalServerError,
        };

        let body = Json(ErrorResponse {
            error: self.to_string(),
        });

        rocket::Response::build_from(body.respond_to(req)?)
            .status(status)
            .ok()
    }
}
