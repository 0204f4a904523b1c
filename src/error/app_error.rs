use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Database(sqlx::Error),
    Unauthorized(String),
    Forbidden(String),
    NotFound(String),
    /// Malformed request payloads.
    BadRequest(String),
    /// Well-formed requests that break an element, lock or reference rule.
    ValidationError(String),
    Internal(String),
}

const PG_FOREIGN_KEY_VIOLATION: &str = "23503";
const PG_CHECK_VIOLATION: &str = "23514";

#[derive(Serialize)]
struct ErrorResponse {
    success: bool,
    error: ErrorDetail,
}

#[derive(Serialize)]
struct ErrorDetail {
    code: String,
    message: String,
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::ValidationError(_) => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            AppError::Database(_) => "DATABASE_ERROR",
            AppError::Unauthorized(_) => "UNAUTHORIZED",
            AppError::Forbidden(_) => "FORBIDDEN",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::BadRequest(_) => "BAD_REQUEST",
            AppError::ValidationError(_) => "VALIDATION_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Database(e) => write!(f, "Database error: {}", e),
            AppError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            AppError::Forbidden(msg) => write!(f, "Forbidden: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            AppError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let code = self.code();
        let message = match &self {
            AppError::Database(err) => {
                tracing::error!(error = ?err, code, "Database error");
                "database error".to_string()
            }
            AppError::Internal(msg) => {
                tracing::error!(error = %msg, code, "Internal error");
                "Server Error".to_string()
            }
            AppError::Unauthorized(msg)
            | AppError::Forbidden(msg)
            | AppError::NotFound(msg)
            | AppError::BadRequest(msg)
            | AppError::ValidationError(msg) => msg.clone(),
        };

        let body = ErrorResponse {
            success: false,
            error: ErrorDetail {
                code: code.to_string(),
                message,
            },
        };

        (status, Json(body)).into_response()
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::RowNotFound = err {
            return AppError::NotFound("Data not found".to_string());
        }
        let violation = err.as_database_error().and_then(|db_err| {
            constraint_violation(db_err.code().as_deref(), db_err.constraint())
        });
        violation.unwrap_or(AppError::Database(err))
    }
}

/// Constraint failures that slip past the use-case checks still describe a
/// bad request rather than a server fault.
fn constraint_violation(code: Option<&str>, constraint: Option<&str>) -> Option<AppError> {
    let constraint = constraint.unwrap_or("unknown");
    match code? {
        PG_CHECK_VIOLATION => Some(AppError::ValidationError(format!(
            "Element violates constraint {}",
            constraint
        ))),
        PG_FOREIGN_KEY_VIOLATION => Some(AppError::ValidationError(format!(
            "Referenced record does not exist ({})",
            constraint
        ))),
        _ => None,
    }
}

impl From<sqlx::migrate::MigrateError> for AppError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        AppError::Internal(format!("migration failed: {}", err))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::BadRequest(format!("JSON parse error: {}", err))
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use axum::{http::StatusCode, response::IntoResponse};

    use super::{AppError, constraint_violation};

    #[test]
    fn not_found_and_validation_map_to_distinct_statuses() {
        let not_found = AppError::NotFound("Element not found: 4".to_string()).into_response();
        let invalid = AppError::ValidationError("Element editing is locked".to_string())
            .into_response();
        assert_eq!(not_found.status(), StatusCode::NOT_FOUND);
        assert_eq!(invalid.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn row_not_found_becomes_not_found() {
        let error = AppError::from(sqlx::Error::RowNotFound);
        assert!(matches!(error, AppError::NotFound(_)));
        assert_eq!(error.code(), "NOT_FOUND");
    }

    #[test]
    fn constraint_codes_map_to_validation_errors() {
        let check = constraint_violation(Some("23514"), Some("element_width_check"));
        assert!(
            matches!(check, Some(AppError::ValidationError(msg)) if msg.contains("element_width_check"))
        );
        let foreign = constraint_violation(Some("23503"), None);
        assert!(matches!(foreign, Some(AppError::ValidationError(_))));
        assert!(constraint_violation(Some("40001"), None).is_none());
        assert!(constraint_violation(None, None).is_none());
    }

    #[test]
    fn internal_errors_hide_details() {
        let response = AppError::Internal("pool exhausted".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
