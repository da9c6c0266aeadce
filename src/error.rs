use actix_web::{
    dev::ServiceResponse,
    error::{BlockingError, JsonPayloadError, PathError, QueryPayloadError},
    http::StatusCode,
    middleware::ErrorHandlerResponse,
    web, HttpRequest, HttpResponse, ResponseError,
};
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use serde::Serialize;
use thiserror::Error;

use crate::config::Config;

pub type AppResult<T> = Result<T, AppError>;

const INTERNAL_MESSAGE: &str = "Something went very wrong!";

#[derive(Debug, Error, Clone, PartialEq)]
pub enum AppError {
    #[error("{0}")]
    InvalidInput(String),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    InvalidState(String),

    #[error("{0}")]
    Unauthenticated(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Internal(String),
}

/// Body shared by every failed response.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub status: &'static str,
    pub message: String,
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AppError {
    pub fn body(&self, expose_internal: bool) -> ErrorBody {
        let status_code = self.status_code().as_u16();
        match self {
            AppError::Internal(detail) if expose_internal => ErrorBody {
                status: "error",
                message: detail.clone(),
                status_code,
                error: Some(format!("{self:?}")),
            },
            AppError::Internal(_) => ErrorBody {
                status: "error",
                message: INTERNAL_MESSAGE.to_string(),
                status_code,
                error: None,
            },
            _ => ErrorBody {
                status: "fail",
                message: self.to_string(),
                status_code,
                error: None,
            },
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidInput(_)
            | AppError::InvalidCredentials
            | AppError::Conflict(_)
            | AppError::InvalidState(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if let AppError::Internal(detail) = self {
            log::error!("internal error: {detail}");
        }
        HttpResponse::build(self.status_code()).json(self.body(false))
    }
}

/// `ErrorHandlers` hook for 500s: outside production, re-renders an `Internal` error
/// with its detail. The environment comes from the app's `Config`.
pub fn internal_error_detail<B>(
    res: ServiceResponse<B>,
) -> actix_web::Result<ErrorHandlerResponse<B>> {
    let development = res
        .request()
        .app_data::<web::Data<Config>>()
        .is_some_and(|config| !config.is_production());
    let detailed = match res.response().error() {
        Some(err) if development => err
            .as_error::<AppError>()
            .filter(|err| matches!(err, AppError::Internal(_)))
            .map(|err| err.body(true)),
        _ => None,
    };

    let Some(body) = detailed else {
        return Ok(ErrorHandlerResponse::Response(res.map_into_left_body()));
    };
    let body = serde_json::to_string(&body)
        .map_err(|err| AppError::Internal(format!("could not encode error body: {err}")))?;
    let (req, res) = res.into_parts();
    let res = ServiceResponse::new(req, res.set_body(body))
        .map_into_boxed_body()
        .map_into_right_body();
    Ok(ErrorHandlerResponse::Response(res))
}

impl From<DieselError> for AppError {
    fn from(err: DieselError) -> Self {
        match err {
            DieselError::NotFound => AppError::NotFound("Resource not found.".to_string()),
            DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
                // sqlite reports "UNIQUE constraint failed: <table>.<column>"
                let column = info
                    .message()
                    .rsplit(|c: char| c == '.' || c == ' ')
                    .next()
                    .unwrap_or("value")
                    .to_string();
                AppError::Conflict(format!(
                    "Duplicate field value: {column}. Please use another value."
                ))
            }
            err => AppError::Internal(format!("database error: {err}")),
        }
    }
}

impl From<diesel::r2d2::PoolError> for AppError {
    fn from(err: diesel::r2d2::PoolError) -> Self {
        AppError::Internal(format!("connection pool error: {err}"))
    }
}

impl From<BlockingError> for AppError {
    fn from(err: BlockingError) -> Self {
        AppError::Internal(format!("blocking task failed: {err}"))
    }
}

impl From<bcrypt::BcryptError> for AppError {
    fn from(err: bcrypt::BcryptError) -> Self {
        AppError::Internal(format!("password hashing failed: {err}"))
    }
}

pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    AppError::InvalidInput(format!("Invalid request body: {err}")).into()
}

pub fn path_error_handler(err: PathError, req: &HttpRequest) -> actix_web::Error {
    let segment = req
        .match_info()
        .iter()
        .map(|(name, value)| format!("{name}: {value}"))
        .next()
        .unwrap_or_else(|| err.to_string());
    AppError::InvalidInput(format!("Invalid {segment}.")).into()
}

pub fn query_error_handler(err: QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    AppError::InvalidInput(format!("Invalid query string: {err}")).into()
}

pub async fn not_found() -> HttpResponse {
    AppError::NotFound("Route not found.".to_string()).error_response()
}
