use actix_web::{
    body::BoxBody,
    error::JsonPayloadError,
    http::{
        self,
        header::{self, HeaderValue},
    },
    HttpResponse, ResponseError,
};
use derive_more::Display;
use diesel::result::{DatabaseErrorKind, Error as DBError};
use serde_json::json;
use std::convert::From;
use uuid::Error as ParseError;

pub const TITLE_REQUIRED: &str = "Title is required";
pub const TITLE_EMPTY: &str = "Title cannot be empty";
pub const INVALID_ID: &str = "Invalid ID";
pub const INVALID_BODY: &str = "Invalid JSON body";

#[derive(Debug, Display)]
pub enum TodoApiError {
    #[display(fmt = "Internal Server Error")]
    InternalServerError,

    #[display(fmt = "{}", _0)]
    BadRequest(String),

    #[display(fmt = "Internal Server Error")]
    DatabaseConnectionError,

    #[display(fmt = "{} not found", _0)]
    NotFound(String),
}

impl TodoApiError {
    pub fn todo_not_found() -> Self {
        TodoApiError::NotFound(String::from("Todo"))
    }
}

impl ResponseError for TodoApiError {
    fn status_code(&self) -> actix_web::http::StatusCode {
        match self {
            TodoApiError::BadRequest(_) => http::StatusCode::BAD_REQUEST,
            TodoApiError::NotFound(_) => http::StatusCode::NOT_FOUND,
            _ => http::StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse<actix_web::body::BoxBody> {
        let mut res = HttpResponse::new(self.status_code());

        res.headers_mut().append(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );

        res.set_body(BoxBody::new(json!({"error": self.to_string()}).to_string()))
    }
}

impl From<ParseError> for TodoApiError {
    fn from(_: ParseError) -> Self {
        TodoApiError::BadRequest(String::from(INVALID_ID))
    }
}

impl From<r2d2::Error> for TodoApiError {
    fn from(e: r2d2::Error) -> Self {
        log::error!("Could not get a database connection: {}", e);
        TodoApiError::DatabaseConnectionError
    }
}

impl From<JsonPayloadError> for TodoApiError {
    fn from(e: JsonPayloadError) -> Self {
        log::debug!("Rejected request body: {}", e);
        TodoApiError::BadRequest(String::from(INVALID_BODY))
    }
}

impl From<DBError> for TodoApiError {
    fn from(error: DBError) -> Self {
        match error {
            DBError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
                log::error!("Duplicate todo id: {}", info.message());
                TodoApiError::InternalServerError
            }
            e => {
                log::error!("Database error: {}", e);
                TodoApiError::InternalServerError
            }
        }
    }
}
