use application::{ApplicationError, TokenError};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub message: String,
}

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    body: ErrorBody,
}

impl ApiError {
    pub fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            body: ErrorBody {
                code,
                message: message.into(),
            },
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, "UNAUTHORIZED", message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "BAD_REQUEST", message)
    }
}

impl From<ApplicationError> for ApiError {
    fn from(error: ApplicationError) -> Self {
        use application::ApplicationError as AppErr;
        use domain::DomainError;

        match error {
            AppErr::Domain(domain_err) => match domain_err {
                DomainError::InvalidArgument { field, reason } => ApiError::new(
                    StatusCode::BAD_REQUEST,
                    "INVALID_ARGUMENT",
                    format!("{}: {}", field, reason),
                ),
                DomainError::InvalidInterval => ApiError::new(
                    StatusCode::BAD_REQUEST,
                    "INVALID_INTERVAL",
                    "end time must be after start time",
                ),
                DomainError::UserNotFound => {
                    ApiError::new(StatusCode::NOT_FOUND, "USER_NOT_FOUND", "user not found")
                }
                DomainError::RoomNotFound => {
                    ApiError::new(StatusCode::NOT_FOUND, "ROOM_NOT_FOUND", "room not found")
                }
                DomainError::PresentationNotFound => ApiError::new(
                    StatusCode::NOT_FOUND,
                    "PRESENTATION_NOT_FOUND",
                    "presentation not found",
                ),
                DomainError::ScheduleNotFound => ApiError::new(
                    StatusCode::NOT_FOUND,
                    "SCHEDULE_NOT_FOUND",
                    "schedule not found",
                ),
                DomainError::RegistrationNotFound => ApiError::new(
                    StatusCode::NOT_FOUND,
                    "REGISTRATION_NOT_FOUND",
                    "registration not found",
                ),
                DomainError::EmailAlreadyRegistered => ApiError::new(
                    StatusCode::CONFLICT,
                    "EMAIL_EXISTS",
                    "email already registered",
                ),
                DomainError::RoomNameTaken => ApiError::new(
                    StatusCode::CONFLICT,
                    "ROOM_NAME_TAKEN",
                    "room name already taken",
                ),
                DomainError::PresentationAlreadyScheduled => ApiError::new(
                    StatusCode::CONFLICT,
                    "ALREADY_SCHEDULED",
                    "presentation already has a schedule",
                ),
                DomainError::ScheduleConflict => ApiError::new(
                    StatusCode::CONFLICT,
                    "SCHEDULE_CONFLICT",
                    "schedule overlaps an existing booking in this room",
                ),
                DomainError::AlreadyRegistered => ApiError::new(
                    StatusCode::CONFLICT,
                    "ALREADY_REGISTERED",
                    "user is already registered for this schedule",
                ),
                DomainError::RoomFull => {
                    ApiError::new(StatusCode::CONFLICT, "ROOM_FULL", "room has no free seats")
                }
                DomainError::PresenterRoleRequired => ApiError::new(
                    StatusCode::BAD_REQUEST,
                    "PRESENTER_ROLE_REQUIRED",
                    "user does not have the presenter role",
                ),
                DomainError::InsufficientPermissions => ApiError::new(
                    StatusCode::FORBIDDEN,
                    "INSUFFICIENT_PERMISSIONS",
                    "insufficient permissions",
                ),
            },
            AppErr::Repository(repo_err) => match repo_err {
                domain::RepositoryError::NotFound => ApiError::new(
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    "requested resource not found",
                ),
                domain::RepositoryError::Conflict => {
                    ApiError::new(StatusCode::CONFLICT, "CONFLICT", "resource already exists")
                }
                domain::RepositoryError::Database(message) => {
                    tracing::error!(error = %message, "database failure");
                    ApiError::new(
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "DATABASE_ERROR",
                        "internal server error",
                    )
                }
            },
            AppErr::Password(err) => {
                tracing::error!(error = %err, "password hashing failure");
                ApiError::new(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "PASSWORD_ERROR",
                    "internal server error",
                )
            }
            AppErr::Token(token_err) => ApiError::from(token_err),
            AppErr::Authentication => ApiError::new(
                StatusCode::UNAUTHORIZED,
                "AUTHENTICATION_FAILED",
                "authentication failed",
            ),
        }
    }
}

impl From<TokenError> for ApiError {
    fn from(error: TokenError) -> Self {
        match error {
            TokenError::Expired => {
                ApiError::new(StatusCode::UNAUTHORIZED, "TOKEN_EXPIRED", "token has expired")
            }
            TokenError::Malformed => {
                ApiError::new(StatusCode::UNAUTHORIZED, "INVALID_TOKEN", "invalid token")
            }
            TokenError::Generation(message) => {
                tracing::error!(error = %message, "token generation failure");
                ApiError::new(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "TOKEN_ERROR",
                    "internal server error",
                )
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}
