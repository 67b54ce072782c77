//! Learning Error Types
//!
//! Learning-specific error variants that integrate with the unified
//! `kernel::error::AppError` system. Every variant maps to one stable
//! taxonomy code (`NOT_FOUND`, `CONFLICT`, `FORBIDDEN`, `INVALID_STATE`,
//! `INTERNAL`, `BAD_REQUEST`, `UNAUTHORIZED`).

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use platform::blob::BlobError;
use platform::token::TokenError;
use thiserror::Error;

use crate::domain::value_object::account_status::AccountStatus;
use crate::domain::value_object::course_status::{CourseStatus, ModerationAction};

/// Learning-specific result type alias
pub type LearningResult<T> = Result<T, LearningError>;

/// Unique constraint names the store reports on duplicate writes
pub(crate) mod constraint {
    pub const USER_PKEY: &str = "users_pkey";
    pub const ENROLLMENT_USER_COURSE: &str = "enrollments_user_course_key";
    pub const CERTIFICATE_LEARNER_COURSE: &str = "certificates_learner_course_key";
    pub const CERTIFICATE_SERIAL: &str = "certificates_serial_hash_key";
}

/// Learning-specific error variants
#[derive(Debug, Error)]
pub enum LearningError {
    #[error("User not found")]
    UserNotFound,

    #[error("Course not found")]
    CourseNotFound,

    #[error("Lesson not found")]
    LessonNotFound,

    #[error("Enrollment not found")]
    EnrollmentNotFound,

    #[error("Certificate not found")]
    CertificateNotFound,

    /// The subject already registered a profile
    #[error("Profile already exists")]
    ProfileExists,

    #[error("Already enrolled in this course")]
    AlreadyEnrolled,

    #[error("Lesson already completed")]
    LessonAlreadyCompleted,

    /// Course row changed between read and write
    #[error("Course was modified concurrently")]
    CourseModified,

    /// Lost the (learner, course) uniqueness race on issuance
    #[error("Certificate already issued for this course")]
    CertificateAlreadyIssued,

    /// Duplicate serial hash; the issuer retries once before giving up
    #[error("Certificate serial hash collision")]
    SerialHashCollision,

    /// Acting account is not `active`
    #[error("{}", .0.user_message())]
    AccountInactive(AccountStatus),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Moderation transition not in the table
    #[error("Cannot {action} a course in status {from}")]
    InvalidTransition {
        from: CourseStatus,
        action: ModerationAction,
    },

    #[error("{0}")]
    InvalidState(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Authentication required: {0}")]
    Unauthenticated(String),

    #[error("Blob store error: {0}")]
    Blob(#[from] BlobError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl LearningError {
    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        use LearningError::*;
        match self {
            UserNotFound | CourseNotFound | LessonNotFound | EnrollmentNotFound
            | CertificateNotFound => ErrorKind::NotFound,
            ProfileExists | AlreadyEnrolled | LessonAlreadyCompleted | CourseModified
            | CertificateAlreadyIssued => ErrorKind::Conflict,
            AccountInactive(_) | Forbidden(_) => ErrorKind::Forbidden,
            InvalidTransition { .. } | InvalidState(_) => ErrorKind::InvalidState,
            Validation(_) => ErrorKind::BadRequest,
            Unauthenticated(_) => ErrorKind::Unauthorized,
            Database(sqlx::Error::PoolTimedOut) => ErrorKind::ServiceUnavailable,
            SerialHashCollision | Blob(_) | Database(_) | Internal(_) => {
                ErrorKind::InternalServerError
            }
        }
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.kind().status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    /// Stable taxonomy code
    pub fn code(&self) -> &'static str {
        self.kind().code()
    }

    /// Convert to AppError
    ///
    /// Server-side failures get a generic message so store details stay in the logs.
    pub fn to_app_error(&self) -> AppError {
        let kind = self.kind();
        if kind.is_server_error() {
            return AppError::new(kind, "Something went wrong on our side")
                .with_action("Please retry later");
        }

        let err = AppError::new(kind, self.to_string());
        match self {
            LearningError::AccountInactive(_) => err.with_action("Contact support"),
            LearningError::Unauthenticated(_) => {
                err.with_action("Send a valid `Authorization: Bearer` token")
            }
            _ => err,
        }
    }

    /// Log the error with appropriate level
    pub(crate) fn log(&self) {
        match self {
            LearningError::Database(e) => {
                tracing::error!(error = %e, "Learning database error");
            }
            LearningError::Blob(e) => {
                tracing::error!(error = %e, "Learning blob store error");
            }
            LearningError::Internal(msg) => {
                tracing::error!(message = %msg, "Learning internal error");
            }
            LearningError::SerialHashCollision => {
                tracing::error!("Certificate serial collision escaped the issuer");
            }
            LearningError::AccountInactive(status) => {
                tracing::warn!(account_status = %status, "Inactive account attempted an action");
            }
            LearningError::Forbidden(reason) => {
                tracing::warn!(reason = %reason, "Forbidden learning operation");
            }
            _ => {
                tracing::debug!(error = %self, code = self.code(), "Learning error");
            }
        }
    }

    /// True when `err` is a unique violation of `constraint`
    pub(crate) fn is_unique_violation(err: &sqlx::Error, constraint: &str) -> bool {
        match err {
            sqlx::Error::Database(db_err) => {
                db_err.code().as_deref() == Some("23505") && db_err.constraint() == Some(constraint)
            }
            _ => false,
        }
    }
}

impl IntoResponse for LearningError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}

impl From<AppError> for LearningError {
    fn from(err: AppError) -> Self {
        LearningError::Internal(err.to_string())
    }
}

impl From<TokenError> for LearningError {
    fn from(err: TokenError) -> Self {
        LearningError::Unauthenticated(err.to_string())
    }
}
