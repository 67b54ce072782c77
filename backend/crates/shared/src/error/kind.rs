//! Error classification shared by every learning surface.
//!
//! An [`ErrorKind`] fixes both the HTTP status and the stable taxonomy code
//! (`NOT_FOUND`, `CONFLICT`, ...) that clients branch on.

use serde::Serialize;

/// Failure class of an [`AppError`](super::app_error::AppError).
///
/// ```rust
/// use kernel::error::kind::ErrorKind;
///
/// let kind = ErrorKind::InvalidState;
/// assert_eq!(kind.status_code(), 422);
/// assert_eq!(kind.code(), "INVALID_STATE");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[non_exhaustive]
pub enum ErrorKind {
    /// Malformed input or a failed validation rule
    BadRequest,
    /// Missing or unverifiable bearer token
    Unauthorized,
    /// Caller lacks the right, or the account is not active
    Forbidden,
    NotFound,
    /// Duplicate enrollment, completion or certificate
    Conflict,
    /// Operation not allowed in the entity's current state
    InvalidState,
    InternalServerError,
    /// Store temporarily unreachable
    ServiceUnavailable,
}

impl ErrorKind {
    #[inline]
    pub const fn status_code(&self) -> u16 {
        match self {
            ErrorKind::BadRequest => 400,
            ErrorKind::Unauthorized => 401,
            ErrorKind::Forbidden => 403,
            ErrorKind::NotFound => 404,
            ErrorKind::Conflict => 409,
            ErrorKind::InvalidState => 422,
            ErrorKind::InternalServerError => 500,
            ErrorKind::ServiceUnavailable => 503,
        }
    }

    /// Taxonomy code carried in every error body.
    ///
    /// Store outages report `INTERNAL`; only the status tells them apart.
    #[inline]
    pub const fn code(&self) -> &'static str {
        match self {
            ErrorKind::BadRequest => "BAD_REQUEST",
            ErrorKind::Unauthorized => "UNAUTHORIZED",
            ErrorKind::Forbidden => "FORBIDDEN",
            ErrorKind::NotFound => "NOT_FOUND",
            ErrorKind::Conflict => "CONFLICT",
            ErrorKind::InvalidState => "INVALID_STATE",
            ErrorKind::InternalServerError | ErrorKind::ServiceUnavailable => "INTERNAL",
        }
    }

    /// Human-readable title used in problem bodies
    #[inline]
    pub const fn title(&self) -> &'static str {
        match self {
            ErrorKind::BadRequest => "Bad Request",
            ErrorKind::Unauthorized => "Unauthorized",
            ErrorKind::Forbidden => "Forbidden",
            ErrorKind::NotFound => "Not Found",
            ErrorKind::Conflict => "Conflict",
            ErrorKind::InvalidState => "Invalid State",
            ErrorKind::InternalServerError => "Internal Server Error",
            ErrorKind::ServiceUnavailable => "Service Unavailable",
        }
    }

    #[inline]
    pub const fn is_server_error(&self) -> bool {
        self.status_code() >= 500
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_taxonomy_statuses() {
        let table = [
            (ErrorKind::BadRequest, 400, "BAD_REQUEST"),
            (ErrorKind::Unauthorized, 401, "UNAUTHORIZED"),
            (ErrorKind::Forbidden, 403, "FORBIDDEN"),
            (ErrorKind::NotFound, 404, "NOT_FOUND"),
            (ErrorKind::Conflict, 409, "CONFLICT"),
            (ErrorKind::InvalidState, 422, "INVALID_STATE"),
            (ErrorKind::InternalServerError, 500, "INTERNAL"),
            (ErrorKind::ServiceUnavailable, 503, "INTERNAL"),
        ];
        for (kind, status, code) in table {
            assert_eq!(kind.status_code(), status, "{kind:?}");
            assert_eq!(kind.code(), code, "{kind:?}");
        }
    }

    #[test]
    fn test_only_5xx_are_server_errors() {
        assert!(!ErrorKind::Conflict.is_server_error());
        assert!(!ErrorKind::InvalidState.is_server_error());
        assert!(ErrorKind::InternalServerError.is_server_error());
        assert!(ErrorKind::ServiceUnavailable.is_server_error());
    }

    #[test]
    fn test_display_is_code() {
        assert_eq!(ErrorKind::InvalidState.to_string(), "INVALID_STATE");
    }
}
