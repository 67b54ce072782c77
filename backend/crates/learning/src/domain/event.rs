//! Domain Events

use chrono::{DateTime, Utc};
use kernel::id::{CourseId, EnrollmentId, UserId};

/// An enrollment reached 100% progress without a certificate
///
/// Consumed by the certificate issuer. Emitted again on the
/// certificate read path when an earlier issuance attempt failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CourseCompleted {
    pub enrollment_id: EnrollmentId,
    pub learner_id: UserId,
    pub course_id: CourseId,
    pub completed_at: DateTime<Utc>,
}
