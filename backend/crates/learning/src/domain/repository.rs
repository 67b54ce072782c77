//! Repository Traits
//!
//! Interfaces for data persistence. Implementations are in the infra layer.
//! Method names are distinct across traits so one store type can implement
//! all of them without call-site ambiguity.

use kernel::id::{CourseId, EnrollmentId, LessonId, UserId};

use crate::domain::entity::{Certificate, Course, Enrollment, Lesson, User};
use crate::domain::value_object::{ProgressSnapshot, SerialHash};
use crate::error::LearningResult;

/// Aggregate over the active lessons of one course
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ActiveLessonStats {
    pub active_count: u64,
    pub total_duration_minutes: i64,
}

/// Account store
#[trait_variant::make(UserRepository: Send)]
pub trait LocalUserRepository {
    /// Create a profile; duplicate → `ProfileExists`
    async fn create_user(&self, user: &User) -> LearningResult<()>;

    async fn find_user(&self, user_id: &UserId) -> LearningResult<Option<User>>;

    /// Persist role and account status
    async fn update_user(&self, user: &User) -> LearningResult<()>;
}

/// Content store: courses
#[trait_variant::make(CourseRepository: Send)]
pub trait LocalCourseRepository {
    async fn create_course(&self, course: &Course) -> LearningResult<()>;

    async fn find_course(&self, course_id: &CourseId) -> LearningResult<Option<Course>>;

    /// Persist every field except `enrollment_count`
    async fn update_course(&self, course: &Course) -> LearningResult<()>;

    /// Delete a course with its lessons, enrollments and restrictions
    ///
    /// Issued certificates are kept.
    async fn delete_course(&self, course_id: &CourseId) -> LearningResult<()>;

    /// Recompute `enrollment_count` from the enrollment records
    async fn recount_enrollments(&self, course_id: &CourseId) -> LearningResult<i64>;

    /// Returns `false` if the learner was already restricted
    async fn restrict_learner(&self, course_id: &CourseId, user_id: &UserId) -> LearningResult<bool>;

    async fn is_learner_restricted(
        &self,
        course_id: &CourseId,
        user_id: &UserId,
    ) -> LearningResult<bool>;
}

/// Content store: lessons
#[trait_variant::make(LessonRepository: Send)]
pub trait LocalLessonRepository {
    /// Append with `order = max(order) + 1`; returns the stored lesson
    async fn append_lesson(&self, lesson: &Lesson) -> LearningResult<Lesson>;

    async fn find_lesson(&self, lesson_id: &LessonId) -> LearningResult<Option<Lesson>>;

    /// All lessons of a course ordered by `order`
    async fn list_lessons(&self, course_id: &CourseId) -> LearningResult<Vec<Lesson>>;

    /// Persist title, content, duration and active flag
    async fn update_lesson(&self, lesson: &Lesson) -> LearningResult<()>;

    /// Delete and decrement every later order, atomically
    async fn delete_lesson_compacting(&self, lesson: &Lesson) -> LearningResult<()>;

    async fn active_lesson_stats(&self, course_id: &CourseId) -> LearningResult<ActiveLessonStats>;
}

/// Account store: enrollments
#[trait_variant::make(EnrollmentRepository: Send)]
pub trait LocalEnrollmentRepository {
    /// Duplicate (learner, course) → `AlreadyEnrolled`
    async fn create_enrollment(&self, enrollment: &Enrollment) -> LearningResult<()>;

    async fn find_enrollment(
        &self,
        user_id: &UserId,
        course_id: &CourseId,
    ) -> LearningResult<Option<Enrollment>>;

    /// Add to the completed set and store the recomputed progress, atomically
    ///
    /// A lesson already in the set → `LessonAlreadyCompleted`, state unchanged.
    async fn record_completion(
        &self,
        enrollment_id: &EnrollmentId,
        lesson_id: &LessonId,
    ) -> LearningResult<ProgressSnapshot>;

    /// Current counts without writing
    async fn progress_snapshot(&self, enrollment_id: &EnrollmentId)
    -> LearningResult<ProgressSnapshot>;

    async fn mark_certificate_issued(
        &self,
        enrollment_id: &EnrollmentId,
        serial_hash: &SerialHash,
    ) -> LearningResult<()>;
}

/// Certificate store
#[trait_variant::make(CertificateRepository: Send)]
pub trait LocalCertificateRepository {
    /// Duplicate (learner, course) → `CertificateAlreadyIssued`,
    /// duplicate serial → `SerialHashCollision`
    async fn create_certificate(&self, certificate: &Certificate) -> LearningResult<()>;

    async fn find_certificate(
        &self,
        learner_id: &UserId,
        course_id: &CourseId,
    ) -> LearningResult<Option<Certificate>>;

    async fn find_certificate_by_serial(
        &self,
        serial_hash: &SerialHash,
    ) -> LearningResult<Option<Certificate>>;

    /// Returns `false` if no certificate has this serial
    async fn set_certificate_validity(
        &self,
        serial_hash: &SerialHash,
        is_valid: bool,
    ) -> LearningResult<bool>;
}

/// Every store the learning handlers need, behind one type
pub trait LearningStore:
    UserRepository
    + CourseRepository
    + LessonRepository
    + EnrollmentRepository
    + CertificateRepository
    + Clone
    + Send
    + Sync
    + 'static
{
}

impl<T> LearningStore for T where
    T: UserRepository
        + CourseRepository
        + LessonRepository
        + EnrollmentRepository
        + CertificateRepository
        + Clone
        + Send
        + Sync
        + 'static
{
}
