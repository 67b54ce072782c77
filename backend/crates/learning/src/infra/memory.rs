//! In-Memory Repository Implementation
//!
//! Implements every learning repository trait over one mutex-guarded state.
//! Each operation runs under a single lock, which gives it the same
//! atomicity as the Postgres implementation's transactions.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use kernel::id::{CertificateId, CourseId, EnrollmentId, LessonId, UserId};
use tokio::sync::Mutex;

use crate::domain::entity::{Certificate, Course, Enrollment, Lesson, User};
use crate::domain::repository::{
    ActiveLessonStats, CertificateRepository, CourseRepository, EnrollmentRepository,
    LessonRepository, UserRepository,
};
use crate::domain::value_object::{ProgressSnapshot, SerialHash};
use crate::error::{LearningError, LearningResult};

#[derive(Default)]
struct MemoryState {
    users: HashMap<UserId, User>,
    courses: HashMap<CourseId, Course>,
    lessons: HashMap<LessonId, Lesson>,
    restrictions: HashSet<(CourseId, UserId)>,
    enrollments: HashMap<EnrollmentId, Enrollment>,
    certificates: HashMap<CertificateId, Certificate>,
}

impl MemoryState {
    fn active_stats(&self, course_id: &CourseId) -> ActiveLessonStats {
        self.lessons
            .values()
            .filter(|l| l.course_id == *course_id && l.is_active)
            .fold(ActiveLessonStats::default(), |mut stats, l| {
                stats.active_count += 1;
                stats.total_duration_minutes += i64::from(l.duration_minutes);
                stats
            })
    }

    fn snapshot(&self, enrollment: &Enrollment) -> ProgressSnapshot {
        let completed_active = enrollment
            .completed_lessons
            .iter()
            .filter_map(|id| self.lessons.get(id))
            .filter(|l| l.course_id == enrollment.course_id && l.is_active)
            .count() as u64;

        ProgressSnapshot {
            completed_active,
            total_active: self.active_stats(&enrollment.course_id).active_count,
        }
    }
}

/// Repository kept in process memory
///
/// Clones share the same state. Used by tests and local experiments.
#[derive(Clone, Default)]
pub struct InMemoryLearningRepository {
    state: Arc<Mutex<MemoryState>>,
    fail_certificate_writes: Arc<AtomicBool>,
    forced_serial_collisions: Arc<AtomicUsize>,
}

impl InMemoryLearningRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `create_certificate` fail with an internal error while set
    pub fn fail_certificate_writes(&self, fail: bool) {
        self.fail_certificate_writes.store(fail, Ordering::SeqCst);
    }

    /// Make the next `count` certificate writes report a serial collision
    pub fn force_serial_collisions(&self, count: usize) {
        self.forced_serial_collisions.store(count, Ordering::SeqCst);
    }

    pub async fn certificate_count(&self) -> usize {
        self.state.lock().await.certificates.len()
    }

    fn take_forced_collision(&self) -> bool {
        self.forced_serial_collisions
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
    }
}

// ============================================================================
// User Repository Implementation
// ============================================================================

impl UserRepository for InMemoryLearningRepository {
    async fn create_user(&self, user: &User) -> LearningResult<()> {
        let mut state = self.state.lock().await;
        if state.users.contains_key(&user.user_id) {
            return Err(LearningError::ProfileExists);
        }
        state.users.insert(user.user_id, user.clone());
        Ok(())
    }

    async fn find_user(&self, user_id: &UserId) -> LearningResult<Option<User>> {
        Ok(self.state.lock().await.users.get(user_id).cloned())
    }

    async fn update_user(&self, user: &User) -> LearningResult<()> {
        let mut state = self.state.lock().await;
        let stored = state
            .users
            .get_mut(&user.user_id)
            .ok_or(LearningError::UserNotFound)?;
        stored.user_role = user.user_role;
        stored.account_status = user.account_status;
        stored.updated_at = user.updated_at;
        Ok(())
    }
}

// ============================================================================
// Course Repository Implementation
// ============================================================================

impl CourseRepository for InMemoryLearningRepository {
    async fn create_course(&self, course: &Course) -> LearningResult<()> {
        let mut state = self.state.lock().await;
        if !state.users.contains_key(&course.creator_id) {
            return Err(LearningError::UserNotFound);
        }
        state.courses.insert(course.course_id, course.clone());
        Ok(())
    }

    async fn find_course(&self, course_id: &CourseId) -> LearningResult<Option<Course>> {
        Ok(self.state.lock().await.courses.get(course_id).cloned())
    }

    async fn update_course(&self, course: &Course) -> LearningResult<()> {
        let mut state = self.state.lock().await;
        let stored = state
            .courses
            .get_mut(&course.course_id)
            .ok_or(LearningError::CourseNotFound)?;
        if stored.revision != course.revision {
            return Err(LearningError::CourseModified);
        }
        let enrollment_count = stored.enrollment_count;
        *stored = course.clone();
        stored.enrollment_count = enrollment_count;
        stored.revision += 1;
        Ok(())
    }

    async fn delete_course(&self, course_id: &CourseId) -> LearningResult<()> {
        let mut state = self.state.lock().await;
        if state.courses.remove(course_id).is_none() {
            return Err(LearningError::CourseNotFound);
        }
        state.lessons.retain(|_, l| l.course_id != *course_id);
        state.enrollments.retain(|_, e| e.course_id != *course_id);
        state.restrictions.retain(|(c, _)| c != course_id);
        Ok(())
    }

    async fn recount_enrollments(&self, course_id: &CourseId) -> LearningResult<i64> {
        let mut state = self.state.lock().await;
        let count = state
            .enrollments
            .values()
            .filter(|e| e.course_id == *course_id)
            .count() as i64;
        let course = state
            .courses
            .get_mut(course_id)
            .ok_or(LearningError::CourseNotFound)?;
        course.enrollment_count = count;
        Ok(count)
    }

    async fn restrict_learner(&self, course_id: &CourseId, user_id: &UserId) -> LearningResult<bool> {
        Ok(self.state.lock().await.restrictions.insert((*course_id, *user_id)))
    }

    async fn is_learner_restricted(
        &self,
        course_id: &CourseId,
        user_id: &UserId,
    ) -> LearningResult<bool> {
        Ok(self
            .state
            .lock()
            .await
            .restrictions
            .contains(&(*course_id, *user_id)))
    }
}

// ============================================================================
// Lesson Repository Implementation
// ============================================================================

impl LessonRepository for InMemoryLearningRepository {
    async fn append_lesson(&self, lesson: &Lesson) -> LearningResult<Lesson> {
        let mut state = self.state.lock().await;
        if !state.courses.contains_key(&lesson.course_id) {
            return Err(LearningError::CourseNotFound);
        }
        let max_order = state
            .lessons
            .values()
            .filter(|l| l.course_id == lesson.course_id)
            .map(|l| l.order)
            .max()
            .unwrap_or(0);

        let mut stored = lesson.clone();
        stored.order = max_order + 1;
        state.lessons.insert(stored.lesson_id, stored.clone());
        Ok(stored)
    }

    async fn find_lesson(&self, lesson_id: &LessonId) -> LearningResult<Option<Lesson>> {
        Ok(self.state.lock().await.lessons.get(lesson_id).cloned())
    }

    async fn list_lessons(&self, course_id: &CourseId) -> LearningResult<Vec<Lesson>> {
        let state = self.state.lock().await;
        let mut lessons: Vec<Lesson> = state
            .lessons
            .values()
            .filter(|l| l.course_id == *course_id)
            .cloned()
            .collect();
        lessons.sort_by_key(|l| l.order);
        Ok(lessons)
    }

    async fn update_lesson(&self, lesson: &Lesson) -> LearningResult<()> {
        let mut state = self.state.lock().await;
        let stored = state
            .lessons
            .get_mut(&lesson.lesson_id)
            .ok_or(LearningError::LessonNotFound)?;
        stored.title = lesson.title.clone();
        stored.content = lesson.content.clone();
        stored.duration_minutes = lesson.duration_minutes;
        stored.is_active = lesson.is_active;
        stored.updated_at = lesson.updated_at;
        Ok(())
    }

    async fn delete_lesson_compacting(&self, lesson: &Lesson) -> LearningResult<()> {
        let mut state = self.state.lock().await;
        let removed = state
            .lessons
            .remove(&lesson.lesson_id)
            .ok_or(LearningError::LessonNotFound)?;

        for other in state.lessons.values_mut() {
            if other.course_id == removed.course_id && other.order > removed.order {
                other.order -= 1;
            }
        }
        for enrollment in state.enrollments.values_mut() {
            enrollment.completed_lessons.retain(|id| *id != removed.lesson_id);
        }
        Ok(())
    }

    async fn active_lesson_stats(&self, course_id: &CourseId) -> LearningResult<ActiveLessonStats> {
        Ok(self.state.lock().await.active_stats(course_id))
    }
}

// ============================================================================
// Enrollment Repository Implementation
// ============================================================================

impl EnrollmentRepository for InMemoryLearningRepository {
    async fn create_enrollment(&self, enrollment: &Enrollment) -> LearningResult<()> {
        let mut state = self.state.lock().await;
        let duplicate = state
            .enrollments
            .values()
            .any(|e| e.user_id == enrollment.user_id && e.course_id == enrollment.course_id);
        if duplicate {
            return Err(LearningError::AlreadyEnrolled);
        }
        state
            .enrollments
            .insert(enrollment.enrollment_id, enrollment.clone());
        Ok(())
    }

    async fn find_enrollment(
        &self,
        user_id: &UserId,
        course_id: &CourseId,
    ) -> LearningResult<Option<Enrollment>> {
        Ok(self
            .state
            .lock()
            .await
            .enrollments
            .values()
            .find(|e| e.user_id == *user_id && e.course_id == *course_id)
            .cloned())
    }

    async fn record_completion(
        &self,
        enrollment_id: &EnrollmentId,
        lesson_id: &LessonId,
    ) -> LearningResult<ProgressSnapshot> {
        let mut state = self.state.lock().await;
        let mut enrollment = state
            .enrollments
            .get(enrollment_id)
            .cloned()
            .ok_or(LearningError::EnrollmentNotFound)?;

        if enrollment.has_completed(lesson_id) {
            return Err(LearningError::LessonAlreadyCompleted);
        }
        enrollment.completed_lessons.push(*lesson_id);

        let snapshot = state.snapshot(&enrollment);
        enrollment.progress = snapshot.progress();
        state.enrollments.insert(*enrollment_id, enrollment);
        Ok(snapshot)
    }

    async fn progress_snapshot(
        &self,
        enrollment_id: &EnrollmentId,
    ) -> LearningResult<ProgressSnapshot> {
        let state = self.state.lock().await;
        let enrollment = state
            .enrollments
            .get(enrollment_id)
            .ok_or(LearningError::EnrollmentNotFound)?;
        Ok(state.snapshot(enrollment))
    }

    async fn mark_certificate_issued(
        &self,
        enrollment_id: &EnrollmentId,
        serial_hash: &SerialHash,
    ) -> LearningResult<()> {
        let mut state = self.state.lock().await;
        let enrollment = state
            .enrollments
            .get_mut(enrollment_id)
            .ok_or(LearningError::EnrollmentNotFound)?;
        enrollment.certificate_issued = true;
        enrollment.certificate_hash = Some(serial_hash.clone());
        Ok(())
    }
}

// ============================================================================
// Certificate Repository Implementation
// ============================================================================

impl CertificateRepository for InMemoryLearningRepository {
    async fn create_certificate(&self, certificate: &Certificate) -> LearningResult<()> {
        if self.fail_certificate_writes.load(Ordering::SeqCst) {
            return Err(LearningError::Internal("certificate store unavailable".to_string()));
        }

        let mut state = self.state.lock().await;
        let issued = state.certificates.values().any(|c| {
            c.learner_id == certificate.learner_id && c.course_id == certificate.course_id
        });
        if issued {
            return Err(LearningError::CertificateAlreadyIssued);
        }

        if self.take_forced_collision()
            || state
                .certificates
                .values()
                .any(|c| c.serial_hash == certificate.serial_hash)
        {
            return Err(LearningError::SerialHashCollision);
        }

        state
            .certificates
            .insert(certificate.certificate_id, certificate.clone());
        Ok(())
    }

    async fn find_certificate(
        &self,
        learner_id: &UserId,
        course_id: &CourseId,
    ) -> LearningResult<Option<Certificate>> {
        Ok(self
            .state
            .lock()
            .await
            .certificates
            .values()
            .find(|c| c.learner_id == *learner_id && c.course_id == *course_id)
            .cloned())
    }

    async fn find_certificate_by_serial(
        &self,
        serial_hash: &SerialHash,
    ) -> LearningResult<Option<Certificate>> {
        Ok(self
            .state
            .lock()
            .await
            .certificates
            .values()
            .find(|c| c.serial_hash == *serial_hash)
            .cloned())
    }

    async fn set_certificate_validity(
        &self,
        serial_hash: &SerialHash,
        is_valid: bool,
    ) -> LearningResult<bool> {
        let mut state = self.state.lock().await;
        match state
            .certificates
            .values_mut()
            .find(|c| c.serial_hash == *serial_hash)
        {
            Some(certificate) => {
                certificate.is_valid = is_valid;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
