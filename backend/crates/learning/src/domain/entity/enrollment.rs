//! Enrollment Entity
//!
//! One record per (learner, course). Completed lessons are a set; the store
//! adds to it atomically and reports duplicates.

use chrono::{DateTime, Utc};
use kernel::id::{CourseId, EnrollmentId, LessonId, UserId};

use crate::domain::value_object::{Progress, SerialHash};

#[derive(Debug, Clone)]
pub struct Enrollment {
    pub enrollment_id: EnrollmentId,
    pub user_id: UserId,
    pub course_id: CourseId,
    pub enrolled_at: DateTime<Utc>,
    /// Last stored progress
    pub progress: Progress,
    pub completed_lessons: Vec<LessonId>,
    pub certificate_issued: bool,
    pub certificate_hash: Option<SerialHash>,
}

impl Enrollment {
    pub fn new(user_id: UserId, course_id: CourseId) -> Self {
        Self {
            enrollment_id: EnrollmentId::new(),
            user_id,
            course_id,
            enrolled_at: Utc::now(),
            progress: Progress::ZERO,
            completed_lessons: Vec::new(),
            certificate_issued: false,
            certificate_hash: None,
        }
    }

    #[inline]
    pub fn has_completed(&self, lesson_id: &LessonId) -> bool {
        self.completed_lessons.contains(lesson_id)
    }
}
