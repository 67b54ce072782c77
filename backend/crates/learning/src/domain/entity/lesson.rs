//! Lesson Entity
//!
//! `order` is dense `1..N` within a course. The store assigns it on append
//! and compacts it on delete.

use chrono::{DateTime, Utc};
use kernel::id::{CourseId, LessonId};

#[derive(Debug, Clone)]
pub struct Lesson {
    pub lesson_id: LessonId,
    pub course_id: CourseId,
    pub title: String,
    pub content: String,
    pub order: i32,
    pub duration_minutes: i32,
    /// Soft-delete flag; inactive lessons do not count toward progress
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Lesson {
    /// New active lesson; `order` is assigned when appended
    pub fn new(course_id: CourseId, title: String, content: String, duration_minutes: i32) -> Self {
        let now = Utc::now();
        Self {
            lesson_id: LessonId::new(),
            course_id,
            title,
            content,
            order: 0,
            duration_minutes,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    #[inline]
    pub fn belongs_to(&self, course_id: &CourseId) -> bool {
        self.course_id == *course_id
    }

    pub fn set_active(&mut self, is_active: bool) {
        self.is_active = is_active;
        self.updated_at = Utc::now();
    }
}
