//! Certificate Entity
//!
//! Immutable completion record. The snapshot fields are fixed at issuance
//! and never follow later edits of the learner or the course. `is_valid`
//! is the only mutable field (admin invalidation).

use chrono::{DateTime, Utc};
use kernel::id::{CertificateId, CourseId, UserId};

use crate::domain::renderer::CertificateDocument;
use crate::domain::value_object::SerialHash;

#[derive(Debug, Clone)]
pub struct Certificate {
    pub certificate_id: CertificateId,
    pub learner_id: UserId,
    pub course_id: CourseId,
    pub serial_hash: SerialHash,
    pub learner_name: String,
    pub course_title: String,
    /// Active lessons at issuance
    pub total_lessons: i32,
    /// Sum of active lesson durations at issuance, in minutes
    pub course_duration_minutes: i32,
    pub grade: String,
    /// Course creator's display name at issuance
    pub issued_by_name: String,
    pub issued_at: DateTime<Utc>,
    pub is_valid: bool,
}

impl Certificate {
    /// Data handed to the renderer
    pub fn document(&self) -> CertificateDocument {
        CertificateDocument {
            learner_name: self.learner_name.clone(),
            course_title: self.course_title.clone(),
            course_duration_minutes: self.course_duration_minutes,
            total_lessons: self.total_lessons,
            completion_date: self.issued_at.date_naive(),
            serial_hash: self.serial_hash.to_string(),
            grade: self.grade.clone(),
            issued_by_name: self.issued_by_name.clone(),
        }
    }
}
