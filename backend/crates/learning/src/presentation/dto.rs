//! API DTOs (Data Transfer Objects)

use chrono::{DateTime, NaiveDate, Utc};
use kernel::id::{CourseId, LessonId, UserId};
use serde::{Deserialize, Serialize};

use crate::application::{CompleteLessonOutput, CourseView, ProgressOutput, ReviewDecision};
use crate::domain::entity::{Certificate, Enrollment, Lesson, User};
use crate::domain::value_object::{AccountStatus, CourseLevel, CourseStatus, UserRole};

// ============================================================================
// Accounts
// ============================================================================

/// Profile registration request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterProfileRequest {
    pub display_name: String,
    pub email: Option<String>,
    /// `learner` when omitted
    #[serde(default)]
    pub role: UserRole,
}

/// Admin account update request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAccountRequest {
    pub status: Option<AccountStatus>,
    pub role: Option<UserRole>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    pub user_id: UserId,
    pub display_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub role: UserRole,
    pub account_status: AccountStatus,
    pub created_at: DateTime<Utc>,
}

impl From<User> for ProfileResponse {
    fn from(user: User) -> Self {
        Self {
            user_id: user.user_id,
            display_name: user.display_name,
            email: user.email,
            role: user.user_role,
            account_status: user.account_status,
            created_at: user.created_at,
        }
    }
}

// ============================================================================
// Courses
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCourseRequest {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub level: CourseLevel,
}

/// Partial course edit; omitted fields are left unchanged
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditCourseRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub level: Option<CourseLevel>,
}

/// Admin review decision
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewCourseRequest {
    pub action: ReviewDecision,
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RestrictLearnerRequest {
    pub learner_id: UserId,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RestrictLearnerResponse {
    pub learner_id: UserId,
    /// False when the learner was already restricted
    pub newly_restricted: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct RatingResponse {
    pub average: f64,
    pub count: i64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseResponse {
    pub course_id: CourseId,
    pub creator_id: UserId,
    pub title: String,
    pub description: String,
    pub category: String,
    pub level: CourseLevel,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
    pub status: CourseStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rejection_reason: Option<String>,
    pub enrollment_count: i64,
    pub rating: RatingResponse,
    pub requires_reapproval: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modification_reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub lessons: Vec<LessonResponse>,
}

impl From<CourseView> for CourseResponse {
    fn from(view: CourseView) -> Self {
        let course = view.course;
        Self {
            course_id: course.course_id,
            creator_id: course.creator_id,
            title: course.title,
            description: course.description,
            category: course.category,
            level: course.level,
            thumbnail_url: course.thumbnail_url,
            status: course.status,
            rejection_reason: course.rejection_reason,
            enrollment_count: course.enrollment_count,
            rating: RatingResponse {
                average: course.rating_average,
                count: course.rating_count,
            },
            requires_reapproval: course.requires_reapproval,
            modification_reason: course.modification_reason,
            last_modified: course.last_modified,
            created_at: course.created_at,
            updated_at: course.updated_at,
            lessons: view.lessons.into_iter().map(LessonResponse::from).collect(),
        }
    }
}

// ============================================================================
// Lessons
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddLessonRequest {
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub duration_minutes: i32,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditLessonRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    pub duration_minutes: Option<i32>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetLessonActiveRequest {
    pub is_active: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonResponse {
    pub lesson_id: LessonId,
    pub title: String,
    pub content: String,
    pub order: i32,
    pub duration_minutes: i32,
    pub is_active: bool,
}

impl From<Lesson> for LessonResponse {
    fn from(lesson: Lesson) -> Self {
        Self {
            lesson_id: lesson.lesson_id,
            title: lesson.title,
            content: lesson.content,
            order: lesson.order,
            duration_minutes: lesson.duration_minutes,
            is_active: lesson.is_active,
        }
    }
}

// ============================================================================
// Enrollment / Progress
// ============================================================================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrollResponse {
    pub course_id: CourseId,
    pub enrolled_at: DateTime<Utc>,
}

impl From<Enrollment> for EnrollResponse {
    fn from(enrollment: Enrollment) -> Self {
        Self {
            course_id: enrollment.course_id,
            enrolled_at: enrollment.enrolled_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompleteLessonResponse {
    pub progress: u8,
    pub completed_lessons_count: u64,
    pub total_lessons: u64,
    pub certificate_issued: bool,
}

impl From<CompleteLessonOutput> for CompleteLessonResponse {
    fn from(output: CompleteLessonOutput) -> Self {
        Self {
            progress: output.progress.value(),
            completed_lessons_count: output.completed_lessons_count,
            total_lessons: output.total_lessons,
            certificate_issued: output.certificate_issued,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressResponse {
    pub total_lessons: u64,
    pub completed_lessons: Vec<LessonId>,
    pub progress: u8,
    pub enrolled_at: DateTime<Utc>,
    pub certificate_issued: bool,
}

impl From<ProgressOutput> for ProgressResponse {
    fn from(output: ProgressOutput) -> Self {
        Self {
            total_lessons: output.total_lessons,
            completed_lessons: output.completed_lessons,
            progress: output.progress.value(),
            enrolled_at: output.enrolled_at,
            certificate_issued: output.certificate_issued,
        }
    }
}

// ============================================================================
// Certificates
// ============================================================================

/// Public verification view of a certificate
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CertificateResponse {
    pub serial_hash: String,
    pub learner_name: String,
    pub course_title: String,
    pub course_duration_minutes: i32,
    pub total_lessons: i32,
    pub completion_date: NaiveDate,
    pub grade: String,
    pub issued_by_name: String,
    pub is_valid: bool,
}

impl From<Certificate> for CertificateResponse {
    fn from(certificate: Certificate) -> Self {
        Self {
            completion_date: certificate.issued_at.date_naive(),
            serial_hash: certificate.serial_hash.to_string(),
            learner_name: certificate.learner_name,
            course_title: certificate.course_title,
            course_duration_minutes: certificate.course_duration_minutes,
            total_lessons: certificate.total_lessons,
            grade: certificate.grade,
            issued_by_name: certificate.issued_by_name,
            is_valid: certificate.is_valid,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetCertificateValidityRequest {
    pub is_valid: bool,
}
