//! PostgreSQL Repository Implementations

use chrono::{DateTime, Utc};
use kernel::id::{CertificateId, CourseId, EnrollmentId, LessonId, UserId};
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::domain::entity::{Certificate, Course, Enrollment, Lesson, User};
use crate::domain::repository::{
    ActiveLessonStats, CertificateRepository, CourseRepository, EnrollmentRepository,
    LessonRepository, UserRepository,
};
use crate::domain::value_object::{
    AccountStatus, CourseLevel, CourseStatus, Progress, ProgressSnapshot, SerialHash, UserRole,
};
use crate::error::{LearningError, LearningResult, constraint};

/// PostgreSQL-backed learning repository
#[derive(Clone)]
pub struct PgLearningRepository {
    pool: PgPool,
}

impl PgLearningRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Lock the course row so lesson orders can be rewritten safely
    async fn lock_course(
        tx: &mut Transaction<'_, Postgres>,
        course_id: &CourseId,
    ) -> LearningResult<()> {
        sqlx::query_scalar::<_, Uuid>("SELECT course_id FROM courses WHERE course_id = $1 FOR UPDATE")
            .bind(course_id.as_uuid())
            .fetch_optional(&mut **tx)
            .await?
            .ok_or(LearningError::CourseNotFound)?;
        Ok(())
    }

    async fn snapshot_in(
        tx: &mut Transaction<'_, Postgres>,
        enrollment_id: &EnrollmentId,
        course_id: Uuid,
    ) -> LearningResult<ProgressSnapshot> {
        let (completed_active, total_active) = sqlx::query_as::<_, (i64, i64)>(
            r#"
            SELECT
                (SELECT COUNT(*)
                   FROM enrollment_lessons el
                   JOIN lessons l ON l.lesson_id = el.lesson_id
                  WHERE el.enrollment_id = $1
                    AND l.course_id = $2
                    AND l.is_active) AS completed_active,
                (SELECT COUNT(*)
                   FROM lessons
                  WHERE course_id = $2
                    AND is_active) AS total_active
            "#,
        )
        .bind(enrollment_id.as_uuid())
        .bind(course_id)
        .fetch_one(&mut **tx)
        .await?;

        Ok(ProgressSnapshot {
            completed_active: completed_active.max(0) as u64,
            total_active: total_active.max(0) as u64,
        })
    }
}

// ============================================================================
// User Repository Implementation
// ============================================================================

impl UserRepository for PgLearningRepository {
    async fn create_user(&self, user: &User) -> LearningResult<()> {
        sqlx::query(
            r#"
            INSERT INTO users (
                user_id,
                display_name,
                email,
                user_role,
                account_status,
                created_at,
                updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(user.user_id.as_uuid())
        .bind(&user.display_name)
        .bind(&user.email)
        .bind(user.user_role.id())
        .bind(user.account_status.id())
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if LearningError::is_unique_violation(&e, constraint::USER_PKEY) {
                LearningError::ProfileExists
            } else {
                e.into()
            }
        })?;

        Ok(())
    }

    async fn find_user(&self, user_id: &UserId) -> LearningResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT
                user_id,
                display_name,
                email,
                user_role,
                account_status,
                created_at,
                updated_at
            FROM users
            WHERE user_id = $1
            "#,
        )
        .bind(user_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.into_user()).transpose()
    }

    async fn update_user(&self, user: &User) -> LearningResult<()> {
        let updated = sqlx::query(
            r#"
            UPDATE users SET
                user_role = $2,
                account_status = $3,
                updated_at = $4
            WHERE user_id = $1
            "#,
        )
        .bind(user.user_id.as_uuid())
        .bind(user.user_role.id())
        .bind(user.account_status.id())
        .bind(user.updated_at)
        .execute(&self.pool)
        .await?
        .rows_affected();

        if updated == 0 {
            return Err(LearningError::UserNotFound);
        }
        Ok(())
    }
}

// ============================================================================
// Course Repository Implementation
// ============================================================================

impl CourseRepository for PgLearningRepository {
    async fn create_course(&self, course: &Course) -> LearningResult<()> {
        sqlx::query(
            r#"
            INSERT INTO courses (
                course_id,
                creator_id,
                title,
                description,
                category,
                level,
                thumbnail_key,
                thumbnail_url,
                status,
                rejection_reason,
                enrollment_count,
                rating_average,
                rating_count,
                requires_reapproval,
                modification_reason,
                last_modified,
                created_at,
                updated_at,
                revision
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, $19)
            "#,
        )
        .bind(course.course_id.as_uuid())
        .bind(course.creator_id.as_uuid())
        .bind(&course.title)
        .bind(&course.description)
        .bind(&course.category)
        .bind(course.level.id())
        .bind(&course.thumbnail_key)
        .bind(&course.thumbnail_url)
        .bind(course.status.id())
        .bind(&course.rejection_reason)
        .bind(course.enrollment_count)
        .bind(course.rating_average)
        .bind(course.rating_count)
        .bind(course.requires_reapproval)
        .bind(&course.modification_reason)
        .bind(course.last_modified)
        .bind(course.created_at)
        .bind(course.updated_at)
        .bind(course.revision)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_course(&self, course_id: &CourseId) -> LearningResult<Option<Course>> {
        let row = sqlx::query_as::<_, CourseRow>(
            r#"
            SELECT
                course_id,
                creator_id,
                title,
                description,
                category,
                level,
                thumbnail_key,
                thumbnail_url,
                status,
                rejection_reason,
                enrollment_count,
                rating_average,
                rating_count,
                requires_reapproval,
                modification_reason,
                last_modified,
                created_at,
                updated_at,
                revision
            FROM courses
            WHERE course_id = $1
            "#,
        )
        .bind(course_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.into_course()).transpose()
    }

    async fn update_course(&self, course: &Course) -> LearningResult<()> {
        let updated = sqlx::query(
            r#"
            UPDATE courses SET
                title = $2,
                description = $3,
                category = $4,
                level = $5,
                thumbnail_key = $6,
                thumbnail_url = $7,
                status = $8,
                rejection_reason = $9,
                rating_average = $10,
                rating_count = $11,
                requires_reapproval = $12,
                modification_reason = $13,
                last_modified = $14,
                updated_at = $15,
                revision = revision + 1
            WHERE course_id = $1 AND revision = $16
            "#,
        )
        .bind(course.course_id.as_uuid())
        .bind(&course.title)
        .bind(&course.description)
        .bind(&course.category)
        .bind(course.level.id())
        .bind(&course.thumbnail_key)
        .bind(&course.thumbnail_url)
        .bind(course.status.id())
        .bind(&course.rejection_reason)
        .bind(course.rating_average)
        .bind(course.rating_count)
        .bind(course.requires_reapproval)
        .bind(&course.modification_reason)
        .bind(course.last_modified)
        .bind(course.updated_at)
        .bind(course.revision)
        .execute(&self.pool)
        .await?
        .rows_affected();

        if updated == 0 {
            let exists = sqlx::query_scalar::<_, bool>(
                "SELECT EXISTS (SELECT 1 FROM courses WHERE course_id = $1)",
            )
            .bind(course.course_id.as_uuid())
            .fetch_one(&self.pool)
            .await?;

            return Err(if exists {
                LearningError::CourseModified
            } else {
                LearningError::CourseNotFound
            });
        }
        Ok(())
    }

    async fn delete_course(&self, course_id: &CourseId) -> LearningResult<()> {
        // Lessons, enrollments and restrictions cascade; certificates do not reference courses
        let deleted = sqlx::query("DELETE FROM courses WHERE course_id = $1")
            .bind(course_id.as_uuid())
            .execute(&self.pool)
            .await?
            .rows_affected();

        if deleted == 0 {
            return Err(LearningError::CourseNotFound);
        }
        Ok(())
    }

    async fn recount_enrollments(&self, course_id: &CourseId) -> LearningResult<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            r#"
            UPDATE courses SET
                enrollment_count = (SELECT COUNT(*) FROM enrollments WHERE course_id = $1)
            WHERE course_id = $1
            RETURNING enrollment_count
            "#,
        )
        .bind(course_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?
        .ok_or(LearningError::CourseNotFound)?;

        Ok(count)
    }

    async fn restrict_learner(&self, course_id: &CourseId, user_id: &UserId) -> LearningResult<bool> {
        let inserted = sqlx::query(
            r#"
            INSERT INTO course_restrictions (course_id, user_id, created_at)
            VALUES ($1, $2, $3)
            ON CONFLICT (course_id, user_id) DO NOTHING
            "#,
        )
        .bind(course_id.as_uuid())
        .bind(user_id.as_uuid())
        .bind(Utc::now())
        .execute(&self.pool)
        .await?
        .rows_affected();

        Ok(inserted == 1)
    }

    async fn is_learner_restricted(
        &self,
        course_id: &CourseId,
        user_id: &UserId,
    ) -> LearningResult<bool> {
        let restricted = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM course_restrictions WHERE course_id = $1 AND user_id = $2)",
        )
        .bind(course_id.as_uuid())
        .bind(user_id.as_uuid())
        .fetch_one(&self.pool)
        .await?;

        Ok(restricted)
    }
}

// ============================================================================
// Lesson Repository Implementation
// ============================================================================

impl LessonRepository for PgLearningRepository {
    async fn append_lesson(&self, lesson: &Lesson) -> LearningResult<Lesson> {
        let mut tx = self.pool.begin().await?;
        Self::lock_course(&mut tx, &lesson.course_id).await?;

        let order = sqlx::query_scalar::<_, i32>(
            r#"
            INSERT INTO lessons (
                lesson_id,
                course_id,
                title,
                content,
                lesson_order,
                duration_minutes,
                is_active,
                created_at,
                updated_at
            ) VALUES (
                $1, $2, $3, $4,
                (SELECT COALESCE(MAX(lesson_order), 0) + 1 FROM lessons WHERE course_id = $2),
                $5, $6, $7, $8
            )
            RETURNING lesson_order
            "#,
        )
        .bind(lesson.lesson_id.as_uuid())
        .bind(lesson.course_id.as_uuid())
        .bind(&lesson.title)
        .bind(&lesson.content)
        .bind(lesson.duration_minutes)
        .bind(lesson.is_active)
        .bind(lesson.created_at)
        .bind(lesson.updated_at)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(Lesson {
            order,
            ..lesson.clone()
        })
    }

    async fn find_lesson(&self, lesson_id: &LessonId) -> LearningResult<Option<Lesson>> {
        let row = sqlx::query_as::<_, LessonRow>(
            r#"
            SELECT
                lesson_id,
                course_id,
                title,
                content,
                lesson_order,
                duration_minutes,
                is_active,
                created_at,
                updated_at
            FROM lessons
            WHERE lesson_id = $1
            "#,
        )
        .bind(lesson_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(LessonRow::into_lesson))
    }

    async fn list_lessons(&self, course_id: &CourseId) -> LearningResult<Vec<Lesson>> {
        let rows = sqlx::query_as::<_, LessonRow>(
            r#"
            SELECT
                lesson_id,
                course_id,
                title,
                content,
                lesson_order,
                duration_minutes,
                is_active,
                created_at,
                updated_at
            FROM lessons
            WHERE course_id = $1
            ORDER BY lesson_order
            "#,
        )
        .bind(course_id.as_uuid())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(LessonRow::into_lesson).collect())
    }

    async fn update_lesson(&self, lesson: &Lesson) -> LearningResult<()> {
        let updated = sqlx::query(
            r#"
            UPDATE lessons SET
                title = $2,
                content = $3,
                duration_minutes = $4,
                is_active = $5,
                updated_at = $6
            WHERE lesson_id = $1
            "#,
        )
        .bind(lesson.lesson_id.as_uuid())
        .bind(&lesson.title)
        .bind(&lesson.content)
        .bind(lesson.duration_minutes)
        .bind(lesson.is_active)
        .bind(lesson.updated_at)
        .execute(&self.pool)
        .await?
        .rows_affected();

        if updated == 0 {
            return Err(LearningError::LessonNotFound);
        }
        Ok(())
    }

    async fn delete_lesson_compacting(&self, lesson: &Lesson) -> LearningResult<()> {
        let mut tx = self.pool.begin().await?;
        Self::lock_course(&mut tx, &lesson.course_id).await?;

        let removed_order = sqlx::query_scalar::<_, i32>(
            "DELETE FROM lessons WHERE lesson_id = $1 AND course_id = $2 RETURNING lesson_order",
        )
        .bind(lesson.lesson_id.as_uuid())
        .bind(lesson.course_id.as_uuid())
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(LearningError::LessonNotFound)?;

        // (course_id, lesson_order) uniqueness is checked at commit
        sqlx::query(
            r#"
            UPDATE lessons SET lesson_order = lesson_order - 1
            WHERE course_id = $1 AND lesson_order > $2
            "#,
        )
        .bind(lesson.course_id.as_uuid())
        .bind(removed_order)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(())
    }

    async fn active_lesson_stats(&self, course_id: &CourseId) -> LearningResult<ActiveLessonStats> {
        let (active_count, total_duration) = sqlx::query_as::<_, (i64, i64)>(
            r#"
            SELECT COUNT(*), COALESCE(SUM(duration_minutes), 0)::BIGINT
            FROM lessons
            WHERE course_id = $1 AND is_active
            "#,
        )
        .bind(course_id.as_uuid())
        .fetch_one(&self.pool)
        .await?;

        Ok(ActiveLessonStats {
            active_count: active_count.max(0) as u64,
            total_duration_minutes: total_duration,
        })
    }
}

// ============================================================================
// Enrollment Repository Implementation
// ============================================================================

impl EnrollmentRepository for PgLearningRepository {
    async fn create_enrollment(&self, enrollment: &Enrollment) -> LearningResult<()> {
        sqlx::query(
            r#"
            INSERT INTO enrollments (
                enrollment_id,
                user_id,
                course_id,
                enrolled_at,
                progress,
                certificate_issued,
                certificate_hash
            ) VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(enrollment.enrollment_id.as_uuid())
        .bind(enrollment.user_id.as_uuid())
        .bind(enrollment.course_id.as_uuid())
        .bind(enrollment.enrolled_at)
        .bind(i16::from(enrollment.progress.value()))
        .bind(enrollment.certificate_issued)
        .bind(enrollment.certificate_hash.as_ref().map(|h| h.as_str()))
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if LearningError::is_unique_violation(&e, constraint::ENROLLMENT_USER_COURSE) {
                LearningError::AlreadyEnrolled
            } else {
                e.into()
            }
        })?;

        Ok(())
    }

    async fn find_enrollment(
        &self,
        user_id: &UserId,
        course_id: &CourseId,
    ) -> LearningResult<Option<Enrollment>> {
        let Some(row) = sqlx::query_as::<_, EnrollmentRow>(
            r#"
            SELECT
                enrollment_id,
                user_id,
                course_id,
                enrolled_at,
                progress,
                certificate_issued,
                certificate_hash
            FROM enrollments
            WHERE user_id = $1 AND course_id = $2
            "#,
        )
        .bind(user_id.as_uuid())
        .bind(course_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?
        else {
            return Ok(None);
        };

        let completed = sqlx::query_scalar::<_, Uuid>(
            r#"
            SELECT lesson_id
            FROM enrollment_lessons
            WHERE enrollment_id = $1
            ORDER BY completed_at
            "#,
        )
        .bind(row.enrollment_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(Some(row.into_enrollment(completed)))
    }

    async fn record_completion(
        &self,
        enrollment_id: &EnrollmentId,
        lesson_id: &LessonId,
    ) -> LearningResult<ProgressSnapshot> {
        let mut tx = self.pool.begin().await?;

        // Serializes completions of the same enrollment
        let course_id = sqlx::query_scalar::<_, Uuid>(
            "SELECT course_id FROM enrollments WHERE enrollment_id = $1 FOR UPDATE",
        )
        .bind(enrollment_id.as_uuid())
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(LearningError::EnrollmentNotFound)?;

        let inserted = sqlx::query(
            r#"
            INSERT INTO enrollment_lessons (enrollment_id, lesson_id, completed_at)
            VALUES ($1, $2, $3)
            ON CONFLICT (enrollment_id, lesson_id) DO NOTHING
            "#,
        )
        .bind(enrollment_id.as_uuid())
        .bind(lesson_id.as_uuid())
        .bind(Utc::now())
        .execute(&mut *tx)
        .await?
        .rows_affected();

        if inserted == 0 {
            // Dropping the transaction rolls it back
            return Err(LearningError::LessonAlreadyCompleted);
        }

        let snapshot = Self::snapshot_in(&mut tx, enrollment_id, course_id).await?;

        sqlx::query("UPDATE enrollments SET progress = $2 WHERE enrollment_id = $1")
            .bind(enrollment_id.as_uuid())
            .bind(i16::from(snapshot.progress().value()))
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(snapshot)
    }

    async fn progress_snapshot(
        &self,
        enrollment_id: &EnrollmentId,
    ) -> LearningResult<ProgressSnapshot> {
        let mut tx = self.pool.begin().await?;

        let course_id = sqlx::query_scalar::<_, Uuid>(
            "SELECT course_id FROM enrollments WHERE enrollment_id = $1",
        )
        .bind(enrollment_id.as_uuid())
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(LearningError::EnrollmentNotFound)?;

        let snapshot = Self::snapshot_in(&mut tx, enrollment_id, course_id).await?;
        tx.commit().await?;
        Ok(snapshot)
    }

    async fn mark_certificate_issued(
        &self,
        enrollment_id: &EnrollmentId,
        serial_hash: &SerialHash,
    ) -> LearningResult<()> {
        let updated = sqlx::query(
            r#"
            UPDATE enrollments SET
                certificate_issued = TRUE,
                certificate_hash = $2
            WHERE enrollment_id = $1
            "#,
        )
        .bind(enrollment_id.as_uuid())
        .bind(serial_hash.as_str())
        .execute(&self.pool)
        .await?
        .rows_affected();

        if updated == 0 {
            return Err(LearningError::EnrollmentNotFound);
        }
        Ok(())
    }
}

// ============================================================================
// Certificate Repository Implementation
// ============================================================================

impl CertificateRepository for PgLearningRepository {
    async fn create_certificate(&self, certificate: &Certificate) -> LearningResult<()> {
        sqlx::query(
            r#"
            INSERT INTO certificates (
                certificate_id,
                learner_id,
                course_id,
                serial_hash,
                learner_name,
                course_title,
                total_lessons,
                course_duration_minutes,
                grade,
                issued_by_name,
                issued_at,
                is_valid
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            "#,
        )
        .bind(certificate.certificate_id.as_uuid())
        .bind(certificate.learner_id.as_uuid())
        .bind(certificate.course_id.as_uuid())
        .bind(certificate.serial_hash.as_str())
        .bind(&certificate.learner_name)
        .bind(&certificate.course_title)
        .bind(certificate.total_lessons)
        .bind(certificate.course_duration_minutes)
        .bind(&certificate.grade)
        .bind(&certificate.issued_by_name)
        .bind(certificate.issued_at)
        .bind(certificate.is_valid)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if LearningError::is_unique_violation(&e, constraint::CERTIFICATE_LEARNER_COURSE) {
                LearningError::CertificateAlreadyIssued
            } else if LearningError::is_unique_violation(&e, constraint::CERTIFICATE_SERIAL) {
                LearningError::SerialHashCollision
            } else {
                e.into()
            }
        })?;

        Ok(())
    }

    async fn find_certificate(
        &self,
        learner_id: &UserId,
        course_id: &CourseId,
    ) -> LearningResult<Option<Certificate>> {
        let row = sqlx::query_as::<_, CertificateRow>(
            r#"
            SELECT
                certificate_id,
                learner_id,
                course_id,
                serial_hash,
                learner_name,
                course_title,
                total_lessons,
                course_duration_minutes,
                grade,
                issued_by_name,
                issued_at,
                is_valid
            FROM certificates
            WHERE learner_id = $1 AND course_id = $2
            "#,
        )
        .bind(learner_id.as_uuid())
        .bind(course_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(CertificateRow::into_certificate))
    }

    async fn find_certificate_by_serial(
        &self,
        serial_hash: &SerialHash,
    ) -> LearningResult<Option<Certificate>> {
        let row = sqlx::query_as::<_, CertificateRow>(
            r#"
            SELECT
                certificate_id,
                learner_id,
                course_id,
                serial_hash,
                learner_name,
                course_title,
                total_lessons,
                course_duration_minutes,
                grade,
                issued_by_name,
                issued_at,
                is_valid
            FROM certificates
            WHERE serial_hash = $1
            "#,
        )
        .bind(serial_hash.as_str())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(CertificateRow::into_certificate))
    }

    async fn set_certificate_validity(
        &self,
        serial_hash: &SerialHash,
        is_valid: bool,
    ) -> LearningResult<bool> {
        let updated = sqlx::query("UPDATE certificates SET is_valid = $2 WHERE serial_hash = $1")
            .bind(serial_hash.as_str())
            .bind(is_valid)
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok(updated == 1)
    }
}

// ============================================================================
// Row types
// ============================================================================

#[derive(sqlx::FromRow)]
struct UserRow {
    user_id: Uuid,
    display_name: String,
    email: Option<String>,
    user_role: i16,
    account_status: i16,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl UserRow {
    fn into_user(self) -> LearningResult<User> {
        let user_role = UserRole::from_id(self.user_role)
            .ok_or_else(|| LearningError::Internal(format!("Invalid user_role: {}", self.user_role)))?;

        Ok(User {
            user_id: UserId::from_uuid(self.user_id),
            display_name: self.display_name,
            email: self.email,
            user_role,
            account_status: AccountStatus::from_id(self.account_status).unwrap_or_default(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct CourseRow {
    course_id: Uuid,
    creator_id: Uuid,
    title: String,
    description: String,
    category: String,
    level: i16,
    thumbnail_key: Option<String>,
    thumbnail_url: Option<String>,
    status: i16,
    rejection_reason: Option<String>,
    enrollment_count: i64,
    rating_average: f64,
    rating_count: i64,
    requires_reapproval: bool,
    modification_reason: Option<String>,
    last_modified: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    revision: i64,
}

impl CourseRow {
    fn into_course(self) -> LearningResult<Course> {
        let status = CourseStatus::from_id(self.status)
            .ok_or_else(|| LearningError::Internal(format!("Invalid course status: {}", self.status)))?;

        Ok(Course {
            course_id: CourseId::from_uuid(self.course_id),
            creator_id: UserId::from_uuid(self.creator_id),
            title: self.title,
            description: self.description,
            category: self.category,
            level: CourseLevel::from_id(self.level).unwrap_or_default(),
            thumbnail_key: self.thumbnail_key,
            thumbnail_url: self.thumbnail_url,
            status,
            rejection_reason: self.rejection_reason,
            enrollment_count: self.enrollment_count,
            rating_average: self.rating_average,
            rating_count: self.rating_count,
            requires_reapproval: self.requires_reapproval,
            modification_reason: self.modification_reason,
            last_modified: self.last_modified,
            created_at: self.created_at,
            updated_at: self.updated_at,
            revision: self.revision,
        })
    }
}

#[derive(sqlx::FromRow)]
struct LessonRow {
    lesson_id: Uuid,
    course_id: Uuid,
    title: String,
    content: String,
    lesson_order: i32,
    duration_minutes: i32,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl LessonRow {
    fn into_lesson(self) -> Lesson {
        Lesson {
            lesson_id: LessonId::from_uuid(self.lesson_id),
            course_id: CourseId::from_uuid(self.course_id),
            title: self.title,
            content: self.content,
            order: self.lesson_order,
            duration_minutes: self.duration_minutes,
            is_active: self.is_active,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct EnrollmentRow {
    enrollment_id: Uuid,
    user_id: Uuid,
    course_id: Uuid,
    enrolled_at: DateTime<Utc>,
    progress: i16,
    certificate_issued: bool,
    certificate_hash: Option<String>,
}

impl EnrollmentRow {
    fn into_enrollment(self, completed_lessons: Vec<Uuid>) -> Enrollment {
        Enrollment {
            enrollment_id: EnrollmentId::from_uuid(self.enrollment_id),
            user_id: UserId::from_uuid(self.user_id),
            course_id: CourseId::from_uuid(self.course_id),
            enrolled_at: self.enrolled_at,
            progress: Progress::from_stored(self.progress),
            completed_lessons: completed_lessons.into_iter().map(LessonId::from_uuid).collect(),
            certificate_issued: self.certificate_issued,
            certificate_hash: self.certificate_hash.map(SerialHash::from_db),
        }
    }
}

#[derive(sqlx::FromRow)]
struct CertificateRow {
    certificate_id: Uuid,
    learner_id: Uuid,
    course_id: Uuid,
    serial_hash: String,
    learner_name: String,
    course_title: String,
    total_lessons: i32,
    course_duration_minutes: i32,
    grade: String,
    issued_by_name: String,
    issued_at: DateTime<Utc>,
    is_valid: bool,
}

impl CertificateRow {
    fn into_certificate(self) -> Certificate {
        Certificate {
            certificate_id: CertificateId::from_uuid(self.certificate_id),
            learner_id: UserId::from_uuid(self.learner_id),
            course_id: CourseId::from_uuid(self.course_id),
            serial_hash: SerialHash::from_db(self.serial_hash),
            learner_name: self.learner_name,
            course_title: self.course_title,
            total_lessons: self.total_lessons,
            course_duration_minutes: self.course_duration_minutes,
            grade: self.grade,
            issued_by_name: self.issued_by_name,
            issued_at: self.issued_at,
            is_valid: self.is_valid,
        }
    }
}
