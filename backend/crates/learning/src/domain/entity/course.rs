//! Course Entity
//!
//! Status changes only go through the moderation transition table
//! ([`CourseStatus::apply`]); the methods here add the side effects each
//! transition carries (rejection reason, re-approval flag).

use chrono::{DateTime, Utc};
use kernel::id::{CourseId, UserId};

use crate::domain::entity::user::User;
use crate::domain::value_object::{CourseLevel, CourseStatus, ModerationAction};
use crate::error::{LearningError, LearningResult};

#[derive(Debug, Clone)]
pub struct Course {
    pub course_id: CourseId,
    /// Owning creator
    pub creator_id: UserId,
    pub title: String,
    pub description: String,
    pub category: String,
    pub level: CourseLevel,
    /// Blob key of the current thumbnail
    pub thumbnail_key: Option<String>,
    pub thumbnail_url: Option<String>,
    pub status: CourseStatus,
    pub rejection_reason: Option<String>,
    /// Denormalized, recomputed by a full recount
    pub enrollment_count: i64,
    pub rating_average: f64,
    pub rating_count: i64,
    pub requires_reapproval: bool,
    pub modification_reason: Option<String>,
    pub last_modified: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Row version the copy was read at; the store bumps it on every update
    /// and refuses writes from a stale copy
    pub revision: i64,
}

impl Course {
    pub fn new(
        creator_id: UserId,
        title: String,
        description: String,
        category: String,
        level: CourseLevel,
    ) -> Self {
        let now = Utc::now();
        Self {
            course_id: CourseId::new(),
            creator_id,
            title,
            description,
            category,
            level,
            thumbnail_key: None,
            thumbnail_url: None,
            status: CourseStatus::Draft,
            rejection_reason: None,
            enrollment_count: 0,
            rating_average: 0.0,
            rating_count: 0,
            requires_reapproval: false,
            modification_reason: None,
            last_modified: None,
            created_at: now,
            updated_at: now,
            revision: 0,
        }
    }

    #[inline]
    pub fn is_owned_by(&self, user_id: &UserId) -> bool {
        self.creator_id == *user_id
    }

    /// Owner or admin
    #[inline]
    pub fn can_be_managed_by(&self, user: &User) -> bool {
        user.is_admin() || self.is_owned_by(&user.user_id)
    }

    #[inline]
    pub fn is_live(&self) -> bool {
        self.status.is_live()
    }

    /// Creators may not delete a live course that has learners
    #[inline]
    pub fn has_active_learners(&self) -> bool {
        self.is_live() && self.enrollment_count > 0
    }

    /// `draft | rejected` → `submitted`
    pub fn submit(&mut self, active_lessons: u64) -> LearningResult<()> {
        let next = self.status.apply(ModerationAction::Submit)?;

        if active_lessons == 0 {
            return Err(LearningError::InvalidState(
                "course must have at least one lesson".to_string(),
            ));
        }
        if self.thumbnail_url.is_none() {
            return Err(LearningError::InvalidState(
                "course must have a thumbnail".to_string(),
            ));
        }

        self.status = next;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// `submitted | pending_review` → `published`
    pub fn approve(&mut self) -> LearningResult<()> {
        self.status = self.status.apply(ModerationAction::Approve)?;
        self.rejection_reason = None;
        self.requires_reapproval = false;
        self.modification_reason = None;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// `submitted | pending_review` → `rejected`
    pub fn reject(&mut self, reason: String) -> LearningResult<()> {
        self.status = self.status.apply(ModerationAction::Reject)?;
        self.rejection_reason = Some(reason);
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Record a core content edit
    ///
    /// Live courses move to `pending_review` and are flagged for re-approval;
    /// rejected courses reset to `draft`.
    pub fn record_content_edit(&mut self, reason: impl Into<String>) -> LearningResult<()> {
        let previous = self.status;
        let next = previous.apply(ModerationAction::EditContent)?;
        let now = Utc::now();

        if next == CourseStatus::PendingReview {
            self.requires_reapproval = true;
            self.modification_reason = Some(reason.into());
            self.last_modified = Some(now);
        }
        if previous == CourseStatus::Rejected {
            self.rejection_reason = None;
        }

        self.status = next;
        self.updated_at = now;
        Ok(())
    }

    pub fn set_thumbnail(&mut self, key: String, url: String) {
        self.thumbnail_key = Some(key);
        self.thumbnail_url = Some(url);
        self.updated_at = Utc::now();
    }
}
