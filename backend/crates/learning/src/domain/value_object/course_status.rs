//! Course Status Value Object
//!
//! The moderation workflow is a single transition table
//! (`status × action → status`). Every status change in the crate goes
//! through [`CourseStatus::apply`].
//!
//! | from \ action  | Submit    | Approve   | Reject   | EditContent    |
//! |----------------|-----------|-----------|----------|----------------|
//! | draft          | submitted | -         | -        | draft          |
//! | submitted      | -         | published | rejected | submitted      |
//! | published      | -         | -         | -        | pending_review |
//! | rejected       | submitted | -         | -        | draft          |
//! | pending_review | -         | published | rejected | pending_review |

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{LearningError, LearningResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(i16)]
pub enum CourseStatus {
    #[default]
    Draft = 0,
    Submitted = 1,
    Published = 2,
    Rejected = 3,
    /// Published course whose content changed since the last review
    PendingReview = 4,
}

/// Moderation actions driving [`CourseStatus`] transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModerationAction {
    Submit,
    Approve,
    Reject,
    /// Core content edit (course fields, lesson add/edit/reactivate)
    EditContent,
}

impl CourseStatus {
    /// Apply `action`, returning the next status
    pub fn apply(self, action: ModerationAction) -> LearningResult<CourseStatus> {
        use CourseStatus::*;
        use ModerationAction::*;

        let next = match (self, action) {
            (Draft | Rejected, Submit) => Submitted,
            (Submitted | PendingReview, Approve) => Published,
            (Submitted | PendingReview, Reject) => Rejected,
            (Published | PendingReview, EditContent) => PendingReview,
            (Draft | Rejected, EditContent) => Draft,
            (Submitted, EditContent) => Submitted,
            (from, action) => return Err(LearningError::InvalidTransition { from, action }),
        };

        Ok(next)
    }

    /// Visible and enrollable by learners
    #[inline]
    pub const fn is_live(&self) -> bool {
        matches!(self, CourseStatus::Published | CourseStatus::PendingReview)
    }

    /// Status reported on the learner-facing read path
    ///
    /// Re-review is administrative: a live course keeps reading as `published`.
    #[inline]
    pub const fn learner_facing(&self) -> CourseStatus {
        match self {
            CourseStatus::PendingReview => CourseStatus::Published,
            other => *other,
        }
    }

    #[inline]
    pub const fn id(&self) -> i16 {
        *self as i16
    }

    #[inline]
    pub const fn code(&self) -> &'static str {
        match self {
            CourseStatus::Draft => "draft",
            CourseStatus::Submitted => "submitted",
            CourseStatus::Published => "published",
            CourseStatus::Rejected => "rejected",
            CourseStatus::PendingReview => "pending_review",
        }
    }

    pub fn from_id(id: i16) -> Option<Self> {
        match id {
            0 => Some(CourseStatus::Draft),
            1 => Some(CourseStatus::Submitted),
            2 => Some(CourseStatus::Published),
            3 => Some(CourseStatus::Rejected),
            4 => Some(CourseStatus::PendingReview),
            _ => None,
        }
    }
}

impl ModerationAction {
    #[inline]
    pub const fn code(&self) -> &'static str {
        match self {
            ModerationAction::Submit => "submit",
            ModerationAction::Approve => "approve",
            ModerationAction::Reject => "reject",
            ModerationAction::EditContent => "edit",
        }
    }
}

impl fmt::Display for CourseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl fmt::Display for ModerationAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
