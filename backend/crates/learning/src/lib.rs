//! Learning Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Entities, value objects, events, repository traits
//! - `application/` - Use cases and application services
//! - `infra/` - PostgreSQL and in-memory stores, certificate rendering
//! - `presentation/` - HTTP handlers, DTOs, router
//!
//! ## Features
//! - Enrollment with per-learner lesson completion and progress tracking
//! - Automatic, at-most-once certificate issuance on course completion
//! - Public certificate verification by serial hash
//! - Course moderation workflow (draft, submitted, published, rejected,
//!   pending review) with content-edit tracking on live courses
//!
//! ## Consistency Model
//! - Lesson completion and the progress it produces commit together
//! - One enrollment and at most one certificate per (learner, course),
//!   enforced by unique constraints in the store
//! - Lesson order within a course stays dense (1..n) across deletes

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

// Re-exports for convenience
pub use application::config::LearningConfig;
pub use error::{LearningError, LearningResult};
pub use infra::html_renderer::HtmlCertificateRenderer;
pub use infra::memory::InMemoryLearningRepository;
pub use infra::postgres::PgLearningRepository;
pub use presentation::router::learning_router;

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

// Convenience re-exports
pub mod config {
    pub use crate::application::config::*;
}

pub mod models {
    pub use crate::domain::entity::*;
    pub use crate::domain::value_object::*;
    pub use crate::presentation::dto::*;
}

pub mod handlers {
    pub use crate::presentation::handlers::*;
}

pub mod store {
    pub use crate::infra::memory::InMemoryLearningRepository as MemoryStore;
    pub use crate::infra::postgres::PgLearningRepository as PgStore;
}

pub mod router {
    pub use crate::presentation::router::*;
}

#[cfg(test)]
mod tests;
