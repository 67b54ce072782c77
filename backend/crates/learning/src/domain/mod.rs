//! Domain Layer
//!
//! Contains entities, value objects, events, the rendering contract and
//! repository traits.

pub mod entity;
pub mod event;
pub mod renderer;
pub mod repository;
pub mod value_object;

// Re-exports
pub use entity::{Certificate, Course, Enrollment, Lesson, User};
pub use event::CourseCompleted;
pub use renderer::{CertificateDocument, CertificateRenderer, RenderedDocument};
pub use repository::{
    ActiveLessonStats, CertificateRepository, CourseRepository, EnrollmentRepository,
    LearningStore, LessonRepository, UserRepository,
};
