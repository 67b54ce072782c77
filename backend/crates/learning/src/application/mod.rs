//! Application Layer
//!
//! Use cases and application services.

mod access;
pub mod complete_lesson;
pub mod config;
pub mod create_course;
pub mod delete_course;
pub mod edit_course;
pub mod enroll;
pub mod get_certificate;
pub mod get_course;
pub mod get_progress;
pub mod issue_certificate;
pub mod manage_lessons;
pub mod register_profile;
pub mod restrict_learner;
pub mod review_course;
pub mod set_thumbnail;
pub mod submit_course;
pub mod update_account;
pub mod verify_certificate;

// Re-exports
pub use complete_lesson::{CompleteLessonOutput, CompleteLessonUseCase};
pub use config::LearningConfig;
pub use create_course::{CreateCourseInput, CreateCourseUseCase};
pub use delete_course::DeleteCourseUseCase;
pub use edit_course::{EditCourseInput, EditCourseUseCase};
pub use enroll::EnrollUseCase;
pub use get_certificate::{GetCertificateUseCase, RenderedCertificate};
pub use get_course::{CourseView, GetCourseUseCase};
pub use get_progress::{GetProgressUseCase, ProgressOutput};
pub use issue_certificate::CertificateIssuer;
pub use manage_lessons::{
    AddLessonInput, AddLessonUseCase, DeleteLessonUseCase, EditLessonInput, EditLessonUseCase,
    SetLessonActiveUseCase,
};
pub use register_profile::{RegisterProfileInput, RegisterProfileUseCase};
pub use restrict_learner::RestrictLearnerUseCase;
pub use review_course::{ReviewCourseUseCase, ReviewDecision};
pub use set_thumbnail::SetThumbnailUseCase;
pub use submit_course::SubmitCourseUseCase;
pub use update_account::{UpdateAccountInput, UpdateAccountUseCase};
pub use verify_certificate::{SetCertificateValidityUseCase, VerifyCertificateUseCase};
