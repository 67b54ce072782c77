//! Domain Entities

pub mod certificate;
pub mod course;
pub mod enrollment;
pub mod lesson;
pub mod user;

pub use certificate::Certificate;
pub use course::Course;
pub use enrollment::Enrollment;
pub use lesson::Lesson;
pub use user::User;
