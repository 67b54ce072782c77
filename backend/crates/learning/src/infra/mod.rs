//! Infrastructure Layer
//!
//! Database implementations, the in-memory store and certificate rendering.

pub mod html_renderer;
pub mod memory;
pub mod postgres;

pub use html_renderer::HtmlCertificateRenderer;
pub use memory::InMemoryLearningRepository;
pub use postgres::PgLearningRepository;
