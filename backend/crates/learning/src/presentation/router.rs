//! Learning Router

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post, put},
};
use platform::blob::{BlobStore, FsBlobStore};
use platform::token::TokenVerifier;
use std::sync::Arc;

use crate::application::config::LearningConfig;
use crate::domain::renderer::CertificateRenderer;
use crate::domain::repository::LearningStore;
use crate::infra::html_renderer::HtmlCertificateRenderer;
use crate::infra::postgres::PgLearningRepository;
use crate::presentation::handlers::{self, LearningAppState};

/// Headroom over the thumbnail limit so the use case reports oversize bodies itself
const THUMBNAIL_BODY_SLACK: usize = 64 * 1024;

/// Create the Learning router with PostgreSQL, local blob storage and HTML certificates
pub fn learning_router(
    repo: PgLearningRepository,
    blobs: FsBlobStore,
    tokens: TokenVerifier,
    config: LearningConfig,
) -> Router {
    learning_router_generic(
        repo,
        blobs,
        tokens,
        Arc::new(HtmlCertificateRenderer::new()),
        config,
    )
}

/// Create a generic Learning router for any store, blob backend and renderer
pub fn learning_router_generic<R, B>(
    repo: R,
    blobs: B,
    tokens: TokenVerifier,
    renderer: Arc<dyn CertificateRenderer>,
    config: LearningConfig,
) -> Router
where
    R: LearningStore,
    B: BlobStore + Clone + Send + Sync + 'static,
{
    let thumbnail_limit = config.thumbnail_max_bytes + THUMBNAIL_BODY_SLACK;
    let state = LearningAppState {
        repo: Arc::new(repo),
        blobs: Arc::new(blobs),
        tokens: Arc::new(tokens),
        renderer,
        config: Arc::new(config),
    };

    Router::new()
        // Accounts
        .route("/profile", post(handlers::register_profile::<R, B>))
        .route("/admin/users/{user_id}", put(handlers::update_account::<R, B>))
        // Courses
        .route("/courses", post(handlers::create_course::<R, B>))
        .route(
            "/courses/{course_id}",
            get(handlers::get_course::<R, B>)
                .put(handlers::edit_course::<R, B>)
                .delete(handlers::delete_course::<R, B>),
        )
        .route(
            "/courses/{course_id}/thumbnail",
            put(handlers::set_thumbnail::<R, B>).layer(DefaultBodyLimit::max(thumbnail_limit)),
        )
        .route("/courses/{course_id}/submit", put(handlers::submit_course::<R, B>))
        .route(
            "/admin/courses/{course_id}/review",
            put(handlers::review_course::<R, B>),
        )
        .route(
            "/courses/{course_id}/restrictions",
            post(handlers::restrict_learner::<R, B>),
        )
        // Lessons
        .route("/courses/{course_id}/lessons", post(handlers::add_lesson::<R, B>))
        .route(
            "/courses/{course_id}/lessons/{lesson_id}",
            put(handlers::edit_lesson::<R, B>).delete(handlers::delete_lesson::<R, B>),
        )
        .route(
            "/courses/{course_id}/lessons/{lesson_id}/active",
            put(handlers::set_lesson_active::<R, B>),
        )
        // Enrollment / progress
        .route("/courses/{course_id}/enroll", post(handlers::enroll::<R, B>))
        .route(
            "/courses/{course_id}/lessons/{lesson_id}/complete",
            post(handlers::complete_lesson::<R, B>),
        )
        .route("/courses/{course_id}/progress", get(handlers::get_progress::<R, B>))
        // Certificates
        .route(
            "/courses/{course_id}/certificate",
            get(handlers::get_certificate::<R, B>),
        )
        .route("/certificates/{serial}", get(handlers::verify_certificate::<R, B>))
        .route(
            "/admin/certificates/{serial}/validity",
            put(handlers::set_certificate_validity::<R, B>),
        )
        .with_state(state)
}
