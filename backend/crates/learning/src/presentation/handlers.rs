//! HTTP Handlers

use axum::Json;
use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::IntoResponse;
use kernel::id::{CourseId, LessonId, UserId};
use platform::blob::BlobStore;
use platform::token::{TokenError, TokenVerifier};
use std::sync::Arc;

use crate::application::config::LearningConfig;
use crate::application::{
    AddLessonInput, AddLessonUseCase, CertificateIssuer, CompleteLessonUseCase, CourseView,
    CreateCourseInput, CreateCourseUseCase, DeleteCourseUseCase, DeleteLessonUseCase,
    EditCourseInput, EditCourseUseCase, EditLessonInput, EditLessonUseCase, EnrollUseCase,
    GetCertificateUseCase, GetCourseUseCase, GetProgressUseCase, RegisterProfileInput,
    RegisterProfileUseCase,
    RestrictLearnerUseCase, ReviewCourseUseCase, SetCertificateValidityUseCase,
    SetLessonActiveUseCase, SetThumbnailUseCase, SubmitCourseUseCase, UpdateAccountInput,
    UpdateAccountUseCase, VerifyCertificateUseCase,
};
use crate::domain::renderer::CertificateRenderer;
use crate::domain::repository::LearningStore;
use crate::error::LearningResult;
use crate::presentation::dto::{
    AddLessonRequest, CertificateResponse, CompleteLessonResponse, CourseResponse,
    CreateCourseRequest, EditCourseRequest, EditLessonRequest, EnrollResponse, LessonResponse,
    ProfileResponse, ProgressResponse, RegisterProfileRequest, RestrictLearnerRequest,
    RestrictLearnerResponse, ReviewCourseRequest, SetCertificateValidityRequest,
    SetLessonActiveRequest, UpdateAccountRequest,
};

/// Shared state for learning handlers
#[derive(Clone)]
pub struct LearningAppState<R, B>
where
    R: LearningStore,
    B: BlobStore + Clone + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub blobs: Arc<B>,
    pub tokens: Arc<TokenVerifier>,
    pub renderer: Arc<dyn CertificateRenderer>,
    pub config: Arc<LearningConfig>,
}

impl<R, B> LearningAppState<R, B>
where
    R: LearningStore,
    B: BlobStore + Clone + Send + Sync + 'static,
{
    /// Authenticated caller
    fn actor(&self, headers: &HeaderMap) -> LearningResult<UserId> {
        let claims = self.tokens.verify_headers(headers)?;
        Ok(UserId::from_uuid(claims.sub))
    }

    /// Caller if a bearer token is present; a malformed token is still rejected
    fn optional_actor(&self, headers: &HeaderMap) -> LearningResult<Option<UserId>> {
        match self.tokens.verify_headers(headers) {
            Ok(claims) => Ok(Some(UserId::from_uuid(claims.sub))),
            Err(TokenError::Missing) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn issuer(&self) -> CertificateIssuer<R> {
        CertificateIssuer::new(self.repo.clone(), self.config.clone())
    }
}

// ============================================================================
// Accounts
// ============================================================================

/// POST /api/profile
pub async fn register_profile<R, B>(
    State(state): State<LearningAppState<R, B>>,
    headers: HeaderMap,
    Json(req): Json<RegisterProfileRequest>,
) -> LearningResult<impl IntoResponse>
where
    R: LearningStore,
    B: BlobStore + Clone + Send + Sync + 'static,
{
    let subject = state.actor(&headers)?;
    let use_case = RegisterProfileUseCase::new(state.repo.clone(), state.config.clone());

    let input = RegisterProfileInput {
        display_name: req.display_name,
        email: req.email,
        role: req.role,
    };

    let user = use_case.execute(subject, input).await?;

    Ok((StatusCode::CREATED, Json(ProfileResponse::from(user))))
}

/// PUT /api/admin/users/{user_id}
pub async fn update_account<R, B>(
    State(state): State<LearningAppState<R, B>>,
    headers: HeaderMap,
    Path(user_id): Path<UserId>,
    Json(req): Json<UpdateAccountRequest>,
) -> LearningResult<Json<ProfileResponse>>
where
    R: LearningStore,
    B: BlobStore + Clone + Send + Sync + 'static,
{
    let admin_id = state.actor(&headers)?;
    let use_case = UpdateAccountUseCase::new(state.repo.clone());

    let input = UpdateAccountInput {
        status: req.status,
        role: req.role,
    };

    let user = use_case.execute(admin_id, user_id, input).await?;

    Ok(Json(ProfileResponse::from(user)))
}

// ============================================================================
// Courses
// ============================================================================

/// POST /api/courses
pub async fn create_course<R, B>(
    State(state): State<LearningAppState<R, B>>,
    headers: HeaderMap,
    Json(req): Json<CreateCourseRequest>,
) -> LearningResult<impl IntoResponse>
where
    R: LearningStore,
    B: BlobStore + Clone + Send + Sync + 'static,
{
    let creator_id = state.actor(&headers)?;
    let use_case = CreateCourseUseCase::new(state.repo.clone(), state.config.clone());

    let input = CreateCourseInput {
        title: req.title,
        description: req.description,
        category: req.category,
        level: req.level,
    };

    let course = use_case.execute(creator_id, input).await?;
    let response = CourseResponse::from(CourseView {
        course,
        lessons: Vec::new(),
        privileged: true,
    });

    Ok((StatusCode::CREATED, Json(response)))
}

/// GET /api/courses/{course_id}
///
/// Anonymous access is allowed for live courses.
pub async fn get_course<R, B>(
    State(state): State<LearningAppState<R, B>>,
    headers: HeaderMap,
    Path(course_id): Path<CourseId>,
) -> LearningResult<Json<CourseResponse>>
where
    R: LearningStore,
    B: BlobStore + Clone + Send + Sync + 'static,
{
    let viewer_id = state.optional_actor(&headers)?;
    let use_case = GetCourseUseCase::new(state.repo.clone());

    let view = use_case.execute(viewer_id, course_id).await?;

    Ok(Json(CourseResponse::from(view)))
}

/// PUT /api/courses/{course_id}
pub async fn edit_course<R, B>(
    State(state): State<LearningAppState<R, B>>,
    headers: HeaderMap,
    Path(course_id): Path<CourseId>,
    Json(req): Json<EditCourseRequest>,
) -> LearningResult<Json<CourseResponse>>
where
    R: LearningStore,
    B: BlobStore + Clone + Send + Sync + 'static,
{
    let actor_id = state.actor(&headers)?;
    let use_case = EditCourseUseCase::new(state.repo.clone(), state.config.clone());

    let input = EditCourseInput {
        title: req.title,
        description: req.description,
        category: req.category,
        level: req.level,
    };

    use_case.execute(actor_id, course_id, input).await?;

    course_view(&state, actor_id, course_id).await
}

/// DELETE /api/courses/{course_id}
pub async fn delete_course<R, B>(
    State(state): State<LearningAppState<R, B>>,
    headers: HeaderMap,
    Path(course_id): Path<CourseId>,
) -> LearningResult<StatusCode>
where
    R: LearningStore,
    B: BlobStore + Clone + Send + Sync + 'static,
{
    let actor_id = state.actor(&headers)?;
    let use_case = DeleteCourseUseCase::new(state.repo.clone(), state.blobs.clone());

    use_case.execute(actor_id, course_id).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// PUT /api/courses/{course_id}/thumbnail
///
/// The request body is the raw image; its type comes from `Content-Type`.
pub async fn set_thumbnail<R, B>(
    State(state): State<LearningAppState<R, B>>,
    headers: HeaderMap,
    Path(course_id): Path<CourseId>,
    body: Bytes,
) -> LearningResult<Json<CourseResponse>>
where
    R: LearningStore,
    B: BlobStore + Clone + Send + Sync + 'static,
{
    let actor_id = state.actor(&headers)?;
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .map(str::trim)
        .unwrap_or_default();

    let use_case = SetThumbnailUseCase::new(
        state.repo.clone(),
        state.blobs.clone(),
        state.config.clone(),
    );

    use_case.execute(actor_id, course_id, &body, content_type).await?;

    course_view(&state, actor_id, course_id).await
}

/// PUT /api/courses/{course_id}/submit
pub async fn submit_course<R, B>(
    State(state): State<LearningAppState<R, B>>,
    headers: HeaderMap,
    Path(course_id): Path<CourseId>,
) -> LearningResult<Json<CourseResponse>>
where
    R: LearningStore,
    B: BlobStore + Clone + Send + Sync + 'static,
{
    let actor_id = state.actor(&headers)?;
    let use_case = SubmitCourseUseCase::new(state.repo.clone());

    use_case.execute(actor_id, course_id).await?;

    course_view(&state, actor_id, course_id).await
}

/// PUT /api/admin/courses/{course_id}/review
pub async fn review_course<R, B>(
    State(state): State<LearningAppState<R, B>>,
    headers: HeaderMap,
    Path(course_id): Path<CourseId>,
    Json(req): Json<ReviewCourseRequest>,
) -> LearningResult<Json<CourseResponse>>
where
    R: LearningStore,
    B: BlobStore + Clone + Send + Sync + 'static,
{
    let admin_id = state.actor(&headers)?;
    let use_case = ReviewCourseUseCase::new(state.repo.clone(), state.config.clone());

    use_case
        .execute(admin_id, course_id, req.action, req.reason.as_deref())
        .await?;

    course_view(&state, admin_id, course_id).await
}

/// POST /api/courses/{course_id}/restrictions
pub async fn restrict_learner<R, B>(
    State(state): State<LearningAppState<R, B>>,
    headers: HeaderMap,
    Path(course_id): Path<CourseId>,
    Json(req): Json<RestrictLearnerRequest>,
) -> LearningResult<Json<RestrictLearnerResponse>>
where
    R: LearningStore,
    B: BlobStore + Clone + Send + Sync + 'static,
{
    let actor_id = state.actor(&headers)?;
    let use_case = RestrictLearnerUseCase::new(state.repo.clone());

    let newly_restricted = use_case.execute(actor_id, course_id, req.learner_id).await?;

    Ok(Json(RestrictLearnerResponse {
        learner_id: req.learner_id,
        newly_restricted,
    }))
}

async fn course_view<R, B>(
    state: &LearningAppState<R, B>,
    viewer_id: UserId,
    course_id: CourseId,
) -> LearningResult<Json<CourseResponse>>
where
    R: LearningStore,
    B: BlobStore + Clone + Send + Sync + 'static,
{
    let view = GetCourseUseCase::new(state.repo.clone())
        .execute(Some(viewer_id), course_id)
        .await?;
    Ok(Json(CourseResponse::from(view)))
}

// ============================================================================
// Lessons
// ============================================================================

/// POST /api/courses/{course_id}/lessons
pub async fn add_lesson<R, B>(
    State(state): State<LearningAppState<R, B>>,
    headers: HeaderMap,
    Path(course_id): Path<CourseId>,
    Json(req): Json<AddLessonRequest>,
) -> LearningResult<impl IntoResponse>
where
    R: LearningStore,
    B: BlobStore + Clone + Send + Sync + 'static,
{
    let actor_id = state.actor(&headers)?;
    let use_case = AddLessonUseCase::new(state.repo.clone(), state.config.clone());

    let input = AddLessonInput {
        title: req.title,
        content: req.content,
        duration_minutes: req.duration_minutes,
    };

    let lesson = use_case.execute(actor_id, course_id, input).await?;

    Ok((StatusCode::CREATED, Json(LessonResponse::from(lesson))))
}

/// PUT /api/courses/{course_id}/lessons/{lesson_id}
pub async fn edit_lesson<R, B>(
    State(state): State<LearningAppState<R, B>>,
    headers: HeaderMap,
    Path((course_id, lesson_id)): Path<(CourseId, LessonId)>,
    Json(req): Json<EditLessonRequest>,
) -> LearningResult<Json<LessonResponse>>
where
    R: LearningStore,
    B: BlobStore + Clone + Send + Sync + 'static,
{
    let actor_id = state.actor(&headers)?;
    let use_case = EditLessonUseCase::new(state.repo.clone(), state.config.clone());

    let input = EditLessonInput {
        title: req.title,
        content: req.content,
        duration_minutes: req.duration_minutes,
    };

    let lesson = use_case.execute(actor_id, course_id, lesson_id, input).await?;

    Ok(Json(LessonResponse::from(lesson)))
}

/// DELETE /api/courses/{course_id}/lessons/{lesson_id}
pub async fn delete_lesson<R, B>(
    State(state): State<LearningAppState<R, B>>,
    headers: HeaderMap,
    Path((course_id, lesson_id)): Path<(CourseId, LessonId)>,
) -> LearningResult<StatusCode>
where
    R: LearningStore,
    B: BlobStore + Clone + Send + Sync + 'static,
{
    let actor_id = state.actor(&headers)?;
    let use_case = DeleteLessonUseCase::new(state.repo.clone());

    use_case.execute(actor_id, course_id, lesson_id).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// PUT /api/courses/{course_id}/lessons/{lesson_id}/active
pub async fn set_lesson_active<R, B>(
    State(state): State<LearningAppState<R, B>>,
    headers: HeaderMap,
    Path((course_id, lesson_id)): Path<(CourseId, LessonId)>,
    Json(req): Json<SetLessonActiveRequest>,
) -> LearningResult<Json<LessonResponse>>
where
    R: LearningStore,
    B: BlobStore + Clone + Send + Sync + 'static,
{
    let actor_id = state.actor(&headers)?;
    let use_case = SetLessonActiveUseCase::new(state.repo.clone());

    let lesson = use_case
        .execute(actor_id, course_id, lesson_id, req.is_active)
        .await?;

    Ok(Json(LessonResponse::from(lesson)))
}

// ============================================================================
// Enrollment / Progress
// ============================================================================

/// POST /api/courses/{course_id}/enroll
pub async fn enroll<R, B>(
    State(state): State<LearningAppState<R, B>>,
    headers: HeaderMap,
    Path(course_id): Path<CourseId>,
) -> LearningResult<impl IntoResponse>
where
    R: LearningStore,
    B: BlobStore + Clone + Send + Sync + 'static,
{
    let learner_id = state.actor(&headers)?;
    let use_case = EnrollUseCase::new(state.repo.clone());

    let enrollment = use_case.execute(learner_id, course_id).await?;

    Ok((StatusCode::CREATED, Json(EnrollResponse::from(enrollment))))
}

/// POST /api/courses/{course_id}/lessons/{lesson_id}/complete
pub async fn complete_lesson<R, B>(
    State(state): State<LearningAppState<R, B>>,
    headers: HeaderMap,
    Path((course_id, lesson_id)): Path<(CourseId, LessonId)>,
) -> LearningResult<Json<CompleteLessonResponse>>
where
    R: LearningStore,
    B: BlobStore + Clone + Send + Sync + 'static,
{
    let learner_id = state.actor(&headers)?;
    let use_case = CompleteLessonUseCase::new(state.repo.clone(), state.issuer());

    let output = use_case.execute(learner_id, course_id, lesson_id).await?;

    Ok(Json(CompleteLessonResponse::from(output)))
}

/// GET /api/courses/{course_id}/progress
pub async fn get_progress<R, B>(
    State(state): State<LearningAppState<R, B>>,
    headers: HeaderMap,
    Path(course_id): Path<CourseId>,
) -> LearningResult<Json<ProgressResponse>>
where
    R: LearningStore,
    B: BlobStore + Clone + Send + Sync + 'static,
{
    let learner_id = state.actor(&headers)?;
    let use_case = GetProgressUseCase::new(state.repo.clone());

    let output = use_case.execute(learner_id, course_id).await?;

    Ok(Json(ProgressResponse::from(output)))
}

// ============================================================================
// Certificates
// ============================================================================

/// GET /api/courses/{course_id}/certificate
///
/// Returns the rendered certificate document.
pub async fn get_certificate<R, B>(
    State(state): State<LearningAppState<R, B>>,
    headers: HeaderMap,
    Path(course_id): Path<CourseId>,
) -> LearningResult<impl IntoResponse>
where
    R: LearningStore,
    B: BlobStore + Clone + Send + Sync + 'static,
{
    let learner_id = state.actor(&headers)?;
    let use_case =
        GetCertificateUseCase::new(state.repo.clone(), state.issuer(), state.renderer.clone());

    let rendered = use_case.execute(learner_id, course_id).await?;

    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, rendered.document.content_type)],
        rendered.document.bytes,
    ))
}

/// GET /api/certificates/{serial}
///
/// Public verification; no authentication required.
pub async fn verify_certificate<R, B>(
    State(state): State<LearningAppState<R, B>>,
    Path(serial): Path<String>,
) -> LearningResult<Json<CertificateResponse>>
where
    R: LearningStore,
    B: BlobStore + Clone + Send + Sync + 'static,
{
    let use_case = VerifyCertificateUseCase::new(state.repo.clone());

    let certificate = use_case.execute(&serial).await?;

    Ok(Json(CertificateResponse::from(certificate)))
}

/// PUT /api/admin/certificates/{serial}/validity
pub async fn set_certificate_validity<R, B>(
    State(state): State<LearningAppState<R, B>>,
    headers: HeaderMap,
    Path(serial): Path<String>,
    Json(req): Json<SetCertificateValidityRequest>,
) -> LearningResult<Json<CertificateResponse>>
where
    R: LearningStore,
    B: BlobStore + Clone + Send + Sync + 'static,
{
    let admin_id = state.actor(&headers)?;
    let use_case = SetCertificateValidityUseCase::new(state.repo.clone());

    let certificate = use_case.execute(admin_id, &serial, req.is_valid).await?;

    Ok(Json(CertificateResponse::from(certificate)))
}
