//! Scenario tests for the learning crate
//! Runs the use cases end to end over the in-memory store.

#[cfg(test)]
mod support {
    use std::sync::Arc;

    use kernel::id::{CourseId, LessonId, UserId};

    use crate::application::config::LearningConfig;
    use crate::application::{
        AddLessonInput, AddLessonUseCase, CertificateIssuer, CompleteLessonOutput,
        CompleteLessonUseCase, CreateCourseInput, CreateCourseUseCase, EnrollUseCase,
        GetCertificateUseCase, RenderedCertificate, ReviewCourseUseCase, ReviewDecision,
        SubmitCourseUseCase,
    };
    use crate::domain::entity::User;
    use crate::domain::repository::{CourseRepository, UserRepository};
    use crate::domain::value_object::{CourseLevel, UserRole};
    use crate::error::LearningResult;
    use crate::infra::html_renderer::HtmlCertificateRenderer;
    use crate::infra::memory::InMemoryLearningRepository;

    pub struct World {
        pub repo: Arc<InMemoryLearningRepository>,
        pub config: Arc<LearningConfig>,
        pub admin: UserId,
        pub creator: UserId,
    }

    impl World {
        pub async fn new() -> Self {
            let world = Self {
                repo: Arc::new(InMemoryLearningRepository::new()),
                config: Arc::new(LearningConfig::default()),
                admin: UserId::new(),
                creator: UserId::new(),
            };
            world.insert_user(world.admin, "Admin", UserRole::Admin).await;
            world.insert_user(world.creator, "Grace Hopper", UserRole::Creator).await;
            world
        }

        pub async fn insert_user(&self, user_id: UserId, name: &str, role: UserRole) {
            let user = User::new(user_id, name.to_string(), None, role);
            self.repo.create_user(&user).await.unwrap();
        }

        pub async fn learner(&self, name: &str) -> UserId {
            let user_id = UserId::new();
            self.insert_user(user_id, name, UserRole::Learner).await;
            user_id
        }

        pub async fn draft_course(&self, lessons: usize) -> (CourseId, Vec<LessonId>) {
            let course = CreateCourseUseCase::new(self.repo.clone(), self.config.clone())
                .execute(
                    self.creator,
                    CreateCourseInput {
                        title: "Intro to Rust".to_string(),
                        description: "Ownership and borrowing".to_string(),
                        category: "programming".to_string(),
                        level: CourseLevel::Beginner,
                    },
                )
                .await
                .unwrap();

            let add = AddLessonUseCase::new(self.repo.clone(), self.config.clone());
            let mut lesson_ids = Vec::with_capacity(lessons);
            for i in 1..=lessons {
                let lesson = add
                    .execute(
                        self.creator,
                        course.course_id,
                        AddLessonInput {
                            title: format!("Lesson {i}"),
                            content: format!("Content {i}"),
                            duration_minutes: 10 * i as i32,
                        },
                    )
                    .await
                    .unwrap();
                lesson_ids.push(lesson.lesson_id);
            }

            (course.course_id, lesson_ids)
        }

        pub async fn attach_thumbnail(&self, course_id: CourseId) {
            let mut course = self.repo.find_course(&course_id).await.unwrap().unwrap();
            course.set_thumbnail(
                format!("thumbnails/{course_id}/cover.png"),
                format!("/files/thumbnails/{course_id}/cover.png"),
            );
            self.repo.update_course(&course).await.unwrap();
        }

        pub async fn submitted_course(&self, lessons: usize) -> (CourseId, Vec<LessonId>) {
            let (course_id, lesson_ids) = self.draft_course(lessons).await;
            self.attach_thumbnail(course_id).await;
            SubmitCourseUseCase::new(self.repo.clone())
                .execute(self.creator, course_id)
                .await
                .unwrap();
            (course_id, lesson_ids)
        }

        pub async fn published_course(&self, lessons: usize) -> (CourseId, Vec<LessonId>) {
            let (course_id, lesson_ids) = self.submitted_course(lessons).await;
            self.review(course_id, ReviewDecision::Approve, None)
                .await
                .unwrap();
            (course_id, lesson_ids)
        }

        pub async fn review(
            &self,
            course_id: CourseId,
            decision: ReviewDecision,
            reason: Option<&str>,
        ) -> LearningResult<crate::domain::entity::Course> {
            ReviewCourseUseCase::new(self.repo.clone(), self.config.clone())
                .execute(self.admin, course_id, decision, reason)
                .await
        }

        pub fn issuer(&self) -> CertificateIssuer<InMemoryLearningRepository> {
            CertificateIssuer::new(self.repo.clone(), self.config.clone())
        }

        pub async fn enroll(&self, learner: UserId, course_id: CourseId) {
            EnrollUseCase::new(self.repo.clone())
                .execute(learner, course_id)
                .await
                .unwrap();
        }

        pub async fn complete(
            &self,
            learner: UserId,
            course_id: CourseId,
            lesson_id: LessonId,
        ) -> LearningResult<CompleteLessonOutput> {
            CompleteLessonUseCase::new(self.repo.clone(), self.issuer())
                .execute(learner, course_id, lesson_id)
                .await
        }

        pub async fn certificate(
            &self,
            learner: UserId,
            course_id: CourseId,
        ) -> LearningResult<RenderedCertificate> {
            GetCertificateUseCase::new(
                self.repo.clone(),
                self.issuer(),
                Arc::new(HtmlCertificateRenderer::new()),
            )
            .execute(learner, course_id)
            .await
        }
    }
}

#[cfg(test)]
mod progress_tests {
    use super::support::World;
    use crate::application::{EnrollUseCase, GetProgressUseCase, SetLessonActiveUseCase};
    use crate::domain::repository::CourseRepository;
    use crate::error::LearningError;

    #[tokio::test]
    async fn test_progress_rounds_and_completes() {
        let world = World::new().await;
        let (course_id, lessons) = world.published_course(4).await;
        let learner = world.learner("Ada Lovelace").await;
        world.enroll(learner, course_id).await;

        let mut last = None;
        for (i, lesson_id) in lessons.iter().take(3).enumerate() {
            let output = world.complete(learner, course_id, *lesson_id).await.unwrap();
            assert_eq!(output.completed_lessons_count, i as u64 + 1);
            assert_eq!(output.total_lessons, 4);
            assert!(!output.certificate_issued);
            last = Some(output);
        }
        assert_eq!(last.unwrap().progress.value(), 75);

        let output = world.complete(learner, course_id, lessons[3]).await.unwrap();
        assert_eq!(output.progress.value(), 100);
        assert!(output.certificate_issued);

        let rendered = world.certificate(learner, course_id).await.unwrap();
        assert_eq!(rendered.certificate.learner_name, "Ada Lovelace");
        assert_eq!(rendered.certificate.course_title, "Intro to Rust");
        assert_eq!(rendered.certificate.issued_by_name, "Grace Hopper");
        assert_eq!(rendered.certificate.total_lessons, 4);
        assert_eq!(rendered.certificate.course_duration_minutes, 100);

        let html = String::from_utf8(rendered.document.bytes).unwrap();
        assert!(html.contains("Ada Lovelace"));
        assert!(html.contains(rendered.certificate.serial_hash.as_str()));
    }

    #[tokio::test]
    async fn test_progress_rounds_half_up() {
        let world = World::new().await;
        let (course_id, lessons) = world.published_course(3).await;
        let learner = world.learner("Ada").await;
        world.enroll(learner, course_id).await;

        let first = world.complete(learner, course_id, lessons[0]).await.unwrap();
        assert_eq!(first.progress.value(), 33);
        let second = world.complete(learner, course_id, lessons[1]).await.unwrap();
        assert_eq!(second.progress.value(), 67);
    }

    #[tokio::test]
    async fn test_completing_lesson_of_unenrolled_course_is_not_found() {
        let world = World::new().await;
        let (enrolled_course, _) = world.published_course(2).await;
        let (other_course, other_lessons) = world.published_course(2).await;
        let learner = world.learner("Ada").await;
        world.enroll(learner, enrolled_course).await;

        let err = world
            .complete(learner, other_course, other_lessons[0])
            .await
            .unwrap_err();
        assert!(matches!(err, LearningError::EnrollmentNotFound));
        assert_eq!(err.code(), "NOT_FOUND");

        // A lesson from another course is not found either
        let err = world
            .complete(learner, enrolled_course, other_lessons[0])
            .await
            .unwrap_err();
        assert!(matches!(err, LearningError::LessonNotFound));
    }

    #[tokio::test]
    async fn test_double_completion_conflicts_without_changing_state() {
        let world = World::new().await;
        let (course_id, lessons) = world.published_course(4).await;
        let learner = world.learner("Ada").await;
        world.enroll(learner, course_id).await;

        world.complete(learner, course_id, lessons[0]).await.unwrap();
        let err = world.complete(learner, course_id, lessons[0]).await.unwrap_err();
        assert!(matches!(err, LearningError::LessonAlreadyCompleted));
        assert_eq!(err.code(), "CONFLICT");

        let progress = GetProgressUseCase::new(world.repo.clone())
            .execute(learner, course_id)
            .await
            .unwrap();
        assert_eq!(progress.completed_lessons, vec![lessons[0]]);
        assert_eq!(progress.progress.value(), 25);
    }

    #[tokio::test]
    async fn test_concurrent_completions_are_all_counted() {
        let world = World::new().await;
        let (course_id, lessons) = world.published_course(4).await;
        let learner = world.learner("Ada").await;
        world.enroll(learner, course_id).await;

        let (a, b, c) = tokio::join!(
            world.complete(learner, course_id, lessons[0]),
            world.complete(learner, course_id, lessons[1]),
            world.complete(learner, course_id, lessons[2]),
        );
        a.unwrap();
        b.unwrap();
        c.unwrap();

        let progress = GetProgressUseCase::new(world.repo.clone())
            .execute(learner, course_id)
            .await
            .unwrap();
        assert_eq!(progress.completed_lessons.len(), 3);
        assert_eq!(progress.progress.value(), 75);
    }

    #[tokio::test]
    async fn test_deactivated_lesson_leaves_the_denominator() {
        let world = World::new().await;
        let (course_id, lessons) = world.published_course(4).await;
        let learner = world.learner("Ada").await;
        world.enroll(learner, course_id).await;
        world.complete(learner, course_id, lessons[0]).await.unwrap();
        world.complete(learner, course_id, lessons[1]).await.unwrap();

        let set_active = SetLessonActiveUseCase::new(world.repo.clone());
        let err = set_active
            .execute(world.creator, course_id, lessons[3], false)
            .await
            .unwrap_err();
        assert!(matches!(err, LearningError::Forbidden(_)));

        set_active
            .execute(world.admin, course_id, lessons[3], false)
            .await
            .unwrap();

        let progress = GetProgressUseCase::new(world.repo.clone())
            .execute(learner, course_id)
            .await
            .unwrap();
        assert_eq!(progress.total_lessons, 3);
        assert_eq!(progress.progress.value(), 67);

        // Inactive lessons cannot be completed
        let err = world.complete(learner, course_id, lessons[3]).await.unwrap_err();
        assert!(matches!(err, LearningError::LessonNotFound));
    }

    #[tokio::test]
    async fn test_enroll_rules() {
        let world = World::new().await;
        let (draft, _) = world.draft_course(1).await;
        let (course_id, _) = world.published_course(1).await;
        let learner = world.learner("Ada").await;
        let enroll = EnrollUseCase::new(world.repo.clone());

        let err = enroll.execute(learner, draft).await.unwrap_err();
        assert_eq!(err.code(), "INVALID_STATE");

        enroll.execute(learner, course_id).await.unwrap();
        let err = enroll.execute(learner, course_id).await.unwrap_err();
        assert!(matches!(err, LearningError::AlreadyEnrolled));

        let course = world.repo.find_course(&course_id).await.unwrap().unwrap();
        assert_eq!(course.enrollment_count, 1);
    }

    #[tokio::test]
    async fn test_progress_requires_enrollment() {
        let world = World::new().await;
        let (course_id, _) = world.published_course(1).await;
        let learner = world.learner("Ada").await;

        let err = GetProgressUseCase::new(world.repo.clone())
            .execute(learner, course_id)
            .await
            .unwrap_err();
        assert!(matches!(err, LearningError::EnrollmentNotFound));
    }
}

#[cfg(test)]
mod moderation_tests {
    use super::support::World;
    use crate::application::{
        DeleteCourseUseCase, EditCourseInput, EditCourseUseCase, EnrollUseCase, GetCourseUseCase,
        RestrictLearnerUseCase, ReviewDecision, SetThumbnailUseCase, SubmitCourseUseCase,
    };
    use crate::domain::repository::CourseRepository;
    use crate::domain::value_object::CourseStatus;
    use crate::error::LearningError;
    use platform::blob::FsBlobStore;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_submit_without_lessons_is_invalid_state() {
        let world = World::new().await;
        let (course_id, _) = world.draft_course(0).await;
        world.attach_thumbnail(course_id).await;

        let err = SubmitCourseUseCase::new(world.repo.clone())
            .execute(world.creator, course_id)
            .await
            .unwrap_err();
        assert_eq!(err.code(), "INVALID_STATE");
        assert!(err.to_string().contains("at least one lesson"));
    }

    #[tokio::test]
    async fn test_submit_requires_thumbnail() {
        let world = World::new().await;
        let (course_id, _) = world.draft_course(1).await;

        let err = SubmitCourseUseCase::new(world.repo.clone())
            .execute(world.creator, course_id)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("thumbnail"));
    }

    #[tokio::test]
    async fn test_reject_edit_resubmit() {
        let world = World::new().await;
        let (course_id, _) = world.submitted_course(2).await;

        let err = world
            .review(course_id, ReviewDecision::Reject, Some("  "))
            .await
            .unwrap_err();
        assert!(matches!(err, LearningError::Validation(_)));

        let course = world
            .review(course_id, ReviewDecision::Reject, Some("low audio quality"))
            .await
            .unwrap();
        assert_eq!(course.status, CourseStatus::Rejected);
        assert_eq!(course.rejection_reason.as_deref(), Some("low audio quality"));

        let course = EditCourseUseCase::new(world.repo.clone(), world.config.clone())
            .execute(
                world.creator,
                course_id,
                EditCourseInput {
                    description: Some("Re-recorded audio".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(course.status, CourseStatus::Draft);
        assert!(course.rejection_reason.is_none());

        let course = SubmitCourseUseCase::new(world.repo.clone())
            .execute(world.creator, course_id)
            .await
            .unwrap();
        assert_eq!(course.status, CourseStatus::Submitted);
        assert!(course.rejection_reason.is_none());
    }

    #[tokio::test]
    async fn test_editing_live_course_goes_pending_but_stays_enrollable() {
        let world = World::new().await;
        let (course_id, _) = world.published_course(2).await;
        let first = world.learner("Ada").await;
        world.enroll(first, course_id).await;

        let course = EditCourseUseCase::new(world.repo.clone(), world.config.clone())
            .execute(
                world.creator,
                course_id,
                EditCourseInput {
                    description: Some("Now with async".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(course.status, CourseStatus::PendingReview);
        assert!(course.requires_reapproval);
        assert_eq!(course.modification_reason.as_deref(), Some("updated description"));
        assert!(course.last_modified.is_some());

        let second = world.learner("Linus").await;
        EnrollUseCase::new(world.repo.clone())
            .execute(second, course_id)
            .await
            .unwrap();

        let get = GetCourseUseCase::new(world.repo.clone());
        let outside = get.execute(Some(second), course_id).await.unwrap();
        assert!(!outside.privileged);
        assert_eq!(outside.course.status, CourseStatus::Published);
        assert!(!outside.course.requires_reapproval);
        assert!(outside.course.modification_reason.is_none());

        let owner = get.execute(Some(world.creator), course_id).await.unwrap();
        assert!(owner.privileged);
        assert_eq!(owner.course.status, CourseStatus::PendingReview);

        let course = world
            .review(course_id, ReviewDecision::Approve, None)
            .await
            .unwrap();
        assert_eq!(course.status, CourseStatus::Published);
        assert!(!course.requires_reapproval);
        assert!(course.modification_reason.is_none());
    }

    #[tokio::test]
    async fn test_noop_edit_keeps_status() {
        let world = World::new().await;
        let (course_id, _) = world.published_course(1).await;

        let course = EditCourseUseCase::new(world.repo.clone(), world.config.clone())
            .execute(
                world.creator,
                course_id,
                EditCourseInput {
                    title: Some("Intro to Rust".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(course.status, CourseStatus::Published);
    }

    #[tokio::test]
    async fn test_invalid_transitions() {
        let world = World::new().await;
        let (course_id, _) = world.published_course(1).await;

        let err = SubmitCourseUseCase::new(world.repo.clone())
            .execute(world.creator, course_id)
            .await
            .unwrap_err();
        assert!(matches!(err, LearningError::InvalidTransition { .. }));

        let err = world
            .review(course_id, ReviewDecision::Approve, None)
            .await
            .unwrap_err();
        assert_eq!(err.code(), "INVALID_STATE");
    }

    #[tokio::test]
    async fn test_only_admins_review() {
        let world = World::new().await;
        let (course_id, _) = world.submitted_course(1).await;

        let err = crate::application::ReviewCourseUseCase::new(
            world.repo.clone(),
            world.config.clone(),
        )
        .execute(world.creator, course_id, ReviewDecision::Approve, None)
        .await
        .unwrap_err();
        assert!(matches!(err, LearningError::Forbidden(_)));
    }

    #[tokio::test]
    async fn test_outsiders_cannot_see_drafts_or_manage_courses() {
        let world = World::new().await;
        let (course_id, _) = world.draft_course(1).await;
        let learner = world.learner("Ada").await;

        let err = GetCourseUseCase::new(world.repo.clone())
            .execute(None, course_id)
            .await
            .unwrap_err();
        assert!(matches!(err, LearningError::CourseNotFound));

        let err = EditCourseUseCase::new(world.repo.clone(), world.config.clone())
            .execute(
                learner,
                course_id,
                EditCourseInput {
                    title: Some("Mine now".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, LearningError::Forbidden(_)));
    }

    #[tokio::test]
    async fn test_delete_live_course_with_learners() {
        let world = World::new().await;
        let (course_id, lessons) = world.published_course(1).await;
        let learner = world.learner("Ada").await;
        world.enroll(learner, course_id).await;
        world.complete(learner, course_id, lessons[0]).await.unwrap();

        let tmp = tempfile::tempdir().unwrap();
        let blobs = Arc::new(FsBlobStore::new(tmp.path(), "/files"));
        let delete = DeleteCourseUseCase::new(world.repo.clone(), blobs);

        let err = delete.execute(world.creator, course_id).await.unwrap_err();
        assert!(matches!(err, LearningError::Forbidden(_)));

        delete.execute(world.admin, course_id).await.unwrap();
        assert!(world.repo.find_course(&course_id).await.unwrap().is_none());

        // Certificates outlive the course
        assert_eq!(world.repo.certificate_count().await, 1);
    }

    #[tokio::test]
    async fn test_restricted_learner_cannot_enroll() {
        let world = World::new().await;
        let (course_id, _) = world.published_course(1).await;
        let learner = world.learner("Mallory").await;

        let restrict = RestrictLearnerUseCase::new(world.repo.clone());
        assert!(restrict.execute(world.creator, course_id, learner).await.unwrap());
        assert!(!restrict.execute(world.creator, course_id, learner).await.unwrap());

        let err = EnrollUseCase::new(world.repo.clone())
            .execute(learner, course_id)
            .await
            .unwrap_err();
        assert!(matches!(err, LearningError::Forbidden(_)));

        let err = restrict
            .execute(world.creator, course_id, world.creator)
            .await
            .unwrap_err();
        assert!(matches!(err, LearningError::Validation(_)));
    }

    #[tokio::test]
    async fn test_set_thumbnail_stores_blob_and_replaces_previous() {
        let world = World::new().await;
        let (course_id, _) = world.draft_course(1).await;
        let tmp = tempfile::tempdir().unwrap();
        let blobs = Arc::new(FsBlobStore::new(tmp.path(), "/files"));
        let set = SetThumbnailUseCase::new(world.repo.clone(), blobs, world.config.clone());

        let first = set
            .execute(world.creator, course_id, b"\x89PNG first", "image/png")
            .await
            .unwrap();
        let first_key = first.thumbnail_key.clone().unwrap();
        assert!(first_key.ends_with(".png"));
        assert_eq!(
            first.thumbnail_url.as_deref(),
            Some(format!("/files/{first_key}").as_str())
        );
        assert!(tmp.path().join(&first_key).exists());

        let second = set
            .execute(world.creator, course_id, b"jpeg bytes", "image/jpeg; charset=binary")
            .await
            .unwrap();
        let second_key = second.thumbnail_key.unwrap();
        assert!(second_key.ends_with(".jpg"));
        assert!(tmp.path().join(&second_key).exists());
        assert!(!tmp.path().join(&first_key).exists());

        let err = set
            .execute(world.creator, course_id, b"GIF89a", "image/gif")
            .await
            .unwrap_err();
        assert!(matches!(err, LearningError::Validation(_)));

        let err = set
            .execute(world.creator, course_id, b"", "image/png")
            .await
            .unwrap_err();
        assert!(matches!(err, LearningError::Validation(_)));
    }

    #[tokio::test]
    async fn test_stale_course_write_is_rejected() {
        let world = World::new().await;
        let (course_id, _) = world.submitted_course(1).await;

        // Edit read the course before the approval landed
        let mut stale = world.repo.find_course(&course_id).await.unwrap().unwrap();
        world.review(course_id, ReviewDecision::Approve, None).await.unwrap();

        stale.title = "Intro to Rust, 2nd edition".to_string();
        stale.record_content_edit("title").unwrap();
        let err = world.repo.update_course(&stale).await.unwrap_err();
        assert!(matches!(err, LearningError::CourseModified));
        assert_eq!(err.code(), "CONFLICT");

        let stored = world.repo.find_course(&course_id).await.unwrap().unwrap();
        assert_eq!(stored.status, CourseStatus::Published);
        assert_eq!(stored.title, "Intro to Rust");
    }

    #[tokio::test]
    async fn test_approval_does_not_overwrite_a_newer_edit() {
        let world = World::new().await;
        let (course_id, _) = world.submitted_course(1).await;

        let mut stale = world.repo.find_course(&course_id).await.unwrap().unwrap();
        EditCourseUseCase::new(world.repo.clone(), world.config.clone())
            .execute(
                world.creator,
                course_id,
                EditCourseInput {
                    title: Some("Intro to Rust, 2nd edition".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        stale.approve().unwrap();
        let err = world.repo.update_course(&stale).await.unwrap_err();
        assert!(matches!(err, LearningError::CourseModified));

        // A fresh read approves the edited course
        let approved = world.review(course_id, ReviewDecision::Approve, None).await.unwrap();
        assert_eq!(approved.status, CourseStatus::Published);
        assert_eq!(approved.title, "Intro to Rust, 2nd edition");
    }

    #[tokio::test]
    async fn test_each_stored_update_bumps_revision() {
        let world = World::new().await;
        let (course_id, _) = world.draft_course(1).await;
        let before = world.repo.find_course(&course_id).await.unwrap().unwrap();

        world.attach_thumbnail(course_id).await;
        let after = world.repo.find_course(&course_id).await.unwrap().unwrap();
        assert_eq!(after.revision, before.revision + 1);
    }
}

#[cfg(test)]
mod certificate_tests {
    use super::support::World;
    use crate::application::{
        GetProgressUseCase, SetCertificateValidityUseCase, VerifyCertificateUseCase,
    };
    use crate::domain::event::CourseCompleted;
    use crate::domain::repository::{CourseRepository, EnrollmentRepository, UserRepository};
    use crate::error::LearningError;
    use chrono::Utc;
    use kernel::id::{CourseId, LessonId, UserId};

    async fn half_completed(world: &World) -> (UserId, CourseId, Vec<LessonId>) {
        let (course_id, lessons) = world.published_course(2).await;
        let learner = world.learner("Ada").await;
        world.enroll(learner, course_id).await;
        world.complete(learner, course_id, lessons[0]).await.unwrap();
        (learner, course_id, lessons)
    }

    #[tokio::test]
    async fn test_certificate_not_available_before_completion() {
        let world = World::new().await;
        let (learner, course_id, _) = half_completed(&world).await;

        let err = world.certificate(learner, course_id).await.unwrap_err();
        assert!(matches!(err, LearningError::InvalidState(_)));
        assert!(err.to_string().contains("not yet issued"));
    }

    #[tokio::test]
    async fn test_issuance_failure_is_swallowed_then_retried_on_fetch() {
        let world = World::new().await;
        let (learner, course_id, lessons) = half_completed(&world).await;

        world.repo.fail_certificate_writes(true);
        let output = world.complete(learner, course_id, lessons[1]).await.unwrap();
        assert_eq!(output.progress.value(), 100);
        assert!(!output.certificate_issued);
        assert_eq!(world.repo.certificate_count().await, 0);

        // Still failing store surfaces as INTERNAL, not as "not yet issued"
        let err = world.certificate(learner, course_id).await.unwrap_err();
        assert_eq!(err.code(), "INTERNAL");
        assert!(!matches!(err, LearningError::InvalidState(_)));

        world.repo.fail_certificate_writes(false);
        let rendered = world.certificate(learner, course_id).await.unwrap();
        assert_eq!(rendered.certificate.learner_id, learner);

        let progress = GetProgressUseCase::new(world.repo.clone())
            .execute(learner, course_id)
            .await
            .unwrap();
        assert!(progress.certificate_issued);
    }

    #[tokio::test]
    async fn test_concurrent_issuance_yields_one_certificate() {
        let world = World::new().await;
        let (learner, course_id, _) = half_completed(&world).await;
        let enrollment = world
            .repo
            .find_enrollment(&learner, &course_id)
            .await
            .unwrap()
            .unwrap();
        let event = CourseCompleted {
            enrollment_id: enrollment.enrollment_id,
            learner_id: learner,
            course_id,
            completed_at: Utc::now(),
        };

        let issuer_a = world.issuer();
        let issuer_b = world.issuer();
        let (a, b) = tokio::join!(issuer_a.handle(&event), issuer_b.handle(&event));
        let (a, b) = (a.unwrap(), b.unwrap());

        assert_eq!(a.serial_hash, b.serial_hash);
        assert_eq!(world.repo.certificate_count().await, 1);

        let enrollment = world
            .repo
            .find_enrollment(&learner, &course_id)
            .await
            .unwrap()
            .unwrap();
        assert!(enrollment.certificate_issued);
        assert_eq!(enrollment.certificate_hash, Some(a.serial_hash));
    }

    #[tokio::test]
    async fn test_serial_collision_is_retried_once() {
        let world = World::new().await;
        let (learner, course_id, _) = half_completed(&world).await;

        world.repo.force_serial_collisions(1);
        let certificate = world.issuer().issue(&learner, &course_id).await.unwrap();
        assert_eq!(certificate.serial_hash.as_str().len(), 16);
        assert_eq!(world.repo.certificate_count().await, 1);
    }

    #[tokio::test]
    async fn test_persistent_serial_collision_is_internal() {
        let world = World::new().await;
        let (learner, course_id, _) = half_completed(&world).await;

        world.repo.force_serial_collisions(2);
        let err = world.issuer().issue(&learner, &course_id).await.unwrap_err();
        assert!(matches!(err, LearningError::Internal(_)));
        assert_eq!(err.code(), "INTERNAL");
        assert_eq!(world.repo.certificate_count().await, 0);
    }

    #[tokio::test]
    async fn test_snapshot_survives_later_edits() {
        let world = World::new().await;
        let (learner, course_id, lessons) = half_completed(&world).await;
        world.complete(learner, course_id, lessons[1]).await.unwrap();

        let mut course = world.repo.find_course(&course_id).await.unwrap().unwrap();
        course.title = "Renamed".to_string();
        world.repo.update_course(&course).await.unwrap();
        let mut user = world.repo.find_user(&learner).await.unwrap().unwrap();
        user.display_name = "Someone Else".to_string();
        world.repo.update_user(&user).await.unwrap();

        let rendered = world.certificate(learner, course_id).await.unwrap();
        assert_eq!(rendered.certificate.course_title, "Intro to Rust");
        assert_eq!(rendered.certificate.learner_name, "Ada");
    }

    #[tokio::test]
    async fn test_verify_and_invalidate() {
        let world = World::new().await;
        let (learner, course_id, lessons) = half_completed(&world).await;
        world.complete(learner, course_id, lessons[1]).await.unwrap();
        let serial = world
            .certificate(learner, course_id)
            .await
            .unwrap()
            .certificate
            .serial_hash;

        let verify = VerifyCertificateUseCase::new(world.repo.clone());
        let found = verify.execute(&serial.as_str().to_lowercase()).await.unwrap();
        assert!(found.is_valid);
        assert_eq!(found.learner_id, learner);

        let err = verify.execute("not-a-serial").await.unwrap_err();
        assert!(matches!(err, LearningError::CertificateNotFound));

        let set_validity = SetCertificateValidityUseCase::new(world.repo.clone());
        let err = set_validity
            .execute(world.creator, serial.as_str(), false)
            .await
            .unwrap_err();
        assert!(matches!(err, LearningError::Forbidden(_)));

        let invalidated = set_validity
            .execute(world.admin, serial.as_str(), false)
            .await
            .unwrap();
        assert!(!invalidated.is_valid);

        let err = world.certificate(learner, course_id).await.unwrap_err();
        assert!(err.to_string().contains("invalidated"));
        assert!(!verify.execute(serial.as_str()).await.unwrap().is_valid);
    }
}

#[cfg(test)]
mod lesson_order_tests {
    use super::support::World;
    use crate::application::{
        AddLessonInput, AddLessonUseCase, DeleteLessonUseCase, EditLessonInput, EditLessonUseCase,
    };
    use crate::domain::repository::{CourseRepository, LessonRepository};
    use crate::domain::value_object::CourseStatus;
    use crate::error::LearningError;

    #[tokio::test]
    async fn test_orders_stay_dense_after_deletes() {
        let world = World::new().await;
        let (course_id, lessons) = world.draft_course(4).await;

        let listed = world.repo.list_lessons(&course_id).await.unwrap();
        let orders: Vec<i32> = listed.iter().map(|l| l.order).collect();
        assert_eq!(orders, vec![1, 2, 3, 4]);

        let delete = DeleteLessonUseCase::new(world.repo.clone());
        delete.execute(world.creator, course_id, lessons[1]).await.unwrap();
        delete.execute(world.creator, course_id, lessons[0]).await.unwrap();

        let listed = world.repo.list_lessons(&course_id).await.unwrap();
        let ids: Vec<_> = listed.iter().map(|l| l.lesson_id).collect();
        let orders: Vec<i32> = listed.iter().map(|l| l.order).collect();
        assert_eq!(ids, vec![lessons[2], lessons[3]]);
        assert_eq!(orders, vec![1, 2]);

        let added = AddLessonUseCase::new(world.repo.clone(), world.config.clone())
            .execute(
                world.creator,
                course_id,
                AddLessonInput {
                    title: "Appendix".to_string(),
                    content: String::new(),
                    duration_minutes: 5,
                },
            )
            .await
            .unwrap();
        assert_eq!(added.order, 3);
    }

    #[tokio::test]
    async fn test_creator_cannot_delete_lessons_of_live_course() {
        let world = World::new().await;
        let (course_id, lessons) = world.published_course(2).await;

        let delete = DeleteLessonUseCase::new(world.repo.clone());
        let err = delete
            .execute(world.creator, course_id, lessons[0])
            .await
            .unwrap_err();
        assert!(matches!(err, LearningError::Forbidden(_)));

        delete.execute(world.admin, course_id, lessons[0]).await.unwrap();
        let course = world.repo.find_course(&course_id).await.unwrap().unwrap();
        assert_eq!(course.status, CourseStatus::Published);
    }

    #[tokio::test]
    async fn test_adding_lesson_to_live_course_requires_reapproval() {
        let world = World::new().await;
        let (course_id, _) = world.published_course(1).await;

        AddLessonUseCase::new(world.repo.clone(), world.config.clone())
            .execute(
                world.creator,
                course_id,
                AddLessonInput {
                    title: "Bonus".to_string(),
                    content: "More".to_string(),
                    duration_minutes: 15,
                },
            )
            .await
            .unwrap();

        let course = world.repo.find_course(&course_id).await.unwrap().unwrap();
        assert_eq!(course.status, CourseStatus::PendingReview);
        assert_eq!(course.modification_reason.as_deref(), Some("lesson added: Bonus"));
    }

    #[tokio::test]
    async fn test_edit_lesson_validates_and_scopes_to_course() {
        let world = World::new().await;
        let (course_id, lessons) = world.draft_course(1).await;
        let (other_course, _) = world.draft_course(1).await;
        let edit = EditLessonUseCase::new(world.repo.clone(), world.config.clone());

        let err = edit
            .execute(
                world.creator,
                course_id,
                lessons[0],
                EditLessonInput {
                    duration_minutes: Some(-1),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, LearningError::Validation(_)));

        let err = edit
            .execute(
                world.creator,
                other_course,
                lessons[0],
                EditLessonInput {
                    title: Some("Moved".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, LearningError::LessonNotFound));

        let lesson = edit
            .execute(
                world.creator,
                course_id,
                lessons[0],
                EditLessonInput {
                    title: Some("Renamed".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(lesson.title, "Renamed");
        assert_eq!(lesson.order, 1);
    }
}

#[cfg(test)]
mod account_tests {
    use super::support::World;
    use crate::application::{
        CreateCourseInput, CreateCourseUseCase, RegisterProfileInput, RegisterProfileUseCase,
        UpdateAccountInput, UpdateAccountUseCase,
    };
    use crate::domain::value_object::{AccountStatus, CourseLevel, UserRole};
    use crate::error::LearningError;
    use kernel::id::UserId;

    #[tokio::test]
    async fn test_register_profile() {
        let world = World::new().await;
        let register = RegisterProfileUseCase::new(world.repo.clone(), world.config.clone());
        let subject = UserId::new();

        let err = register
            .execute(
                subject,
                RegisterProfileInput {
                    display_name: "Eve".to_string(),
                    email: None,
                    role: UserRole::Admin,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, LearningError::Forbidden(_)));

        let err = register
            .execute(
                subject,
                RegisterProfileInput {
                    display_name: "Eve".to_string(),
                    email: Some("not-an-email".to_string()),
                    role: UserRole::Learner,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, LearningError::Validation(_)));

        let user = register
            .execute(
                subject,
                RegisterProfileInput {
                    display_name: "  Eve  ".to_string(),
                    email: Some("eve@example.com".to_string()),
                    role: UserRole::Creator,
                },
            )
            .await
            .unwrap();
        assert_eq!(user.display_name, "Eve");
        assert_eq!(user.account_status, AccountStatus::Active);

        let err = register
            .execute(
                subject,
                RegisterProfileInput {
                    display_name: "Eve".to_string(),
                    email: None,
                    role: UserRole::Learner,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, LearningError::ProfileExists));
    }

    #[tokio::test]
    async fn test_blocked_account_cannot_act() {
        let world = World::new().await;
        let update = UpdateAccountUseCase::new(world.repo.clone());

        update
            .execute(
                world.admin,
                world.creator,
                UpdateAccountInput {
                    status: Some(AccountStatus::Blocked),
                    role: None,
                },
            )
            .await
            .unwrap();

        let err = CreateCourseUseCase::new(world.repo.clone(), world.config.clone())
            .execute(
                world.creator,
                CreateCourseInput {
                    title: "Blocked".to_string(),
                    description: String::new(),
                    category: "misc".to_string(),
                    level: CourseLevel::Beginner,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            LearningError::AccountInactive(AccountStatus::Blocked)
        ));
        assert_eq!(err.code(), "FORBIDDEN");
    }

    #[tokio::test]
    async fn test_update_account_rules() {
        let world = World::new().await;
        let learner = world.learner("Ada").await;
        let update = UpdateAccountUseCase::new(world.repo.clone());

        let err = update
            .execute(
                world.admin,
                learner,
                UpdateAccountInput {
                    status: None,
                    role: None,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, LearningError::Validation(_)));

        let err = update
            .execute(
                world.admin,
                world.admin,
                UpdateAccountInput {
                    status: Some(AccountStatus::Suspended),
                    role: None,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, LearningError::Forbidden(_)));

        let err = update
            .execute(
                world.creator,
                learner,
                UpdateAccountInput {
                    status: None,
                    role: Some(UserRole::Admin),
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, LearningError::Forbidden(_)));

        let user = update
            .execute(
                world.admin,
                learner,
                UpdateAccountInput {
                    status: None,
                    role: Some(UserRole::Creator),
                },
            )
            .await
            .unwrap();
        assert_eq!(user.user_role, UserRole::Creator);
    }

    #[tokio::test]
    async fn test_learners_cannot_author() {
        let world = World::new().await;
        let learner = world.learner("Ada").await;

        let err = CreateCourseUseCase::new(world.repo.clone(), world.config.clone())
            .execute(
                learner,
                CreateCourseInput {
                    title: "Mine".to_string(),
                    description: String::new(),
                    category: "misc".to_string(),
                    level: CourseLevel::Advanced,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, LearningError::Forbidden(_)));
    }
}

#[cfg(test)]
mod error_tests {
    use super::support::World;
    use crate::HtmlCertificateRenderer;
    use crate::application::config::LearningConfig;
    use crate::presentation::router::learning_router_generic;
    use axum::Router;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode, header};
    use platform::blob::FsBlobStore;
    use platform::token::{TokenConfig, TokenVerifier, issue_token};
    use serde_json::{Value, json};
    use std::sync::Arc;
    use tower::ServiceExt;

    struct Api {
        app: Router,
        tokens: TokenConfig,
        _blobs: tempfile::TempDir,
    }

    impl Api {
        fn new(world: &World) -> Self {
            let tokens = TokenConfig::with_random_secret();
            let blobs = tempfile::tempdir().unwrap();
            let app = learning_router_generic(
                world.repo.as_ref().clone(),
                FsBlobStore::new(blobs.path(), "/files"),
                TokenVerifier::new(&tokens),
                Arc::new(HtmlCertificateRenderer::new()),
                LearningConfig::default(),
            );
            Self {
                app,
                tokens,
                _blobs: blobs,
            }
        }

        fn bearer(&self, user: kernel::id::UserId) -> String {
            let token =
                issue_token(&self.tokens, user.into_uuid(), chrono::Duration::hours(1)).unwrap();
            format!("Bearer {token}")
        }

        async fn send(&self, request: Request<Body>) -> (StatusCode, Vec<u8>, Option<String>) {
            let response = self.app.clone().oneshot(request).await.unwrap();
            let status = response.status();
            let content_type = response
                .headers()
                .get(header::CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string);
            let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
            (status, bytes.to_vec(), content_type)
        }

        async fn json(&self, request: Request<Body>) -> (StatusCode, Value) {
            let (status, bytes, _) = self.send(request).await;
            let body = if bytes.is_empty() {
                Value::Null
            } else {
                serde_json::from_slice(&bytes).unwrap()
            };
            (status, body)
        }
    }

    fn request(method: &str, uri: &str, auth: Option<&str>, body: Option<Value>) -> Request<Body> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(auth) = auth {
            builder = builder.header(header::AUTHORIZATION, auth);
        }
        match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        }
    }

    #[tokio::test]
    async fn test_missing_token_is_unauthorized_problem() {
        let world = World::new().await;
        let api = Api::new(&world);

        let (status, body) = api
            .json(request("POST", "/courses", None, Some(json!({"title": "x"}))))
            .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["code"], "UNAUTHORIZED");
        assert_eq!(body["status"], 401);
    }

    #[tokio::test]
    async fn test_draft_course_is_hidden_from_anonymous_viewers() {
        let world = World::new().await;
        let (course_id, _) = world.draft_course(1).await;
        let api = Api::new(&world);

        let (status, body) = api
            .json(request("GET", &format!("/courses/{course_id}"), None, None))
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], "NOT_FOUND");

        let owner = api.bearer(world.creator);
        let (status, body) = api
            .json(request("GET", &format!("/courses/{course_id}"), Some(&owner), None))
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "draft");
        assert_eq!(body["lessons"][0]["order"], 1);
    }

    #[tokio::test]
    async fn test_malformed_token_is_rejected_even_on_public_routes() {
        let world = World::new().await;
        let (course_id, _) = world.published_course(1).await;
        let api = Api::new(&world);

        let (status, _) = api
            .json(request(
                "GET",
                &format!("/courses/{course_id}"),
                Some("Bearer not.a.jwt"),
                None,
            ))
            .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_learning_flow_over_http() {
        let world = World::new().await;
        let (course_id, lessons) = world.published_course(2).await;
        let api = Api::new(&world);
        let learner = kernel::id::UserId::new();
        let auth = api.bearer(learner);

        let (status, body) = api
            .json(request(
                "POST",
                "/profile",
                Some(&auth),
                Some(json!({"displayName": "Ada"})),
            ))
            .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["role"], "learner");

        let (status, body) = api
            .json(request(
                "POST",
                &format!("/courses/{course_id}/enroll"),
                Some(&auth),
                None,
            ))
            .await;
        assert_eq!(status, StatusCode::CREATED);
        assert!(body["enrolledAt"].is_string());

        let (status, body) = api
            .json(request(
                "POST",
                &format!("/courses/{course_id}/enroll"),
                Some(&auth),
                None,
            ))
            .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["code"], "CONFLICT");

        let (status, body) = api
            .json(request(
                "GET",
                &format!("/courses/{course_id}/certificate"),
                Some(&auth),
                None,
            ))
            .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["code"], "INVALID_STATE");

        for lesson_id in &lessons {
            let (status, _) = api
                .json(request(
                    "POST",
                    &format!("/courses/{course_id}/lessons/{lesson_id}/complete"),
                    Some(&auth),
                    None,
                ))
                .await;
            assert_eq!(status, StatusCode::OK);
        }

        let (status, body) = api
            .json(request(
                "GET",
                &format!("/courses/{course_id}/progress"),
                Some(&auth),
                None,
            ))
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["progress"], 100);
        assert_eq!(body["certificateIssued"], true);
        assert_eq!(body["completedLessons"].as_array().unwrap().len(), 2);

        let (status, bytes, content_type) = api
            .send(request(
                "GET",
                &format!("/courses/{course_id}/certificate"),
                Some(&auth),
                None,
            ))
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(content_type.as_deref(), Some("text/html; charset=utf-8"));
        let html = String::from_utf8(bytes).unwrap();
        assert!(html.contains("Ada"));
    }

    #[tokio::test]
    async fn test_public_certificate_verification() {
        let world = World::new().await;
        let (course_id, lessons) = world.published_course(1).await;
        let learner = world.learner("Ada").await;
        world.enroll(learner, course_id).await;
        world.complete(learner, course_id, lessons[0]).await.unwrap();
        let serial = world
            .certificate(learner, course_id)
            .await
            .unwrap()
            .certificate
            .serial_hash;
        let api = Api::new(&world);

        let (status, body) = api
            .json(request("GET", &format!("/certificates/{serial}"), None, None))
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["serialHash"], serial.as_str());
        assert_eq!(body["learnerName"], "Ada");
        assert_eq!(body["courseTitle"], "Intro to Rust");
        assert_eq!(body["issuedByName"], "Grace Hopper");
        assert_eq!(body["isValid"], true);

        let (status, body) = api
            .json(request("GET", "/certificates/0000000000000000", None, None))
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], "NOT_FOUND");
    }
}

#[cfg(test)]
mod dto_tests {
    use crate::application::ReviewDecision;
    use crate::domain::value_object::{CourseLevel, UserRole};
    use crate::presentation::dto::*;

    #[test]
    fn test_requests_use_camel_case() {
        let req: RegisterProfileRequest =
            serde_json::from_str(r#"{"displayName":"Ada","email":"ada@example.com"}"#).unwrap();
        assert_eq!(req.display_name, "Ada");
        assert_eq!(req.role, UserRole::Learner);

        let req: AddLessonRequest =
            serde_json::from_str(r#"{"title":"Intro","durationMinutes":12}"#).unwrap();
        assert_eq!(req.duration_minutes, 12);
        assert!(req.content.is_empty());

        let req: SetLessonActiveRequest = serde_json::from_str(r#"{"isActive":false}"#).unwrap();
        assert!(!req.is_active);

        let req: CreateCourseRequest =
            serde_json::from_str(r#"{"title":"Rust","category":"dev","level":"advanced"}"#)
                .unwrap();
        assert_eq!(req.level, CourseLevel::Advanced);
    }

    #[test]
    fn test_review_request() {
        let req: ReviewCourseRequest =
            serde_json::from_str(r#"{"action":"reject","reason":"low audio quality"}"#).unwrap();
        assert_eq!(req.action, ReviewDecision::Reject);
        assert_eq!(req.reason.as_deref(), Some("low audio quality"));

        assert!(serde_json::from_str::<ReviewCourseRequest>(r#"{"action":"publish"}"#).is_err());
    }

    #[test]
    fn test_partial_edit_request() {
        let req: EditCourseRequest = serde_json::from_str(r#"{"description":"new"}"#).unwrap();
        assert!(req.title.is_none());
        assert_eq!(req.description.as_deref(), Some("new"));
    }
}
