//! Set Thumbnail Use Case
//!
//! Stores the image in the blob store and records its public URL. The
//! previous blob is removed after the course row points at the new one.

use std::sync::Arc;

use kernel::id::{CourseId, UserId};
use platform::blob::BlobStore;
use uuid::Uuid;

use crate::application::access;
use crate::application::config::LearningConfig;
use crate::domain::entity::Course;
use crate::domain::repository::{CourseRepository, UserRepository};
use crate::error::{LearningError, LearningResult};

pub struct SetThumbnailUseCase<R, B>
where
    R: UserRepository + CourseRepository,
    B: BlobStore,
{
    repo: Arc<R>,
    blobs: Arc<B>,
    config: Arc<LearningConfig>,
}

impl<R, B> SetThumbnailUseCase<R, B>
where
    R: UserRepository + CourseRepository,
    B: BlobStore,
{
    pub fn new(repo: Arc<R>, blobs: Arc<B>, config: Arc<LearningConfig>) -> Self {
        Self { repo, blobs, config }
    }

    pub async fn execute(
        &self,
        actor_id: UserId,
        course_id: CourseId,
        bytes: &[u8],
        content_type: &str,
    ) -> LearningResult<Course> {
        let actor = access::active_user(self.repo.as_ref(), &actor_id).await?;
        let mut course = access::managed_course(self.repo.as_ref(), &actor, &course_id).await?;

        if bytes.is_empty() {
            return Err(LearningError::Validation("thumbnail is empty".to_string()));
        }
        if bytes.len() > self.config.thumbnail_max_bytes {
            return Err(LearningError::Validation(format!(
                "thumbnail exceeds {} bytes",
                self.config.thumbnail_max_bytes
            )));
        }
        let extension = self.config.thumbnail_extension(content_type)?;

        let key = format!(
            "thumbnails/{}/{}.{}",
            course.course_id,
            Uuid::new_v4().simple(),
            extension
        );
        self.blobs.put(&key, bytes, content_type).await?;

        let previous_key = course.thumbnail_key.clone();
        course.set_thumbnail(key.clone(), self.blobs.url(&key));

        if let Err(e) = self.repo.update_course(&course).await {
            // Row still points at the old blob
            if let Err(cleanup) = self.blobs.delete(&key).await {
                tracing::warn!(key = %key, error = %cleanup, "Orphaned thumbnail blob");
            }
            return Err(e);
        }

        if let Some(previous_key) = previous_key.filter(|k| *k != key) {
            if let Err(e) = self.blobs.delete(&previous_key).await {
                tracing::warn!(key = %previous_key, error = %e, "Previous thumbnail not deleted");
            }
        }

        tracing::info!(
            course_id = %course.course_id,
            size = bytes.len(),
            "Course thumbnail set"
        );

        Ok(course)
    }
}
