//! Certificate Verification Use Cases
//!
//! Public lookup by serial, and the admin validity switch (the only
//! mutation a certificate allows).

use std::sync::Arc;

use kernel::id::UserId;

use crate::application::access;
use crate::domain::entity::Certificate;
use crate::domain::repository::{CertificateRepository, UserRepository};
use crate::domain::value_object::SerialHash;
use crate::error::{LearningError, LearningResult};

pub struct VerifyCertificateUseCase<C>
where
    C: CertificateRepository,
{
    certificate_repo: Arc<C>,
}

impl<C> VerifyCertificateUseCase<C>
where
    C: CertificateRepository,
{
    pub fn new(certificate_repo: Arc<C>) -> Self {
        Self { certificate_repo }
    }

    pub async fn execute(&self, serial: &str) -> LearningResult<Certificate> {
        let serial = SerialHash::parse(serial).ok_or(LearningError::CertificateNotFound)?;

        self.certificate_repo
            .find_certificate_by_serial(&serial)
            .await?
            .ok_or(LearningError::CertificateNotFound)
    }
}

pub struct SetCertificateValidityUseCase<R>
where
    R: UserRepository + CertificateRepository,
{
    repo: Arc<R>,
}

impl<R> SetCertificateValidityUseCase<R>
where
    R: UserRepository + CertificateRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn execute(
        &self,
        admin_id: UserId,
        serial: &str,
        is_valid: bool,
    ) -> LearningResult<Certificate> {
        let admin = access::active_admin(self.repo.as_ref(), &admin_id).await?;
        let serial = SerialHash::parse(serial).ok_or(LearningError::CertificateNotFound)?;

        if !self.repo.set_certificate_validity(&serial, is_valid).await? {
            return Err(LearningError::CertificateNotFound);
        }

        let certificate = self
            .repo
            .find_certificate_by_serial(&serial)
            .await?
            .ok_or(LearningError::CertificateNotFound)?;

        tracing::info!(
            serial_hash = %serial,
            admin_id = %admin.user_id,
            is_valid,
            "Certificate validity changed"
        );

        Ok(certificate)
    }
}
