use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::info;

use crate::errors::{LmsError, Result};
use crate::models::certificates::entities::{Certificate, NewCertificate};
use crate::models::enrollments::entities::{Enrollment, EnrollmentStatus};
use crate::storage::Storage;

/// 证书签发
#[async_trait]
pub trait CertificateIssuer: Send + Sync {
    /// 为已完成的选课签发证书，同一选课重复调用返回已有证书
    async fn issue(&self, enrollment: &Enrollment, now: DateTime<Utc>) -> Result<Certificate>;
}

/// 写入证书表的签发实现
pub struct StorageCertificateIssuer {
    storage: Arc<dyn Storage>,
}

impl StorageCertificateIssuer {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    fn generate_code() -> String {
        format!("CERT-{}", uuid::Uuid::new_v4().simple()).to_uppercase()
    }
}

#[async_trait]
impl CertificateIssuer for StorageCertificateIssuer {
    async fn issue(&self, enrollment: &Enrollment, now: DateTime<Utc>) -> Result<Certificate> {
        if enrollment.status != EnrollmentStatus::Completed {
            return Err(LmsError::collaborator(format!(
                "enrollment {} is {}, certificates require completion",
                enrollment.id, enrollment.status
            )));
        }

        if let Some(existing) = self
            .storage
            .get_certificate_by_enrollment(enrollment.id)
            .await?
        {
            return Ok(existing);
        }

        let certificate = self
            .storage
            .create_certificate(NewCertificate {
                enrollment_id: enrollment.id,
                student_id: enrollment.student_id,
                course_version_id: enrollment.course_version_id,
                code: Self::generate_code(),
                final_score: enrollment.average_score.unwrap_or(0.0),
                issued_at: now,
            })
            .await?;

        info!(
            "Certificate {} issued for enrollment {}",
            certificate.code, enrollment.id
        );
        Ok(certificate)
    }
}
