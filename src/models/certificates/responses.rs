use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::entities::{Certificate, CertificateStatus};

/// 证书核验结果（公开接口，不含操作人）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CertificateVerification {
    pub code: String,
    pub student_id: i64,
    pub course_version_id: i64,
    pub final_score: f64,
    pub issued_at: DateTime<Utc>,
    pub status: CertificateStatus,
    pub is_valid: bool,
    pub revoked_at: Option<DateTime<Utc>>,
    pub revoke_reason: Option<String>,
}

impl From<Certificate> for CertificateVerification {
    fn from(certificate: Certificate) -> Self {
        let status = certificate.status();
        Self {
            code: certificate.code,
            student_id: certificate.student_id,
            course_version_id: certificate.course_version_id,
            final_score: certificate.final_score,
            issued_at: certificate.issued_at,
            status,
            is_valid: status == CertificateStatus::Valid,
            revoked_at: certificate.revoked_at,
            revoke_reason: certificate.revoke_reason,
        }
    }
}
