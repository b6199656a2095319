use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::{LmsError, Result};

string_enum! {
    /// 证书核验结果
    pub enum CertificateStatus("证书状态") {
        Valid => "valid",     // 有效
        Revoked => "revoked", // 已吊销
    }
}

/// 结业证书
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Certificate {
    pub id: i64,
    pub enrollment_id: i64,
    pub student_id: i64,
    pub course_version_id: i64,
    pub code: String,
    pub final_score: f64,
    pub issued_at: DateTime<Utc>,
    pub revoked: bool,
    pub revoked_at: Option<DateTime<Utc>>,
    pub revoked_by: Option<i64>,
    pub revoke_reason: Option<String>,
}

impl Certificate {
    pub fn status(&self) -> CertificateStatus {
        if self.revoked {
            CertificateStatus::Revoked
        } else {
            CertificateStatus::Valid
        }
    }

    /// 吊销，已吊销的证书不能再次吊销
    pub fn revoke(&mut self, reason: &str, actor_id: i64, now: DateTime<Utc>) -> Result<()> {
        if reason.trim().is_empty() {
            return Err(LmsError::validation("revoke reason must not be empty"));
        }
        if self.revoked {
            return Err(LmsError::invalid_transition(format!(
                "certificate {} is already revoked",
                self.code
            )));
        }
        self.revoked = true;
        self.revoked_at = Some(now);
        self.revoked_by = Some(actor_id);
        self.revoke_reason = Some(reason.to_string());
        Ok(())
    }
}

/// 新建证书
#[derive(Debug, Clone)]
pub struct NewCertificate {
    pub enrollment_id: i64,
    pub student_id: i64,
    pub course_version_id: i64,
    pub code: String,
    pub final_score: f64,
    pub issued_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn certificate() -> Certificate {
        Certificate {
            id: 1,
            enrollment_id: 2,
            student_id: 3,
            course_version_id: 4,
            code: "CERT-X".into(),
            final_score: 8.5,
            issued_at: DateTime::<Utc>::from_timestamp(1_700_000_000, 0).unwrap(),
            revoked: false,
            revoked_at: None,
            revoked_by: None,
            revoke_reason: None,
        }
    }

    #[test]
    fn test_revoke_once() {
        let mut cert = certificate();
        assert_eq!(cert.status(), CertificateStatus::Valid);
        assert!(cert.revoke("  ", 9, cert.issued_at).is_err());

        cert.revoke("plagiarism", 9, cert.issued_at).unwrap();
        assert_eq!(cert.status(), CertificateStatus::Revoked);
        assert_eq!(cert.revoked_by, Some(9));

        let err = cert.revoke("again", 9, cert.issued_at).unwrap_err();
        assert!(matches!(err, LmsError::InvalidTransition(_)));
    }
}
