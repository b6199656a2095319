//! 结业证书
//!
//! 选课完成时自动签发；签发失败的选课可以在这里补发。
//! 吊销只标记证书，不改变选课状态。

pub mod issue;
pub mod query;
pub mod revoke;

use std::sync::Arc;

use super::EngineContext;
use crate::errors::Result;
use crate::models::Principal;
use crate::models::certificates::{
    entities::Certificate, responses::CertificateVerification,
};

pub struct CertificateService {
    ctx: Arc<EngineContext>,
}

impl CertificateService {
    pub fn new(ctx: Arc<EngineContext>) -> Self {
        Self { ctx }
    }

    pub(crate) fn ctx(&self) -> &EngineContext {
        &self.ctx
    }

    // 为已完成但未拿到证书的选课补发
    pub async fn issue_certificate(
        &self,
        principal: &Principal,
        enrollment_id: i64,
    ) -> Result<Certificate> {
        issue::issue_certificate(self, principal, enrollment_id).await
    }

    // 按证书编号公开核验
    pub async fn verify_certificate(&self, code: &str) -> Result<CertificateVerification> {
        query::verify_certificate(self, code).await
    }

    pub async fn get_enrollment_certificate(
        &self,
        principal: &Principal,
        enrollment_id: i64,
    ) -> Result<Option<Certificate>> {
        query::get_enrollment_certificate(self, principal, enrollment_id).await
    }

    // 吊销
    pub async fn revoke_certificate(
        &self,
        principal: &Principal,
        certificate_id: i64,
        reason: &str,
    ) -> Result<Certificate> {
        revoke::revoke_certificate(self, principal, certificate_id, reason).await
    }
}
