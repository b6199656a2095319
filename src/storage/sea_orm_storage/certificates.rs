//! 证书存储操作

use super::{SeaOrmStorage, write_error};
use crate::entity::certificates::{ActiveModel, Column, Entity as Certificates};
use crate::errors::{LmsError, Result};
use crate::models::certificates::entities::{Certificate, NewCertificate};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};

impl SeaOrmStorage {
    /// 创建证书，每个选课最多一张
    pub async fn create_certificate_impl(&self, req: NewCertificate) -> Result<Certificate> {
        let model = ActiveModel {
            enrollment_id: Set(req.enrollment_id),
            student_id: Set(req.student_id),
            course_version_id: Set(req.course_version_id),
            code: Set(req.code),
            final_score: Set(req.final_score),
            issued_at: Set(req.issued_at.timestamp()),
            revoked: Set(false),
            revoked_at: Set(None),
            revoked_by: Set(None),
            revoke_reason: Set(None),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| write_error(e, "创建证书"))?;

        Ok(result.into_certificate())
    }

    /// 获取选课对应的证书
    pub async fn get_certificate_by_enrollment_impl(
        &self,
        enrollment_id: i64,
    ) -> Result<Option<Certificate>> {
        let result = Certificates::find()
            .filter(Column::EnrollmentId.eq(enrollment_id))
            .one(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询证书失败: {e}")))?;

        Ok(result.map(|m| m.into_certificate()))
    }

    /// 通过 ID 获取证书
    pub async fn get_certificate_impl(&self, id: i64) -> Result<Option<Certificate>> {
        let result = Certificates::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询证书失败: {e}")))?;

        Ok(result.map(|m| m.into_certificate()))
    }

    /// 通过证书编号获取证书
    pub async fn get_certificate_by_code_impl(&self, code: &str) -> Result<Option<Certificate>> {
        let result = Certificates::find()
            .filter(Column::Code.eq(code))
            .one(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询证书失败: {e}")))?;

        Ok(result.map(|m| m.into_certificate()))
    }

    /// 更新证书吊销信息
    pub async fn update_certificate_impl(&self, certificate: &Certificate) -> Result<Certificate> {
        let model = ActiveModel {
            id: Set(certificate.id),
            revoked: Set(certificate.revoked),
            revoked_at: Set(certificate.revoked_at.map(|dt| dt.timestamp())),
            revoked_by: Set(certificate.revoked_by),
            revoke_reason: Set(certificate.revoke_reason.clone()),
            ..Default::default()
        };

        let result = model
            .update(&self.db)
            .await
            .map_err(|e| write_error(e, "更新证书"))?;

        Ok(result.into_certificate())
    }
}
