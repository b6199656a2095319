use std::sync::Arc;

use async_trait::async_trait;

use crate::errors::{LmsError, Result};
use crate::storage::Storage;

/// 支付校验
#[async_trait]
pub trait PaymentVerifier: Send + Sync {
    /// 交易存在、已成功，且属于该学生与课程版本
    async fn verify(
        &self,
        transaction_id: i64,
        student_id: i64,
        course_version_id: i64,
    ) -> Result<()>;
}

/// 基于支付流水表的校验
pub struct StoragePaymentVerifier {
    storage: Arc<dyn Storage>,
}

impl StoragePaymentVerifier {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }
}

#[async_trait]
impl PaymentVerifier for StoragePaymentVerifier {
    async fn verify(
        &self,
        transaction_id: i64,
        student_id: i64,
        course_version_id: i64,
    ) -> Result<()> {
        let transaction = self
            .storage
            .get_payment_transaction(transaction_id)
            .await?
            .ok_or_else(|| {
                LmsError::payment_required(format!(
                    "payment transaction {transaction_id} not found"
                ))
            })?;

        if !transaction.covers(student_id, course_version_id) {
            return Err(LmsError::payment_required(format!(
                "payment transaction {transaction_id} ({}) does not cover course version {course_version_id} for student {student_id}",
                transaction.status
            )));
        }
        Ok(())
    }
}
