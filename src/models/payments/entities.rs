use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

string_enum! {
    /// 支付状态
    pub enum PaymentStatus("支付状态") {
        Pending => "pending",
        Success => "success",
        Failed => "failed",
        Refunded => "refunded",
    }
}

/// 支付流水（由支付模块写入，引擎只读）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentTransaction {
    pub id: i64,
    pub student_id: i64,
    pub course_version_id: i64,
    pub amount: f64,
    pub status: PaymentStatus,
    pub created_at: DateTime<Utc>,
}

impl PaymentTransaction {
    /// 已成功支付且属于该学生与课程版本
    pub fn covers(&self, student_id: i64, course_version_id: i64) -> bool {
        self.status == PaymentStatus::Success
            && self.student_id == student_id
            && self.course_version_id == course_version_id
    }
}
