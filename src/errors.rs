//! 统一错误处理模块
//!
//! 使用宏自动生成错误类型，支持错误代码和类型名称。
//! 领域错误（状态迁移、唯一性、限额、过期）与基础设施错误共用同一枚举，
//! 调用方根据 `code()` 映射到面向用户的提示。

use std::fmt;

/// 定义错误类型的宏
///
/// 自动生成：
/// - enum 定义
/// - code() 方法 - 返回错误代码
/// - error_type() 方法 - 返回错误类型名称
/// - message() 方法 - 返回错误详情
/// - 便捷构造函数
macro_rules! define_lms_errors {
    ($(
        $variant:ident($code:literal, $type_name:literal)
    ),* $(,)?) => {
        #[derive(Debug, Clone, PartialEq)]
        pub enum LmsError {
            $($variant(String),)*
        }

        impl LmsError {
            /// 获取错误代码
            pub fn code(&self) -> &'static str {
                match self {
                    $(LmsError::$variant(_) => $code,)*
                }
            }

            /// 获取错误类型名称
            pub fn error_type(&self) -> &'static str {
                match self {
                    $(LmsError::$variant(_) => $type_name,)*
                }
            }

            /// 获取错误详情
            pub fn message(&self) -> &str {
                match self {
                    $(LmsError::$variant(msg) => msg,)*
                }
            }
        }

        // 生成便捷构造函数
        paste::paste! {
            impl LmsError {
                $(
                    pub fn [<$variant:snake>]<T: Into<String>>(msg: T) -> Self {
                        LmsError::$variant(msg.into())
                    }
                )*
            }
        }
    };
}

define_lms_errors! {
    // 领域错误
    InvalidTransition("L001", "Invalid State Transition"),
    AlreadyEnrolled("L002", "Already Enrolled"),
    PaymentRequired("L003", "Payment Required"),
    AttemptInProgress("L004", "Attempt In Progress"),
    AttemptLimitReached("L005", "Attempt Limit Reached"),
    AttemptNotInProgress("L006", "Attempt Not In Progress"),
    AttemptExpired("L007", "Attempt Expired"),
    EnrollmentNotActive("L008", "Enrollment Not Active"),
    EnrollmentExpired("L009", "Enrollment Expired"),
    NotEligible("L010", "Not Eligible"),
    ConcurrencyConflict("L011", "Concurrency Conflict"),
    NotFound("L012", "Resource Not Found"),
    Validation("L013", "Validation Error"),
    Authorization("L014", "Authorization Error"),
    // 基础设施错误
    DatabaseConfig("E001", "Database Configuration Error"),
    DatabaseConnection("E002", "Database Connection Error"),
    DatabaseOperation("E003", "Database Operation Error"),
    Serialization("E004", "Serialization Error"),
    Collaborator("E005", "Collaborator Error"),
}

impl LmsError {
    /// 是否可由引擎内部重试（仅乐观锁冲突）
    pub fn is_retryable(&self) -> bool {
        matches!(self, LmsError::ConcurrencyConflict(_))
    }

    /// 格式化为彩色输出（用于开发环境）
    #[cfg(debug_assertions)]
    pub fn format_colored(&self) -> String {
        format!(
            "\x1b[1;31m[ERROR]\x1b[0m \x1b[33m{}\x1b[0m \x1b[31m{}\x1b[0m\n  {}",
            self.code(),
            self.error_type(),
            self.message()
        )
    }

    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for LmsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for LmsError {}

// 为常见的错误类型实现 From trait
impl From<sea_orm::DbErr> for LmsError {
    fn from(err: sea_orm::DbErr) -> Self {
        LmsError::DatabaseOperation(err.to_string())
    }
}

impl From<serde_json::Error> for LmsError {
    fn from(err: serde_json::Error) -> Self {
        LmsError::Serialization(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, LmsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(LmsError::invalid_transition("test").code(), "L001");
        assert_eq!(LmsError::attempt_in_progress("test").code(), "L004");
        assert_eq!(LmsError::concurrency_conflict("test").code(), "L011");
        assert_eq!(LmsError::database_operation("test").code(), "E003");
    }

    #[test]
    fn test_error_types() {
        assert_eq!(
            LmsError::enrollment_expired("test").error_type(),
            "Enrollment Expired"
        );
        assert_eq!(
            LmsError::validation("test").error_type(),
            "Validation Error"
        );
    }

    #[test]
    fn test_error_message() {
        let err = LmsError::already_enrolled("student 7 is already enrolled");
        assert_eq!(err.message(), "student 7 is already enrolled");
    }

    #[test]
    fn test_only_conflicts_are_retryable() {
        assert!(LmsError::concurrency_conflict("version mismatch").is_retryable());
        assert!(!LmsError::attempt_expired("late").is_retryable());
        assert!(!LmsError::database_connection("down").is_retryable());
    }

    #[test]
    fn test_format_simple() {
        let err = LmsError::payment_required("course price is 199.0");
        let formatted = err.format_simple();
        assert!(formatted.contains("Payment Required"));
        assert!(formatted.contains("199.0"));
    }
}
