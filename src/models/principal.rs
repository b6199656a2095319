//! 调用方身份
//!
//! 认证由外部完成，引擎只信任传入的 (账号, 角色)，
//! 并据此做归属与角色检查。

use serde::{Deserialize, Serialize};

use crate::errors::{LmsError, Result};

string_enum! {
    /// 账号角色
    pub enum Role("角色") {
        Student => "student", // 学生
        Teacher => "teacher", // 教师
        Admin => "admin",     // 管理员
    }
}

impl Role {
    pub fn staff_roles() -> &'static [Role] {
        &[Role::Teacher, Role::Admin]
    }
}

/// 当前操作者
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub account_id: i64,
    pub role: Role,
}

impl Principal {
    pub fn student(account_id: i64) -> Self {
        Self {
            account_id,
            role: Role::Student,
        }
    }

    pub fn teacher(account_id: i64) -> Self {
        Self {
            account_id,
            role: Role::Teacher,
        }
    }

    pub fn admin(account_id: i64) -> Self {
        Self {
            account_id,
            role: Role::Admin,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    pub fn is_staff(&self) -> bool {
        Role::staff_roles().contains(&self.role)
    }

    /// 学生本人或管理员
    pub fn ensure_owner(&self, student_id: i64) -> Result<()> {
        if self.is_admin() || (self.role == Role::Student && self.account_id == student_id) {
            return Ok(());
        }
        Err(LmsError::authorization(format!(
            "account {} cannot act on behalf of student {student_id}",
            self.account_id
        )))
    }

    /// 学生本人、教师或管理员（只读访问）
    pub fn ensure_can_view(&self, student_id: i64) -> Result<()> {
        if self.is_staff() || self.account_id == student_id {
            return Ok(());
        }
        Err(LmsError::authorization(format!(
            "account {} cannot view records of student {student_id}",
            self.account_id
        )))
    }

    /// 课程的授课教师或管理员
    pub fn ensure_teaches(&self, teacher_id: i64) -> Result<()> {
        if self.is_admin() || (self.role == Role::Teacher && self.account_id == teacher_id) {
            return Ok(());
        }
        Err(LmsError::authorization(format!(
            "account {} does not teach this course (teacher {teacher_id})",
            self.account_id
        )))
    }

    /// 教师或管理员
    pub fn ensure_staff(&self) -> Result<()> {
        if self.is_staff() {
            return Ok(());
        }
        Err(LmsError::authorization(format!(
            "role '{}' is not allowed to perform this action",
            self.role
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_owner_check() {
        assert!(Principal::student(7).ensure_owner(7).is_ok());
        assert!(Principal::admin(1).ensure_owner(7).is_ok());
        assert!(Principal::student(8).ensure_owner(7).is_err());
        assert!(Principal::teacher(2).ensure_owner(7).is_err());
    }

    #[test]
    fn test_staff_check() {
        assert!(Principal::teacher(2).ensure_staff().is_ok());
        assert!(Principal::admin(1).ensure_staff().is_ok());
        let err = Principal::student(7).ensure_staff().unwrap_err();
        assert_eq!(err.code(), "L014");
    }

    #[test]
    fn test_teaches_check() {
        assert!(Principal::teacher(2).ensure_teaches(2).is_ok());
        assert!(Principal::admin(1).ensure_teaches(2).is_ok());
        assert!(Principal::teacher(3).ensure_teaches(2).is_err());
        assert!(Principal::student(2).ensure_teaches(2).is_err());
    }

    #[test]
    fn test_role_round_trip_through_serde() {
        let role: Role = serde_json::from_str("\"teacher\"").unwrap();
        assert_eq!(role, Role::Teacher);
        assert!(serde_json::from_str::<Role>("\"guest\"").is_err());
        assert_eq!("admin".parse::<Role>(), Ok(Role::Admin));
    }
}
