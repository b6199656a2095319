use serde::{Deserialize, Serialize};

/// 期末考试资格
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinalExamEligibility {
    pub is_eligible: bool,
    pub reason: Option<String>,
    pub current_progress_pct: f64,
    pub required_progress_pct: f64,
}

/// 成绩汇总（0–10 刻度）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradeSummary {
    pub enrollment_id: i64,
    /// 平时成绩平均分，无已评分项目时为空
    pub coursework_average: Option<f64>,
    /// 期末考试成绩，未参加时为空
    pub final_exam_score: Option<f64>,
    /// 实际生效的期末权重（课程未设置期末考试时为 0）
    pub effective_final_weight: f64,
    pub final_score: f64,
    pub completion_percentage: f64,
    pub pass_score: f64,
    pub is_passing: bool,
    pub graded_items: usize,
}

/// 课程选课统计
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrollmentStats {
    pub course_id: i64,
    pub total_enrollments: usize,
    pub active_enrollments: usize,
    pub completed_enrollments: usize,
    pub cancelled_enrollments: usize,
    pub expired_enrollments: usize,
    pub banned_enrollments: usize,
    /// 完成数 / 总数（百分比）
    pub completion_rate: f64,
    pub average_completion_percentage: f64,
    /// 有成绩的选课的平均总分
    pub average_score: Option<f64>,
    pub certificates_issued: usize,
}
