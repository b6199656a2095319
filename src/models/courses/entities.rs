use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

string_enum! {
    /// 课程版本状态
    pub enum CourseVersionStatus("课程版本状态") {
        Draft => "draft",         // 草稿
        Pending => "pending",     // 待审核
        Published => "published", // 已发布
        Rejected => "rejected",   // 已驳回
        Archived => "archived",   // 已归档
    }
}

string_enum! {
    /// 课时类型
    pub enum LessonType("课时类型") {
        Video => "video",
        Document => "document",
        Quiz => "quiz",
        Assignment => "assignment",
    }
}

/// 课程版本（定价与评分策略的快照来源）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseVersion {
    pub id: i64,
    pub course_id: i64,
    /// 课程所属教师
    pub teacher_id: i64,
    pub version_number: i32,
    pub title: String,
    pub price: f64,
    pub duration_days: i32,
    pub pass_score: f64,
    pub final_weight: f64,
    pub min_progress_pct: f64,
    pub status: CourseVersionStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CourseVersion {
    pub fn is_free(&self) -> bool {
        self.price <= 0.0
    }

    pub fn is_published(&self) -> bool {
        self.status == CourseVersionStatus::Published
    }

    /// 选课时复制到 Enrollment 上的评分策略
    pub fn grading_policy(&self) -> GradingPolicy {
        GradingPolicy {
            pass_score: self.pass_score,
            final_weight: self.final_weight.clamp(0.0, 1.0),
            min_progress_pct: self.min_progress_pct.clamp(0.0, 100.0),
        }
    }
}

/// 评分策略快照
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GradingPolicy {
    pub pass_score: f64,
    pub final_weight: f64,
    pub min_progress_pct: f64,
}

/// 课时
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lesson {
    pub id: i64,
    pub chapter_id: i64,
    pub course_version_id: i64,
    pub title: String,
    pub lesson_type: LessonType,
    pub duration_seconds: i64,
    pub order_index: i32,
}

/// 章节及其课时（按 order_index 排序）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chapter {
    pub id: i64,
    pub course_version_id: i64,
    pub title: String,
    pub order_index: i32,
    pub lessons: Vec<Lesson>,
}

/// 课程大纲：章节 → 课时
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CourseOutline {
    pub course_version_id: i64,
    pub chapters: Vec<Chapter>,
}

impl CourseOutline {
    pub fn total_lessons(&self) -> usize {
        self.chapters.iter().map(|c| c.lessons.len()).sum()
    }

    pub fn lessons(&self) -> impl Iterator<Item = &Lesson> {
        self.chapters.iter().flat_map(|c| c.lessons.iter())
    }

    pub fn lesson(&self, lesson_id: i64) -> Option<&Lesson> {
        self.lessons().find(|l| l.id == lesson_id)
    }

    pub fn chapter(&self, chapter_id: i64) -> Option<&Chapter> {
        self.chapters.iter().find(|c| c.id == chapter_id)
    }

    pub fn total_duration_seconds(&self) -> i64 {
        self.lessons().map(|l| l.duration_seconds.max(0)).sum()
    }
}
