use serde::{Deserialize, Serialize};

use super::entities::ProgressStatus;

/// 单个课时的进度视图（无进度记录的课时为 NotStarted）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LessonProgress {
    pub lesson_id: i64,
    pub title: String,
    pub status: ProgressStatus,
    pub times_viewed: i32,
    pub watched_duration_seconds: i64,
    pub watched_percentage: f64,
    pub is_bookmarked: bool,
}

/// 章节进度
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChapterProgress {
    pub chapter_id: i64,
    pub title: String,
    pub total_lessons: usize,
    pub completed_lessons: usize,
    pub completion_percentage: f64,
    pub lessons: Vec<LessonProgress>,
}

/// 课程整体进度
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseProgress {
    pub enrollment_id: i64,
    pub course_version_id: i64,
    pub total_lessons: usize,
    pub completed_lessons: usize,
    pub viewed_lessons: usize,
    pub completion_percentage: f64,
    pub total_duration_seconds: i64,
    pub watched_duration_seconds: i64,
    pub chapters: Vec<ChapterProgress>,
}

/// 课程学习进度统计（按学生去重）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseProgressStats {
    pub course_id: i64,
    pub total_enrolled_students: usize,
    pub students_with_progress: usize,
    pub students_completed: usize,
    pub average_completion_percentage: f64,
    pub average_score: Option<f64>,
}
