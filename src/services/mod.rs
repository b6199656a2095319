//! 业务逻辑层
//!
//! 每个组件一个服务，每个操作一个文件；服务之间通过 [`EngineContext`] 共享依赖。

pub mod certificates;
pub mod context;
pub mod enrollments;
pub mod grading;
pub mod progress;
pub mod quiz_attempts;
pub mod submissions;

use std::sync::Arc;

pub use certificates::CertificateService;
pub use context::{EngineContext, EngineContextBuilder};
pub use enrollments::EnrollmentService;
pub use grading::GradingService;
pub use progress::ProgressService;
pub use quiz_attempts::QuizAttemptService;
pub use submissions::SubmissionService;

use crate::events::EventBus;

/// 学习引擎入口
pub struct LearningEngine {
    context: Arc<EngineContext>,
    pub enrollments: EnrollmentService,
    pub progress: ProgressService,
    pub grading: GradingService,
    pub quizzes: QuizAttemptService,
    pub submissions: SubmissionService,
    pub certificates: CertificateService,
}

impl LearningEngine {
    pub fn new(context: Arc<EngineContext>) -> Self {
        Self {
            enrollments: EnrollmentService::new(context.clone()),
            progress: ProgressService::new(context.clone()),
            grading: GradingService::new(context.clone()),
            quizzes: QuizAttemptService::new(context.clone()),
            submissions: SubmissionService::new(context.clone()),
            certificates: CertificateService::new(context.clone()),
            context,
        }
    }

    pub fn context(&self) -> &Arc<EngineContext> {
        &self.context
    }

    pub fn events(&self) -> &EventBus {
        &self.context.events
    }
}
