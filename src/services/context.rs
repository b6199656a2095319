//! 引擎上下文
//!
//! 所有服务共享的依赖：存储、时钟、策略、事件、缓存、协作方与串行化锁。

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::cache::OutlineCache;
use crate::collaborators::{
    CertificateIssuer, PaymentVerifier, StorageCertificateIssuer, StoragePaymentVerifier,
};
use crate::config::LearningConfig;
use crate::errors::{LmsError, Result};
use crate::events::{DomainEvent, EventBus};
use crate::models::Principal;
use crate::models::courses::entities::{CourseOutline, CourseVersion};
use crate::storage::Storage;
use crate::utils::{Clock, KeyedLocks};

pub struct EngineContext {
    pub storage: Arc<dyn Storage>,
    pub clock: Clock,
    pub policy: LearningConfig,
    pub events: EventBus,
    pub outlines: OutlineCache,
    pub payments: Arc<dyn PaymentVerifier>,
    pub certificates: Arc<dyn CertificateIssuer>,
    pub locks: KeyedLocks,
}

impl EngineContext {
    pub fn builder(storage: Arc<dyn Storage>) -> EngineContextBuilder {
        EngineContextBuilder::new(storage)
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    pub fn publish(&self, actor_id: Option<i64>, event: DomainEvent) {
        self.events.publish(self.now(), actor_id, event);
    }

    /// 读取课程版本
    pub async fn course_version(&self, course_version_id: i64) -> Result<CourseVersion> {
        self.storage
            .get_course_version(course_version_id)
            .await?
            .ok_or_else(|| LmsError::not_found(format!("course version {course_version_id}")))
    }

    /// 操作者须为该课程版本的授课教师或管理员
    pub async fn ensure_teaches_version(
        &self,
        principal: &Principal,
        course_version_id: i64,
    ) -> Result<CourseVersion> {
        principal.ensure_staff()?;
        let version = self.course_version(course_version_id).await?;
        principal.ensure_teaches(version.teacher_id)?;
        Ok(version)
    }

    /// 操作者须为该课程的授课教师或管理员，课程不存在时返回 NotFound
    pub async fn ensure_teaches_course(
        &self,
        principal: &Principal,
        course_id: i64,
    ) -> Result<Vec<CourseVersion>> {
        principal.ensure_staff()?;
        let versions = self.storage.list_course_versions_by_course(course_id).await?;
        let Some(latest) = versions.last() else {
            return Err(LmsError::not_found(format!("course {course_id}")));
        };
        principal.ensure_teaches(latest.teacher_id)?;
        Ok(versions)
    }

    /// 课程大纲（经缓存）
    pub async fn outline(&self, course_version_id: i64) -> Result<Arc<CourseOutline>> {
        self.outlines
            .get_or_load(self.storage.as_ref(), course_version_id)
            .await
    }
}

pub struct EngineContextBuilder {
    storage: Arc<dyn Storage>,
    clock: Clock,
    policy: LearningConfig,
    outlines: Option<OutlineCache>,
    payments: Option<Arc<dyn PaymentVerifier>>,
    certificates: Option<Arc<dyn CertificateIssuer>>,
}

impl EngineContextBuilder {
    fn new(storage: Arc<dyn Storage>) -> Self {
        Self {
            storage,
            clock: Clock::system(),
            policy: LearningConfig::default(),
            outlines: None,
            payments: None,
            certificates: None,
        }
    }

    pub fn clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    pub fn policy(mut self, policy: LearningConfig) -> Self {
        self.policy = policy;
        self
    }

    pub fn outline_cache(mut self, cache: OutlineCache) -> Self {
        self.outlines = Some(cache);
        self
    }

    pub fn payment_verifier(mut self, verifier: Arc<dyn PaymentVerifier>) -> Self {
        self.payments = Some(verifier);
        self
    }

    pub fn certificate_issuer(mut self, issuer: Arc<dyn CertificateIssuer>) -> Self {
        self.certificates = Some(issuer);
        self
    }

    pub fn build(self) -> Arc<EngineContext> {
        let storage = self.storage;
        let payments = self
            .payments
            .unwrap_or_else(|| Arc::new(StoragePaymentVerifier::new(storage.clone())));
        let certificates = self
            .certificates
            .unwrap_or_else(|| Arc::new(StorageCertificateIssuer::new(storage.clone())));

        Arc::new(EngineContext {
            events: EventBus::new(self.policy.event_buffer),
            outlines: self.outlines.unwrap_or_default(),
            storage,
            clock: self.clock,
            policy: self.policy,
            payments,
            certificates,
            locks: KeyedLocks::new(),
        })
    }
}
