//! 课程大纲缓存
//!
//! 大纲（章节 + 课时）只读且读取频繁，进度统计和完成度计算都依赖它。

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use tracing::debug;

use crate::config::CacheConfig;
use crate::errors::Result;
use crate::models::courses::entities::CourseOutline;
use crate::storage::Storage;

#[derive(Clone)]
pub struct OutlineCache {
    inner: Cache<i64, Arc<CourseOutline>>,
}

impl OutlineCache {
    pub fn new(max_capacity: u64, ttl: Duration) -> Self {
        let inner = Cache::builder()
            .max_capacity(max_capacity)
            .time_to_live(ttl)
            .build();

        debug!("OutlineCache initialized with max capacity: {}", max_capacity);
        Self { inner }
    }

    pub fn from_config(config: &CacheConfig) -> Self {
        Self::new(
            config.memory.max_capacity,
            Duration::from_secs(config.default_ttl.max(1)),
        )
    }

    /// 读取大纲，未命中时从存储加载
    pub async fn get_or_load(
        &self,
        storage: &dyn Storage,
        course_version_id: i64,
    ) -> Result<Arc<CourseOutline>> {
        if let Some(outline) = self.inner.get(&course_version_id).await {
            debug!("Outline cache hit: {}", course_version_id);
            return Ok(outline);
        }

        let outline = Arc::new(storage.get_course_outline(course_version_id).await?);
        self.inner
            .insert(course_version_id, outline.clone())
            .await;
        debug!("Outline cache filled: {}", course_version_id);
        Ok(outline)
    }

    /// 课程内容变更后使缓存失效
    pub async fn invalidate(&self, course_version_id: i64) {
        self.inner.invalidate(&course_version_id).await;
    }

    pub fn invalidate_all(&self) {
        self.inner.invalidate_all();
    }
}

impl Default for OutlineCache {
    fn default() -> Self {
        Self::new(1_000, Duration::from_secs(3600))
    }
}
