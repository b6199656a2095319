use std::sync::Arc;

use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::cache::OutlineCache;
use crate::config::AppConfig;
use crate::errors::Result;
use crate::events::EventBus;
use crate::services::{EngineContext, LearningEngine};

pub struct StartupContext {
    pub engine: Arc<LearningEngine>,
    pub audit: JoinHandle<()>,
}

/// 订阅领域事件并以 JSON 写入审计日志
fn spawn_event_audit(events: &EventBus) -> JoinHandle<()> {
    let mut receiver = events.subscribe();
    tokio::spawn(async move {
        loop {
            match receiver.recv().await {
                Ok(envelope) => match serde_json::to_string(&envelope) {
                    Ok(json) => info!(target: "lms::audit", "{}", json),
                    Err(e) => warn!("Failed to serialize event {}: {}", envelope.event.name(), e),
                },
                Err(RecvError::Lagged(skipped)) => {
                    warn!("Event audit lagged, {} event(s) skipped", skipped);
                }
                Err(RecvError::Closed) => {
                    debug!("Event bus closed, audit task exiting");
                    break;
                }
            }
        }
    })
}

/// 准备引擎启动的上下文
/// 包括存储、大纲缓存和事件审计
pub async fn prepare_engine_startup() -> Result<StartupContext> {
    let config = AppConfig::get();

    let storage = crate::storage::create_storage().await?;
    warn!("Storage backend initialized and migrations completed");

    let outlines = OutlineCache::from_config(&config.cache);
    debug!(
        "Outline cache ready (capacity {}, ttl {}s)",
        config.cache.memory.max_capacity, config.cache.default_ttl
    );

    let context = EngineContext::builder(storage)
        .policy(config.learning.clone())
        .outline_cache(outlines)
        .build();
    let audit = spawn_event_audit(&context.events);
    let engine = Arc::new(LearningEngine::new(context));

    warn!(
        "Learning engine ready (completion threshold {}%, aggregation {:?})",
        config.learning.completion_threshold_pct, config.learning.score_aggregation
    );

    Ok(StartupContext { engine, audit })
}
