//! LMS 学习引擎
//!
//! 选课生命周期、学习进度、成绩计算与测验作答的核心库。
//!
//! # 架构
//! - `cache`: 课程大纲缓存（Moka）
//! - `collaborators`: 支付校验与证书签发等外部协作方
//! - `config`: 配置管理
//! - `entity`: SeaORM 数据库实体
//! - `errors`: 统一错误处理
//! - `events`: 领域事件广播
//! - `models`: 数据模型定义
//! - `runtime`: 运行时生命周期管理
//! - `services`: 业务逻辑层
//! - `storage`: 数据存储层（SeaORM / 内存）
//! - `utils`: 工具函数

pub mod cache;
pub mod collaborators;
pub mod config;
pub mod entity;
pub mod errors;
pub mod events;
pub mod models;
pub mod runtime;
pub mod services;
pub mod storage;
pub mod utils;

pub use errors::{LmsError, Result};
pub use services::{EngineContext, LearningEngine};
