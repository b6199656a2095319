//! 配置管理
//!
//! 配置来源按优先级从低到高：内置默认值、`config` 文件、`config.{APP_ENV}` 文件、
//! `LMS__` 前缀环境变量、常用环境变量（`DATABASE_URL`、`RUST_LOG` 等）。

#[path = "impl.rs"]
mod loader;
mod structs;

pub use structs::*;
