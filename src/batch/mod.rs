//! # 批量处理模块
//!
//! 提供统一的文件批量转换能力。
//!
//! ## 功能
//! - 自动检测输入类型（文件/目录）
//! - 收集匹配文件列表
//! - 串行转换，单文件失败不影响其他文件
//! - 后台线程执行 + 有界通道报告进度
//!
//! ## 依赖关系
//! - 被 `commands/convert.rs` 使用
//! - 使用 `converter.rs`, `engine/`

pub mod collector;
pub mod runner;
pub mod worker;

pub use collector::FileCollector;
pub use runner::BatchEvent;
pub use worker::BatchWorker;
