//! # 工具函数模块
//!
//! 提供美化输出、进度条和带超时的外部进程执行。
//!
//! ## 依赖关系
//! - 被 `commands/`, `engine/` 模块使用
//! - 子模块: output, progress, process

pub mod output;
pub mod process;
pub mod progress;
