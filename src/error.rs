//! # 统一错误处理模块
//!
//! 定义 pptx2pdf 的所有错误类型，使用 `thiserror` 派生。
//!
//! ## 依赖关系
//! - 被所有其他模块使用
//! - 无外部模块依赖

use std::time::Duration;
use thiserror::Error;

/// pptx2pdf 统一错误类型
#[derive(Error, Debug)]
pub enum Pptx2PdfError {
    // ─────────────────────────────────────────────────────────────
    // I/O 错误
    // ─────────────────────────────────────────────────────────────
    #[error("Failed to read file: {path}")]
    FileReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write file: {path}")]
    FileWriteError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    // ─────────────────────────────────────────────────────────────
    // 输入校验
    // ─────────────────────────────────────────────────────────────
    #[error("File not found: {path}")]
    NotFound { path: String },

    #[error("{path} is not a PowerPoint file")]
    UnsupportedType { path: String },

    // ─────────────────────────────────────────────────────────────
    // 转换引擎错误
    // ─────────────────────────────────────────────────────────────
    #[error("No conversion engine available")]
    BackendUnavailable,

    #[error("{engine} failed on {path}: {reason}")]
    BackendFailure {
        engine: String,
        path: String,
        reason: String,
    },

    #[error("{path} took longer than {}s", .limit.as_secs())]
    Timeout { path: String, limit: Duration },

    #[error("PDF not created for {path}")]
    OutputMissing { path: String },

    // ─────────────────────────────────────────────────────────────
    // 外部命令错误
    // ─────────────────────────────────────────────────────────────
    #[error("Failed to launch '{command}': {source}")]
    CommandFailed {
        command: String,
        #[source]
        source: std::io::Error,
    },

    // ─────────────────────────────────────────────────────────────
    // 参数错误
    // ─────────────────────────────────────────────────────────────
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    // ─────────────────────────────────────────────────────────────
    // 其他
    // ─────────────────────────────────────────────────────────────
    #[error("{failed} of {total} file(s) failed to convert")]
    BatchFailed { failed: usize, total: usize },

    #[error("{0}")]
    Other(String),
}

/// Result 类型别名
pub type Result<T> = std::result::Result<T, Pptx2PdfError>;
