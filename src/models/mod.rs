//! # 数据模型模块
//!
//! 定义质量预设、转换结果和批量汇总模型。
//!
//! ## 依赖关系
//! - 被 `engine/`, `batch/` 和 `commands/` 使用
//! - 子模块: quality, outcome

pub mod outcome;
pub mod quality;

pub use outcome::{BatchSummary, ConversionOutcome};
pub use quality::{FormatIntent, QualityPreset};
