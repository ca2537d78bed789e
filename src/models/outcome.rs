//! # 转换结果模型
//!
//! 单文件转换结果与批量汇总。
//!
//! ## 依赖关系
//! - 被 `converter.rs`, `batch/` 使用
//! - 使用 `error.rs`

use crate::error::Pptx2PdfError;
use std::path::PathBuf;

/// 单个文件的转换结果
#[derive(Debug)]
pub enum ConversionOutcome {
    /// 转换成功，记录输出路径和大小（字节）
    Converted { output: PathBuf, bytes: u64 },
    /// 扩展名不受支持，未调用引擎
    Skipped { reason: String },
    /// 转换失败（包括超时）
    Failed(Pptx2PdfError),
}

impl ConversionOutcome {
    pub fn is_timeout(&self) -> bool {
        matches!(self, ConversionOutcome::Failed(Pptx2PdfError::Timeout { .. }))
    }
}

/// 批量转换汇总
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BatchSummary {
    /// 实际尝试转换的文件数
    pub total: usize,
    pub success: usize,
    pub failed: usize,
    /// 跳过数量（不计入 total）
    pub skipped: usize,
    /// 失败详情 (文件路径, 错误信息)
    pub failures: Vec<(PathBuf, String)>,
}

impl BatchSummary {
    /// 合并单个文件的结果
    pub fn record(&mut self, input: PathBuf, outcome: &ConversionOutcome) {
        match outcome {
            ConversionOutcome::Converted { .. } => {
                self.total += 1;
                self.success += 1;
            }
            ConversionOutcome::Skipped { .. } => self.skipped += 1,
            ConversionOutcome::Failed(err) => {
                self.total += 1;
                self.failed += 1;
                self.failures.push((input, err.to_string()));
            }
        }
    }

    pub fn all_succeeded(&self) -> bool {
        self.failed == 0
    }
}
