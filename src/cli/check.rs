//! # check 子命令 CLI 定义
//!
//! 检查本机可用的转换引擎
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/check.rs`

use clap::Args;
use std::path::PathBuf;

/// check 子命令参数
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Custom path to the LibreOffice executable
    #[arg(long, env = "PPTX2PDF_LIBREOFFICE")]
    pub libreoffice: Option<PathBuf>,
}
