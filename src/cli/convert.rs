//! # convert 子命令 CLI 定义
//!
//! 批量转换 PowerPoint 文件为 PDF
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/convert.rs`

use crate::engine::EngineChoice;
use crate::models::QualityPreset;

use clap::Args;
use std::path::PathBuf;

/// 默认单文件超时（秒），大文件（450MB+）也需要足够时间
pub const DEFAULT_TIMEOUT_SECS: u64 = 600;

/// convert 子命令参数
#[derive(Args, Debug)]
#[command(after_help = "Examples:
  pptx2pdf convert presentation.pptx
  pptx2pdf convert presentation.pptx --quality screen
  pptx2pdf convert /path/to/presentations/
  pptx2pdf convert file1.pptx file2.pptx -o ./output/ --quality high
  pptx2pdf convert deck.pptx --libreoffice \"C:/Program Files/LibreOffice/program/soffice.exe\"")]
pub struct ConvertArgs {
    /// PPTX/PPT file(s) or directories containing them
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    /// Output directory for PDF files (default: next to each input)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Custom path to the LibreOffice executable
    #[arg(long, env = "PPTX2PDF_LIBREOFFICE")]
    pub libreoffice: Option<PathBuf>,

    /// Suppress per-file output and the progress bar
    #[arg(short, long, default_value_t = false)]
    pub quiet: bool,

    /// PDF quality preset (only PowerPoint honours it)
    #[arg(long, value_enum, default_value_t = QualityPreset::Standard)]
    pub quality: QualityPreset,

    /// Conversion engine
    #[arg(long, value_enum, default_value_t = EngineChoice::Auto)]
    pub engine: EngineChoice,

    /// Per-file timeout in seconds
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout: u64,
}
