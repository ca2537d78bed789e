//! # CLI 模块
//!
//! 使用 `clap` 定义命令行参数和子命令。
//!
//! ## 命令结构
//! - `convert`: 批量转换 PPTX/PPT 为 PDF
//! - `check`: 检查可用的转换引擎
//! - `presets`: 列出质量预设
//!
//! ## 依赖关系
//! - 被 `main.rs` 使用
//! - 子模块: convert, check

pub mod check;
pub mod convert;

use clap::{Parser, Subcommand};

/// pptx2pdf - 批量 PowerPoint 转 PDF 工具
#[derive(Parser)]
#[command(name = "pptx2pdf")]
#[command(author = "Changjiang Wu")]
#[command(version)]
#[command(
    about = "Bulk convert PowerPoint presentations to PDF using PowerPoint or LibreOffice",
    long_about = None
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// 可用的子命令
#[derive(Subcommand)]
pub enum Commands {
    /// Convert PPTX/PPT files (or whole directories) to PDF
    Convert(convert::ConvertArgs),

    /// Report which conversion engines are available
    Check(check::CheckArgs),

    /// List the PDF quality presets
    Presets,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::EngineChoice;
    use crate::models::QualityPreset;
    use clap::CommandFactory;
    use std::path::PathBuf;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_convert_defaults() {
        let cli = Cli::try_parse_from(["pptx2pdf", "convert", "decks/", "talk.pptx"]).unwrap();
        match cli.command {
            Commands::Convert(args) => {
                assert_eq!(
                    args.inputs,
                    vec![PathBuf::from("decks/"), PathBuf::from("talk.pptx")]
                );
                assert_eq!(args.output, None);
                assert_eq!(args.quality, QualityPreset::Standard);
                assert_eq!(args.engine, EngineChoice::Auto);
                assert_eq!(args.timeout, 600);
                assert!(!args.quiet);
            }
            _ => panic!("expected convert"),
        }
    }

    #[test]
    fn test_convert_flags() {
        let cli = Cli::try_parse_from([
            "pptx2pdf",
            "convert",
            "a.pptx",
            "-o",
            "out",
            "--quality",
            "high",
            "--engine",
            "libreoffice",
            "--libreoffice",
            "/opt/soffice",
            "--timeout",
            "30",
            "-q",
        ])
        .unwrap();
        match cli.command {
            Commands::Convert(args) => {
                assert_eq!(args.output, Some(PathBuf::from("out")));
                assert_eq!(args.quality, QualityPreset::High);
                assert_eq!(args.engine, EngineChoice::Libreoffice);
                assert_eq!(args.libreoffice, Some(PathBuf::from("/opt/soffice")));
                assert_eq!(args.timeout, 30);
                assert!(args.quiet);
            }
            _ => panic!("expected convert"),
        }
    }

    #[test]
    fn test_convert_requires_input() {
        assert!(Cli::try_parse_from(["pptx2pdf", "convert"]).is_err());
        assert!(Cli::try_parse_from(["pptx2pdf", "convert", "a.pptx", "--quality", "ultra"]).is_err());
    }
}
