//! # convert 命令实现
//!
//! 批量转换 PowerPoint 文件为 PDF。
//!
//! ## 功能
//! - 启动时选择引擎，没有可用引擎则直接失败
//! - 收集输入文件（目录递归展开）
//! - 后台线程串行转换，主线程轮询事件并刷新进度条
//! - 汇总成功 / 失败数量，有失败时以非零状态退出
//!
//! ## 依赖关系
//! - 使用 `cli/convert.rs` 定义的参数
//! - 使用 `engine/`, `batch/`
//! - 使用 `utils/output.rs`, `utils/progress.rs`

use crate::batch::worker::POLL_INTERVAL;
use crate::batch::{BatchEvent, BatchWorker, FileCollector};
use crate::cli::convert::ConvertArgs;
use crate::engine::{BackendResolver, Engine};
use crate::error::{Pptx2PdfError, Result};
use crate::models::{BatchSummary, ConversionOutcome};
use crate::utils::{output, progress};

use indicatif::ProgressBar;
use std::path::Path;
use std::time::Duration;
use tabled::{Table, Tabled};

/// 汇总表行
#[derive(Debug, Clone, Tabled)]
struct SummaryRow {
    #[tabled(rename = "Total")]
    total: usize,
    #[tabled(rename = "Successful")]
    success: usize,
    #[tabled(rename = "Failed")]
    failed: usize,
    #[tabled(rename = "Skipped")]
    skipped: usize,
}

/// 执行 convert 命令
pub fn execute(args: ConvertArgs) -> Result<()> {
    let resolver = BackendResolver::new(args.engine).with_libreoffice(args.libreoffice.clone());
    run(args, resolver)
}

fn run(args: ConvertArgs, resolver: BackendResolver) -> Result<()> {
    output::print_header("PowerPoint to PDF Conversion");

    if args.timeout == 0 {
        return Err(Pptx2PdfError::InvalidArgument(
            "--timeout must be at least 1 second".to_string(),
        ));
    }
    let timeout = Duration::from_secs(args.timeout);

    // 选择引擎
    let resolution = resolver.resolve().inspect_err(|e| {
        if matches!(e, Pptx2PdfError::BackendUnavailable) {
            print_install_hints();
        }
    })?;

    for warning in &resolution.warnings {
        output::print_warning(warning);
    }
    output::print_info(&format!(
        "Using conversion engine: {}",
        resolution.backend
    ));

    // 收集输入文件
    let files = FileCollector::new(args.inputs.clone()).collect();
    if files.is_empty() {
        output::print_warning("No PPTX files found to convert.");
        return Ok(());
    }
    output::print_info(&format!("Found {} file(s) to convert", files.len()));
    if let Some(dir) = &args.output {
        output::print_info(&format!("Output directory: {}", dir.display()));
    }

    let pb = progress::create_progress_bar(files.len() as u64, "Converting", args.quiet);

    let backend = resolution.backend;
    let quality = args.quality;
    let worker = BatchWorker::spawn(
        move || -> Box<dyn Engine> { backend.into_engine(quality, timeout) },
        files,
        args.output.clone(),
    );

    let summary = worker.wait_with(POLL_INTERVAL, |event| {
        render_event(&pb, args.quiet, event);
    })?;

    pb.finish_and_clear();
    print_summary(&summary);

    if summary.all_succeeded() {
        Ok(())
    } else {
        Err(Pptx2PdfError::BatchFailed {
            failed: summary.failed,
            total: summary.total,
        })
    }
}

/// 输出单个进度事件
///
/// quiet 模式下只输出跳过、失败和超时。
fn render_event(pb: &ProgressBar, quiet: bool, event: BatchEvent) {
    match event {
        BatchEvent::Note(note) => {
            if !quiet {
                pb.suspend(|| output::print_detail(&note));
            }
        }
        BatchEvent::Started {
            index,
            total,
            input,
            bytes,
        } => {
            pb.set_message(file_name(&input));
            if !quiet {
                pb.suspend(|| {
                    output::print_info(&format!(
                        "[{}/{}] Converting: {} ({})",
                        index,
                        total,
                        file_name(&input),
                        output::format_mb(bytes)
                    ))
                });
            }
        }
        BatchEvent::Finished { input, outcome, .. } => {
            pb.inc(1);
            let name = file_name(&input);
            pb.suspend(|| match &outcome {
                ConversionOutcome::Converted { output: pdf, bytes } => {
                    if !quiet {
                        output::print_conversion(
                            &name,
                            &format!("{} ({})", pdf.display(), output::format_mb(*bytes)),
                        );
                    }
                }
                ConversionOutcome::Skipped { reason } => {
                    output::print_skip(&format!("{}, skipping", reason));
                }
                ConversionOutcome::Failed(e) if outcome.is_timeout() => {
                    output::print_timeout(&format!("{}: {}", name, e));
                }
                ConversionOutcome::Failed(e) => {
                    output::print_error(&format!("Failed: {}: {}", name, e));
                }
            });
        }
    }
}

/// 打印汇总
fn print_summary(summary: &BatchSummary) {
    output::print_separator();
    let row = SummaryRow {
        total: summary.total,
        success: summary.success,
        failed: summary.failed,
        skipped: summary.skipped,
    };
    println!("{}", Table::new([row]));

    for line in failure_lines(summary) {
        output::print_detail(line);
    }

    if summary.all_succeeded() {
        output::print_done(&format!(
            "Successfully converted {} file(s)",
            summary.success
        ));
    }
}

/// 失败详情，错误信息本身已包含文件路径
fn failure_lines(summary: &BatchSummary) -> impl Iterator<Item = &str> {
    summary.failures.iter().map(|(_, reason)| reason.as_str())
}

/// 没有可用引擎时的安装提示
///
/// 错误本身由 `main` 打印。
fn print_install_hints() {
    output::print_separator();
    for line in INSTALL_HINTS {
        println!("{}", line);
    }
    output::print_separator();
}

const INSTALL_HINTS: &[&str] = &[
    "Please install LibreOffice:",
    "  Windows: https://www.libreoffice.org/download/download/",
    "  Linux:   sudo apt-get install libreoffice",
    "  macOS:   brew install --cask libreoffice",
    "",
    "Or specify the path with --libreoffice (or PPTX2PDF_LIBREOFFICE)",
    "",
    "PowerPoint automation is used automatically on Windows when PowerPoint is installed.",
];

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_failure_lines_name_path_once() {
        let mut summary = BatchSummary::default();
        let input = PathBuf::from("/talks/hang.pptx");
        summary.record(
            input.clone(),
            &ConversionOutcome::Failed(Pptx2PdfError::Timeout {
                path: input.display().to_string(),
                limit: Duration::from_secs(1),
            }),
        );

        let lines: Vec<_> = failure_lines(&summary).collect();
        assert_eq!(lines, ["/talks/hang.pptx took longer than 1s"]);
    }

    #[test]
    fn test_install_hints_leave_error_to_main() {
        let message = Pptx2PdfError::BackendUnavailable.to_string();
        assert!(INSTALL_HINTS.iter().all(|line| !line.contains(&message)));
        assert!(INSTALL_HINTS.iter().any(|line| line.contains("--libreoffice")));
    }
}
