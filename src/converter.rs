//! # 单文件转换
//!
//! 对一个输入文件执行前置检查、调用引擎，并校验输出文件。
//!
//! ## 流程
//! 1. 输入不存在 -> `NotFound`（计为失败）
//! 2. 扩展名不是 pptx/ppt（大小写不敏感）-> 跳过，不调用引擎
//! 3. 确定输出目录（指定目录会被创建，默认为输入所在目录）
//! 4. 删除已有的同名 PDF，再调用引擎
//! 5. 引擎报告成功后，`<output_dir>/<stem>.pdf` 必须存在且非空
//!
//! ## 依赖关系
//! - 被 `batch/runner.rs` 使用
//! - 使用 `engine/`, `models/outcome.rs`

use crate::engine::Engine;
use crate::error::{Pptx2PdfError, Result};
use crate::models::ConversionOutcome;

use log::debug;
use std::fs;
use std::path::{Path, PathBuf};

/// 可识别的演示文稿扩展名（小写）
pub const SUPPORTED_EXTENSIONS: &[&str] = &["pptx", "ppt"];

/// 扩展名是否为演示文稿（大小写不敏感）
pub fn is_presentation(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|ext| {
            SUPPORTED_EXTENSIONS
                .iter()
                .any(|s| ext.eq_ignore_ascii_case(s))
        })
        .unwrap_or(false)
}

/// 输入对应的输出目录
pub fn output_dir_for(input: &Path, output_dir: Option<&Path>) -> PathBuf {
    match output_dir {
        Some(dir) => dir.to_path_buf(),
        None => match input.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        },
    }
}

/// 输入对应的 PDF 路径：`<output_dir>/<stem>.pdf`
pub fn output_path_for(input: &Path, output_dir: Option<&Path>) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "presentation".to_string());
    output_dir_for(input, output_dir).join(format!("{}.pdf", stem))
}

/// 转换单个文件
///
/// 所有错误都被折叠进 [`ConversionOutcome`]，调用方无需再处理 `Result`。
pub fn convert_file(
    engine: &mut dyn Engine,
    input: &Path,
    output_dir: Option<&Path>,
) -> ConversionOutcome {
    match try_convert(engine, input, output_dir) {
        Ok((output, bytes)) => ConversionOutcome::Converted { output, bytes },
        Err(Pptx2PdfError::UnsupportedType { path }) => ConversionOutcome::Skipped {
            reason: format!("{} is not a PowerPoint file", path),
        },
        Err(e) => ConversionOutcome::Failed(e),
    }
}

fn try_convert(
    engine: &mut dyn Engine,
    input: &Path,
    output_dir: Option<&Path>,
) -> Result<(PathBuf, u64)> {
    if !input.is_file() {
        return Err(Pptx2PdfError::NotFound {
            path: input.display().to_string(),
        });
    }

    if !is_presentation(input) {
        return Err(Pptx2PdfError::UnsupportedType {
            path: input.display().to_string(),
        });
    }

    let out_dir = output_dir_for(input, output_dir);
    if output_dir.is_some() {
        fs::create_dir_all(&out_dir).map_err(|e| Pptx2PdfError::FileWriteError {
            path: out_dir.display().to_string(),
            source: e,
        })?;
    }

    let output = output_path_for(input, output_dir);
    // 旧文件先删掉，否则粗粒度时间戳的文件系统上无法判断是否被重写
    if output.exists() {
        debug!("removing previous {}", output.display());
        fs::remove_file(&output).map_err(|e| Pptx2PdfError::FileWriteError {
            path: output.display().to_string(),
            source: e,
        })?;
    }

    debug!(
        "{}: {} -> {}",
        engine.name(),
        input.display(),
        output.display()
    );
    engine.export(input, &out_dir, &output)?;

    // 引擎的成功状态不完全可信，以实际文件为准
    let missing = || Pptx2PdfError::OutputMissing {
        path: input.display().to_string(),
    };
    let meta = fs::metadata(&output).map_err(|_| missing())?;
    if !meta.is_file() || meta.len() == 0 {
        return Err(missing());
    }

    Ok((output, meta.len()))
}
