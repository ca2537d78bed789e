//! # LibreOffice 引擎
//!
//! 调用 `soffice --headless --convert-to pdf --outdir <dir> <file>` 完成转换。
//!
//! ## 限制
//! `--convert-to` 不能可靠地接受 PDF 滤镜参数，质量预设在此引擎上无效，
//! 始终使用 LibreOffice 默认的 PDF 导出设置。
//!
//! ## 依赖关系
//! - 被 `engine/mod.rs` 使用
//! - 使用 `utils/process.rs` 执行外部命令

use super::Engine;
use crate::error::{Pptx2PdfError, Result};
use crate::models::QualityPreset;
use crate::utils::process::{run_with_timeout, Completion};

use log::debug;
use regex::Regex;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::Duration;

/// `--version` 探测的超时
pub const PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// 在 PATH 中查找的命令名
pub const PATH_COMMANDS: &[&str] = &["soffice", "libreoffice"];

/// 当前平台的常见安装位置
pub fn known_locations() -> Vec<PathBuf> {
    let paths: &[&str] = if cfg!(windows) {
        &[
            r"C:\Program Files\LibreOffice\program\soffice.exe",
            r"C:\Program Files (x86)\LibreOffice\program\soffice.exe",
            r"C:\Program Files\LibreOffice 7\program\soffice.exe",
            r"C:\Program Files\LibreOffice 24\program\soffice.exe",
        ]
    } else if cfg!(target_os = "macos") {
        &["/Applications/LibreOffice.app/Contents/MacOS/soffice"]
    } else {
        &[
            "/usr/bin/soffice",
            "/usr/lib/libreoffice/program/soffice",
            "/opt/libreoffice/program/soffice",
            "/snap/bin/libreoffice",
        ]
    };

    paths.iter().map(PathBuf::from).collect()
}

/// 运行 `<exe> --version`，成功时返回输出的第一行
pub fn probe_version(executable: &Path) -> Option<String> {
    let mut cmd = Command::new(executable);
    cmd.arg("--version");

    match run_with_timeout(&mut cmd, PROBE_TIMEOUT) {
        Ok(Completion::Exited(out)) if out.status.success() => {
            let line = out.stdout.lines().next().unwrap_or_default().trim().to_string();
            debug!("{} --version: {}", executable.display(), line);
            Some(line)
        }
        Ok(_) => None,
        Err(e) => {
            debug!("probe of {} failed: {}", executable.display(), e);
            None
        }
    }
}

/// 从 `--version` 输出中提取版本号
pub fn parse_version(banner: &str) -> Option<String> {
    let re = Regex::new(r"LibreOffice(?:Dev)?\s+(\d+(?:\.\d+)+)").ok()?;
    re.captures(banner).map(|caps| caps[1].to_string())
}

/// LibreOffice 命令行引擎
pub struct LibreOfficeEngine {
    executable: PathBuf,
    quality: QualityPreset,
    timeout: Duration,
}

impl LibreOfficeEngine {
    pub fn new(executable: PathBuf, quality: QualityPreset, timeout: Duration) -> Self {
        Self {
            executable,
            quality,
            timeout,
        }
    }

    fn command(&self, input: &Path, output_dir: &Path) -> Command {
        let mut cmd = Command::new(&self.executable);
        cmd.arg("--headless")
            .args(["--convert-to", "pdf"])
            .arg("--outdir")
            .arg(output_dir)
            .arg(input);
        cmd
    }
}

impl Engine for LibreOfficeEngine {
    fn name(&self) -> &'static str {
        "LibreOffice"
    }

    fn export(&mut self, input: &Path, output_dir: &Path, _output: &Path) -> Result<()> {
        let mut cmd = self.command(input, output_dir);

        match run_with_timeout(&mut cmd, self.timeout)? {
            Completion::TimedOut => Err(Pptx2PdfError::Timeout {
                path: input.display().to_string(),
                limit: self.timeout,
            }),
            Completion::Exited(out) if out.status.success() => {
                if !out.stdout.trim().is_empty() {
                    debug!("soffice: {}", out.stdout.trim());
                }
                Ok(())
            }
            Completion::Exited(out) => {
                let code = out
                    .status
                    .code()
                    .map(|c| c.to_string())
                    .unwrap_or_else(|| "signal".to_string());
                let stderr = out.stderr.trim();
                let reason = if stderr.is_empty() {
                    format!("exit status {}", code)
                } else {
                    format!("exit status {}: {}", code, stderr)
                };
                Err(Pptx2PdfError::BackendFailure {
                    engine: self.name().to_string(),
                    path: input.display().to_string(),
                    reason,
                })
            }
        }
    }

    fn notes(&self) -> Vec<String> {
        vec![
            format!(
                "Quality: {} ({} DPI)",
                self.quality.label(),
                self.quality.dpi()
            ),
            "Quality presets currently use LibreOffice defaults (soffice CLI takes no PDF filter options)"
                .to_string(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_version() {
        assert_eq!(
            parse_version("LibreOffice 7.6.4.1 e19e193f88cd6c0525a17fb7a176ed8e6a3e2aa1"),
            Some("7.6.4.1".to_string())
        );
        assert_eq!(
            parse_version("LibreOfficeDev 24.8.0.0.alpha1 abc"),
            Some("24.8.0.0".to_string())
        );
        assert_eq!(parse_version("soffice: command not found"), None);
    }

    #[test]
    fn test_command_line() {
        let engine = LibreOfficeEngine::new(
            PathBuf::from("soffice"),
            QualityPreset::High,
            Duration::from_secs(600),
        );
        let cmd = engine.command(Path::new("deck.pptx"), Path::new("out"));
        let args: Vec<_> = cmd.get_args().map(|a| a.to_string_lossy().into_owned()).collect();
        assert_eq!(
            args,
            ["--headless", "--convert-to", "pdf", "--outdir", "out", "deck.pptx"]
        );
    }

    #[test]
    fn test_notes_mention_defaults() {
        let engine = LibreOfficeEngine::new(
            PathBuf::from("soffice"),
            QualityPreset::Screen,
            Duration::from_secs(1),
        );
        let notes = engine.notes();
        assert!(notes[0].contains("96 DPI"));
        assert!(notes[1].contains("LibreOffice defaults"));
    }

    #[cfg(unix)]
    mod fake_soffice {
        use crate::engine::libreoffice::{parse_version, probe_version, LibreOfficeEngine};
        use crate::engine::Engine;
        use crate::error::Pptx2PdfError;
        use crate::models::QualityPreset;
        use std::fs;
        use std::os::unix::fs::PermissionsExt;
        use std::path::{Path, PathBuf};
        use std::time::Duration;

        /// 写一个模拟 soffice 的 shell 脚本
        fn script(dir: &Path, body: &str) -> PathBuf {
            let path = dir.join("soffice");
            fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
            fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
            path
        }

        #[test]
        fn test_probe_version() {
            let dir = tempfile::tempdir().unwrap();
            let exe = script(dir.path(), "echo 'LibreOffice 7.5.9.2 abcdef'");
            let banner = probe_version(&exe).unwrap();
            assert_eq!(parse_version(&banner), Some("7.5.9.2".to_string()));

            let broken = dir.path().join("broken");
            fs::write(&broken, "#!/bin/sh\nexit 1\n").unwrap();
            fs::set_permissions(&broken, fs::Permissions::from_mode(0o755)).unwrap();
            assert!(probe_version(&broken).is_none());
        }

        #[test]
        fn test_nonzero_exit_is_backend_failure() {
            let dir = tempfile::tempdir().unwrap();
            let exe = script(dir.path(), "echo 'source file could not be loaded' >&2\nexit 81");
            let mut engine =
                LibreOfficeEngine::new(exe, QualityPreset::Standard, Duration::from_secs(10));

            let err = engine
                .export(
                    Path::new("deck.pptx"),
                    dir.path(),
                    &dir.path().join("deck.pdf"),
                )
                .unwrap_err();
            match err {
                Pptx2PdfError::BackendFailure { reason, .. } => {
                    assert!(reason.contains("81"));
                    assert!(reason.contains("could not be loaded"));
                }
                other => panic!("unexpected error: {other}"),
            }
        }

        #[test]
        fn test_hang_is_timeout() {
            let dir = tempfile::tempdir().unwrap();
            let exe = script(dir.path(), "exec sleep 10");
            let mut engine =
                LibreOfficeEngine::new(exe, QualityPreset::Standard, Duration::from_millis(300));

            let err = engine
                .export(
                    Path::new("deck.pptx"),
                    dir.path(),
                    &dir.path().join("deck.pdf"),
                )
                .unwrap_err();
            assert!(matches!(err, Pptx2PdfError::Timeout { .. }));
        }
    }
}
