//! # 转换引擎模块
//!
//! 定义统一的 [`Engine`] 接口，以及在启动时选择引擎的 [`BackendResolver`]。
//!
//! ## 引擎
//! - `powerpoint` - 通过自动化接口驱动 Microsoft PowerPoint（仅 Windows）
//! - `libreoffice` - 调用 `soffice --headless --convert-to pdf`
//!
//! ## 选择顺序
//! - `auto`: PowerPoint 可用则优先，否则 LibreOffice
//! - `powerpoint`: PowerPoint 不可用时回退到 LibreOffice
//! - `libreoffice`: 只使用 LibreOffice
//!
//! ## 依赖关系
//! - 被 `commands/`, `converter.rs`, `batch/` 使用
//! - 子模块: libreoffice, powerpoint

pub mod libreoffice;
pub mod powerpoint;

pub use libreoffice::LibreOfficeEngine;
pub use powerpoint::PowerPointEngine;

use crate::error::{Pptx2PdfError, Result};
use crate::models::QualityPreset;

use clap::ValueEnum;
use log::debug;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// 转换引擎统一接口
pub trait Engine {
    /// 引擎名称（用于日志和错误信息）
    fn name(&self) -> &'static str;

    /// 将 `input` 导出为 PDF
    ///
    /// `output` 是期望生成的文件，位于 `output_dir` 内。
    /// 返回 `Ok` 只代表引擎报告成功，输出文件由调用方校验。
    fn export(&mut self, input: &Path, output_dir: &Path, output: &Path) -> Result<()>;

    /// 批量开始前向用户展示的说明
    fn notes(&self) -> Vec<String> {
        Vec::new()
    }
}

/// 引擎偏好
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq, Default)]
pub enum EngineChoice {
    /// Prefer PowerPoint, fall back to LibreOffice
    #[default]
    Auto,
    /// Microsoft PowerPoint (Windows only)
    Powerpoint,
    /// LibreOffice (cross-platform)
    Libreoffice,
}

impl std::fmt::Display for EngineChoice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EngineChoice::Auto => write!(f, "auto"),
            EngineChoice::Powerpoint => write!(f, "powerpoint"),
            EngineChoice::Libreoffice => write!(f, "libreoffice"),
        }
    }
}

/// 已确定的引擎
///
/// 只记录选择结果，可跨线程传递；真正的 [`Engine`] 由 [`ResolvedBackend::into_engine`]
/// 在执行转换的线程中创建。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedBackend {
    PowerPoint,
    LibreOffice { executable: PathBuf },
}

impl ResolvedBackend {
    pub fn into_engine(self, quality: QualityPreset, timeout: Duration) -> Box<dyn Engine> {
        match self {
            ResolvedBackend::PowerPoint => Box::new(PowerPointEngine::new(quality, timeout)),
            ResolvedBackend::LibreOffice { executable } => {
                Box::new(LibreOfficeEngine::new(executable, quality, timeout))
            }
        }
    }
}

impl std::fmt::Display for ResolvedBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResolvedBackend::PowerPoint => {
                write!(f, "PowerPoint COM (native PowerPoint quality)")
            }
            ResolvedBackend::LibreOffice { executable } => {
                write!(f, "LibreOffice ({})", executable.display())
            }
        }
    }
}

/// 引擎选择结果
#[derive(Debug)]
pub struct Resolution {
    pub backend: ResolvedBackend,
    /// 选择过程中的警告（如回退）
    pub warnings: Vec<String>,
}

/// 引擎解析器
pub struct BackendResolver {
    choice: EngineChoice,
    /// 用户指定的 LibreOffice 路径
    explicit: Option<PathBuf>,
    /// 已知安装位置
    known_locations: Vec<PathBuf>,
    /// 通过 PATH 查找的命令名
    path_commands: Vec<String>,
    /// 是否探测 PowerPoint
    probe_powerpoint: bool,
}

impl BackendResolver {
    /// 创建使用当前平台默认搜索位置的解析器
    pub fn new(choice: EngineChoice) -> Self {
        Self {
            choice,
            explicit: None,
            known_locations: libreoffice::known_locations(),
            path_commands: libreoffice::PATH_COMMANDS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            probe_powerpoint: true,
        }
    }

    /// 设置用户指定的 LibreOffice 路径
    pub fn with_libreoffice(mut self, path: Option<PathBuf>) -> Self {
        self.explicit = path;
        self
    }

    /// 替换 LibreOffice 的搜索位置
    pub fn with_search(mut self, known_locations: Vec<PathBuf>, path_commands: Vec<String>) -> Self {
        self.known_locations = known_locations;
        self.path_commands = path_commands;
        self
    }

    /// 是否探测 PowerPoint
    pub fn probe_powerpoint(mut self, probe: bool) -> Self {
        self.probe_powerpoint = probe;
        self
    }

    /// 选择引擎
    ///
    /// 找不到任何引擎时返回 [`Pptx2PdfError::BackendUnavailable`]。
    pub fn resolve(&self) -> Result<Resolution> {
        let mut warnings = Vec::new();

        let wants_powerpoint = matches!(self.choice, EngineChoice::Auto | EngineChoice::Powerpoint);
        if wants_powerpoint {
            if self.probe_powerpoint && powerpoint::is_available() {
                debug!("PowerPoint automation available");
                return Ok(Resolution {
                    backend: ResolvedBackend::PowerPoint,
                    warnings,
                });
            }
            if self.choice == EngineChoice::Powerpoint {
                warnings.push(
                    "PowerPoint automation is not available, falling back to LibreOffice"
                        .to_string(),
                );
            }
        }

        if let Some(path) = &self.explicit {
            if !path.exists() {
                warnings.push(format!(
                    "LibreOffice path '{}' does not exist, searching default locations",
                    path.display()
                ));
            }
        }

        let executable = self
            .locate_libreoffice()
            .ok_or(Pptx2PdfError::BackendUnavailable)?;

        Ok(Resolution {
            backend: ResolvedBackend::LibreOffice { executable },
            warnings,
        })
    }

    /// 按顺序查找 LibreOffice：指定路径 -> 已知位置 -> PATH
    pub fn locate_libreoffice(&self) -> Option<PathBuf> {
        if let Some(path) = self.explicit.as_ref().filter(|p| p.exists()) {
            return Some(path.clone());
        }

        if let Some(path) = self.known_locations.iter().find(|p| p.exists()) {
            debug!("found LibreOffice at {}", path.display());
            return Some(path.clone());
        }

        self.path_commands
            .iter()
            .find(|cmd| libreoffice::probe_version(Path::new(cmd.as_str())).is_some())
            .map(PathBuf::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn offline_resolver(choice: EngineChoice) -> BackendResolver {
        BackendResolver::new(choice)
            .probe_powerpoint(false)
            .with_search(vec![], vec!["pptx2pdf-no-such-office".to_string()])
    }

    #[test]
    fn test_explicit_path_wins() {
        let dir = tempfile::tempdir().unwrap();
        let fake = dir.path().join("soffice");
        fs::write(&fake, "").unwrap();

        let resolution = offline_resolver(EngineChoice::Libreoffice)
            .with_libreoffice(Some(fake.clone()))
            .resolve()
            .unwrap();

        assert_eq!(
            resolution.backend,
            ResolvedBackend::LibreOffice { executable: fake }
        );
        assert!(resolution.warnings.is_empty());
    }

    #[test]
    fn test_known_location_used_when_explicit_missing() {
        let dir = tempfile::tempdir().unwrap();
        let installed = dir.path().join("program").join("soffice");
        fs::create_dir_all(installed.parent().unwrap()).unwrap();
        fs::write(&installed, "").unwrap();

        let resolution = BackendResolver::new(EngineChoice::Auto)
            .probe_powerpoint(false)
            .with_libreoffice(Some(dir.path().join("missing")))
            .with_search(
                vec![dir.path().join("nowhere"), installed.clone()],
                vec![],
            )
            .resolve()
            .unwrap();

        assert_eq!(
            resolution.backend,
            ResolvedBackend::LibreOffice {
                executable: installed
            }
        );
        assert_eq!(resolution.warnings.len(), 1);
    }

    #[test]
    fn test_nothing_found_is_unavailable() {
        let err = offline_resolver(EngineChoice::Auto).resolve().unwrap_err();
        assert!(matches!(err, Pptx2PdfError::BackendUnavailable));
    }

    #[test]
    fn test_powerpoint_request_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let fake = dir.path().join("soffice");
        fs::write(&fake, "").unwrap();

        let resolution = offline_resolver(EngineChoice::Powerpoint)
            .with_libreoffice(Some(fake))
            .resolve()
            .unwrap();

        assert!(matches!(
            resolution.backend,
            ResolvedBackend::LibreOffice { .. }
        ));
        assert!(resolution.warnings[0].contains("falling back"));
    }
}
