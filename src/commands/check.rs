//! # check 命令实现
//!
//! 报告本机可用的转换引擎。
//!
//! ## 功能
//! - 探测 PowerPoint 自动化（仅 Windows）
//! - 查找 LibreOffice 并读取版本号
//! - 两者都不可用时以非零状态退出
//!
//! ## 依赖关系
//! - 使用 `cli/check.rs` 定义的参数
//! - 使用 `engine/`
//! - 使用 `utils/output.rs`, `utils/progress.rs`

use crate::cli::check::CheckArgs;
use crate::engine::{libreoffice, powerpoint, BackendResolver, EngineChoice};
use crate::error::{Pptx2PdfError, Result};
use crate::utils::{output, progress};

use std::path::PathBuf;
use tabled::{Table, Tabled};

/// 引擎状态表行
#[derive(Debug, Clone, Tabled)]
struct EngineRow {
    #[tabled(rename = "Engine")]
    engine: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Detail")]
    detail: String,
}

/// 探测结果
struct Availability {
    powerpoint: bool,
    libreoffice: Option<PathBuf>,
    /// `--version` 输出的第一行
    banner: Option<String>,
}

impl Availability {
    fn rows(&self) -> Vec<EngineRow> {
        let powerpoint_row = EngineRow {
            engine: "PowerPoint COM".to_string(),
            status: status(self.powerpoint),
            detail: if self.powerpoint {
                "native PowerPoint export".to_string()
            } else if cfg!(windows) {
                "PowerPoint not installed or not accessible".to_string()
            } else {
                "Windows only".to_string()
            },
        };

        let libreoffice_row = EngineRow {
            engine: "LibreOffice".to_string(),
            status: status(self.libreoffice.is_some()),
            detail: match &self.libreoffice {
                Some(path) => {
                    let version = self
                        .banner
                        .as_deref()
                        .and_then(libreoffice::parse_version)
                        .unwrap_or_else(|| "unknown version".to_string());
                    format!("{} ({})", path.display(), version)
                }
                None => "not found".to_string(),
            },
        };

        vec![powerpoint_row, libreoffice_row]
    }
}

fn status(available: bool) -> String {
    let label = if available { "available" } else { "missing" };
    label.to_string()
}

/// 执行 check 命令
pub fn execute(args: CheckArgs) -> Result<()> {
    output::print_header("Conversion Engines");

    let spinner = progress::create_spinner("Probing conversion engines...");
    let powerpoint = powerpoint::is_available();
    let soffice = BackendResolver::new(EngineChoice::Libreoffice)
        .with_libreoffice(args.libreoffice)
        .locate_libreoffice();
    let banner = soffice.as_deref().and_then(libreoffice::probe_version);
    spinner.finish_and_clear();

    let availability = Availability {
        powerpoint,
        libreoffice: soffice,
        banner,
    };
    println!("{}", Table::new(availability.rows()));
    println!();

    if availability.powerpoint {
        output::print_success("PowerPoint COM automation is available (used by --engine auto)");
    } else if let Some(path) = &availability.libreoffice {
        output::print_success(&format!("LibreOffice found: {}", path.display()));
    } else {
        output::print_error("No conversion engine available");
        return Err(Pptx2PdfError::BackendUnavailable);
    }

    Ok(())
}
