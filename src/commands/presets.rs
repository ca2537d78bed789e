//! # presets 命令实现
//!
//! 以表格列出质量预设及其在两个引擎上的含义。
//!
//! ## 依赖关系
//! - 使用 `models/quality.rs`
//! - 使用 `utils/output.rs`

use crate::error::Result;
use crate::models::QualityPreset;
use crate::utils::output;

use tabled::{Table, Tabled};

/// 预设表行
#[derive(Debug, Clone, Tabled)]
struct PresetRow {
    #[tabled(rename = "Preset")]
    preset: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "DPI")]
    dpi: u32,
    #[tabled(rename = "JPEG")]
    jpeg: u8,
    #[tabled(rename = "PowerPoint intent")]
    intent: String,
    #[tabled(rename = "Description")]
    description: String,
}

fn preset_rows() -> Vec<PresetRow> {
    QualityPreset::ALL
        .iter()
        .map(|&p| PresetRow {
            preset: p.to_string(),
            name: p.label().to_string(),
            dpi: p.dpi(),
            jpeg: p.jpeg_quality(),
            intent: p.intent().to_string(),
            description: p.description().to_string(),
        })
        .collect()
}

/// 执行 presets 命令
pub fn execute() -> Result<()> {
    output::print_header("PDF Quality Presets");
    println!("{}", Table::new(preset_rows()));
    println!();
    output::print_warning(
        "LibreOffice ignores presets (its command line accepts no PDF filter options). \
         DPI and JPEG columns are nominal; PowerPoint uses the format intent.",
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rows_cover_all_presets() {
        let rows = preset_rows();
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[0].preset, "screen");
        assert_eq!(rows[3].dpi, 600);
        assert!(rows[2].intent.starts_with("print"));
    }
}
