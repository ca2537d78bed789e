//! # PDF 质量预设
//!
//! 定义四档导出质量及其在各引擎上的含义。
//!
//! ## 说明
//! - PowerPoint 引擎：映射到 `ExportAsFixedFormat` 的 format intent
//! - LibreOffice 引擎：`--convert-to pdf` 不接受滤镜参数，预设无实际效果，
//!   DPI / JPEG 质量仅用于显示
//!
//! ## 依赖关系
//! - 被 `cli/convert.rs`, `engine/`, `commands/presets.rs` 使用

use clap::ValueEnum;

/// PowerPoint 导出意图（`PpFixedFormatIntent`）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatIntent {
    /// ppFixedFormatIntentScreen
    Screen = 1,
    /// ppFixedFormatIntentPrint
    Print = 2,
}

impl FormatIntent {
    /// 自动化接口使用的数值
    pub fn code(self) -> i32 {
        self as i32
    }
}

impl std::fmt::Display for FormatIntent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FormatIntent::Screen => write!(f, "screen ({})", self.code()),
            FormatIntent::Print => write!(f, "print ({})", self.code()),
        }
    }
}

/// 质量预设
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq, Default)]
pub enum QualityPreset {
    /// Smallest files, optimized for viewing on screen
    Screen,
    /// Good balance between quality and file size
    #[default]
    Standard,
    /// High quality for professional printing
    High,
    /// Highest quality, largest files
    Maximum,
}

impl QualityPreset {
    pub const ALL: [QualityPreset; 4] = [
        QualityPreset::Screen,
        QualityPreset::Standard,
        QualityPreset::High,
        QualityPreset::Maximum,
    ];

    /// 显示名称
    pub fn label(self) -> &'static str {
        match self {
            QualityPreset::Screen => "Screen/Web",
            QualityPreset::Standard => "Standard (Balanced)",
            QualityPreset::High => "High Quality (Print)",
            QualityPreset::Maximum => "Maximum Quality (Archive)",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            QualityPreset::Screen => "Smallest files, optimized for viewing on screen",
            QualityPreset::Standard => "Good balance between quality and file size",
            QualityPreset::High => "High quality for professional printing",
            QualityPreset::Maximum => "Highest quality, largest files",
        }
    }

    /// 名义 DPI（LibreOffice 仅显示）
    pub fn dpi(self) -> u32 {
        match self {
            QualityPreset::Screen => 96,
            QualityPreset::Standard => 150,
            QualityPreset::High => 300,
            QualityPreset::Maximum => 600,
        }
    }

    /// 名义 JPEG 质量（LibreOffice 仅显示）
    pub fn jpeg_quality(self) -> u8 {
        match self {
            QualityPreset::Screen => 80,
            QualityPreset::Standard => 85,
            QualityPreset::High => 90,
            QualityPreset::Maximum => 95,
        }
    }

    /// PowerPoint 导出意图
    pub fn intent(self) -> FormatIntent {
        match self {
            QualityPreset::Screen | QualityPreset::Standard => FormatIntent::Screen,
            QualityPreset::High | QualityPreset::Maximum => FormatIntent::Print,
        }
    }
}

impl std::fmt::Display for QualityPreset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QualityPreset::Screen => write!(f, "screen"),
            QualityPreset::Standard => write!(f, "standard"),
            QualityPreset::High => write!(f, "high"),
            QualityPreset::Maximum => write!(f, "maximum"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intent_mapping() {
        assert_eq!(QualityPreset::Screen.intent(), FormatIntent::Screen);
        assert_eq!(QualityPreset::Standard.intent(), FormatIntent::Screen);
        assert_eq!(QualityPreset::High.intent(), FormatIntent::Print);
        assert_eq!(QualityPreset::Maximum.intent().code(), 2);
    }

    #[test]
    fn test_default_is_standard() {
        assert_eq!(QualityPreset::default(), QualityPreset::Standard);
        assert_eq!(QualityPreset::default().dpi(), 150);
    }
}
