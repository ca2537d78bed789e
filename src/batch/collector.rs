//! # 文件收集器
//!
//! 根据输入路径列表收集待转换文件。
//!
//! ## 功能
//! - 显式给出的文件原样保留（由转换器校验存在性和扩展名）
//! - 目录递归展开，只匹配全小写或全大写的扩展名（`pptx`, `ppt`, `PPTX`, `PPT`）
//! - 按发现顺序输出，指向同一文件的路径只保留第一次
//!
//! ## 依赖关系
//! - 被 `commands/convert.rs` 调用
//! - 使用 `walkdir` 遍历目录

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// 目录展开时匹配的扩展名
pub const DIRECTORY_EXTENSIONS: &[&str] = &["pptx", "ppt", "PPTX", "PPT"];

/// 文件收集器
pub struct FileCollector {
    /// 输入路径
    inputs: Vec<PathBuf>,
    /// 目录展开时匹配的扩展名（区分大小写）
    extensions: Vec<String>,
}

impl FileCollector {
    /// 创建新的文件收集器
    pub fn new(inputs: Vec<PathBuf>) -> Self {
        Self {
            inputs,
            extensions: DIRECTORY_EXTENSIONS.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// 收集所有待转换文件
    pub fn collect(&self) -> Vec<PathBuf> {
        let mut seen = HashSet::new();
        let mut files = Vec::new();

        for input in &self.inputs {
            let found = if input.is_dir() {
                self.walk(input)
            } else {
                vec![input.clone()]
            };

            for file in found {
                if seen.insert(dedup_key(&file)) {
                    files.push(file);
                }
            }
        }

        files
    }

    /// 递归展开目录
    fn walk(&self, dir: &Path) -> Vec<PathBuf> {
        WalkDir::new(dir)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .filter(|e| self.matches_extension(e.path()))
            .map(|e| e.path().to_path_buf())
            .collect()
    }

    /// 扩展名精确匹配（不做大小写折叠）
    fn matches_extension(&self, path: &Path) -> bool {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) => self.extensions.iter().any(|allowed| allowed == ext),
            None => false,
        }
    }
}

/// 去重用的路径：存在则取规范路径，否则去掉冗余的 `.` 分量
fn dedup_key(path: &Path) -> PathBuf {
    fs::canonicalize(path).unwrap_or_else(|_| path.components().collect())
}
