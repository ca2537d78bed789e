//! # pptx2pdf - 批量 PowerPoint 转 PDF 工具
//!
//! 调用本机安装的 Microsoft PowerPoint（Windows）或 LibreOffice 完成转换，
//! 本身只负责查找引擎、构造调用、控制超时、收集文件和统计结果。
//!
//! ## 子命令
//! - `convert` - 批量转换文件或目录
//! - `check`   - 检查可用的转换引擎
//! - `presets` - 列出质量预设
//!
//! ## 依赖关系
//! ```text
//! main.rs
//!   ├── cli/        (命令行参数定义)
//!   ├── commands/   (命令执行逻辑)
//!   │     ├── batch/     (文件收集、串行执行、后台线程)
//!   │     ├── converter  (单文件转换与输出校验)
//!   │     ├── engine/    (PowerPoint / LibreOffice 引擎)
//!   │     └── models/    (质量预设、转换结果)
//!   ├── utils/      (输出、进度条、外部进程)
//!   └── error.rs    (错误处理)
//! ```

mod batch;
mod cli;
mod commands;
mod converter;
mod engine;
mod error;
mod models;
mod utils;

use clap::Parser;
use cli::Cli;

fn main() {
    // Initialize colored output for Windows compatibility
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    if let Err(e) = commands::run(cli.command) {
        utils::output::print_error(&format!("{}", e));
        std::process::exit(1);
    }
}
