//! # 批量执行器
//!
//! 按发现顺序逐个转换文件，并汇总结果。
//!
//! ## 功能
//! - 严格串行（PowerPoint / LibreOffice 都是单实例桌面程序）
//! - 单个文件失败不会中断批次
//! - 通过回调报告进度事件
//!
//! ## 依赖关系
//! - 被 `batch/worker.rs` 调用
//! - 使用 `converter.rs`, `models/outcome.rs`

use crate::converter;
use crate::engine::Engine;
use crate::models::{BatchSummary, ConversionOutcome};

use std::fs;
use std::path::{Path, PathBuf};

/// 批量转换进度事件
#[derive(Debug)]
pub enum BatchEvent {
    /// 引擎的说明信息
    Note(String),
    /// 开始处理第 `index` 个文件（从 1 开始）
    Started {
        index: usize,
        total: usize,
        input: PathBuf,
        /// 输入文件大小（字节），无法读取时为 0
        bytes: u64,
    },
    /// 第 `index` 个文件处理完毕
    Finished {
        index: usize,
        total: usize,
        input: PathBuf,
        outcome: ConversionOutcome,
    },
}

/// 串行转换文件列表
pub fn run_batch<F>(
    engine: &mut dyn Engine,
    files: &[PathBuf],
    output_dir: Option<&Path>,
    mut on_event: F,
) -> BatchSummary
where
    F: FnMut(BatchEvent),
{
    let total = files.len();
    let mut summary = BatchSummary::default();

    for note in engine.notes() {
        on_event(BatchEvent::Note(note));
    }

    for (i, input) in files.iter().enumerate() {
        let index = i + 1;
        let bytes = fs::metadata(input).map(|m| m.len()).unwrap_or(0);
        on_event(BatchEvent::Started {
            index,
            total,
            input: input.clone(),
            bytes,
        });

        let outcome = converter::convert_file(engine, input, output_dir);
        summary.record(input.clone(), &outcome);

        on_event(BatchEvent::Finished {
            index,
            total,
            input: input.clone(),
            outcome,
        });
    }

    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::converter::tests::FakeEngine;

    fn decks(dir: &Path, names: &[&str]) -> Vec<PathBuf> {
        names
            .iter()
            .map(|name| {
                let path = dir.join(name);
                fs::write(&path, b"pptx").unwrap();
                path
            })
            .collect()
    }

    #[test]
    fn test_middle_failure_does_not_abort() {
        let dir = tempfile::tempdir().unwrap();
        let files = decks(dir.path(), &["one.pptx", "two.pptx", "three.pptx"]);

        let mut engine = FakeEngine::new().failing("two.pptx");
        let summary = run_batch(&mut engine, &files, None, |_| {});

        assert_eq!(summary.total, 3);
        assert_eq!(summary.success, 2);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.failures[0].0, files[1]);
        assert_eq!(engine.calls, files);
        assert!(dir.path().join("three.pdf").is_file());
    }

    #[test]
    fn test_timeout_recorded_and_batch_continues() {
        let dir = tempfile::tempdir().unwrap();
        let files = decks(dir.path(), &["a.pptx", "hang.pptx", "c.pptx"]);

        let mut engine = FakeEngine::new().hanging_on("hang.pptx");
        let mut finished = Vec::new();
        let summary = run_batch(&mut engine, &files, None, |ev| {
            if let BatchEvent::Finished { index, outcome, .. } = ev {
                finished.push((index, outcome.is_timeout()));
            }
        });

        assert_eq!(summary.total, 3);
        assert_eq!(summary.success, 2);
        assert_eq!(summary.failed, 1);
        assert_eq!(engine.calls, files);
        assert_eq!(finished, [(1, false), (2, true), (3, false)]);
        assert!(dir.path().join("c.pdf").is_file());
    }

    #[test]
    fn test_skipped_files_excluded_from_total() {
        let dir = tempfile::tempdir().unwrap();
        let files = decks(dir.path(), &["deck.pptx", "notes.txt"]);

        let mut engine = FakeEngine::new();
        let summary = run_batch(&mut engine, &files, None, |_| {});

        assert_eq!(summary.total, 1);
        assert_eq!(summary.success, 1);
        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.total, summary.success + summary.failed);
        assert_eq!(engine.calls.len(), 1);
    }

    #[test]
    fn test_events_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let files = decks(dir.path(), &["a.pptx", "b.pptx"]);

        let mut engine = FakeEngine::new();
        let mut events = Vec::new();
        run_batch(&mut engine, &files, Some(&dir.path().join("out")), |ev| {
            events.push(ev)
        });

        assert_eq!(events.len(), 4);
        assert!(matches!(events[0], BatchEvent::Started { index: 1, total: 2, bytes: 4, .. }));
        assert!(matches!(events[1], BatchEvent::Finished { index: 1, .. }));
        assert!(matches!(
            &events[3],
            BatchEvent::Finished {
                index: 2,
                outcome: ConversionOutcome::Converted { .. },
                ..
            }
        ));
    }
}
