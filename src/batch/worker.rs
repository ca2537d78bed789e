//! # 后台批量转换
//!
//! 在后台线程中运行整个批次，界面线程以固定间隔轮询消息。
//!
//! ## 功能
//! - 有界通道传递进度事件，线程间没有其他共享状态
//! - 引擎在后台线程内创建和销毁（PowerPoint 会话绑定在创建它的线程上）
//! - 通道断开即表示后台线程已结束
//!
//! ## 依赖关系
//! - 被 `commands/convert.rs` 调用
//! - 使用 `batch/runner.rs`

use super::runner::{run_batch, BatchEvent};
use crate::engine::Engine;
use crate::error::{Pptx2PdfError, Result};
use crate::models::BatchSummary;

use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// 通道容量
pub const CHANNEL_CAPACITY: usize = 64;

/// 界面线程的默认轮询间隔
pub const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// 后台线程发出的消息
enum WorkerMessage {
    Event(BatchEvent),
    Done(BatchSummary),
}

/// 后台批量转换任务
pub struct BatchWorker {
    rx: Receiver<WorkerMessage>,
    handle: Option<JoinHandle<()>>,
    summary: Option<BatchSummary>,
    disconnected: bool,
}

impl BatchWorker {
    /// 启动后台线程
    ///
    /// `make_engine` 在后台线程中调用。
    pub fn spawn<F>(make_engine: F, files: Vec<PathBuf>, output_dir: Option<PathBuf>) -> Self
    where
        F: FnOnce() -> Box<dyn Engine> + Send + 'static,
    {
        let (tx, rx) = mpsc::sync_channel(CHANNEL_CAPACITY);

        let handle = thread::spawn(move || {
            let mut engine = make_engine();
            let summary = run_batch(engine.as_mut(), &files, output_dir.as_deref(), |event| {
                // 接收端已放弃时继续转换，只是不再报告
                let _ = tx.send(WorkerMessage::Event(event));
            });
            // 在发送汇总前关闭引擎会话
            drop(engine);
            let _ = tx.send(WorkerMessage::Done(summary));
        });

        Self {
            rx,
            handle: Some(handle),
            summary: None,
            disconnected: false,
        }
    }

    /// 取出当前所有可用事件（不阻塞）
    pub fn poll(&mut self) -> Vec<BatchEvent> {
        let mut events = Vec::new();
        loop {
            match self.rx.try_recv() {
                Ok(WorkerMessage::Event(event)) => events.push(event),
                Ok(WorkerMessage::Done(summary)) => self.summary = Some(summary),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    self.disconnected = true;
                    break;
                }
            }
        }
        events
    }

    /// 后台线程是否已结束且消息已取完
    pub fn is_finished(&self) -> bool {
        self.disconnected
    }

    /// 以固定间隔轮询直到结束，每个事件交给 `on_event`
    pub fn wait_with<F>(mut self, interval: Duration, mut on_event: F) -> Result<BatchSummary>
    where
        F: FnMut(BatchEvent),
    {
        loop {
            for event in self.poll() {
                on_event(event);
            }
            if self.is_finished() {
                break;
            }
            thread::sleep(interval);
        }
        self.join()
    }

    /// 等待后台线程并返回汇总
    pub fn join(mut self) -> Result<BatchSummary> {
        if let Some(handle) = self.handle.take() {
            handle
                .join()
                .map_err(|_| Pptx2PdfError::Other("conversion worker panicked".to_string()))?;
        }
        // 取走剩余消息
        while let Ok(message) = self.rx.try_recv() {
            if let WorkerMessage::Done(summary) = message {
                self.summary = Some(summary);
            }
        }
        self.summary
            .ok_or_else(|| Pptx2PdfError::Other("conversion worker produced no summary".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::converter::tests::FakeEngine;
    use std::fs;

    #[test]
    fn test_worker_reports_progress_and_summary() {
        let dir = tempfile::tempdir().unwrap();
        let files: Vec<PathBuf> = ["one.pptx", "two.pptx", "three.pptx"]
            .iter()
            .map(|name| {
                let path = dir.path().join(name);
                fs::write(&path, b"pptx").unwrap();
                path
            })
            .collect();

        let worker = BatchWorker::spawn(
            || -> Box<dyn Engine> { Box::new(FakeEngine::new().failing("two.pptx")) },
            files,
            Some(dir.path().join("pdf")),
        );

        let mut finished = 0;
        let summary = worker
            .wait_with(Duration::from_millis(5), |event| {
                if let BatchEvent::Finished { .. } = event {
                    finished += 1;
                }
            })
            .unwrap();

        assert_eq!(finished, 3);
        assert_eq!(summary.total, 3);
        assert_eq!(summary.success, 2);
        assert_eq!(summary.failed, 1);
        assert!(dir.path().join("pdf").join("one.pdf").is_file());
    }

    #[test]
    fn test_more_events_than_capacity() {
        let dir = tempfile::tempdir().unwrap();
        let files: Vec<PathBuf> = (0..CHANNEL_CAPACITY)
            .map(|i| {
                let path = dir.path().join(format!("deck{i}.pptx"));
                fs::write(&path, b"pptx").unwrap();
                path
            })
            .collect();

        let worker = BatchWorker::spawn(
            || -> Box<dyn Engine> { Box::new(FakeEngine::new()) },
            files,
            None,
        );
        let mut events = 0;
        let summary = worker
            .wait_with(Duration::from_millis(1), |_| events += 1)
            .unwrap();

        assert_eq!(events, CHANNEL_CAPACITY * 2);
        assert_eq!(summary.success, CHANNEL_CAPACITY);
    }

    #[test]
    fn test_panicking_engine_is_reported() {
        let worker = BatchWorker::spawn(
            || -> Box<dyn Engine> { panic!("engine construction failed") },
            vec![],
            None,
        );
        let err = worker.wait_with(Duration::from_millis(1), |_| {}).unwrap_err();
        assert!(matches!(err, Pptx2PdfError::Other(_)));
    }
}
