//! # 外部进程执行工具
//!
//! 带超时地运行外部命令，并收集 stdout / stderr。
//!
//! ## 功能
//! - 轮询 `try_wait`，超时则 kill 并回收子进程
//! - 输出管道由独立线程读取，避免管道写满导致子进程阻塞
//!
//! ## 依赖关系
//! - 被 `engine/libreoffice.rs` 使用

use crate::error::{Pptx2PdfError, Result};

use log::debug;
use std::io::Read;
use std::process::{Command, ExitStatus, Stdio};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

/// 轮询子进程状态的间隔
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// 子进程退出后等待管道读取线程的最长时间。
/// 孙进程可能继承管道并保持打开。
const PIPE_GRACE: Duration = Duration::from_secs(2);

/// 正常退出的进程输出
#[derive(Debug)]
pub struct ProcessOutput {
    pub status: ExitStatus,
    pub stdout: String,
    pub stderr: String,
}

/// 进程执行结果
#[derive(Debug)]
pub enum Completion {
    Exited(ProcessOutput),
    TimedOut,
}

/// 运行命令，最多等待 `timeout`
///
/// stdin 被置空，stdout / stderr 被捕获。超时后子进程会被杀掉。
pub fn run_with_timeout(cmd: &mut Command, timeout: Duration) -> Result<Completion> {
    let program = cmd.get_program().to_string_lossy().into_owned();
    debug!("running {:?} (timeout {}s)", cmd, timeout.as_secs_f32());

    let mut child = cmd
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| Pptx2PdfError::CommandFailed {
            command: program.clone(),
            source: e,
        })?;

    let stdout_rx = child.stdout.take().map(drain_pipe);
    let stderr_rx = child.stderr.take().map(drain_pipe);

    let started = Instant::now();
    loop {
        let polled = child.try_wait().map_err(|e| Pptx2PdfError::CommandFailed {
            command: program.clone(),
            source: e,
        })?;

        if let Some(status) = polled {
            let stdout = collect_pipe(stdout_rx);
            let stderr = collect_pipe(stderr_rx);
            debug!("'{}' exited with {}", program, status);
            return Ok(Completion::Exited(ProcessOutput {
                status,
                stdout,
                stderr,
            }));
        }

        let elapsed = started.elapsed();
        if elapsed >= timeout {
            debug!("'{}' exceeded {:?}, killing", program, timeout);
            let _ = child.kill();
            let _ = child.wait();
            return Ok(Completion::TimedOut);
        }

        thread::sleep(POLL_INTERVAL.min(timeout - elapsed));
    }
}

/// 在后台线程中读完一个管道
fn drain_pipe<R: Read + Send + 'static>(mut pipe: R) -> mpsc::Receiver<String> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let mut buf = Vec::new();
        let _ = pipe.read_to_end(&mut buf);
        let _ = tx.send(String::from_utf8_lossy(&buf).into_owned());
    });
    rx
}

fn collect_pipe(rx: Option<mpsc::Receiver<String>>) -> String {
    rx.and_then(|rx| rx.recv_timeout(PIPE_GRACE).ok())
        .unwrap_or_default()
}
