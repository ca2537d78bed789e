//! # PowerPoint 引擎
//!
//! 通过 Windows PowerShell 托管 `PowerPoint.Application` COM 对象，
//! 用 PowerPoint 自身的 `ExportAsFixedFormat` 导出 PDF。
//!
//! ## 会话
//! - 第一次导出时启动宿主进程并创建 PowerPoint 实例，之后整个批次复用
//! - 每个文件：`Presentations.Open`（只读、无窗口）-> `ExportAsFixedFormat` -> `Close`
//! - 会话在 `Drop` 时调用 `Quit` 并回收宿主进程
//! - 某个文件超时后，会话被销毁，下一个文件重新启动
//!
//! 宿主通过 stdin 逐行接收脚本，结果以 `PPTX2PDF:` 前缀的行写回 stdout。
//! 重定向的 stdin 按 OEM 代码页解码，所以脚本以 UTF-16LE 的 base64 形式发送，
//! 每行都是纯 ASCII；宿主输出被切换为 UTF-8，读取时容忍非法字节。
//!
//! ## 依赖关系
//! - 被 `engine/mod.rs` 使用

use super::Engine;
use crate::error::{Pptx2PdfError, Result};
use crate::models::{FormatIntent, QualityPreset};

use base64::{engine::general_purpose, Engine as _};
use log::{debug, warn};
use std::ffi::OsString;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::time::{Duration, Instant};

/// 自动化宿主
const HOST: &str = "powershell";

/// 启动 PowerPoint 的超时
const STARTUP_TIMEOUT: Duration = Duration::from_secs(60);

/// 可用性探测的超时
const PROBE_TIMEOUT: Duration = Duration::from_secs(30);

/// `Quit` 后等待宿主退出的时间
const QUIT_GRACE: Duration = Duration::from_secs(10);

const MARKER: &str = "PPTX2PDF:";

/// ppFixedFormatTypePDF
const FIXED_FORMAT_PDF: i32 = 2;

/// 当前平台能否使用 PowerPoint 自动化
///
/// 非 Windows 平台直接返回 `false`；Windows 上实际启动并退出一次 PowerPoint。
pub fn is_available() -> bool {
    if !cfg!(windows) {
        return false;
    }

    match PowerPointSession::start(&Host::powershell(), PROBE_TIMEOUT) {
        Ok(_session) => true,
        Err(e) => {
            debug!("PowerPoint automation unavailable: {}", e);
            false
        }
    }
}

/// 宿主返回的单条结果
#[derive(Debug, PartialEq, Eq)]
enum Reply {
    Ok,
    Ready,
    Error(String),
}

/// 解析宿主输出行，非协议行返回 `None`
fn parse_reply(line: &str) -> Option<Reply> {
    let body = line.trim().strip_prefix(MARKER)?;
    match body {
        "OK" => Some(Reply::Ok),
        "READY" => Some(Reply::Ready),
        _ => body
            .strip_prefix("ERR")
            .map(|msg| Reply::Error(msg.trim().to_string())),
    }
}

/// PowerShell 单引号字符串字面量
///
/// PowerShell 把弯引号也视为单引号，同样需要双写。
fn ps_quote(text: &str) -> String {
    let mut quoted = String::with_capacity(text.len() + 2);
    quoted.push('\'');
    for c in text.chars() {
        if matches!(c, '\'' | '\u{2018}' | '\u{2019}' | '\u{201A}' | '\u{201B}') {
            quoted.push(c);
        }
        quoted.push(c);
    }
    quoted.push('\'');
    quoted
}

fn report_error_clause() -> String {
    format!(
        "[Console]::Out.WriteLine('{}ERR ' + ($_.Exception.Message -replace '\\s+', ' '))",
        MARKER
    )
}

fn startup_script() -> String {
    format!(
        "[Console]::OutputEncoding = [Text.Encoding]::UTF8; \
         $ErrorActionPreference = 'Stop'; try {{ $app = New-Object -ComObject PowerPoint.Application; \
         [Console]::Out.WriteLine('{m}READY') }} catch {{ {err} }}",
        m = MARKER,
        err = report_error_clause()
    )
}

/// 单个文件的导出脚本：只读、无标题、无窗口打开，导出后总是关闭
fn export_script(input: &Path, output: &Path, intent: FormatIntent) -> String {
    format!(
        "$p = $null; try {{ $p = $app.Presentations.Open({input}, -1, -1, 0); \
         $p.ExportAsFixedFormat({output}, {fmt}, {intent}); \
         [Console]::Out.WriteLine('{m}OK') }} catch {{ {err} }} \
         finally {{ if ($p) {{ $p.Close() }} }}",
        input = ps_quote(&input.to_string_lossy()),
        output = ps_quote(&output.to_string_lossy()),
        fmt = FIXED_FORMAT_PDF,
        intent = intent.code(),
        m = MARKER,
        err = report_error_clause()
    )
}

/// 把脚本包装成一行纯 ASCII 命令，由宿主解码后执行
fn encode_script(script: &str) -> String {
    let utf16: Vec<u8> = script.encode_utf16().flat_map(u16::to_le_bytes).collect();
    format!(
        "iex ([Text.Encoding]::Unicode.GetString([Convert]::FromBase64String('{}')))",
        general_purpose::STANDARD.encode(utf16)
    )
}

/// 纯 ASCII，原样发送
const QUIT_SCRIPT: &str = "if ($app) { $app.Quit(); \
    [void][System.Runtime.InteropServices.Marshal]::ReleaseComObject($app) }; exit";

/// 自动化宿主进程的启动方式
struct Host {
    program: OsString,
    args: Vec<OsString>,
    /// `Quit` 后等待宿主退出的时间
    quit_grace: Duration,
}

impl Host {
    fn powershell() -> Self {
        Self {
            program: HOST.into(),
            args: ["-NoLogo", "-NoProfile", "-NonInteractive", "-Command", "-"]
                .iter()
                .map(OsString::from)
                .collect(),
            quit_grace: QUIT_GRACE,
        }
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null());
        hide_console(&mut cmd);
        cmd
    }
}

/// 逐行读取宿主输出，非 UTF-8 字节按替换字符处理
fn read_replies(stdout: ChildStdout, tx: Sender<String>) {
    let mut reader = BufReader::new(stdout);
    let mut buf = Vec::new();
    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf) {
            Ok(0) | Err(_) => break,
            Ok(_) => {
                let line = String::from_utf8_lossy(&buf).trim_end().to_string();
                if tx.send(line).is_err() {
                    break;
                }
            }
        }
    }
}

/// 一个运行中的 PowerPoint 自动化会话
struct PowerPointSession {
    child: Child,
    stdin: Option<ChildStdin>,
    lines: Receiver<String>,
    program: String,
    quit_grace: Duration,
}

impl PowerPointSession {
    /// 启动宿主并创建 PowerPoint 实例
    fn start(host: &Host, timeout: Duration) -> Result<Self> {
        let program = host.program.to_string_lossy().into_owned();
        debug!("starting PowerPoint automation host '{}'", program);
        let mut child = host
            .command()
            .spawn()
            .map_err(|e| Pptx2PdfError::CommandFailed {
                command: program.clone(),
                source: e,
            })?;

        let stdin = child.stdin.take();
        let (tx, lines) = mpsc::channel();
        if let Some(stdout) = child.stdout.take() {
            thread::spawn(move || read_replies(stdout, tx));
        }

        let mut session = Self {
            child,
            stdin,
            lines,
            program,
            quit_grace: host.quit_grace,
        };

        match session.run(&startup_script(), timeout)? {
            Some(Reply::Ready) => Ok(session),
            Some(Reply::Error(msg)) => Err(Pptx2PdfError::BackendFailure {
                engine: "PowerPoint".to_string(),
                path: "PowerPoint.Application".to_string(),
                reason: msg,
            }),
            Some(Reply::Ok) | None => Err(Pptx2PdfError::Other(
                "PowerPoint automation host did not start".to_string(),
            )),
        }
    }

    /// 发送一行脚本并等待结果
    ///
    /// 超时返回 `Ok(None)`；宿主退出返回错误。
    fn run(&mut self, script: &str, timeout: Duration) -> Result<Option<Reply>> {
        let stdin = self
            .stdin
            .as_mut()
            .ok_or_else(|| Pptx2PdfError::Other("PowerPoint session is closed".to_string()))?;

        writeln!(stdin, "{}", encode_script(script))
            .and_then(|_| stdin.flush())
            .map_err(|e| Pptx2PdfError::CommandFailed {
                command: self.program.clone(),
                source: e,
            })?;

        // 超大的超时值视为不限时
        let deadline = Instant::now().checked_add(timeout);
        loop {
            let received = match deadline {
                Some(deadline) => self
                    .lines
                    .recv_timeout(deadline.saturating_duration_since(Instant::now())),
                None => self.lines.recv().map_err(|_| RecvTimeoutError::Disconnected),
            };
            match received {
                Ok(line) => match parse_reply(&line) {
                    Some(reply) => return Ok(Some(reply)),
                    None => debug!("powershell: {}", line),
                },
                Err(RecvTimeoutError::Timeout) => return Ok(None),
                Err(RecvTimeoutError::Disconnected) => {
                    return Err(Pptx2PdfError::Other(
                        "PowerPoint automation host exited unexpectedly".to_string(),
                    ))
                }
            }
        }
    }
}

impl Drop for PowerPointSession {
    fn drop(&mut self) {
        if let Some(mut stdin) = self.stdin.take() {
            if let Err(e) = writeln!(stdin, "{}", QUIT_SCRIPT).and_then(|_| stdin.flush()) {
                debug!("could not send Quit to PowerPoint: {}", e);
            }
        }

        let deadline = Instant::now() + self.quit_grace;
        loop {
            match self.child.try_wait() {
                Ok(Some(_)) => {
                    debug!("PowerPoint automation host closed");
                    return;
                }
                Ok(None) if Instant::now() < deadline => {
                    thread::sleep(Duration::from_millis(100));
                }
                _ => break,
            }
        }

        warn!("PowerPoint automation host did not exit, killing it");
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

#[cfg(windows)]
fn hide_console(cmd: &mut Command) {
    use std::os::windows::process::CommandExt;
    const CREATE_NO_WINDOW: u32 = 0x0800_0000;
    cmd.creation_flags(CREATE_NO_WINDOW);
}

#[cfg(not(windows))]
fn hide_console(_cmd: &mut Command) {}

/// PowerPoint 引擎
pub struct PowerPointEngine {
    quality: QualityPreset,
    timeout: Duration,
    host: Host,
    /// 懒启动的会话
    session: Option<PowerPointSession>,
}

impl PowerPointEngine {
    pub fn new(quality: QualityPreset, timeout: Duration) -> Self {
        Self {
            quality,
            timeout,
            host: Host::powershell(),
            session: None,
        }
    }

    #[cfg(test)]
    fn with_host(mut self, host: Host) -> Self {
        self.host = host;
        self
    }

    fn session(&mut self) -> Result<&mut PowerPointSession> {
        let session = match self.session.take() {
            Some(session) => session,
            None => PowerPointSession::start(&self.host, STARTUP_TIMEOUT)?,
        };
        Ok(self.session.insert(session))
    }
}

impl Engine for PowerPointEngine {
    fn name(&self) -> &'static str {
        "PowerPoint"
    }

    fn export(&mut self, input: &Path, _output_dir: &Path, output: &Path) -> Result<()> {
        // COM 需要绝对路径
        let abs_input = std::path::absolute(input).map_err(|e| Pptx2PdfError::FileReadError {
            path: input.display().to_string(),
            source: e,
        })?;
        let abs_output =
            std::path::absolute(output).map_err(|e| Pptx2PdfError::FileWriteError {
                path: output.display().to_string(),
                source: e,
            })?;

        let script = export_script(&abs_input, &abs_output, self.quality.intent());
        let timeout = self.timeout;
        let reply = self.session()?.run(&script, timeout);

        match reply {
            Ok(Some(Reply::Ok)) => Ok(()),
            Ok(Some(Reply::Error(msg))) => Err(Pptx2PdfError::BackendFailure {
                engine: self.name().to_string(),
                path: input.display().to_string(),
                reason: msg,
            }),
            Ok(Some(Reply::Ready)) => Err(Pptx2PdfError::BackendFailure {
                engine: self.name().to_string(),
                path: input.display().to_string(),
                reason: "unexpected reply from automation host".to_string(),
            }),
            Ok(None) => {
                self.session = None;
                Err(Pptx2PdfError::Timeout {
                    path: input.display().to_string(),
                    limit: timeout,
                })
            }
            Err(e) => {
                self.session = None;
                Err(e)
            }
        }
    }

    fn notes(&self) -> Vec<String> {
        vec![format!(
            "Quality: {} (PowerPoint COM, format intent {})",
            self.quality.label(),
            self.quality.intent()
        )]
    }
}
