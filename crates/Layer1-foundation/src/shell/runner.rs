//! Process execution - 외부 명령어 실행
//!
//! Plugin bodies call a [`ProcessRunner`] to probe the host. The runner only
//! reports what happened; interpreting exit status and output is up to the
//! plugin.

use super::config::ShellSettings;
use crate::{Error, Result};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tokio::runtime::{Handle, Runtime};
use tracing::{debug, warn};

/// 명령어 실행 결과
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellOutput {
    /// 종료 코드 (시그널로 종료된 경우 -1)
    pub exit_status: i32,
    pub stdout: String,
    pub stderr: String,
}

impl ShellOutput {
    pub fn new(exit_status: i32, stdout: impl Into<String>, stderr: impl Into<String>) -> Self {
        Self {
            exit_status,
            stdout: stdout.into(),
            stderr: stderr.into(),
        }
    }

    /// 종료 코드가 0인지 확인
    pub fn success(&self) -> bool {
        self.exit_status == 0
    }
}

// ============================================================================
// ProcessRunner - 명령어 실행 인터페이스
// ============================================================================

/// Process execution collaborator
pub trait ProcessRunner: Send + Sync {
    /// 명령어 실행 (블로킹)
    fn run(&self, command: &str) -> Result<ShellOutput>;
}

// ============================================================================
// SystemShell - 호스트 쉘 실행기
// ============================================================================

/// Runs commands through the configured host shell.
///
/// Each call blocks the caller, so it must be driven from synchronous code.
/// Calling it from inside a tokio runtime returns [`Error::Command`]. The child
/// is killed when the configured timeout elapses, and the call returns
/// [`Error::Timeout`]. A timeout of 0 disables the limit.
pub struct SystemShell {
    settings: ShellSettings,
    runtime: Runtime,
}

impl SystemShell {
    pub fn new(settings: ShellSettings) -> Result<Self> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        Ok(Self { settings, runtime })
    }

    pub fn settings(&self) -> &ShellSettings {
        &self.settings
    }

    /// 0이면 제한 없음
    fn timeout(&self) -> Option<Duration> {
        match self.settings.timeout_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }
}

impl ProcessRunner for SystemShell {
    fn run(&self, command: &str) -> Result<ShellOutput> {
        if Handle::try_current().is_ok() {
            return Err(Error::command(
                command,
                "cannot block on a command from inside an async runtime",
            ));
        }

        let (executable, args) = self.settings.build_command(command);
        debug!("Running command: {} {:?}", executable, args);

        let mut cmd = Command::new(&executable);
        cmd.args(&args)
            .envs(&self.settings.env)
            .stdin(Stdio::null())
            .kill_on_drop(true);
        if let Some(dir) = &self.settings.working_dir {
            cmd.current_dir(dir);
        }

        let output = match self.timeout() {
            Some(timeout) => self
                .runtime
                .block_on(async { tokio::time::timeout(timeout, cmd.output()).await })
                .map_err(|_| {
                    warn!("Command timed out after {:?}: {}", timeout, command);
                    Error::Timeout(format!("{} ({}s)", command, timeout.as_secs()))
                })?,
            None => self.runtime.block_on(cmd.output()),
        }
        .map_err(|e| Error::command(command, e.to_string()))?;

        let result = ShellOutput {
            exit_status: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };
        debug!("Command {:?} exited with {}", command, result.exit_status);
        Ok(result)
    }
}

impl std::fmt::Debug for SystemShell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SystemShell")
            .field("settings", &self.settings)
            .finish()
    }
}

// ============================================================================
// ScriptedRunner - 미리 정의된 출력을 반환하는 실행기
// ============================================================================

/// Returns canned outputs for known commands and records every call.
///
/// Unknown commands fail with [`Error::Command`], the same way a missing
/// binary would.
#[derive(Debug, Default)]
pub struct ScriptedRunner {
    outputs: HashMap<String, ShellOutput>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// 빌더 패턴: 명령어 출력 등록
    pub fn with_output(mut self, command: impl Into<String>, output: ShellOutput) -> Self {
        self.outputs.insert(command.into(), output);
        self
    }

    /// 지금까지 실행된 명령어 목록
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }
}

impl ProcessRunner for ScriptedRunner {
    fn run(&self, command: &str) -> Result<ShellOutput> {
        self.calls.lock().push(command.to_string());
        self.outputs
            .get(command)
            .cloned()
            .ok_or_else(|| Error::command(command, "no scripted output"))
    }
}
