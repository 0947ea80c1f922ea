//! Error types for hostfacts
//!
//! 모든 에러를 중앙에서 관리

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// hostfacts 에러 타입
#[derive(Error, Debug)]
pub enum Error {
    // ========================================================================
    // 설정 관련
    // ========================================================================
    #[error("Configuration error: {0}")]
    Config(String),

    // ========================================================================
    // 플러그인 로드 관련
    // ========================================================================
    #[error("Invalid plugin name: {0:?}")]
    InvalidName(String),

    // ========================================================================
    // 플러그인 실행 관련
    // ========================================================================
    #[error("Plugin {plugin} failed: {message}")]
    PluginExecution { plugin: String, message: String },

    // ========================================================================
    // 프로세스 실행 관련
    // ========================================================================
    #[error("Command failed to start: {command} - {message}")]
    Command { command: String, message: String },

    #[error("Timeout: {0}")]
    Timeout(String),

    // ========================================================================
    // 일반
    // ========================================================================
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    // ========================================================================
    // 외부 에러 변환
    // ========================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // ========================================================================
    // 기타
    // ========================================================================
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// 로드 단계에서 발생하는 에러인지 확인 (해당 fragment만 실패)
    pub fn is_load_error(&self) -> bool {
        matches!(self, Error::InvalidName(_) | Error::Config(_))
    }

    /// 외부 명령어 실행 중 발생한 에러인지 확인
    pub fn is_process_error(&self) -> bool {
        matches!(self, Error::Command { .. } | Error::Timeout(_))
    }

    /// 플러그인 실행 에러 생성 헬퍼
    pub fn plugin_execution(plugin: impl Into<String>, message: impl Into<String>) -> Self {
        Error::PluginExecution {
            plugin: plugin.into(),
            message: message.into(),
        }
    }

    /// 명령어 실행 에러 생성 헬퍼
    pub fn command(command: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Command {
            command: command.into(),
            message: message.into(),
        }
    }
}

// ============================================================================
// From 구현 (추가 변환)
// ============================================================================

impl From<String> for Error {
    fn from(s: String) -> Self {
        Error::Internal(s)
    }
}

impl From<&str> for Error {
    fn from(s: &str) -> Self {
        Error::Internal(s.to_string())
    }
}
