//! Shell Configuration - 쉘 설정
//!
//! 플러그인이 외부 명령어를 실행할 때 사용하는 쉘과 옵션을 정의합니다.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

// ============================================================================
// Shell Type
// ============================================================================

/// 쉘 타입
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShellType {
    /// POSIX sh (Unix 기본)
    Sh,
    /// Bash
    Bash,
    /// Zsh
    Zsh,
    /// PowerShell
    #[serde(alias = "pwsh")]
    PowerShell,
    /// Cmd (Windows 기본)
    Cmd,
}

impl ShellType {
    /// 현재 OS의 기본 쉘
    pub fn default_for_os() -> Self {
        #[cfg(target_os = "windows")]
        {
            Self::Cmd
        }
        #[cfg(not(target_os = "windows"))]
        {
            Self::Sh
        }
    }

    /// 쉘 실행 파일 이름 (기본값)
    pub fn default_executable(&self) -> &'static str {
        match self {
            ShellType::Sh => "sh",
            ShellType::Bash => "bash",
            ShellType::Zsh => "zsh",
            ShellType::PowerShell => {
                #[cfg(target_os = "windows")]
                {
                    "powershell.exe"
                }
                #[cfg(not(target_os = "windows"))]
                {
                    "pwsh"
                }
            }
            ShellType::Cmd => "cmd.exe",
        }
    }

    /// 명령어 실행 인자 (기본값)
    pub fn default_exec_args(&self) -> Vec<&'static str> {
        match self {
            ShellType::Sh | ShellType::Bash | ShellType::Zsh => vec!["-c"],
            ShellType::PowerShell => vec!["-NoProfile", "-NonInteractive", "-Command"],
            ShellType::Cmd => vec!["/C"],
        }
    }

    /// 문자열에서 파싱
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "sh" => Some(Self::Sh),
            "bash" => Some(Self::Bash),
            "zsh" => Some(Self::Zsh),
            "powershell" | "pwsh" => Some(Self::PowerShell),
            "cmd" | "cmd.exe" => Some(Self::Cmd),
            _ => None,
        }
    }
}

impl Default for ShellType {
    fn default() -> Self {
        Self::default_for_os()
    }
}

impl std::fmt::Display for ShellType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ShellType::Sh => write!(f, "sh"),
            ShellType::Bash => write!(f, "bash"),
            ShellType::Zsh => write!(f, "zsh"),
            ShellType::PowerShell => write!(f, "powershell"),
            ShellType::Cmd => write!(f, "cmd"),
        }
    }
}

// ============================================================================
// Shell Settings
// ============================================================================

/// 명령어 실행 설정
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShellSettings {
    /// 쉘 타입
    #[serde(default)]
    pub shell: ShellType,

    /// 실행 파일 경로 (기본값 사용 시 None)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub executable: Option<String>,

    /// 명령어 실행 인자 (기본값 사용 시 None)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub args: Option<Vec<String>>,

    /// 추가 환경 변수
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub env: HashMap<String, String>,

    /// 명령어 타임아웃 (초, 0이면 제한 없음)
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// 작업 디렉토리 (None이면 현재 디렉토리)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub working_dir: Option<PathBuf>,
}

impl ShellSettings {
    pub fn new() -> Self {
        Self {
            shell: ShellType::default_for_os(),
            executable: None,
            args: None,
            env: HashMap::new(),
            timeout_secs: default_timeout(),
            working_dir: None,
        }
    }

    /// 실행 파일 경로 가져오기 (설정 또는 기본값)
    pub fn get_executable(&self) -> String {
        self.executable
            .clone()
            .unwrap_or_else(|| self.shell.default_executable().to_string())
    }

    /// 실행 인자 가져오기 (설정 또는 기본값)
    pub fn get_args(&self) -> Vec<String> {
        self.args.clone().unwrap_or_else(|| {
            self.shell
                .default_exec_args()
                .into_iter()
                .map(String::from)
                .collect()
        })
    }

    /// 명령어 실행을 위한 전체 커맨드 생성
    pub fn build_command(&self, command: &str) -> (String, Vec<String>) {
        let mut args = self.get_args();
        args.push(command.to_string());
        (self.get_executable(), args)
    }

    /// 다른 설정과 병합 (other가 기본값이 아닌 항목만 우선)
    pub fn merge(&mut self, other: ShellSettings) {
        if other.shell != ShellType::default_for_os() {
            self.shell = other.shell;
        }
        if other.executable.is_some() {
            self.executable = other.executable;
        }
        if other.args.is_some() {
            self.args = other.args;
        }
        self.env.extend(other.env);
        if other.timeout_secs != default_timeout() {
            self.timeout_secs = other.timeout_secs;
        }
        if other.working_dir.is_some() {
            self.working_dir = other.working_dir;
        }
    }

    // Builder methods
    pub fn shell(mut self, shell: ShellType) -> Self {
        self.shell = shell;
        self
    }

    pub fn executable(mut self, exe: impl Into<String>) -> Self {
        self.executable = Some(exe.into());
        self
    }

    pub fn args(mut self, args: Vec<String>) -> Self {
        self.args = Some(args);
        self
    }

    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }

    pub fn timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    pub fn working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }
}

impl Default for ShellSettings {
    fn default() -> Self {
        Self::new()
    }
}

fn default_timeout() -> u64 {
    30
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shell_type_parse() {
        assert_eq!(ShellType::parse("bash"), Some(ShellType::Bash));
        assert_eq!(ShellType::parse("pwsh"), Some(ShellType::PowerShell));
        assert_eq!(ShellType::parse("CMD.exe"), Some(ShellType::Cmd));
        assert_eq!(ShellType::parse("tcsh"), None);
    }

    #[test]
    fn test_build_command() {
        let settings = ShellSettings::new().shell(ShellType::Bash);
        let (exe, args) = settings.build_command("go version");
        assert_eq!(exe, "bash");
        assert_eq!(args, vec!["-c", "go version"]);
    }

    #[test]
    fn test_custom_executable() {
        let settings = ShellSettings::new()
            .shell(ShellType::Sh)
            .executable("/bin/dash")
            .args(vec!["-ec".into()]);
        let (exe, args) = settings.build_command("uname");
        assert_eq!(exe, "/bin/dash");
        assert_eq!(args, vec!["-ec", "uname"]);
    }

    #[test]
    fn test_merge_keeps_base_timeout() {
        let mut base = ShellSettings::new().timeout(10);
        base.merge(ShellSettings::new().env("LANG", "C"));
        assert_eq!(base.timeout_secs, 10);
        assert_eq!(base.env.get("LANG").map(String::as_str), Some("C"));

        base.merge(ShellSettings::new().timeout(5));
        assert_eq!(base.timeout_secs, 5);
    }

    #[test]
    fn test_settings_deserialize_defaults() {
        let settings: ShellSettings = serde_json::from_str(r#"{"shell":"bash"}"#).unwrap();
        assert_eq!(settings.shell, ShellType::Bash);
        assert_eq!(settings.timeout_secs, 30);
        assert!(settings.executable.is_none());
    }
}
