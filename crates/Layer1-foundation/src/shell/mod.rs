//! Shell - 외부 명령어 실행
//!
//! - `config.rs` - 쉘 타입과 실행 설정
//! - `runner.rs` - ProcessRunner trait과 구현체 (SystemShell, ScriptedRunner)

mod config;
mod runner;

pub use config::{ShellSettings, ShellType};
pub use runner::{ProcessRunner, ScriptedRunner, ShellOutput, SystemShell};
