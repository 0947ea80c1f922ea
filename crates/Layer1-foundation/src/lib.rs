//! # hostfacts-foundation
//!
//! Foundation layer for hostfacts:
//! - Error: 공통 에러 타입 (thiserror)
//! - Config: 통합 설정 (FactsConfig, 글로벌 + 프로젝트 병합)
//! - Storage: JsonStore (설정 파일 로드)
//! - Env Detect: 플랫폼 태그 감지 (PlatformDetector)
//! - Shell: 외부 명령어 실행 (ProcessRunner)
//!
//! ## 아키텍처
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │  hostfacts-core (System, PluginRegistry, AttributeTree) │
//! │                     │                                   │
//! │          ┌──────────┴──────────┐                        │
//! │          ▼                     ▼                        │
//! │   PlatformDetector       ProcessRunner                  │
//! │   (HostPlatform,         (SystemShell,                  │
//! │    FixedPlatform)         ScriptedRunner)               │
//! └─────────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod env_detect;
pub mod error;
pub mod shell;
pub mod storage;

// ============================================================================
// Error
// ============================================================================
pub use error::{Error, Result};

// ============================================================================
// Config (설정)
// ============================================================================
pub use config::{FactsConfig, FACTS_CONFIG_FILE};

// ============================================================================
// Storage (저장소)
// ============================================================================
pub use storage::JsonStore;

// ============================================================================
// Environment Detection (플랫폼 감지)
// ============================================================================
pub use env_detect::{FixedPlatform, HostPlatform, OsType, PlatformDetector};

// ============================================================================
// Shell (명령어 실행)
// ============================================================================
pub use shell::{ProcessRunner, ScriptedRunner, ShellOutput, ShellSettings, ShellType, SystemShell};
