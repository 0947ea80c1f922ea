//! Diagnostics - 실행을 중단하지 않는 경고/기록
//!
//! 로드 단계와 실행 단계에서 발생하는 non-fatal 상황을 기록합니다.
//! 각 항목은 생성 시점에 `tracing`으로도 출력됩니다.

use crate::plugin::SchemaVersion;
use serde::Serialize;
use std::fmt;
use tracing::{debug, warn};

/// Non-fatal condition recorded during load or run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    /// 이미 로드된 플러그인 이름 재선언 (첫 정의 유지)
    DuplicateDefinition {
        plugin: String,
        existing: SchemaVersion,
        attempted: SchemaVersion,
    },

    /// 이미 존재하는 플랫폼 태그의 collect_data 재선언 (무시됨)
    DuplicateCollector { plugin: String, platform: String },

    /// version7 본문에서 legacy 전용 연산 호출
    UnsupportedOperation { plugin: String, operation: String },

    /// 플러그인 본문 실행 실패
    PluginExecutionFailure { plugin: String, message: String },

    /// 순환 의존성 또는 provider 없는 attribute
    UnresolvableDependency { target: String, reason: String },
}

impl Diagnostic {
    /// 관련 플러그인 이름 (있으면)
    pub fn plugin(&self) -> Option<&str> {
        match self {
            Diagnostic::DuplicateDefinition { plugin, .. }
            | Diagnostic::DuplicateCollector { plugin, .. }
            | Diagnostic::UnsupportedOperation { plugin, .. }
            | Diagnostic::PluginExecutionFailure { plugin, .. } => Some(plugin),
            Diagnostic::UnresolvableDependency { .. } => None,
        }
    }

    pub fn is_duplicate_definition(&self) -> bool {
        matches!(self, Diagnostic::DuplicateDefinition { .. })
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Diagnostic::PluginExecutionFailure { .. })
    }

    /// 로그 출력
    pub(crate) fn emit(&self) {
        match self {
            Diagnostic::DuplicateDefinition { plugin, .. } => {
                debug!("Already loaded plugin {}", plugin);
            }
            Diagnostic::UnsupportedOperation { operation, .. } if operation == "require_plugin" => {
                warn!("[DEPRECATION] {}", self);
            }
            Diagnostic::UnsupportedOperation { .. } => {
                warn!("[UNSUPPORTED OPERATION] {}", self);
            }
            _ => warn!("{}", self),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::DuplicateDefinition {
                plugin,
                existing,
                attempted,
            } => write!(
                f,
                "Already loaded plugin {} ({}), ignoring {} redeclaration",
                plugin, existing, attempted
            ),
            Diagnostic::DuplicateCollector { plugin, platform } => write!(
                f,
                "Plugin {} already has a collector for platform '{}'",
                plugin, platform
            ),
            Diagnostic::UnsupportedOperation { plugin, operation } => write!(
                f,
                "{} is not supported in version7 plugins (called by {})",
                operation, plugin
            ),
            Diagnostic::PluginExecutionFailure { plugin, message } => {
                write!(f, "Plugin {} failed: {}", plugin, message)
            }
            Diagnostic::UnresolvableDependency { target, reason } => {
                write!(f, "Cannot resolve {}: {}", target, reason)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let diag = Diagnostic::DuplicateDefinition {
            plugin: "Go".into(),
            existing: SchemaVersion::Version6,
            attempted: SchemaVersion::Version7,
        };
        assert_eq!(
            diag.to_string(),
            "Already loaded plugin Go (version6), ignoring version7 redeclaration"
        );
        assert_eq!(diag.plugin(), Some("Go"));
        assert!(diag.is_duplicate_definition());
    }

    #[test]
    fn test_serialize_tagged() {
        let diag = Diagnostic::UnresolvableDependency {
            target: "kernel".into(),
            reason: "no provider".into(),
        };
        let value = serde_json::to_value(&diag).unwrap();
        assert_eq!(value["kind"], "unresolvable_dependency");
        assert_eq!(value["target"], "kernel");
        assert!(diag.plugin().is_none());
    }
}
