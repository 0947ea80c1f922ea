//! Facts Config - 통합 설정
//!
//! 수집 실행 전체에 적용되는 설정 (플랫폼 override, 비활성 플러그인, 쉘)

use crate::shell::ShellSettings;
use crate::storage::JsonStore;
use crate::Result;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// 설정 파일명
pub const FACTS_CONFIG_FILE: &str = "config.json";

// ============================================================================
// Facts Config (통합)
// ============================================================================

/// hostfacts 통합 설정
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FactsConfig {
    /// 버전 (마이그레이션용)
    #[serde(default = "default_version")]
    pub version: u32,

    /// 강제 플랫폼 태그 (None이면 자동 감지)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,

    /// 실행하지 않을 플러그인 이름
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub disabled_plugins: Vec<String>,

    /// 외부 명령어 실행 설정
    #[serde(default)]
    pub shell: ShellSettings,

    /// 기본 로그 필터 (예: "info", "hostfacts_core=debug")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_level: Option<String>,
}

impl FactsConfig {
    pub fn new() -> Self {
        Self::default()
    }

    // ========================================================================
    // Load
    // ========================================================================

    /// 글로벌 + 프로젝트 병합 로드
    pub fn load() -> Result<Self> {
        let mut config = Self::new();

        // 1. 글로벌 설정
        if let Ok(global) = JsonStore::global() {
            config.merge_from(&global)?;
        }

        // 2. 프로젝트 설정
        if let Ok(project) = JsonStore::current_project() {
            config.merge_from(&project)?;
        }

        Ok(config)
    }

    /// 주어진 저장소의 설정 파일이 있으면 병합
    pub fn merge_from(&mut self, store: &JsonStore) -> Result<()> {
        if let Some(other) = store.load_optional::<FactsConfig>(FACTS_CONFIG_FILE)? {
            debug!("Merging config from {}", store.base_dir().display());
            self.merge(other);
        }
        Ok(())
    }

    // ========================================================================
    // Merge
    // ========================================================================

    /// 다른 설정과 병합 (other가 우선)
    pub fn merge(&mut self, other: FactsConfig) {
        if other.platform.is_some() {
            self.platform = other.platform;
        }
        for name in other.disabled_plugins {
            if !self.disabled_plugins.contains(&name) {
                self.disabled_plugins.push(name);
            }
        }
        self.shell.merge(other.shell);
        if other.log_level.is_some() {
            self.log_level = other.log_level;
        }
    }

    // ========================================================================
    // Query
    // ========================================================================

    /// 플러그인 비활성 여부
    pub fn is_disabled(&self, plugin: &str) -> bool {
        self.disabled_plugins
            .iter()
            .any(|name| name.eq_ignore_ascii_case(plugin))
    }

    // ========================================================================
    // Builder
    // ========================================================================

    pub fn platform(mut self, platform: impl Into<String>) -> Self {
        self.platform = Some(platform.into());
        self
    }

    pub fn disable(mut self, plugin: impl Into<String>) -> Self {
        self.disabled_plugins.push(plugin.into());
        self
    }

    pub fn shell(mut self, shell: ShellSettings) -> Self {
        self.shell = shell;
        self
    }
}

impl Default for FactsConfig {
    fn default() -> Self {
        Self {
            version: default_version(),
            platform: None,
            disabled_plugins: Vec::new(),
            shell: ShellSettings::default(),
            log_level: None,
        }
    }
}

fn default_version() -> u32 {
    1
}
