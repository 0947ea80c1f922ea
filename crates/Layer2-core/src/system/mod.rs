//! # System - 의존성 해석 및 실행
//!
//! 요청된 attribute 또는 플러그인 이름으로부터 실행할 플러그인을 찾고,
//! depends를 먼저 해석한 뒤 각 플러그인을 한 번씩 실행합니다.
//!
//! ```text
//! run_attributes(["languages/go"])
//!   └─ ensure_attribute("languages/go")  ── providers_of ──► [Go]
//!        └─ ensure_plugin("Go")           NotStarted → Running
//!             ├─ ensure_attribute("languages")
//!             │    └─ ensure_plugin("Languages") → Completed
//!             └─ Go collector 실행          Running → Completed | Failed
//! ```
//!
//! 실행은 단일 스레드에서 순차적으로 이뤄지며, 한 플러그인의 실패는
//! diagnostic으로 기록될 뿐 나머지 실행을 중단하지 않습니다.

mod report;
mod state;

pub use report::RunReport;
pub use state::RunState;

use crate::attribute::AttributeTree;
use crate::diagnostics::Diagnostic;
use crate::plugin::{global_registry, nameify, PluginInstance, PluginRegistry};
use chrono::{DateTime, Utc};
use hostfacts_foundation::{
    FactsConfig, FixedPlatform, HostPlatform, PlatformDetector, ProcessRunner, Result, SystemShell,
};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::{debug, info};

/// 실행 대상
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// attribute 경로 ("languages/go")
    Attribute(String),
    /// 플러그인 이름 ("Go", "languages/go"도 nameify됨)
    Plugin(String),
}

// ============================================================================
// System
// ============================================================================

/// Dependency resolver and runner for one collection run.
pub struct System {
    registry: Arc<PluginRegistry>,
    tree: AttributeTree,
    platform: Arc<dyn PlatformDetector>,
    shell: Arc<dyn ProcessRunner>,
    disabled: HashSet<String>,
    states: HashMap<String, RunState>,
    instances: HashMap<String, PluginInstance>,
    run_order: Vec<String>,
    diagnostics: Vec<Diagnostic>,
    started_at: DateTime<Utc>,
}

impl System {
    pub fn builder() -> SystemBuilder {
        SystemBuilder::new()
    }

    /// 전역 레지스트리 + 기본 설정
    pub fn new() -> Result<Self> {
        SystemBuilder::new().build()
    }

    // ========================================================================
    // Runs
    // ========================================================================

    /// 등록된 모든 플러그인 실행 (로드 순)
    pub fn all_plugins(&mut self) -> RunReport {
        let names = self.registry.names();
        info!("Running {} plugins", names.len());
        for name in names {
            self.ensure_plugin(&name);
        }
        self.report()
    }

    /// 요청한 attribute들을 provide하는 플러그인만 실행
    pub fn run_attributes(&mut self, paths: &[&str]) -> RunReport {
        for path in paths {
            self.ensure_attribute(path);
        }
        self.report()
    }

    /// 이름으로 플러그인 실행 (주어진 순서대로)
    pub fn require_plugin(&mut self, names: &[&str]) {
        for name in names {
            self.ensure_plugin(name);
        }
    }

    pub fn ensure(&mut self, target: &Target) {
        match target {
            Target::Attribute(path) => {
                self.ensure_attribute(path);
            }
            Target::Plugin(name) => {
                self.ensure_plugin(name);
            }
        }
    }

    /// attribute를 provide하는 플러그인 실행
    ///
    /// Providers are looked up in order: exact static provides, static
    /// provides beneath the path, then legacy providers already recorded in
    /// the tree. Returns the plugin names that were ensured.
    pub fn ensure_attribute(&mut self, path: &str) -> Vec<String> {
        let mut targets = self.registry.providers_of(path);
        if targets.is_empty() {
            targets = self.registry.providers_under(path);
        }
        if targets.is_empty() {
            targets = self.registry.legacy_providers_of(path, &self.tree);
        }

        if targets.is_empty() {
            if !self.tree.has(path) {
                self.record(Diagnostic::UnresolvableDependency {
                    target: path.to_string(),
                    reason: "no plugin provides this attribute".to_string(),
                });
            }
            return targets;
        }

        for name in &targets {
            self.ensure_plugin(name);
        }
        targets
    }

    /// 플러그인을 (아직 실행되지 않았다면) 실행하고 상태 반환
    pub fn ensure_plugin(&mut self, name: &str) -> RunState {
        let definition = match self.registry.lookup(name) {
            Some(definition) => definition,
            None => {
                self.record(Diagnostic::UnresolvableDependency {
                    target: name.to_string(),
                    reason: "no such plugin".to_string(),
                });
                return RunState::NotStarted;
            }
        };
        let name = definition.name().to_string();

        if self.is_disabled(&name) {
            debug!("Skipping disabled plugin {}", name);
            return RunState::NotStarted;
        }

        match self.state_of(&name) {
            RunState::NotStarted => {}
            RunState::Running => {
                self.record(Diagnostic::UnresolvableDependency {
                    target: name,
                    reason: "dependency cycle".to_string(),
                });
                return RunState::Running;
            }
            state => return state,
        }

        self.states.insert(name.clone(), RunState::Running);
        for path in definition.depends() {
            self.ensure_attribute(path);
        }

        let mut instance = PluginInstance::from_definition(definition);
        let state = match instance.run(self) {
            Ok(()) => RunState::Completed,
            Err(_) => RunState::Failed,
        };
        debug!("Plugin {} {}", instance.id(), state);

        self.states.insert(name.clone(), state);
        self.run_order.push(name.clone());
        self.instances.insert(name, instance);
        state
    }

    // ========================================================================
    // Inspection
    // ========================================================================

    /// 플러그인 실행 상태 (모르는 이름은 NotStarted)
    pub fn state_of(&self, name: &str) -> RunState {
        let name = self
            .registry
            .lookup(name)
            .map(|definition| definition.name().to_string())
            .unwrap_or_else(|| name.to_string());
        self.states.get(&name).copied().unwrap_or_default()
    }

    /// 설정에서 비활성화된 플러그인인지 확인 (대소문자 무시, lookup과 동일)
    pub fn is_disabled(&self, name: &str) -> bool {
        self.disabled
            .iter()
            .any(|disabled| disabled.eq_ignore_ascii_case(name))
    }

    /// 실행된 플러그인 인스턴스
    pub fn instance(&self, name: &str) -> Option<&PluginInstance> {
        let definition = self.registry.lookup(name)?;
        self.instances.get(definition.name())
    }

    /// 실행 순서 (완료 또는 실패한 플러그인)
    pub fn run_order(&self) -> &[String] {
        &self.run_order
    }

    /// 이 실행에서 기록된 diagnostic
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// 실행 요약 (레지스트리 로드 diagnostic 포함)
    pub fn report(&self) -> RunReport {
        let with_state = |wanted: RunState| -> Vec<String> {
            self.run_order
                .iter()
                .filter(|name| self.states.get(*name) == Some(&wanted))
                .cloned()
                .collect()
        };

        let mut diagnostics = self.registry.diagnostics();
        diagnostics.extend(self.diagnostics.iter().cloned());

        RunReport {
            started_at: self.started_at,
            finished_at: Utc::now(),
            completed: with_state(RunState::Completed),
            failed: with_state(RunState::Failed),
            diagnostics,
        }
    }

    pub fn registry(&self) -> &Arc<PluginRegistry> {
        &self.registry
    }

    pub fn tree(&self) -> &AttributeTree {
        &self.tree
    }

    pub(crate) fn tree_mut(&mut self) -> &mut AttributeTree {
        &mut self.tree
    }

    /// 실행 종료 후 트리 반환
    pub fn into_tree(self) -> AttributeTree {
        self.tree
    }

    // ========================================================================
    // Collaborators
    // ========================================================================

    /// 현재 플랫폼 태그 (플러그인 실행마다 조회)
    pub fn platform_tag(&self) -> String {
        self.platform.current_platform_tag()
    }

    pub fn shell(&self) -> &dyn ProcessRunner {
        self.shell.as_ref()
    }

    pub(crate) fn record(&mut self, diagnostic: Diagnostic) {
        diagnostic.emit();
        self.diagnostics.push(diagnostic);
    }
}

// ============================================================================
// Builder
// ============================================================================

/// System 빌더
pub struct SystemBuilder {
    registry: Option<Arc<PluginRegistry>>,
    platform: Option<Arc<dyn PlatformDetector>>,
    shell: Option<Arc<dyn ProcessRunner>>,
    config: FactsConfig,
}

impl SystemBuilder {
    pub fn new() -> Self {
        Self {
            registry: None,
            platform: None,
            shell: None,
            config: FactsConfig::default(),
        }
    }

    /// 레지스트리 지정 (기본값: 전역 레지스트리)
    pub fn registry(mut self, registry: Arc<PluginRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    /// 플랫폼 감지기 지정 (설정의 platform보다 우선)
    pub fn platform(mut self, platform: Arc<dyn PlatformDetector>) -> Self {
        self.platform = Some(platform);
        self
    }

    /// 명령어 실행기 지정 (기본값: 설정의 쉘을 쓰는 SystemShell)
    pub fn shell(mut self, shell: Arc<dyn ProcessRunner>) -> Self {
        self.shell = Some(shell);
        self
    }

    pub fn config(mut self, config: FactsConfig) -> Self {
        self.config = config;
        self
    }

    pub fn build(self) -> Result<System> {
        let config = self.config;

        let platform: Arc<dyn PlatformDetector> = match (self.platform, &config.platform) {
            (Some(platform), _) => platform,
            (None, Some(tag)) => Arc::new(FixedPlatform::new(tag.clone())),
            (None, None) => Arc::new(HostPlatform::new()),
        };

        let shell: Arc<dyn ProcessRunner> = match self.shell {
            Some(shell) => shell,
            None => Arc::new(SystemShell::new(config.shell.clone())?),
        };

        let disabled = config
            .disabled_plugins
            .iter()
            .filter_map(|name| nameify(name).ok())
            .collect();

        Ok(System {
            registry: self.registry.unwrap_or_else(global_registry),
            tree: AttributeTree::new(),
            platform,
            shell,
            disabled,
            states: HashMap::new(),
            instances: HashMap::new(),
            run_order: Vec::new(),
            diagnostics: Vec::new(),
            started_at: Utc::now(),
        })
    }
}

impl Default for SystemBuilder {
    fn default() -> Self {
        Self::new()
    }
}
