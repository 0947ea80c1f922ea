//! Execution Context - 플러그인 인스턴스와 실행 컨텍스트
//!
//! [`PluginInstance`]는 한 실행(run) 안에서 선택된 플러그인 하나를 나타내고,
//! [`PluginContext`]는 본문이 실행되는 동안 본문에 넘겨지는 접근 창구입니다.

use super::definition::{PluginDefinition, SchemaVersion};
use super::ops::{ops_for, SchemaOps};
use crate::attribute::{AttributeTree, ProviderId};
use crate::diagnostics::Diagnostic;
use crate::system::System;
use hostfacts_foundation::{Error, Result, ShellOutput};
use serde_json::Value;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, trace};

/// 프로세스 전체에서 고유한 인스턴스 번호
static NEXT_INSTANCE_ID: AtomicU64 = AtomicU64::new(1);

// ============================================================================
// PluginInstance
// ============================================================================

/// One selected plugin within one run.
#[derive(Debug)]
pub struct PluginInstance {
    id: ProviderId,
    definition: Arc<PluginDefinition>,
    source: String,
    has_run: bool,
}

impl PluginInstance {
    pub fn new(definition: Arc<PluginDefinition>, source: impl Into<String>) -> Self {
        let instance = NEXT_INSTANCE_ID.fetch_add(1, Ordering::Relaxed);
        Self {
            id: ProviderId::new(definition.name(), instance),
            definition,
            source: source.into(),
            has_run: false,
        }
    }

    /// 정의의 출처를 그대로 사용하는 인스턴스
    pub fn from_definition(definition: Arc<PluginDefinition>) -> Self {
        let source = definition.source().to_string();
        Self::new(definition, source)
    }

    pub fn id(&self) -> &ProviderId {
        &self.id
    }

    pub fn name(&self) -> &str {
        self.definition.name()
    }

    pub fn version(&self) -> SchemaVersion {
        self.definition.version()
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn definition(&self) -> &Arc<PluginDefinition> {
        &self.definition
    }

    /// 본문 실행 완료 여부 (성공/실패 무관)
    pub fn has_run(&self) -> bool {
        self.has_run
    }

    /// 본문 실행 후 `has_run` 설정
    ///
    /// A failure is recorded on the system as a
    /// [`Diagnostic::PluginExecutionFailure`] and returned to the caller.
    pub fn run(&mut self, system: &mut System) -> Result<()> {
        let result = self.run_plugin(system);
        self.has_run = true;

        if let Err(err) = &result {
            system.record(Diagnostic::PluginExecutionFailure {
                plugin: self.name().to_string(),
                message: failure_message(err),
            });
        }
        result
    }

    /// 플랫폼에 맞는 collector 실행
    ///
    /// Errors and panics raised by the body are converted into
    /// [`Error::PluginExecution`]. Having no collector for the platform is not
    /// an error.
    pub fn run_plugin(&self, system: &mut System) -> Result<()> {
        let platform = system.platform_tag();
        let collector = match self.definition.collector_for(&platform) {
            Some(collector) => collector.clone(),
            None => {
                debug!(
                    "Plugin {} has no collector for platform {} or default",
                    self.name(),
                    platform
                );
                return Ok(());
            }
        };

        trace!("Running {} ({}) on {}", self.id, self.version(), platform);
        let outcome = {
            let mut ctx = PluginContext::new(system, self);
            panic::catch_unwind(AssertUnwindSafe(|| collector.call(&mut ctx)))
        };

        match outcome {
            Ok(Ok(())) => {
                if self.version() == SchemaVersion::Version7 {
                    self.claim_provides(system.tree_mut());
                }
                Ok(())
            }
            Ok(Err(err @ Error::PluginExecution { .. })) => Err(err),
            Ok(Err(err)) => Err(Error::plugin_execution(self.name(), err.to_string())),
            Err(payload) => Err(Error::plugin_execution(
                self.name(),
                format!("panicked: {}", panic_message(payload.as_ref())),
            )),
        }
    }

    /// 본문이 채운 정적 provides 경로에 provenance 추가
    fn claim_provides(&self, tree: &mut AttributeTree) {
        for path in self.definition.provides() {
            if tree.has(path) {
                tree.provide(path, &self.id);
            }
        }
    }
}

fn failure_message(err: &Error) -> String {
    match err {
        Error::PluginExecution { message, .. } => message.clone(),
        other => other.to_string(),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

// ============================================================================
// PluginContext
// ============================================================================

/// Handle passed to a collection body.
///
/// Attribute writes go to the run's shared tree and are attributed to the
/// running instance. `provides` and `require_plugin` behave according to the
/// plugin's schema version.
pub struct PluginContext<'a> {
    system: &'a mut System,
    instance: &'a PluginInstance,
    ops: &'static dyn SchemaOps,
}

impl<'a> PluginContext<'a> {
    pub(crate) fn new(system: &'a mut System, instance: &'a PluginInstance) -> Self {
        Self {
            system,
            instance,
            ops: ops_for(instance.version()),
        }
    }

    pub fn plugin_name(&self) -> &str {
        self.instance.name()
    }

    pub fn source(&self) -> &str {
        self.instance.source()
    }

    pub fn version(&self) -> SchemaVersion {
        self.instance.version()
    }

    pub fn provider_id(&self) -> &ProviderId {
        self.instance.id()
    }

    // ========================================================================
    // Attributes
    // ========================================================================

    /// attribute 값 조회 (없으면 None)
    pub fn get_attribute(&self, path: &str) -> Option<Value> {
        self.system.tree().get(path)
    }

    /// attribute 기록 (이 인스턴스가 provenance에 추가됨)
    pub fn set_attribute(&mut self, path: &str, value: impl Into<Value>) {
        let id = self.instance.id();
        self.system.tree_mut().set(path, value, id);
    }

    /// attribute 존재 여부
    pub fn attribute(&self, path: &str) -> bool {
        self.system.tree().has(path)
    }

    /// 공유 트리 (읽기 전용)
    pub fn tree(&self) -> &AttributeTree {
        self.system.tree()
    }

    // ========================================================================
    // Collaborators
    // ========================================================================

    /// 외부 명령어 실행
    pub fn shell_out(&self, command: &str) -> Result<ShellOutput> {
        debug!("{} shell_out: {}", self.plugin_name(), command);
        self.system.shell().run(command)
    }

    /// 현재 플랫폼 태그
    pub fn platform(&self) -> String {
        self.system.platform_tag()
    }

    // ========================================================================
    // Schema-dependent operations
    // ========================================================================

    /// 실행 중 provider 등록 (version6 전용)
    pub fn provides(&mut self, paths: &[&str]) {
        let ops = self.ops;
        ops.provides(self, paths);
    }

    /// 다른 플러그인 먼저 실행 (version6 전용)
    pub fn require_plugin(&mut self, names: &[&str]) {
        let ops = self.ops;
        ops.require_plugin(self, names);
    }

    pub(crate) fn system_mut(&mut self) -> &mut System {
        &mut *self.system
    }

    pub(crate) fn instance(&self) -> &PluginInstance {
        self.instance
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plugin::{PluginFragment, PluginRegistry};
    use hostfacts_foundation::{FixedPlatform, ScriptedRunner};
    use serde_json::json;

    fn system() -> System {
        System::builder()
            .registry(Arc::new(PluginRegistry::new()))
            .platform(Arc::new(FixedPlatform::new("ubuntu")))
            .shell(Arc::new(ScriptedRunner::new()))
            .build()
            .unwrap()
    }

    fn instance(fragment: PluginFragment) -> PluginInstance {
        let registry = PluginRegistry::new();
        let definition = registry.load("Test", fragment).unwrap();
        PluginInstance::new(definition, "/tmp/plugins/test")
    }

    #[test]
    fn test_instance_source_and_has_run() {
        let mut system = system();
        let mut plugin = instance(PluginFragment::v7().collect_data(|_| Ok(())));

        assert_eq!(plugin.source(), "/tmp/plugins/test");
        assert!(!plugin.has_run());
        plugin.run(&mut system).unwrap();
        assert!(plugin.has_run());
    }

    #[test]
    fn test_has_run_after_failure() {
        let mut system = system();
        let mut plugin = instance(
            PluginFragment::v7().collect_data(|_| Err(Error::InvalidInput("broken probe".into()))),
        );

        let err = plugin.run(&mut system).unwrap_err();
        assert!(plugin.has_run());
        assert!(matches!(err, Error::PluginExecution { .. }));
        assert!(system.diagnostics().iter().any(Diagnostic::is_failure));
    }

    #[test]
    fn test_panic_is_contained() {
        let mut system = system();
        let plugin = instance(PluginFragment::v7().collect_data(|_| panic!("probe exploded")));

        let err = plugin.run_plugin(&mut system).unwrap_err();
        assert!(err.to_string().contains("probe exploded"));
    }

    #[test]
    fn test_attribute_accessors() {
        let mut system = system();
        let plugin = instance(PluginFragment::v7().collect_data(|ctx| {
            ctx.set_attribute("tea", "is soothing");
            assert_eq!(ctx.get_attribute("tea"), Some(json!("is soothing")));
            assert!(ctx.attribute("tea"));
            assert!(!ctx.attribute("alice in chains"));
            assert_eq!(ctx.get_attribute("alice in chains"), None);
            Ok(())
        }));

        plugin.run_plugin(&mut system).unwrap();
        assert_eq!(system.tree().providers("tea"), &[plugin.id().clone()]);
    }

    #[test]
    fn test_instance_ids_are_unique() {
        let a = instance(PluginFragment::v7());
        let b = instance(PluginFragment::v7());
        assert_eq!(a.id().plugin, "Test");
        assert_ne!(a.id(), b.id());
    }
}
