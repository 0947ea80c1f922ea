//! Plugin Definition - 플러그인 선언 정보
//!
//! 이름, 스키마 버전, provides/depends 집합, 플랫폼별 collector를 가집니다.
//! 로드 단계에서 [`PluginFragment`]를 흡수하며 만들어지고, 실행 단계에서는
//! 읽기 전용으로 공유됩니다.

use super::context::PluginContext;
use super::fragment::PluginFragment;
use hostfacts_foundation::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// 플랫폼 태그가 없는 collector의 키
pub const DEFAULT_PLATFORM: &str = "default";

// ============================================================================
// SchemaVersion
// ============================================================================

/// 플러그인 스키마 버전
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaVersion {
    /// Legacy: provides/require_plugin은 본문 실행 중에 호출
    Version6,
    /// Current: provides/depends는 정적 선언
    Version7,
}

impl SchemaVersion {
    pub fn is_legacy(&self) -> bool {
        matches!(self, SchemaVersion::Version6)
    }
}

impl fmt::Display for SchemaVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemaVersion::Version6 => write!(f, "version6"),
            SchemaVersion::Version7 => write!(f, "version7"),
        }
    }
}

// ============================================================================
// Collector - 수집 본문
// ============================================================================

type CollectFn = dyn Fn(&mut PluginContext<'_>) -> Result<()> + Send + Sync;

/// A collection body. Cloning shares the same body.
#[derive(Clone)]
pub struct Collector(Arc<CollectFn>);

impl Collector {
    pub fn new<F>(body: F) -> Self
    where
        F: Fn(&mut PluginContext<'_>) -> Result<()> + Send + Sync + 'static,
    {
        Self(Arc::new(body))
    }

    pub fn call(&self, ctx: &mut PluginContext<'_>) -> Result<()> {
        (self.0)(ctx)
    }

    /// 두 collector가 같은 본문을 공유하는지 확인
    pub fn same_body(&self, other: &Collector) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Collector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Collector(..)")
    }
}

// ============================================================================
// PluginDefinition
// ============================================================================

/// Declarative description of one plugin.
#[derive(Debug, Clone)]
pub struct PluginDefinition {
    name: String,
    version: SchemaVersion,
    source: String,
    provides: Vec<String>,
    depends: Vec<String>,
    collectors: BTreeMap<String, Collector>,
}

impl PluginDefinition {
    /// 첫 fragment로 정의 생성
    ///
    /// Returns the definition together with any platform tags the fragment
    /// declared more than once.
    pub(crate) fn create(
        name: impl Into<String>,
        source: impl Into<String>,
        fragment: PluginFragment,
    ) -> (Self, Vec<String>) {
        let mut definition = Self {
            name: name.into(),
            version: fragment.version(),
            source: source.into(),
            provides: Vec::new(),
            depends: Vec::new(),
            collectors: BTreeMap::new(),
        };
        let duplicates = definition.absorb(fragment);
        (definition, duplicates)
    }

    /// 같은 버전의 fragment 병합
    ///
    /// provides/depends는 중복 없이 누적되고, 새 플랫폼의 collector만 추가됩니다.
    /// 이미 있는 플랫폼 태그는 무시하고 그 목록을 반환합니다.
    pub(crate) fn absorb(&mut self, fragment: PluginFragment) -> Vec<String> {
        debug_assert_eq!(self.version, fragment.version());
        let parts = fragment.into_parts();

        extend_unique(&mut self.provides, parts.provides);
        extend_unique(&mut self.depends, parts.depends);

        let mut duplicates = Vec::new();
        for (platforms, collector) in parts.collectors {
            for platform in platforms {
                if self.collectors.contains_key(&platform) {
                    duplicates.push(platform);
                } else {
                    self.collectors.insert(platform, collector.clone());
                }
            }
        }
        duplicates
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> SchemaVersion {
        self.version
    }

    /// 정의를 처음 만든 fragment의 출처
    pub fn source(&self) -> &str {
        &self.source
    }

    /// 정적 provides (version7 전용, version6은 항상 비어 있음)
    pub fn provides(&self) -> &[String] {
        &self.provides
    }

    /// 정적 depends (version7 전용)
    pub fn depends(&self) -> &[String] {
        &self.depends
    }

    /// 등록된 플랫폼 태그 목록
    pub fn platforms(&self) -> impl Iterator<Item = &str> {
        self.collectors.keys().map(String::as_str)
    }

    pub fn has_collector(&self, platform: &str) -> bool {
        self.collectors.contains_key(platform)
    }

    /// 플랫폼에 맞는 collector 선택 (없으면 default, 그것도 없으면 None)
    pub fn collector_for(&self, platform: &str) -> Option<&Collector> {
        self.collectors
            .get(platform)
            .or_else(|| self.collectors.get(DEFAULT_PLATFORM))
    }
}

fn extend_unique(target: &mut Vec<String>, items: Vec<String>) {
    for item in items {
        if !target.contains(&item) {
            target.push(item);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop(_: &mut PluginContext<'_>) -> Result<()> {
        Ok(())
    }

    #[test]
    fn test_version_display() {
        assert_eq!(SchemaVersion::Version6.to_string(), "version6");
        assert_eq!(SchemaVersion::Version7.to_string(), "version7");
        assert!(SchemaVersion::Version6.is_legacy());
    }

    #[test]
    fn test_provides_accumulate_deduplicated() {
        let (mut def, _) = PluginDefinition::create(
            "Test",
            "/tmp/plugins/test",
            PluginFragment::v7().provides(["attr1"]).provides(["attr2", "attr3"]),
        );
        def.absorb(PluginFragment::v7().provides(["attr1", "attr4"]));

        assert_eq!(def.provides(), &["attr1", "attr2", "attr3", "attr4"]);
        assert_eq!(def.source(), "/tmp/plugins/test");
    }

    #[test]
    fn test_collect_data_default_platform() {
        let (def, _) = PluginDefinition::create("Test", "", PluginFragment::v7().collect_data(noop));
        assert!(def.has_collector(DEFAULT_PLATFORM));
    }

    #[test]
    fn test_same_body_for_multiple_platforms() {
        let (def, _) = PluginDefinition::create(
            "Test",
            "",
            PluginFragment::v7().collect_data_for(["windows", "aix"], noop),
        );
        assert_eq!(def.platforms().collect::<Vec<_>>(), vec!["aix", "windows"]);

        let aix = def.collector_for("aix").unwrap();
        let windows = def.collector_for("windows").unwrap();
        assert!(aix.same_body(windows));
    }

    #[test]
    fn test_duplicate_platform_first_wins() {
        let first = Collector::new(noop);
        let (mut def, duplicates) = PluginDefinition::create(
            "Test",
            "",
            PluginFragment::v7().collector(["ubuntu"], first.clone()),
        );
        assert!(duplicates.is_empty());

        let duplicates = def.absorb(PluginFragment::v7().collect_data_for(["ubuntu", "darwin"], noop));
        assert_eq!(duplicates, vec!["ubuntu"]);
        assert!(def.collector_for("ubuntu").unwrap().same_body(&first));
        assert!(def.has_collector("darwin"));
    }

    #[test]
    fn test_collector_fallback() {
        let (def, _) = PluginDefinition::create("Test", "", PluginFragment::v7().collect_data_for(["ubuntu"], noop));
        assert!(def.collector_for("ubuntu").is_some());
        assert!(def.collector_for("darwin").is_none());

        let (def, _) = PluginDefinition::create("Test", "", PluginFragment::v7().collect_data(noop));
        assert!(def.collector_for("darwin").is_some());
    }
}
