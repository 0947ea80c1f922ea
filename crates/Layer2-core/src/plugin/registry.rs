//! Plugin Registry - 플러그인 정의 저장소
//!
//! 로드 단계에서 fragment를 이름별로 병합하고, 실행 단계에서는
//! provider 조회에만 쓰입니다.

use super::definition::{PluginDefinition, SchemaVersion};
use super::fragment::PluginFragment;
use super::name::nameify;
use crate::attribute::{is_within, AttributeTree};
use crate::diagnostics::Diagnostic;
use hostfacts_foundation::Result;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::{Arc, OnceLock};
use tracing::{debug, info};

/// 등록된 정의
struct PluginEntry {
    definition: Arc<PluginDefinition>,

    /// 로드 순서
    load_order: usize,
}

/// 플러그인 레지스트리 - 이름 → 정의
pub struct PluginRegistry {
    /// 플러그인 저장소 (이름 -> PluginEntry)
    plugins: RwLock<HashMap<String, PluginEntry>>,

    /// 로드 카운터
    load_counter: RwLock<usize>,

    /// 로드 중 발생한 diagnostic
    diagnostics: RwLock<Vec<Diagnostic>>,
}

impl PluginRegistry {
    /// 새 레지스트리 생성
    pub fn new() -> Self {
        Self {
            plugins: RwLock::new(HashMap::new()),
            load_counter: RwLock::new(0),
            diagnostics: RwLock::new(Vec::new()),
        }
    }

    // ========================================================================
    // Load
    // ========================================================================

    /// fragment 로드 (새 정의 생성 또는 기존 정의에 병합)
    ///
    /// Redeclaring a legacy plugin, or redeclaring under a different schema
    /// version, keeps the first definition and records one
    /// [`Diagnostic::DuplicateDefinition`]. A version7 fragment for an existing
    /// version7 plugin is merged.
    pub fn load(&self, name_or_path: &str, fragment: PluginFragment) -> Result<Arc<PluginDefinition>> {
        let name = nameify(name_or_path)?;
        let mut diagnostics = Vec::new();

        let definition = {
            let mut plugins = self.plugins.write();

            match plugins.get_mut(&name) {
                Some(entry) => {
                    let existing = entry.definition.version();
                    let attempted = fragment.version();

                    if existing == SchemaVersion::Version7 && attempted == SchemaVersion::Version7 {
                        let duplicates = Arc::make_mut(&mut entry.definition).absorb(fragment);
                        diagnostics.extend(duplicate_collectors(&name, duplicates));
                        debug!("Merged fragment into plugin {}", name);
                    } else {
                        diagnostics.push(Diagnostic::DuplicateDefinition {
                            plugin: name.clone(),
                            existing,
                            attempted,
                        });
                    }
                    Arc::clone(&entry.definition)
                }
                None => {
                    let source = fragment.source_path().unwrap_or(name_or_path).to_string();
                    let (definition, duplicates) = PluginDefinition::create(&name, source, fragment);
                    diagnostics.extend(duplicate_collectors(&name, duplicates));

                    let mut counter = self.load_counter.write();
                    *counter += 1;
                    let definition = Arc::new(definition);

                    info!("Loaded plugin: {} ({})", name, definition.version());
                    plugins.insert(
                        name.clone(),
                        PluginEntry {
                            definition: Arc::clone(&definition),
                            load_order: *counter,
                        },
                    );
                    definition
                }
            }
        };

        for diagnostic in diagnostics {
            diagnostic.emit();
            self.diagnostics.write().push(diagnostic);
        }
        Ok(definition)
    }

    // ========================================================================
    // Query
    // ========================================================================

    /// 이름으로 정의 조회
    ///
    /// The name is nameified first; if there is no exact match, a
    /// case-insensitive match is accepted (`require_plugin("kernel")` finds
    /// `Kernel`).
    pub fn lookup(&self, name: &str) -> Option<Arc<PluginDefinition>> {
        let name = nameify(name).ok()?;
        let plugins = self.plugins.read();
        plugins
            .get(&name)
            .or_else(|| {
                plugins
                    .iter()
                    .find(|(key, _)| key.eq_ignore_ascii_case(&name))
                    .map(|(_, entry)| entry)
            })
            .map(|entry| Arc::clone(&entry.definition))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.lookup(name).is_some()
    }

    /// `path`를 정적으로 provide하는 version7 플러그인 이름 (로드 순)
    pub fn providers_of(&self, path: &str) -> Vec<String> {
        self.matching(|definition| definition.provides().iter().any(|p| p == path))
    }

    /// `path` 또는 그 하위 경로를 provide하는 version7 플러그인 이름 (로드 순)
    pub fn providers_under(&self, path: &str) -> Vec<String> {
        self.matching(|definition| definition.provides().iter().any(|p| is_within(p, path)))
    }

    /// 트리 provenance 기준으로 `path`를 provide한 legacy 플러그인 이름
    ///
    /// Legacy plugins only declare what they provide while running, so this is
    /// a live query against the tree.
    pub fn legacy_providers_of(&self, path: &str, tree: &AttributeTree) -> Vec<String> {
        let plugins = self.plugins.read();
        let mut names: Vec<String> = Vec::new();
        for provider in tree.providers(path) {
            let is_legacy = plugins
                .get(&provider.plugin)
                .map(|entry| entry.definition.version().is_legacy())
                .unwrap_or(false);
            if is_legacy && !names.contains(&provider.plugin) {
                names.push(provider.plugin.clone());
            }
        }
        names
    }

    /// 모든 플러그인 이름 (로드 순)
    pub fn names(&self) -> Vec<String> {
        self.matching(|_| true)
    }

    /// 모든 정의 (로드 순)
    pub fn definitions(&self) -> Vec<Arc<PluginDefinition>> {
        let plugins = self.plugins.read();
        let mut entries: Vec<&PluginEntry> = plugins.values().collect();
        entries.sort_by_key(|entry| entry.load_order);
        entries
            .into_iter()
            .map(|entry| Arc::clone(&entry.definition))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.plugins.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.plugins.read().is_empty()
    }

    /// 로드 단계 diagnostic
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.diagnostics.read().clone()
    }

    fn matching<F>(&self, predicate: F) -> Vec<String>
    where
        F: Fn(&PluginDefinition) -> bool,
    {
        self.definitions()
            .into_iter()
            .filter(|definition| predicate(definition))
            .map(|definition| definition.name().to_string())
            .collect()
    }
}

impl Default for PluginRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn duplicate_collectors(plugin: &str, platforms: Vec<String>) -> impl Iterator<Item = Diagnostic> + '_ {
    platforms
        .into_iter()
        .map(move |platform| Diagnostic::DuplicateCollector {
            plugin: plugin.to_string(),
            platform,
        })
}

// ============================================================================
// Global Registry
// ============================================================================

static GLOBAL_REGISTRY: OnceLock<Arc<PluginRegistry>> = OnceLock::new();

/// 프로세스 전역 레지스트리
pub fn global_registry() -> Arc<PluginRegistry> {
    GLOBAL_REGISTRY
        .get_or_init(|| Arc::new(PluginRegistry::new()))
        .clone()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attribute::ProviderId;
    use hostfacts_foundation::Error;

    #[test]
    fn test_load_nameifies() {
        let registry = PluginRegistry::new();
        let definition = registry.load("languages/go", PluginFragment::v7()).unwrap();

        assert_eq!(definition.name(), "LanguagesGo");
        assert_eq!(definition.source(), "languages/go");
        assert!(registry.contains("LanguagesGo"));
        assert!(registry.contains("languages/go"));
    }

    #[test]
    fn test_load_invalid_name() {
        let registry = PluginRegistry::new();
        let err = registry.load("::", PluginFragment::v7()).unwrap_err();
        assert!(matches!(err, Error::InvalidName(_)));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_fragment_source_preferred() {
        let registry = PluginRegistry::new();
        let definition = registry
            .load("Go", PluginFragment::v7().source("/tmp/plugins/go"))
            .unwrap();
        assert_eq!(definition.source(), "/tmp/plugins/go");
    }

    #[test]
    fn test_v7_fragments_merge() {
        let registry = PluginRegistry::new();
        registry.load("Test", PluginFragment::v7().provides(["one"])).unwrap();
        let definition = registry.load("Test", PluginFragment::v7().provides(["two"])).unwrap();

        assert_eq!(definition.provides(), &["one", "two"]);
        assert!(registry.diagnostics().is_empty());
    }

    #[test]
    fn test_legacy_redeclaration_recorded_once() {
        let registry = PluginRegistry::new();
        registry.load("Test", PluginFragment::v6()).unwrap();
        registry.load("Test", PluginFragment::v6()).unwrap();
        registry.load("Test", PluginFragment::v7().provides(["attr"])).unwrap();

        let duplicates: Vec<_> = registry
            .diagnostics()
            .into_iter()
            .filter(Diagnostic::is_duplicate_definition)
            .collect();
        assert_eq!(duplicates.len(), 2);

        let definition = registry.lookup("Test").unwrap();
        assert_eq!(definition.version(), SchemaVersion::Version6);
        assert!(definition.provides().is_empty());
    }

    #[test]
    fn test_v6_over_v7_ignored() {
        let registry = PluginRegistry::new();
        registry.load("Test", PluginFragment::v7().provides(["attr"])).unwrap();
        let definition = registry.load("Test", PluginFragment::v6()).unwrap();

        assert_eq!(definition.version(), SchemaVersion::Version7);
        assert_eq!(registry.diagnostics().len(), 1);
    }

    #[test]
    fn test_duplicate_collector_recorded() {
        let registry = PluginRegistry::new();
        registry
            .load("Test", PluginFragment::v7().collect_data_for(["ubuntu"], |_| Ok(())))
            .unwrap();
        registry
            .load("Test", PluginFragment::v7().collect_data_for(["ubuntu"], |_| Ok(())))
            .unwrap();

        assert_eq!(
            registry.diagnostics(),
            vec![Diagnostic::DuplicateCollector {
                plugin: "Test".into(),
                platform: "ubuntu".into(),
            }]
        );
    }

    #[test]
    fn test_providers_queries() {
        let registry = PluginRegistry::new();
        registry.load("Languages", PluginFragment::v7().provides(["languages"])).unwrap();
        registry
            .load("Go", PluginFragment::v7().provides(["languages/go"]).depends(["languages"]))
            .unwrap();
        registry.load("Legacy", PluginFragment::v6()).unwrap();

        assert_eq!(registry.providers_of("languages/go"), vec!["Go"]);
        assert_eq!(registry.providers_under("languages"), vec!["Languages", "Go"]);
        assert!(registry.providers_of("kernel").is_empty());
        assert_eq!(registry.names(), vec!["Languages", "Go", "Legacy"]);

        let mut tree = AttributeTree::new();
        tree.provide("kernel", &ProviderId::new("Legacy", 1));
        tree.provide("kernel", &ProviderId::new("Go", 2));
        assert_eq!(registry.legacy_providers_of("kernel", &tree), vec!["Legacy"]);
    }
}
