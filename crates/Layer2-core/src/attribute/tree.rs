//! Attribute Tree - 수집된 fact와 provenance 저장소

use super::path::{join_path, split_path};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;
use tracing::warn;

// ============================================================================
// ProviderId - attribute를 기록한 플러그인 인스턴스
// ============================================================================

/// Identity of one plugin instance that wrote to the tree.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProviderId {
    /// 플러그인 이름
    pub plugin: String,

    /// 프로세스 내 고유 인스턴스 번호
    pub instance: u64,
}

impl ProviderId {
    pub fn new(plugin: impl Into<String>, instance: u64) -> Self {
        Self {
            plugin: plugin.into(),
            instance,
        }
    }
}

impl fmt::Display for ProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.plugin, self.instance)
    }
}

// ============================================================================
// AttributeNode
// ============================================================================

/// One node of the tree.
///
/// A node holding a scalar has no children; a node without a scalar is a
/// mapping (possibly empty).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AttributeNode {
    value: Option<Value>,
    children: BTreeMap<String, AttributeNode>,
    providers: Vec<ProviderId>,
}

impl AttributeNode {
    fn from_value(value: Value) -> Self {
        let mut node = Self::default();
        node.assign(value);
        node
    }

    /// 값 덮어쓰기 (provenance는 유지)
    fn assign(&mut self, value: Value) {
        match value {
            Value::Object(map) => {
                self.value = None;
                self.children = map
                    .into_iter()
                    .map(|(key, value)| (key, AttributeNode::from_value(value)))
                    .collect();
            }
            scalar => {
                self.children.clear();
                self.value = Some(scalar);
            }
        }
    }

    /// 하위 노드 가져오기 (없으면 생성, scalar였다면 mapping으로 교체)
    fn child_entry(&mut self, key: &str) -> &mut AttributeNode {
        self.value = None;
        self.children.entry(key.to_string()).or_default()
    }

    fn add_provider(&mut self, provider: &ProviderId) {
        if !self.providers.contains(provider) {
            self.providers.push(provider.clone());
        }
    }

    /// mapping 노드 여부
    pub fn is_map(&self) -> bool {
        self.value.is_none()
    }

    /// 하위 키 목록
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.children.keys().map(String::as_str)
    }

    /// 이 경로에 기록한 인스턴스 목록 (기록 순서)
    pub fn providers(&self) -> &[ProviderId] {
        &self.providers
    }

    /// JSON 값으로 변환 (provenance 제외)
    pub fn to_value(&self) -> Value {
        match &self.value {
            Some(value) => value.clone(),
            None => Value::Object(
                self.children
                    .iter()
                    .map(|(key, child)| (key.clone(), child.to_value()))
                    .collect::<Map<_, _>>(),
            ),
        }
    }

    /// provenance 포함 JSON 변환 (mapping 노드에 `_providers` 키 추가)
    pub fn to_value_with_providers(&self) -> Value {
        if let Some(value) = &self.value {
            if self.providers.is_empty() {
                return value.clone();
            }
            let mut map = Map::new();
            map.insert(VALUE_KEY.to_string(), value.clone());
            map.insert(PROVIDERS_KEY.to_string(), providers_value(&self.providers));
            return Value::Object(map);
        }

        let mut map: Map<String, Value> = self
            .children
            .iter()
            .map(|(key, child)| (key.clone(), child.to_value_with_providers()))
            .collect();
        if !self.providers.is_empty() {
            map.insert(PROVIDERS_KEY.to_string(), providers_value(&self.providers));
        }
        Value::Object(map)
    }
}

/// provenance 출력 키
pub const PROVIDERS_KEY: &str = "_providers";

/// provenance가 있는 scalar 노드의 값 키
pub const VALUE_KEY: &str = "_value";

fn providers_value(providers: &[ProviderId]) -> Value {
    Value::Array(
        providers
            .iter()
            .map(|p| Value::String(p.to_string()))
            .collect(),
    )
}

// ============================================================================
// AttributeTree
// ============================================================================

/// Hierarchical fact store for one collection run.
///
/// Values are last-write-wins; provenance only ever grows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AttributeTree {
    root: AttributeNode,
}

impl AttributeTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// 경로의 노드 조회
    pub fn node(&self, path: &str) -> Option<&AttributeNode> {
        let mut node = &self.root;
        for segment in split_path(path) {
            node = node.children.get(segment)?;
        }
        Some(node)
    }

    /// 경로의 값 조회 (없으면 None)
    pub fn get(&self, path: &str) -> Option<Value> {
        self.node(path).map(AttributeNode::to_value)
    }

    /// 경로 존재 여부 (빈 mapping도 존재로 취급)
    pub fn has(&self, path: &str) -> bool {
        self.node(path).is_some()
    }

    /// 값 기록 + writer를 provenance에 추가
    ///
    /// Intermediate mappings are created as needed. JSON objects are expanded
    /// into nested nodes so that later lookups can traverse into them. A path
    /// with no segments (`""`, `"/"`) names the root and is ignored.
    pub fn set(&mut self, path: &str, value: impl Into<Value>, writer: &ProviderId) {
        let Some(node) = self.entry(path, writer) else {
            return;
        };
        node.assign(value.into());
        node.add_provider(writer);
    }

    /// writer를 provider로 등록 (기존 값은 유지, 없으면 빈 mapping 생성)
    pub fn provide(&mut self, path: &str, writer: &ProviderId) {
        if let Some(node) = self.entry(path, writer) {
            node.add_provider(writer);
        }
    }

    /// 경로의 provenance
    pub fn providers(&self, path: &str) -> &[ProviderId] {
        self.node(path).map(AttributeNode::providers).unwrap_or(&[])
    }

    /// 최상위 키 목록
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.root.keys()
    }

    pub fn is_empty(&self) -> bool {
        self.root.children.is_empty()
    }

    /// 모든 노드 경로 (깊이 우선, 키 정렬 순)
    pub fn paths(&self) -> Vec<String> {
        let mut paths = Vec::new();
        let mut prefix = Vec::new();
        collect_paths(&self.root, &mut prefix, &mut paths);
        paths
    }

    /// provenance가 있는 모든 경로 → provider 목록
    pub fn provenance(&self) -> BTreeMap<String, Vec<ProviderId>> {
        self.paths()
            .into_iter()
            .filter_map(|path| {
                let providers = self.providers(&path);
                (!providers.is_empty()).then(|| (path.clone(), providers.to_vec()))
            })
            .collect()
    }

    /// 전체 트리를 JSON 값으로 변환
    pub fn to_value(&self) -> Value {
        self.root.to_value()
    }

    /// provenance를 포함한 전체 트리
    pub fn to_value_with_providers(&self) -> Value {
        self.root.to_value_with_providers()
    }

    /// 경로의 노드 (없으면 생성). 루트는 쓰기 대상이 아님
    fn entry(&mut self, path: &str, writer: &ProviderId) -> Option<&mut AttributeNode> {
        let segments = split_path(path);
        if segments.is_empty() {
            warn!("{} tried to write the tree root ({:?}); ignored", writer, path);
            return None;
        }

        let mut node = &mut self.root;
        for segment in segments {
            node = node.child_entry(segment);
        }
        Some(node)
    }
}

fn collect_paths<'a>(node: &'a AttributeNode, prefix: &mut Vec<&'a str>, out: &mut Vec<String>) {
    for (key, child) in &node.children {
        prefix.push(key);
        out.push(join_path(prefix.as_slice()));
        collect_paths(child, prefix, out);
        prefix.pop();
    }
}

impl Serialize for AttributeTree {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_value().serialize(serializer)
    }
}
