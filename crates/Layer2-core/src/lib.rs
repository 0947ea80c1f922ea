//! hostfacts-core: Plugin orchestration core
//!
//! Layer2 - 플러그인 등록, 의존성 해석, attribute 트리
//!
//! # 주요 모듈
//!
//! - `attribute`: 수집된 fact와 provenance를 저장하는 AttributeTree
//! - `plugin`: 버전별 플러그인 선언 (PluginFragment / PluginDefinition), 레지스트리, 실행 컨텍스트
//! - `system`: 의존성 해석 및 실행 (System)
//! - `diagnostics`: 실행을 중단하지 않는 경고 기록
//!
//! # 사용 예시
//!
//! ```ignore
//! use hostfacts_core::{global_registry, PluginFragment, System};
//!
//! let registry = global_registry();
//! registry.load("languages", PluginFragment::v7()
//!     .provides(["languages"])
//!     .collect_data(|ctx| {
//!         ctx.set_attribute("languages", serde_json::json!({}));
//!         Ok(())
//!     }))?;
//!
//! let mut system = System::builder().registry(registry).build()?;
//! let report = system.run_attributes(&["languages"]);
//! println!("{}", serde_json::to_string_pretty(system.tree())?);
//! ```

pub mod attribute;
pub mod diagnostics;
pub mod plugin;
pub mod system;

// Re-exports: Attribute Tree
pub use attribute::{AttributeNode, AttributeTree, ProviderId};

// Re-exports: Diagnostics
pub use diagnostics::Diagnostic;

// Re-exports: Plugin
pub use plugin::{
    global_registry, nameify, Collector, PluginContext, PluginDefinition, PluginFragment,
    PluginInstance, PluginRegistry, SchemaVersion, DEFAULT_PLATFORM,
};

// Re-exports: System
pub use system::{RunReport, RunState, System, SystemBuilder, Target};
