//! # Plugin System
//!
//! 버전별 플러그인 선언, 레지스트리, 실행 컨텍스트
//!
//! ## 아키텍처
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                     PluginRegistry                       │
//! │   load(name, fragment) ──► nameify ──► PluginDefinition  │
//! │        ┌────────────┬────────────┬────────────┐          │
//! │        │ Languages  │ Go         │ Kernel     │          │
//! │        │ (v7)       │ (v7)       │ (v6)       │          │
//! │        └────────────┴────────────┴────────────┘          │
//! └──────────────────────────────────────────────────────────┘
//!                          │ System가 실행 시 선택
//!                          ▼
//! ┌──────────────────────────────────────────────────────────┐
//! │ PluginInstance ──► PluginContext ──► SchemaOps           │
//! │  (id, has_run)     (tree, shell)     (Legacy / Current)  │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! ## 스키마 버전
//!
//! 1. **version6 (legacy)**: 본문 실행 중 `provides`/`require_plugin` 호출
//! 2. **version7 (current)**: `provides`/`depends` 정적 선언, 플랫폼별 `collect_data`

mod context;
mod definition;
mod fragment;
mod name;
mod ops;
mod registry;

pub use context::{PluginContext, PluginInstance};
pub use definition::{Collector, PluginDefinition, SchemaVersion, DEFAULT_PLATFORM};
pub use fragment::PluginFragment;
pub use name::nameify;
pub use ops::{ops_for, CurrentOps, LegacyOps, SchemaOps};
pub use registry::{global_registry, PluginRegistry};
