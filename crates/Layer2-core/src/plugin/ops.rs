//! Schema-specific operations
//!
//! `provides`와 `require_plugin`은 스키마 버전에 따라 동작이 다릅니다.
//! - version6: 실행 중 즉시 provider 등록 / 다른 플러그인 동기 실행
//! - version7: 경고만 기록하고 아무 것도 하지 않음

use super::context::PluginContext;
use super::definition::SchemaVersion;
use crate::diagnostics::Diagnostic;
use tracing::debug;

/// Capability object behind [`PluginContext::provides`] and
/// [`PluginContext::require_plugin`].
pub trait SchemaOps: Send + Sync {
    fn provides(&self, ctx: &mut PluginContext<'_>, paths: &[&str]);

    fn require_plugin(&self, ctx: &mut PluginContext<'_>, names: &[&str]);
}

/// 스키마 버전에 맞는 연산 구현
pub fn ops_for(version: SchemaVersion) -> &'static dyn SchemaOps {
    match version {
        SchemaVersion::Version6 => &LegacyOps,
        SchemaVersion::Version7 => &CurrentOps,
    }
}

// ============================================================================
// LegacyOps (version6)
// ============================================================================

pub struct LegacyOps;

impl SchemaOps for LegacyOps {
    fn provides(&self, ctx: &mut PluginContext<'_>, paths: &[&str]) {
        let id = ctx.instance().id().clone();
        for path in paths {
            debug!("{} provides {}", id, path);
            ctx.system_mut().tree_mut().provide(path, &id);
        }
    }

    fn require_plugin(&self, ctx: &mut PluginContext<'_>, names: &[&str]) {
        ctx.system_mut().require_plugin(names);
    }
}

// ============================================================================
// CurrentOps (version7)
// ============================================================================

pub struct CurrentOps;

impl CurrentOps {
    fn unsupported(ctx: &mut PluginContext<'_>, operation: &str) {
        let plugin = ctx.plugin_name().to_string();
        ctx.system_mut().record(Diagnostic::UnsupportedOperation {
            plugin,
            operation: operation.to_string(),
        });
    }
}

impl SchemaOps for CurrentOps {
    fn provides(&self, ctx: &mut PluginContext<'_>, _paths: &[&str]) {
        Self::unsupported(ctx, "provides");
    }

    fn require_plugin(&self, ctx: &mut PluginContext<'_>, _names: &[&str]) {
        Self::unsupported(ctx, "require_plugin");
    }
}
