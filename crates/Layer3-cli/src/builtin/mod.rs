//! Builtin probes
//!
//! 바이너리에 포함된 기본 플러그인. 각 모듈은 `register`로 레지스트리에 로드됩니다.

mod go;
mod languages;

use hostfacts_core::PluginRegistry;
use hostfacts_foundation::Result;

/// 모든 builtin 플러그인 로드
pub fn register_all(registry: &PluginRegistry) -> Result<()> {
    languages::register(registry)?;
    go::register(registry)?;
    Ok(())
}
