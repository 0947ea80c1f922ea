//! Plugin Fragment - 하나의 선언 조각
//!
//! 같은 이름의 플러그인은 여러 fragment에 걸쳐 선언될 수 있습니다.
//! [`PluginRegistry::load`](super::PluginRegistry::load)가 fragment를 받아
//! 기존 정의에 병합합니다.
//!
//! ```ignore
//! let fragment = PluginFragment::v7()
//!     .provides(["languages/go"])
//!     .depends(["languages"])
//!     .collect_data(|ctx| {
//!         let output = ctx.shell_out("go version")?;
//!         // ...
//!         Ok(())
//!     });
//! ```

use super::context::PluginContext;
use super::definition::{Collector, SchemaVersion, DEFAULT_PLATFORM};
use hostfacts_foundation::Result;
use tracing::warn;

/// Declarations of one plugin source fragment.
#[derive(Debug, Clone)]
pub struct PluginFragment {
    version: SchemaVersion,
    source: Option<String>,
    provides: Vec<String>,
    depends: Vec<String>,
    collectors: Vec<(Vec<String>, Collector)>,
}

/// 병합에 사용하는 분해된 fragment
pub(crate) struct FragmentParts {
    pub provides: Vec<String>,
    pub depends: Vec<String>,
    pub collectors: Vec<(Vec<String>, Collector)>,
}

impl PluginFragment {
    /// version7 fragment
    pub fn v7() -> Self {
        Self::with_version(SchemaVersion::Version7)
    }

    /// version6 (legacy) fragment
    pub fn v6() -> Self {
        Self::with_version(SchemaVersion::Version6)
    }

    fn with_version(version: SchemaVersion) -> Self {
        Self {
            version,
            source: None,
            provides: Vec::new(),
            depends: Vec::new(),
            collectors: Vec::new(),
        }
    }

    pub fn version(&self) -> SchemaVersion {
        self.version
    }

    pub fn source_path(&self) -> Option<&str> {
        self.source.as_deref()
    }

    /// 출처 (파일 경로 또는 심볼 이름)
    pub fn source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    // ========================================================================
    // Static declarations (version7)
    // ========================================================================

    /// 제공하는 attribute 경로 선언
    pub fn provides<I, S>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if self.version.is_legacy() {
            warn!("Static provides is ignored for version6 plugins; call provides from the body");
            return self;
        }
        self.provides.extend(paths.into_iter().map(Into::into));
        self
    }

    /// 선행되어야 하는 attribute 경로 선언
    pub fn depends<I, S>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if self.version.is_legacy() {
            warn!("Static depends is ignored for version6 plugins; call require_plugin from the body");
            return self;
        }
        self.depends.extend(paths.into_iter().map(Into::into));
        self
    }

    // ========================================================================
    // Bodies
    // ========================================================================

    /// default 플랫폼 collector
    pub fn collect_data<F>(self, body: F) -> Self
    where
        F: Fn(&mut PluginContext<'_>) -> Result<()> + Send + Sync + 'static,
    {
        self.collector([DEFAULT_PLATFORM], Collector::new(body))
    }

    /// 지정한 플랫폼들에 같은 collector 등록 (빈 목록이면 default)
    pub fn collect_data_for<I, S, F>(self, platforms: I, body: F) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
        F: Fn(&mut PluginContext<'_>) -> Result<()> + Send + Sync + 'static,
    {
        self.collector(platforms, Collector::new(body))
    }

    /// legacy 단일 본문
    pub fn collect_contents<F>(mut self, body: F) -> Self
    where
        F: Fn(&mut PluginContext<'_>) -> Result<()> + Send + Sync + 'static,
    {
        self.collectors.clear();
        self.collector([DEFAULT_PLATFORM], Collector::new(body))
    }

    /// 이미 만들어진 collector 등록
    pub fn collector<I, S>(mut self, platforms: I, collector: Collector) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut platforms: Vec<String> = platforms.into_iter().map(Into::into).collect();
        if platforms.is_empty() {
            platforms.push(DEFAULT_PLATFORM.to_string());
        }
        if self.version.is_legacy() && platforms.iter().any(|p| p != DEFAULT_PLATFORM) {
            // legacy 플러그인은 플랫폼 변형이 없음
            warn!("Platform-specific bodies are not supported for version6 plugins; using default");
            platforms = vec![DEFAULT_PLATFORM.to_string()];
        }
        self.collectors.push((platforms, collector));
        self
    }

    pub(crate) fn into_parts(self) -> FragmentParts {
        FragmentParts {
            provides: self.provides,
            depends: self.depends,
            collectors: self.collectors,
        }
    }
}
