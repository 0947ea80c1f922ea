//! Environment Detection - 플랫폼 자동 감지
//!
//! 플러그인 실행 시 어떤 collect_data 블록을 사용할지 결정하기 위한
//! 플랫폼 태그를 제공합니다.

use std::fmt;

/// 운영체제 종류
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OsType {
    Windows,
    MacOS,
    Linux,
    FreeBsd,
    OpenBsd,
    NetBsd,
    Solaris,
    Aix,
    Unknown,
}

impl OsType {
    pub fn detect() -> Self {
        if cfg!(target_os = "windows") {
            Self::Windows
        } else if cfg!(target_os = "macos") {
            Self::MacOS
        } else if cfg!(target_os = "linux") {
            Self::Linux
        } else if cfg!(target_os = "freebsd") {
            Self::FreeBsd
        } else if cfg!(target_os = "openbsd") {
            Self::OpenBsd
        } else if cfg!(target_os = "netbsd") {
            Self::NetBsd
        } else if cfg!(target_os = "solaris") || cfg!(target_os = "illumos") {
            Self::Solaris
        } else if cfg!(target_os = "aix") {
            Self::Aix
        } else {
            Self::Unknown
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Windows => "Windows",
            Self::MacOS => "macOS",
            Self::Linux => "Linux",
            Self::FreeBsd => "FreeBSD",
            Self::OpenBsd => "OpenBSD",
            Self::NetBsd => "NetBSD",
            Self::Solaris => "Solaris",
            Self::Aix => "AIX",
            Self::Unknown => "Unknown",
        }
    }

    /// collect_data 선택에 쓰이는 플랫폼 태그 (host_os 형식)
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Windows => "windows",
            Self::MacOS => "darwin",
            Self::Linux => "linux",
            Self::FreeBsd => "freebsd",
            Self::OpenBsd => "openbsd",
            Self::NetBsd => "netbsd",
            Self::Solaris => "solaris2",
            Self::Aix => "aix",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for OsType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

// ============================================================================
// PlatformDetector - 플랫폼 감지 인터페이스
// ============================================================================

/// 플랫폼 감지 collaborator
///
/// 플러그인 실행마다 한 번씩 호출되어 collector 선택에 쓰입니다.
pub trait PlatformDetector: Send + Sync {
    /// 현재 플랫폼 태그 (예: "linux", "darwin", "ubuntu")
    fn current_platform_tag(&self) -> String;
}

/// 실제 호스트 OS 기반 감지기
#[derive(Debug, Clone, Copy, Default)]
pub struct HostPlatform;

impl HostPlatform {
    pub fn new() -> Self {
        Self
    }
}

impl PlatformDetector for HostPlatform {
    fn current_platform_tag(&self) -> String {
        OsType::detect().tag().to_string()
    }
}

/// 고정 태그를 반환하는 감지기 (설정 override, 테스트용)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedPlatform(String);

impl FixedPlatform {
    pub fn new(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }

    pub fn tag(&self) -> &str {
        &self.0
    }
}

impl PlatformDetector for FixedPlatform {
    fn current_platform_tag(&self) -> String {
        self.0.clone()
    }
}
