//! Run Report - 실행 결과 요약

use crate::diagnostics::Diagnostic;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Summary of one collection run.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,

    /// 성공한 플러그인 (실행 순)
    pub completed: Vec<String>,

    /// 실패한 플러그인 (실행 순)
    pub failed: Vec<String>,

    /// 로드 + 실행 diagnostic
    pub diagnostics: Vec<Diagnostic>,
}

impl RunReport {
    /// 실패와 diagnostic이 모두 없는지 확인
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty() && self.diagnostics.is_empty()
    }

    /// 실패 diagnostic만
    pub fn failures(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| d.is_failure())
    }

    /// 실행 시간 (밀리초)
    pub fn elapsed_ms(&self) -> i64 {
        (self.finished_at - self.started_at).num_milliseconds()
    }
}
