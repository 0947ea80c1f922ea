//! Storage module for hostfacts
//!
//! - `json`: JSON - 설정 파일 로드 (글로벌 / 프로젝트)

mod json;

// JSON Storage
pub use json::JsonStore;
