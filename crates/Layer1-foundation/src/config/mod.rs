//! Config - 통합 설정 관리
//!
//! - `facts.rs` - FactsConfig 통합 설정

mod facts;

pub use facts::{FactsConfig, FACTS_CONFIG_FILE};
