//! # Attribute Tree
//!
//! 한 번의 수집 실행 동안 모든 플러그인이 공유하는 계층형 fact 저장소.
//! 각 노드는 값과 함께 그 경로에 기록한 플러그인 인스턴스 목록(provenance)을 가집니다.
//!
//! ```text
//! root
//!  ├── languages          _providers: [Languages#1]
//!  │    └── go            _providers: [Go#2]
//!  │         └── version  "1.1.2"
//!  └── platform           "ubuntu"
//! ```

mod path;
mod tree;

pub use path::{is_within, join_path, split_path, PATH_SEPARATOR};
pub use tree::{AttributeNode, AttributeTree, ProviderId, PROVIDERS_KEY, VALUE_KEY};
