//! Attribute path - "languages/go/version" 형식의 경로 처리

/// 경로 구분자
pub const PATH_SEPARATOR: char = '/';

/// 경로를 세그먼트로 분리 (빈 세그먼트는 무시)
///
/// `""`와 `"/"`는 루트를 가리킵니다.
pub fn split_path(path: &str) -> Vec<&str> {
    path.split(PATH_SEPARATOR)
        .filter(|segment| !segment.is_empty())
        .collect()
}

/// 세그먼트를 경로 문자열로 결합
pub fn join_path<S: AsRef<str>>(segments: &[S]) -> String {
    segments
        .iter()
        .map(|s| s.as_ref())
        .collect::<Vec<_>>()
        .join(&PATH_SEPARATOR.to_string())
}

/// `path`가 `ancestor`와 같거나 그 하위 경로인지 확인
pub fn is_within(path: &str, ancestor: &str) -> bool {
    let path = split_path(path);
    let ancestor = split_path(ancestor);
    path.len() >= ancestor.len() && path[..ancestor.len()] == ancestor[..]
}
