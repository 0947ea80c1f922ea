//! Plugin name derivation

use hostfacts_foundation::{Error, Result};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref IDENTIFIER: Regex = Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").unwrap();
    static ref SEPARATORS: Regex = Regex::new(r"[^A-Za-z0-9]+").unwrap();
}

/// 식별자 또는 경로 형식 문자열을 정규 플러그인 이름으로 변환
///
/// - `"Go"` → `"Go"` (유효한 식별자는 그대로)
/// - `"plugin/name"` → `"PluginName"`
/// - `"::"` → [`Error::InvalidName`]
pub fn nameify(input: &str) -> Result<String> {
    if IDENTIFIER.is_match(input) {
        return Ok(input.to_string());
    }

    let name: String = SEPARATORS
        .split(input)
        .filter(|segment| !segment.is_empty())
        .map(capitalize)
        .collect();

    if IDENTIFIER.is_match(&name) {
        Ok(name)
    } else {
        Err(Error::InvalidName(input.to_string()))
    }
}

/// 첫 글자 대문자, 나머지 소문자
fn capitalize(segment: &str) -> String {
    let mut chars = segment.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifier_unchanged() {
        for name in ["Go", "PluginName", "_private", "snake_case", "Linux2"] {
            assert_eq!(nameify(name).unwrap(), name);
        }
    }

    #[test]
    fn test_path_like_names() {
        assert_eq!(nameify("plugin/name").unwrap(), "PluginName");
        assert_eq!(nameify("languages/go").unwrap(), "LanguagesGo");
        assert_eq!(nameify("linux/LSB-release").unwrap(), "LinuxLsbRelease");
        assert_eq!(nameify("/etc/os.release/").unwrap(), "EtcOsRelease");
    }

    #[test]
    fn test_invalid_names() {
        assert!(matches!(nameify("::"), Err(Error::InvalidName(_))));
        assert!(matches!(nameify(""), Err(Error::InvalidName(_))));
        assert!(matches!(nameify("//"), Err(Error::InvalidName(_))));
        assert!(matches!(nameify("2fast/go"), Err(Error::InvalidName(_))));
    }
}
