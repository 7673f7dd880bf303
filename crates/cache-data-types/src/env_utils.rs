//! Property value parsing utilities.
//!
//! Shared by [`Environment`](crate::Environment) so that every property is
//! read with the same rules, whether it came from the process environment or
//! was set programmatically.
//!
//! # Example
//!
//! ```
//! use cache_data_types::env_utils::{parse_bool_or, parse_list};
//!
//! assert!(parse_bool_or(Some("YES"), false));
//! assert!(parse_bool_or(None, true));
//! assert!(parse_bool_or(Some(""), true));
//! assert_eq!(parse_list(" dev, test ,,"), vec!["dev", "test"]);
//! ```

/// Parse a boolean: "1", "true", "yes" or "on" and "0", "false", "no" or
/// "off" (case-insensitive). Blank and unrecognised values give `None`.
pub fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Parse an optional value as a boolean, falling back to `default` when the
/// value is unset, blank or unrecognised.
pub fn parse_bool_or(value: Option<&str>, default: bool) -> bool {
    value.and_then(parse_bool).unwrap_or(default)
}

/// Split a comma-delimited value into trimmed, non-blank items.
pub fn parse_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Environment-variable form of a dotted property name.
///
/// `cache.data.import.active-profiles` becomes `CACHE_DATA_IMPORT_ACTIVE_PROFILES`.
pub fn relaxed_name(property: &str) -> String {
    property
        .chars()
        .map(|c| match c {
            '.' | '-' => '_',
            other => other.to_ascii_uppercase(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bool() {
        assert_eq!(parse_bool("true"), Some(true));
        assert_eq!(parse_bool("1"), Some(true));
        assert_eq!(parse_bool("YES"), Some(true));
        assert_eq!(parse_bool(" on "), Some(true));
        assert_eq!(parse_bool("false"), Some(false));
        assert_eq!(parse_bool("Off"), Some(false));
        assert_eq!(parse_bool("0"), Some(false));
        assert_eq!(parse_bool("nope"), None);
        assert_eq!(parse_bool(""), None);
        assert_eq!(parse_bool("   "), None);
    }

    #[test]
    fn test_parse_bool_or() {
        assert!(parse_bool_or(None, true));
        assert!(!parse_bool_or(None, false));
        assert!(!parse_bool_or(Some("off"), true));
        assert!(parse_bool_or(Some(""), true));
        assert!(parse_bool_or(Some("maybe"), true));
        assert!(!parse_bool_or(Some(" "), false));
    }

    #[test]
    fn test_parse_list() {
        assert_eq!(parse_list("a, b, c"), vec!["a", "b", "c"]);
        assert!(parse_list("").is_empty());
        assert!(parse_list(" , ,").is_empty());
    }

    #[test]
    fn test_relaxed_name() {
        assert_eq!(
            relaxed_name("cache.data.import.active-profiles"),
            "CACHE_DATA_IMPORT_ACTIVE_PROFILES"
        );
    }
}
