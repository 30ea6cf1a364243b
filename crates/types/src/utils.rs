//! Utility functions and helpers

use std::collections::BTreeSet;

use crate::error::{DescriptorError, DescriptorResult};

const TRUE_SPELLINGS: [&str; 3] = ["true", "yes", "1"];
const FALSE_SPELLINGS: [&str; 3] = ["false", "no", "0"];

/// Coerce a boolean-like flag value, case-insensitively
pub fn parse_bool(field: &str, value: &str) -> DescriptorResult<bool> {
    let normalized = value.trim().to_ascii_lowercase();

    if TRUE_SPELLINGS.contains(&normalized.as_str()) {
        Ok(true)
    } else if FALSE_SPELLINGS.contains(&normalized.as_str()) {
        Ok(false)
    } else {
        Err(DescriptorError::InvalidBoolean {
            field: field.to_string(),
            value: value.to_string(),
        })
    }
}

/// Split a comma separated list into trimmed, non-empty entries
pub fn split_tags(value: &str) -> BTreeSet<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}

/// Join tags back into the comma separated form
pub fn join_tags(tags: &BTreeSet<String>) -> String {
    tags.iter().map(String::as_str).collect::<Vec<_>>().join(", ")
}

/// `yes`/`no` spelling used for capability flags
pub fn format_yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}

/// `True`/`False` spelling used for status flags
pub fn format_title_bool(value: bool) -> &'static str {
    if value {
        "True"
    } else {
        "False"
    }
}

/// Check that a link points at an http(s) location
pub fn is_http_url(value: &str) -> bool {
    let lower = value.trim().to_ascii_lowercase();
    let rest = lower
        .strip_prefix("https://")
        .or_else(|| lower.strip_prefix("http://"));

    matches!(rest, Some(host) if !host.is_empty())
}

/// Loose e-mail shape check: something on both sides of a single `@`
pub fn looks_like_email(value: &str) -> bool {
    match value.split_once('@') {
        Some((local, domain)) => !local.is_empty() && domain.contains('.') && !domain.contains('@'),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bool_is_case_insensitive() {
        for spelling in ["True", "true", "TRUE", "yes", "Yes", "1", " yes "] {
            assert!(parse_bool("experimental", spelling).unwrap(), "{spelling}");
        }
        for spelling in ["False", "false", "no", "NO", "0"] {
            assert!(!parse_bool("experimental", spelling).unwrap(), "{spelling}");
        }
    }

    #[test]
    fn test_parse_bool_rejects_unknown_spelling() {
        let err = parse_bool("server", "maybe").unwrap_err();
        assert_eq!(
            err,
            DescriptorError::InvalidBoolean {
                field: "server".to_string(),
                value: "maybe".to_string(),
            }
        );
    }

    #[test]
    fn test_split_tags() {
        let tags = split_tags("python, gis , education");
        let expected: BTreeSet<String> = ["python", "gis", "education"]
            .into_iter()
            .map(String::from)
            .collect();
        assert_eq!(tags, expected);

        assert!(split_tags(" , ,").is_empty());
        assert_eq!(split_tags("python,,python").len(), 1);
    }

    #[test]
    fn test_join_tags_is_sorted() {
        let tags = split_tags("schools, education, access");
        assert_eq!(join_tags(&tags), "access, education, schools");
    }

    #[test]
    fn test_url_and_email_checks() {
        assert!(is_http_url("https://example.org/edu-access-mapper"));
        assert!(is_http_url("HTTP://example.org"));
        assert!(!is_http_url("https://"));
        assert!(!is_http_url("ftp://example.org"));

        assert!(looks_like_email("maintainers@example.org"));
        assert!(!looks_like_email("maintainers"));
        assert!(!looks_like_email("@example.org"));
    }
}
