//! npm-style range matching on top of the `semver` crate.
//!
//! `semver::VersionReq` understands Cargo syntax: comma-separated
//! comparators and no alternatives. npm ranges separate comparators with
//! whitespace, allow `||` alternatives and hyphen ranges, so they are
//! rewritten into one or more `VersionReq`s first.

use once_cell::sync::Lazy;
use regex::Regex;
use semver::{Version, VersionReq};

use crate::error::{Error, Result};

static HYPHEN_RANGE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*(\S+)\s+-\s+(\S+)\s*$").expect("valid hyphen range regex"));

const OPERATORS: &[&str] = &["<=", ">=", "<", ">", "=", "~", "^"];

fn is_any(set: &str) -> bool {
    matches!(set.trim(), "" | "*" | "x" | "X" | "latest")
}

fn starts_with_operator(token: &str) -> bool {
    OPERATORS.iter().any(|op| token.starts_with(op))
}

/// Drops a `v` prefix from the version part of `token`, after any operator.
fn strip_v(token: &str) -> String {
    let op = OPERATORS
        .iter()
        .find(|op| token.starts_with(*op))
        .copied()
        .unwrap_or("");
    format!("{}{}", op, token[op.len()..].trim_start_matches('v'))
}

fn is_wildcard(token: &str) -> bool {
    token
        .split('.')
        .any(|part| matches!(part, "*" | "x" | "X"))
}

/// Rewrites one comparator set (no `||`) into Cargo requirement syntax.
fn normalize_set(set: &str) -> String {
    if let Some(caps) = HYPHEN_RANGE.captures(set) {
        return format!(">={}, <={}", strip_v(&caps[1]), strip_v(&caps[2]));
    }

    let mut comparators: Vec<String> = Vec::new();
    let mut pending_op: Option<&str> = None;

    for token in set.split_whitespace() {
        if OPERATORS.contains(&token) {
            pending_op = Some(token);
            continue;
        }
        let token = strip_v(token);
        match pending_op.take() {
            Some(op) => comparators.push(format!("{}{}", op, token)),
            // A bare npm version is an exact match, unlike Cargo's implicit caret.
            None if starts_with_operator(&token) || is_wildcard(&token) => {
                comparators.push(token)
            }
            None => comparators.push(format!("={}", token)),
        }
    }

    comparators.join(", ")
}

/// Parses an npm range into its alternatives.
pub fn parse_range(range: &str) -> Result<Vec<VersionReq>> {
    range
        .split("||")
        .map(|set| {
            if is_any(set) {
                return Ok(VersionReq::STAR);
            }
            let normalized = normalize_set(set);
            VersionReq::parse(&normalized).map_err(|e| Error::InvalidRange {
                range: range.to_string(),
                message: e.to_string(),
            })
        })
        .collect()
}

/// Returns `true` if `version` satisfies any alternative of `range`.
pub fn satisfies(version: &str, range: &str) -> Result<bool> {
    let version = Version::parse(version.trim().trim_start_matches('v')).map_err(|e| {
        Error::InvalidVersion {
            version: version.to_string(),
            message: e.to_string(),
        }
    })?;

    Ok(parse_range(range)?.iter().any(|req| req.matches(&version)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_caret_major_only() {
        assert!(satisfies("1.0.0", "^1").unwrap());
        assert!(!satisfies("1.0.0", "^2").unwrap());
    }

    #[test]
    fn test_any_ranges() {
        for range in ["", "*", "x", "latest"] {
            assert!(satisfies("3.4.5", range).unwrap(), "range {:?}", range);
        }
    }

    #[test]
    fn test_whitespace_comparators() {
        assert!(satisfies("1.5.0", ">=1.2.0 <2.0.0").unwrap());
        assert!(!satisfies("2.0.0", ">=1.2.0 <2.0.0").unwrap());
        assert!(satisfies("1.2.0", ">= 1.2.0").unwrap());
    }

    #[test]
    fn test_bare_version_is_exact() {
        assert!(satisfies("1.2.3", "1.2.3").unwrap());
        assert!(!satisfies("1.2.4", "1.2.3").unwrap());
        assert!(satisfies("1.2.9", "1.2").unwrap());
        assert!(satisfies("1.9.0", "1.x").unwrap());
    }

    #[test]
    fn test_v_prefix_after_operator() {
        assert!(satisfies("1.2.3", ">=v1.0.0").unwrap());
        assert!(satisfies("1.2.3", "^v1").unwrap());
        assert!(satisfies("1.2.3", ">= v1.2.3").unwrap());
        assert!(satisfies("1.2.3", "v1.2.3").unwrap());
        assert!(!satisfies("2.0.0", "~v1.2").unwrap());
        assert_eq!(normalize_set("<=v2.0.0"), "<=2.0.0");
        assert_eq!(normalize_set("v1.0.0 - v2.0.0"), ">=1.0.0, <=2.0.0");
    }

    #[test]
    fn test_alternatives() {
        assert!(satisfies("3.1.0", "^1.0.0 || ^3.0.0").unwrap());
        assert!(!satisfies("2.1.0", "^1.0.0 || ^3.0.0").unwrap());
    }

    #[test]
    fn test_hyphen_range() {
        assert_eq!(normalize_set("1.2.3 - 2.0.0"), ">=1.2.3, <=2.0.0");
        assert!(satisfies("1.9.9", "1.2.3 - 2.0.0").unwrap());
        assert!(!satisfies("2.0.1", "1.2.3 - 2.0.0").unwrap());
    }

    #[test]
    fn test_invalid_inputs() {
        assert!(matches!(
            satisfies("not-a-version", "^1"),
            Err(Error::InvalidVersion { .. })
        ));
        assert!(matches!(
            satisfies("1.0.0", "^^nope"),
            Err(Error::InvalidRange { .. })
        ));
    }
}
