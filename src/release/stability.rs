//! Stability classification and lenient version ordering of release names.

use regex::Regex;
use semver::Version;
use std::cmp::Ordering;
use std::fmt;
use std::sync::LazyLock;

static MODIFIER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)[._-]?(?:(stable|beta|b|RC|alpha|a|patch|pl|p)((?:[.-]?\d+)*)?)?([.-]?dev)?(?:\+.*)?$")
        .expect("stability regex is valid")
});

/// Stability level of a version string, most stable first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Stability {
    /// Final release
    Stable,
    /// Release candidate
    RC,
    /// Beta
    Beta,
    /// Alpha
    Alpha,
    /// Development snapshot
    Dev,
}

impl Stability {
    /// Classify a version string by its suffix
    pub fn parse(version: &str) -> Self {
        let version = version.split('#').next().unwrap_or(version);
        if version.starts_with("dev-") || version.ends_with("-dev") {
            return Stability::Dev;
        }

        let Some(captures) = MODIFIER.captures(version) else {
            return Stability::Stable;
        };
        if captures.get(3).is_some_and(|m| !m.as_str().is_empty()) {
            return Stability::Dev;
        }

        match captures.get(1).map(|m| m.as_str().to_ascii_lowercase()).as_deref() {
            Some("beta" | "b") => Stability::Beta,
            Some("alpha" | "a") => Stability::Alpha,
            Some("rc") => Stability::RC,
            _ => Stability::Stable,
        }
    }
}

impl fmt::Display for Stability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stability::Stable => "stable",
            Stability::RC => "RC",
            Stability::Beta => "beta",
            Stability::Alpha => "alpha",
            Stability::Dev => "dev",
        };
        f.write_str(name)
    }
}

/// Parse a release name as semver, tolerating `v` prefixes and short versions.
///
/// `v3.1` becomes `3.1.0`, `4.0.0-ALPHA1` becomes `4.0.0-alpha1`.
pub fn parse_lenient(name: &str) -> Option<Version> {
    let name = name.trim().trim_start_matches(['v', 'V']);
    let (name, build) = match name.split_once('+') {
        Some((name, build)) => (name, Some(build)),
        None => (name, None),
    };
    let (core, pre) = match name.split_once('-') {
        Some((core, pre)) => (core, Some(pre)),
        None => (name, None),
    };

    let mut parts: Vec<&str> = core.split('.').collect();
    if parts.is_empty() || parts.len() > 3 || parts.iter().any(|p| p.parse::<u64>().is_err()) {
        return None;
    }
    parts.resize(3, "0");

    let mut normalized = parts.join(".");
    if let Some(pre) = pre {
        normalized.push('-');
        normalized.push_str(&pre.replace('-', ".").to_ascii_lowercase());
    }
    if let Some(build) = build {
        normalized.push('+');
        normalized.push_str(build);
    }
    Version::parse(&normalized).ok()
}

/// Order release names by version, greatest first; unparseable names sort last
pub fn compare_versions(a: &str, b: &str) -> Ordering {
    match (parse_lenient(a), parse_lenient(b)) {
        (Some(a), Some(b)) => b.cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stability_suffixes() {
        assert_eq!(Stability::parse("3.1.0"), Stability::Stable);
        assert_eq!(Stability::parse("1.2.0-beta"), Stability::Beta);
        assert_eq!(Stability::parse("1.2.0-b2"), Stability::Beta);
        assert_eq!(Stability::parse("4.0.0-alpha"), Stability::Alpha);
        assert_eq!(Stability::parse("4.0.0-ALPHA1"), Stability::Alpha);
        assert_eq!(Stability::parse("2.0.0-RC1"), Stability::RC);
        assert_eq!(Stability::parse("2.0.0-rc.2"), Stability::RC);
        assert_eq!(Stability::parse("1.0.0-patch1"), Stability::Stable);
        assert_eq!(Stability::parse("dev-master"), Stability::Dev);
        assert_eq!(Stability::parse("3.x-dev"), Stability::Dev);
        assert_eq!(Stability::parse("1.0.0-beta1.dev"), Stability::Dev);
        assert_eq!(Stability::parse("1.0.0#abc123"), Stability::Stable);
    }

    #[test]
    fn test_build_metadata_keeps_modifier() {
        assert_eq!(Stability::parse("1.2.0-beta+001"), Stability::Beta);
        assert_eq!(Stability::parse("2.0.0-RC1+build.5"), Stability::RC);
        assert_eq!(Stability::parse("1.2.0+20240101"), Stability::Stable);
        assert_eq!(
            parse_lenient("1.2.0+build-5").map(|v| (v.pre.to_string(), v.build.to_string())),
            Some((String::new(), "build-5".to_string()))
        );
    }

    #[test]
    fn test_lenient_parse() {
        assert_eq!(parse_lenient("v3.1"), Some(Version::new(3, 1, 0)));
        assert_eq!(parse_lenient("3"), Some(Version::new(3, 0, 0)));
        assert_eq!(
            parse_lenient("4.0.0-ALPHA1").map(|v| v.pre.to_string()),
            Some("alpha1".to_string())
        );
        assert_eq!(parse_lenient("Summer release"), None);
        assert_eq!(parse_lenient("1.2.3.4"), None);
    }

    #[test]
    fn test_descending_order() {
        let mut names = vec!["3.0.0", "nightly", "4.0.0-alpha", "3.1.0", "3.10.0", "4.0.0"];
        names.sort_by(|a, b| compare_versions(a, b));
        assert_eq!(
            names,
            ["4.0.0", "4.0.0-alpha", "3.10.0", "3.1.0", "3.0.0", "nightly"]
        );
    }
}
