//! Release snapshot taken from the hosting service.

use super::{Stability, parse_lenient};
use crate::github::ReleasePayload;
use semver::Version;

/// One published release
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Release {
    /// Release id
    pub id: u64,
    /// Canonical API URL
    pub url: String,
    /// Git tag
    pub tag_name: String,
    /// Display name, falling back to the tag when unset
    pub name: String,
    /// Pre-release flag as published
    pub prerelease: bool,
    /// Flagged stable, i.e. not a pre-release
    pub stable: bool,
}

impl From<ReleasePayload> for Release {
    fn from(payload: ReleasePayload) -> Self {
        let name = payload
            .name
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| payload.tag_name.clone());

        Self {
            id: payload.id,
            url: payload.url,
            tag_name: payload.tag_name,
            name,
            prerelease: payload.prerelease,
            stable: !payload.prerelease,
        }
    }
}

impl Release {
    /// Stability implied by the display name
    pub fn stability(&self) -> Stability {
        Stability::parse(&self.name)
    }

    /// Display name parsed as a version
    pub fn version(&self) -> Option<Version> {
        parse_lenient(&self.name)
    }

    /// Flagged stable, named like a version, and named stable
    pub fn is_really_stable(&self) -> bool {
        self.stable && self.version().is_some() && self.stability() == Stability::Stable
    }

    /// Maintenance branch this release lives on, `{major}.x`
    pub fn maintenance_branch(&self) -> Option<String> {
        self.version().map(|v| format!("{}.x", v.major))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(name: Option<&str>, prerelease: bool) -> ReleasePayload {
        ReleasePayload {
            id: 1,
            url: "https://api.github.com/repos/acme/demo/releases/1".to_string(),
            tag_name: "v2.3.0".to_string(),
            name: name.map(str::to_string),
            prerelease,
            draft: false,
            published_at: None,
        }
    }

    #[test]
    fn test_name_falls_back_to_tag() {
        let release = Release::from(payload(None, false));
        assert_eq!(release.name, "v2.3.0");
        assert_eq!(release.maintenance_branch().as_deref(), Some("2.x"));
    }

    #[test]
    fn test_really_stable() {
        assert!(Release::from(payload(Some("2.3.0"), false)).is_really_stable());
        assert!(!Release::from(payload(Some("2.3.0"), true)).is_really_stable());
        assert!(!Release::from(payload(Some("1.2.0-beta"), false)).is_really_stable());
        assert!(!Release::from(payload(Some("Summer release"), false)).is_really_stable());
    }
}
