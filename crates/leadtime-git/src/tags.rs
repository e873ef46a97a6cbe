// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Release tag ordering

use semver::Version;

/// Parse a `vMAJOR.MINOR.PATCH` or `MAJOR.MINOR.PATCH` release tag
///
/// Pre-release and build metadata tags are not releases and yield `None`.
#[must_use]
pub fn release_version(tag: &str) -> Option<Version> {
    let name = tag.strip_prefix("refs/tags/").unwrap_or(tag);
    let bare = name.strip_prefix('v').unwrap_or(name);
    Version::parse(bare)
        .ok()
        .filter(|v| v.pre.is_empty() && v.build.is_empty())
}

/// Select the release immediately preceding `current` among `tags`
///
/// Candidates must share the major version of `current`.
#[must_use]
pub fn previous_release(tags: &[String], current: &str) -> Option<String> {
    let current_version = release_version(current)?;

    tags.iter()
        .filter_map(|tag| release_version(tag).map(|v| (v, tag)))
        .filter(|(v, _)| v.major == current_version.major && *v < current_version)
        .max_by(|(a, _), (b, _)| a.cmp(b))
        .map(|(_, tag)| tag.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use similar_asserts::assert_eq;

    fn tags(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_release_version_accepts_prefixed_and_bare() {
        assert_eq!(release_version("v1.2.3"), Some(Version::new(1, 2, 3)));
        assert_eq!(release_version("1.2.3"), Some(Version::new(1, 2, 3)));
        assert_eq!(
            release_version("refs/tags/v2.0.10"),
            Some(Version::new(2, 0, 10))
        );
    }

    #[test]
    fn test_release_version_rejects_non_releases() {
        assert_eq!(release_version("v1.2.3-rc.1"), None);
        assert_eq!(release_version("nightly"), None);
        assert_eq!(release_version("v1.2"), None);
    }

    #[test]
    fn test_previous_release_orders_numerically() {
        let all = tags(&["v1.9.0", "v1.10.0", "v1.2.0", "v1.10.1"]);
        assert_eq!(
            previous_release(&all, "v1.10.1"),
            Some("v1.10.0".to_string())
        );
        assert_eq!(previous_release(&all, "v1.10.0"), Some("v1.9.0".to_string()));
    }

    #[test]
    fn test_previous_release_same_major_only() {
        let all = tags(&["v1.4.0", "v2.0.0", "v2.1.0"]);
        assert_eq!(previous_release(&all, "v2.0.0"), None);
        assert_eq!(previous_release(&all, "v2.1.0"), Some("v2.0.0".to_string()));
    }

    #[test]
    fn test_previous_release_ignores_prereleases() {
        let all = tags(&["v1.0.0", "v1.1.0-rc.1", "v1.1.0"]);
        assert_eq!(previous_release(&all, "v1.1.0"), Some("v1.0.0".to_string()));
    }

    #[test]
    fn test_previous_release_unparseable_current() {
        let all = tags(&["v1.0.0"]);
        assert_eq!(previous_release(&all, "main"), None);
    }
}
