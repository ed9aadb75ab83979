//! Version-range derivation from a list of supported versions.

/// Characters stripped from both ends of a configured version
const STRIPPED: &[char] = &['@', 'd', 'e', 'v', '^'];

/// Build a caret constraint allowing every configured major version.
///
/// Versions are grouped by major, in order of first appearance; each major keeps
/// its lowest minor. `["^7.1", "^7.4", "^8.0"]` becomes `"^7.1 || ^8.0"`.
pub fn evaluate_version_constraint<S: AsRef<str>>(versions: &[S]) -> String {
    let mut majors: Vec<(&str, &str)> = Vec::new();

    for version in versions {
        let version = version.as_ref().trim_matches(STRIPPED);
        let mut parts = version.split('.');
        let major = parts.next().unwrap_or_default();
        let minor = parts.next().unwrap_or("0");

        match majors.iter_mut().find(|(m, _)| *m == major) {
            Some((_, lowest)) => {
                if minor_is_lower(minor, lowest) {
                    *lowest = minor;
                }
            }
            None => majors.push((major, minor)),
        }
    }

    majors
        .iter()
        .map(|(major, minor)| format!("^{}.{}", major, minor))
        .collect::<Vec<_>>()
        .join(" || ")
}

fn minor_is_lower(candidate: &str, current: &str) -> bool {
    match (candidate.parse::<u64>(), current.parse::<u64>()) {
        (Ok(a), Ok(b)) => a < b,
        _ => candidate < current,
    }
}
