//! Tag path normalisation (`spec.md` §3 "Normalisation").

/// Trims, lowercases, collapses consecutive `/`, and strips leading and
/// trailing `/`. Returns `None` if the normalised result is empty.
#[must_use]
pub fn normalize_path(path: &str) -> Option<String> {
    let collapsed = path
        .trim()
        .to_lowercase()
        .split('/')
        .filter(|segment| !segment.is_empty())
        .collect::<Vec<_>>()
        .join("/");
    if collapsed.is_empty() {
        None
    } else {
        Some(collapsed)
    }
}

/// The last `/`-separated segment of an already-normalised path.
#[must_use]
pub fn last_segment(normalized_path: &str) -> &str {
    normalized_path.rsplit('/').next().unwrap_or(normalized_path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collapses_and_lowercases() {
        assert_eq!(normalize_path(" Work//Projects///Alpha/ ").unwrap(), "work/projects/alpha");
    }

    #[test]
    fn empty_after_normalisation_is_none() {
        assert_eq!(normalize_path("   "), None);
        assert_eq!(normalize_path("///"), None);
    }

    #[test]
    fn last_segment_is_final_component() {
        assert_eq!(last_segment("work/projects/alpha"), "alpha");
        assert_eq!(last_segment("solo"), "solo");
    }
}
