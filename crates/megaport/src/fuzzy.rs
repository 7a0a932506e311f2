//! Fuzzy name matching for locations, partner ports and images

/// True when every character of `needle` appears in `haystack` in order,
/// ignoring case. An empty needle matches everything.
pub fn is_match(needle: &str, haystack: &str) -> bool {
    let mut hay = haystack.chars().flat_map(char::to_lowercase);
    needle
        .chars()
        .flat_map(char::to_lowercase)
        .all(|n| hay.any(|h| h == n))
}

/// Jaro-Winkler similarity of two names, case-insensitive
pub fn score(needle: &str, haystack: &str) -> f64 {
    strsim::jaro_winkler(&needle.to_lowercase(), &haystack.to_lowercase())
}

/// Items whose name fuzzily matches `needle`, best match first
pub fn rank<'a, T, F>(needle: &str, items: &'a [T], name: F) -> Vec<&'a T>
where
    F: Fn(&T) -> &str,
{
    let mut scored: Vec<(f64, &T)> = items
        .iter()
        .filter(|item| is_match(needle, name(*item)))
        .map(|item| (score(needle, name(item)), item))
        .collect();

    scored.sort_by(|a, b| b.0.total_cmp(&a.0));
    scored.into_iter().map(|(_, item)| item).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subsequence_match() {
        assert!(is_match("sy1", "Equinix SY1"));
        assert!(is_match("eqxsy", "Equinix SY1"));
        assert!(is_match("", "anything"));
        assert!(!is_match("sy9", "Equinix SY1"));
        assert!(!is_match("1ys", "Equinix SY1"));
    }

    #[test]
    fn test_rank_prefers_closer_names() {
        let names = vec![
            "Global Switch Sydney".to_string(),
            "Equinix SY1".to_string(),
            "Equinix SY3".to_string(),
            "Equinix ME1".to_string(),
        ];
        let ranked = rank("Equinix SY1", &names, |n| n.as_str());
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0], "Equinix SY1");

        let ranked = rank("sy", &names, |n| n.as_str());
        assert_eq!(ranked.len(), 3);
        assert!(!ranked.iter().any(|n| n.as_str() == "Equinix ME1"));
    }
}
