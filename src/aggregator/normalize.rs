//! Filter matching and root-path stripping for call labels.

use crate::utils::config::CANONICAL_SEPARATOR;

/// Substring filter over call targets; an empty term matches everything
pub fn matches_filter(target: &str, filter_term: &str) -> bool {
    filter_term.is_empty() || target.contains(filter_term)
}

/// Rewrite every path separator to the canonical one
pub fn normalize_separators(path: &str) -> String {
    path.chars()
        .map(|c| if c == '\\' || c == '/' { CANONICAL_SEPARATOR } else { c })
        .collect()
}

/// Strips a configured root directory out of path-bearing labels
#[derive(Debug, Clone, Default)]
pub struct PathNormalizer {
    root: String,
    root_lower: String,
}

impl PathNormalizer {
    pub fn new(root_path: &str) -> Self {
        let root = normalize_separators(root_path.trim());
        let root_lower = root.to_ascii_lowercase();
        Self { root, root_lower }
    }

    pub fn root(&self) -> &str {
        &self.root
    }

    /// Normalize separators, then drop the first case-insensitive
    /// occurrence of the root
    pub fn strip(&self, value: &str) -> String {
        let normalized = normalize_separators(value);
        if self.root.is_empty() {
            return normalized;
        }

        // ASCII lowercasing keeps byte offsets aligned with `normalized`
        match normalized.to_ascii_lowercase().find(&self.root_lower) {
            Some(start) => {
                let end = start + self.root_lower.len();
                format!("{}{}", &normalized[..start], &normalized[end..])
            }
            None => normalized,
        }
    }
}

/// One-shot form of [`PathNormalizer::strip`]
pub fn strip_root(value: &str, root_path: &str) -> String {
    PathNormalizer::new(root_path).strip(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matches_filter() {
        assert!(matches_filter("App\\User->save", ""));
        assert!(matches_filter("App\\User->save", "User"));
        assert!(!matches_filter("App\\User->save", "user"));
        assert!(!matches_filter("strlen", "User"));
    }

    #[test]
    fn test_strip_root_mixed_separators() {
        assert_eq!(
            strip_root("C:\\Sites\\App\\src\\Kernel.php:12", "c:/sites/app"),
            "/src/Kernel.php:12"
        );
        assert_eq!(
            strip_root("/var/www/app/index.php:3", "/var/www/app"),
            "/index.php:3"
        );
    }

    #[test]
    fn test_strip_root_only_first_occurrence() {
        assert_eq!(strip_root("/a/x/a/y", "/a"), "/x/a/y");
    }

    #[test]
    fn test_strip_root_empty_or_absent() {
        assert_eq!(strip_root("main()", ""), "main()");
        assert_eq!(strip_root("lib\\util.php", "/srv"), "lib/util.php");
    }
}
