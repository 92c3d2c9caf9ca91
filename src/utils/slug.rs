//! Slug resolution
//!
//! Turns a requested slug into the effective storage slug. Pure and
//! idempotent: `resolve(resolve(s)) == resolve(s)`.

use crate::errors::{Result, SluglinkError};

pub const DEFAULT_SLUG_MAX_LENGTH: usize = 2048;

/// Slug transformation policy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlugPolicy {
    /// Keep the caller's casing; otherwise slugs are lowercased
    pub case_sensitive: bool,
    /// Appended when the slug does not already end with it
    pub suffix: Option<String>,
    pub max_length: usize,
}

impl Default for SlugPolicy {
    fn default() -> Self {
        Self {
            case_sensitive: false,
            suffix: None,
            max_length: DEFAULT_SLUG_MAX_LENGTH,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SlugResolver {
    case_sensitive: bool,
    suffix: Option<String>,
    max_length: usize,
}

impl SlugResolver {
    pub fn new(policy: SlugPolicy) -> Result<Self> {
        let suffix = policy
            .suffix
            .filter(|s| !s.is_empty())
            .map(|s| if policy.case_sensitive { s } else { s.to_lowercase() });

        if let Some(ref suffix) = suffix {
            // "a" + suffix must itself be a valid slug
            if !is_valid_slug(&format!("a{}", suffix)) {
                return Err(SluglinkError::config(format!(
                    "Invalid slug suffix '{}'. Use alphanumeric segments joined by '-'",
                    suffix
                )));
            }
        }

        Ok(Self {
            case_sensitive: policy.case_sensitive,
            suffix,
            max_length: policy.max_length,
        })
    }

    pub fn resolve(&self, requested: &str) -> Result<String> {
        let trimmed = requested.trim();
        if trimmed.is_empty() {
            return Err(SluglinkError::validation("Slug cannot be empty"));
        }

        if !is_valid_slug(trimmed) {
            return Err(SluglinkError::validation(format!(
                "Invalid slug '{}'. Only letters and digits joined by single '-' are allowed",
                trimmed
            )));
        }

        let mut slug = if self.case_sensitive {
            trimmed.to_string()
        } else {
            trimmed.to_lowercase()
        };

        if let Some(ref suffix) = self.suffix
            && !slug.ends_with(suffix.as_str())
        {
            slug.push_str(suffix);
        }

        if slug.len() > self.max_length {
            return Err(SluglinkError::validation(format!(
                "Slug '{}' exceeds {} characters",
                slug, self.max_length
            )));
        }

        Ok(slug)
    }
}

impl Default for SlugResolver {
    fn default() -> Self {
        Self {
            case_sensitive: false,
            suffix: None,
            max_length: DEFAULT_SLUG_MAX_LENGTH,
        }
    }
}

/// ASCII alphanumeric segments separated by single hyphens.
pub fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && slug
            .split('-')
            .all(|segment| !segment.is_empty() && segment.bytes().all(|b| b.is_ascii_alphanumeric()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_suffix(suffix: &str) -> SlugResolver {
        SlugResolver::new(SlugPolicy {
            suffix: Some(suffix.to_string()),
            ..SlugPolicy::default()
        })
        .unwrap()
    }

    #[test]
    fn test_valid_slugs() {
        assert!(is_valid_slug("foo"));
        assert!(is_valid_slug("foo-bar-1"));
        assert!(is_valid_slug("ABC123"));
    }

    #[test]
    fn test_invalid_slugs() {
        assert!(!is_valid_slug(""));
        assert!(!is_valid_slug("-foo"));
        assert!(!is_valid_slug("foo-"));
        assert!(!is_valid_slug("foo--bar"));
        assert!(!is_valid_slug("foo/bar"));
        assert!(!is_valid_slug("foo bar"));
        assert!(!is_valid_slug("héllo"));
    }

    #[test]
    fn test_resolve_rejects_empty_and_malformed() {
        let resolver = SlugResolver::default();
        assert!(matches!(
            resolver.resolve("   "),
            Err(SluglinkError::Validation(_))
        ));
        assert!(matches!(
            resolver.resolve("a_b"),
            Err(SluglinkError::Validation(_))
        ));
    }

    #[test]
    fn test_resolve_lowercases_by_default() {
        let resolver = SlugResolver::default();
        assert_eq!(resolver.resolve(" Foo-Bar ").unwrap(), "foo-bar");
    }

    #[test]
    fn test_case_sensitive_keeps_casing() {
        let resolver = SlugResolver::new(SlugPolicy {
            case_sensitive: true,
            ..SlugPolicy::default()
        })
        .unwrap();
        assert_eq!(resolver.resolve("FooBar").unwrap(), "FooBar");
    }

    #[test]
    fn test_suffix_is_idempotent() {
        let resolver = with_suffix("-updated");
        let once = resolver.resolve("foo").unwrap();
        assert_eq!(once, "foo-updated");
        assert_eq!(resolver.resolve(&once).unwrap(), once);
        assert_eq!(resolver.resolve("FOO-UPDATED").unwrap(), "foo-updated");
    }

    #[test]
    fn test_resolve_is_idempotent_for_default_policy() {
        let resolver = SlugResolver::default();
        for input in ["abc", "Mixed-Case-9", "  padded  "] {
            let once = resolver.resolve(input).unwrap();
            assert_eq!(resolver.resolve(&once).unwrap(), once);
        }
    }

    #[test]
    fn test_invalid_suffix_rejected() {
        let err = SlugResolver::new(SlugPolicy {
            suffix: Some("_x".to_string()),
            ..SlugPolicy::default()
        })
        .unwrap_err();
        assert!(matches!(err, SluglinkError::Config(_)));
    }

    #[test]
    fn test_max_length_counts_suffix() {
        let resolver = SlugResolver::new(SlugPolicy {
            suffix: Some("-x".to_string()),
            max_length: 4,
            ..SlugPolicy::default()
        })
        .unwrap();
        assert_eq!(resolver.resolve("ab").unwrap(), "ab-x");
        assert!(resolver.resolve("abc").is_err());
    }
}
