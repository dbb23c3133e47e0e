//! Replacement Value Validation
//!
//! A free-form replacement typed by the user is only accepted once a
//! validator recognizes it. The validator is supplied to the session
//! up front; without one, the raw text is used verbatim.

use regex::Regex;

/// Normalizes a candidate replacement value
pub trait ValueValidator {
    /// Returns the normalized value, or `None` when the text is not recognized
    fn normalize(&self, raw: &str) -> Option<String>;
}

impl<F> ValueValidator for F
where
    F: Fn(&str) -> Option<String>,
{
    fn normalize(&self, raw: &str) -> Option<String> {
        self(raw)
    }
}

const SEMVER_PATTERN: &str = r"^(0|[1-9]\d*)\.(0|[1-9]\d*)\.(0|[1-9]\d*)(?:-(?:0|[1-9]\d*|\d*[A-Za-z-][0-9A-Za-z-]*)(?:\.(?:0|[1-9]\d*|\d*[A-Za-z-][0-9A-Za-z-]*))*)?(?:\+[0-9A-Za-z-]+(?:\.[0-9A-Za-z-]+)*)?$";

/// Accepts semantic versions, cleaning up loose spellings like `v1.2.3`
#[derive(Debug, Clone)]
pub struct SemverValidator {
    pattern: Regex,
}

impl SemverValidator {
    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            pattern: Regex::new(SEMVER_PATTERN)?,
        })
    }

    /// Strip surrounding whitespace and any leading `=`/`v` run
    fn clean(raw: &str) -> &str {
        raw.trim().trim_start_matches(['=', 'v'])
    }
}

impl ValueValidator for SemverValidator {
    fn normalize(&self, raw: &str) -> Option<String> {
        let cleaned = Self::clean(raw);
        if self.pattern.is_match(cleaned) {
            Some(cleaned.to_string())
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_semver_accepts_plain_versions() {
        let validator = SemverValidator::new().unwrap();
        assert_eq!(validator.normalize("2.0.0"), Some("2.0.0".to_string()));
        assert_eq!(
            validator.normalize("1.4.0-beta.1+build.7"),
            Some("1.4.0-beta.1+build.7".to_string())
        );
    }

    #[test]
    fn test_semver_cleans_loose_input() {
        let validator = SemverValidator::new().unwrap();
        assert_eq!(validator.normalize("  v1.2.3 "), Some("1.2.3".to_string()));
        assert_eq!(validator.normalize("=v3.0.1"), Some("3.0.1".to_string()));
    }

    #[test]
    fn test_semver_rejects_garbage() {
        let validator = SemverValidator::new().unwrap();
        assert_eq!(validator.normalize("abc"), None);
        assert_eq!(validator.normalize("1.2"), None);
        assert_eq!(validator.normalize("01.2.3"), None);
        assert_eq!(validator.normalize("^1.2.3"), None);
        assert_eq!(validator.normalize(""), None);
    }

    #[test]
    fn test_closure_validator() {
        let upper = |raw: &str| Some(raw.to_uppercase());
        assert_eq!(upper.normalize("abc"), Some("ABC".to_string()));
    }
}
