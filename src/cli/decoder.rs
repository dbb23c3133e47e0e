//! Input Decoder Module
//!
//! Turns one line typed at the prompt into a decision for the current row.
//!
//! - empty line: keep the proposed value
//! - `y[count|a]`: keep this row (and the next `count - 1`, or all remaining)
//! - `n[count|a]`: remove this row (same repeat rules)
//! - anything else: a replacement value, checked by the validator if any

use super::validator::ValueValidator;

/// What to do with a row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Keep,
    Remove,
}

/// How many rows, starting at the current one, a decision covers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Repeat {
    Count(usize),
    All,
}

impl Repeat {
    /// Number of rows to apply to, never more than `remaining`
    pub fn rows(self, remaining: usize) -> usize {
        match self {
            Repeat::Count(n) => n.min(remaining),
            Repeat::All => remaining,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decision {
    pub action: Action,
    pub repeat: Repeat,
    pub value: Option<String>,
}

impl Decision {
    fn keep_one(value: Option<String>) -> Self {
        Self {
            action: Action::Keep,
            repeat: Repeat::Count(1),
            value,
        }
    }
}

/// Outcome of decoding one input line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decoded {
    Decision(Decision),
    /// The line was neither a command nor an acceptable value
    Retry,
}

/// Decode a raw input line
pub fn decode(line: &str, validator: Option<&dyn ValueValidator>) -> Decoded {
    let mut chars = line.chars();
    let Some(first) = chars.next() else {
        return Decoded::Decision(Decision::keep_one(None));
    };

    let action = match first.to_ascii_lowercase() {
        'y' => Some(Action::Keep),
        'n' => Some(Action::Remove),
        _ => None,
    };

    if let Some(action) = action {
        return Decoded::Decision(Decision {
            action,
            repeat: parse_repeat(chars.as_str()),
            value: None,
        });
    }

    match validator {
        None => Decoded::Decision(Decision::keep_one(Some(line.to_string()))),
        Some(validator) => match validator.normalize(line) {
            Some(value) => Decoded::Decision(Decision::keep_one(Some(value))),
            None => Decoded::Retry,
        },
    }
}

/// Parse the text after `y`/`n`: `a` for all, else a leading count
///
/// An optional `+` may precede the count. Counts too large for `usize`
/// saturate and are clamped to the remaining rows when applied.
fn parse_repeat(spec: &str) -> Repeat {
    if spec.starts_with(['a', 'A']) {
        return Repeat::All;
    }

    let spec = spec.trim_start();
    let digits: String = spec
        .strip_prefix('+')
        .unwrap_or(spec)
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();

    if digits.is_empty() {
        return Repeat::Count(1);
    }

    match digits.parse::<usize>() {
        Ok(0) => Repeat::Count(1),
        Ok(n) => Repeat::Count(n),
        Err(_) => Repeat::Count(usize::MAX),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::validator::SemverValidator;

    fn decision(action: Action, repeat: Repeat, value: Option<&str>) -> Decoded {
        Decoded::Decision(Decision {
            action,
            repeat,
            value: value.map(str::to_string),
        })
    }

    #[test]
    fn test_empty_line_keeps_one() {
        assert_eq!(decode("", None), decision(Action::Keep, Repeat::Count(1), None));
    }

    #[test]
    fn test_yes_and_no_commands() {
        assert_eq!(decode("Y", None), decision(Action::Keep, Repeat::Count(1), None));
        assert_eq!(decode("y", None), decision(Action::Keep, Repeat::Count(1), None));
        assert_eq!(decode("N2", None), decision(Action::Remove, Repeat::Count(2), None));
        assert_eq!(decode("Na", None), decision(Action::Remove, Repeat::All, None));
        assert_eq!(decode("YA", None), decision(Action::Keep, Repeat::All, None));
        assert_eq!(decode("yall", None), decision(Action::Keep, Repeat::All, None));
    }

    #[test]
    fn test_repeat_defaults_to_one() {
        assert_eq!(decode("n0", None), decision(Action::Remove, Repeat::Count(1), None));
        assert_eq!(decode("nx", None), decision(Action::Remove, Repeat::Count(1), None));
        assert_eq!(decode("y-3", None), decision(Action::Keep, Repeat::Count(1), None));
        assert_eq!(decode("y 12z", None), decision(Action::Keep, Repeat::Count(12), None));
    }

    #[test]
    fn test_repeat_accepts_plus_sign() {
        assert_eq!(decode("y+3", None), decision(Action::Keep, Repeat::Count(3), None));
        assert_eq!(decode("n +2", None), decision(Action::Remove, Repeat::Count(2), None));
        assert_eq!(decode("y+", None), decision(Action::Keep, Repeat::Count(1), None));
    }

    #[test]
    fn test_oversized_repeat_saturates() {
        assert_eq!(
            decode("n99999999999999999999999", None),
            decision(Action::Remove, Repeat::Count(usize::MAX), None)
        );
        assert_eq!(Repeat::Count(usize::MAX).rows(3), 3);
    }

    #[test]
    fn test_free_form_without_validator_is_verbatim() {
        assert_eq!(
            decode("whatever", None),
            decision(Action::Keep, Repeat::Count(1), Some("whatever"))
        );
    }

    #[test]
    fn test_free_form_with_validator() {
        let semver = SemverValidator::new().unwrap();
        assert_eq!(
            decode("v2.0.0", Some(&semver)),
            decision(Action::Keep, Repeat::Count(1), Some("2.0.0"))
        );
        assert_eq!(decode("2.0", Some(&semver)), Decoded::Retry);
    }

    #[test]
    fn test_rejecting_validator_retries() {
        let reject = |_: &str| -> Option<String> { None };
        assert_eq!(decode("1.2.3", Some(&reject)), Decoded::Retry);
    }

    #[test]
    fn test_repeat_is_clamped_to_remaining() {
        assert_eq!(Repeat::Count(5).rows(2), 2);
        assert_eq!(Repeat::Count(1).rows(2), 1);
        assert_eq!(Repeat::All.rows(3), 3);
    }
}
