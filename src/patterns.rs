//! Built-in PHI patterns and caller-supplied custom patterns.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::{PhiVaultError, Result};

// Built-ins use ASCII word boundaries: a number touching a non-ASCII
// letter (`nº123-45-6789`, `电话5551234567`) is still a separate token.
fn builtin(pattern: &str) -> Regex {
    Regex::new(pattern).expect("built-in redaction pattern must compile")
}

/// `123-45-6789`
pub(crate) static SSN: LazyLock<Regex> =
    LazyLock::new(|| builtin(r"(?-u:\b)[0-9]{3}-[0-9]{2}-[0-9]{4}(?-u:\b)"));

/// `555-123-4567`, `555.123.4567`, `5551234567`
pub(crate) static PHONE: LazyLock<Regex> =
    LazyLock::new(|| builtin(r"(?-u:\b)[0-9]{3}[-.]?[0-9]{3}[-.]?[0-9]{4}(?-u:\b)"));

pub(crate) static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    builtin(r"(?-u:\b)[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Z|a-z]{2,}(?-u:\b)")
});

/// `1/2/90`, `01/02/1990`
pub(crate) static DATE: LazyLock<Regex> =
    LazyLock::new(|| builtin(r"(?-u:\b)[0-9]{1,2}/[0-9]{1,2}/[0-9]{2,4}(?-u:\b)"));

/// `12345`, `12345-6789`
pub(crate) static ZIP_CODE: LazyLock<Regex> =
    LazyLock::new(|| builtin(r"(?-u:\b)[0-9]{5}(-[0-9]{4})?(?-u:\b)"));

/// Case-insensitive literal match of `text`.
pub(crate) fn literal_ci(text: &str) -> Result<Regex> {
    compile(&format!("(?i){}", regex::escape(text)))
}

/// Case-insensitive whole-word match of `word`.
pub(crate) fn word_ci(word: &str) -> Result<Regex> {
    compile(&format!(r"(?i)\b{}\b", regex::escape(word)))
}

fn compile(pattern: &str) -> Result<Regex> {
    Regex::new(pattern)
        .map_err(|e| PhiVaultError::Configuration(format!("invalid redaction pattern: {e}")))
}

/// A developer-supplied pattern and the literal text that replaces each match.
#[derive(Debug, Clone)]
pub struct CustomPattern {
    pattern: Regex,
    replacement: String,
}

impl CustomPattern {
    /// Compile `pattern`. A malformed pattern is a `Configuration` error.
    ///
    /// The replacement is inserted verbatim; `$1` is not expanded.
    pub fn new(pattern: &str, replacement: impl Into<String>) -> Result<Self> {
        Ok(Self {
            pattern: compile(pattern)?,
            replacement: replacement.into(),
        })
    }

    pub fn from_regex(pattern: Regex, replacement: impl Into<String>) -> Self {
        Self {
            pattern,
            replacement: replacement.into(),
        }
    }

    pub fn pattern(&self) -> &Regex {
        &self.pattern
    }

    pub fn replacement(&self) -> &str {
        &self.replacement
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtins_match() {
        assert!(SSN.is_match("123-45-6789"));
        assert!(!SSN.is_match("123456789"));
        assert!(PHONE.is_match("555.123.4567"));
        assert!(PHONE.is_match("5551234567"));
        assert!(EMAIL.is_match("a.b+c@clinic.org"));
        assert!(!EMAIL.is_match("a@b.c"));
        assert!(DATE.is_match("1/2/90"));
        assert!(ZIP_CODE.is_match("94110-1234"));
        assert!(!ZIP_CODE.is_match("941101"));
    }

    #[test]
    fn test_literal_escapes_metacharacters() {
        let re = literal_ci("O'Brien (Jr.)").unwrap();
        assert!(re.is_match("seen by o'brien (jr.) today"));
        assert!(!re.is_match("O'Brien XJr.)"));
    }

    #[test]
    fn test_word_is_whole_word_only() {
        let re = word_ci("Ann").unwrap();
        assert!(re.is_match("ann said"));
        assert!(!re.is_match("Annual visit"));
    }

    #[test]
    fn test_ascii_boundaries_next_to_non_ascii_letters() {
        assert!(SSN.is_match("nº123-45-6789"));
        assert!(PHONE.is_match("电话5551234567"));
        assert!(PHONE.is_match("tel:555-123-4567é"));
        assert!(ZIP_CODE.is_match("código94110"));
        assert!(!PHONE.is_match("x5551234567"));
    }

    #[test]
    fn test_from_regex_keeps_prebuilt_pattern() {
        let re = regex::RegexBuilder::new("mrn-[0-9]+")
            .case_insensitive(true)
            .build()
            .unwrap();
        let custom = CustomPattern::from_regex(re, "[MRN]");
        assert!(custom.pattern().is_match("MRN-0042"));
        assert_eq!(custom.replacement(), "[MRN]");
    }

    #[test]
    fn test_malformed_custom_pattern_is_configuration_error() {
        let err = CustomPattern::new("(unclosed", "x").unwrap_err();
        assert!(matches!(err, PhiVaultError::Configuration(_)));
    }
}
