//! PHI redaction engine.
//!
//! Produces a de-identified copy of clinical text. The source text is never
//! modified. Redaction runs as a fixed pipeline:
//!
//! ```text
//! identity (full name -> first name -> last name)
//!   -> SSN -> phone -> email -> date -> zip -> custom
//! ```
//!
//! Each pass scans the output of the previous one. Offsets in a
//! [`RedactedItem`] are character offsets into the text *as that pass saw
//! it*, so once an earlier pass has changed the text length, offsets from
//! different passes no longer line up with each other or with the final
//! text. Consumers that need positions in the final text must re-locate the
//! placeholders themselves.

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::patterns::{self, CustomPattern};

/// What a redacted span was.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RedactionCategory {
    PatientName,
    PatientFirstName,
    PatientLastName,
    Ssn,
    Phone,
    Email,
    Date,
    ZipCode,
    Custom,
}

impl RedactionCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PatientName => "PATIENT_NAME",
            Self::PatientFirstName => "PATIENT_FIRST_NAME",
            Self::PatientLastName => "PATIENT_LAST_NAME",
            Self::Ssn => "SSN",
            Self::Phone => "PHONE",
            Self::Email => "EMAIL",
            Self::Date => "DATE",
            Self::ZipCode => "ZIP_CODE",
            Self::Custom => "CUSTOM",
        }
    }

    /// The token substituted for a match. `None` for custom patterns, which
    /// carry their own replacement.
    pub fn placeholder(&self) -> Option<&'static str> {
        match self {
            Self::PatientName => Some(placeholder::PATIENT_NAME),
            Self::PatientFirstName => Some(placeholder::PATIENT_FIRST_NAME),
            Self::PatientLastName => Some(placeholder::PATIENT_LAST_NAME),
            Self::Ssn => Some(placeholder::SSN),
            Self::Phone => Some(placeholder::PHONE),
            Self::Email => Some(placeholder::EMAIL),
            Self::Date => Some(placeholder::DATE),
            Self::ZipCode => Some(placeholder::ZIP_CODE),
            Self::Custom => None,
        }
    }
}

/// Tokens for the built-in categories.
mod placeholder {
    pub(super) const PATIENT_NAME: &str = "[PATIENT-NAME]";
    pub(super) const PATIENT_FIRST_NAME: &str = "[PATIENT-FIRST-NAME]";
    pub(super) const PATIENT_LAST_NAME: &str = "[PATIENT-LAST-NAME]";
    pub(super) const SSN: &str = "[REDACTED-SSN]";
    pub(super) const PHONE: &str = "[REDACTED-PHONE]";
    pub(super) const EMAIL: &str = "[REDACTED-EMAIL]";
    pub(super) const DATE: &str = "[REDACTED-DATE]";
    pub(super) const ZIP_CODE: &str = "[REDACTED-ZIP]";
}

impl std::fmt::Display for RedactionCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Half-open `[start, end)` character range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    fn contains(&self, offset: usize) -> bool {
        offset >= self.start && offset < self.end
    }
}

/// One redaction event.
///
/// `value` is the raw PHI that was removed. Strip it before anything is
/// logged durably.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedactedItem {
    #[serde(rename = "type")]
    pub category: RedactionCategory,
    pub value: String,
    pub position: Span,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RedactionResult {
    pub redacted_text: String,
    pub redacted_items: Vec<RedactedItem>,
}

impl RedactionResult {
    fn unchanged(text: &str) -> Self {
        Self {
            redacted_text: text.to_owned(),
            redacted_items: Vec::new(),
        }
    }

    /// Categories in item order, without the matched values.
    pub fn categories(&self) -> Vec<RedactionCategory> {
        self.redacted_items.iter().map(|item| item.category).collect()
    }
}

/// Patient identity supplied by the caller for name redaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientIdentity {
    pub first_name: String,
    pub last_name: String,
}

impl PatientIdentity {
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
        }
    }
}

/// Per-category toggles plus custom patterns.
///
/// Dates are off by default: visit and onset dates are clinically
/// meaningful.
#[derive(Debug, Clone)]
pub struct RedactionOptions {
    pub redact_names: bool,
    pub redact_dates: bool,
    pub redact_phone: bool,
    pub redact_email: bool,
    pub redact_ssn: bool,
    pub redact_address: bool,
    /// Applied last, in order.
    pub custom_patterns: Vec<CustomPattern>,
}

impl Default for RedactionOptions {
    fn default() -> Self {
        Self {
            redact_names: true,
            redact_dates: false,
            redact_phone: true,
            redact_email: true,
            redact_ssn: true,
            redact_address: false,
            custom_patterns: Vec::new(),
        }
    }
}

impl RedactionOptions {
    /// Build options from request query flags.
    ///
    /// `redactNames`, `redactPhone`, `redactEmail` and `redactSSN` are on
    /// unless the flag is exactly `"false"`. Dates and address stay off.
    pub fn from_query<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let flag = |name: &str| lookup(name).as_deref() != Some("false");
        Self {
            redact_names: flag("redactNames"),
            redact_phone: flag("redactPhone"),
            redact_email: flag("redactEmail"),
            redact_ssn: flag("redactSSN"),
            ..Self::default()
        }
    }

    pub fn with_custom_pattern(mut self, pattern: CustomPattern) -> Self {
        self.custom_patterns.push(pattern);
        self
    }
}

/// Replace every match of `pattern` in `text` with `replacement`.
///
/// `record` decides, from a match's start offset, whether an item is pushed
/// for it. The textual replacement happens either way.
fn substitute(
    text: &str,
    pattern: &Regex,
    category: RedactionCategory,
    replacement: &str,
    items: &mut Vec<RedactedItem>,
    record: impl Fn(usize) -> bool,
) -> String {
    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    let mut offset = 0;

    for m in pattern.find_iter(text) {
        let gap = &text[last..m.start()];
        offset += gap.chars().count();
        out.push_str(gap);
        out.push_str(replacement);

        let start = offset;
        offset += m.as_str().chars().count();
        if record(start) {
            items.push(RedactedItem {
                category,
                value: m.as_str().to_owned(),
                position: Span { start, end: offset },
            });
        }
        last = m.end();
    }

    out.push_str(&text[last..]);
    out
}

/// Pattern-based redaction, governed by `options`.
pub fn redact_text(text: &str, options: &RedactionOptions) -> RedactionResult {
    if text.is_empty() {
        return RedactionResult::unchanged("");
    }

    let builtins: [(bool, &Regex, RedactionCategory, &str); 5] = [
        (options.redact_ssn, &*patterns::SSN, RedactionCategory::Ssn, placeholder::SSN),
        (options.redact_phone, &*patterns::PHONE, RedactionCategory::Phone, placeholder::PHONE),
        (options.redact_email, &*patterns::EMAIL, RedactionCategory::Email, placeholder::EMAIL),
        (options.redact_dates, &*patterns::DATE, RedactionCategory::Date, placeholder::DATE),
        (
            options.redact_address,
            &*patterns::ZIP_CODE,
            RedactionCategory::ZipCode,
            placeholder::ZIP_CODE,
        ),
    ];

    let mut current = text.to_owned();
    let mut items = Vec::new();

    for (enabled, pattern, category, token) in builtins {
        if enabled {
            current = substitute(&current, pattern, category, token, &mut items, |_| true);
        }
    }

    for custom in &options.custom_patterns {
        current = substitute(
            &current,
            custom.pattern(),
            RedactionCategory::Custom,
            custom.replacement(),
            &mut items,
            |_| true,
        );
    }

    RedactionResult {
        redacted_text: current,
        redacted_items: items,
    }
}

/// Identity-based redaction of a known patient's names.
///
/// The full name goes first. First and last names are then replaced as
/// whole words wherever they still occur. A first or last name match whose
/// offset falls inside a recorded full-name span is replaced but not
/// recorded again. Offsets of the single-name passes are taken in the text
/// after the full-name pass, while the spans they are checked against are
/// in the text before it.
pub fn redact_patient_names(
    text: &str,
    patient: Option<&PatientIdentity>,
) -> Result<RedactionResult> {
    let Some(patient) = patient else {
        return Ok(RedactionResult::unchanged(text));
    };
    if text.is_empty() {
        return Ok(RedactionResult::unchanged(text));
    }

    let first = patient.first_name.trim();
    let last = patient.last_name.trim();
    let mut current = text.to_owned();
    let mut items = Vec::new();

    if !first.is_empty() && !last.is_empty() {
        let full = patterns::literal_ci(&format!("{first} {last}"))?;
        current = substitute(
            &current,
            &full,
            RedactionCategory::PatientName,
            placeholder::PATIENT_NAME,
            &mut items,
            |_| true,
        );
    }

    let full_name_spans: Vec<Span> = items
        .iter()
        .filter(|item| item.category == RedactionCategory::PatientName)
        .map(|item| item.position)
        .collect();
    let outside_full_name = |offset: usize| !full_name_spans.iter().any(|s| s.contains(offset));

    for (name, category, token) in [
        (first, RedactionCategory::PatientFirstName, placeholder::PATIENT_FIRST_NAME),
        (last, RedactionCategory::PatientLastName, placeholder::PATIENT_LAST_NAME),
    ] {
        if name.is_empty() {
            continue;
        }
        let pattern = patterns::word_ci(name)?;
        current = substitute(&current, &pattern, category, token, &mut items, outside_full_name);
    }

    Ok(RedactionResult {
        redacted_text: current,
        redacted_items: items,
    })
}

/// Identity redaction (when a patient is given) followed by pattern
/// redaction over its output. Identity items come first.
pub fn redact_comprehensive(
    text: &str,
    patient: Option<&PatientIdentity>,
    options: &RedactionOptions,
) -> Result<RedactionResult> {
    let identity = redact_patient_names(text, patient)?;
    let pattern = redact_text(&identity.redacted_text, options);

    let mut items = identity.redacted_items;
    items.extend(pattern.redacted_items);

    Ok(RedactionResult {
        redacted_text: pattern.redacted_text,
        redacted_items: items,
    })
}
