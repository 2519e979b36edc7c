//! # Field Rules
//!
//! Declarative per-field checks. A rule is plain data: a presence policy,
//! an ordered list of checks paired with the message reported when they
//! fail, and an optional normalizer applied once every check has passed.
//!
//! ## Invariants
//! - Checks run in declaration order; the first failure wins and the
//!   remaining checks are not evaluated.
//! - Every check sees the trimmed value.
//! - The normalizer never runs on a value that failed a check.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+@[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?)*\.[A-Za-z]{2,}$",
    )
    .expect("email pattern compiles")
});

static INTEGER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[-+]?[0-9]+$").expect("integer pattern compiles"));

static E164_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+[1-9][0-9]{1,14}$").expect("phone pattern compiles"));

static ADDRESS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9,.\-\s]+$").expect("address pattern compiles"));

static POSTAL_CODE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9][A-Za-z0-9 \-]*$").expect("postal code pattern compiles")
});

/// Longest e-mail address accepted (RFC 5321 path limit)
const MAX_EMAIL_LEN: usize = 254;

/// Whether a field must carry a value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    /// Absent or blank values fail with `message`
    Required { message: &'static str },

    /// Absent or blank values skip the rule entirely
    Optional,
}

/// A pure predicate over a trimmed field value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Check {
    /// Character count within `min..=max`
    Length { min: usize, max: usize },

    /// ASCII letters only
    Alphabetic,

    /// `local@domain.tld`
    Email,

    /// Optional sign followed by ASCII digits
    Integer,

    /// Integer value no smaller than the bound
    AtLeast(i64),

    /// E.164 phone number: `+`, country code, up to 15 digits
    E164Phone,

    /// Letters, digits, whitespace, commas, dots and dashes
    AddressSafe,

    /// Letters, digits, spaces and dashes, starting with a letter or digit
    PostalCode,

    /// ASCII digits only, no sign
    Digits,

    /// Digit string with a valid Luhn checksum
    Luhn,
}

impl Check {
    /// Returns whether `value` satisfies this check
    pub fn holds(&self, value: &str) -> bool {
        match *self {
            Check::Length { min, max } => {
                let len = value.chars().count();
                len >= min && len <= max
            }
            Check::Alphabetic => !value.is_empty() && value.chars().all(|c| c.is_ascii_alphabetic()),
            Check::Email => value.len() <= MAX_EMAIL_LEN && EMAIL_RE.is_match(value),
            Check::Integer => INTEGER_RE.is_match(value),
            Check::AtLeast(bound) => at_least(value, bound),
            Check::E164Phone => E164_RE.is_match(value),
            Check::AddressSafe => ADDRESS_RE.is_match(value),
            Check::PostalCode => POSTAL_CODE_RE.is_match(value),
            Check::Digits => !value.is_empty() && value.chars().all(|c| c.is_ascii_digit()),
            Check::Luhn => luhn_valid(value),
        }
    }
}

fn at_least(value: &str, bound: i64) -> bool {
    match value.parse::<i64>() {
        Ok(n) => n >= bound,
        // Out of i64 range: the sign decides which side of the bound it falls on.
        Err(_) => INTEGER_RE.is_match(value) && !value.starts_with('-'),
    }
}

fn luhn_valid(value: &str) -> bool {
    if value.is_empty() || !value.chars().all(|c| c.is_ascii_digit()) {
        return false;
    }

    let sum: u32 = value
        .bytes()
        .rev()
        .map(|b| u32::from(b - b'0'))
        .enumerate()
        .map(|(i, d)| {
            if i % 2 == 1 {
                let doubled = d * 2;
                if doubled > 9 {
                    doubled - 9
                } else {
                    doubled
                }
            } else {
                d
            }
        })
        .sum();

    sum % 10 == 0
}

/// A check and the message reported when it fails
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Constraint {
    pub check: Check,
    pub message: &'static str,
}

/// Pure transformation applied to a value after all checks pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Normalizer {
    Lowercase,
}

impl Normalizer {
    pub fn apply(&self, value: &str) -> String {
        match self {
            Normalizer::Lowercase => value.to_lowercase(),
        }
    }
}

/// Declarative validation rule for one request field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldRule {
    field: &'static str,
    presence: Presence,
    constraints: Vec<Constraint>,
    normalizer: Option<Normalizer>,
}

impl FieldRule {
    /// A field that must be present and non-blank
    pub fn required(field: &'static str, message: &'static str) -> Self {
        Self {
            field,
            presence: Presence::Required { message },
            constraints: Vec::new(),
            normalizer: None,
        }
    }

    /// A field whose checks only run when a non-blank value is supplied
    pub fn optional(field: &'static str) -> Self {
        Self {
            field,
            presence: Presence::Optional,
            constraints: Vec::new(),
            normalizer: None,
        }
    }

    /// Append a check to the end of the chain
    pub fn check(mut self, check: Check, message: &'static str) -> Self {
        self.constraints.push(Constraint { check, message });
        self
    }

    /// Set the normalizer
    pub fn normalize(mut self, normalizer: Normalizer) -> Self {
        self.normalizer = Some(normalizer);
        self
    }

    pub fn field(&self) -> &'static str {
        self.field
    }

    pub fn presence(&self) -> Presence {
        self.presence
    }

    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    /// Evaluate the rule against a raw payload value
    ///
    /// Returns `Ok(Some(normalized))` for a value that passed, `Ok(None)` for
    /// an optional field that was skipped, and `Err(message)` for the first
    /// failing check.
    pub fn evaluate(&self, raw: Option<&Value>) -> Result<Option<String>, &'static str> {
        let text = raw_text(raw);
        let trimmed = text.as_deref().map(str::trim).filter(|s| !s.is_empty());

        let value = match (trimmed, self.presence) {
            (Some(value), _) => value,
            (None, Presence::Required { message }) => return Err(message),
            (None, Presence::Optional) => return Ok(None),
        };

        if let Some(failed) = self.constraints.iter().find(|c| !c.check.holds(value)) {
            return Err(failed.message);
        }

        Ok(Some(match self.normalizer {
            Some(normalizer) => normalizer.apply(value),
            None => value.to_string(),
        }))
    }
}

/// Render a raw JSON value as the text the checks operate on
///
/// `null` counts as absent. Arrays and objects keep their JSON text so that
/// character-class checks reject them.
pub fn raw_text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        other => Some(other.to_string()),
    }
}
