//! Field validation: a static rule table per form, evaluated in order, with
//! every violation collected.

use super::EntityForm;
use crate::http::FilePart;
use regex::Regex;
use std::sync::LazyLock;

/// Basic `local@domain.tld` shape.
static EMAIL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\S+@\S+\.\S+").expect("Invalid email regex"));

/// Exactly ten ASCII digits.
static PHONE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{10}$").expect("Invalid phone regex"));

/// Identifies one field of a form by its wire name.
pub trait FormField: Copy + Send + Sync + 'static {
    fn name(self) -> &'static str;
}

/// The current value of a field, as seen by the rules.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue<'a> {
    Text(&'a str),
    Files(&'a [FilePart]),
}

/// Lower bound for a [`Rule::Number`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Minimum {
    /// `> 0`
    Positive,
    /// `>= 0`
    NonNegative,
}

impl Minimum {
    fn admits(self, n: f64) -> bool {
        match self {
            Minimum::Positive => n > 0.0,
            Minimum::NonNegative => n >= 0.0,
        }
    }
}

/// One check, carrying the messages it reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    Required(&'static str),
    Email {
        required: &'static str,
        invalid: &'static str,
    },
    Phone {
        required: &'static str,
        invalid: &'static str,
    },
    /// Numeric with a lower bound. With `required: None` an empty value passes.
    Number {
        required: Option<&'static str>,
        invalid: &'static str,
        min: Minimum,
    },
    /// At least one file.
    Files(&'static str),
}

impl Rule {
    /// The message to report for `value`, if it violates this rule.
    pub fn check(&self, value: FieldValue<'_>) -> Option<&'static str> {
        match (*self, value) {
            (Rule::Files(msg), FieldValue::Files(files)) => files.is_empty().then_some(msg),
            (Rule::Files(msg), FieldValue::Text(_)) => Some(msg),
            (rule, FieldValue::Files(_)) => Some(rule.first_message()),
            (Rule::Required(msg), FieldValue::Text(text)) => text.is_empty().then_some(msg),
            (Rule::Email { required, invalid }, FieldValue::Text(text)) => {
                pattern(text, &EMAIL_REGEX, required, invalid)
            }
            (Rule::Phone { required, invalid }, FieldValue::Text(text)) => {
                pattern(text, &PHONE_REGEX, required, invalid)
            }
            (
                Rule::Number {
                    required,
                    invalid,
                    min,
                },
                FieldValue::Text(text),
            ) => {
                if text.trim().is_empty() {
                    return required;
                }
                match text.trim().parse::<f64>() {
                    Ok(n) if n.is_finite() && min.admits(n) => None,
                    _ => Some(invalid),
                }
            }
        }
    }

    fn first_message(self) -> &'static str {
        match self {
            Rule::Required(msg) | Rule::Files(msg) => msg,
            Rule::Email { required, .. } | Rule::Phone { required, .. } => required,
            Rule::Number {
                required, invalid, ..
            } => required.unwrap_or(invalid),
        }
    }
}

fn pattern(
    text: &str,
    regex: &Regex,
    required: &'static str,
    invalid: &'static str,
) -> Option<&'static str> {
    if text.is_empty() {
        Some(required)
    } else if !regex.is_match(text) {
        Some(invalid)
    } else {
        None
    }
}

/// A rule bound to a field.
#[derive(Debug, Clone, Copy)]
pub struct FieldRule<K> {
    pub field: K,
    pub rule: Rule,
}

impl<K> FieldRule<K> {
    pub const fn new(field: K, rule: Rule) -> Self {
        Self { field, rule }
    }
}

/// Violations keyed by field wire name, in rule order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(Vec<(&'static str, &'static str)>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `message` for `field`; a field keeps its first message.
    pub fn insert(&mut self, field: &'static str, message: &'static str) {
        if !self.contains(field) {
            self.0.push((field, message));
        }
    }

    pub fn get(&self, field: &str) -> Option<&'static str> {
        self.0.iter().find(|(f, _)| *f == field).map(|(_, m)| *m)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.get(field).is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &'static str)> + '_ {
        self.0.iter().copied()
    }
}

/// Runs every rule of `F` against `form`.
pub fn validate<F: EntityForm>(form: &F) -> FieldErrors {
    let mut errors = FieldErrors::new();
    for FieldRule { field, rule } in F::RULES {
        if let Some(message) = rule.check(form.value(*field)) {
            errors.insert(field.name(), message);
        }
    }
    errors
}

#[cfg(test)]
mod tests {
    use super::*;

    const EMAIL: Rule = Rule::Email {
        required: "Email is required",
        invalid: "Email address is invalid",
    };
    const PHONE: Rule = Rule::Phone {
        required: "Phone number is required",
        invalid: "Phone number should be 10 digits",
    };

    #[test]
    fn test_required_is_non_empty() {
        let rule = Rule::Required("Country is required");
        assert_eq!(rule.check(FieldValue::Text("")), Some("Country is required"));
        assert_eq!(rule.check(FieldValue::Text("US")), None);
        // A blank-but-non-empty value passes, as it always has.
        assert_eq!(rule.check(FieldValue::Text(" ")), None);
    }

    #[test]
    fn test_email_pattern() {
        assert_eq!(EMAIL.check(FieldValue::Text("")), Some("Email is required"));
        assert_eq!(EMAIL.check(FieldValue::Text("a@b")), Some("Email address is invalid"));
        assert_eq!(EMAIL.check(FieldValue::Text("a@b.com")), None);
    }

    #[test]
    fn test_phone_is_ten_digits() {
        assert_eq!(PHONE.check(FieldValue::Text("1234567890")), None);
        assert_eq!(
            PHONE.check(FieldValue::Text("123456789")),
            Some("Phone number should be 10 digits")
        );
        assert_eq!(
            PHONE.check(FieldValue::Text("12345678901")),
            Some("Phone number should be 10 digits")
        );
        assert_eq!(
            PHONE.check(FieldValue::Text("12345-7890")),
            Some("Phone number should be 10 digits")
        );
    }

    #[test]
    fn test_numbers() {
        let stock = Rule::Number {
            required: Some("Stock quantity is required"),
            invalid: "Stock must be a positive number",
            min: Minimum::Positive,
        };
        assert_eq!(stock.check(FieldValue::Text("")), Some("Stock quantity is required"));
        assert_eq!(stock.check(FieldValue::Text("-5")), Some("Stock must be a positive number"));
        assert_eq!(stock.check(FieldValue::Text("0")), Some("Stock must be a positive number"));
        assert_eq!(stock.check(FieldValue::Text("abc")), Some("Stock must be a positive number"));
        assert_eq!(stock.check(FieldValue::Text("inf")), Some("Stock must be a positive number"));
        assert_eq!(stock.check(FieldValue::Text(" 5 ")), None);

        let discount = Rule::Number {
            required: None,
            invalid: "Discount price must be a non-negative number",
            min: Minimum::NonNegative,
        };
        assert_eq!(discount.check(FieldValue::Text("")), None);
        assert_eq!(discount.check(FieldValue::Text("0")), None);
        assert_eq!(
            discount.check(FieldValue::Text("-1")),
            Some("Discount price must be a non-negative number")
        );
    }

    #[test]
    fn test_files() {
        let rule = Rule::Files("At least one image is required");
        assert_eq!(rule.check(FieldValue::Files(&[])), Some("At least one image is required"));
        let files = [FilePart::new("a.png", "image/png", vec![0])];
        assert_eq!(rule.check(FieldValue::Files(&files)), None);
    }

    #[test]
    fn test_field_errors_keep_first_message() {
        let mut errors = FieldErrors::new();
        errors.insert("qty", "first");
        errors.insert("qty", "second");
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.get("qty"), Some("first"));
        assert!(!errors.contains("itemId"));
    }
}
