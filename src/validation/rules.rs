//! Declarative per-field validation rules.

use std::fmt;

use super::{ValidationErrors, Validator};

/// A rule applied to a text field.
///
/// Values are trimmed before the rule is checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// Value must not be empty or whitespace-only
    Required,
    /// Value must have at least this many characters
    MinLength(usize),
    /// Value must have at most this many characters
    MaxLength(usize),
    /// Value must not contain control or non-printable characters
    NoControlChars,
}

impl Rule {
    /// Returns the failure message if `value` breaks this rule.
    pub fn check(self, value: &str) -> Option<String> {
        let value = value.trim();
        match self {
            Rule::Required if value.is_empty() => Some("required".to_string()),
            Rule::MinLength(min) if value.chars().count() < min => {
                Some(format!("must be at least {} characters", min))
            }
            Rule::MaxLength(max) if value.chars().count() > max => {
                Some(format!("must be at most {} characters", max))
            }
            Rule::NoControlChars if value.chars().any(is_control_char) => {
                Some("must not contain control characters".to_string())
            }
            _ => None,
        }
    }
}

fn is_control_char(c: char) -> bool {
    c.is_control() || c == '\u{007F}'
}

type TextAccessor<R> = Box<dyn for<'a> Fn(&'a R) -> &'a str + Send + Sync>;
type Predicate<R> = Box<dyn Fn(&R) -> bool + Send + Sync>;

enum Check<R> {
    Text {
        field: &'static str,
        get: TextAccessor<R>,
        rules: Vec<Rule>,
    },
    Predicate {
        field: &'static str,
        test: Predicate<R>,
        message: String,
    },
}

/// A validator built from declared field rules.
///
/// Every rule on every field is evaluated; a field breaking two rules is
/// reported twice.
///
/// # Examples
///
/// ```
/// use pipeline_core::{Rule, Rules, Validator};
///
/// #[derive(Debug)]
/// struct Rename {
///     title: String,
/// }
///
/// let rules = Rules::<Rename>::new()
///     .field("title", |r: &Rename| r.title.as_str(), [Rule::Required, Rule::MaxLength(5)]);
///
/// let errors = rules.validate(&Rename { title: "   ".to_string() });
/// assert_eq!(errors.iter().next().unwrap().message, "required");
///
/// assert!(rules.validate(&Rename { title: "Run".to_string() }).is_empty());
/// ```
pub struct Rules<R> {
    checks: Vec<Check<R>>,
}

impl<R> Rules<R> {
    /// Creates an empty rule set.
    pub fn new() -> Self {
        Self { checks: Vec::new() }
    }

    /// Declares rules for a text field.
    pub fn field<F>(mut self, field: &'static str, get: F, rules: impl IntoIterator<Item = Rule>) -> Self
    where
        F: for<'a> Fn(&'a R) -> &'a str + Send + Sync + 'static,
    {
        self.checks.push(Check::Text {
            field,
            get: Box::new(get),
            rules: rules.into_iter().collect(),
        });
        self
    }

    /// Declares a custom check; `message` is reported when `test` returns `false`.
    pub fn must<P>(mut self, field: &'static str, test: P, message: impl Into<String>) -> Self
    where
        P: Fn(&R) -> bool + Send + Sync + 'static,
    {
        self.checks.push(Check::Predicate {
            field,
            test: Box::new(test),
            message: message.into(),
        });
        self
    }
}

impl<R> Default for Rules<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> Validator<R> for Rules<R> {
    fn validate(&self, request: &R) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        for check in &self.checks {
            match check {
                Check::Text { field, get, rules } => {
                    let value = get(request);
                    for message in rules.iter().filter_map(|rule| rule.check(value)) {
                        errors.push(*field, message);
                    }
                }
                Check::Predicate {
                    field,
                    test,
                    message,
                } => {
                    if !test(request) {
                        errors.push(*field, message.clone());
                    }
                }
            }
        }
        errors
    }
}

impl<R> fmt::Debug for Rules<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fields: Vec<&str> = self
            .checks
            .iter()
            .map(|check| match check {
                Check::Text { field, .. } | Check::Predicate { field, .. } => *field,
            })
            .collect();
        f.debug_struct("Rules").field("fields", &fields).finish()
    }
}
