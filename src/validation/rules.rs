//! Per-field rule definitions and the synchronous rule engine.
//!
//! Rules run in a fixed order and stop at the first failure: `required`,
//! then `minLength` and `pattern` (both skipped for empty values), then the
//! custom checks in declaration order.

use std::sync::OnceLock;

use regex::Regex;

use crate::validation::field::{ErrorKind, FieldError, FieldName};
use crate::validation::form::FormValues;
use crate::validation::image::ImageCheck;
use crate::validation::memo::RejectionMemo;
use crate::validation::messages::REQUIRED_MESSAGE;

/// `something@host.tld`, no whitespace.
pub fn email_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(?i)^\S+@\S+\.\S+$").expect("email pattern is valid"))
}

/// Absolute http(s) URL.
pub fn http_url_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^https?://.*").expect("url pattern is valid"))
}

/// Checks that need more than the field's own value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Check {
    /// Equal to the live value of the password field.
    MatchesPassword,
    /// Not a value the server already rejected for this field.
    NotRejected,
    /// Loads as an image. Requires a probe result for non-empty values.
    ImageLoads,
}

#[derive(Debug, Clone, Default)]
pub struct FieldRules {
    pub required: bool,
    pub min_length: Option<usize>,
    /// Input is truncated to this many characters as it is typed.
    pub max_length: Option<usize>,
    pub pattern: Option<&'static Regex>,
    pub checks: Vec<Check>,
}

impl FieldRules {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn min_length(mut self, min: usize) -> Self {
        self.min_length = Some(min);
        self
    }

    pub fn max_length(mut self, max: usize) -> Self {
        self.max_length = Some(max);
        self
    }

    pub fn pattern(mut self, pattern: &'static Regex) -> Self {
        self.pattern = Some(pattern);
        self
    }

    pub fn check(mut self, check: Check) -> Self {
        self.checks.push(check);
        self
    }

    /// Whether an image load must happen before `value` can be judged.
    pub fn needs_image_probe(&self, value: &str) -> bool {
        self.checks.contains(&Check::ImageLoads)
            && !value.is_empty()
            && self.pattern.map_or(true, |p| p.is_match(value))
    }

    /// Clamp typed input to `max_length`.
    pub fn clamp(&self, value: String) -> String {
        match self.max_length {
            Some(max) if value.chars().count() > max => value.chars().take(max).collect(),
            _ => value,
        }
    }

    /// First failing rule for `value`, if any.
    pub fn evaluate(&self, field: FieldName, value: &str, ctx: &RuleContext<'_>) -> Option<FieldError> {
        if value.is_empty() {
            if self.required {
                return Some(FieldError::with_message(ErrorKind::Required, REQUIRED_MESSAGE));
            }
        } else {
            if let Some(min) = self.min_length {
                if value.chars().count() < min {
                    return Some(FieldError::new(ErrorKind::MinLength));
                }
            }
            if let Some(pattern) = self.pattern {
                if !pattern.is_match(value) {
                    return Some(FieldError::new(ErrorKind::Pattern));
                }
            }
        }

        for check in &self.checks {
            let failed = match check {
                Check::MatchesPassword => value != ctx.values.get(FieldName::Password),
                Check::NotRejected => ctx.memo.is_rejected(field, value),
                Check::ImageLoads => {
                    !value.is_empty() && ctx.images.and_then(|i| i.cached(value)) == Some(false)
                }
            };
            if failed {
                let kind = match check {
                    Check::MatchesPassword => ErrorKind::ValidatePassword,
                    Check::NotRejected => ErrorKind::ServerResponse,
                    Check::ImageLoads => ErrorKind::CheckImgUrl,
                };
                return Some(FieldError::new(kind));
            }
        }

        None
    }
}

/// Everything a rule may look at besides the value under test.
///
/// Cross-field checks read the live snapshot passed in here rather than
/// holding on to a reference of their own.
pub struct RuleContext<'a> {
    pub values: &'a FormValues,
    pub memo: &'a RejectionMemo,
    pub images: Option<&'a ImageCheck>,
}

/// Rules for every field of one form.
#[derive(Debug, Clone, Default)]
pub struct FormSchema {
    fields: Vec<(FieldName, FieldRules)>,
    tags: Option<FieldRules>,
}

impl FormSchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, name: FieldName, rules: FieldRules) -> Self {
        self.fields.push((name, rules));
        self
    }

    /// Rules applied to each entry of the tag list.
    pub fn tags(mut self, rules: FieldRules) -> Self {
        self.tags = Some(rules);
        self
    }

    pub fn rules(&self, name: FieldName) -> Option<&FieldRules> {
        self.fields.iter().find(|(n, _)| *n == name).map(|(_, r)| r)
    }

    pub fn tag_rules(&self) -> Option<&FieldRules> {
        self.tags.as_ref()
    }

    pub fn field_names(&self) -> impl Iterator<Item = FieldName> + '_ {
        self.fields.iter().map(|(n, _)| *n)
    }
}
