//! One form instance: values, rule errors, rejection memo and display ledger.
//!
//! Mirrors how an input behaves in the UI: a changed field is re-validated
//! only while it already shows an error, a blurred field only once it has
//! been edited, and submit validates everything. Every validation pass ends
//! with a reconcile into the form's [`ErrorLedger`].

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use crate::api::FieldMessages;
use crate::validation::field::{ErrorKind, FieldError, FieldErrors, FieldName, FieldPath};
use crate::validation::image::{ImageCheck, ImageProbe};
use crate::validation::memo::RejectionMemo;
use crate::validation::reconciler::{reconcile, ErrorLedger, ReconcileInput};
use crate::validation::rules::{Check, FormSchema, RuleContext};

/// Live values of a form.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FormValues {
    fields: BTreeMap<FieldName, String>,
    tags: Vec<String>,
}

impl FormValues {
    /// Current value, empty when never set.
    pub fn get(&self, field: FieldName) -> &str {
        self.fields.get(&field).map(String::as_str).unwrap_or("")
    }

    pub fn set(&mut self, field: FieldName, value: impl Into<String>) {
        self.fields.insert(field, value.into());
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn set_tags(&mut self, tags: Vec<String>) {
        self.tags = tags;
    }
}

/// Which fields a validation pass covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    All,
    Field(FieldName),
    Tag(usize),
}

pub struct Form {
    schema: FormSchema,
    values: FormValues,
    errors: FieldErrors,
    dirty: BTreeSet<FieldPath>,
    submitted: bool,
    memo: RejectionMemo,
    images: Option<ImageCheck>,
    ledger: ErrorLedger,
}

impl Form {
    pub fn new(schema: FormSchema) -> Self {
        Self {
            schema,
            values: FormValues::default(),
            errors: FieldErrors::default(),
            dirty: BTreeSet::new(),
            submitted: false,
            memo: RejectionMemo::default(),
            images: None,
            ledger: ErrorLedger::default(),
        }
    }

    pub fn with_memo_capacity(mut self, capacity: usize) -> Self {
        self.memo = RejectionMemo::new(capacity);
        self
    }

    pub fn with_image_probe(mut self, probe: Arc<dyn ImageProbe>) -> Self {
        self.images = Some(ImageCheck::new(probe));
        self
    }

    /// Seed values without marking anything dirty.
    pub fn with_values(mut self, values: FormValues) -> Self {
        self.values = values;
        self
    }

    pub fn values(&self) -> &FormValues {
        &self.values
    }

    pub fn value(&self, field: FieldName) -> &str {
        self.values.get(field)
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn ledger(&self) -> &ErrorLedger {
        &self.ledger
    }

    pub fn memo(&self) -> &RejectionMemo {
        &self.memo
    }

    pub fn is_submitted(&self) -> bool {
        self.submitted
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Whether the submit control should be enabled.
    pub fn can_submit(&self) -> bool {
        !self.submitted || self.is_valid()
    }

    /// Type into `field`. Re-validates only if the field already has an error.
    pub async fn change(&mut self, field: FieldName, value: impl Into<String>) {
        let value = value.into();
        let value = match self.schema.rules(field) {
            Some(rules) => rules.clamp(value),
            None => value,
        };
        self.values.set(field, value);
        self.dirty.insert(FieldPath::Field(field));
        if self.errors.contains(field) {
            self.trigger(Target::Field(field)).await;
        }
    }

    /// Leave `field`. Validates once the field has been edited.
    pub async fn blur(&mut self, field: FieldName) {
        if self.dirty.contains(&FieldPath::Field(field)) {
            self.trigger(Target::Field(field)).await;
        }
    }

    /// Append an empty tag input.
    pub fn add_tag(&mut self) {
        let mut tags = self.values.tags().to_vec();
        tags.push(String::new());
        self.values.set_tags(tags);
    }

    /// A new tag may be added only while no existing tag is blank.
    pub fn can_add_tag(&self) -> bool {
        self.values.tags().iter().all(|t| !t.is_empty())
    }

    /// Remove tag `idx`, shifting later tags and their errors down by one.
    pub fn remove_tag(&mut self, idx: usize) {
        let mut tags = self.values.tags().to_vec();
        if idx >= tags.len() {
            return;
        }
        tags.remove(idx);
        self.values.set_tags(tags);

        let shifted = std::mem::take(&mut self.errors.tags)
            .into_iter()
            .filter(|(i, _)| *i != idx)
            .map(|(i, e)| if i > idx { (i - 1, e) } else { (i, e) })
            .collect();
        self.errors.tags = shifted;
        self.dirty.retain(|p| !matches!(p, FieldPath::Tag(_)));
        self.reconcile();
    }

    pub async fn change_tag(&mut self, idx: usize, value: impl Into<String>) {
        let mut tags = self.values.tags().to_vec();
        let Some(slot) = tags.get_mut(idx) else {
            return;
        };
        let value = value.into();
        *slot = match self.schema.tag_rules() {
            Some(rules) => rules.clamp(value),
            None => value,
        };
        self.values.set_tags(tags);
        self.dirty.insert(FieldPath::Tag(idx));
        if self.errors.tag(idx).is_some() {
            self.trigger(Target::Tag(idx)).await;
        }
    }

    /// Tag inputs validate on every blur.
    pub async fn blur_tag(&mut self, idx: usize) {
        self.trigger(Target::Tag(idx)).await;
    }

    /// Validate `target` and reconcile the display.
    pub async fn trigger(&mut self, target: Target) {
        match target {
            Target::All => {
                let schema = &self.schema;
                self.errors
                    .fields
                    .retain(|name, _| schema.rules(*name).is_some());
                let names: Vec<FieldName> = self.schema.field_names().collect();
                for name in names {
                    self.validate_field(name).await;
                }
                self.errors.tags.clear();
                for idx in 0..self.values.tags().len() {
                    self.validate_tag(idx);
                }
            }
            Target::Field(name) => self.validate_field(name).await,
            Target::Tag(idx) => self.validate_tag(idx),
        }
        self.reconcile();
    }

    /// Mark submitted and validate everything.
    ///
    /// Returns the values to send when every rule passes.
    pub async fn submit(&mut self) -> Option<FormValues> {
        self.submitted = true;
        self.trigger(Target::All).await;
        if self.is_valid() {
            Some(self.values.clone())
        } else {
            tracing::debug!(errors = self.errors.fields.len() + self.errors.tags.len(), "Form submit blocked");
            None
        }
    }

    /// Attach an error to `field` without running its rules.
    pub fn set_error(&mut self, field: FieldName, error: FieldError) {
        self.errors.set(field, Some(error));
        self.reconcile();
    }

    /// Remember a 422 response and surface it on the form.
    ///
    /// For every rejected field that checks the memo, the current literal value is
    /// recorded with the server's message. The first such field gets a
    /// `serverResponse` error and the whole form is re-validated, so the
    /// memoized text shows up and stays until the value changes. Other fields
    /// of the form get the server's message attached directly until they are
    /// edited.
    ///
    /// Returns `false` when some rejected key names no field of this form.
    pub async fn record_rejections(&mut self, rejected: &FieldMessages) -> bool {
        let mut first = None;
        let mut direct = Vec::new();
        let mut all_placed = true;
        for (key, message) in rejected {
            let found = FieldName::parse(key).and_then(|f| self.schema.rules(f).map(|r| (f, r)));
            let Some((field, rules)) = found else {
                all_placed = false;
                continue;
            };
            if !rules.checks.contains(&Check::NotRejected) {
                direct.push((field, message.clone()));
                continue;
            }
            let value = self.values.get(field).to_string();
            self.memo.record(field, &value, message);
            first.get_or_insert(field);
        }

        if let Some(field) = first {
            self.errors
                .set(field, Some(FieldError::new(ErrorKind::ServerResponse)));
            self.trigger(Target::All).await;
        }
        if !direct.is_empty() {
            for (field, message) in direct {
                self.errors.set(
                    field,
                    Some(FieldError::with_message(ErrorKind::ServerResponse, message)),
                );
            }
            self.reconcile();
        }
        all_placed
    }

    /// Drop every error and reset submit state, keeping values and memo.
    pub fn clear_errors(&mut self) {
        self.errors.clear();
        self.submitted = false;
        self.reconcile();
    }

    async fn validate_field(&mut self, name: FieldName) {
        let Some(rules) = self.schema.rules(name) else {
            return;
        };
        let value = self.values.get(name).to_string();

        if rules.needs_image_probe(&value) {
            if let Some(images) = self.images.as_mut() {
                images.check(&value).await;
            }
        }

        let ctx = RuleContext {
            values: &self.values,
            memo: &self.memo,
            images: self.images.as_ref(),
        };
        let error = rules.evaluate(name, &value, &ctx);
        self.errors.set(name, error);
    }

    fn validate_tag(&mut self, idx: usize) {
        let Some(rules) = self.schema.tag_rules() else {
            return;
        };
        let Some(value) = self.values.tags().get(idx) else {
            self.errors.set_tag(idx, None);
            return;
        };
        let ctx = RuleContext {
            values: &self.values,
            memo: &self.memo,
            images: None,
        };
        let error = rules.evaluate(FieldName::TagList, value, &ctx);
        self.errors.set_tag(idx, error);
    }

    fn reconcile(&mut self) {
        let input = ReconcileInput {
            submitted: self.submitted,
            confirms_password: self.schema.rules(FieldName::PasswordConfirm).is_some(),
            values: &self.values,
            memo: &self.memo,
        };
        reconcile(&mut self.errors, &input, &mut self.ledger);
    }
}
