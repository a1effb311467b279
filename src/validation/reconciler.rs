//! Projects rule-engine output into the rendering layer's error slots.
//!
//! The rendering layer keeps its own per-field error ledger. After every
//! validation pass the reconciler fills in missing messages, adds the
//! synthetic confirmation error, clears slots whose cause went away and then
//! pushes the fresh messages in a single batch.

use std::collections::BTreeMap;

use crate::validation::field::{ErrorKind, FieldError, FieldErrors, FieldName, FieldPath};
use crate::validation::form::FormValues;
use crate::validation::memo::RejectionMemo;
use crate::validation::messages::{message_for, EMPTY_TAG_MESSAGE};

/// One change to a displayed error slot. `messages: None` clears it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldUpdate {
    pub path: FieldPath,
    pub messages: Option<Vec<String>>,
}

impl FieldUpdate {
    pub fn show(path: FieldPath, messages: Vec<String>) -> Self {
        Self {
            path,
            messages: Some(messages),
        }
    }

    pub fn clear(path: FieldPath) -> Self {
        Self {
            path,
            messages: None,
        }
    }
}

/// The rendering layer's own field-error state.
pub trait FieldErrorSink {
    /// Slots currently showing an error.
    fn displayed(&self) -> Vec<FieldPath>;

    /// Apply `updates` as one batch.
    fn set_fields(&mut self, updates: Vec<FieldUpdate>);
}

/// In-memory error slots, for headless front ends and tests.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ErrorLedger {
    slots: BTreeMap<FieldPath, Vec<String>>,
    batches: usize,
}

impl ErrorLedger {
    pub fn messages(&self, path: FieldPath) -> Option<&[String]> {
        self.slots.get(&path).map(Vec::as_slice)
    }

    /// First message shown for `field`.
    pub fn message(&self, field: FieldName) -> Option<&str> {
        self.slots
            .get(&FieldPath::Field(field))
            .and_then(|m| m.first())
            .map(String::as_str)
    }

    pub fn has_error(&self, path: FieldPath) -> bool {
        self.slots.contains_key(&path)
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&FieldPath, &Vec<String>)> {
        self.slots.iter()
    }

    /// Number of `set_fields` calls applied so far.
    pub fn batches(&self) -> usize {
        self.batches
    }
}

impl FieldErrorSink for ErrorLedger {
    fn displayed(&self) -> Vec<FieldPath> {
        self.slots.keys().copied().collect()
    }

    fn set_fields(&mut self, updates: Vec<FieldUpdate>) {
        self.batches += 1;
        for update in updates {
            match update.messages {
                Some(messages) => {
                    self.slots.insert(update.path, messages);
                }
                None => {
                    self.slots.remove(&update.path);
                }
            }
        }
    }
}

/// Inputs of one reconcile pass.
pub struct ReconcileInput<'a> {
    pub submitted: bool,
    /// The form has a password confirmation field.
    pub confirms_password: bool,
    pub values: &'a FormValues,
    pub memo: &'a RejectionMemo,
}

/// Run one reconcile pass over `errors` and push the result into `sink`.
///
/// `errors` is updated in place: resolved messages are stored on the error
/// and the synthetic `unconfirmed` error is added to it, so the next pass
/// starts from the same picture.
pub fn reconcile(errors: &mut FieldErrors, input: &ReconcileInput<'_>, sink: &mut impl FieldErrorSink) {
    if input.submitted
        && input.confirms_password
        && errors.contains(FieldName::Password)
        && !errors.contains(FieldName::PasswordConfirm)
    {
        errors.set(
            FieldName::PasswordConfirm,
            Some(FieldError::new(ErrorKind::Unconfirmed)),
        );
    }

    let mut fresh = Vec::new();
    for idx in errors.tags.keys() {
        fresh.push(FieldUpdate::show(
            FieldPath::Tag(*idx),
            vec![EMPTY_TAG_MESSAGE.to_string()],
        ));
    }
    for (name, error) in errors.fields.iter_mut() {
        if error.message.is_none() {
            error.message = clarify(*name, error.kind, input);
        }
        fresh.push(FieldUpdate::show(
            FieldPath::Field(*name),
            error.message.iter().cloned().collect(),
        ));
    }

    let stale = stale_slots(errors, sink);
    if !stale.is_empty() {
        sink.set_fields(stale);
    }
    sink.set_fields(fresh);
}

fn clarify(field: FieldName, kind: ErrorKind, input: &ReconcileInput<'_>) -> Option<String> {
    if kind == ErrorKind::ServerResponse {
        return input
            .memo
            .lookup(field, input.values.get(field))
            .map(str::to_string);
    }
    message_for(field, kind).map(str::to_string)
}

/// Displayed slots that no longer have a cause.
///
/// A tag slot is cleared unless its current error is `required`; a named
/// slot is cleared once its field has no error at all.
fn stale_slots(errors: &FieldErrors, sink: &impl FieldErrorSink) -> Vec<FieldUpdate> {
    sink.displayed()
        .into_iter()
        .filter(|path| match path {
            FieldPath::Tag(idx) => errors.tag(*idx).map(|e| e.kind) != Some(ErrorKind::Required),
            FieldPath::Field(name) => !errors.contains(*name),
        })
        .map(FieldUpdate::clear)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(errors: &mut FieldErrors, submitted: bool, values: &FormValues, memo: &RejectionMemo, ledger: &mut ErrorLedger) {
        let input = ReconcileInput {
            submitted,
            confirms_password: true,
            values,
            memo,
        };
        reconcile(errors, &input, ledger);
    }

    #[test]
    fn test_static_messages_filled_in() {
        let mut errors = FieldErrors::default();
        errors.set(FieldName::Username, Some(FieldError::new(ErrorKind::MinLength)));
        let mut ledger = ErrorLedger::default();

        run(&mut errors, false, &FormValues::default(), &RejectionMemo::default(), &mut ledger);

        assert_eq!(
            ledger.message(FieldName::Username),
            Some("Username needs to be at least 3 characters")
        );
        assert_eq!(
            errors.get(FieldName::Username).unwrap().message.as_deref(),
            Some("Username needs to be at least 3 characters")
        );
    }

    #[test]
    fn test_server_response_reads_memo_by_current_value() {
        let mut values = FormValues::default();
        values.set(FieldName::Email, "taken@example.com");
        let mut memo = RejectionMemo::default();
        memo.record(FieldName::Email, "taken@example.com", "is already taken.");
        let mut errors = FieldErrors::default();
        errors.set(FieldName::Email, Some(FieldError::new(ErrorKind::ServerResponse)));
        let mut ledger = ErrorLedger::default();

        run(&mut errors, true, &values, &memo, &mut ledger);

        assert_eq!(ledger.message(FieldName::Email), Some("is already taken."));
    }

    #[test]
    fn test_unconfirmed_only_after_submit() {
        let mut errors = FieldErrors::default();
        errors.set(FieldName::Password, Some(FieldError::new(ErrorKind::MinLength)));
        let mut ledger = ErrorLedger::default();

        run(&mut errors, false, &FormValues::default(), &RejectionMemo::default(), &mut ledger);
        assert!(!ledger.has_error(FieldPath::Field(FieldName::PasswordConfirm)));

        run(&mut errors, true, &FormValues::default(), &RejectionMemo::default(), &mut ledger);
        assert_eq!(
            ledger.message(FieldName::PasswordConfirm),
            Some("Password confirmation required")
        );
    }

    #[test]
    fn test_no_unconfirmed_without_confirm_field() {
        let mut errors = FieldErrors::default();
        errors.set(FieldName::Password, Some(FieldError::new(ErrorKind::MinLength)));
        let mut ledger = ErrorLedger::default();
        let values = FormValues::default();
        let memo = RejectionMemo::default();
        let input = ReconcileInput {
            submitted: true,
            confirms_password: false,
            values: &values,
            memo: &memo,
        };

        reconcile(&mut errors, &input, &mut ledger);

        assert!(!errors.contains(FieldName::PasswordConfirm));
        assert!(!ledger.has_error(FieldPath::Field(FieldName::PasswordConfirm)));
    }

    #[test]
    fn test_existing_confirm_error_not_overwritten() {
        let mut errors = FieldErrors::default();
        errors.set(FieldName::Password, Some(FieldError::new(ErrorKind::MinLength)));
        errors.set(
            FieldName::PasswordConfirm,
            Some(FieldError::new(ErrorKind::ValidatePassword)),
        );
        let mut ledger = ErrorLedger::default();

        run(&mut errors, true, &FormValues::default(), &RejectionMemo::default(), &mut ledger);
        assert_eq!(ledger.message(FieldName::PasswordConfirm), Some("Passwords must match"));
    }

    #[test]
    fn test_resolved_field_is_cleared() {
        let mut errors = FieldErrors::default();
        errors.set(
            FieldName::Title,
            Some(FieldError::with_message(ErrorKind::Required, "This field is required")),
        );
        let mut ledger = ErrorLedger::default();
        run(&mut errors, true, &FormValues::default(), &RejectionMemo::default(), &mut ledger);
        assert!(ledger.has_error(FieldPath::Field(FieldName::Title)));

        errors.set(FieldName::Title, None);
        run(&mut errors, true, &FormValues::default(), &RejectionMemo::default(), &mut ledger);
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_rerun_is_idempotent() {
        let mut errors = FieldErrors::default();
        errors.set(FieldName::Email, Some(FieldError::new(ErrorKind::Pattern)));
        errors.set_tag(1, Some(FieldError::new(ErrorKind::Required)));
        let mut ledger = ErrorLedger::default();

        run(&mut errors, true, &FormValues::default(), &RejectionMemo::default(), &mut ledger);
        let first = ledger.clone();
        run(&mut errors, true, &FormValues::default(), &RejectionMemo::default(), &mut ledger);

        assert_eq!(
            first.iter().collect::<Vec<_>>(),
            ledger.iter().collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_stale_non_required_tag_cleared_required_kept() {
        let mut errors = FieldErrors::default();
        errors.set_tag(0, Some(FieldError::new(ErrorKind::Required)));
        errors.set_tag(2, Some(FieldError::new(ErrorKind::Pattern)));
        let mut ledger = ErrorLedger::default();
        run(&mut errors, true, &FormValues::default(), &RejectionMemo::default(), &mut ledger);
        assert!(ledger.has_error(FieldPath::Tag(0)));
        assert_eq!(
            ledger.messages(FieldPath::Tag(2)),
            Some(&[EMPTY_TAG_MESSAGE.to_string()][..])
        );

        errors.set_tag(2, None);
        run(&mut errors, true, &FormValues::default(), &RejectionMemo::default(), &mut ledger);

        assert!(ledger.has_error(FieldPath::Tag(0)));
        assert!(!ledger.has_error(FieldPath::Tag(2)));
    }
}
