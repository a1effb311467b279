//! Form validation and error-display reconciliation.

pub mod field;
pub mod form;
pub mod image;
pub mod memo;
pub mod messages;
pub mod reconciler;
pub mod rules;

pub use field::{ErrorKind, FieldError, FieldErrors, FieldName, FieldPath};
pub use form::{Form, FormValues, Target};
pub use image::{HttpImageProbe, ImageCheck, ImageProbe};
pub use memo::RejectionMemo;
pub use messages::{message_for, EMPTY_TAG_MESSAGE, REQUIRED_MESSAGE};
pub use reconciler::{reconcile, ErrorLedger, FieldErrorSink, FieldUpdate, ReconcileInput};
pub use rules::{email_pattern, http_url_pattern, Check, FieldRules, FormSchema, RuleContext};
