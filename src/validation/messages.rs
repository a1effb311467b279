//! Static message table for rule failures.

use crate::validation::field::{ErrorKind, FieldName};

/// Message attached by the `required` rule itself.
pub const REQUIRED_MESSAGE: &str = "This field is required";

/// Fixed message for any failing tag input.
pub const EMPTY_TAG_MESSAGE: &str = "Shouldn't be empty";

/// Human-readable text for `kind` on `field`.
///
/// `serverResponse` never resolves here; its text lives in the rejection
/// memo keyed by the rejected value.
pub fn message_for(field: FieldName, kind: ErrorKind) -> Option<&'static str> {
    use ErrorKind::*;
    use FieldName::*;

    match (field, kind) {
        (Username, MinLength) => Some("Username needs to be at least 3 characters"),
        (Email, Pattern) => Some("Invalid email"),
        (Password, MinLength) => Some("Your password needs to be at least 6 characters"),
        (PasswordConfirm, ValidatePassword) => Some("Passwords must match"),
        (PasswordConfirm, Unconfirmed) => Some("Password confirmation required"),
        (Image, Pattern) => Some("Invalid URL"),
        (Image, CheckImgUrl) => Some("Image format or URL is invalid"),
        (_, Required) => Some(REQUIRED_MESSAGE),
        _ => None,
    }
}
