use std::collections::BTreeMap;
use std::fmt;

/// Every input a form in this client can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FieldName {
    Username,
    Email,
    Password,
    PasswordConfirm,
    Image,
    Title,
    Description,
    Body,
    TagList,
}

impl FieldName {
    /// Form-level name. Matches the server's JSON keys where one exists.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Username => "username",
            Self::Email => "email",
            Self::Password => "password",
            Self::PasswordConfirm => "password-confirm",
            Self::Image => "image",
            Self::Title => "title",
            Self::Description => "description",
            Self::Body => "body",
            Self::TagList => "tagList",
        }
    }

    /// Inverse of [`FieldName::as_str`]. Unknown names return `None`.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "username" => Some(Self::Username),
            "email" => Some(Self::Email),
            "password" => Some(Self::Password),
            "password-confirm" => Some(Self::PasswordConfirm),
            "image" => Some(Self::Image),
            "title" => Some(Self::Title),
            "description" => Some(Self::Description),
            "body" => Some(Self::Body),
            "tagList" => Some(Self::TagList),
            _ => None,
        }
    }
}

impl fmt::Display for FieldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Address of one error slot in the rendering layer.
///
/// Tag inputs are a dynamic list, so their errors are tracked by index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FieldPath {
    Field(FieldName),
    Tag(usize),
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Field(name) => write!(f, "{}", name),
            Self::Tag(idx) => write!(f, "tagList.{}", idx),
        }
    }
}

/// Which rule a value failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Required,
    MinLength,
    Pattern,
    /// Confirmation differs from the primary password.
    ValidatePassword,
    /// Primary password failed after submit while the confirmation passed.
    Unconfirmed,
    /// Image URL did not load as an image.
    CheckImgUrl,
    /// The exact value was rejected by the server earlier.
    ServerResponse,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Required => "required",
            Self::MinLength => "minLength",
            Self::Pattern => "pattern",
            Self::ValidatePassword => "validatePassword",
            Self::Unconfirmed => "unconfirmed",
            Self::CheckImgUrl => "checkImgUrl",
            Self::ServerResponse => "serverResponse",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub kind: ErrorKind,
    /// Filled in by the rule itself or later by the reconciler.
    pub message: Option<String>,
}

impl FieldError {
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            message: None,
        }
    }

    pub fn with_message(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: Some(message.into()),
        }
    }
}

/// Output of the rule engine: at most one error per field or tag index.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FieldErrors {
    pub fields: BTreeMap<FieldName, FieldError>,
    pub tags: BTreeMap<usize, FieldError>,
}

impl FieldErrors {
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty() && self.tags.is_empty()
    }

    pub fn get(&self, field: FieldName) -> Option<&FieldError> {
        self.fields.get(&field)
    }

    pub fn contains(&self, field: FieldName) -> bool {
        self.fields.contains_key(&field)
    }

    pub fn tag(&self, idx: usize) -> Option<&FieldError> {
        self.tags.get(&idx)
    }

    pub fn set(&mut self, field: FieldName, error: Option<FieldError>) {
        match error {
            Some(error) => {
                self.fields.insert(field, error);
            }
            None => {
                self.fields.remove(&field);
            }
        }
    }

    pub fn set_tag(&mut self, idx: usize, error: Option<FieldError>) {
        match error {
            Some(error) => {
                self.tags.insert(idx, error);
            }
            None => {
                self.tags.remove(&idx);
            }
        }
    }

    pub fn clear(&mut self) {
        self.fields.clear();
        self.tags.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_name_round_trip_names() {
        for name in [
            FieldName::Username,
            FieldName::PasswordConfirm,
            FieldName::TagList,
        ] {
            assert_eq!(FieldName::parse(name.as_str()), Some(name));
        }
        assert_eq!(FieldName::parse("bio"), None);
    }

    #[test]
    fn test_tag_path_display() {
        assert_eq!(FieldPath::Tag(2).to_string(), "tagList.2");
        assert_eq!(
            FieldPath::Field(FieldName::PasswordConfirm).to_string(),
            "password-confirm"
        );
    }
}
