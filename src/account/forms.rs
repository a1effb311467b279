//! Sign-up, sign-in and profile forms.

use std::sync::Arc;

use crate::api::{LoginRequest, NewUser, UserUpdate};
use crate::config::Credentials;
use crate::validation::{
    email_pattern, http_url_pattern, Check, FieldName, FieldRules, Form, FormSchema, FormValues,
    ImageProbe,
};

pub const USERNAME_MAX_LENGTH: usize = 20;
pub const PASSWORD_MAX_LENGTH: usize = 40;

fn username_rules() -> FieldRules {
    FieldRules::new()
        .required()
        .min_length(3)
        .max_length(USERNAME_MAX_LENGTH)
        .check(Check::NotRejected)
}

fn email_rules() -> FieldRules {
    FieldRules::new()
        .required()
        .pattern(email_pattern())
        .check(Check::NotRejected)
}

pub fn sign_up_schema() -> FormSchema {
    FormSchema::new()
        .field(FieldName::Username, username_rules())
        .field(FieldName::Email, email_rules())
        .field(
            FieldName::Password,
            FieldRules::new()
                .required()
                .min_length(6)
                .max_length(PASSWORD_MAX_LENGTH),
        )
        .field(
            FieldName::PasswordConfirm,
            FieldRules::new().check(Check::MatchesPassword),
        )
}

pub fn sign_in_schema() -> FormSchema {
    FormSchema::new()
        .field(
            FieldName::Email,
            FieldRules::new().required().pattern(email_pattern()),
        )
        .field(
            FieldName::Password,
            FieldRules::new().required().max_length(PASSWORD_MAX_LENGTH),
        )
}

pub fn profile_schema() -> FormSchema {
    FormSchema::new()
        .field(FieldName::Username, username_rules())
        .field(FieldName::Email, email_rules())
        .field(
            FieldName::Password,
            FieldRules::new().min_length(6).max_length(PASSWORD_MAX_LENGTH),
        )
        .field(
            FieldName::Image,
            FieldRules::new()
                .pattern(http_url_pattern())
                .check(Check::ImageLoads),
        )
}

/// Account creation form.
pub struct SignUpForm {
    pub form: Form,
    /// Consent to personal data processing; submit is disabled without it.
    pub agreed: bool,
}

impl SignUpForm {
    pub fn new() -> Self {
        Self {
            form: Form::new(sign_up_schema()),
            agreed: true,
        }
    }

    pub fn can_submit(&self) -> bool {
        self.agreed && self.form.can_submit()
    }

    pub(crate) fn request(values: &FormValues) -> NewUser {
        NewUser {
            username: values.get(FieldName::Username).to_string(),
            email: values.get(FieldName::Email).to_string(),
            password: values.get(FieldName::Password).to_string(),
        }
    }
}

impl Default for SignUpForm {
    fn default() -> Self {
        Self::new()
    }
}

pub struct SignInForm {
    pub form: Form,
}

impl SignInForm {
    pub fn new() -> Self {
        Self {
            form: Form::new(sign_in_schema()),
        }
    }

    pub(crate) fn request(values: &FormValues) -> LoginRequest {
        LoginRequest {
            email: values.get(FieldName::Email).to_string(),
            password: values.get(FieldName::Password).to_string(),
        }
    }
}

impl Default for SignInForm {
    fn default() -> Self {
        Self::new()
    }
}

/// Profile editor, prefilled from the current credentials.
pub struct ProfileForm {
    pub form: Form,
}

impl ProfileForm {
    pub fn new(credentials: &Credentials, probe: Arc<dyn ImageProbe>) -> Self {
        let mut values = FormValues::default();
        let prefill = [
            (FieldName::Username, &credentials.username),
            (FieldName::Email, &credentials.email),
            (FieldName::Image, &credentials.image),
        ];
        for (field, value) in prefill {
            if let Some(value) = value {
                values.set(field, value.clone());
            }
        }

        Self {
            form: Form::new(profile_schema())
                .with_values(values)
                .with_image_probe(probe),
        }
    }

    /// Adopt an email that arrived after the form was opened.
    pub async fn sync_email(&mut self, email: &str) {
        if email.is_empty() || self.form.value(FieldName::Email) == email {
            return;
        }
        self.form.change(FieldName::Email, email).await;
        self.form.blur(FieldName::Email).await;
    }

    pub(crate) fn request(values: &FormValues) -> UserUpdate {
        let non_empty = |field: FieldName| {
            let value = values.get(field);
            (!value.is_empty()).then(|| value.to_string())
        };
        UserUpdate {
            username: values.get(FieldName::Username).to_string(),
            email: values.get(FieldName::Email).to_string(),
            password: non_empty(FieldName::Password),
            image: non_empty(FieldName::Image),
        }
    }
}
