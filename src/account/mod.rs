//! Session lifecycle: restore, sign in, sign up, profile edit, sign out.

pub mod forms;

use thiserror::Error;

use crate::api::ApiError;
use crate::app::App;
use crate::config::Credentials;
use crate::store::StoreAction;
use crate::validation::Form;

pub use forms::{ProfileForm, SignInForm, SignUpForm};

/// Server field names a sign-up or profile 422 may mention.
const MEMOIZED_FIELDS: [&str; 2] = ["username", "email"];

#[derive(Debug, Error)]
pub enum AccountError {
    /// Login rejected; one `"<field> <message>"` line per server error
    #[error("Login error")]
    LoginRejected { messages: Vec<String> },

    #[error("An unknown error occured")]
    Unexpected(#[source] ApiError),

    #[error("Failed to complete request")]
    ProfileUpdate(#[source] ApiError),

    #[error("Not signed in")]
    NotSignedIn,
}

/// Result of submitting an account form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Local rules failed; the form's ledger says why.
    Invalid,
    /// The server rejected specific fields; they are now marked on the form.
    Rejected,
    /// Accepted; the store holds these credentials.
    Accepted(Credentials),
}

/// What startup learned about the cached session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionStatus {
    /// Nothing cached.
    Anonymous,
    /// The token is still valid.
    SignedIn(Credentials),
    /// The server refused the token; local credentials were dropped.
    SignedOut,
}

impl App {
    /// Re-validate cached credentials against `GET /user`.
    ///
    /// A 401 silently signs the viewer out. Other failures keep the cached
    /// credentials and are returned to the caller.
    pub async fn restore_session(&self) -> Result<SessionStatus, AccountError> {
        let Some(token) = self.token() else {
            return Ok(SessionStatus::Anonymous);
        };

        match self.api().current_user(&token).await {
            Ok(user) => {
                self.store()
                    .dispatch(StoreAction::CredentialsUpdate(user.credentials_patch()));
                let credentials = self.store().with_state(|s| s.credentials.clone());
                self.persist(&credentials);
                tracing::info!(username = %user.username, "Session restored");
                Ok(SessionStatus::SignedIn(credentials))
            }
            Err(ApiError::Unauthorized) => {
                tracing::info!("Cached token rejected, signing out");
                self.sign_out();
                Ok(SessionStatus::SignedOut)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Could not verify cached session");
                Err(AccountError::Unexpected(e))
            }
        }
    }

    pub async fn sign_in(&self, form: &mut SignInForm) -> Result<SubmitOutcome, AccountError> {
        let Some(values) = form.form.submit().await else {
            return Ok(SubmitOutcome::Invalid);
        };

        match self.api().login(&SignInForm::request(&values)).await {
            Ok(user) => {
                let credentials = user.credentials();
                self.store()
                    .dispatch(StoreAction::CredentialsNew(credentials.clone()));
                self.persist(&credentials);
                tracing::info!(username = %user.username, "Signed in");
                Ok(SubmitOutcome::Accepted(credentials))
            }
            Err(ApiError::Validation(errors)) => Err(AccountError::LoginRejected {
                messages: errors
                    .iter()
                    .map(|(field, message)| format!("{} {}", field, message))
                    .collect(),
            }),
            Err(e) => Err(AccountError::Unexpected(e)),
        }
    }

    /// Create an account.
    ///
    /// A 422 naming only `username`/`email` is memoized on the form; any
    /// other field in it is treated as an unexpected failure.
    pub async fn sign_up(&self, form: &mut SignUpForm) -> Result<SubmitOutcome, AccountError> {
        if !form.agreed {
            return Ok(SubmitOutcome::Invalid);
        }
        let Some(values) = form.form.submit().await else {
            return Ok(SubmitOutcome::Invalid);
        };

        match self.api().register(&SignUpForm::request(&values)).await {
            Ok(user) => {
                let credentials = user.credentials();
                self.store()
                    .dispatch(StoreAction::CredentialsNew(credentials.clone()));
                self.persist(&credentials);
                tracing::info!(username = %user.username, "Account created");
                Ok(SubmitOutcome::Accepted(credentials))
            }
            Err(ApiError::Validation(errors)) => {
                if errors.keys().any(|k| !MEMOIZED_FIELDS.contains(&k.as_str())) {
                    return Err(AccountError::Unexpected(ApiError::Validation(errors)));
                }
                form.form.record_rejections(&errors).await;
                Ok(SubmitOutcome::Rejected)
            }
            Err(e) => Err(AccountError::Unexpected(e)),
        }
    }

    /// Save profile edits.
    ///
    /// A 422 is shown on the form's fields; one naming a field the form does
    /// not have is returned as a failed request.
    pub async fn update_profile(&self, form: &mut ProfileForm) -> Result<SubmitOutcome, AccountError> {
        let token = self.token().ok_or(AccountError::NotSignedIn)?;
        let Some(values) = form.form.submit().await else {
            return Ok(SubmitOutcome::Invalid);
        };

        match self
            .api()
            .update_user(&ProfileForm::request(&values), &token)
            .await
        {
            Ok(user) => {
                self.store()
                    .dispatch(StoreAction::CredentialsUpdate(user.credentials_patch()));
                let credentials = self.store().with_state(|s| s.credentials.clone());
                self.persist(&credentials);
                tracing::info!(username = %user.username, "Profile updated");
                Ok(SubmitOutcome::Accepted(credentials))
            }
            Err(ApiError::Validation(errors)) => {
                if !form.form.record_rejections(&errors).await {
                    return Err(AccountError::ProfileUpdate(ApiError::Validation(errors)));
                }
                Ok(SubmitOutcome::Rejected)
            }
            Err(e) => Err(AccountError::ProfileUpdate(e)),
        }
    }

    /// Clear credentials everywhere.
    pub fn sign_out(&self) {
        self.store()
            .dispatch(StoreAction::CredentialsNew(Credentials::default()));
        self.forget();
    }

    /// Profile form prefilled from the store.
    pub fn profile_form(&self) -> ProfileForm {
        let credentials = self.store().with_state(|s| s.credentials.clone());
        let mut form = ProfileForm::new(&credentials, self.image_probe());
        form.form = self.sized_memo(form.form);
        form
    }

    pub fn sign_up_form(&self) -> SignUpForm {
        let mut form = SignUpForm::new();
        form.form = self.sized_memo(form.form);
        form
    }

    fn sized_memo(&self, form: Form) -> Form {
        form.with_memo_capacity(self.config().validation.rejection_memo_capacity)
    }
}
