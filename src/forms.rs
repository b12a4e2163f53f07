//! Login and register form handling.
//!
//! SYSTEM CONTEXT
//! ==============
//! The front end collects form input, runs the validators here for inline
//! field messages, and submits through [`submit_login`]/[`submit_register`].
//! A successful exchange hands the returned credentials to
//! [`SessionManager::login`](crate::state::SessionManager::login); a failed
//! one is returned classified so the form can show the right message.

#[cfg(test)]
#[path = "forms_test.rs"]
mod forms_test;

use tracing::{error, info};

use crate::net::{ApiError, RecipeApi};
use crate::state::SharedSession;
use crate::storage::Storage;

pub const USERNAME_MIN_CHARS: usize = 3;
pub const PASSWORD_MIN_CHARS: usize = 8;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Field {
    Username,
    Password,
    PasswordConfirm,
}

/// First failing rule for one field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldError {
    pub field: Field,
    pub message: &'static str,
}

#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    #[error("invalid form input: {}", join_messages(.0))]
    Invalid(Vec<FieldError>),

    #[error(transparent)]
    Api(#[from] ApiError),
}

fn join_messages(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| e.message)
        .collect::<Vec<_>>()
        .join(" ")
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RegisterForm {
    pub username: String,
    pub password: String,
    pub password_confirm: String,
}

// =============================================================================
// VALIDATION
// =============================================================================

/// Username rules: required, letters/digits/underscore only, minimum length.
///
/// # Errors
///
/// Returns the message for the first rule that fails.
pub fn validate_username(raw: &str) -> Result<(), &'static str> {
    if raw.is_empty() {
        return Err("Please enter a username.");
    }
    if !raw.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err("Your username may only contain letters, numbers, and underscore.");
    }
    if raw.chars().count() < USERNAME_MIN_CHARS {
        return Err("Your username must be at least 3 characters");
    }
    Ok(())
}

/// Password rules: required, no whitespace, minimum length.
///
/// # Errors
///
/// Returns the message for the first rule that fails.
pub fn validate_password(raw: &str) -> Result<(), &'static str> {
    if raw.is_empty() {
        return Err("Please enter a password.");
    }
    if raw.chars().any(char::is_whitespace) {
        return Err("Your password may not contain whitespace");
    }
    if raw.chars().count() < PASSWORD_MIN_CHARS {
        return Err("Your password must be at least 8 characters");
    }
    Ok(())
}

/// # Errors
///
/// Returns the message when the confirmation is missing or differs.
pub fn validate_password_confirm(password: &str, confirm: &str) -> Result<(), &'static str> {
    if confirm.is_empty() {
        return Err("Password confirm is required");
    }
    if confirm != password {
        return Err("Passwords don't match");
    }
    Ok(())
}

fn collect(checks: &[(Field, Result<(), &'static str>)]) -> Result<(), Vec<FieldError>> {
    let errors: Vec<FieldError> = checks
        .iter()
        .filter_map(|(field, result)| result.err().map(|message| FieldError { field: *field, message }))
        .collect();
    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

impl LoginForm {
    /// # Errors
    ///
    /// Returns one error per invalid field, in field order.
    pub fn validate(&self) -> Result<(), Vec<FieldError>> {
        collect(&[
            (Field::Username, validate_username(&self.username)),
            (Field::Password, validate_password(&self.password)),
        ])
    }
}

impl RegisterForm {
    /// # Errors
    ///
    /// Returns one error per invalid field, in field order.
    pub fn validate(&self) -> Result<(), Vec<FieldError>> {
        collect(&[
            (Field::Username, validate_username(&self.username)),
            (Field::Password, validate_password(&self.password)),
            (
                Field::PasswordConfirm,
                validate_password_confirm(&self.password, &self.password_confirm),
            ),
        ])
    }
}

// =============================================================================
// SUBMISSION
// =============================================================================

/// Validate, call `/auth/login`, and start the session on success.
///
/// # Errors
///
/// Returns [`SubmitError::Invalid`] without calling the API when validation
/// fails, or [`SubmitError::Api`] when the exchange fails.
pub async fn submit_login<S, A>(session: &SharedSession<S>, api: &A, form: &LoginForm) -> Result<(), SubmitError>
where
    S: Storage,
    A: RecipeApi + ?Sized,
{
    form.validate().map_err(SubmitError::Invalid)?;
    let credentials = api
        .login(&form.username, &form.password)
        .await
        .inspect_err(log_auth_failure)?;
    info!(user_id = %credentials.user_id, "login accepted");
    session.borrow_mut().login(credentials, true);
    Ok(())
}

/// Validate, call `/auth/register`, and start the session on success.
///
/// # Errors
///
/// Returns [`SubmitError::Invalid`] without calling the API when validation
/// fails, or [`SubmitError::Api`] when the exchange fails.
pub async fn submit_register<S, A>(
    session: &SharedSession<S>,
    api: &A,
    form: &RegisterForm,
) -> Result<(), SubmitError>
where
    S: Storage,
    A: RecipeApi + ?Sized,
{
    form.validate().map_err(SubmitError::Invalid)?;
    let credentials = api
        .register(&form.username, &form.password)
        .await
        .inspect_err(log_auth_failure)?;
    info!(user_id = %credentials.user_id, "registration accepted");
    session.borrow_mut().login(credentials, true);
    Ok(())
}

fn log_auth_failure(e: &ApiError) {
    error!(error = %e, "{}", e.user_message());
}
