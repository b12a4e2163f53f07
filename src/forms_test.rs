use std::cell::RefCell;
use std::rc::Rc;

use super::*;
use crate::net::Credentials;
use crate::state::{SessionManager, USER_DATA_KEY};
use crate::storage::MemoryStorage;
use crate::test_support::FakeApi;

fn register_form(username: &str, password: &str, confirm: &str) -> RegisterForm {
    RegisterForm { username: username.to_owned(), password: password.to_owned(), password_confirm: confirm.to_owned() }
}

fn shared() -> SharedSession<MemoryStorage> {
    Rc::new(RefCell::new(SessionManager::new(MemoryStorage::new())))
}

// =============================================================================
// validate_username
// =============================================================================

#[test]
fn username_required() {
    assert_eq!(validate_username(""), Err("Please enter a username."));
}

#[test]
fn username_rejects_symbols_and_spaces() {
    let msg = "Your username may only contain letters, numbers, and underscore.";
    assert_eq!(validate_username("al ice"), Err(msg));
    assert_eq!(validate_username("alice!"), Err(msg));
    assert_eq!(validate_username("ålice"), Err(msg));
}

#[test]
fn username_min_length() {
    assert_eq!(validate_username("al"), Err("Your username must be at least 3 characters"));
    assert_eq!(validate_username("al_"), Ok(()));
    assert_eq!(validate_username("Alice_99"), Ok(()));
}

// =============================================================================
// validate_password
// =============================================================================

#[test]
fn password_required() {
    assert_eq!(validate_password(""), Err("Please enter a password."));
}

#[test]
fn password_rejects_whitespace() {
    assert_eq!(validate_password("hunter 22"), Err("Your password may not contain whitespace"));
    assert_eq!(validate_password("hunter22\t"), Err("Your password may not contain whitespace"));
}

#[test]
fn password_min_length() {
    assert_eq!(validate_password("short1"), Err("Your password must be at least 8 characters"));
    assert_eq!(validate_password("exactly8"), Ok(()));
}

// =============================================================================
// validate_password_confirm
// =============================================================================

#[test]
fn confirm_required_then_must_match() {
    assert_eq!(validate_password_confirm("hunter22", ""), Err("Password confirm is required"));
    assert_eq!(validate_password_confirm("hunter22", "hunter23"), Err("Passwords don't match"));
    assert_eq!(validate_password_confirm("hunter22", "hunter22"), Ok(()));
}

// =============================================================================
// form validation
// =============================================================================

#[test]
fn register_form_reports_each_invalid_field() {
    let errors = register_form("a", "pw", "").validate().unwrap_err();
    let fields: Vec<Field> = errors.iter().map(|e| e.field).collect();
    assert_eq!(fields, [Field::Username, Field::Password, Field::PasswordConfirm]);
}

#[test]
fn register_form_valid() {
    assert_eq!(register_form("alice", "hunter22", "hunter22").validate(), Ok(()));
}

#[test]
fn login_form_skips_confirmation() {
    let form = LoginForm { username: "alice".to_owned(), password: "hunter22".to_owned() };
    assert_eq!(form.validate(), Ok(()));
}

#[test]
fn invalid_error_display_lists_messages() {
    let err = SubmitError::Invalid(register_form("", "hunter22", "hunter22").validate().unwrap_err());
    assert_eq!(err.to_string(), "invalid form input: Please enter a username.");
}

// =============================================================================
// submission
// =============================================================================

#[tokio::test]
async fn submit_register_starts_persisted_session() {
    let session = shared();
    let api = FakeApi::new();
    submit_register(&session, &api, &register_form("alice", "hunter22", "hunter22"))
        .await
        .unwrap();

    assert_eq!(
        *api.auth_calls.borrow(),
        vec![("/auth/register", "alice".to_owned(), "hunter22".to_owned())]
    );
    let session = session.borrow();
    assert!(session.is_logged_in());
    assert_eq!(session.user_id(), Some("u1"));
    assert!(session.storage().contains(USER_DATA_KEY));
}

#[tokio::test]
async fn submit_login_uses_login_endpoint() {
    let session = shared();
    let api = FakeApi::new().with_auth(Ok(Credentials::new("u9", None, "t9")));
    let form = LoginForm { username: "alice".to_owned(), password: "hunter22".to_owned() };
    submit_login(&session, &api, &form).await.unwrap();

    assert_eq!(api.auth_calls.borrow()[0].0, "/auth/login");
    assert_eq!(session.borrow().user_id(), Some("u9"));
}

#[tokio::test]
async fn invalid_form_never_reaches_api() {
    let session = shared();
    let api = FakeApi::new();
    let err = submit_register(&session, &api, &register_form("alice", "hunter22", "nope"))
        .await
        .unwrap_err();

    assert!(matches!(err, SubmitError::Invalid(ref errors) if errors[0].field == Field::PasswordConfirm));
    assert!(api.auth_calls.borrow().is_empty());
    assert!(!session.borrow().is_logged_in());
}

#[tokio::test]
async fn rejected_credentials_leave_session_logged_out() {
    let session = shared();
    let api = FakeApi::new().with_auth(Err(ApiError::Unauthorized));
    let form = LoginForm { username: "alice".to_owned(), password: "wrongpass".to_owned() };
    let err = submit_login(&session, &api, &form).await.unwrap_err();

    assert!(matches!(err, SubmitError::Api(ApiError::Unauthorized)));
    assert!(!session.borrow().is_logged_in());
    assert_eq!(session.borrow().storage().write_count(), 0);
}
