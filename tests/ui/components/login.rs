use crossterm::event::KeyCode;
use voluntrac::backends::BackendError;
use voluntrac::constants::{ROUTE_ADMIN_LOGIN, ROUTE_ADMIN_MANAGE_TASKS, ROUTE_SEARCH_TASKS, ROUTE_VOLUNTEER_LOGIN};
use voluntrac::ui::components::{landing_route, LoginChoice, LoginForm, LoginKind};
use voluntrac::ui::core::{Action, Component, Operation, Outcome};

use crate::support::{admin_profile, key, seeded, volunteer_profile, ADMIN_EMAIL, PASSWORD, VOLUNTEER_EMAIL};

#[test]
fn test_landing_route_follows_profile_role() {
    assert_eq!(landing_route(Some(&admin_profile())), ROUTE_ADMIN_MANAGE_TASKS);
    assert_eq!(landing_route(Some(&volunteer_profile())), ROUTE_SEARCH_TASKS);
    assert_eq!(landing_route(None), ROUTE_SEARCH_TASKS);
}

#[test]
fn test_login_choice_keys() {
    let mut choice = LoginChoice::new();
    assert_eq!(
        choice.handle_key_events(key(KeyCode::Char('a'))),
        Action::Navigate(ROUTE_ADMIN_LOGIN.to_string())
    );
    assert_eq!(
        choice.handle_key_events(key(KeyCode::Enter)),
        Action::Navigate(ROUTE_VOLUNTEER_LOGIN.to_string())
    );

    choice.handle_key_events(key(KeyCode::Down));
    assert_eq!(choice.selected(), 1);
    assert_eq!(
        choice.handle_key_events(key(KeyCode::Enter)),
        Action::Navigate(ROUTE_ADMIN_LOGIN.to_string())
    );
}

#[test]
fn test_blank_credentials_are_not_sent() {
    let mut form = LoginForm::new(LoginKind::Volunteer);
    form.set_credentials("  ", "secret");

    assert_eq!(form.begin_sign_in(), None);
    assert_eq!(form.error(), Some("Enter your email and password"));
    assert!(!form.is_signing_in());
}

#[tokio::test]
async fn test_admin_sign_in_returns_profile() {
    let services = seeded();
    let mut form = LoginForm::new(LoginKind::Admin);
    form.set_credentials(ADMIN_EMAIL, PASSWORD);

    let operation = form.begin_sign_in().unwrap();
    assert!(form.is_signing_in());
    assert_eq!(form.begin_sign_in(), None);

    let Outcome::SignedIn(result) = operation.run(&services.services()).await else {
        panic!("expected a sign-in outcome");
    };
    match form.finish_sign_in(result) {
        Action::SignedIn { user, profile } => {
            assert_eq!(user.uid, "a1");
            assert!(user.last_sign_in.is_some());
            assert_eq!(landing_route(profile.as_ref()), ROUTE_ADMIN_MANAGE_TASKS);
        }
        other => panic!("unexpected action {:?}", other),
    }
    assert!(!form.is_signing_in());
}

#[tokio::test]
async fn test_wrong_password_reports_error() {
    let services = seeded();
    let mut form = LoginForm::new(LoginKind::Volunteer);
    form.set_credentials(VOLUNTEER_EMAIL, "nope");

    let operation = form.begin_sign_in().unwrap();
    assert_eq!(
        operation,
        Operation::SignIn {
            email: VOLUNTEER_EMAIL.to_string(),
            password: "nope".to_string()
        }
    );
    let Outcome::SignedIn(result) = operation.run(&services.services()).await else {
        panic!("expected a sign-in outcome");
    };

    assert_eq!(form.finish_sign_in(result), Action::None);
    assert_eq!(form.error(), Some(BackendError::InvalidCredential.to_string().as_str()));
}

#[test]
fn test_escape_goes_back() {
    let mut form = LoginForm::new(LoginKind::Admin);
    assert_eq!(form.kind(), LoginKind::Admin);
    assert_eq!(form.handle_key_events(key(KeyCode::Esc)), Action::Back);
}
