use crossterm::event::KeyCode;
use ratatui::{backend::TestBackend, Terminal};
use voluntrac::backends::{BackendError, IdentityProvider, User};
use voluntrac::constants::ROUTE_SEARCH_TASKS;
use voluntrac::router::{Access, Route};
use voluntrac::ui::app_component::SessionState;
use voluntrac::ui::components::NavRole;
use voluntrac::ui::core::{Action, Component, EventType, Notice, Outcome};
use voluntrac::ui::{AppComponent, Screen};

use crate::support::{admin_profile, context, ctrl, key, seeded, volunteer_profile, VOLUNTEER_EMAIL};

fn user(uid: &str, email: &str) -> User {
    User {
        uid: uid.to_string(),
        email: email.to_string(),
        last_sign_in: None,
    }
}

fn signed_in_volunteer(services: &voluntrac::backends::memory::InMemoryServices) -> AppComponent {
    let mut app = AppComponent::new(context(services));
    app.handle_app_action(Action::SignedIn {
        user: user("u1", VOLUNTEER_EMAIL),
        profile: Some(volunteer_profile()),
    });
    app
}

#[test]
fn test_session_access_levels() {
    assert_eq!(SessionState::default().access(), Access::Anonymous);

    let volunteer = SessionState {
        user: Some(user("u1", VOLUNTEER_EMAIL)),
        profile: None,
    };
    assert_eq!(volunteer.access(), Access::Volunteer);

    let admin = SessionState {
        user: Some(user("a1", "admin@example.com")),
        profile: Some(admin_profile()),
    };
    assert_eq!(admin.access(), Access::Admin);
}

#[tokio::test]
async fn test_starts_at_login_choice() {
    let services = seeded();
    let app = AppComponent::new(context(&services));

    assert_eq!(app.current_route(), &Route::LoginChoice);
    assert!(matches!(app.screen(), Screen::LoginChoice(_)));
    assert!(app.nav_bar().is_none());
    assert_eq!(app.view_token(), 1);
    assert!(!app.should_quit());
}

#[tokio::test]
async fn test_volunteer_sign_in_lands_on_search() {
    let services = seeded();
    let app = signed_in_volunteer(&services);

    assert_eq!(app.current_route(), &Route::SearchTasks);
    assert!(matches!(app.screen(), Screen::Search(_)));
    assert_eq!(app.nav_bar().map(|n| n.role()), Some(NavRole::Volunteer));
    assert_eq!(app.session().access(), Access::Volunteer);
    assert_eq!(app.view_token(), 2);
}

#[tokio::test]
async fn test_admin_sign_in_lands_on_manage_tasks() {
    let services = seeded();
    let mut app = AppComponent::new(context(&services));

    app.handle_app_action(Action::SignedIn {
        user: user("a1", "admin@example.com"),
        profile: Some(admin_profile()),
    });

    assert_eq!(app.current_route(), &Route::ManageTasks);
    assert!(matches!(app.screen(), Screen::TaskList(_)));
    assert_eq!(app.nav_bar().map(|n| n.role()), Some(NavRole::Admin));
}

#[tokio::test]
async fn test_stale_results_are_dropped() {
    let services = seeded();
    let mut app = AppComponent::new(context(&services));
    app.handle_app_action(Action::Navigate("/volunteerLogin".to_string()));
    assert_eq!(app.view_token(), 2);

    let outcome = Outcome::SignedIn(Ok((user("u1", VOLUNTEER_EMAIL), Some(volunteer_profile()))));

    // Issued by the login-choice view that is no longer mounted
    app.handle_app_action(Action::Completed {
        token: 1,
        outcome: outcome.clone(),
    });
    assert_eq!(app.current_route(), &Route::VolunteerLogin);
    assert!(app.session().user.is_none());

    app.handle_app_action(Action::Completed { token: 2, outcome });
    assert_eq!(app.current_route(), &Route::SearchTasks);
}

#[tokio::test]
async fn test_guard_applies_to_navigation() {
    let services = seeded();
    let mut app = signed_in_volunteer(&services);

    app.handle_app_action(Action::Navigate("/Admin/ManageTasks".to_string()));
    assert_eq!(app.current_route(), &Route::ForbiddenAccess);
    assert!(matches!(app.screen(), Screen::Placeholder(_)));

    app.handle_app_action(Action::Navigate("/nowhere".to_string()));
    assert!(matches!(app.current_route(), Route::NotFound { .. }));
}

#[tokio::test]
async fn test_escape_goes_back() {
    let services = seeded();
    let mut app = signed_in_volunteer(&services);
    app.handle_app_action(Action::Navigate("/ViewTask/t1".to_string()));
    assert!(matches!(app.screen(), Screen::Detail(_)));

    app.handle_event(EventType::Key(key(KeyCode::Esc)));
    assert_eq!(app.current_route(), &Route::SearchTasks);
}

#[tokio::test]
async fn test_failed_sign_out_still_returns_to_login_choice() {
    let services = seeded();
    let mut app = signed_in_volunteer(&services);

    app.handle_app_action(Action::LoggedOut(Err(BackendError::Unavailable("offline".to_string()))));

    assert_eq!(app.current_route(), &Route::LoginChoice);
    assert!(app.nav_bar().is_none());
    assert_eq!(app.session().access(), Access::Anonymous);
    assert!(app.notice().is_some_and(Notice::is_error));
}

#[tokio::test]
async fn test_logout_link_signs_out() {
    let services = seeded();
    services.identity.force_sign_in(VOLUNTEER_EMAIL);
    let mut app = signed_in_volunteer(&services);

    app.handle_event(EventType::Key(key(KeyCode::F(4))));
    // The search page's task load may report first
    loop {
        let action = app.next_background_action().await.unwrap();
        let logged_out = matches!(action, Action::LoggedOut(_));
        if logged_out {
            assert_eq!(action, Action::LoggedOut(Ok(())));
        }
        app.handle_app_action(action);
        if logged_out {
            break;
        }
    }

    assert_eq!(app.current_route(), &Route::LoginChoice);
    assert!(services.services().identity.current_user().is_none());
    assert!(app.notice().is_none());
}

#[tokio::test]
async fn test_provider_sign_out_is_noticed_on_tick() {
    let services = seeded();
    services.identity.force_sign_in(VOLUNTEER_EMAIL);
    let mut app = signed_in_volunteer(&services);

    services.identity.sign_out().await.unwrap();
    app.handle_event(EventType::Tick);

    assert_eq!(app.current_route(), &Route::LoginChoice);
    assert!(app.session().user.is_none());
}

#[tokio::test]
async fn test_global_keys() {
    let services = seeded();
    let mut app = AppComponent::new(context(&services));

    app.handle_event(EventType::Key(key(KeyCode::Char('G'))));
    // While logs are open other keys are swallowed
    app.handle_event(EventType::Key(key(KeyCode::Char('v'))));
    assert_eq!(app.current_route(), &Route::LoginChoice);
    app.handle_event(EventType::Key(key(KeyCode::Esc)));

    app.handle_event(EventType::Key(key(KeyCode::Char('v'))));
    assert_eq!(app.current_route(), &Route::VolunteerLogin);

    // Typing into the login form does not quit
    app.handle_event(EventType::Key(key(KeyCode::Char('q'))));
    assert!(!app.should_quit());

    app.handle_event(EventType::Key(ctrl('c')));
    assert!(app.should_quit());
}

#[tokio::test]
async fn test_notify_sets_notice_until_navigation() {
    let services = seeded();
    let mut app = signed_in_volunteer(&services);

    app.handle_app_action(Action::Notify(Notice::Info("Saved".to_string())));
    assert_eq!(app.notice(), Some(&Notice::Info("Saved".to_string())));

    app.handle_app_action(Action::Navigate(ROUTE_SEARCH_TASKS.to_string()));
    assert!(app.notice().is_none());
}

#[tokio::test]
async fn test_render_draws_nav_and_status() {
    let services = seeded();
    let mut app = signed_in_volunteer(&services);
    let mut terminal = Terminal::new(TestBackend::new(140, 30)).unwrap();

    terminal.draw(|f| app.render(f, f.area())).unwrap();

    let buffer = terminal.backend().buffer();
    let row = |y: u16| -> String { (0..140).map(|x| buffer[(x, y)].symbol()).collect() };
    assert!(row(0).contains("SEARCH OPPORTUNITIES"));
    assert!(row(29).contains("Working") || row(29).contains("SearchTasks"));

    app.shutdown();
}
