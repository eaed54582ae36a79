use crossterm::event::{KeyCode, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::{backend::TestBackend, layout::Rect, Terminal};
use voluntrac::backends::BackendError;
use voluntrac::constants::{APP_TITLE, ROUTE_ADMIN_MANAGE_TASKS, ROUTE_SEARCH_TASKS, ROUTE_USER_PROFILE};
use voluntrac::router::{Access, Route, Router};
use voluntrac::ui::components::{NavBar, NavRole, NavTarget};
use voluntrac::ui::core::{Action, Component};

use crate::support::{key, seeded, VOLUNTEER_EMAIL};

#[test]
fn test_links_per_role() {
    let admin = NavBar::new(NavRole::Admin);
    let labels: Vec<&str> = admin.links().iter().map(|l| l.label).collect();
    assert_eq!(labels, ["MANAGE TASKS", "TAKE ATTENDANCE", "MY PROFILE", "LOG OUT"]);

    let volunteer = NavBar::new(NavRole::Volunteer);
    assert_eq!(volunteer.links()[1].target, NavTarget::Route(ROUTE_SEARCH_TASKS));
    assert_eq!(volunteer.links()[3].target, NavTarget::Logout);
}

#[test]
fn test_activate_maps_links_to_actions() {
    let nav = NavBar::new(NavRole::Volunteer);
    assert_eq!(nav.activate(2), Action::Navigate(ROUTE_USER_PROFILE.to_string()));
    assert_eq!(nav.activate(3), Action::Logout);
    assert_eq!(nav.activate(9), Action::None);
}

#[test]
fn test_function_keys_activate_links() {
    let mut nav = NavBar::new(NavRole::Admin);
    assert_eq!(
        nav.handle_key_events(key(KeyCode::F(1))),
        Action::Navigate(ROUTE_ADMIN_MANAGE_TASKS.to_string())
    );
    assert_eq!(nav.handle_key_events(key(KeyCode::F(4))), Action::Logout);
    assert_eq!(nav.handle_key_events(key(KeyCode::F(5))), Action::None);
}

#[test]
fn test_click_on_rendered_link() {
    let mut nav = NavBar::new(NavRole::Admin);
    let mut terminal = Terminal::new(TestBackend::new(120, 1)).unwrap();
    terminal.draw(|f| nav.render(f, Rect::new(0, 0, 120, 1))).unwrap();

    let first_link = format!(" {} ", APP_TITLE).chars().count() as u16 + 2;
    let click = MouseEvent {
        kind: MouseEventKind::Down(MouseButton::Left),
        column: first_link,
        row: 0,
        modifiers: KeyModifiers::NONE,
    };
    assert_eq!(
        nav.handle_mouse_events(click),
        Action::Navigate(ROUTE_ADMIN_MANAGE_TASKS.to_string())
    );

    let on_title = MouseEvent { column: 1, ..click };
    assert_eq!(nav.handle_mouse_events(on_title), Action::None);
}

#[tokio::test]
async fn test_logout_routes_to_entry() {
    let services = seeded();
    services.identity.force_sign_in(VOLUNTEER_EMAIL);
    let mut router = Router::new();
    router.set_access(Access::Volunteer);
    router.push(ROUTE_SEARCH_TASKS);

    NavBar::logout(&services.services(), &mut router).await.unwrap();

    assert_eq!(router.current(), &Route::LoginChoice);
    assert!(services.services().identity.current_user().is_none());
}

#[tokio::test]
async fn test_failed_logout_still_routes_to_entry() {
    let services = seeded();
    services.identity.force_sign_in(VOLUNTEER_EMAIL);
    services
        .identity
        .fail_sign_out(BackendError::Unavailable("offline".to_string()));
    let mut router = Router::new();
    router.set_access(Access::Volunteer);
    router.push(ROUTE_SEARCH_TASKS);

    let result = NavBar::logout(&services.services(), &mut router).await;

    assert!(result.is_err());
    assert_eq!(router.current(), &Route::LoginChoice);
}
