use voluntrac::backends::IdentityProvider;
use voluntrac::ui::components::WelcomeBanner;
use voluntrac::ui::core::Component;

use crate::support::{render_text, seeded, PASSWORD, VOLUNTEER_EMAIL};

#[test]
fn test_greeting_waits_for_user_and_username() {
    let services = seeded();
    let mut banner = WelcomeBanner::new(services.identity.subscribe());

    assert_eq!(banner.greeting(), "Welcome, Loading...");
    assert_eq!(banner.last_login(), "Last login: No login record");

    // A username alone is not enough while nobody is signed in
    banner.set_username(Some("jdoe".to_string()));
    assert_eq!(banner.greeting(), "Welcome, Loading...");
}

#[tokio::test]
async fn test_sign_in_is_picked_up_by_poll() {
    let services = seeded();
    let mut banner = WelcomeBanner::new(services.identity.subscribe());
    banner.set_username(Some("jdoe".to_string()));

    services.identity.sign_in(VOLUNTEER_EMAIL, PASSWORD).await.unwrap();
    assert!(banner.poll());
    assert!(!banner.poll());

    assert_eq!(banner.greeting(), "Welcome, jdoe");
    assert!(banner.last_login().starts_with("Last login: "));
    assert_ne!(banner.last_login(), "Last login: No login record");

    let text = render_text(&mut banner, 60, 2);
    assert!(text.contains("Welcome, jdoe"));
}

#[tokio::test]
async fn test_sign_out_clears_username() {
    let services = seeded();
    services.identity.force_sign_in(VOLUNTEER_EMAIL);
    let mut banner = WelcomeBanner::new(services.identity.subscribe());
    banner.set_username(Some("jdoe".to_string()));
    assert_eq!(banner.greeting(), "Welcome, jdoe");

    services.identity.sign_out().await.unwrap();
    assert!(banner.poll());
    assert_eq!(banner.greeting(), "Welcome, Loading...");
}

#[test]
fn test_blank_username_counts_as_missing() {
    let services = seeded();
    services.identity.force_sign_in(VOLUNTEER_EMAIL);
    let mut banner = WelcomeBanner::new(services.identity.subscribe());

    banner.set_username(Some("   ".to_string()));
    assert_eq!(banner.greeting(), "Welcome, Loading...");
}

#[test]
fn test_teardown_cancels_subscription() {
    let services = seeded();
    let mut banner = WelcomeBanner::new(services.identity.subscribe());
    assert!(banner.is_subscribed());

    banner.teardown();
    assert!(!banner.is_subscribed());

    services.identity.force_sign_in(VOLUNTEER_EMAIL);
    assert!(!banner.poll());
    assert_eq!(banner.greeting(), "Welcome, Loading...");
}
