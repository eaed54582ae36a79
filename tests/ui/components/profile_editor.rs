use crossterm::event::KeyCode;
use voluntrac::backends::BackendError;
use voluntrac::constants::{COLLECTION_PROFILES, ERROR_EDITING_LOCKED, ERROR_PROFILE_NOT_LOADED, SUCCESS_PROFILE_SAVED};
use voluntrac::entities::Profile;
use voluntrac::ui::components::{ProfileEditor, ProfileError, ProfileField};
use voluntrac::ui::core::{Action, Component, Notice, Operation};

use crate::support::{key, seeded, ADMIN_EMAIL, PASSWORD, VOLUNTEER_EMAIL};

#[tokio::test]
async fn test_load_fills_fields() {
    let services = seeded();
    let mut editor = ProfileEditor::new("u1");

    editor.load(&services.services()).await;

    assert_eq!(editor.profile().map(|p| p.username.as_str()), Some("jdoe"));
    assert_eq!(editor.field(ProfileField::FullName), "Jane Doe");
    assert!(!editor.editing_enabled());
}

#[tokio::test]
async fn test_missing_profile_loads_empty_form() {
    let services = seeded();
    let mut editor = ProfileEditor::new("nobody");

    editor.load(&services.services()).await;

    assert!(editor.profile().is_none());
    assert_eq!(editor.field(ProfileField::FullName), "");
    assert!(editor.message().is_none());
}

#[tokio::test]
async fn test_rejected_reauthentication_keeps_editing_locked() {
    let services = seeded();
    services.identity.force_sign_in(VOLUNTEER_EMAIL);
    let mut editor = ProfileEditor::new("u1");
    editor.load(&services.services()).await;

    editor.request_edit();
    assert!(editor.is_prompting_password());

    let result = editor.re_authenticate(&services.services(), "wrong").await;
    assert!(matches!(result, Err(ProfileError::AuthenticationFailed(_))));
    assert!(!editor.editing_enabled());
    assert!(editor.is_prompting_password());
    assert!(!editor.set_field(ProfileField::Skills, "Cooking"));

    assert_eq!(editor.save(&services.services()).await, Err(ProfileError::EditingLocked));
    assert_eq!(
        editor.message(),
        Some(&Notice::Error(ERROR_EDITING_LOCKED.to_string()))
    );
    assert_eq!(services.store.write_count(), 0);
    assert_eq!(services.identity.re_auth_calls(), 1);
}

#[tokio::test]
async fn test_edit_save_merges_and_relocks() {
    let services = seeded();
    services.identity.force_sign_in(VOLUNTEER_EMAIL);
    let mut editor = ProfileEditor::new("u1");
    editor.load(&services.services()).await;

    editor.request_edit();
    editor.re_authenticate(&services.services(), PASSWORD).await.unwrap();
    assert!(editor.editing_enabled());
    assert!(!editor.is_prompting_password());

    assert!(editor.set_field(ProfileField::Skills, "First aid"));
    assert!(editor.set_field(ProfileField::Organisation, "Red Cross"));
    editor.save(&services.services()).await.unwrap();

    assert!(!editor.editing_enabled());
    assert_eq!(editor.message(), Some(&Notice::Info(SUCCESS_PROFILE_SAVED.to_string())));

    let stored = services.store.document(COLLECTION_PROFILES, "u1").unwrap();
    let stored = Profile::from_document(&stored).unwrap();
    assert_eq!(stored.skills, "First aid");
    assert_eq!(stored.organisation, "Red Cross");
    assert_eq!(stored.username, "jdoe");
    assert_eq!(stored.role, "User");
}

#[tokio::test]
async fn test_failed_write_keeps_editing_enabled() {
    let services = seeded();
    services.identity.force_sign_in(VOLUNTEER_EMAIL);
    let mut editor = ProfileEditor::new("u1");
    editor.load(&services.services()).await;
    editor.re_authenticate(&services.services(), PASSWORD).await.unwrap();

    services.store.set_fail_writes(true);
    assert!(matches!(
        editor.save(&services.services()).await,
        Err(ProfileError::Save(_))
    ));
    assert!(editor.editing_enabled());
}

#[tokio::test]
async fn test_failed_load_never_overwrites_stored_profile() {
    let services = seeded();
    services.identity.force_sign_in(ADMIN_EMAIL);
    let mut editor = ProfileEditor::new("a1");
    editor.finish_load(Err(BackendError::Unavailable("offline".to_string())));
    assert!(!editor.is_loaded());

    editor.request_edit();
    assert!(!editor.is_prompting_password());
    assert_eq!(editor.message(), Some(&Notice::Error(ERROR_PROFILE_NOT_LOADED.to_string())));

    // Even with editing unlocked, the write is refused
    editor.re_authenticate(&services.services(), PASSWORD).await.unwrap();
    assert_eq!(editor.save(&services.services()).await, Err(ProfileError::NotLoaded));
    assert_eq!(services.store.write_count(), 0);

    let stored = services.store.document(COLLECTION_PROFILES, "a1").unwrap();
    let stored = Profile::from_document(&stored).unwrap();
    assert_eq!(stored.role, "Admin");
    assert_eq!(stored.username, "boss");

    // Once a load succeeds the save merges into the stored profile
    editor.load(&services.services()).await;
    assert!(editor.is_loaded());
    assert!(editor.set_field(ProfileField::Skills, "Logistics"));
    editor.save(&services.services()).await.unwrap();

    let stored = Profile::from_document(&services.store.document(COLLECTION_PROFILES, "a1").unwrap()).unwrap();
    assert_eq!(stored.role, "Admin");
    assert_eq!(stored.skills, "Logistics");
}

#[test]
fn test_keys_follow_lock_state() {
    let mut editor = ProfileEditor::new("u1");
    editor.finish_load(Ok(None));

    assert_eq!(
        editor.handle_key_events(key(KeyCode::Enter)),
        Action::Notify(Notice::Error(ERROR_EDITING_LOCKED.to_string()))
    );

    editor.handle_key_events(key(KeyCode::Char('e')));
    assert!(editor.is_prompting_password());
    for c in "pw".chars() {
        editor.handle_key_events(key(KeyCode::Char(c)));
    }
    assert_eq!(
        editor.handle_key_events(key(KeyCode::Enter)),
        Action::Request(Operation::ReAuthenticate {
            password: "pw".to_string()
        })
    );

    editor.handle_key_events(key(KeyCode::Esc));
    assert!(!editor.is_prompting_password());
}
