use voluntrac::ui::core::actions::{Action, Notice};

#[test]
fn test_notice_text_and_kind() {
    let info = Notice::Info("Saved".to_string());
    let error = Notice::Error("Failed".to_string());

    assert_eq!(info.text(), "Saved");
    assert!(!info.is_error());
    assert_eq!(error.text(), "Failed");
    assert!(error.is_error());
}

#[test]
fn test_actions_compare_by_value() {
    assert_eq!(Action::Navigate("/SearchTasks".to_string()), Action::Navigate("/SearchTasks".to_string()));
    assert_ne!(Action::Navigate("/SearchTasks".to_string()), Action::Back);
    assert_ne!(
        Action::Notify(Notice::Info("x".to_string())),
        Action::Notify(Notice::Error("x".to_string()))
    );
}
