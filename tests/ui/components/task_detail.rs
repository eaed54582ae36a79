use voluntrac::entities::GeoPoint;
use voluntrac::ui::components::TaskDetail;
use voluntrac::ui::core::{Action, Component, Operation, Outcome};

use crate::support::{beach_cleanup, render_text};

fn loaded(volunteer_id: Option<&str>) -> (TaskDetail, Option<Operation>) {
    let mut detail = TaskDetail::new("t1", volunteer_id.map(str::to_string)).with_map_zoom(15);
    let fetch = detail.set_task(beach_cleanup());
    (detail, fetch)
}

#[test]
fn test_detail_lines_in_display_order() {
    let (detail, _) = loaded(None);
    assert_eq!(
        detail.detail_lines(),
        vec![
            "Beach cleanup".to_string(),
            "Collect litter along the shore".to_string(),
            "Requirements: Gloves, Water bottle".to_string(),
            "Start Date: 9 Nov 2024, 10:00 AM".to_string(),
            "End Date: 9 Nov 2024, 12:00 PM".to_string(),
            "Location: East Coast Park".to_string(),
        ]
    );
}

#[test]
fn test_map_centres_on_task_location() {
    let (detail, _) = loaded(None);
    let map = detail.map_view().unwrap();
    assert_eq!(map.center, GeoPoint::new(1.3008, 103.9122));
    assert_eq!(map.marker, map.center);
    assert_eq!(map.zoom, 15);
}

#[test]
fn test_task_without_location_has_no_map() {
    let mut task = beach_cleanup();
    task.location.clear();
    let mut detail = TaskDetail::new("t1", None);
    detail.set_task(task);

    assert!(detail.map_view().is_none());
    assert!(!detail.detail_lines().iter().any(|l| l.starts_with("Location")));
}

#[test]
fn test_volunteer_gets_session_selector() {
    let (detail, fetch) = loaded(Some("u1"));
    assert_eq!(
        fetch,
        Some(Operation::LoadAssignment {
            task_id: "t1".to_string(),
            volunteer_id: "u1".to_string()
        })
    );
    assert_eq!(detail.selector().map(|s| s.sessions().len()), Some(1));

    let (admin_view, fetch) = loaded(None);
    assert!(fetch.is_none());
    assert!(admin_view.selector().is_none());
}

#[test]
fn test_missing_task_shows_error() {
    let mut detail = TaskDetail::new("gone", None);
    assert!(detail.is_loading());

    let action = detail.update(Action::Completed {
        token: 1,
        outcome: Outcome::TaskLoaded(Ok(None)),
    });

    assert_eq!(action, Action::None);
    assert!(!detail.is_loading());
    assert_eq!(detail.error(), Some("Task gone not found"));
    assert!(render_text(&mut detail, 40, 3).contains("Task gone not found"));
}

#[test]
fn test_render_shows_details_and_map() {
    let (mut detail, _) = loaded(None);
    let text = render_text(&mut detail, 100, 30);

    assert!(text.contains("Beach cleanup"));
    assert!(text.contains("Start Date: 9 Nov 2024, 10:00 AM"));
    assert!(text.contains("Zoom 15"));
    assert!(text.contains("10:00 AM"));
}
