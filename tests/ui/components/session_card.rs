use voluntrac::entities::Session;
use voluntrac::ui::components::SessionCard;

fn text(card: &SessionCard) -> Vec<String> {
    card.lines()
        .iter()
        .map(|line| line.spans.iter().map(|span| span.content.as_ref()).collect())
        .collect()
}

#[test]
fn test_card_shows_date_and_time_range() {
    let session = Session::new("2024-11-09", "10:00 AM", "12:00 PM");
    let card = SessionCard::new(&session);

    assert_eq!(card.time_range(), "10:00 AM to 12:00 PM");
    assert_eq!(text(&card), vec!["[ ] 2024-11-09".to_string(), "    10:00 AM to 12:00 PM".to_string()]);
}

#[test]
fn test_selected_and_confirmed_markers() {
    let session = Session::new("2024-11-09", "1:00 PM", "3:00 PM");
    let mut card = SessionCard::new(&session);
    card.selected = true;
    card.confirmed = true;

    let lines = text(&card);
    assert!(lines[0].starts_with("[x] 2024-11-09"));
    assert!(lines[0].ends_with("✓ confirmed"));
}
