use crossterm::event::{KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::{backend::TestBackend, layout::Rect, Terminal};
use tokio::sync::mpsc;
use voluntrac::backends::geolocation::ConfiguredGeolocator;
use voluntrac::backends::memory::{InMemoryGeocoder, InMemoryIdentity, InMemoryServices, InMemoryStore};
use voluntrac::constants::{ERROR_INVALID_RADIUS, ERROR_LOCATION_FAILED, ERROR_LOCATION_REQUIRED};
use voluntrac::entities::GeoPoint;
use voluntrac::ui::components::{FilterCriteria, FilterError, TaskFilter};
use voluntrac::ui::core::{Component, Operation, Outcome};

const SINGAPORE: GeoPoint = GeoPoint {
    lat: 1.3521,
    lng: 103.8198,
};

fn services_at(geolocator: ConfiguredGeolocator) -> InMemoryServices {
    InMemoryServices::new(InMemoryIdentity::new(), InMemoryStore::new())
        .with_geolocator(geolocator)
        .with_geocoder(InMemoryGeocoder::new().with_place("Marina Bay Sands", GeoPoint::new(1.2834, 103.8607)))
}

#[tokio::test]
async fn test_device_location_filter_emits_one_event() {
    let services = services_at(ConfiguredGeolocator::fixed(SINGAPORE));
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut filter = TaskFilter::new(tx, 10.0);

    filter.request_device_location(&services.services()).await;
    assert_eq!(filter.location(), Some(SINGAPORE));
    assert!(!filter.is_locating());

    let criteria = filter.apply_filter(10.0, filter.location()).unwrap();

    let expected = FilterCriteria {
        radius_km: 10.0,
        location: SINGAPORE,
    };
    assert_eq!(criteria, expected);
    assert_eq!(rx.try_recv().unwrap(), expected);
    assert!(rx.try_recv().is_err());
}

#[test]
fn test_invalid_radius_emits_nothing() {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut filter = TaskFilter::new(tx, 10.0);

    for radius in [0.0, -3.0, f64::NAN] {
        assert_eq!(
            filter.apply_filter(radius, Some(SINGAPORE)),
            Err(FilterError::InvalidRadius)
        );
    }
    assert_eq!(filter.error_message(), Some(ERROR_INVALID_RADIUS));
    assert!(rx.try_recv().is_err());
}

#[test]
fn test_missing_location_emits_nothing() {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut filter = TaskFilter::new(tx, 10.0);

    assert_eq!(filter.apply(), Err(FilterError::LocationRequired));
    assert_eq!(filter.error_message(), Some(ERROR_LOCATION_REQUIRED));
    assert!(rx.try_recv().is_err());
}

#[test]
fn test_radius_text_is_parsed_on_apply() {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut filter = TaskFilter::new(tx, 10.0);
    assert_eq!(filter.radius_text(), "10");

    filter.set_radius_text("2.5");
    filter.set_location(SINGAPORE, None);
    filter.apply().unwrap();
    assert_eq!(rx.try_recv().unwrap().radius_km, 2.5);

    filter.set_radius_text("far");
    assert_eq!(filter.apply(), Err(FilterError::InvalidRadius));
}

#[tokio::test]
async fn test_denied_device_location_leaves_manual_entry() {
    let services = services_at(ConfiguredGeolocator::denied());
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut filter = TaskFilter::new(tx, 10.0);

    filter.request_device_location(&services.services()).await;
    assert!(filter.error_message().unwrap().starts_with(ERROR_LOCATION_FAILED));
    assert_eq!(filter.location(), None);

    filter.set_location_query("1.3521, 103.8198");
    assert_eq!(filter.resolve_manual_location(), None);
    assert_eq!(filter.location(), Some(SINGAPORE));

    filter.apply().unwrap();
    assert!(rx.try_recv().is_ok());
}

#[tokio::test]
async fn test_place_name_goes_through_geocoder() {
    let services = services_at(ConfiguredGeolocator::denied());
    let (tx, _rx) = mpsc::unbounded_channel();
    let mut filter = TaskFilter::new(tx, 10.0);

    filter.set_location_query("marina");
    let operation = filter.resolve_manual_location().unwrap();
    assert_eq!(
        operation,
        Operation::Geocode {
            query: "marina".to_string()
        }
    );

    let Outcome::Geocoded(result) = operation.run(&services.services()).await else {
        panic!("expected a geocode outcome");
    };
    filter.finish_geocode(result);
    assert_eq!(filter.suggestions().len(), 1);

    filter.choose_suggestion(0);
    assert_eq!(filter.location(), Some(GeoPoint::new(1.2834, 103.8607)));
    assert!(filter.suggestions().is_empty());
}

#[test]
fn test_empty_geocode_result_is_reported() {
    let (tx, _rx) = mpsc::unbounded_channel();
    let mut filter = TaskFilter::new(tx, 10.0);
    filter.set_location_query("Atlantis");

    filter.finish_geocode(Ok(Vec::new()));
    assert_eq!(filter.error_message(), Some("No places match 'Atlantis'"));
    assert_eq!(filter.location(), None);
}

#[test]
fn test_click_outside_dismisses_dropdown() {
    let (tx, _rx) = mpsc::unbounded_channel();
    let mut filter = TaskFilter::new(tx, 10.0);
    let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();

    filter.toggle_dropdown();
    terminal
        .draw(|f| filter.render(f, Rect::new(0, 0, 80, 24)))
        .unwrap();

    // Inside the dropdown: row 2 is below the header, column 5 is within 60 wide
    assert!(!filter.dismiss_outside(5, 2));
    assert!(filter.is_dropdown_open());

    assert!(filter.dismiss_outside(75, 20));
    assert!(!filter.is_dropdown_open());

    // Already closed
    assert!(!filter.dismiss_outside(75, 20));
}

#[test]
fn test_clicking_header_toggles_dropdown() {
    let (tx, _rx) = mpsc::unbounded_channel();
    let mut filter = TaskFilter::new(tx, 10.0);
    let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
    terminal
        .draw(|f| filter.render(f, Rect::new(0, 0, 80, 24)))
        .unwrap();

    let click = |column, row| MouseEvent {
        kind: MouseEventKind::Down(MouseButton::Left),
        column,
        row,
        modifiers: KeyModifiers::NONE,
    };

    // "Filter ▾" sits at the start of row 0
    filter.handle_mouse_events(click(3, 0));
    assert!(filter.is_dropdown_open());

    terminal
        .draw(|f| filter.render(f, Rect::new(0, 0, 80, 24)))
        .unwrap();
    filter.handle_mouse_events(click(0, 0));
    assert!(!filter.is_dropdown_open());

    // Past the label does nothing while closed
    filter.handle_mouse_events(click(30, 0));
    assert!(!filter.is_dropdown_open());
}

#[test]
fn test_successful_apply_closes_dropdown() {
    let (tx, _rx) = mpsc::unbounded_channel();
    let mut filter = TaskFilter::new(tx, 10.0);
    filter.toggle_dropdown();

    filter.apply_filter(5.0, Some(SINGAPORE)).unwrap();
    assert!(!filter.is_dropdown_open());
    assert_eq!(filter.error_message(), None);
}

#[test]
fn test_closed_sink_is_an_error() {
    let (tx, rx) = mpsc::unbounded_channel();
    drop(rx);
    let mut filter = TaskFilter::new(tx, 10.0);

    assert_eq!(filter.apply_filter(5.0, Some(SINGAPORE)), Err(FilterError::SinkClosed));
}
