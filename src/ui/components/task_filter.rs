//! Radius + location filter for the task search page
//!
//! The filter never touches the store. Applying it sends one
//! [`FilterCriteria`] down the sink it was built with; the listing on the
//! other end does the filtering.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent};
use ratatui::{
    layout::{Constraint, Direction, Layout, Position, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, List, ListItem, ListState, Paragraph},
    Frame,
};
use tokio::sync::mpsc::UnboundedSender;

use super::dialogs::common::{create_input_paragraph, create_instructions_paragraph, shortcuts};
use super::text_input::TextInput;
use crate::backends::{BackendResult, Place, Services};
use crate::constants::{ERROR_INVALID_RADIUS, ERROR_LOCATION_FAILED, ERROR_LOCATION_REQUIRED};
use crate::entities::GeoPoint;
use crate::ui::core::{Action, Component, Notice, Operation, Outcome};

/// What the listing should keep: tasks within `radius_km` of `location`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterCriteria {
    pub radius_km: f64,
    pub location: GeoPoint,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FilterError {
    #[error("{}", ERROR_INVALID_RADIUS)]
    InvalidRadius,

    #[error("{}", ERROR_LOCATION_REQUIRED)]
    LocationRequired,

    #[error("No task list is listening for filter changes")]
    SinkClosed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Radius,
    Location,
}

pub struct TaskFilter {
    sink: UnboundedSender<FilterCriteria>,
    radius: TextInput,
    location_query: TextInput,
    location: Option<GeoPoint>,
    location_label: Option<String>,
    suggestions: Vec<Place>,
    suggestion_state: ListState,
    focus: Field,
    dropdown_open: bool,
    dropdown_area: Option<Rect>,
    toggle_area: Option<Rect>,
    locating: bool,
    error_message: Option<String>,
}

impl TaskFilter {
    pub fn new(sink: UnboundedSender<FilterCriteria>, default_radius_km: f64) -> Self {
        Self {
            sink,
            radius: TextInput::new(default_radius_km.to_string()),
            location_query: TextInput::default(),
            location: None,
            location_label: None,
            suggestions: Vec::new(),
            suggestion_state: ListState::default(),
            focus: Field::Radius,
            dropdown_open: false,
            dropdown_area: None,
            toggle_area: None,
            locating: false,
            error_message: None,
        }
    }

    pub fn is_dropdown_open(&self) -> bool {
        self.dropdown_open
    }

    pub fn location(&self) -> Option<GeoPoint> {
        self.location
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    pub fn is_locating(&self) -> bool {
        self.locating
    }

    pub fn suggestions(&self) -> &[Place] {
        &self.suggestions
    }

    pub fn radius_text(&self) -> &str {
        self.radius.value()
    }

    pub fn set_radius_text(&mut self, text: &str) {
        self.radius.set(text);
    }

    pub fn set_location_query(&mut self, text: &str) {
        self.location_query.set(text);
    }

    /// Open the dropdown, or close it if already open
    pub fn toggle_dropdown(&mut self) {
        self.dropdown_open = !self.dropdown_open;
        if !self.dropdown_open {
            self.suggestions.clear();
        }
    }

    /// A click on the header label toggles the dropdown; any other click
    /// outside the open dropdown closes it. Returns whether the click was handled.
    pub fn click(&mut self, column: u16, row: u16) -> bool {
        let on_toggle = self
            .toggle_area
            .is_some_and(|area| area.contains(Position::new(column, row)));
        if on_toggle {
            self.toggle_dropdown();
            return true;
        }
        self.dismiss_outside(column, row)
    }

    /// Close the dropdown when a click lands outside it.
    /// Returns whether the click was outside.
    pub fn dismiss_outside(&mut self, column: u16, row: u16) -> bool {
        let inside = self
            .dropdown_area
            .is_some_and(|area| area.contains(Position::new(column, row)));
        if self.dropdown_open && !inside {
            self.dropdown_open = false;
            self.suggestions.clear();
            return true;
        }
        false
    }

    /// Use `point` as the filter centre
    pub fn set_location(&mut self, point: GeoPoint, label: Option<String>) {
        self.location = Some(point);
        self.location_label = label;
        self.error_message = None;
    }

    pub fn begin_device_location(&mut self) -> Operation {
        self.locating = true;
        self.error_message = None;
        Operation::LocateDevice
    }

    /// Failures are reported but leave manual entry usable
    pub fn finish_device_location(&mut self, result: BackendResult<GeoPoint>) {
        self.locating = false;
        match result {
            Ok(point) => {
                log::info!("Device location {}", point);
                self.location_query.set(format!("{},{}", point.lat, point.lng));
                self.set_location(point, Some("My location".to_string()));
            }
            Err(e) => {
                log::warn!("Device location unavailable: {}", e);
                self.error_message = Some(format!("{}: {}", ERROR_LOCATION_FAILED, e));
            }
        }
    }

    /// Ask the device for its position
    pub async fn request_device_location(&mut self, services: &Services) {
        let operation = self.begin_device_location();
        if let Outcome::DeviceLocated(result) = operation.run(services).await {
            self.finish_device_location(result);
        }
    }

    /// Resolve the manual location text.
    ///
    /// A `lat,lng` pair is used directly. Anything else needs the geocoder,
    /// in which case the lookup to run is returned.
    pub fn resolve_manual_location(&mut self) -> Option<Operation> {
        let query = self.location_query.value().trim().to_string();
        if query.is_empty() {
            self.error_message = Some(ERROR_LOCATION_REQUIRED.to_string());
            return None;
        }
        match GeoPoint::parse(&query) {
            Some(point) => {
                self.set_location(point, None);
                None
            }
            None => Some(Operation::Geocode { query }),
        }
    }

    pub fn finish_geocode(&mut self, result: BackendResult<Vec<Place>>) {
        match result {
            Ok(places) if places.is_empty() => {
                self.error_message = Some(format!("No places match '{}'", self.location_query.value()));
                self.suggestions.clear();
            }
            Ok(places) => {
                self.suggestions = places;
                self.suggestion_state.select(Some(0));
            }
            Err(e) => {
                log::warn!("Geocoding failed: {}", e);
                self.error_message = Some(e.to_string());
            }
        }
    }

    /// Pick suggestion `index` as the location
    pub fn choose_suggestion(&mut self, index: usize) {
        if let Some(place) = self.suggestions.get(index).cloned() {
            self.location_query.set(place.description.clone());
            self.set_location(place.point, Some(place.description));
            self.suggestions.clear();
        }
    }

    /// Validate and emit exactly one filter event
    pub fn apply_filter(&mut self, radius_km: f64, location: Option<GeoPoint>) -> Result<FilterCriteria, FilterError> {
        let result = validate(radius_km, location).and_then(|criteria| {
            self.sink.send(criteria).map_err(|_| FilterError::SinkClosed)?;
            Ok(criteria)
        });

        match &result {
            Ok(criteria) => {
                log::info!("Filter applied: {} km around {}", criteria.radius_km, criteria.location);
                self.error_message = None;
                self.dropdown_open = false;
            }
            Err(e) => self.error_message = Some(e.to_string()),
        }
        result
    }

    /// Apply using the radius text and current location
    pub fn apply(&mut self) -> Result<FilterCriteria, FilterError> {
        let radius = self.radius.value().trim().parse::<f64>().unwrap_or(f64::NAN);
        self.apply_filter(radius, self.location)
    }

    fn handle_suggestion_key(&mut self, key: KeyEvent) -> Option<Action> {
        if self.suggestions.is_empty() {
            return None;
        }
        let selected = self.suggestion_state.selected().unwrap_or(0);
        match key.code {
            KeyCode::Up => self.suggestion_state.select(Some(selected.saturating_sub(1))),
            KeyCode::Down => {
                self.suggestion_state
                    .select(Some((selected + 1).min(self.suggestions.len() - 1)));
            }
            KeyCode::Enter => self.choose_suggestion(selected),
            _ => return None,
        }
        Some(Action::None)
    }
}

fn validate(radius_km: f64, location: Option<GeoPoint>) -> Result<FilterCriteria, FilterError> {
    if !radius_km.is_finite() || radius_km <= 0.0 {
        return Err(FilterError::InvalidRadius);
    }
    let location = location.ok_or(FilterError::LocationRequired)?;
    Ok(FilterCriteria { radius_km, location })
}

impl Component for TaskFilter {
    fn handle_key_events(&mut self, key: KeyEvent) -> Action {
        if !self.dropdown_open {
            return match key.code {
                KeyCode::Char('f') | KeyCode::Char('/') => {
                    self.toggle_dropdown();
                    Action::None
                }
                _ => Action::None,
            };
        }

        if let Some(action) = self.handle_suggestion_key(key) {
            return action;
        }

        match key.code {
            KeyCode::Esc => {
                self.toggle_dropdown();
                Action::None
            }
            KeyCode::Tab | KeyCode::BackTab => {
                self.focus = match self.focus {
                    Field::Radius => Field::Location,
                    Field::Location => Field::Radius,
                };
                Action::None
            }
            KeyCode::Char('l') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                Action::Request(self.begin_device_location())
            }
            KeyCode::Enter if self.focus == Field::Location => match self.resolve_manual_location() {
                Some(operation) => Action::Request(operation),
                None => Action::None,
            },
            KeyCode::Enter => match self.apply() {
                Ok(_) => Action::None,
                Err(e) => Action::Notify(Notice::Error(e.to_string())),
            },
            _ => {
                match self.focus {
                    Field::Radius => self.radius.handle_key(key),
                    Field::Location => self.location_query.handle_key(key),
                };
                Action::None
            }
        }
    }

    fn handle_mouse_events(&mut self, mouse: MouseEvent) -> Action {
        self.click(mouse.column, mouse.row);
        Action::None
    }

    fn update(&mut self, action: Action) -> Action {
        match action {
            Action::Completed {
                outcome: Outcome::DeviceLocated(result),
                ..
            } => {
                self.finish_device_location(result);
                Action::None
            }
            Action::Completed {
                outcome: Outcome::Geocoded(result),
                ..
            } => {
                self.finish_geocode(result);
                Action::None
            }
            other => other,
        }
    }

    fn render(&mut self, f: &mut Frame, rect: Rect) {
        let toggle_label = if self.dropdown_open { "Filter ▴" } else { "Filter ▾" };
        self.toggle_area = Some(Rect {
            x: rect.x,
            y: rect.y,
            width: (toggle_label.chars().count() as u16).min(rect.width),
            height: rect.height.min(1),
        });
        let header = Line::from(vec![
            Span::styled(
                toggle_label,
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                match (&self.location_label, self.location) {
                    (Some(label), _) => format!("  near {}", label),
                    (None, Some(point)) => format!("  near {}", point),
                    _ => String::new(),
                },
                Style::default().fg(Color::Gray),
            ),
        ]);
        f.render_widget(Paragraph::new(header), Rect { height: 1, ..rect });

        if !self.dropdown_open {
            self.dropdown_area = None;
            return;
        }

        let height = if self.suggestions.is_empty() { 11 } else { 11 + self.suggestions.len() as u16 + 2 };
        let area = Rect {
            x: rect.x,
            y: rect.y + 1,
            width: rect.width.min(60),
            height: height.min(rect.height.saturating_sub(1)),
        };
        self.dropdown_area = Some(area);
        f.render_widget(Clear, area);
        f.render_widget(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(Color::Cyan)),
            area,
        );

        let inner = Rect {
            x: area.x + 1,
            y: area.y + 1,
            width: area.width.saturating_sub(2),
            height: area.height.saturating_sub(2),
        };
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Min(0),
                Constraint::Length(1),
                Constraint::Length(1),
            ])
            .split(inner);

        f.render_widget(
            create_input_paragraph(self.radius.display(), "Radius (km)", self.focus == Field::Radius),
            chunks[0],
        );
        f.render_widget(
            create_input_paragraph(
                self.location_query.display(),
                "Location (place or lat,lng)",
                self.focus == Field::Location,
            ),
            chunks[1],
        );

        if !self.suggestions.is_empty() {
            let items: Vec<ListItem> = self
                .suggestions
                .iter()
                .map(|place| ListItem::new(place.description.clone()))
                .collect();
            let list = List::new(items)
                .block(Block::default().borders(Borders::ALL).title(" Places "))
                .highlight_style(Style::default().fg(Color::Black).bg(Color::Cyan));
            f.render_stateful_widget(list, chunks[2], &mut self.suggestion_state);
        }

        let status = if self.locating {
            Span::styled("Locating...", Style::default().fg(Color::Yellow))
        } else if let Some(error) = &self.error_message {
            Span::styled(error.clone(), Style::default().fg(Color::Red))
        } else {
            Span::raw("")
        };
        f.render_widget(Paragraph::new(Line::from(status)), chunks[3]);

        f.render_widget(
            create_instructions_paragraph(&[
                shortcuts::TAB_NEXT,
                shortcuts::SEPARATOR,
                ("Ctrl+L", Color::Yellow, " My location"),
                shortcuts::SEPARATOR,
                ("Enter", Color::Green, " Apply"),
            ]),
            chunks[4],
        );
    }
}
