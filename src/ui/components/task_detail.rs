//! Task detail page
//!
//! Shows a task's metadata, a map when it has a location, and its sessions.
//! Volunteers get a [`SessionSelector`] to sign up; administrators see the
//! sessions read-only.

use crossterm::event::KeyEvent;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Wrap},
    Frame,
};

use super::map_view::MapView;
use super::session_card::SessionCard;
use super::session_selector::SessionSelector;
use crate::constants::{DEFAULT_MAP_ZOOM, WELCOME_LOADING};
use crate::entities::Task;
use crate::ui::core::{Action, Component, Notice, Operation, Outcome};
use crate::utils::datetime::format_display_datetime;

pub struct TaskDetail {
    task_id: String,
    volunteer_id: Option<String>,
    task: Option<Task>,
    selector: Option<SessionSelector>,
    map_zoom: u8,
    loading: bool,
    error: Option<String>,
}

impl TaskDetail {
    /// `volunteer_id` enables session sign-up
    pub fn new(task_id: impl Into<String>, volunteer_id: Option<String>) -> Self {
        Self {
            task_id: task_id.into(),
            volunteer_id,
            task: None,
            selector: None,
            map_zoom: DEFAULT_MAP_ZOOM,
            loading: true,
            error: None,
        }
    }

    pub fn with_map_zoom(mut self, zoom: u8) -> Self {
        self.map_zoom = zoom;
        self
    }

    pub fn load_request(&self) -> Operation {
        Operation::LoadTask {
            task_id: self.task_id.clone(),
        }
    }

    pub fn task(&self) -> Option<&Task> {
        self.task.as_ref()
    }

    pub fn selector(&self) -> Option<&SessionSelector> {
        self.selector.as_ref()
    }

    pub fn selector_mut(&mut self) -> Option<&mut SessionSelector> {
        self.selector.as_mut()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Show `task`. Returns the assignment read to issue, if sign-up is enabled.
    pub fn set_task(&mut self, task: Task) -> Option<Operation> {
        self.loading = false;
        self.error = None;
        self.selector = match &self.volunteer_id {
            Some(volunteer_id) if !task.sessions.is_empty() => Some(SessionSelector::new(
                task.id.clone(),
                volunteer_id.clone(),
                task.sessions.clone(),
            )),
            _ => None,
        };
        let fetch = self.selector.as_ref().map(SessionSelector::fetch_request);
        self.task = Some(task);
        fetch
    }

    /// Map centred on the task location, when it has one
    pub fn map_view(&self) -> Option<MapView> {
        let task = self.task.as_ref()?;
        if !task.has_location() {
            return None;
        }
        task.location_point
            .map(|point| MapView::centered_on(point).with_zoom(self.map_zoom))
    }

    /// The metadata lines, in display order
    pub fn detail_lines(&self) -> Vec<String> {
        let Some(task) = &self.task else {
            return Vec::new();
        };

        let mut lines = vec![task.name.clone(), task.description.clone()];
        if !task.requirements.is_empty() {
            lines.push(format!("Requirements: {}", task.requirements.join(", ")));
        }
        let when = |value: Option<chrono::NaiveDateTime>| value.map(format_display_datetime).unwrap_or_default();
        lines.push(format!("Start Date: {}", when(task.start_datetime)));
        lines.push(format!("End Date: {}", when(task.end_datetime)));
        if task.has_location() {
            lines.push(format!("Location: {}", task.location));
        }
        lines
    }

    fn render_details(&self, f: &mut Frame, area: Rect) {
        let lines: Vec<Line> = self
            .detail_lines()
            .into_iter()
            .enumerate()
            .map(|(i, text)| {
                if i == 0 {
                    Line::from(Span::styled(
                        text,
                        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
                    ))
                } else {
                    Line::from(text)
                }
            })
            .collect();

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .title(" Task ");
        f.render_widget(Paragraph::new(lines).block(block).wrap(Wrap { trim: true }), area);
    }

    fn render_sessions(&mut self, f: &mut Frame, area: Rect) {
        if let Some(selector) = self.selector.as_mut() {
            selector.render(f, area);
            return;
        }
        let Some(task) = &self.task else {
            return;
        };
        let lines: Vec<Line> = task
            .sessions
            .iter()
            .flat_map(|session| SessionCard::new(session).lines())
            .collect();
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .title(" Sessions ");
        f.render_widget(Paragraph::new(lines).block(block), area);
    }
}

impl Component for TaskDetail {
    fn handle_key_events(&mut self, key: KeyEvent) -> Action {
        match self.selector.as_mut() {
            Some(selector) => selector.handle_key_events(key),
            None => Action::None,
        }
    }

    fn update(&mut self, action: Action) -> Action {
        match action {
            Action::Completed {
                outcome: Outcome::TaskLoaded(result),
                ..
            } => match result {
                Ok(Some(task)) => match self.set_task(task) {
                    Some(fetch) => Action::Request(fetch),
                    None => Action::None,
                },
                Ok(None) => {
                    self.loading = false;
                    self.error = Some(format!("Task {} not found", self.task_id));
                    Action::None
                }
                Err(e) => {
                    self.loading = false;
                    log::error!("Failed to load task {}: {}", self.task_id, e);
                    self.error = Some(e.to_string());
                    Action::Notify(Notice::Error(e.to_string()))
                }
            },
            other => match self.selector.as_mut() {
                Some(selector) => selector.update(other),
                None => other,
            },
        }
    }

    fn render(&mut self, f: &mut Frame, rect: Rect) {
        if self.task.is_none() {
            let text = match &self.error {
                Some(error) => Line::from(Span::styled(error.clone(), Style::default().fg(Color::Red))),
                None => Line::from(WELCOME_LOADING),
            };
            f.render_widget(Paragraph::new(text), rect);
            return;
        }

        let map = self.map_view();
        let has_sessions = self.task.as_ref().is_some_and(|t| !t.sessions.is_empty());

        let mut constraints = vec![Constraint::Min(7)];
        if map.is_some() {
            constraints.push(Constraint::Length(5));
        }
        if has_sessions {
            constraints.push(Constraint::Percentage(45));
        }
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints(constraints)
            .split(rect);

        self.render_details(f, chunks[0]);
        let mut next = 1;
        if let Some(map) = map {
            map.render(f, chunks[next]);
            next += 1;
        }
        if has_sessions {
            self.render_sessions(f, chunks[next]);
        }
    }
}
