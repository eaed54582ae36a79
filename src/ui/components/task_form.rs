//! Administrator form for adding and editing tasks
//!
//! Start/end are entered as `YYYY-MM-DDTHH:MM` local time and stored as
//! timestamps. Sessions are a dynamic list of date/start/end rows.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};

use super::dialogs::common::{create_input_paragraph, create_instructions_paragraph, shortcuts};
use super::text_input::TextInput;
use crate::backends::{BackendError, BackendResult, Place, Services};
use crate::constants::{
    ERROR_SAVE_TASK_FAILED, ERROR_TASK_NOT_LOADED, ROUTE_ADMIN_MANAGE_TASKS, SUCCESS_TASK_SAVED, WELCOME_LOADING,
};
use crate::entities::{GeoPoint, Session, Task};
use crate::ui::core::{Action, Component, Notice, Operation, Outcome};
use crate::utils::datetime::{
    format_task_datetime, normalize_session_date, normalize_session_time, parse_task_datetime,
};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FormError {
    #[error("❌ Task name is required")]
    MissingName,

    #[error("❌ {0} must look like 2024-11-08T10:00")]
    InvalidDatetime(&'static str),

    #[error("❌ End date must not be before start date")]
    EndBeforeStart,

    #[error("❌ Session {} needs a date (YYYY-MM-DD) and start/end times", .0 + 1)]
    InvalidSession(usize),

    #[error("❌ The task is already being saved")]
    SaveInFlight,

    #[error("{}", ERROR_TASK_NOT_LOADED)]
    NotLoaded,

    #[error("{}", ERROR_SAVE_TASK_FAILED)]
    Save(BackendError),
}

/// Task-level form fields, in form order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskField {
    Name,
    StartDatetime,
    EndDatetime,
    Location,
    Description,
    Requirements,
}

impl TaskField {
    pub const ALL: [TaskField; 6] = [
        TaskField::Name,
        TaskField::StartDatetime,
        TaskField::EndDatetime,
        TaskField::Location,
        TaskField::Description,
        TaskField::Requirements,
    ];

    pub fn label(self) -> &'static str {
        match self {
            TaskField::Name => "Task Name",
            TaskField::StartDatetime => "Start Date & Time",
            TaskField::EndDatetime => "End Date & Time",
            TaskField::Location => "Location",
            TaskField::Description => "Description",
            TaskField::Requirements => "Requirements (comma separated)",
        }
    }
}

/// Column of a session row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionField {
    Date,
    StartTime,
    EndTime,
}

impl SessionField {
    const ALL: [SessionField; 3] = [SessionField::Date, SessionField::StartTime, SessionField::EndTime];

    pub fn label(self) -> &'static str {
        match self {
            SessionField::Date => "Date",
            SessionField::StartTime => "Start Time",
            SessionField::EndTime => "End Time",
        }
    }
}

#[derive(Debug, Clone, Default)]
struct SessionRow {
    inputs: [TextInput; 3],
}

impl SessionRow {
    fn from_session(session: &Session) -> Self {
        Self {
            inputs: [
                TextInput::new(session.date.clone()),
                TextInput::new(session.start_time.clone()),
                TextInput::new(session.end_time.clone()),
            ],
        }
    }

    fn value(&self, field: SessionField) -> &str {
        self.inputs[field as usize].value()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Focus {
    Task(TaskField),
    Session(usize, SessionField),
}

pub struct TaskForm {
    task_id: Option<String>,
    inputs: [TextInput; 6],
    location_point: Option<GeoPoint>,
    sessions: Vec<SessionRow>,
    focus: Focus,
    loading: bool,
    /// False in edit mode until the stored task has filled the form
    loaded: bool,
    saving: bool,
    message: Option<Notice>,
}

impl TaskForm {
    /// Empty form for a new task
    pub fn create() -> Self {
        Self {
            task_id: None,
            inputs: Default::default(),
            location_point: None,
            sessions: Vec::new(),
            focus: Focus::Task(TaskField::Name),
            loading: false,
            loaded: true,
            saving: false,
            message: None,
        }
    }

    /// Form for an existing task; load it with [`load_request`](Self::load_request)
    pub fn edit(task_id: impl Into<String>) -> Self {
        Self {
            task_id: Some(task_id.into()),
            loading: true,
            loaded: false,
            ..Self::create()
        }
    }

    pub fn is_edit(&self) -> bool {
        self.task_id.is_some()
    }

    pub fn load_request(&self) -> Option<Operation> {
        self.task_id
            .as_ref()
            .map(|task_id| Operation::LoadTask { task_id: task_id.clone() })
    }

    pub fn message(&self) -> Option<&Notice> {
        self.message.as_ref()
    }

    pub fn field(&self, field: TaskField) -> &str {
        self.inputs[field as usize].value()
    }

    pub fn set_field(&mut self, field: TaskField, value: &str) {
        self.inputs[field as usize].set(value);
        if field == TaskField::Location {
            self.location_point = None;
        }
    }

    pub fn location_point(&self) -> Option<GeoPoint> {
        self.location_point
    }

    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    pub fn session_field(&self, index: usize, field: SessionField) -> Option<&str> {
        self.sessions.get(index).map(|row| row.value(field))
    }

    pub fn set_session_field(&mut self, index: usize, field: SessionField, value: &str) {
        if let Some(row) = self.sessions.get_mut(index) {
            row.inputs[field as usize].set(value);
        }
    }

    /// Append an empty session row and focus it
    pub fn add_session(&mut self) -> usize {
        self.sessions.push(SessionRow::default());
        let index = self.sessions.len() - 1;
        self.focus = Focus::Session(index, SessionField::Date);
        index
    }

    pub fn remove_session(&mut self, index: usize) {
        if index < self.sessions.len() {
            self.sessions.remove(index);
            self.focus = match self.sessions.len() {
                0 => Focus::Task(TaskField::Requirements),
                n => Focus::Session(index.min(n - 1), SessionField::Date),
            };
        }
    }

    /// Fill the form from a stored task
    pub fn set_task(&mut self, task: &Task) {
        self.loading = false;
        self.loaded = true;
        self.inputs = [
            TextInput::new(task.name.clone()),
            TextInput::new(task.start_datetime.map(format_task_datetime).unwrap_or_default()),
            TextInput::new(task.end_datetime.map(format_task_datetime).unwrap_or_default()),
            TextInput::new(task.location.clone()),
            TextInput::new(task.description.clone()),
            TextInput::new(task.requirements.join(", ")),
        ];
        self.location_point = task.location_point;
        self.sessions = task.sessions.iter().map(SessionRow::from_session).collect();
    }

    /// Apply the edit-mode load. Until it succeeds the form cannot be saved.
    pub fn finish_load(&mut self, result: BackendResult<Option<Task>>) -> Action {
        self.loading = false;
        let message = match result {
            Ok(Some(task)) => {
                self.set_task(&task);
                return Action::None;
            }
            Ok(None) => format!("Task {} not found", self.task_id.clone().unwrap_or_default()),
            Err(e) => {
                log::error!("Failed to load task {:?}: {}", self.task_id, e);
                e.to_string()
            }
        };
        self.message = Some(Notice::Error(message.clone()));
        Action::Notify(Notice::Error(message))
    }

    /// Resolve the location text. `lat,lng` is used directly; anything else
    /// returns the geocoder lookup to run.
    pub fn resolve_location(&mut self) -> Option<Operation> {
        let query = self.field(TaskField::Location).trim().to_string();
        if query.is_empty() {
            self.location_point = None;
            return None;
        }
        match GeoPoint::parse(&query) {
            Some(point) => {
                self.location_point = Some(point);
                None
            }
            None => Some(Operation::Geocode { query }),
        }
    }

    /// Take the best geocoder match as the task location
    pub fn finish_geocode(&mut self, result: BackendResult<Vec<Place>>) {
        match result.map(|places| places.into_iter().next()) {
            Ok(Some(place)) => {
                self.inputs[TaskField::Location as usize].set(place.description);
                self.location_point = Some(place.point);
                self.message = None;
            }
            Ok(None) => {
                self.message = Some(Notice::Error(format!(
                    "No places match '{}'",
                    self.field(TaskField::Location)
                )));
            }
            Err(e) => {
                log::warn!("Geocoding failed: {}", e);
                self.message = Some(Notice::Error(e.to_string()));
            }
        }
    }

    /// Validate the form into a task
    pub fn build_task(&self) -> Result<Task, FormError> {
        let name = self.field(TaskField::Name).trim();
        if name.is_empty() {
            return Err(FormError::MissingName);
        }

        let start = optional_datetime(self.field(TaskField::StartDatetime), "Start date")?;
        let end = optional_datetime(self.field(TaskField::EndDatetime), "End date")?;
        if let (Some(start), Some(end)) = (start, end) {
            if end < start {
                return Err(FormError::EndBeforeStart);
            }
        }

        let sessions = self
            .sessions
            .iter()
            .enumerate()
            .map(|(i, row)| {
                let date = normalize_session_date(row.value(SessionField::Date));
                let start_time = normalize_session_time(row.value(SessionField::StartTime));
                let end_time = normalize_session_time(row.value(SessionField::EndTime));
                match (date, start_time, end_time) {
                    (Some(date), Some(start_time), Some(end_time)) => Ok(Session::new(date, start_time, end_time)),
                    _ => Err(FormError::InvalidSession(i)),
                }
            })
            .collect::<Result<Vec<_>, _>>()?;

        let location = self.field(TaskField::Location).trim().to_string();
        Ok(Task {
            id: self.task_id.clone().unwrap_or_default(),
            name: name.to_string(),
            start_datetime: start,
            end_datetime: end,
            location_point: if location.is_empty() { None } else { self.location_point },
            location,
            description: self.field(TaskField::Description).trim().to_string(),
            requirements: self
                .field(TaskField::Requirements)
                .split(',')
                .map(str::trim)
                .filter(|r| !r.is_empty())
                .map(str::to_string)
                .collect(),
            sessions,
        })
    }

    /// Validate and return the write to perform
    pub fn begin_save(&mut self) -> Result<Operation, FormError> {
        if self.saving {
            return Err(FormError::SaveInFlight);
        }
        // Saving an edit that never loaded would replace the stored task
        if !self.loaded {
            self.message = Some(Notice::Error(FormError::NotLoaded.to_string()));
            return Err(FormError::NotLoaded);
        }
        match self.build_task() {
            Ok(task) => {
                self.saving = true;
                self.message = None;
                Ok(Operation::SaveTask { task })
            }
            Err(e) => {
                self.message = Some(Notice::Error(e.to_string()));
                Err(e)
            }
        }
    }

    /// Apply the write result, returning the task id
    pub fn finish_save(&mut self, result: BackendResult<String>) -> Result<String, FormError> {
        self.saving = false;
        match result {
            Ok(id) => {
                log::info!("Saved task {}", id);
                self.task_id = Some(id.clone());
                self.message = Some(Notice::Info(SUCCESS_TASK_SAVED.to_string()));
                Ok(id)
            }
            Err(e) => {
                log::error!("Failed to save task: {}", e);
                let err = FormError::Save(e);
                self.message = Some(Notice::Error(err.to_string()));
                Err(err)
            }
        }
    }

    pub async fn save(&mut self, services: &Services) -> Result<String, FormError> {
        match self.begin_save()?.run(services).await {
            Outcome::TaskSaved(result) => self.finish_save(result),
            other => {
                log::error!("Unexpected outcome for task save: {:?}", other);
                Err(FormError::SaveInFlight)
            }
        }
    }

    fn focus_order(&self) -> Vec<Focus> {
        let mut order: Vec<Focus> = TaskField::ALL.iter().map(|f| Focus::Task(*f)).collect();
        for i in 0..self.sessions.len() {
            order.extend(SessionField::ALL.iter().map(|f| Focus::Session(i, *f)));
        }
        order
    }

    fn move_focus(&mut self, forward: bool) {
        let order = self.focus_order();
        let current = order.iter().position(|f| *f == self.focus).unwrap_or(0);
        let next = if forward {
            (current + 1) % order.len()
        } else {
            (current + order.len() - 1) % order.len()
        };
        self.focus = order[next];
    }

    fn focused_input(&mut self) -> Option<&mut TextInput> {
        match self.focus {
            Focus::Task(field) => Some(&mut self.inputs[field as usize]),
            Focus::Session(i, field) => self.sessions.get_mut(i).map(|row| &mut row.inputs[field as usize]),
        }
    }
}

fn optional_datetime(input: &str, label: &'static str) -> Result<Option<chrono::NaiveDateTime>, FormError> {
    if input.trim().is_empty() {
        return Ok(None);
    }
    parse_task_datetime(input)
        .map(Some)
        .map_err(|_| FormError::InvalidDatetime(label))
}

impl Component for TaskForm {
    fn handle_key_events(&mut self, key: KeyEvent) -> Action {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Tab | KeyCode::Down => {
                self.move_focus(true);
                Action::None
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.move_focus(false);
                Action::None
            }
            KeyCode::Char('n') if ctrl => {
                self.add_session();
                Action::None
            }
            KeyCode::Char('d') if ctrl => {
                if let Focus::Session(i, _) = self.focus {
                    self.remove_session(i);
                }
                Action::None
            }
            KeyCode::Char('s') if ctrl => match self.begin_save() {
                Ok(operation) => Action::Request(operation),
                Err(e) => Action::Notify(Notice::Error(e.to_string())),
            },
            KeyCode::Enter if self.focus == Focus::Task(TaskField::Location) => match self.resolve_location() {
                Some(operation) => Action::Request(operation),
                None => Action::None,
            },
            KeyCode::Enter => {
                self.move_focus(true);
                Action::None
            }
            _ => {
                let is_location = self.focus == Focus::Task(TaskField::Location);
                let edited = self.focused_input().is_some_and(|input| input.handle_key(key));
                if edited && is_location {
                    self.location_point = None;
                }
                Action::None
            }
        }
    }

    fn update(&mut self, action: Action) -> Action {
        match action {
            Action::Completed {
                outcome: Outcome::TaskLoaded(result),
                ..
            } => {
                self.finish_load(result)
            }
            Action::Completed {
                outcome: Outcome::Geocoded(result),
                ..
            } => {
                self.finish_geocode(result);
                Action::None
            }
            Action::Completed {
                outcome: Outcome::TaskSaved(result),
                ..
            } => match self.finish_save(result) {
                Ok(_) => Action::Navigate(ROUTE_ADMIN_MANAGE_TASKS.to_string()),
                Err(e) => Action::Notify(Notice::Error(e.to_string())),
            },
            other => other,
        }
    }

    fn render(&mut self, f: &mut Frame, rect: Rect) {
        if self.loading {
            f.render_widget(Paragraph::new(WELCOME_LOADING), rect);
            return;
        }

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3 * TaskField::ALL.len() as u16),
                Constraint::Min(3),
                Constraint::Length(1),
                Constraint::Length(1),
            ])
            .split(rect);

        let task_rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints(vec![Constraint::Length(3); TaskField::ALL.len()])
            .split(chunks[0]);
        for (i, field) in TaskField::ALL.iter().enumerate() {
            let mut title = field.label().to_string();
            if *field == TaskField::Location {
                if let Some(point) = self.location_point {
                    title = format!("{} 📍 {}", title, point);
                }
            }
            f.render_widget(
                create_input_paragraph(self.inputs[i].display(), &title, self.focus == Focus::Task(*field)),
                task_rows[i],
            );
        }

        let sessions_block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .title(format!(" Sessions ({}) ", self.sessions.len()));
        let sessions_area = sessions_block.inner(chunks[1]);
        f.render_widget(sessions_block, chunks[1]);

        let session_rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints(vec![Constraint::Length(3); self.sessions.len()])
            .split(sessions_area);
        for (i, row) in self.sessions.iter().enumerate() {
            let Some(area) = session_rows.get(i) else {
                break;
            };
            let columns = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Ratio(1, 3); 3])
                .split(*area);
            for (j, field) in SessionField::ALL.iter().enumerate() {
                f.render_widget(
                    create_input_paragraph(
                        row.inputs[j].display(),
                        field.label(),
                        self.focus == Focus::Session(i, *field),
                    ),
                    columns[j],
                );
            }
        }

        if let Some(message) = &self.message {
            let color = if message.is_error() { Color::Red } else { Color::Green };
            f.render_widget(
                Paragraph::new(Line::from(Span::styled(message.text().to_string(), Style::default().fg(color)))),
                chunks[2],
            );
        }

        f.render_widget(
            create_instructions_paragraph(&[
                shortcuts::TAB_NEXT,
                shortcuts::SEPARATOR,
                ("Ctrl+N", Color::Cyan, " Add Session"),
                shortcuts::SEPARATOR,
                ("Ctrl+D", Color::Red, " Remove Session"),
                shortcuts::SEPARATOR,
                ("Ctrl+S", Color::Green, " Save"),
            ]),
            chunks[3],
        );
    }
}
