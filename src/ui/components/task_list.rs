//! Task listing, optionally narrowed by a [`FilterCriteria`]

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, List, ListItem, ListState},
    Frame,
};

use super::task_filter::FilterCriteria;
use crate::entities::Task;
use crate::router::Route;
use crate::ui::core::{Action, Component, Notice, Operation, Outcome};
use crate::utils::datetime::format_display_datetime;
use crate::utils::geo::{distance_km, within_radius};

pub struct TaskList {
    tasks: Vec<Task>,
    visible: Vec<usize>,
    filter: Option<FilterCriteria>,
    admin: bool,
    loading: bool,
    list_state: ListState,
}

impl TaskList {
    /// `admin` switches row actions to the administrator routes
    pub fn new(admin: bool) -> Self {
        Self {
            tasks: Vec::new(),
            visible: Vec::new(),
            filter: None,
            admin,
            loading: true,
            list_state: ListState::default(),
        }
    }

    pub fn load_request(&self) -> Operation {
        Operation::LoadTasks
    }

    pub fn set_tasks(&mut self, tasks: Vec<Task>) {
        self.tasks = tasks;
        self.loading = false;
        self.refresh_visible();
    }

    /// Keep only tasks within the radius. Tasks without coordinates drop out.
    pub fn apply_filter(&mut self, criteria: FilterCriteria) {
        self.filter = Some(criteria);
        self.refresh_visible();
    }

    pub fn clear_filter(&mut self) {
        self.filter = None;
        self.refresh_visible();
    }

    pub fn filter(&self) -> Option<FilterCriteria> {
        self.filter
    }

    pub fn visible_tasks(&self) -> Vec<&Task> {
        self.visible.iter().filter_map(|&i| self.tasks.get(i)).collect()
    }

    pub fn selected_task(&self) -> Option<&Task> {
        let index = *self.visible.get(self.list_state.selected()?)?;
        self.tasks.get(index)
    }

    fn refresh_visible(&mut self) {
        self.visible = self
            .tasks
            .iter()
            .enumerate()
            .filter(|(_, task)| match (self.filter, task.location_point) {
                (None, _) => true,
                (Some(criteria), Some(point)) => within_radius(criteria.location, point, criteria.radius_km),
                (Some(_), None) => false,
            })
            .map(|(i, _)| i)
            .collect();

        if let Some(criteria) = self.filter {
            let tasks = &self.tasks;
            self.visible.sort_by(|&a, &b| {
                let da = tasks[a].location_point.map(|p| distance_km(criteria.location, p));
                let db = tasks[b].location_point.map(|p| distance_km(criteria.location, p));
                da.partial_cmp(&db).unwrap_or(std::cmp::Ordering::Equal)
            });
        }

        self.list_state
            .select(if self.visible.is_empty() { None } else { Some(0) });
    }

    fn open_route(&self, task: &Task) -> Route {
        if self.admin {
            Route::AdminTaskDetail {
                task_id: task.id.clone(),
            }
        } else {
            Route::VolunteerTaskDetail {
                task_id: task.id.clone(),
            }
        }
    }

    fn move_selection(&mut self, down: bool) {
        if self.visible.is_empty() {
            return;
        }
        let current = self.list_state.selected().unwrap_or(0);
        let next = if down {
            (current + 1).min(self.visible.len() - 1)
        } else {
            current.saturating_sub(1)
        };
        self.list_state.select(Some(next));
    }

    fn row(&self, task: &Task) -> ListItem<'static> {
        let mut spans = vec![Span::styled(
            task.name.clone(),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        )];
        if let Some(start) = task.start_datetime {
            spans.push(Span::styled(
                format!("  {}", format_display_datetime(start)),
                Style::default().fg(Color::Gray),
            ));
        }
        if task.has_location() {
            spans.push(Span::styled(format!("  📍 {}", task.location), Style::default().fg(Color::Blue)));
        }
        if let (Some(criteria), Some(point)) = (self.filter, task.location_point) {
            spans.push(Span::styled(
                format!("  ({:.1} km)", distance_km(criteria.location, point)),
                Style::default().fg(Color::Green),
            ));
        }
        ListItem::new(Line::from(spans))
    }
}

impl Component for TaskList {
    fn handle_key_events(&mut self, key: KeyEvent) -> Action {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.move_selection(false);
                Action::None
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.move_selection(true);
                Action::None
            }
            KeyCode::Enter => match self.selected_task() {
                Some(task) => Action::Navigate(self.open_route(task).path()),
                None => Action::None,
            },
            KeyCode::Char('e') if self.admin => match self.selected_task() {
                Some(task) => Action::Navigate(
                    Route::EditTask {
                        task_id: task.id.clone(),
                    }
                    .path(),
                ),
                None => Action::None,
            },
            KeyCode::Char('a') if self.admin => Action::Navigate(Route::AddTasks.path()),
            KeyCode::Char('c') if self.filter.is_some() => {
                self.clear_filter();
                Action::None
            }
            _ => Action::None,
        }
    }

    fn update(&mut self, action: Action) -> Action {
        match action {
            Action::Completed {
                outcome: Outcome::TasksLoaded(result),
                ..
            } => match result {
                Ok(tasks) => {
                    log::info!("Loaded {} tasks", tasks.len());
                    self.set_tasks(tasks);
                    Action::None
                }
                Err(e) => {
                    self.loading = false;
                    log::error!("Failed to load tasks: {}", e);
                    Action::Notify(Notice::Error(e.to_string()))
                }
            },
            other => other,
        }
    }

    fn render(&mut self, f: &mut Frame, rect: Rect) {
        let title = match (self.loading, self.filter) {
            (true, _) => " Tasks (loading...) ".to_string(),
            (false, Some(criteria)) => format!(
                " Tasks within {} km ({} of {}) ",
                criteria.radius_km,
                self.visible.len(),
                self.tasks.len()
            ),
            (false, None) => format!(" Tasks ({}) ", self.tasks.len()),
        };

        let items: Vec<ListItem> = self.visible_tasks().into_iter().map(|task| self.row(task)).collect();
        let list = List::new(items)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded)
                    .title(title),
            )
            .highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
            .highlight_symbol("▶ ");
        f.render_stateful_widget(list, rect, &mut self.list_state);
    }
}
