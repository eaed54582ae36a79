//! Volunteer search page: a [`TaskFilter`] feeding a [`TaskList`]

use crossterm::event::{KeyEvent, MouseEvent};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    Frame,
};
use tokio::sync::mpsc::{self, UnboundedReceiver};

use super::task_filter::{FilterCriteria, TaskFilter};
use super::task_list::TaskList;
use crate::ui::core::{Action, Component, Operation, Outcome};

pub struct SearchTasks {
    filter: TaskFilter,
    list: TaskList,
    filter_events: UnboundedReceiver<FilterCriteria>,
}

impl SearchTasks {
    pub fn new(default_radius_km: f64) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            filter: TaskFilter::new(tx, default_radius_km),
            list: TaskList::new(false),
            filter_events: rx,
        }
    }

    pub fn load_request(&self) -> Operation {
        self.list.load_request()
    }

    pub fn filter(&self) -> &TaskFilter {
        &self.filter
    }

    pub fn filter_mut(&mut self) -> &mut TaskFilter {
        &mut self.filter
    }

    pub fn list(&self) -> &TaskList {
        &self.list
    }

    /// Hand pending filter events to the list
    pub fn drain_filter_events(&mut self) {
        while let Ok(criteria) = self.filter_events.try_recv() {
            self.list.apply_filter(criteria);
        }
    }
}

impl Component for SearchTasks {
    fn handle_key_events(&mut self, key: KeyEvent) -> Action {
        let action = if self.filter.is_dropdown_open() {
            self.filter.handle_key_events(key)
        } else {
            match self.filter.handle_key_events(key) {
                Action::None if !self.filter.is_dropdown_open() => self.list.handle_key_events(key),
                other => other,
            }
        };
        self.drain_filter_events();
        action
    }

    fn handle_mouse_events(&mut self, mouse: MouseEvent) -> Action {
        self.filter.handle_mouse_events(mouse)
    }

    fn update(&mut self, action: Action) -> Action {
        let action = match action {
            Action::Completed {
                outcome: Outcome::TasksLoaded(_),
                ..
            } => self.list.update(action),
            other => self.filter.update(other),
        };
        self.drain_filter_events();
        action
    }

    fn render(&mut self, f: &mut Frame, rect: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Min(0)])
            .split(rect);

        self.list.render(f, chunks[1]);
        // Drawn last so the dropdown overlays the list
        self.filter.render(f, rect);
    }
}
