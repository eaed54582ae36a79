//! The view mounted for each route

use crossterm::event::{KeyEvent, MouseEvent};
use ratatui::{layout::Rect, Frame};

use crate::backends::User;
use crate::router::Route;
use crate::ui::components::{
    LoginChoice, LoginForm, LoginKind, Placeholder, ProfilePage, SearchTasks, TaskDetail, TaskForm, TaskList,
};
use crate::ui::core::{Action, AppContext, Component, Operation};

pub enum Screen {
    LoginChoice(LoginChoice),
    Login(LoginForm),
    TaskList(TaskList),
    Search(SearchTasks),
    Detail(TaskDetail),
    Form(TaskForm),
    Profile(ProfilePage),
    Placeholder(Placeholder),
}

impl Screen {
    /// Build the view for `route` together with the load it needs first
    pub fn mount(route: &Route, ctx: &AppContext, user: Option<&User>) -> (Self, Option<Operation>) {
        let uid = user.map(|u| u.uid.clone());
        match route {
            Route::LoginChoice => (Screen::LoginChoice(LoginChoice::new()), None),
            Route::VolunteerLogin => (Screen::Login(LoginForm::new(LoginKind::Volunteer)), None),
            Route::AdminLogin => (Screen::Login(LoginForm::new(LoginKind::Admin)), None),
            Route::ViewTasks => {
                let list = TaskList::new(false);
                let load = list.load_request();
                (Screen::TaskList(list), Some(load))
            }
            Route::ManageTasks => {
                let list = TaskList::new(true);
                let load = list.load_request();
                (Screen::TaskList(list), Some(load))
            }
            Route::SearchTasks => {
                let search = SearchTasks::new(ctx.config.ui.default_radius_km);
                let load = search.load_request();
                (Screen::Search(search), Some(load))
            }
            Route::VolunteerTaskDetail { task_id } => {
                let detail = TaskDetail::new(task_id.clone(), uid).with_map_zoom(ctx.config.maps.zoom);
                let load = detail.load_request();
                (Screen::Detail(detail), Some(load))
            }
            Route::AdminTaskDetail { task_id } => {
                let detail = TaskDetail::new(task_id.clone(), None).with_map_zoom(ctx.config.maps.zoom);
                let load = detail.load_request();
                (Screen::Detail(detail), Some(load))
            }
            Route::AddTasks => (Screen::Form(TaskForm::create()), None),
            Route::EditTask { task_id } => {
                let form = TaskForm::edit(task_id.clone());
                let load = form.load_request();
                (Screen::Form(form), load)
            }
            Route::VolunteerProfile | Route::AdminProfile => match uid {
                Some(uid) => {
                    let page = ProfilePage::new(uid, ctx.services.identity.subscribe());
                    let load = page.load_request();
                    (Screen::Profile(page), Some(load))
                }
                None => (Screen::Placeholder(Placeholder::new(Route::ForbiddenAccess)), None),
            },
            other => (Screen::Placeholder(Placeholder::new(other.clone())), None),
        }
    }

    /// Whether the view is capturing free text, so global letter shortcuts stay off
    pub fn is_typing(&self) -> bool {
        match self {
            Screen::Login(_) | Screen::Form(_) => true,
            Screen::Search(search) => search.filter().is_dropdown_open(),
            Screen::Profile(page) => page.editor().editing_enabled() || page.editor().is_prompting_password(),
            _ => false,
        }
    }

    /// Work that has to happen between events
    pub fn tick(&mut self) -> bool {
        match self {
            Screen::Profile(page) => page.poll(),
            Screen::Search(search) => {
                search.drain_filter_events();
                false
            }
            _ => false,
        }
    }

    fn component(&mut self) -> &mut dyn Component {
        match self {
            Screen::LoginChoice(view) => view,
            Screen::Login(view) => view,
            Screen::TaskList(view) => view,
            Screen::Search(view) => view,
            Screen::Detail(view) => view,
            Screen::Form(view) => view,
            Screen::Profile(view) => view,
            Screen::Placeholder(view) => view,
        }
    }
}

impl Component for Screen {
    fn handle_key_events(&mut self, key: KeyEvent) -> Action {
        self.component().handle_key_events(key)
    }

    fn handle_mouse_events(&mut self, mouse: MouseEvent) -> Action {
        self.component().handle_mouse_events(mouse)
    }

    fn update(&mut self, action: Action) -> Action {
        self.component().update(action)
    }

    fn render(&mut self, f: &mut Frame, rect: Rect) {
        self.component().render(f, rect);
    }

    fn teardown(&mut self) {
        self.component().teardown();
    }
}
