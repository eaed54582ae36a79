use crate::backends::{AuthSubscription, User};
use crate::constants::ROUTE_ENTRY;
use crate::entities::Profile;
use crate::router::{Access, Route, Router};
use crate::ui::components::dialogs::LogsDialog;
use crate::ui::components::{landing_route, NavBar, NavRole, StatusBar};
use crate::ui::core::{
    actions::{Action, Notice, ViewToken},
    event_handler::EventType,
    task_manager::TaskManager,
    AppContext, Component, Operation,
};
use crate::ui::layout::LayoutManager;
use crate::ui::screen::Screen;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent};
use ratatui::{layout::Rect, Frame};
use tokio::sync::mpsc;

/// Signed-in user and the role their profile grants
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    pub user: Option<User>,
    pub profile: Option<Profile>,
}

impl SessionState {
    pub fn access(&self) -> Access {
        match (&self.user, &self.profile) {
            (None, _) => Access::Anonymous,
            (Some(_), Some(profile)) if profile.is_admin() => Access::Admin,
            (Some(_), _) => Access::Volunteer,
        }
    }
}

pub struct AppComponent {
    ctx: AppContext,
    router: Router,
    screen: Screen,
    view_token: ViewToken,
    nav_bar: Option<NavBar>,
    session: SessionState,

    // Background work
    task_manager: TaskManager,
    background_action_rx: mpsc::UnboundedReceiver<Action>,
    auth: AuthSubscription,

    // Simple UI state
    notice: Option<Notice>,
    show_logs: bool,
    should_quit: bool,
}

impl AppComponent {
    pub fn new(ctx: AppContext) -> Self {
        let router = Router::new();
        let (task_manager, background_action_rx) = TaskManager::new();
        let auth = ctx.services.identity.subscribe();
        let (screen, load) = Screen::mount(router.current(), &ctx, None);

        let mut app = Self {
            ctx,
            router,
            screen,
            view_token: 1,
            nav_bar: None,
            session: SessionState::default(),
            task_manager,
            background_action_rx,
            auth,
            notice: None,
            show_logs: false,
            should_quit: false,
        };
        if let Some(operation) = load {
            app.spawn(operation);
        }
        app
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn router(&self) -> &Router {
        &self.router
    }

    pub fn current_route(&self) -> &Route {
        self.router.current()
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn nav_bar(&self) -> Option<&NavBar> {
        self.nav_bar.as_ref()
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn view_token(&self) -> ViewToken {
        self.view_token
    }

    /// Get the number of active background tasks
    pub fn active_task_count(&self) -> usize {
        self.task_manager.task_count()
    }

    /// Check if any background operations are running
    pub fn is_busy(&self) -> bool {
        self.task_manager.task_count() > 0
    }

    fn spawn(&mut self, operation: Operation) {
        self.task_manager
            .spawn_operation(self.ctx.services.clone(), self.view_token, operation);
    }

    /// Unmount the current view and mount the one for the router's route
    fn remount(&mut self) {
        self.screen.teardown();
        self.view_token += 1;
        let (screen, load) = Screen::mount(self.router.current(), &self.ctx, self.session.user.as_ref());
        self.screen = screen;
        if let Some(operation) = load {
            self.spawn(operation);
        }
    }

    fn navigate(&mut self, path: &str) {
        let route = self.router.push(path).clone();
        log::info!("Navigation: {} -> {}", path, route);
        self.notice = None;
        self.remount();
    }

    fn sign_in(&mut self, user: User, profile: Option<Profile>) {
        let landing = landing_route(profile.as_ref());
        self.session = SessionState {
            user: Some(user),
            profile,
        };
        let access = self.session.access();
        self.router.set_access(access);
        self.nav_bar = Some(NavBar::new(if access == Access::Admin {
            NavRole::Admin
        } else {
            NavRole::Volunteer
        }));
        self.navigate(landing);
    }

    fn clear_session(&mut self) {
        self.session = SessionState::default();
        self.router.set_access(Access::Anonymous);
        self.nav_bar = None;
    }

    /// Handle global keyboard shortcuts that aren't component-specific
    fn handle_global_key(&mut self, key: KeyEvent) -> Action {
        if self.show_logs {
            return match key.code {
                KeyCode::Esc | KeyCode::Char('G') => Action::ShowLogs(false),
                _ => Action::None,
            };
        }

        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                log::debug!("Global key: Ctrl+C - quitting application");
                Action::Quit
            }
            KeyCode::Char('q') if !self.screen.is_typing() => {
                log::debug!("Global key: 'q' - quitting application");
                Action::Quit
            }
            KeyCode::Char('G') if !self.screen.is_typing() => Action::ShowLogs(true),
            _ => Action::None,
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> Action {
        let global = self.handle_global_key(key);
        if global != Action::None || self.show_logs {
            return global;
        }

        if let Some(nav_bar) = self.nav_bar.as_mut() {
            let action = nav_bar.handle_key_events(key);
            if action != Action::None {
                return action;
            }
        }

        match self.screen.handle_key_events(key) {
            Action::None if key.code == KeyCode::Esc && !self.router.history().is_empty() => Action::Back,
            action => action,
        }
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) -> Action {
        if self.show_logs {
            return Action::None;
        }
        if let Some(nav_bar) = self.nav_bar.as_mut() {
            let action = nav_bar.handle_mouse_events(mouse);
            if action != Action::None {
                return action;
            }
        }
        self.screen.handle_mouse_events(mouse)
    }

    /// Process an event through the component hierarchy
    pub fn handle_event(&mut self, event: EventType) {
        let action = match event {
            EventType::Key(key) => self.handle_key(key),
            EventType::Mouse(mouse) => self.handle_mouse(mouse),
            EventType::Tick => {
                self.tick();
                Action::None
            }
            EventType::Resize(_, _) | EventType::Other => Action::None,
        };
        self.handle_app_action(action);
    }

    /// Handle app-level actions, following any action they produce
    pub fn handle_app_action(&mut self, action: Action) {
        let mut next = action;
        loop {
            next = match next {
                Action::None => break,
                Action::Quit => {
                    self.should_quit = true;
                    Action::None
                }
                Action::Navigate(path) => {
                    self.navigate(&path);
                    Action::None
                }
                Action::Back => {
                    if let Some(route) = self.router.back() {
                        log::info!("Navigation: back to {}", route);
                        self.remount();
                    }
                    Action::None
                }
                Action::Request(operation) => {
                    self.spawn(operation);
                    Action::None
                }
                Action::Completed { token, outcome } => {
                    if token == self.view_token {
                        self.screen.update(Action::Completed { token, outcome })
                    } else {
                        log::debug!("Dropping result for unmounted view {}: {:?}", token, outcome);
                        Action::None
                    }
                }
                Action::SignedIn { user, profile } => {
                    self.sign_in(user, profile);
                    Action::None
                }
                Action::AuthChanged(None) if self.session.user.is_some() => {
                    log::warn!("Signed out by the identity provider");
                    self.clear_session();
                    Action::Navigate(ROUTE_ENTRY.to_string())
                }
                Action::AuthChanged(_) => Action::None,
                Action::Logout => {
                    log::info!("Signing out");
                    self.task_manager.spawn_sign_out(self.ctx.services.clone());
                    Action::None
                }
                Action::LoggedOut(result) => {
                    self.clear_session();
                    self.navigate(ROUTE_ENTRY);
                    match result {
                        Ok(()) => Action::None,
                        Err(e) => {
                            log::error!("Sign-out failed: {}", e);
                            Action::Notify(Notice::Error(format!("Sign-out failed: {}", e)))
                        }
                    }
                }
                Action::Notify(notice) => {
                    if notice.is_error() {
                        log::warn!("{}", notice.text());
                    }
                    self.notice = Some(notice);
                    Action::None
                }
                Action::ShowLogs(show) => {
                    self.show_logs = show;
                    Action::None
                }
            };
        }
    }

    /// Periodic work: auth changes and view housekeeping
    fn tick(&mut self) {
        while let Some(user) = self.auth.try_changed() {
            self.handle_app_action(Action::AuthChanged(user));
        }
        self.screen.tick();
    }

    /// Process background actions from task manager
    pub fn process_background_actions(&mut self) -> Vec<Action> {
        let mut actions = Vec::new();
        while let Ok(action) = self.background_action_rx.try_recv() {
            actions.push(action);
        }

        let finished = self.task_manager.cleanup_finished_tasks();
        if !finished.is_empty() {
            log::debug!("Background: cleaned up {} finished tasks", finished.len());
        }

        actions
    }

    /// Receive the next background action, waiting for it
    pub async fn next_background_action(&mut self) -> Option<Action> {
        self.background_action_rx.recv().await
    }

    /// Stop background work and release the auth subscription
    pub fn shutdown(&mut self) {
        self.screen.teardown();
        self.auth.cancel();
        self.task_manager.cancel_all_tasks();
    }
}

impl Component for AppComponent {
    fn handle_key_events(&mut self, key: KeyEvent) -> Action {
        self.handle_key(key)
    }

    fn update(&mut self, action: Action) -> Action {
        self.handle_app_action(action);
        Action::None
    }

    fn render(&mut self, f: &mut Frame, rect: Rect) {
        let layout = LayoutManager::main_layout(rect, self.nav_bar.is_some());

        if let (Some(nav_bar), Some(area)) = (self.nav_bar.as_mut(), layout.nav) {
            nav_bar.render(f, area);
        }
        self.screen.render(f, layout.body);
        StatusBar::render(
            f,
            layout.status,
            self.router.current(),
            self.notice.as_ref(),
            self.task_manager.task_count(),
        );

        if self.show_logs {
            LogsDialog::render(f, rect, &self.ctx.logger);
        }
    }
}
