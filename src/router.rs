//! Client-side routing
//!
//! Paths resolve to typed [`Route`]s. Dynamic segments (`:taskID`) become
//! fields, unknown paths fall through to [`Route::NotFound`], and the
//! [`Router`] applies the access guard and keeps a history stack.

use std::fmt;

use crate::constants::{MAX_ROUTE_HISTORY, ROUTE_ENTRY};

/// Every screen the client can show
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    LoginChoice,
    VolunteerLogin,
    AdminLogin,
    RegisterUser,
    RegisterAdmin,
    ViewTasks,
    SearchTasks,
    VolunteerTaskDetail { task_id: String },
    ForbiddenAccess,
    VolunteerProfile,
    AdminProfile,
    AdminDashboard,
    AddTasks,
    ManageTasks,
    AdminTaskDetail { task_id: String },
    AdminTaskAssignment { task_id: String },
    TakeAttendance,
    ManageAttendance { task_id: String },
    EditTask { task_id: String },
    NotFound { path: String },
}

/// Who is asking for a route
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Anonymous,
    Volunteer,
    Admin,
}

impl Route {
    /// Resolve a path. `/` redirects to the login choice.
    pub fn resolve(path: &str) -> Route {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        match segments.as_slice() {
            [] => Route::LoginChoice,
            ["loginChoice"] => Route::LoginChoice,
            ["volunteerLogin"] => Route::VolunteerLogin,
            ["adminLogin"] => Route::AdminLogin,
            ["registerUser"] => Route::RegisterUser,
            ["registerAdmin"] => Route::RegisterAdmin,
            ["ViewTasks"] => Route::ViewTasks,
            ["SearchTasks"] => Route::SearchTasks,
            ["ViewTask", id] => Route::VolunteerTaskDetail { task_id: id.to_string() },
            ["ForbiddenAccess"] => Route::ForbiddenAccess,
            ["UserProfile"] => Route::VolunteerProfile,
            ["AdminProfile"] => Route::AdminProfile,
            ["Admin", "Dashboard"] => Route::AdminDashboard,
            ["Admin", "AddTasks"] => Route::AddTasks,
            ["Admin", "ManageTasks"] => Route::ManageTasks,
            ["Admin", "ViewTask", id] => Route::AdminTaskDetail { task_id: id.to_string() },
            ["Admin", "TaskAssignment", id] => Route::AdminTaskAssignment { task_id: id.to_string() },
            ["Admin", "TakeAttendance"] => Route::TakeAttendance,
            ["Admin", "ManageAttendance", id] => Route::ManageAttendance { task_id: id.to_string() },
            ["EditTask", id] => Route::EditTask { task_id: id.to_string() },
            _ => Route::NotFound { path: path.to_string() },
        }
    }

    /// Canonical path of this route
    pub fn path(&self) -> String {
        match self {
            Route::LoginChoice => "/loginChoice".to_string(),
            Route::VolunteerLogin => "/volunteerLogin".to_string(),
            Route::AdminLogin => "/adminLogin".to_string(),
            Route::RegisterUser => "/registerUser".to_string(),
            Route::RegisterAdmin => "/registerAdmin".to_string(),
            Route::ViewTasks => "/ViewTasks".to_string(),
            Route::SearchTasks => "/SearchTasks".to_string(),
            Route::VolunteerTaskDetail { task_id } => format!("/ViewTask/{task_id}"),
            Route::ForbiddenAccess => "/ForbiddenAccess".to_string(),
            Route::VolunteerProfile => "/UserProfile".to_string(),
            Route::AdminProfile => "/AdminProfile".to_string(),
            Route::AdminDashboard => "/Admin/Dashboard".to_string(),
            Route::AddTasks => "/Admin/AddTasks".to_string(),
            Route::ManageTasks => "/Admin/ManageTasks".to_string(),
            Route::AdminTaskDetail { task_id } => format!("/Admin/ViewTask/{task_id}"),
            Route::AdminTaskAssignment { task_id } => format!("/Admin/TaskAssignment/{task_id}"),
            Route::TakeAttendance => "/Admin/TakeAttendance".to_string(),
            Route::ManageAttendance { task_id } => format!("/Admin/ManageAttendance/{task_id}"),
            Route::EditTask { task_id } => format!("/EditTask/{task_id}"),
            Route::NotFound { path } => path.clone(),
        }
    }

    /// Route name as shown in titles
    pub fn name(&self) -> &'static str {
        match self {
            Route::LoginChoice => "LoginChoice",
            Route::VolunteerLogin => "VolunteerLogin",
            Route::AdminLogin => "AdminLogin",
            Route::RegisterUser => "RegisterUser",
            Route::RegisterAdmin => "RegisterAdmin",
            Route::ViewTasks => "ViewTasks",
            Route::SearchTasks => "SearchTasks",
            Route::VolunteerTaskDetail { .. } => "VolunteerTaskDetail",
            Route::ForbiddenAccess => "ForbiddenAccess",
            Route::VolunteerProfile => "VolunteerProfile",
            Route::AdminProfile => "AdminProfile",
            Route::AdminDashboard => "AdminDashboard",
            Route::AddTasks => "AddTasks",
            Route::ManageTasks => "ManageTasks",
            Route::AdminTaskDetail { .. } => "AdminViewTasks",
            Route::AdminTaskAssignment { .. } => "AdminViewAssignment",
            Route::TakeAttendance => "TakeAttendance",
            Route::ManageAttendance { .. } => "ManageAttendance",
            Route::EditTask { .. } => "Edit Task",
            Route::NotFound { .. } => "NotFound",
        }
    }

    /// Reachable without signing in
    pub fn is_public(&self) -> bool {
        matches!(
            self,
            Route::LoginChoice
                | Route::VolunteerLogin
                | Route::AdminLogin
                | Route::RegisterUser
                | Route::RegisterAdmin
                | Route::ForbiddenAccess
                | Route::NotFound { .. }
        )
    }

    /// Belongs to the administrator namespace
    pub fn is_admin_scoped(&self) -> bool {
        matches!(
            self,
            Route::AdminProfile
                | Route::AdminDashboard
                | Route::AddTasks
                | Route::ManageTasks
                | Route::AdminTaskDetail { .. }
                | Route::AdminTaskAssignment { .. }
                | Route::TakeAttendance
                | Route::ManageAttendance { .. }
                | Route::EditTask { .. }
        )
    }

    /// Apply the access guard, returning where the user actually lands
    pub fn guard(self, access: Access) -> Route {
        if access == Access::Anonymous && !self.is_public() {
            Route::LoginChoice
        } else if access == Access::Volunteer && self.is_admin_scoped() {
            Route::ForbiddenAccess
        } else {
            self
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

/// Navigation state: the current route and how we got here
#[derive(Debug, Clone)]
pub struct Router {
    current: Route,
    history: Vec<Route>,
    access: Access,
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

impl Router {
    /// Starts at the entry route as an anonymous user
    pub fn new() -> Self {
        Self {
            current: Route::resolve(ROUTE_ENTRY),
            history: Vec::new(),
            access: Access::Anonymous,
        }
    }

    pub fn current(&self) -> &Route {
        &self.current
    }

    pub fn access(&self) -> Access {
        self.access
    }

    pub fn set_access(&mut self, access: Access) {
        self.access = access;
    }

    pub fn history(&self) -> &[Route] {
        &self.history
    }

    /// Navigate to `path`, applying the guard. One call is one transition.
    /// Re-entering the current route adds no history, and only the last
    /// [`MAX_ROUTE_HISTORY`] routes are kept.
    pub fn push(&mut self, path: &str) -> &Route {
        let target = Route::resolve(path).guard(self.access);
        log::debug!("Navigation: {} -> {}", self.current, target);
        if target == self.current {
            return &self.current;
        }
        let previous = std::mem::replace(&mut self.current, target);
        self.history.push(previous);
        if self.history.len() > MAX_ROUTE_HISTORY {
            let excess = self.history.len() - MAX_ROUTE_HISTORY;
            self.history.drain(..excess);
        }
        &self.current
    }

    /// Return to the previous route, if any
    pub fn back(&mut self) -> Option<&Route> {
        let previous = self.history.pop()?;
        self.current = previous.guard(self.access);
        Some(&self.current)
    }
}
