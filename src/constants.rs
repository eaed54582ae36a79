//! Constants used throughout the application
//!
//! This module centralizes collection names, routes, UI text, and other
//! constant values to improve maintainability and consistency.

// Document collections
pub const COLLECTION_TASKS: &str = "tasks";
pub const COLLECTION_PROFILES: &str = "profiles";
pub const COLLECTION_ASSIGNMENTS: &str = "assignments";

// Routes
pub const ROUTE_ENTRY: &str = "/";
pub const ROUTE_LOGIN_CHOICE: &str = "/loginChoice";
pub const ROUTE_VOLUNTEER_LOGIN: &str = "/volunteerLogin";
pub const ROUTE_ADMIN_LOGIN: &str = "/adminLogin";
pub const ROUTE_VIEW_TASKS: &str = "/ViewTasks";
pub const ROUTE_SEARCH_TASKS: &str = "/SearchTasks";
pub const ROUTE_USER_PROFILE: &str = "/UserProfile";
pub const ROUTE_ADMIN_PROFILE: &str = "/AdminProfile";
pub const ROUTE_ADMIN_DASHBOARD: &str = "/Admin/Dashboard";
pub const ROUTE_ADMIN_ADD_TASKS: &str = "/Admin/AddTasks";
pub const ROUTE_ADMIN_MANAGE_TASKS: &str = "/Admin/ManageTasks";
pub const ROUTE_ADMIN_TAKE_ATTENDANCE: &str = "/Admin/TakeAttendance";
pub const ROUTE_FORBIDDEN: &str = "/ForbiddenAccess";

// Branding
pub const APP_TITLE: &str = "VOLUNTRAC";

// Map
/// Routes kept for `back()`; older entries are dropped
pub const MAX_ROUTE_HISTORY: usize = 50;
/// Zoom level used for task maps
pub const DEFAULT_MAP_ZOOM: u8 = 15;
/// Highest zoom level the map provider supports
pub const MAX_MAP_ZOOM: u8 = 21;

// Status messages
pub const STATUS_CONFIRMING: &str = "Confirming...";
pub const SUCCESS_SESSIONS_CONFIRMED: &str = "✅ Sessions confirmed";
pub const SUCCESS_PROFILE_SAVED: &str = "✅ Profile updated";
pub const SUCCESS_TASK_SAVED: &str = "✅ Task saved";
pub const INFO_EDITING_ENABLED: &str = "Editing enabled";

// Error messages
pub const ERROR_EMPTY_SELECTION: &str = "❌ Select at least one session before confirming";
pub const ERROR_CONFIRM_IN_FLIGHT: &str = "❌ A confirmation is already in progress";
pub const ERROR_SAVE_ASSIGNMENT_FAILED: &str = "❌ Could not save your sessions, please try again";
pub const ERROR_INVALID_RADIUS: &str = "❌ Radius must be a positive number";
pub const ERROR_LOCATION_REQUIRED: &str = "❌ Choose a location first";
pub const ERROR_LOCATION_FAILED: &str = "❌ Could not get your location";
pub const ERROR_REAUTH_FAILED: &str = "❌ Authentication failed";
pub const ERROR_EDITING_LOCKED: &str = "❌ Re-enter your password before editing";
pub const ERROR_PROFILE_NOT_LOADED: &str = "❌ Your profile has not loaded yet";
pub const ERROR_SAVE_PROFILE_FAILED: &str = "❌ Could not save your profile, please try again";
pub const ERROR_SAVE_TASK_FAILED: &str = "❌ Could not save the task, please try again";
pub const ERROR_TASK_NOT_LOADED: &str = "❌ The task has not loaded, reopen it before saving";

// UI Messages
pub const CONFIG_GENERATED: &str = "✅ Generated default configuration file";
pub const DIALOG_TITLE_LOGS: &str = "🔍 Logs - Press 'Esc' or 'G' to close";

// Welcome banner
pub const WELCOME_LOADING: &str = "Loading...";
pub const LAST_LOGIN_NONE: &str = "No login record";
