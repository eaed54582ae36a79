//! Reusable UI components

pub mod dialogs;
pub mod map_view;
pub mod session_card;
pub mod status_bar;
pub mod text_input;

// Views and their building blocks
pub mod login;
pub mod nav_bar;
pub mod placeholder;
pub mod profile_editor;
pub mod profile_page;
pub mod search_tasks;
pub mod session_selector;
pub mod task_detail;
pub mod task_filter;
pub mod task_form;
pub mod task_list;
pub mod welcome_banner;

// Component exports
pub use login::{landing_route, LoginChoice, LoginForm, LoginKind};
pub use map_view::MapView;
pub use nav_bar::{NavBar, NavLink, NavRole, NavTarget};
pub use placeholder::Placeholder;
pub use profile_editor::{ProfileEditor, ProfileError, ProfileField};
pub use profile_page::ProfilePage;
pub use search_tasks::SearchTasks;
pub use session_card::SessionCard;
pub use session_selector::{ConfirmState, SelectionError, SessionSelector};
pub use status_bar::StatusBar;
pub use task_detail::TaskDetail;
pub use task_filter::{FilterCriteria, FilterError, TaskFilter};
pub use task_form::{FormError, SessionField, TaskField, TaskForm};
pub use task_list::TaskList;
pub use text_input::TextInput;
pub use welcome_banner::WelcomeBanner;
