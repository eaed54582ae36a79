//! Core UI functionality for VoluntTrac.
//!
//! This module contains the fundamental building blocks for the user interface,
//! including event handling, component abstractions, and background operations.
//!
//! # Module Components
//!
//! - [`actions`] - Action definitions and view tokens
//! - [`component`] - Base component trait and rendering abstractions
//! - [`context`] - Shared service handles, configuration and logger
//! - [`event_handler`] - Keyboard/mouse input polling
//! - [`operations`] - Backend calls requested by components and their outcomes
//! - [`task_manager`] - Background task management for those calls
//!
//! # Architecture
//!
//! 1. **Components** implement the [`Component`] trait and stay synchronous
//! 2. **Operations** describe the backend work a component needs
//! 3. **Tasks** run operations via the [`TaskManager`] and send results back
//! 4. **View tokens** make late results for unmounted views harmless

pub mod actions;
pub mod component;
pub mod context;
pub mod event_handler;
pub mod operations;
pub mod task_manager;

pub use actions::{Action, Notice, ViewToken};
pub use component::Component;
pub use context::AppContext;
pub use event_handler::{EventHandler, EventType};
pub use operations::{Operation, Outcome};
pub use task_manager::{TaskId, TaskManager};
