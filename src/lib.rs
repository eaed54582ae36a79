//! VoluntTrac - A terminal client for volunteer task management
//!
//! Volunteers browse and filter tasks, sign up for sessions and maintain
//! their profile. Organisation admins add, edit and manage tasks. Identity,
//! documents and geocoding come from hosted services reached through the
//! traits in [`backends`].
//!
//! # Modules
//!
//! * [`backends`] - Service traits, REST clients and in-memory fakes
//! * [`config`] - Application configuration management
//! * [`entities`] - Task, session, assignment and profile models
//! * [`router`] - Typed routes and the access guard
//! * [`ui`] - Terminal user interface components
//! * [`utils`] - Utility functions and helpers

/// Hosted service abstraction and implementations
pub mod backends;

/// Configuration module for managing application settings
pub mod config;

/// Application constants and default values
pub mod constants;

/// Schemaless document values exchanged with the document store
pub mod document;

/// Domain models and their document mapping
pub mod entities;

/// Logging utilities for debugging and error tracking
pub mod logger;

/// Route table, resolution and guard
pub mod router;

/// Terminal user interface components and rendering
pub mod ui;

/// Utility functions for date/time handling and other helpers
pub mod utils;
