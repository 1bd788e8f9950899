//! cohortdesk - view-model layer for an academic advising client
//!
//! This library provides the client-side state behind an advisor's
//! dashboard: creating curated student groups, selecting students in bulk
//! and adding them to groups, and loading the dashboard data. Remote
//! services are reached through explicit collaborator traits; view state is
//! explicit and rendered with Ratatui.
//!
//! # Modules
//!
//! * [`backend`] - Collaborator interfaces and the in-memory implementation
//! * [`config`] - Application configuration management
//! * [`ui`] - Components, notification bus, actions and the terminal loop

/// Collaborator interfaces (group store, dashboard data, session)
pub mod backend;

/// Configuration module for managing application settings
pub mod config;

/// Application constants and user-facing text
pub mod constants;

/// Logging utilities for debugging and error tracking
pub mod logger;

/// Terminal user interface components and rendering
pub mod ui;
