//! Core UI functionality for cohortdesk.
//!
//! The building blocks every component relies on:
//!
//! - [`actions`] - Requests and completions flowing through the UI loop
//! - [`component`] - Base component trait and rendering abstraction
//! - [`event_handler`] - Terminal input polling
//! - [`notifications`] - Typed publish/subscribe between components
//! - [`task_manager`] - Background execution of collaborator calls
//!
//! # Architecture
//!
//! Components own their view state and never call collaborators directly.
//! They return request actions, the [`TaskManager`] runs the call on the
//! runtime, and the completion comes back as another action on the UI loop.
//! Cross-component coordination goes through the [`NotificationBus`].

pub mod actions;
pub mod component;
pub mod event_handler;
pub mod notifications;
pub mod task_manager;

pub use actions::{Action, DashboardStage};
pub use component::Component;
pub use event_handler::{EventHandler, EventType};
pub use notifications::{Notification, NotificationBus, NotificationKind, SubscriptionInfo};
pub use task_manager::{TaskId, TaskManager};
