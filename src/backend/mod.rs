//! Collaborator interfaces consumed by the UI layer.
//!
//! The REST-backed group store, dashboard data source and authentication
//! session live outside this crate. This module defines the capability sets
//! the components depend on, the data they exchange and the error type every
//! remote call reports.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub mod memory;

pub use memory::InMemoryBackend;

/// Identifier of a curated group as assigned by the server.
pub type GroupId = i64;

/// Common error types for collaborator operations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BackendError {
    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },

    #[error("Backend error: {0}")]
    Other(String),
}

#[derive(Deserialize)]
struct ErrorPayload {
    message: String,
}

impl BackendError {
    /// Build an error from a failed HTTP response.
    ///
    /// JSON bodies of the form `{"message": "..."}` contribute their message;
    /// anything else is carried verbatim.
    pub fn from_response(status: u16, body: &str) -> Self {
        let message = serde_json::from_str::<ErrorPayload>(body)
            .map(|payload| payload.message)
            .unwrap_or_else(|_| body.trim().to_string());
        match status {
            401 | 403 => BackendError::Auth(message),
            404 => BackendError::NotFound(message),
            _ => BackendError::Server { status, message },
        }
    }

    /// The message suitable for showing to the user, without the variant prefix.
    pub fn server_message(&self) -> &str {
        match self {
            BackendError::Auth(message)
            | BackendError::NotFound(message)
            | BackendError::Network(message)
            | BackendError::InvalidData(message)
            | BackendError::Other(message) => message,
            BackendError::Server { message, .. } => message,
        }
    }
}

/// A student as listed on a roster. `sid` is the stable identity.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub sid: String,
    pub uid: String,
    pub first_name: String,
    pub last_name: String,
}

impl Student {
    pub fn display_name(&self) -> String {
        format!("{}, {}", self.last_name, self.first_name)
    }
}

/// Watchlist entries are plain students.
pub type WatchlistEntry = Student;

/// A curated group owned by the current advisor.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    pub id: GroupId,
    pub name: String,
    #[serde(default)]
    pub students: Vec<Student>,
}

impl Group {
    pub fn new(id: GroupId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            students: Vec::new(),
        }
    }

    /// Membership is decided by `sid`, never by object identity.
    pub fn contains(&self, sid: &str) -> bool {
        self.students.iter().any(|s| s.sid == sid)
    }

    /// Add students that are not members yet. Returns how many were added.
    pub fn add_members(&mut self, members: &[Student]) -> usize {
        let mut added = 0;
        for member in members {
            if !self.contains(&member.sid) {
                self.students.push(member.clone());
                added += 1;
            }
        }
        added
    }
}

/// An athletics team shown on the dashboard.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    pub code: String,
    pub name: String,
}

/// A saved cohort filter owned by the advisor.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cohort {
    pub id: i64,
    pub name: String,
    pub total_student_count: u32,
}

/// The logged-in advisor as cached by the session.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentUser {
    pub uid: String,
    pub name: String,
    #[serde(default)]
    pub my_groups: Vec<Group>,
}

/// Group operations backed by the server.
#[async_trait]
pub trait GroupStore: Send + Sync {
    /// Create a group with an already validated name.
    async fn create_group(&self, name: &str) -> Result<Group, BackendError>;

    /// All groups owned by the current advisor.
    async fn get_my_groups(&self) -> Result<Vec<Group>, BackendError>;

    /// Add students to a group. Students already in the group are ignored.
    async fn add_members_to_group(&self, group_id: GroupId, members: &[Student]) -> Result<(), BackendError>;
}

/// Data shown on the advisor dashboard.
#[async_trait]
pub trait DashboardDataSource: Send + Sync {
    async fn get_teams(&self) -> Result<Vec<Team>, BackendError>;
    async fn get_my_cohorts(&self) -> Result<Vec<Cohort>, BackendError>;
    async fn get_my_watchlist(&self) -> Result<Vec<WatchlistEntry>, BackendError>;
}

/// Synchronous, session-cached authentication state.
pub trait SessionInfo: Send + Sync {
    fn is_authenticated_user(&self) -> bool;

    /// `None` when nobody is logged in.
    fn current_user(&self) -> Option<CurrentUser>;
}
