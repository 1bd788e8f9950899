//! In-memory collaborator used by the demo binary and the test suite.
//!
//! Behaves like the server for the operations the UI layer consumes:
//! group ids are assigned in order, duplicate names are rejected, and
//! adding a student twice is a no-op. Every call is recorded so callers can
//! assert on ordering and counts.

use super::{
    BackendError, Cohort, CurrentUser, DashboardDataSource, Group, GroupId, GroupStore, SessionInfo, Student, Team,
    WatchlistEntry,
};
use async_trait::async_trait;
use log::{debug, info};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

/// Collaborator operations, used for call accounting and failure injection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    CreateGroup,
    GetMyGroups,
    AddMembers,
    GetTeams,
    GetMyCohorts,
    GetMyWatchlist,
}

#[derive(Debug, Default)]
struct State {
    authenticated: bool,
    user: Option<CurrentUser>,
    groups: Vec<Group>,
    next_group_id: GroupId,
    teams: Vec<Team>,
    cohorts: Vec<Cohort>,
    watchlist: Vec<WatchlistEntry>,
    calls: Vec<Operation>,
    add_member_batches: Vec<(GroupId, Vec<String>)>,
    failures: HashMap<Operation, String>,
}

/// Shared, cloneable in-memory backend.
#[derive(Debug, Clone, Default)]
pub struct InMemoryBackend {
    state: Arc<Mutex<State>>,
}

impl InMemoryBackend {
    /// An empty backend with nobody logged in.
    pub fn new() -> Self {
        let backend = Self::default();
        if let Ok(mut state) = backend.state.lock() {
            state.next_group_id = 1;
        }
        backend
    }

    /// A backend with `user` logged in.
    pub fn logged_in(uid: impl Into<String>, name: impl Into<String>) -> Self {
        let backend = Self::new();
        if let Ok(mut state) = backend.state.lock() {
            state.authenticated = true;
            state.user = Some(CurrentUser {
                uid: uid.into(),
                name: name.into(),
                my_groups: Vec::new(),
            });
        }
        backend
    }

    /// A logged-in advisor with a small roster, used by the binary.
    pub fn demo() -> Self {
        let backend = Self::logged_in("6446", "Demo Advisor");
        let roster = [
            ("11667051", "61889", "Deborah", "Davies"),
            ("2345678901", "98765", "Dave", "Doolittle"),
            ("3456789012", "242881", "Paul", "Kerschen"),
            ("5678901234", "9933311", "Sandeep", "Jayaprakash"),
            ("7890123456", "1049291", "Paul", "Farestveit"),
            ("8901234567", "123456", "John David", "Crossman"),
        ];
        let students: Vec<Student> = roster
            .iter()
            .map(|(sid, uid, first, last)| Student {
                sid: (*sid).to_string(),
                uid: (*uid).to_string(),
                first_name: (*first).to_string(),
                last_name: (*last).to_string(),
            })
            .collect();

        backend.set_teams(vec![
            Team {
                code: "WFH".to_string(),
                name: "Women's Field Hockey".to_string(),
            },
            Team {
                code: "WTE".to_string(),
                name: "Women's Tennis".to_string(),
            },
            Team {
                code: "MFB".to_string(),
                name: "Football".to_string(),
            },
        ]);
        backend.set_cohorts(vec![
            Cohort {
                id: 1,
                name: "All sports".to_string(),
                total_student_count: 312,
            },
            Cohort {
                id: 2,
                name: "Undeclared juniors".to_string(),
                total_student_count: 41,
            },
        ]);
        backend.set_watchlist(students.clone());
        backend.insert_group("My Students", &[]);
        backend.insert_group("Cool Kids", &students[..2]);
        backend
    }

    fn lock(&self) -> Result<MutexGuard<'_, State>, BackendError> {
        self.state
            .lock()
            .map_err(|_| BackendError::Other("in-memory backend lock poisoned".to_string()))
    }

    /// Record the call and return the injected failure, if any.
    fn begin(&self, state: &mut State, operation: Operation) -> Result<(), BackendError> {
        state.calls.push(operation);
        match state.failures.remove(&operation) {
            Some(message) => {
                debug!("InMemoryBackend: failing {:?} with '{}'", operation, message);
                Err(BackendError::Server { status: 500, message })
            }
            None => Ok(()),
        }
    }

    pub fn set_authenticated(&self, authenticated: bool) {
        if let Ok(mut state) = self.state.lock() {
            state.authenticated = authenticated;
        }
    }

    pub fn set_teams(&self, teams: Vec<Team>) {
        if let Ok(mut state) = self.state.lock() {
            state.teams = teams;
        }
    }

    pub fn set_cohorts(&self, cohorts: Vec<Cohort>) {
        if let Ok(mut state) = self.state.lock() {
            state.cohorts = cohorts;
        }
    }

    pub fn set_watchlist(&self, watchlist: Vec<WatchlistEntry>) {
        if let Ok(mut state) = self.state.lock() {
            state.watchlist = watchlist;
        }
    }

    /// Seed a group directly, bypassing call accounting.
    pub fn insert_group(&self, name: &str, members: &[Student]) -> Group {
        let mut state = match self.state.lock() {
            Ok(state) => state,
            Err(poisoned) => poisoned.into_inner(),
        };
        let mut group = Group::new(state.next_group_id.max(1), name);
        group.add_members(members);
        state.next_group_id = group.id + 1;
        state.groups.push(group.clone());
        group
    }

    /// Make the next call of `operation` fail with a server error carrying `message`.
    pub fn fail_next(&self, operation: Operation, message: impl Into<String>) {
        if let Ok(mut state) = self.state.lock() {
            state.failures.insert(operation, message.into());
        }
    }

    /// Every call made so far, in order.
    pub fn calls(&self) -> Vec<Operation> {
        self.state.lock().map(|state| state.calls.clone()).unwrap_or_default()
    }

    pub fn call_count(&self, operation: Operation) -> usize {
        self.calls().into_iter().filter(|op| *op == operation).count()
    }

    /// The `sid`s sent with each add-members call, in order.
    pub fn add_member_batches(&self) -> Vec<(GroupId, Vec<String>)> {
        self.state
            .lock()
            .map(|state| state.add_member_batches.clone())
            .unwrap_or_default()
    }

    pub fn group(&self, group_id: GroupId) -> Option<Group> {
        self.state
            .lock()
            .ok()
            .and_then(|state| state.groups.iter().find(|g| g.id == group_id).cloned())
    }
}

#[async_trait]
impl GroupStore for InMemoryBackend {
    async fn create_group(&self, name: &str) -> Result<Group, BackendError> {
        let mut state = self.lock()?;
        self.begin(&mut state, Operation::CreateGroup)?;
        if state.groups.iter().any(|g| g.name == name) {
            return Err(BackendError::Server {
                status: 400,
                message: format!("You already have a group named '{}'", name),
            });
        }
        let group = Group::new(state.next_group_id.max(1), name);
        state.next_group_id = group.id + 1;
        state.groups.push(group.clone());
        info!("InMemoryBackend: created group '{}' ({})", group.name, group.id);
        Ok(group)
    }

    async fn get_my_groups(&self) -> Result<Vec<Group>, BackendError> {
        let mut state = self.lock()?;
        self.begin(&mut state, Operation::GetMyGroups)?;
        Ok(state.groups.clone())
    }

    async fn add_members_to_group(&self, group_id: GroupId, members: &[Student]) -> Result<(), BackendError> {
        let mut state = self.lock()?;
        self.begin(&mut state, Operation::AddMembers)?;
        let sids = members.iter().map(|m| m.sid.clone()).collect();
        state.add_member_batches.push((group_id, sids));
        let group = state
            .groups
            .iter_mut()
            .find(|g| g.id == group_id)
            .ok_or_else(|| BackendError::NotFound(format!("No group with id {}", group_id)))?;
        let added = group.add_members(members);
        info!("InMemoryBackend: added {} students to group {}", added, group_id);
        Ok(())
    }
}

#[async_trait]
impl DashboardDataSource for InMemoryBackend {
    async fn get_teams(&self) -> Result<Vec<Team>, BackendError> {
        let mut state = self.lock()?;
        self.begin(&mut state, Operation::GetTeams)?;
        Ok(state.teams.clone())
    }

    async fn get_my_cohorts(&self) -> Result<Vec<Cohort>, BackendError> {
        let mut state = self.lock()?;
        self.begin(&mut state, Operation::GetMyCohorts)?;
        Ok(state.cohorts.clone())
    }

    async fn get_my_watchlist(&self) -> Result<Vec<WatchlistEntry>, BackendError> {
        let mut state = self.lock()?;
        self.begin(&mut state, Operation::GetMyWatchlist)?;
        Ok(state.watchlist.clone())
    }
}

impl SessionInfo for InMemoryBackend {
    fn is_authenticated_user(&self) -> bool {
        self.state.lock().map(|state| state.authenticated).unwrap_or(false)
    }

    fn current_user(&self) -> Option<CurrentUser> {
        let state = self.state.lock().ok()?;
        if !state.authenticated {
            return None;
        }
        state.user.clone().map(|user| CurrentUser {
            my_groups: state.groups.clone(),
            ..user
        })
    }
}
