use crate::backend::{Cohort, Group, GroupId, Student, Team, WatchlistEntry};
use std::time::Duration;

/// Stage of the dashboard fetch chain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DashboardStage {
    Teams,
    Cohorts,
    Watchlist,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    // Group creation
    OpenCreateGroupDialog,
    CreateGroup {
        name: String,
    },
    GroupCreated(Group),
    GroupCreateFailed(String),

    // Group assignment
    LoadMyGroups,
    GroupsLoaded(Vec<Group>),
    AddMembers {
        group_id: GroupId,
        members: Vec<Student>,
        cooldown: Option<Duration>, // Inline selector: stay busy this long after the call resolves
    },
    MembersAdded {
        group_id: GroupId,
        members: Vec<Student>,
    },
    AddMembersFailed {
        group_id: GroupId,
        message: String,
    },
    StartSelectorCooldown(Duration),
    SelectorCooldownElapsed,

    // Dashboard chain
    LoadTeams,
    LoadMyCohorts,
    LoadMyWatchlist,
    TeamsLoaded(Vec<Team>),
    CohortsLoaded(Vec<Cohort>),
    WatchlistLoaded(Vec<WatchlistEntry>),
    DashboardLoadFailed {
        stage: DashboardStage,
        message: String,
    },

    // UI operations
    ShowError(String),

    // App control
    Quit,
    None,
}
