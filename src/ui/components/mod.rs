pub mod dashboard;
pub mod group_creation_dialog;
pub mod group_selector;

pub use dashboard::{Dashboard, DashboardViewState};
pub use group_creation_dialog::{validate_group_name, GroupCreationDialog, GroupFormError, ValidationError};
pub use group_selector::{
    GroupChip, GroupSelector, RosterEntry, SelectionState, SelectorVariant, SelectorViewState,
};
