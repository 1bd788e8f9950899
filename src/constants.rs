//! Constants used throughout the application
//!
//! User-facing text and fixed limits live here so components and tests
//! agree on them.

// Group names
/// Maximum number of characters in a group name (after trimming)
pub const GROUP_NAME_MAX_CHARS: usize = 255;

// Validation Error Messages
pub const ERROR_NAME_REQUIRED: &str = "Required";
pub const ERROR_NAME_TOO_LONG: &str = "Name must be 255 characters or fewer";

// Remote Error Messages
pub const ERROR_OPERATION_FAILED_PREFIX: &str = "Sorry, the operation failed due to error:";
pub const ERROR_ADD_MEMBERS_FAILED: &str = "❌ Failed to add students to group";
pub const ERROR_DASHBOARD_LOAD_FAILED: &str = "❌ Failed to load dashboard";

// Alerts
pub const ALERT_LOGIN_FAILED: &str = "Log in failed. Please try again.";

// Success Messages
pub const SUCCESS_GROUP_CREATED: &str = "✅ Group created";
pub const SUCCESS_MEMBERS_ADDED: &str = "✅ Students added to group";

// UI Messages
pub const CONFIG_GENERATED: &str = "✅ Generated default configuration file";
pub const DIALOG_TITLE_CREATE_GROUP: &str = "Create a Curated Group";
pub const LOADING_TEXT: &str = "Loading...";

// Selector defaults
/// Default time the inline selector stays busy after a bulk add
pub const SELECTOR_DEFAULT_COOLDOWN_MS: u64 = 2000;
/// Upper bound accepted for the selector cooldown
pub const SELECTOR_MAX_COOLDOWN_MS: u64 = 60_000;
