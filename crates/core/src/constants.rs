//! Constants used throughout the core crate.

/// Prefix applied to every progress storage key.
pub const STORAGE_KEY_PREFIX: &str = "vets-pref-";

/// Storage key used when no explicit key is configured.
pub const DEFAULT_STATE_KEY: &str = "tool-state";

/// Default directory for the file-backed progress store.
pub const DEFAULT_PROGRESS_DIR: &str = ".vpref_progress";

/// Version of the persisted progress snapshot layout.
pub const SNAPSHOT_FORMAT_VERSION: u32 = 1;

/// The only message shown to users when the questionnaire data is broken.
pub const CONFIGURATION_ERROR_MESSAGE: &str =
    "Sorry, the eligibility tool has a configuration error. Please restart the tool.";

/// Prompt shown before offering to restore saved progress.
pub const RESTORE_PROMPT: &str = "Would you like to continue where you left off?";

/// Title and description of the result shown when a display condition blocks the next question.
pub const PATH_BLOCKED_TITLE: &str = "Not Eligible for Veterans' Preference";
pub const PATH_BLOCKED_DESCRIPTION: &str =
    "Based on your previous answers, this path does not lead to Veterans' Preference eligibility.";

/// Base URL of the OPM Vet Guide for HR Professionals.
pub const OPM_VET_GUIDE_URL: &str =
    "https://www.opm.gov/policy-data-oversight/veterans-services/vet-guide-for-hr-professionals/";
