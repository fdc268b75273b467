use std::fmt;

use crate::jobs::models::{ContactMessage, Credentials, NewJob, NewUser, PasswordChange};
use crate::jobs::FilterCriteria;

/// Page sections; exactly one is active at a time
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    #[default]
    Home,
    Jobs,
    JobDetails,
    Admin,
    Contact,
}

impl Section {
    pub const ALL: [Section; 5] = [
        Section::Home,
        Section::Jobs,
        Section::JobDetails,
        Section::Admin,
        Section::Contact,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            Section::Home => "home",
            Section::Jobs => "jobs",
            Section::JobDetails => "job-details",
            Section::Admin => "admin",
            Section::Contact => "contact",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Everything the user can do, dispatched through [`super::ViewController::dispatch`]
#[derive(Debug, Clone)]
pub enum Action {
    ShowSection(Section),
    /// Category or date control changed; fetches or refilters immediately
    ApplyFilter(FilterCriteria),
    /// Keystroke in the search box; debounced
    SearchInput(String),
    ResetFilters,
    SelectJob(i64),
    Login(Credentials),
    Logout,
    SubmitJob(NewJob),
    DeleteJob(i64),
    ExportExcel,
    LoadUsers,
    CreateUser(NewUser),
    DeleteUser(i64),
    ChangePassword(PasswordChange),
    SubmitContact(ContactMessage),
}

/// Result of a dispatch, used by callers to pick a response status
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// View state updated
    Applied,
    /// Stale response dropped, or a debounced trigger superseded
    Discarded,
    NotFound(i64),
    /// Validation or a precondition failed; a notice explains why
    Rejected,
    /// Network or backend failure; a notice explains why
    Failed,
}

impl Outcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, Outcome::Applied)
    }
}
