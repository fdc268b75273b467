use super::actions::Section;
use super::sequence::RequestSequencer;
use crate::jobs::models::User;
use crate::jobs::{FilterCriteria, Job};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Error,
}

impl NoticeLevel {
    pub fn class(&self) -> &'static str {
        match self {
            NoticeLevel::Success => "success",
            NoticeLevel::Error => "error",
        }
    }
}

/// Transient user-facing message, cleared once rendered
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

/// State owned by the view controller
#[derive(Debug, Default)]
pub struct ViewState {
    pub section: Section,
    pub criteria: FilterCriteria,
    /// Job store: the last fetch (backed) or the whole file (static)
    pub jobs: Vec<Job>,
    /// Filter/sort output currently on screen
    pub listing: Vec<Job>,
    pub recent: Vec<Job>,
    pub detail: Option<Job>,
    pub admin_logged_in: bool,
    pub admin_jobs: Vec<Job>,
    pub users: Vec<User>,
    pub notice: Option<Notice>,
    pub listing_requests: RequestSequencer,
    pub detail_requests: RequestSequencer,
}

impl ViewState {
    pub fn notify(&mut self, notice: Notice) {
        self.notice = Some(notice);
    }

    pub fn take_notice(&mut self) -> Option<Notice> {
        self.notice.take()
    }

    /// Distinct categories known to the view, for the category select
    pub fn categories(&self) -> Vec<String> {
        let mut categories: Vec<String> = self
            .jobs
            .iter()
            .chain(self.recent.iter())
            .map(|job| job.category.clone())
            .chain(self.criteria.category.as_query().map(str::to_string))
            .collect();
        categories.sort();
        categories.dedup();
        categories
    }
}
