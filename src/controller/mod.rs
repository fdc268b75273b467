//! View controller: owns the view state and turns [`Action`]s into fetches,
//! local refilters and section switches.
//!
//! The state lock is never held across a network call. Backed fetches take a
//! ticket from a [`sequence::RequestSequencer`] before suspending so that a response
//! arriving after a newer one is dropped instead of overwriting it.

pub mod actions;
pub mod debounce;
pub mod sequence;
pub mod sessions;
pub mod state;


use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};
use validator::Validate;

use crate::client::dto::{JobQuery, MessageResponse};
use crate::client::static_file::JobsLocation;
use crate::client::{AdminApi, ApiError, BackendClient, JobsApi, StaticJobs};
use crate::config::{Config, DataMode};
use crate::jobs::models::{
    first_validation_message, ContactMessage, Credentials, NewJob, NewUser, PasswordChange, User,
};
use crate::jobs::{filter_jobs, sort_jobs, FilterCriteria, Job};

pub use actions::{Action, Outcome, Section};
use debounce::Debouncer;
pub use sessions::SessionRegistry;
pub use state::{Notice, ViewState};

/// Job data source of one controller
///
/// A backed source carries its own backend session, so each visitor needs
/// its own. Static sources share the loaded file.
pub enum DataSource {
    Backed {
        jobs: Arc<dyn JobsApi>,
        admin: Arc<dyn AdminApi>,
    },
    Static(StaticJobs),
}

impl DataSource {
    pub fn backed(client: BackendClient) -> Self {
        let client = Arc::new(client);
        DataSource::Backed {
            jobs: client.clone(),
            admin: client,
        }
    }

    /// Source for the configured mode; every request shares `request_timeout`
    pub fn from_config(config: &Config) -> Result<Self, ApiError> {
        match config.mode {
            DataMode::Backed => {
                let client = BackendClient::new(&config.backend_url, config.request_timeout)?;
                Ok(DataSource::backed(client))
            }
            DataMode::Static => {
                let http = reqwest::Client::builder()
                    .timeout(config.request_timeout)
                    .build()?;
                Ok(DataSource::Static(StaticJobs::new(
                    JobsLocation::parse(&config.jobs_file),
                    http,
                )))
            }
        }
    }

    pub fn mode(&self) -> DataMode {
        match self {
            DataSource::Backed { .. } => DataMode::Backed,
            DataSource::Static(_) => DataMode::Static,
        }
    }

    /// Static mode (re)tries the file load; backed mode asks for one job
    pub async fn health(&self) -> SourceHealth {
        let checked = match self {
            DataSource::Static(loader) => loader.jobs().await.map(|_| ()),
            DataSource::Backed { jobs, .. } => jobs.list_jobs(&JobQuery::recent(1)).await.map(|_| ()),
        };

        match checked {
            Ok(()) => SourceHealth {
                mode: self.mode(),
                available: true,
                error: None,
            },
            Err(e) => SourceHealth {
                mode: self.mode(),
                available: false,
                error: Some(e.to_string()),
            },
        }
    }
}

/// Availability of the data source, reported by the health probes
#[derive(Debug, Clone)]
pub struct SourceHealth {
    pub mode: DataMode,
    pub available: bool,
    pub error: Option<String>,
}

struct Inner {
    source: DataSource,
    state: Mutex<ViewState>,
    debouncer: Debouncer,
    recent_limit: usize,
}

#[derive(Clone)]
pub struct ViewController {
    inner: Arc<Inner>,
}

impl ViewController {
    pub fn new(source: DataSource, search_debounce: Duration, recent_limit: usize) -> Self {
        Self {
            inner: Arc::new(Inner {
                source,
                state: Mutex::new(ViewState::default()),
                debouncer: Debouncer::new(search_debounce),
                recent_limit,
            }),
        }
    }

    pub fn mode(&self) -> DataMode {
        self.inner.source.mode()
    }

    /// First load: the whole file in static mode, the recent strip in backed mode
    pub async fn initialize(&self) -> Outcome {
        match &self.inner.source {
            DataSource::Static(loader) => {
                let loaded = loader.jobs().await;
                let mut state = self.inner.state.lock().await;
                match loaded {
                    Ok(jobs) => {
                        let listing = filter_jobs(&jobs, &state.criteria);
                        state.recent = jobs.iter().take(self.inner.recent_limit).cloned().collect();
                        state.listing = listing;
                        state.jobs = jobs;
                        Outcome::Applied
                    }
                    Err(e) => {
                        error!("Error loading jobs: {}", e);
                        state.jobs.clear();
                        state.recent.clear();
                        state.listing.clear();
                        state.notify(Notice::error("Error loading jobs"));
                        Outcome::Failed
                    }
                }
            }
            DataSource::Backed { .. } => self.load_recent().await,
        }
    }

    pub async fn dispatch(&self, action: Action) -> Outcome {
        debug!("Dispatching {:?}", action);

        match action {
            Action::ShowSection(section) => self.show_section(section).await,
            Action::ApplyFilter(criteria) => self.apply_filter(criteria).await.0,
            Action::SearchInput(term) => self.live_search(term).await.0,
            Action::ResetFilters => {
                self.inner.debouncer.cancel();
                self.apply_filter(FilterCriteria::default()).await.0
            }
            Action::SelectJob(id) => self.select_job(id).await,
            Action::Login(credentials) => self.login(credentials).await,
            Action::Logout => self.logout().await,
            Action::SubmitJob(job) => self.submit_job(job).await,
            Action::DeleteJob(id) => self.delete_job(id).await,
            Action::ExportExcel => self.export_excel().await,
            Action::LoadUsers => self.load_users().await,
            Action::CreateUser(user) => self.create_user(user).await,
            Action::DeleteUser(id) => self.delete_user(id).await,
            Action::ChangePassword(change) => self.change_password(change).await,
            Action::SubmitContact(message) => self.submit_contact(message).await,
        }
    }

    /// Render against the current state, then drop the notice that was shown
    pub async fn present<R>(&self, render: impl FnOnce(&ViewState) -> R) -> R {
        let mut state = self.inner.state.lock().await;
        let rendered = render(&state);
        state.take_notice();
        rendered
    }

    /// Read the current state without consuming the notice
    pub async fn inspect<R>(&self, read: impl FnOnce(&ViewState) -> R) -> R {
        let state = self.inner.state.lock().await;
        read(&state)
    }

    async fn notify(&self, notice: Notice) {
        self.inner.state.lock().await.notify(notice);
    }

    async fn show_section(&self, section: Section) -> Outcome {
        let logged_in = {
            let mut state = self.inner.state.lock().await;
            state.section = section;
            state.admin_logged_in
        };

        match section {
            Section::Jobs => self.refresh_listing().await.0,
            Section::Admin if logged_in => self.refresh_admin_jobs().await,
            _ => Outcome::Applied,
        }
    }

    async fn apply_filter(&self, criteria: FilterCriteria) -> (Outcome, Vec<Job>) {
        {
            let mut state = self.inner.state.lock().await;
            state.criteria = criteria;
            state.section = Section::Jobs;
        }
        self.refresh_listing().await
    }

    /// Debounced `SearchInput` that also hands back the listing it applied
    pub async fn live_search(&self, term: String) -> (Outcome, Vec<Job>) {
        if !self.inner.debouncer.settle().await {
            debug!("Search input {:?} superseded", term);
            return (Outcome::Discarded, Vec::new());
        }

        let criteria = self.inner.state.lock().await.criteria.clone().with_search(term);
        self.apply_filter(criteria).await
    }

    /// Recompute the listing for the current criteria
    ///
    /// An applied listing is returned as copied under the accepting lock.
    async fn refresh_listing(&self) -> (Outcome, Vec<Job>) {
        let api = match &self.inner.source {
            DataSource::Static(_) => {
                let mut state = self.inner.state.lock().await;
                let listing = filter_jobs(&state.jobs, &state.criteria);
                state.listing = listing.clone();
                return (Outcome::Applied, listing);
            }
            DataSource::Backed { jobs, .. } => jobs,
        };

        let (ticket, query, order) = {
            let mut state = self.inner.state.lock().await;
            let ticket = state.listing_requests.issue();
            debug!("{} job listing requests in flight", state.listing_requests.in_flight());
            (ticket, JobQuery::from(&state.criteria), state.criteria.order)
        };

        let result = api.list_jobs(&query).await;

        let mut state = self.inner.state.lock().await;
        if !state.listing_requests.accept(ticket) {
            debug!("Dropping stale job listing for {:?}", query);
            return (Outcome::Discarded, Vec::new());
        }

        match result {
            Ok(jobs) => {
                let listing = sort_jobs(jobs.clone(), order);
                state.listing = listing.clone();
                state.jobs = jobs;
                (Outcome::Applied, listing)
            }
            Err(e) => {
                error!("Error loading jobs: {}", e);
                let message = if e.is_network() {
                    "Error loading jobs"
                } else {
                    "Failed to load jobs"
                };
                state.notify(Notice::error(message));
                (Outcome::Failed, Vec::new())
            }
        }
    }

    async fn load_recent(&self) -> Outcome {
        let api = match &self.inner.source {
            DataSource::Static(_) => {
                let mut state = self.inner.state.lock().await;
                let recent = state.jobs.iter().take(self.inner.recent_limit).cloned().collect();
                state.recent = recent;
                return Outcome::Applied;
            }
            DataSource::Backed { jobs, .. } => jobs,
        };

        match api.list_jobs(&JobQuery::recent(self.inner.recent_limit)).await {
            Ok(jobs) => {
                self.inner.state.lock().await.recent = jobs;
                Outcome::Applied
            }
            Err(e) => {
                error!("Error loading recent jobs: {}", e);
                Outcome::Failed
            }
        }
    }

    async fn select_job(&self, id: i64) -> Outcome {
        let api = match &self.inner.source {
            DataSource::Static(_) => {
                let mut state = self.inner.state.lock().await;
                return match state.jobs.iter().find(|job| job.id == id).cloned() {
                    Some(job) => {
                        state.detail = Some(job);
                        state.section = Section::JobDetails;
                        Outcome::Applied
                    }
                    None => {
                        warn!("Job not found: {}", id);
                        state.notify(Notice::error("Job not found"));
                        Outcome::NotFound(id)
                    }
                };
            }
            DataSource::Backed { jobs, .. } => jobs,
        };

        let ticket = self.inner.state.lock().await.detail_requests.issue();
        let result = api.get_job(id).await;

        let mut state = self.inner.state.lock().await;
        if !state.detail_requests.accept(ticket) {
            debug!("Dropping stale job detail for id={}", id);
            return Outcome::Discarded;
        }

        match result {
            Ok(job) => {
                state.detail = Some(job);
                state.section = Section::JobDetails;
                Outcome::Applied
            }
            Err(ApiError::NotFound(_)) => {
                warn!("Job not found: {}", id);
                state.notify(Notice::error("Job not found"));
                Outcome::NotFound(id)
            }
            Err(e) => {
                error!("Error loading job details for id={}: {}", id, e);
                state.notify(Notice::error("Error loading job details"));
                Outcome::Failed
            }
        }
    }

    /// Admin API, or a rejection notice when unavailable
    ///
    /// `needs_session` additionally requires a successful login.
    async fn admin(&self, needs_session: bool) -> Result<Arc<dyn AdminApi>, Outcome> {
        let admin = match &self.inner.source {
            DataSource::Backed { admin, .. } => admin.clone(),
            DataSource::Static(_) => {
                self.notify(Notice::error(ApiError::Unsupported.to_string())).await;
                return Err(Outcome::Rejected);
            }
        };

        if needs_session && !self.inner.state.lock().await.admin_logged_in {
            warn!("Admin action attempted without a session");
            self.notify(Notice::error("Admin authentication required")).await;
            return Err(Outcome::Rejected);
        }

        Ok(admin)
    }

    /// Validate a form, leaving the first failing field's message as a notice
    async fn validated<T: Validate>(&self, form: &T, field_order: &[&str]) -> Result<(), Outcome> {
        match form.validate() {
            Ok(()) => Ok(()),
            Err(errors) => {
                let message = first_validation_message(&errors, field_order);
                warn!("Validation failed: {}", message);
                self.notify(Notice::error(message)).await;
                Err(Outcome::Rejected)
            }
        }
    }

    /// Turn an admin mutation's result into a notice
    async fn acknowledge(
        &self,
        result: Result<MessageResponse, ApiError>,
        success: &str,
        failure: &str,
    ) -> Outcome {
        match result {
            Ok(response) => {
                let message = response.message.unwrap_or_else(|| success.to_string());
                info!("{}", message);
                self.notify(Notice::success(message)).await;
                Outcome::Applied
            }
            Err(e) => {
                error!("{}: {}", failure, e);
                self.notify(Notice::error(e.user_message(failure))).await;
                Outcome::Failed
            }
        }
    }

    async fn login(&self, credentials: Credentials) -> Outcome {
        let admin = match self.admin(false).await {
            Ok(admin) => admin,
            Err(outcome) => return outcome,
        };
        if let Err(outcome) = self.validated(&credentials, &["username", "password"]).await {
            return outcome;
        }

        match admin.login(&credentials).await {
            Ok(response) if response.success => {
                info!("Admin {} logged in", credentials.username);
                {
                    let mut state = self.inner.state.lock().await;
                    state.admin_logged_in = true;
                    state.section = Section::Admin;
                    state.notify(Notice::success("Login successful!"));
                }
                self.refresh_admin_jobs().await;
                Outcome::Applied
            }
            Ok(response) => {
                let message = response.error.unwrap_or_else(|| "Login failed".to_string());
                warn!("Login rejected for {}: {}", credentials.username, message);
                self.notify(Notice::error(message)).await;
                Outcome::Rejected
            }
            Err(e) => {
                error!("Admin login error: {}", e);
                let message = if e.is_network() {
                    "Network error - please try again".to_string()
                } else {
                    e.user_message("Login failed")
                };
                self.notify(Notice::error(message)).await;
                Outcome::Failed
            }
        }
    }

    async fn logout(&self) -> Outcome {
        let admin = match self.admin(false).await {
            Ok(admin) => admin,
            Err(outcome) => return outcome,
        };

        match admin.logout().await {
            // A backend error still means the session is unusable
            Ok(_) | Err(ApiError::Backend { .. }) => {
                let mut state = self.inner.state.lock().await;
                state.admin_logged_in = false;
                state.admin_jobs.clear();
                state.users.clear();
                state.notify(Notice::success("Logged out successfully"));
                info!("Admin logged out");
                Outcome::Applied
            }
            Err(e) => {
                error!("Logout error: {}", e);
                self.notify(Notice::error("Logout failed")).await;
                Outcome::Failed
            }
        }
    }

    /// Reload the admin job list; failures are only logged
    async fn refresh_admin_jobs(&self) -> Outcome {
        let api = match &self.inner.source {
            DataSource::Backed { jobs, .. } => jobs.clone(),
            DataSource::Static(_) => return Outcome::Rejected,
        };

        match api.list_jobs(&JobQuery::default()).await {
            Ok(jobs) => {
                self.inner.state.lock().await.admin_jobs = jobs;
                Outcome::Applied
            }
            Err(e) => {
                error!("Error loading admin jobs: {}", e);
                Outcome::Failed
            }
        }
    }

    async fn submit_job(&self, job: NewJob) -> Outcome {
        let admin = match self.admin(true).await {
            Ok(admin) => admin,
            Err(outcome) => return outcome,
        };
        if let Err(outcome) = self.validated(&job, NewJob::FIELD_ORDER).await {
            return outcome;
        }

        let result = admin.create_job(&job).await.map(|mut response| {
            response.message = Some("Job posted successfully!".to_string());
            response
        });
        let outcome = self.acknowledge(result, "Job posted successfully!", "Failed to post job").await;
        if outcome.is_applied() {
            futures_util::join!(self.refresh_admin_jobs(), self.load_recent());
        }
        outcome
    }

    async fn delete_job(&self, id: i64) -> Outcome {
        let admin = match self.admin(true).await {
            Ok(admin) => admin,
            Err(outcome) => return outcome,
        };

        let result = admin.delete_job(id).await;
        let outcome = self.acknowledge(result, "Job deleted successfully", "Failed to delete job").await;
        if outcome.is_applied() {
            {
                let mut state = self.inner.state.lock().await;
                if state.detail.as_ref().is_some_and(|job| job.id == id) {
                    state.detail = None;
                }
            }
            futures_util::join!(self.refresh_admin_jobs(), self.load_recent());
        }
        outcome
    }

    async fn export_excel(&self) -> Outcome {
        let admin = match self.admin(true).await {
            Ok(admin) => admin,
            Err(outcome) => return outcome,
        };

        match admin.export_excel().await {
            Ok(response) => {
                info!("Excel export generated: {:?}", response.file_path);
                self.notify(Notice::success("Excel file generated successfully!")).await;
                Outcome::Applied
            }
            Err(e) => {
                error!("Excel export error: {}", e);
                self.notify(Notice::error(e.user_message("Failed to export Excel file"))).await;
                Outcome::Failed
            }
        }
    }

    async fn fetch_users(&self, admin: &Arc<dyn AdminApi>) -> Result<Vec<User>, ApiError> {
        let users = admin.list_users().await?;
        self.inner.state.lock().await.users = users.clone();
        Ok(users)
    }

    async fn load_users(&self) -> Outcome {
        let admin = match self.admin(true).await {
            Ok(admin) => admin,
            Err(outcome) => return outcome,
        };
        self.inner.state.lock().await.section = Section::Admin;

        match self.fetch_users(&admin).await {
            Ok(users) => {
                debug!("Loaded {} users", users.len());
                Outcome::Applied
            }
            Err(e) => {
                error!("Error loading users: {}", e);
                self.notify(Notice::error(e.user_message("Failed to load users"))).await;
                Outcome::Failed
            }
        }
    }

    async fn create_user(&self, user: NewUser) -> Outcome {
        let admin = match self.admin(true).await {
            Ok(admin) => admin,
            Err(outcome) => return outcome,
        };
        if let Err(outcome) = self.validated(&user, NewUser::FIELD_ORDER).await {
            return outcome;
        }

        let result = admin.create_user(&user).await;
        let outcome = self.acknowledge(result, "User created successfully", "Failed to create user").await;
        if outcome.is_applied() {
            if let Err(e) = self.fetch_users(&admin).await {
                error!("Error reloading users: {}", e);
            }
        }
        outcome
    }

    async fn delete_user(&self, id: i64) -> Outcome {
        let admin = match self.admin(true).await {
            Ok(admin) => admin,
            Err(outcome) => return outcome,
        };

        let result = admin.delete_user(id).await;
        let outcome = self.acknowledge(result, "User deleted successfully", "Failed to delete user").await;
        if outcome.is_applied() {
            if let Err(e) = self.fetch_users(&admin).await {
                error!("Error reloading users: {}", e);
            }
        }
        outcome
    }

    async fn change_password(&self, change: PasswordChange) -> Outcome {
        let admin = match self.admin(true).await {
            Ok(admin) => admin,
            Err(outcome) => return outcome,
        };
        if let Err(outcome) = self.validated(&change, PasswordChange::FIELD_ORDER).await {
            return outcome;
        }

        let result = admin.change_password(&change).await;
        self.acknowledge(result, "Password changed successfully", "Failed to change password")
            .await
    }

    async fn submit_contact(&self, message: ContactMessage) -> Outcome {
        self.inner.state.lock().await.section = Section::Contact;
        if let Err(outcome) = self.validated(&message, ContactMessage::FIELD_ORDER).await {
            return outcome;
        }

        info!("Contact message from {} <{}>: {}", message.name, message.email, message.subject);
        self.notify(Notice::success(
            "Thank you for your message! We will get back to you soon.",
        ))
        .await;
        Outcome::Applied
    }
}
