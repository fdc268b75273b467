//! In-memory backend used by controller and route tests

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use tokio::sync::oneshot;

use super::dto::{ExportResponse, JobQuery, LoginResponse, MessageResponse};
use super::{AdminApi, ApiError, JobsApi};
use crate::jobs::models::{Credentials, NewJob, NewUser, PasswordChange, User};
use crate::jobs::{filter_jobs, FilterCriteria, Job};

pub const ADMIN_PASSWORD: &str = "admin123";

/// Behaves like the REST backend: filters server-side, newest first
#[derive(Default)]
pub struct FakeBackend {
    pub jobs: Mutex<Vec<Job>>,
    pub users: Mutex<Vec<User>>,
    pub queries: Mutex<Vec<JobQuery>>,
    pub posted: Mutex<Vec<NewJob>>,
    pub logged_in: AtomicBool,
    /// Listing requests for a search term wait on this gate before answering
    gates: Mutex<HashMap<String, oneshot::Receiver<()>>>,
    fail_listing: AtomicBool,
}

impl FakeBackend {
    pub fn with_jobs(jobs: Vec<Job>) -> Self {
        Self {
            jobs: Mutex::new(jobs),
            ..Default::default()
        }
    }

    /// Hold listing requests searching for `term` until the sender fires
    pub fn gate(&self, term: &str) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.gates.lock().unwrap().insert(term.to_string(), rx);
        tx
    }

    pub fn fail_listing(&self, fail: bool) {
        self.fail_listing.store(fail, Ordering::SeqCst);
    }

    pub fn query_count(&self) -> usize {
        self.queries.lock().unwrap().len()
    }

    fn require_session(&self) -> Result<(), ApiError> {
        if self.logged_in.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(ApiError::Backend {
                status: 401,
                message: "Admin authentication required".to_string(),
            })
        }
    }

    fn ok(message: &str) -> MessageResponse {
        MessageResponse {
            success: true,
            message: Some(message.to_string()),
        }
    }
}

#[async_trait]
impl JobsApi for FakeBackend {
    async fn list_jobs(&self, query: &JobQuery) -> Result<Vec<Job>, ApiError> {
        self.queries.lock().unwrap().push(query.clone());

        let gate = query
            .search
            .as_ref()
            .and_then(|term| self.gates.lock().unwrap().remove(term));
        if let Some(gate) = gate {
            gate.await.ok();
        }

        if self.fail_listing.load(Ordering::SeqCst) {
            return Err(ApiError::Backend {
                status: 500,
                message: "Failed to fetch jobs".to_string(),
            });
        }

        let criteria = FilterCriteria {
            search: query.search.clone().unwrap_or_default(),
            category: query.category.clone().unwrap_or_default().into(),
            ..Default::default()
        };
        let mut jobs = filter_jobs(&self.jobs.lock().unwrap(), &criteria);
        if let Some(limit) = query.limit {
            jobs.truncate(limit);
        }
        Ok(jobs)
    }

    async fn get_job(&self, id: i64) -> Result<Job, ApiError> {
        self.jobs
            .lock()
            .unwrap()
            .iter()
            .find(|job| job.id == id)
            .cloned()
            .ok_or(ApiError::NotFound(id))
    }
}

#[async_trait]
impl AdminApi for FakeBackend {
    async fn login(&self, credentials: &Credentials) -> Result<LoginResponse, ApiError> {
        if credentials.username == "admin" && credentials.password == ADMIN_PASSWORD {
            self.logged_in.store(true, Ordering::SeqCst);
            Ok(LoginResponse {
                success: true,
                message: Some("Login successful".to_string()),
                error: None,
            })
        } else {
            Err(ApiError::Backend {
                status: 401,
                message: "Invalid credentials".to_string(),
            })
        }
    }

    async fn logout(&self) -> Result<MessageResponse, ApiError> {
        self.logged_in.store(false, Ordering::SeqCst);
        Ok(Self::ok("Logged out successfully"))
    }

    async fn create_job(&self, job: &NewJob) -> Result<MessageResponse, ApiError> {
        self.require_session()?;
        self.posted.lock().unwrap().push(job.clone());

        let mut jobs = self.jobs.lock().unwrap();
        let id = jobs.iter().map(|j| j.id).max().unwrap_or(0) + 1;
        jobs.push(Job {
            id,
            title: job.title.clone(),
            company: job.company.clone(),
            location: job.location.clone(),
            category: job.category.clone(),
            description: job.description.clone(),
            job_type: None,
            experience: None,
            salary: None,
            requirements: None,
            application_url: None,
            contact_email: None,
            deadline: None,
            posted_date: Some("2030-01-01T00:00:00".to_string()),
            is_active: true,
        });
        Ok(Self::ok("Job posted successfully"))
    }

    async fn delete_job(&self, id: i64) -> Result<MessageResponse, ApiError> {
        self.require_session()?;
        let mut jobs = self.jobs.lock().unwrap();
        let before = jobs.len();
        jobs.retain(|job| job.id != id);
        if jobs.len() == before {
            return Err(ApiError::Backend {
                status: 404,
                message: "Not found".to_string(),
            });
        }
        Ok(Self::ok("Job deleted successfully"))
    }

    async fn export_excel(&self) -> Result<ExportResponse, ApiError> {
        self.require_session()?;
        Ok(ExportResponse {
            success: true,
            message: Some("Excel file generated successfully".to_string()),
            file_path: Some("exports/jobs.xlsx".to_string()),
        })
    }

    async fn list_users(&self) -> Result<Vec<User>, ApiError> {
        self.require_session()?;
        Ok(self.users.lock().unwrap().clone())
    }

    async fn create_user(&self, user: &NewUser) -> Result<MessageResponse, ApiError> {
        self.require_session()?;
        let mut users = self.users.lock().unwrap();
        if users.iter().any(|u| u.username == user.username) {
            return Err(ApiError::Backend {
                status: 400,
                message: "Username already exists".to_string(),
            });
        }
        let id = users.iter().map(|u| u.id).max().unwrap_or(0) + 1;
        users.push(User {
            id,
            username: user.username.clone(),
            email: user.email.clone(),
            is_admin: user.is_admin,
            created_at: None,
        });
        Ok(Self::ok("User created successfully"))
    }

    async fn delete_user(&self, id: i64) -> Result<MessageResponse, ApiError> {
        self.require_session()?;
        self.users.lock().unwrap().retain(|u| u.id != id);
        Ok(Self::ok("User deleted successfully"))
    }

    async fn change_password(&self, change: &PasswordChange) -> Result<MessageResponse, ApiError> {
        self.require_session()?;
        if change.current_password != ADMIN_PASSWORD {
            return Err(ApiError::Backend {
                status: 400,
                message: "Current password is incorrect".to_string(),
            });
        }
        Ok(Self::ok("Password changed successfully"))
    }
}
