pub mod backend;
pub mod dto;
pub mod static_file;

#[cfg(test)]
pub mod fake;

use async_trait::async_trait;
use thiserror::Error;

use crate::jobs::models::{Credentials, NewJob, NewUser, PasswordChange, User};
use crate::jobs::Job;
use dto::{ExportResponse, JobQuery, LoginResponse, MessageResponse};

pub use backend::BackendClient;
pub use static_file::StaticJobs;

/// Failures talking to the backend or reading the bundled job file
#[derive(Debug, Error)]
pub enum ApiError {
    /// Request never got a response
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Response received with an error status; `message` is the body's `error`
    #[error("{message}")]
    Backend { status: u16, message: String },

    #[error("Job not found: {0}")]
    NotFound(i64),

    #[error("Failed to read jobs file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid jobs data: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Invalid backend URL: {0}")]
    Url(String),

    #[error("Admin features are not available in static mode")]
    Unsupported,
}

impl ApiError {
    pub fn is_network(&self) -> bool {
        matches!(self, ApiError::Network(_))
    }

    /// Text shown to the user: backend messages verbatim, `fallback` otherwise
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            ApiError::Backend { message, .. } if !message.is_empty() => message.clone(),
            ApiError::Unsupported => self.to_string(),
            _ => fallback.to_string(),
        }
    }
}

/// Public job endpoints
#[async_trait]
pub trait JobsApi: Send + Sync {
    async fn list_jobs(&self, query: &JobQuery) -> Result<Vec<Job>, ApiError>;

    async fn get_job(&self, id: i64) -> Result<Job, ApiError>;
}

/// Session-authenticated admin endpoints
#[async_trait]
pub trait AdminApi: Send + Sync {
    async fn login(&self, credentials: &Credentials) -> Result<LoginResponse, ApiError>;

    async fn logout(&self) -> Result<MessageResponse, ApiError>;

    async fn create_job(&self, job: &NewJob) -> Result<MessageResponse, ApiError>;

    async fn delete_job(&self, id: i64) -> Result<MessageResponse, ApiError>;

    async fn export_excel(&self) -> Result<ExportResponse, ApiError>;

    async fn list_users(&self) -> Result<Vec<User>, ApiError>;

    async fn create_user(&self, user: &NewUser) -> Result<MessageResponse, ApiError>;

    async fn delete_user(&self, id: i64) -> Result<MessageResponse, ApiError>;

    async fn change_password(&self, change: &PasswordChange) -> Result<MessageResponse, ApiError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_messages_are_surfaced_verbatim() {
        let err = ApiError::Backend {
            status: 401,
            message: "Invalid credentials".into(),
        };
        assert_eq!(err.user_message("Login failed"), "Invalid credentials");

        let err = ApiError::Backend {
            status: 500,
            message: String::new(),
        };
        assert_eq!(err.user_message("Login failed"), "Login failed");
        assert_eq!(ApiError::NotFound(3).user_message("Job not found"), "Job not found");
    }
}
