use reqwest::{Client, Url};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::info;

use super::ApiError;
use crate::jobs::Job;

/// Where the bundled `jobs.json` array lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobsLocation {
    File(PathBuf),
    Remote(Url),
}

impl JobsLocation {
    pub fn parse(raw: &str) -> Self {
        match Url::parse(raw) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => JobsLocation::Remote(url),
            _ => JobsLocation::File(PathBuf::from(raw)),
        }
    }
}

/// Read-only job set for static deployments
///
/// Clones share one cache: the file is read by the first successful
/// [`StaticJobs::jobs`] call and every visitor works from that copy.
#[derive(Clone)]
pub struct StaticJobs {
    location: JobsLocation,
    http: Client,
    loaded: Arc<OnceCell<Vec<Job>>>,
}

impl StaticJobs {
    pub fn new(location: JobsLocation, http: Client) -> Self {
        Self {
            location,
            http,
            loaded: Arc::new(OnceCell::new()),
        }
    }

    /// The cached job set; a failed load is retried on the next call
    pub async fn jobs(&self) -> Result<Vec<Job>, ApiError> {
        let jobs = self.loaded.get_or_try_init(|| self.load()).await?;
        Ok(jobs.clone())
    }

    pub async fn load(&self) -> Result<Vec<Job>, ApiError> {
        let jobs: Vec<Job> = match &self.location {
            JobsLocation::File(path) => {
                let raw = tokio::fs::read(path).await?;
                serde_json::from_slice(&raw)?
            }
            JobsLocation::Remote(url) => {
                let response = self.http.get(url.clone()).send().await?;
                let status = response.status();
                if !status.is_success() {
                    return Err(ApiError::Backend {
                        status: status.as_u16(),
                        message: format!("Failed to fetch jobs file: {}", status),
                    });
                }
                let raw = response.bytes().await?;
                serde_json::from_slice(&raw)?
            }
        };

        info!("Loaded {} jobs from {:?}", jobs.len(), self.location);
        Ok(jobs)
    }
}
