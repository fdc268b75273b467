use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode, Url};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, warn};

use super::dto::{ChangePasswordRequest, ErrorBody, ExportResponse, JobQuery, LoginResponse, MessageResponse};
use super::{AdminApi, ApiError, JobsApi};
use crate::jobs::models::{Credentials, NewJob, NewUser, PasswordChange, User};
use crate::jobs::Job;

/// HTTP client for the job-board REST backend
///
/// The cookie store keeps the admin session established by `login` for
/// every later admin call made through the same client. Each visitor gets
/// its own client, so the session never crosses visitors.
#[derive(Clone)]
pub struct BackendClient {
    http: Client,
    base_url: Url,
}

impl BackendClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let http = Client::builder()
            .cookie_store(true)
            .timeout(timeout)
            .build()?;
        Self::with_client(http, base_url)
    }

    pub fn with_client(http: Client, base_url: &str) -> Result<Self, ApiError> {
        let mut normalized = base_url.trim().to_string();
        if !normalized.ends_with('/') {
            normalized.push('/');
        }
        let base_url = Url::parse(&normalized).map_err(|e| ApiError::Url(format!("{}: {}", base_url, e)))?;
        Ok(Self { http, base_url })
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        self.base_url
            .join(path)
            .map_err(|e| ApiError::Url(format!("{}: {}", path, e)))
    }

    /// Send the request and decode a success body or the backend's error string
    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        let response = request.send().await?;
        let status = response.status();
        let raw = response.bytes().await?;

        // A body that is not the expected JSON is an application failure
        if status.is_success() {
            return Ok(serde_json::from_slice::<T>(&raw)?);
        }

        let message = match serde_json::from_slice::<ErrorBody>(&raw) {
            Ok(body) => body.error,
            Err(_) => status.canonical_reason().unwrap_or("Request failed").to_string(),
        };
        warn!("Backend returned {}: {}", status, message);

        Err(ApiError::Backend {
            status: status.as_u16(),
            message,
        })
    }
}

#[async_trait]
impl JobsApi for BackendClient {
    async fn list_jobs(&self, query: &JobQuery) -> Result<Vec<Job>, ApiError> {
        debug!("Fetching jobs: {:?}", query);
        let url = self.endpoint("api/jobs")?;
        self.send(self.http.get(url).query(query)).await
    }

    async fn get_job(&self, id: i64) -> Result<Job, ApiError> {
        debug!("Fetching job id={}", id);
        let url = self.endpoint(&format!("api/jobs/{}", id))?;
        match self.send(self.http.get(url)).await {
            Err(ApiError::Backend { status, .. }) if status == StatusCode::NOT_FOUND.as_u16() => {
                Err(ApiError::NotFound(id))
            }
            other => other,
        }
    }
}

#[async_trait]
impl AdminApi for BackendClient {
    async fn login(&self, credentials: &Credentials) -> Result<LoginResponse, ApiError> {
        debug!("Logging in as {}", credentials.username);
        let url = self.endpoint("api/admin/login")?;
        self.send(self.http.post(url).json(credentials)).await
    }

    async fn logout(&self) -> Result<MessageResponse, ApiError> {
        let url = self.endpoint("api/admin/logout")?;
        self.send(self.http.post(url)).await
    }

    async fn create_job(&self, job: &NewJob) -> Result<MessageResponse, ApiError> {
        debug!("Posting job: title={}", job.title);
        let url = self.endpoint("api/admin/jobs")?;
        self.send(self.http.post(url).json(job)).await
    }

    async fn delete_job(&self, id: i64) -> Result<MessageResponse, ApiError> {
        debug!("Deleting job id={}", id);
        let url = self.endpoint(&format!("api/admin/jobs/{}", id))?;
        self.send(self.http.delete(url)).await
    }

    async fn export_excel(&self) -> Result<ExportResponse, ApiError> {
        let url = self.endpoint("api/export/excel")?;
        self.send(self.http.get(url)).await
    }

    async fn list_users(&self) -> Result<Vec<User>, ApiError> {
        let url = self.endpoint("api/admin/users")?;
        self.send(self.http.get(url)).await
    }

    async fn create_user(&self, user: &NewUser) -> Result<MessageResponse, ApiError> {
        debug!("Creating user: username={}", user.username);
        let url = self.endpoint("api/admin/users")?;
        self.send(self.http.post(url).json(user)).await
    }

    async fn delete_user(&self, id: i64) -> Result<MessageResponse, ApiError> {
        debug!("Deleting user id={}", id);
        let url = self.endpoint(&format!("api/admin/users/{}", id))?;
        self.send(self.http.delete(url)).await
    }

    async fn change_password(&self, change: &PasswordChange) -> Result<MessageResponse, ApiError> {
        let url = self.endpoint("api/admin/change-password")?;
        let body = ChangePasswordRequest {
            current_password: &change.current_password,
            new_password: &change.new_password,
        };
        self.send(self.http.post(url).json(&body)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::cookie::Cookie;
    use actix_web::{web, App, HttpRequest, HttpResponse, HttpServer};
    use serde_json::json;

    use crate::jobs::filter::tests::job;

    const SESSION_COOKIE: &str = "session";

    async fn login(body: web::Json<serde_json::Value>) -> HttpResponse {
        if body["password"] == "admin123" {
            HttpResponse::Ok()
                .cookie(Cookie::new(SESSION_COOKIE, "admin"))
                .json(json!({"success": true, "message": "Login successful"}))
        } else {
            HttpResponse::Unauthorized().json(json!({"error": "Invalid credentials"}))
        }
    }

    async fn users(req: HttpRequest) -> HttpResponse {
        match req.cookie(SESSION_COOKIE) {
            Some(_) => HttpResponse::Ok().json(json!([
                {"id": 1, "username": "admin", "email": "a@x.io", "is_admin": true}
            ])),
            None => HttpResponse::Unauthorized().json(json!({"error": "Admin authentication required"})),
        }
    }

    async fn job_by_id(path: web::Path<i64>) -> HttpResponse {
        match path.into_inner() {
            1 => HttpResponse::Ok().json(job(1, "Engineer", "Tech", Some("2024-01-01"))),
            _ => HttpResponse::NotFound().json(json!({"error": "Job not found"})),
        }
    }

    /// REST backend stand-in on an ephemeral port; returns its base URL
    fn spawn_backend() -> String {
        let server = HttpServer::new(|| {
            App::new()
                .route(
                    "/api/jobs",
                    web::get().to(|| async {
                        HttpResponse::Ok().json(vec![job(1, "Engineer", "Tech", Some("2024-01-01"))])
                    }),
                )
                .route("/api/jobs/{id}", web::get().to(job_by_id))
                .route("/api/admin/login", web::post().to(login))
                .route("/api/admin/users", web::get().to(users))
                .route(
                    "/api/admin/jobs",
                    web::post().to(|| async {
                        HttpResponse::BadRequest().json(json!({"error": "Title is required"}))
                    }),
                )
                .route(
                    "/api/admin/jobs/{id}",
                    web::delete().to(|| async {
                        HttpResponse::Ok().content_type("text/html").body("<html>deleted</html>")
                    }),
                )
                .route(
                    "/api/export/excel",
                    web::get().to(|| async { HttpResponse::InternalServerError().body("boom") }),
                )
        })
        .workers(1)
        .disable_signals()
        .bind(("127.0.0.1", 0))
        .unwrap();

        let addr = server.addrs()[0];
        actix_web::rt::spawn(server.run());
        format!("http://{}", addr)
    }

    fn client(base: &str) -> BackendClient {
        BackendClient::new(base, Duration::from_secs(5)).unwrap()
    }

    #[actix_web::test]
    async fn decodes_success_bodies() {
        let backend = client(&spawn_backend());

        let jobs = backend.list_jobs(&JobQuery::default()).await.unwrap();
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].title, "Engineer");

        let detail = backend.get_job(1).await.unwrap();
        assert_eq!(detail.id, 1);
    }

    #[actix_web::test]
    async fn error_statuses_become_application_errors() {
        let backend = client(&spawn_backend());

        assert!(matches!(backend.get_job(42).await, Err(ApiError::NotFound(42))));

        match backend.create_job(&NewJob::default()).await {
            Err(ApiError::Backend { status, message }) => {
                assert_eq!(status, 400);
                assert_eq!(message, "Title is required");
            }
            other => panic!("expected backend error, got {:?}", other.map(|r| r.message)),
        }

        // Plain-text error bodies fall back to the status reason
        match backend.export_excel().await {
            Err(ApiError::Backend { status, message }) => {
                assert_eq!(status, 500);
                assert_eq!(message, "Internal Server Error");
            }
            other => panic!("expected backend error, got {:?}", other.map(|r| r.file_path)),
        }
    }

    #[actix_web::test]
    async fn malformed_success_body_is_not_a_network_error() {
        let backend = client(&spawn_backend());

        let err = backend.delete_job(3).await.unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
        assert!(!err.is_network());
        assert_eq!(err.user_message("Failed to delete job"), "Failed to delete job");
    }

    #[actix_web::test]
    async fn refused_connection_is_a_network_error() {
        let port = std::net::TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap()
            .port();
        let backend = client(&format!("http://127.0.0.1:{}", port));

        let err = backend.list_jobs(&JobQuery::default()).await.unwrap_err();
        assert!(err.is_network());
    }

    #[actix_web::test]
    async fn each_client_keeps_its_own_session_cookie() {
        let base = spawn_backend();
        let admin = client(&base);
        let visitor = client(&base);

        let rejected = admin.login(&Credentials::new("admin", "wrong")).await.unwrap_err();
        assert_eq!(rejected.user_message("Login failed"), "Invalid credentials");

        let response = admin.login(&Credentials::new("admin", "admin123")).await.unwrap();
        assert!(response.success);
        assert_eq!(admin.list_users().await.unwrap().len(), 1);

        match visitor.list_users().await {
            Err(ApiError::Backend { status, .. }) => assert_eq!(status, 401),
            other => panic!("expected 401, got {:?}", other.map(|users| users.len())),
        }
    }

    #[test]
    fn endpoints_resolve_against_base_with_or_without_slash() {
        for base in ["http://localhost:5000", "http://localhost:5000/"] {
            let client = BackendClient::new(base, Duration::from_secs(1)).unwrap();
            assert_eq!(
                client.endpoint("api/jobs/4").unwrap().as_str(),
                "http://localhost:5000/api/jobs/4"
            );
        }

        let nested = BackendClient::new("https://example.com/board", Duration::from_secs(1)).unwrap();
        assert_eq!(
            nested.endpoint("api/admin/login").unwrap().as_str(),
            "https://example.com/board/api/admin/login"
        );
    }

    #[test]
    fn rejects_invalid_base_url() {
        assert!(matches!(
            BackendClient::new("not a url", Duration::from_secs(1)),
            Err(ApiError::Url(_))
        ));
    }
}
