use actix_web::cookie::{Cookie, SameSite};
use actix_web::dev::Payload;
use actix_web::{error, web, FromRequest, HttpRequest, HttpResponseBuilder};
use futures_util::future::LocalBoxFuture;
use tracing::error;
use uuid::Uuid;

use crate::controller::sessions::Visit;
use crate::controller::{SessionRegistry, ViewController};

pub const SESSION_COOKIE: &str = "job_board_session";

/// The calling visitor's controller, resolved from the session cookie
///
/// A missing, malformed or expired cookie opens a new session; the response
/// then carries the new cookie.
pub struct Visitor(Visit);

impl Visitor {
    pub fn controller(&self) -> &ViewController {
        &self.0.controller
    }

    /// Set the session cookie when this request opened the session
    pub fn remember(&self, response: &mut HttpResponseBuilder) {
        if self.0.is_new {
            response.cookie(
                Cookie::build(SESSION_COOKIE, self.0.id.to_string())
                    .path("/")
                    .http_only(true)
                    .same_site(SameSite::Lax)
                    .finish(),
            );
        }
    }
}

impl FromRequest for Visitor {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let registry = req.app_data::<web::Data<SessionRegistry>>().cloned();
        let id = req
            .cookie(SESSION_COOKIE)
            .and_then(|cookie| cookie.value().parse::<Uuid>().ok());

        Box::pin(async move {
            let registry = registry
                .ok_or_else(|| error::ErrorInternalServerError("Session registry is not configured"))?;
            let visit = registry.visit(id).await.map_err(|e| {
                error!("Failed to open visitor session: {}", e);
                error::ErrorServiceUnavailable("Job source unavailable")
            })?;
            Ok(Visitor(visit))
        })
    }
}
