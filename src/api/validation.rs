use actix_web::http::header::ContentType;
use actix_web::HttpResponse;
use tracing::warn;

use crate::controller::Notice;
use crate::jobs::models::first_validation_message;
use crate::render::render_notice_fragment;

/// Top-to-bottom field order across every form the board serves
const FORM_FIELD_ORDER: &[&str] = &[
    "title",
    "company",
    "location",
    "category",
    "description",
    "name",
    "username",
    "email",
    "password",
    "current_password",
    "new_password",
    "subject",
    "message",
];

/// Creates a configured FormConfig with standardized error handling for every form
pub fn form_config(limit: usize) -> actix_web_validator::FormConfig {
    actix_web_validator::FormConfig::default()
        .limit(limit)
        .error_handler(|err, req| {
            let message = match err {
                actix_web_validator::Error::Validate(validation_errors) => {
                    first_validation_message(&validation_errors, FORM_FIELD_ORDER)
                }
                other => {
                    warn!("Unreadable form body on {}: {}", req.path(), other);
                    "Invalid form submission".to_string()
                }
            };
            warn!("Form rejected on {}: {}", req.path(), message);

            actix_web::error::InternalError::from_response(
                "",
                HttpResponse::BadRequest()
                    .content_type(ContentType::html())
                    .body(render_notice_fragment(&Notice::error(message))),
            )
            .into()
        })
}

/// Creates a QueryConfig that answers malformed filter parameters with a notice
pub fn query_config() -> actix_web::web::QueryConfig {
    actix_web::web::QueryConfig::default().error_handler(|err, req| {
        warn!("Invalid query on {}: {}", req.path(), err);
        actix_web::error::InternalError::from_response(
            "",
            HttpResponse::BadRequest()
                .content_type(ContentType::html())
                .body(render_notice_fragment(&Notice::error("Invalid filter value"))),
        )
        .into()
    })
}
