pub mod admin;
pub mod health;
pub mod pages;
pub mod session;
pub mod validation;

use actix_web::http::header::ContentType;
use actix_web::{web, HttpResponse};

use crate::controller::Outcome;
use crate::render::render_page;
use session::Visitor;

/// Render the visitor's page for the state a dispatch left behind
///
/// Only a missing job changes the status; every other outcome is already
/// explained by the notice on the page.
pub async fn respond(visitor: &Visitor, outcome: Outcome) -> HttpResponse {
    let controller = visitor.controller();
    let mode = controller.mode();
    let html = controller.present(|state| render_page(state, mode)).await;

    let mut response = match outcome {
        Outcome::NotFound(_) => HttpResponse::NotFound(),
        _ => HttpResponse::Ok(),
    };
    visitor.remember(&mut response);
    response.content_type(ContentType::html()).body(html)
}

/// Every page, admin and probe route
pub fn routes_config(config: &mut web::ServiceConfig) {
    config
        .configure(health::health_config)
        .configure(pages::pages_config)
        .configure(admin::admin_config);
}
