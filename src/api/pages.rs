use actix_web::http::header::ContentType;
use actix_web::{get, post, web, HttpResponse, Responder};
use actix_web_validator::Form;
use serde::Deserialize;
use tracing::debug;

use super::respond;
use super::session::Visitor;
use crate::controller::{Action, Outcome, Section};
use crate::jobs::models::ContactMessage;
use crate::jobs::{CategoryFilter, DateOrder};
use crate::render::{render_listing, render_notice_fragment};

/// Filter controls as submitted by the jobs form
#[derive(Debug, Default, Deserialize)]
pub struct JobsQuery {
    pub search: Option<String>,
    pub category: Option<String>,
    pub order: Option<DateOrder>,
}

impl JobsQuery {
    fn is_empty(&self) -> bool {
        self.search.is_none() && self.category.is_none() && self.order.is_none()
    }
}

#[derive(Debug, Deserialize)]
pub struct LiveQuery {
    #[serde(default)]
    pub search: String,
}

#[get("/")]
async fn home(visitor: Visitor) -> impl Responder {
    let outcome = visitor.controller().dispatch(Action::ShowSection(Section::Home)).await;
    respond(&visitor, outcome).await
}

/// Jobs tab; any submitted control overrides the current criteria
#[get("/jobs")]
async fn jobs(visitor: Visitor, query: web::Query<JobsQuery>) -> impl Responder {
    let query = query.into_inner();
    if query.is_empty() {
        let outcome = visitor.controller().dispatch(Action::ShowSection(Section::Jobs)).await;
        return respond(&visitor, outcome).await;
    }

    let mut criteria = visitor.controller().inspect(|state| state.criteria.clone()).await;
    if let Some(search) = query.search {
        criteria.search = search;
    }
    if let Some(category) = query.category {
        criteria.category = CategoryFilter::from(category);
    }
    if let Some(order) = query.order {
        criteria.order = order;
    }

    let outcome = visitor.controller().dispatch(Action::ApplyFilter(criteria)).await;
    respond(&visitor, outcome).await
}

/// Search-as-you-type; superseded keystrokes answer 204
#[get("/jobs/live")]
async fn live_search(visitor: Visitor, query: web::Query<LiveQuery>) -> impl Responder {
    let controller = visitor.controller();
    let (outcome, listing) = controller.live_search(query.into_inner().search).await;

    let mut response = match outcome {
        Outcome::Discarded => HttpResponse::NoContent(),
        Outcome::Applied => HttpResponse::Ok(),
        _ => HttpResponse::BadGateway(),
    };
    visitor.remember(&mut response);

    match outcome {
        Outcome::Discarded => {
            debug!("Live search superseded");
            response.finish()
        }
        Outcome::Applied => response
            .content_type(ContentType::html())
            .body(render_listing(&listing)),
        _ => {
            let html = controller
                .present(|state| {
                    state
                        .notice
                        .as_ref()
                        .map(render_notice_fragment)
                        .unwrap_or_default()
                })
                .await;
            response.content_type(ContentType::html()).body(html)
        }
    }
}

#[get("/jobs/reset")]
async fn reset(visitor: Visitor) -> impl Responder {
    let outcome = visitor.controller().dispatch(Action::ResetFilters).await;
    respond(&visitor, outcome).await
}

#[get("/jobs/{id}")]
async fn job_details(visitor: Visitor, path: web::Path<i64>) -> impl Responder {
    let outcome = visitor.controller().dispatch(Action::SelectJob(path.into_inner())).await;
    respond(&visitor, outcome).await
}

#[get("/contact")]
async fn contact(visitor: Visitor) -> impl Responder {
    let outcome = visitor.controller().dispatch(Action::ShowSection(Section::Contact)).await;
    respond(&visitor, outcome).await
}

#[post("/contact")]
async fn submit_contact(visitor: Visitor, message: Form<ContactMessage>) -> impl Responder {
    let outcome = visitor.controller().dispatch(Action::SubmitContact(message.into_inner())).await;
    respond(&visitor, outcome).await
}

pub fn pages_config(config: &mut web::ServiceConfig) {
    config
        .service(home)
        .service(jobs)
        .service(live_search)
        .service(reset)
        .service(job_details)
        .service(contact)
        .service(submit_contact);
}
