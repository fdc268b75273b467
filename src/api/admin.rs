use actix_web::{get, post, web, Responder};
use actix_web_validator::Form;

use super::respond;
use super::session::Visitor;
use crate::controller::{Action, Section};
use crate::jobs::models::{Credentials, NewJob, NewUser, PasswordChange};

#[get("")]
async fn admin_home(visitor: Visitor) -> impl Responder {
    let outcome = visitor.controller().dispatch(Action::ShowSection(Section::Admin)).await;
    respond(&visitor, outcome).await
}

#[post("/login")]
async fn login(visitor: Visitor, credentials: Form<Credentials>) -> impl Responder {
    let outcome = visitor.controller().dispatch(Action::Login(credentials.into_inner())).await;
    respond(&visitor, outcome).await
}

#[post("/logout")]
async fn logout(visitor: Visitor) -> impl Responder {
    let outcome = visitor.controller().dispatch(Action::Logout).await;
    respond(&visitor, outcome).await
}

#[post("/jobs")]
async fn submit_job(visitor: Visitor, job: Form<NewJob>) -> impl Responder {
    let outcome = visitor.controller().dispatch(Action::SubmitJob(job.into_inner())).await;
    respond(&visitor, outcome).await
}

#[post("/jobs/{id}/delete")]
async fn delete_job(visitor: Visitor, path: web::Path<i64>) -> impl Responder {
    let outcome = visitor.controller().dispatch(Action::DeleteJob(path.into_inner())).await;
    respond(&visitor, outcome).await
}

#[post("/export")]
async fn export_excel(visitor: Visitor) -> impl Responder {
    let outcome = visitor.controller().dispatch(Action::ExportExcel).await;
    respond(&visitor, outcome).await
}

#[get("/users")]
async fn users(visitor: Visitor) -> impl Responder {
    let outcome = visitor.controller().dispatch(Action::LoadUsers).await;
    respond(&visitor, outcome).await
}

#[post("/users")]
async fn create_user(visitor: Visitor, user: Form<NewUser>) -> impl Responder {
    let outcome = visitor.controller().dispatch(Action::CreateUser(user.into_inner())).await;
    respond(&visitor, outcome).await
}

#[post("/users/{id}/delete")]
async fn delete_user(visitor: Visitor, path: web::Path<i64>) -> impl Responder {
    let outcome = visitor.controller().dispatch(Action::DeleteUser(path.into_inner())).await;
    respond(&visitor, outcome).await
}

#[post("/change-password")]
async fn change_password(visitor: Visitor, change: Form<PasswordChange>) -> impl Responder {
    let outcome = visitor.controller().dispatch(Action::ChangePassword(change.into_inner())).await;
    respond(&visitor, outcome).await
}

fn get_scope() -> actix_web::Scope {
    web::scope("/admin")
        .service(admin_home)
        .service(login)
        .service(logout)
        .service(submit_job)
        .service(delete_job)
        .service(export_excel)
        .service(users)
        .service(create_user)
        .service(delete_user)
        .service(change_password)
}

pub fn admin_config(config: &mut web::ServiceConfig) {
    config.service(get_scope());
}
