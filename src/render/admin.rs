use v_htmlescape::escape;

use super::cards::posted_label;
use crate::jobs::{dates, models::User, Job};

pub fn render_admin_jobs(jobs: &[Job]) -> String {
    if jobs.is_empty() {
        return r#"<p class="no-jobs">No jobs posted yet</p>"#.to_string();
    }

    jobs.iter()
        .map(|job| {
            format!(
                r#"<div class="admin-job-card">
    <div class="admin-job-header">
        <div>
            <h4>{title}</h4>
            <p>{company} - {location}</p>
            <small>Posted: {posted} | Category: {category}</small>
        </div>
        <form class="admin-job-actions" method="post" action="/admin/jobs/{id}/delete">
            <button type="submit" class="delete-btn">Delete</button>
        </form>
    </div>
</div>
"#,
                id = job.id,
                title = escape(&job.title),
                company = escape(&job.company),
                location = escape(&job.location),
                posted = escape(&posted_label(job)),
                category = escape(&job.category),
            )
        })
        .collect()
}

pub fn render_users(users: &[User]) -> String {
    if users.is_empty() {
        return r#"<p class="no-users">No users found</p>"#.to_string();
    }

    users
        .iter()
        .map(|user| {
            let badge = if user.is_admin {
                r#"<span class="admin-status">Admin</span>"#
            } else {
                r#"<span class="user-status">User</span>"#
            };
            let created = user
                .created_at
                .as_deref()
                .filter(|raw| !raw.is_empty())
                .map(dates::display)
                .unwrap_or_else(|| "Unknown".to_string());

            format!(
                r#"<div class="admin-user-card">
    <div class="admin-user-header">
        <div>
            <h4>{username} {badge}</h4>
            <p>Email: {email}</p>
            <small>Created: {created}</small>
        </div>
        <form class="admin-user-actions" method="post" action="/admin/users/{id}/delete">
            <button type="submit" class="delete-btn">Delete</button>
        </form>
    </div>
</div>
"#,
                id = user.id,
                username = escape(&user.username),
                badge = badge,
                email = escape(&user.email),
                created = escape(&created),
            )
        })
        .collect()
}
