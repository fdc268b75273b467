use url::form_urlencoded;
use v_htmlescape::escape;

use super::admin::{render_admin_jobs, render_users};
use super::cards::{render_detail, render_listing, render_recent};
use crate::config::DataMode;
use crate::controller::{Notice, Section, ViewState};
use crate::jobs::{CategoryFilter, DateOrder};

/// Keystrokes in the search box go to `/jobs/live`; only a 200 replaces the list
const LIVE_SEARCH_SCRIPT: &str = r#"<script>
(function () {
    var input = document.getElementById('search-input');
    var list = document.getElementById('jobs-list');
    if (!input || !list) { return; }
    input.addEventListener('input', function () {
        fetch('/jobs/live?search=' + encodeURIComponent(input.value))
            .then(function (response) {
                if (response.status !== 200) { return null; }
                return response.text();
            })
            .then(function (html) {
                if (html !== null) { list.innerHTML = html; }
            })
            .catch(function () {});
    });
})();
</script>"#;

/// Whole page for the current view state
pub fn render_page(state: &ViewState, mode: DataMode) -> String {
    let sections: String = Section::ALL
        .iter()
        .map(|&section| {
            let body = match section {
                Section::Home => home_section(state),
                Section::Jobs => jobs_section(state),
                Section::JobDetails => details_section(state),
                Section::Admin => admin_section(state, mode),
                Section::Contact => contact_section(),
            };
            format!(
                "<section id=\"{id}\" class=\"section{active}\">\n{body}\n</section>\n",
                id = section.id(),
                active = active(section == state.section),
                body = body,
            )
        })
        .collect();

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <title>Job Board</title>
</head>
<body>
{nav}
{toast}
<main>
{sections}
</main>
{script}
</body>
</html>
"#,
        nav = navigation(state.section, mode),
        toast = state.notice.as_ref().map(render_notice_fragment).unwrap_or_default(),
        sections = sections,
        script = LIVE_SEARCH_SCRIPT,
    )
}

/// Toast markup for a single notice
pub fn render_notice_fragment(notice: &Notice) -> String {
    format!(
        r#"<div id="toast" class="toast {} show" role="status">{}</div>"#,
        notice.level.class(),
        escape(&notice.message)
    )
}

fn active(is_active: bool) -> &'static str {
    if is_active {
        " active"
    } else {
        ""
    }
}

fn selected(is_selected: bool) -> &'static str {
    if is_selected {
        " selected"
    } else {
        ""
    }
}

fn navigation(current: Section, mode: DataMode) -> String {
    let mut links = vec![
        (Section::Home, "/", "Home"),
        (Section::Jobs, "/jobs", "Jobs"),
    ];
    if mode == DataMode::Backed {
        links.push((Section::Admin, "/admin", "Admin"));
    }
    links.push((Section::Contact, "/contact", "Contact"));

    let items: String = links
        .into_iter()
        .map(|(section, href, label)| {
            // The detail view belongs to the jobs tab
            let is_current = section == current
                || (section == Section::Jobs && current == Section::JobDetails);
            format!(
                r#"<li><a class="nav-link{}" href="{}">{}</a></li>"#,
                active(is_current),
                href,
                label
            )
        })
        .collect();

    format!(
        r#"<nav class="navbar"><a class="logo" href="/">Job Board</a><ul class="nav-menu">{}</ul></nav>"#,
        items
    )
}

/// Category shortcuts open the jobs tab with that category selected
fn category_links(state: &ViewState) -> String {
    let links: String = state
        .categories()
        .iter()
        .map(|category| {
            let query: String = form_urlencoded::byte_serialize(category.as_bytes()).collect();
            format!(
                r#"<a class="category-btn" data-section="jobs" data-category="{name}" href="/jobs?category={query}">{name}</a>"#,
                name = escape(category),
                query = query,
            )
        })
        .collect();

    if links.is_empty() {
        return String::new();
    }
    format!(
        r#"<h2>Browse by Category</h2>
<div class="categories">{}</div>"#,
        links
    )
}

fn home_section(state: &ViewState) -> String {
    format!(
        r#"<div class="hero">
    <h1>Find your next job</h1>
    <a class="btn primary-btn" href="/jobs">Browse Jobs</a>
</div>
{}
<h2>Recent Jobs</h2>
<div id="recent-jobs-list" class="jobs-grid">{}</div>"#,
        category_links(state),
        render_recent(&state.recent)
    )
}

fn jobs_section(state: &ViewState) -> String {
    let criteria = &state.criteria;

    let mut categories = format!(
        r#"<option value="all"{}>All Categories</option>"#,
        selected(criteria.category == CategoryFilter::All)
    );
    for category in state.categories() {
        let is_selected = criteria.category.as_query() == Some(category.as_str());
        categories.push_str(&format!(
            r#"<option value="{value}"{selected}>{value}</option>"#,
            value = escape(&category),
            selected = selected(is_selected),
        ));
    }

    let orders: String = [(DateOrder::Newest, "Newest First"), (DateOrder::Oldest, "Oldest First")]
        .iter()
        .map(|(order, label)| {
            format!(
                r#"<option value="{}"{}>{}</option>"#,
                order,
                selected(criteria.order == *order),
                label
            )
        })
        .collect();

    format!(
        r#"<h2>All Jobs</h2>
<form id="job-filters" class="filters" method="get" action="/jobs">
    <input type="text" id="search-input" name="search" placeholder="Search jobs..." value="{search}" autocomplete="off">
    <select id="category-filter" name="category">{categories}</select>
    <select id="date-filter" name="order">{orders}</select>
    <button type="submit" class="btn primary-btn">Filter</button>
    <a class="btn secondary-btn" href="/jobs/reset">Reset</a>
</form>
<div id="jobs-list" class="jobs-grid">{listing}</div>"#,
        search = escape(&criteria.search),
        categories = categories,
        orders = orders,
        listing = render_listing(&state.listing),
    )
}

fn details_section(state: &ViewState) -> String {
    format!(
        r#"<div id="job-details-content">{}</div>"#,
        state.detail.as_ref().map(render_detail).unwrap_or_default()
    )
}

fn admin_section(state: &ViewState, mode: DataMode) -> String {
    if mode == DataMode::Static {
        return r#"<p class="no-jobs">Admin features are not available in static mode</p>"#
            .to_string();
    }
    if !state.admin_logged_in {
        return LOGIN_FORM.to_string();
    }

    format!(
        r#"<div id="admin-panel" class="admin-panel">
    <div class="admin-header">
        <h2>Admin Panel</h2>
        <form method="post" action="/admin/logout"><button type="submit" class="btn secondary-btn">Logout</button></form>
    </div>
    {post_form}
    <div class="admin-jobs">
        <div class="admin-jobs-header">
            <h3>Posted Jobs</h3>
            <form method="post" action="/admin/export"><button type="submit" class="btn secondary-btn">Export to Excel</button></form>
        </div>
        <div id="admin-jobs-list">{admin_jobs}</div>
    </div>
    <div class="admin-users">
        <h3>Users <a class="btn secondary-btn" href="/admin/users">Refresh</a></h3>
        {user_form}
        <div id="users-list">{users}</div>
    </div>
    {password_form}
</div>"#,
        post_form = POST_JOB_FORM,
        admin_jobs = render_admin_jobs(&state.admin_jobs),
        user_form = CREATE_USER_FORM,
        users = render_users(&state.users),
        password_form = CHANGE_PASSWORD_FORM,
    )
}

fn contact_section() -> String {
    CONTACT_FORM.to_string()
}

const LOGIN_FORM: &str = r#"<div id="admin-login" class="admin-login">
    <h2>Admin Login</h2>
    <form id="login-form" method="post" action="/admin/login">
        <input type="text" name="username" placeholder="Username">
        <input type="password" name="password" placeholder="Password">
        <button type="submit" class="btn primary-btn">Login</button>
    </form>
</div>"#;

const POST_JOB_FORM: &str = r#"<form id="job-form" class="job-form" method="post" action="/admin/jobs">
    <h3>Post a New Job</h3>
    <input type="text" name="title" placeholder="Job Title *">
    <input type="text" name="company" placeholder="Company *">
    <input type="text" name="location" placeholder="Location *">
    <input type="text" name="category" placeholder="Category *">
    <select name="job_type">
        <option value="Full-time">Full-time</option>
        <option value="Part-time">Part-time</option>
        <option value="Contract">Contract</option>
        <option value="Internship">Internship</option>
    </select>
    <input type="text" name="experience" placeholder="Experience Level">
    <input type="text" name="salary" placeholder="Salary">
    <textarea name="description" placeholder="Job Description *"></textarea>
    <textarea name="requirements" placeholder="Requirements"></textarea>
    <input type="url" name="application_url" placeholder="Application URL">
    <input type="email" name="contact_email" placeholder="Contact Email">
    <input type="date" name="deadline">
    <button type="submit" class="btn primary-btn">Post Job</button>
</form>"#;

const CREATE_USER_FORM: &str = r#"<form id="user-form" class="user-form" method="post" action="/admin/users">
    <input type="text" name="username" placeholder="Username *">
    <input type="email" name="email" placeholder="Email *">
    <input type="password" name="password" placeholder="Password *">
    <label><input type="checkbox" name="is_admin" value="true"> Admin</label>
    <button type="submit" class="btn primary-btn">Add User</button>
</form>"#;

const CHANGE_PASSWORD_FORM: &str = r#"<div class="admin-password">
    <h3>Change Password</h3>
    <form id="password-form" method="post" action="/admin/change-password">
        <input type="password" name="current_password" placeholder="Current Password">
        <input type="password" name="new_password" placeholder="New Password">
        <input type="password" name="confirm_password" placeholder="Confirm New Password">
        <button type="submit" class="btn primary-btn">Change Password</button>
    </form>
</div>"#;

const CONTACT_FORM: &str = r#"<h2>Contact Us</h2>
<form id="contact-form" class="contact-form" method="post" action="/contact">
    <input type="text" name="name" placeholder="Your Name">
    <input type="email" name="email" placeholder="Your Email">
    <input type="text" name="subject" placeholder="Subject">
    <textarea name="message" placeholder="Your Message"></textarea>
    <button type="submit" class="btn primary-btn">Send Message</button>
</form>"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jobs::filter::tests::job;
    use crate::jobs::FilterCriteria;

    #[test]
    fn only_the_current_section_is_active() {
        let state = ViewState {
            section: Section::Contact,
            ..Default::default()
        };
        let html = render_page(&state, DataMode::Backed);

        assert_eq!(html.matches("class=\"section active\"").count(), 1);
        assert!(html.contains("<section id=\"contact\" class=\"section active\">"));
        assert!(html.contains("<section id=\"jobs\" class=\"section\">"));
    }

    #[test]
    fn filter_controls_reflect_criteria() {
        let state = ViewState {
            section: Section::Jobs,
            criteria: FilterCriteria::default()
                .with_search("<b>rust</b>")
                .with_category("Tech")
                .with_order(DateOrder::Oldest),
            jobs: vec![job(1, "Engineer", "Tech", None), job(2, "Nurse", "Health", None)],
            ..Default::default()
        };
        let html = render_page(&state, DataMode::Static);

        assert!(html.contains("value=\"&lt;b&gt;rust&lt;&#x2f;b&gt;\""));
        assert!(html.contains(r#"<option value="Tech" selected>Tech</option>"#));
        assert!(html.contains(r#"<option value="Health">Health</option>"#));
        assert!(html.contains(r#"<option value="oldest" selected>Oldest First</option>"#));
        assert!(html.contains("No jobs found matching your criteria"));
    }

    #[test]
    fn home_links_each_category_to_the_jobs_filter() {
        let state = ViewState {
            recent: vec![
                job(1, "Engineer", "Tech", None),
                job(2, "Cook", "Food & Drink", None),
                job(3, "Developer", "Tech", None),
            ],
            ..Default::default()
        };
        let html = render_page(&state, DataMode::Backed);

        assert!(html.contains("Browse by Category"));
        assert!(html.contains(
            r#"<a class="category-btn" data-section="jobs" data-category="Tech" href="/jobs?category=Tech">Tech</a>"#
        ));
        assert!(html.contains(r#"data-category="Food &amp; Drink" href="/jobs?category=Food+%26+Drink">"#));
        assert_eq!(html.matches("class=\"category-btn\"").count(), 2);

        let empty = render_page(&ViewState::default(), DataMode::Backed);
        assert!(!empty.contains("Browse by Category"));
    }

    #[test]
    fn notice_is_escaped_into_a_toast() {
        let notice = Notice::error("<img src=x onerror=alert(1)>");
        let html = render_notice_fragment(&notice);
        assert!(html.contains("toast error show"));
        assert!(!html.contains("<img"));
    }

    #[test]
    fn admin_section_depends_on_mode_and_session() {
        let mut state = ViewState::default();
        let html = render_page(&state, DataMode::Backed);
        assert!(html.contains("id=\"login-form\""));
        assert!(html.contains("href=\"/admin\""));

        state.admin_logged_in = true;
        let html = render_page(&state, DataMode::Backed);
        assert!(html.contains("id=\"admin-panel\""));
        assert!(html.contains("No jobs posted yet"));

        let html = render_page(&state, DataMode::Static);
        assert!(!html.contains("id=\"admin-panel\""));
        assert!(!html.contains("href=\"/admin\""));
    }

    #[test]
    fn details_tab_highlights_jobs_navigation() {
        let state = ViewState {
            section: Section::JobDetails,
            detail: Some(job(4, "Welder", "Trades", None)),
            ..Default::default()
        };
        let html = render_page(&state, DataMode::Backed);
        assert!(html.contains(r#"<a class="nav-link active" href="/jobs">Jobs</a>"#));
        assert!(html.contains("data-job-id=\"4\""));
    }
}
