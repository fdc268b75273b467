use reqwest::Url;
use v_htmlescape::escape;

use crate::jobs::{dates, Job};

pub const DESCRIPTION_PREVIEW_CHARS: usize = 150;
const ELLIPSIS: &str = "...";

/// First 150 characters of the description, with `...` appended when cut
pub fn truncate_description(description: &str) -> String {
    if description.is_empty() {
        return "No description available".to_string();
    }

    match description.char_indices().nth(DESCRIPTION_PREVIEW_CHARS) {
        Some((cut, _)) => format!("{}{}", &description[..cut], ELLIPSIS),
        None => description.to_string(),
    }
}

pub fn posted_label(job: &Job) -> String {
    job.posted_date()
        .map(dates::display)
        .unwrap_or_else(|| "Recently".to_string())
}

pub fn deadline_label(job: &Job) -> String {
    job.deadline()
        .map(dates::display)
        .unwrap_or_else(|| "Not specified".to_string())
}

/// Escape, then turn newlines into `<br>`
fn multiline(text: &str) -> String {
    escape(text).to_string().replace('\n', "<br>")
}

/// Only web and mail links are allowed into an `href`
fn safe_link(raw: &str) -> Option<Url> {
    Url::parse(raw)
        .ok()
        .filter(|url| matches!(url.scheme(), "http" | "https" | "mailto"))
}

/// Summary card used in the listing and the recent jobs strip
pub fn render_summary(job: &Job) -> String {
    let salary = job
        .salary()
        .map(|salary| {
            format!(
                r#"<span class="meta-salary">{}</span>"#,
                escape(salary)
            )
        })
        .unwrap_or_default();

    format!(
        r#"<a class="job-card" href="/jobs/{id}" data-job-id="{id}">
    <div class="job-header">
        <div>
            <h3 class="job-title">{title}</h3>
            <p class="job-company">{company}</p>
        </div>
        <span class="job-category">{category}</span>
    </div>
    <div class="job-meta">
        <span class="meta-location">{location}</span>
        <span class="meta-type">{job_type}</span>
        <span class="meta-experience">{experience}</span>
        {salary}
    </div>
    <div class="job-description">{description}</div>
    <div class="job-footer">
        <span>Posted: {posted}</span>
        <span class="view-details">Click to view details</span>
    </div>
</a>
"#,
        id = job.id,
        title = escape(&job.title),
        company = escape(&job.company),
        category = escape(&job.category),
        location = escape(&job.location),
        job_type = escape(job.job_type()),
        experience = escape(job.experience()),
        salary = salary,
        description = escape(&truncate_description(&job.description)),
        posted = escape(&posted_label(job)),
    )
}

/// Full detail view of a single job
pub fn render_detail(job: &Job) -> String {
    let salary = job
        .salary()
        .map(|salary| {
            format!(
                r#"<div class="job-details-meta-item meta-salary"><span>{}</span></div>"#,
                escape(salary)
            )
        })
        .unwrap_or_default();

    let requirements = job
        .requirements()
        .map(|requirements| {
            format!(
                r#"<div class="job-details-section">
        <h3>Requirements</h3>
        <p>{}</p>
    </div>"#,
                multiline(requirements)
            )
        })
        .unwrap_or_default();

    let contact = job
        .contact_email()
        .map(|email| format!("<p><strong>Contact:</strong> {}</p>", escape(email)))
        .unwrap_or_default();

    let action = match job.application_url().and_then(safe_link) {
        Some(url) => format!(
            r#"<a href="{}" target="_blank" rel="noopener noreferrer" class="btn primary-btn">Apply Now</a>"#,
            escape(url.as_str())
        ),
        None => r#"<p class="contact-employer">Contact Employer: use the contact information provided above</p>"#
            .to_string(),
    };

    format!(
        r#"<div class="job-details-card" data-job-id="{id}">
    <div class="job-details-header">
        <h1 class="job-details-title">{title}</h1>
        <p class="job-details-company">{company}</p>
        <div class="job-details-meta">
            <div class="job-details-meta-item meta-location"><span>{location}</span></div>
            <div class="job-details-meta-item meta-type"><span>{job_type}</span></div>
            <div class="job-details-meta-item meta-experience"><span>{experience}</span></div>
            <div class="job-details-meta-item meta-category"><span>{category}</span></div>
            {salary}
            <div class="job-details-meta-item meta-posted"><span>Posted: {posted}</span></div>
        </div>
    </div>
    <div class="job-details-section">
        <h3>Job Description</h3>
        <p>{description}</p>
    </div>
    {requirements}
    <div class="job-apply-section">
        <h3>Application Details</h3>
        <p><strong>Deadline:</strong> {deadline}</p>
        {contact}
        <div class="job-actions">
            {action}
            <a class="btn secondary-btn" href="/jobs">Back to Jobs</a>
        </div>
    </div>
</div>
"#,
        id = job.id,
        title = escape(&job.title),
        company = escape(&job.company),
        location = escape(&job.location),
        job_type = escape(job.job_type()),
        experience = escape(job.experience()),
        category = escape(&job.category),
        salary = salary,
        posted = escape(&posted_label(job)),
        description = multiline(&job.description),
        requirements = requirements,
        deadline = escape(&deadline_label(job)),
        contact = contact,
        action = action,
    )
}

/// The jobs listing, or the explicit "no jobs" placeholder
pub fn render_listing(jobs: &[Job]) -> String {
    if jobs.is_empty() {
        return r#"<p id="no-jobs-message" class="no-jobs">No jobs found matching your criteria</p>"#
            .to_string();
    }
    jobs.iter().map(render_summary).collect()
}

pub fn render_recent(jobs: &[Job]) -> String {
    if jobs.is_empty() {
        return r#"<p class="no-jobs">No recent jobs available</p>"#.to_string();
    }
    jobs.iter().map(render_summary).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jobs::filter::tests::job;

    #[test]
    fn script_title_is_rendered_as_text() {
        let mut hostile = job(1, "<script>alert(1)</script>", "Tech", Some("2024-01-01"));
        hostile.company = r#""><img src=x onerror=alert(1)>"#.to_string();
        hostile.salary = Some("<b>lots</b>".to_string());

        for html in [render_summary(&hostile), render_detail(&hostile)] {
            assert!(!html.contains("<script>"));
            assert!(!html.contains("<img"));
            assert!(!html.contains("<b>"));
            assert!(html.contains("&lt;script&gt;alert(1)&lt;"));
        }
    }

    #[test]
    fn long_description_is_cut_at_150_characters() {
        let description = "x".repeat(200);
        let preview = truncate_description(&description);
        assert_eq!(preview, format!("{}...", "x".repeat(150)));
    }

    #[test]
    fn short_description_is_untouched() {
        let description = "y".repeat(100);
        assert_eq!(truncate_description(&description), description);

        let exact = "z".repeat(150);
        assert_eq!(truncate_description(&exact), exact);
    }

    #[test]
    fn truncation_counts_characters_not_bytes() {
        let description = "é".repeat(151);
        let preview = truncate_description(&description);
        assert_eq!(preview.chars().count(), 153);
        assert!(preview.ends_with("é..."));
    }

    #[test]
    fn summary_shows_defaults_and_posted_date() {
        let html = render_summary(&job(3, "Engineer", "Tech", Some("2024-06-01")));
        assert!(html.contains(r#"href="/jobs/3""#));
        assert!(html.contains("Full-time"));
        assert!(html.contains("Entry Level"));
        assert!(html.contains("Posted: Jun 1, 2024"));
        assert!(!html.contains("meta-salary"));

        let undated = render_summary(&job(4, "Engineer", "Tech", None));
        assert!(undated.contains("Posted: Recently"));
    }

    #[test]
    fn detail_renders_newlines_and_apply_link() {
        let mut full = job(9, "Engineer", "Tech", Some("2024-06-01"));
        full.description = "Line one\nLine <two>".to_string();
        full.requirements = Some("Rust\nSQL".to_string());
        full.application_url = Some("https://jobs.example.com/apply?id=9&src=board".to_string());
        full.contact_email = Some("hr@example.com".to_string());
        full.deadline = Some("2024-07-15".to_string());

        let html = render_detail(&full);
        assert!(html.contains("Line one<br>Line &lt;two&gt;"));
        assert!(html.contains("Rust<br>SQL"));
        assert!(html.contains("Apply Now"));
        assert!(html.contains("id=9&amp;src=board"));
        assert!(html.contains("hr@example.com"));
        assert!(html.contains("Jul 15, 2024"));
        assert!(!html.contains("Contact Employer"));
    }

    #[test]
    fn detail_without_url_prompts_for_contact() {
        let html = render_detail(&job(2, "Nurse", "Health", None));
        assert!(html.contains("Contact Employer"));
        assert!(html.contains("Not specified"));
        assert!(!html.contains("Requirements"));
    }

    #[test]
    fn script_urls_never_become_links() {
        let mut sneaky = job(5, "Engineer", "Tech", None);
        sneaky.application_url = Some("javascript:alert(1)".to_string());
        let html = render_detail(&sneaky);
        assert!(!html.contains("javascript:"));
        assert!(html.contains("Contact Employer"));
    }

    #[test]
    fn rendering_is_reproducible() {
        let j = job(1, "Engineer", "Tech", Some("2024-01-01"));
        assert_eq!(render_summary(&j), render_summary(&j));
        assert_eq!(render_detail(&j), render_detail(&j));
    }

    #[test]
    fn empty_lists_render_placeholders() {
        assert!(render_listing(&[]).contains("no-jobs-message"));
        assert!(render_recent(&[]).contains("No recent jobs available"));
    }
}
