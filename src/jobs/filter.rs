//! Filter/sort engine for the job listing
//!
//! Everything here is a pure function of its inputs: the job store is only
//! borrowed and a new sequence is returned.

use chrono::NaiveDateTime;

use super::dates;
use super::models::{CategoryFilter, DateOrder, FilterCriteria, Job};

/// Apply search, category and date order to the job store
pub fn filter_jobs(jobs: &[Job], criteria: &FilterCriteria) -> Vec<Job> {
    let term = criteria.search.to_lowercase();

    let matching: Vec<Job> = jobs
        .iter()
        .filter(|job| matches_search(job, &term))
        .filter(|job| matches_category(job, &criteria.category))
        .cloned()
        .collect();

    sort_jobs(matching, criteria.order)
}

/// Case-insensitive substring match on title, company, location and description
///
/// `term` must already be lowercased.
pub fn matches_search(job: &Job, term: &str) -> bool {
    if term.is_empty() {
        return true;
    }

    [&job.title, &job.company, &job.location, &job.description]
        .iter()
        .any(|field| field.to_lowercase().contains(term))
}

pub fn matches_category(job: &Job, category: &CategoryFilter) -> bool {
    match category {
        CategoryFilter::All => true,
        CategoryFilter::Only(wanted) => job.category == *wanted,
    }
}

/// Sort key for a job; missing or unparseable dates are the oldest possible value
pub fn posted_key(job: &Job) -> Option<NaiveDateTime> {
    job.posted_date().and_then(dates::parse)
}

/// Stable sort by posted date, ties keep their input order in both directions
pub fn sort_jobs(mut jobs: Vec<Job>, order: DateOrder) -> Vec<Job> {
    match order {
        DateOrder::Oldest => jobs.sort_by_key(posted_key),
        DateOrder::Newest => jobs.sort_by(|a, b| posted_key(b).cmp(&posted_key(a))),
    }
    jobs
}
