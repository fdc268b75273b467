pub mod dates;
pub mod filter;
pub mod models;

// Re-export commonly used types
pub use filter::{filter_jobs, sort_jobs};
pub use models::{CategoryFilter, DateOrder, FilterCriteria, Job};
