//! Server-side HTML rendering. Every value taken from a job, a user or a
//! form is escaped before it reaches the markup.

pub mod admin;
pub mod cards;
pub mod page;

pub use cards::{render_detail, render_listing};
pub use page::{render_notice_fragment, render_page};
