use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use validator::{Validate, ValidationErrors};

pub const DEFAULT_JOB_TYPE: &str = "Full-time";
pub const DEFAULT_EXPERIENCE: &str = "Entry Level";

/// Job posting as served by the backend or the bundled `jobs.json`
///
/// Dates are kept as the raw strings the source supplied, see
/// [`crate::jobs::dates`] for how they are interpreted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub id: i64,
    pub title: String,
    pub company: String,
    pub location: String,
    pub category: String,
    #[serde(default)]
    pub description: String,
    pub job_type: Option<String>,
    pub experience: Option<String>,
    pub salary: Option<String>,
    pub requirements: Option<String>,
    pub application_url: Option<String>,
    pub contact_email: Option<String>,
    pub deadline: Option<String>,
    pub posted_date: Option<String>,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

/// Empty strings count as absent, the backend stores `''` for unset fields
fn present(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|value| !value.is_empty())
}

impl Job {
    pub fn job_type(&self) -> &str {
        present(&self.job_type).unwrap_or(DEFAULT_JOB_TYPE)
    }

    pub fn experience(&self) -> &str {
        present(&self.experience).unwrap_or(DEFAULT_EXPERIENCE)
    }

    pub fn salary(&self) -> Option<&str> {
        present(&self.salary)
    }

    pub fn requirements(&self) -> Option<&str> {
        present(&self.requirements)
    }

    pub fn application_url(&self) -> Option<&str> {
        present(&self.application_url)
    }

    pub fn contact_email(&self) -> Option<&str> {
        present(&self.contact_email)
    }

    pub fn deadline(&self) -> Option<&str> {
        present(&self.deadline)
    }

    pub fn posted_date(&self) -> Option<&str> {
        present(&self.posted_date)
    }
}

/// Sort direction for the `posted_date` ordering
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateOrder {
    #[default]
    Newest,
    Oldest,
}

impl FromStr for DateOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "newest" => Ok(DateOrder::Newest),
            "oldest" => Ok(DateOrder::Oldest),
            other => Err(format!("unknown date order: {}", other)),
        }
    }
}

impl fmt::Display for DateOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DateOrder::Newest => write!(f, "newest"),
            DateOrder::Oldest => write!(f, "oldest"),
        }
    }
}

/// Category selection; anything other than `all` is an exact, case-sensitive match
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CategoryFilter {
    #[default]
    All,
    Only(String),
}

impl CategoryFilter {
    pub fn as_query(&self) -> Option<&str> {
        match self {
            CategoryFilter::All => None,
            CategoryFilter::Only(category) => Some(category),
        }
    }
}

impl From<String> for CategoryFilter {
    fn from(value: String) -> Self {
        if value.is_empty() || value == "all" {
            CategoryFilter::All
        } else {
            CategoryFilter::Only(value)
        }
    }
}

impl From<&str> for CategoryFilter {
    fn from(value: &str) -> Self {
        CategoryFilter::from(value.to_string())
    }
}

impl From<CategoryFilter> for String {
    fn from(value: CategoryFilter) -> Self {
        match value {
            CategoryFilter::All => "all".to_string(),
            CategoryFilter::Only(category) => category,
        }
    }
}

/// Filter criteria derived from the search box and the two select controls
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterCriteria {
    #[serde(default)]
    pub search: String,
    #[serde(default)]
    pub category: CategoryFilter,
    #[serde(default)]
    pub order: DateOrder,
}

impl FilterCriteria {
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    pub fn with_category(mut self, category: impl Into<CategoryFilter>) -> Self {
        self.category = category.into();
        self
    }

    pub fn with_order(mut self, order: DateOrder) -> Self {
        self.order = order;
        self
    }
}

/// Admin form for posting a job
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct NewJob {
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,
    #[validate(length(min = 1, message = "Company is required"))]
    pub company: String,
    #[validate(length(min = 1, message = "Location is required"))]
    pub location: String,
    #[validate(length(min = 1, message = "Category is required"))]
    pub category: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub job_type: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub experience: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub salary: String,
    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub requirements: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub application_url: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub contact_email: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub deadline: String,
}

impl NewJob {
    pub const FIELD_ORDER: &'static [&'static str] =
        &["title", "company", "location", "category", "description"];
}

/// Admin account as listed by `GET /api/admin/users`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub is_admin: bool,
    pub created_at: Option<String>,
}

#[derive(Clone, Default, Serialize, Deserialize, Validate)]
pub struct NewUser {
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,
    #[validate(length(min = 1, message = "Email is required"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
    #[serde(default)]
    pub is_admin: bool,
}

impl NewUser {
    pub const FIELD_ORDER: &'static [&'static str] = &["username", "email", "password"];
}

impl fmt::Debug for NewUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewUser")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("is_admin", &self.is_admin)
            .finish_non_exhaustive()
    }
}

#[derive(Clone, Default, Serialize, Deserialize, Validate)]
pub struct Credentials {
    #[validate(length(min = 1, message = "Please enter username and password"))]
    pub username: String,
    #[validate(length(min = 1, message = "Please enter username and password"))]
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

#[derive(Clone, Default, Deserialize, Validate)]
pub struct PasswordChange {
    #[validate(length(min = 1, message = "Current and new passwords are required"))]
    pub current_password: String,
    #[validate(
        length(min = 6, message = "Password must be at least 6 characters long"),
        must_match(other = "confirm_password", message = "New passwords do not match")
    )]
    pub new_password: String,
    #[serde(default)]
    pub confirm_password: String,
}

impl PasswordChange {
    pub const FIELD_ORDER: &'static [&'static str] = &["current_password", "new_password"];
}

impl fmt::Debug for PasswordChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PasswordChange").finish_non_exhaustive()
    }
}

/// Contact form; submissions are acknowledged locally and never sent
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct ContactMessage {
    #[validate(length(min = 1, message = "NAME is required"))]
    pub name: String,
    #[validate(length(min = 1, message = "EMAIL is required"))]
    pub email: String,
    #[validate(length(min = 1, message = "SUBJECT is required"))]
    pub subject: String,
    #[validate(length(min = 1, message = "MESSAGE is required"))]
    pub message: String,
}

impl ContactMessage {
    pub const FIELD_ORDER: &'static [&'static str] = &["name", "email", "subject", "message"];
}

/// Pick the message of the first failing field in `field_order`
///
/// `ValidationErrors` is backed by a hash map, so the order has to be imposed
/// to get the same message the form would report top to bottom.
pub fn first_validation_message(errors: &ValidationErrors, field_order: &[&str]) -> String {
    let field_errors = errors.field_errors();

    let ordered = field_order
        .iter()
        .filter_map(|field| field_errors.get(*field).copied())
        .chain(field_errors.values().copied());

    ordered
        .flat_map(|errors| errors.iter())
        .map(|e| {
            e.message
                .as_ref()
                .map(|m| m.to_string())
                .unwrap_or_else(|| format!("Invalid value: {}", e.code))
        })
        .next()
        .unwrap_or_else(|| "Validation error".to_string())
}
