use serde::{Deserialize, Serialize};

use crate::jobs::FilterCriteria;

/// Query string for `GET /api/jobs`
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct JobQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
}

impl JobQuery {
    pub fn recent(limit: usize) -> Self {
        Self {
            limit: Some(limit),
            ..Default::default()
        }
    }
}

impl From<&FilterCriteria> for JobQuery {
    fn from(criteria: &FilterCriteria) -> Self {
        Self {
            search: Some(criteria.search.clone()).filter(|s| !s.is_empty()),
            category: criteria.category.as_query().map(str::to_string),
            limit: None,
        }
    }
}

/// Error body every failing backend endpoint returns
#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub success: bool,
    pub message: Option<String>,
    pub error: Option<String>,
}

/// `{success, message}` acknowledgement used by the admin mutations
#[derive(Debug, Default, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub success: bool,
    pub message: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ExportResponse {
    #[serde(default)]
    pub success: bool,
    pub message: Option<String>,
    pub file_path: Option<String>,
}

#[derive(Serialize)]
pub struct ChangePasswordRequest<'a> {
    pub current_password: &'a str,
    pub new_password: &'a str,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jobs::FilterCriteria;

    #[test]
    fn query_omits_all_and_empty_search() {
        let query = JobQuery::from(&FilterCriteria::default());
        assert_eq!(query, JobQuery::default());

        let query = JobQuery::from(&FilterCriteria::default().with_search("rust").with_category("Tech"));
        assert_eq!(query.search.as_deref(), Some("rust"));
        assert_eq!(query.category.as_deref(), Some("Tech"));
    }
}
