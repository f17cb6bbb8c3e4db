use crate::api::CourseApi;
use crate::error::ApiError;
use crate::models::Course;

/// Single-field search. The query goes out exactly as typed.
#[derive(Debug, Clone, Default)]
pub struct SearchBar {
    query: String,
}

impl SearchBar {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub async fn submit(&self, api: &dyn CourseApi) -> Result<Vec<Course>, ApiError> {
        api.search_courses(&self.query).await
    }
}
