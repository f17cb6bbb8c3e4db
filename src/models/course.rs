use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub instructor: String,
    /// Weeks.
    #[serde(default)]
    pub duration: i64,
    #[serde(default)]
    pub requirement: String,
    #[serde(default, alias = "creationDate", skip_serializing_if = "Option::is_none")]
    pub creation_date: Option<String>,
    #[serde(default, alias = "lastUpdate", skip_serializing_if = "Option::is_none")]
    pub last_update: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseRequest {
    pub title: String,
    pub description: String,
    pub category: String,
    pub instructor: String,
    pub duration: i64,
    pub requirement: String,
}

impl From<&Course> for CourseRequest {
    fn from(course: &Course) -> Self {
        Self {
            title: course.title.clone(),
            description: course.description.clone(),
            category: course.category.clone(),
            instructor: course.instructor.clone(),
            duration: course.duration,
            requirement: course.requirement.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscribeRequest {
    pub user_id: i64,
    pub course_id: i64,
}
