use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    #[serde(rename = "userID", alias = "user_id")]
    pub user_id: i64,
    #[serde(rename = "courseID", alias = "course_id", default, skip_serializing_if = "Option::is_none")]
    pub course_id: Option<i64>,
    pub comment: String,
    #[serde(alias = "nickname", default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommentRequest {
    #[serde(rename = "userID")]
    pub user_id: i64,
    #[serde(rename = "courseID")]
    pub course_id: i64,
    pub comment: String,
}
