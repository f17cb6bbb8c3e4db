pub mod dto;
pub mod routes;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, StatusCode, Url};
use serde::de::DeserializeOwned;
use tracing::{debug, error};

use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::models::{
    Comment, CommentRequest, Course, CourseRequest, FileUpload, LoginRequest, RegistrationRequest,
    Role, SubscribeRequest, UploadedFile, User,
};

pub use routes::RouteStyle;

/// One method per backend endpoint. Every call issues exactly one request
/// and hands back the unwrapped payload, or the failure unchanged.
#[async_trait]
pub trait CourseApi: Send + Sync {
    async fn login(&self, request: &LoginRequest) -> Result<String, ApiError>;
    async fn register(&self, request: &RegistrationRequest) -> Result<String, ApiError>;

    async fn list_courses(&self) -> Result<Vec<Course>, ApiError>;
    async fn search_courses(&self, query: &str) -> Result<Vec<Course>, ApiError>;
    async fn get_course(&self, course_id: i64) -> Result<Course, ApiError>;
    async fn list_courses_by_instructor(&self, instructor: &str) -> Result<Vec<Course>, ApiError>;
    async fn create_course(&self, request: &CourseRequest) -> Result<String, ApiError>;
    async fn update_course(&self, course_id: i64, request: &CourseRequest) -> Result<String, ApiError>;
    async fn delete_course(&self, course_id: i64) -> Result<(), ApiError>;

    async fn authenticate(&self, token: &str) -> Result<Role, ApiError>;
    async fn user_id_for_token(&self, token: &str) -> Result<i64, ApiError>;
    async fn get_user(&self, user_id: i64) -> Result<User, ApiError>;

    async fn subscribe(&self, request: &SubscribeRequest) -> Result<String, ApiError>;
    async fn list_subscriptions(&self, user_id: i64) -> Result<Vec<Course>, ApiError>;

    async fn add_comment(&self, request: &CommentRequest) -> Result<String, ApiError>;
    async fn list_comments(&self, course_id: i64) -> Result<Vec<Comment>, ApiError>;

    async fn upload_file(&self, file: &FileUpload, user_id: i64, course_id: i64) -> Result<String, ApiError>;
    async fn list_course_files(&self, course_id: i64) -> Result<Vec<UploadedFile>, ApiError>;
}

pub struct HttpCourseApi {
    client: Client,
    base_url: String,
    routes: RouteStyle,
}

impl HttpCourseApi {
    pub fn new(config: &ClientConfig) -> Result<Self, ApiError> {
        let client = Client::builder()
            .build()
            .map_err(|e| ApiError::Config(format!("Failed to build http client: {}", e)))?;
        Ok(Self {
            client,
            base_url: config.api_base_url.clone(),
            routes: config.route_style,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Appends `segment` percent-encoded, so names with spaces or `/` stay one segment.
    fn url_with_segment(&self, path: &str, segment: &str) -> Result<Url, ApiError> {
        let mut url = Url::parse(&self.url(path))
            .map_err(|e| ApiError::Config(format!("Invalid url: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| ApiError::Config(format!("Base url cannot carry a path: {}", self.base_url)))?
            .push(segment);
        Ok(url)
    }

    async fn execute(&self, request: RequestBuilder, action: &str) -> Result<String, ApiError> {
        let response = request.send().await.map_err(|e| {
            error!("{} failed: {}", action, e);
            ApiError::Transport(e)
        })?;

        let status = response.status();
        debug!("{} -> {}", action, status);
        let body = response.text().await.map_err(|e| {
            error!("{} failed reading body: {}", action, e);
            ApiError::Transport(e)
        })?;

        if !status.is_success() {
            let message = error_message(status, &body);
            error!("{} failed: {} {}", action, status, message);
            return Err(ApiError::Status { status, message });
        }

        Ok(body)
    }

    async fn fetch<T: DeserializeOwned>(&self, request: RequestBuilder, action: &str) -> Result<T, ApiError> {
        let body = self.execute(request, action).await?;
        serde_json::from_str::<T>(&body).map_err(|e| {
            error!("{} returned an unexpected payload: {}", action, e);
            ApiError::Decode(e)
        })
    }

    async fn fetch_results<T: DeserializeOwned>(&self, request: RequestBuilder, action: &str) -> Result<Vec<T>, ApiError> {
        let envelope: dto::ResultsEnvelope<T> = self.fetch(request, action).await?;
        Ok(envelope.results)
    }

    async fn fetch_message(&self, request: RequestBuilder, action: &str) -> Result<String, ApiError> {
        let envelope: dto::MessageEnvelope<String> = self.fetch(request, action).await?;
        Ok(envelope.message)
    }
}

fn error_message(status: StatusCode, body: &str) -> String {
    serde_json::from_str::<dto::ErrorBody>(body)
        .ok()
        .and_then(dto::ErrorBody::into_message)
        .unwrap_or_else(|| {
            if body.trim().is_empty() {
                status.canonical_reason().unwrap_or("request failed").to_string()
            } else {
                body.trim().to_string()
            }
        })
}

fn bearer(token: &str) -> String {
    format!("Bearer {}", token)
}

#[async_trait]
impl CourseApi for HttpCourseApi {
    async fn login(&self, request: &LoginRequest) -> Result<String, ApiError> {
        let req = self.client.post(self.url("/users/login")).json(request);
        let envelope: dto::TokenEnvelope = self.fetch(req, "login").await?;
        Ok(envelope.token)
    }

    async fn register(&self, request: &RegistrationRequest) -> Result<String, ApiError> {
        let req = self.client.post(self.url("/users/register")).json(request);
        self.fetch_message(req, "registration").await
    }

    async fn list_courses(&self) -> Result<Vec<Course>, ApiError> {
        let req = self.client.get(self.url("/courses"));
        self.fetch_results(req, "list courses").await
    }

    async fn search_courses(&self, query: &str) -> Result<Vec<Course>, ApiError> {
        let url = Url::parse_with_params(&self.url("/courses/search"), &[("query", query)])
            .map_err(|e| ApiError::Config(format!("Invalid search url: {}", e)))?;
        let req = self.client.get(url);
        self.fetch_results(req, "search").await
    }

    async fn get_course(&self, course_id: i64) -> Result<Course, ApiError> {
        let req = self.client.get(self.url(&format!("/courses/{}", course_id)));
        self.fetch(req, "get course").await
    }

    async fn list_courses_by_instructor(&self, instructor: &str) -> Result<Vec<Course>, ApiError> {
        let url = self.url_with_segment("/courses/instructor", instructor)?;
        let req = self.client.get(url);
        self.fetch_results(req, "list instructor courses").await
    }

    async fn create_course(&self, request: &CourseRequest) -> Result<String, ApiError> {
        let req = self.client.post(self.url(&self.routes.create_course())).json(request);
        self.fetch_message(req, "create course").await
    }

    async fn update_course(&self, course_id: i64, request: &CourseRequest) -> Result<String, ApiError> {
        let req = self
            .client
            .put(self.url(&self.routes.update_course(course_id)))
            .json(request);
        self.fetch_message(req, "update course").await
    }

    async fn delete_course(&self, course_id: i64) -> Result<(), ApiError> {
        let req = self.client.delete(self.url(&self.routes.delete_course(course_id)));
        self.execute(req, "delete course").await?;
        Ok(())
    }

    async fn authenticate(&self, token: &str) -> Result<Role, ApiError> {
        let req = self
            .client
            .get(self.url("/users/authentication"))
            .header("Authorization", bearer(token));
        let label = self.fetch_message(req, "authentication").await?;
        Ok(Role::from_label(&label))
    }

    async fn user_id_for_token(&self, token: &str) -> Result<i64, ApiError> {
        let req = self
            .client
            .get(self.url("/users/userId"))
            .header("Authorization", bearer(token));
        let envelope: dto::MessageEnvelope<dto::IdValue> = self.fetch(req, "get user id").await?;
        envelope.message.as_i64().ok_or_else(|| {
            error!("get user id returned a non-numeric id: {:?}", envelope.message);
            ApiError::UnexpectedPayload(format!("user id is not numeric: {:?}", envelope.message))
        })
    }

    async fn get_user(&self, user_id: i64) -> Result<User, ApiError> {
        let req = self.client.get(self.url(&format!("/users/{}", user_id)));
        self.fetch(req, "get user").await
    }

    async fn subscribe(&self, request: &SubscribeRequest) -> Result<String, ApiError> {
        let req = self.client.post(self.url("/subscriptions")).json(request);
        self.fetch_message(req, "subscription").await
    }

    async fn list_subscriptions(&self, user_id: i64) -> Result<Vec<Course>, ApiError> {
        let req = self.client.get(self.url(&format!("/users/subscriptions/{}", user_id)));
        self.fetch_results(req, "list subscriptions").await
    }

    async fn add_comment(&self, request: &CommentRequest) -> Result<String, ApiError> {
        let req = self.client.post(self.url("/users/comments")).json(request);
        self.fetch_message(req, "add comment").await
    }

    async fn list_comments(&self, course_id: i64) -> Result<Vec<Comment>, ApiError> {
        let req = self.client.get(self.url(&format!("/courses/comments/{}", course_id)));
        self.fetch_results(req, "list comments").await
    }

    async fn upload_file(&self, file: &FileUpload, user_id: i64, course_id: i64) -> Result<String, ApiError> {
        let part = Part::bytes(file.bytes.clone()).file_name(file.file_name.clone());
        let form = Form::new()
            .part("file", part)
            .text("user_id", user_id.to_string())
            .text("course_id", course_id.to_string());
        let req = self.client.post(self.url("/upload")).multipart(form);
        self.fetch_message(req, "file upload").await
    }

    async fn list_course_files(&self, course_id: i64) -> Result<Vec<UploadedFile>, ApiError> {
        let req = self.client.get(self.url(&format!("/courses/images/{}", course_id)));
        self.fetch_results(req, "list course files").await
    }
}
