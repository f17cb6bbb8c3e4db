//! In-memory stand-in for the course backend, seeded with fixed fixtures.
//! Used by the integration tests and by `emarve mock-server`.

pub mod error;
pub mod fixtures;

use std::collections::BTreeSet;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::{Multipart, Path, Query, Request, State};
use axum::http::{HeaderMap, StatusCode};
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::{delete, get, post, put};
use axum::{Json, Router};
use chrono::Utc;
use serde::Deserialize;
use serde_json::{Value, json};
use tokio::sync::Mutex;
use tracing::info;
use uuid::Uuid;

use crate::models::{
    Comment, CommentRequest, Course, CourseRequest, LoginRequest, RegistrationRequest, Role,
    SubscribeRequest, UploadedFile, User,
};

use self::error::MockError;
use self::fixtures::MockUser;

struct MockDb {
    users: Vec<MockUser>,
    courses: Vec<Course>,
    subscriptions: BTreeSet<(i64, i64)>,
    comments: Vec<Comment>,
    files: Vec<UploadedFile>,
    requests: Vec<String>,
    last_search_query: Option<String>,
}

impl MockDb {
    fn user_by_token(&self, token: &str) -> Option<&MockUser> {
        self.users.iter().find(|u| u.token == token)
    }

    fn next_user_id(&self) -> i64 {
        self.users.iter().map(|u| u.id).max().unwrap_or(0) + 1
    }

    fn next_course_id(&self) -> i64 {
        self.courses.iter().map(|c| c.id).max().unwrap_or(0) + 1
    }
}

#[derive(Clone)]
pub struct MockState {
    db: Arc<Mutex<MockDb>>,
}

impl MockState {
    pub fn seeded() -> Self {
        Self {
            db: Arc::new(Mutex::new(MockDb {
                users: fixtures::users(),
                courses: fixtures::courses(),
                subscriptions: BTreeSet::new(),
                comments: Vec::new(),
                files: Vec::new(),
                requests: Vec::new(),
                last_search_query: None,
            })),
        }
    }

    /// Every request seen so far, as `"METHOD /path"`.
    pub async fn requests(&self) -> Vec<String> {
        self.db.lock().await.requests.clone()
    }

    pub async fn hits(&self, line: &str) -> usize {
        self.db.lock().await.requests.iter().filter(|r| r.as_str() == line).count()
    }

    /// The `query` parameter of the last search, exactly as received.
    pub async fn last_search_query(&self) -> Option<String> {
        self.db.lock().await.last_search_query.clone()
    }

    pub async fn courses(&self) -> Vec<Course> {
        self.db.lock().await.courses.clone()
    }

    pub async fn subscribe(&self, user_id: i64, course_id: i64) {
        self.db.lock().await.subscriptions.insert((user_id, course_id));
    }
}

pub fn router(state: MockState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/users/login", post(login))
        .route("/users/register", post(register))
        .route("/users/authentication", get(authentication))
        .route("/users/userId", get(user_id))
        .route("/users/comments", post(add_comment))
        .route("/users/subscriptions/{id}", get(list_subscriptions))
        .route("/users/{id}", get(get_user))
        .route("/courses", get(list_courses).post(create_course))
        .route("/courses/search", get(search_courses))
        .route("/courses/create", post(create_course))
        .route("/courses/update/{id}", put(update_course))
        .route("/courses/delete/{id}", delete(delete_course))
        .route("/courses/instructor/{instructor}", get(courses_by_instructor))
        .route("/courses/comments/{id}", get(list_comments))
        .route("/courses/images/{id}", get(list_files))
        .route(
            "/courses/{id}",
            get(get_course).put(update_course).delete(delete_course),
        )
        .route("/subscriptions", post(subscribe))
        .route("/upload", post(upload))
        .layer(middleware::from_fn_with_state(state.clone(), record_request))
        .with_state(state)
}

/// Serves the mock backend until the process is stopped.
pub async fn serve(addr: SocketAddr) -> Result<(), std::io::Error> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("mock backend listening on http://{}", listener.local_addr()?);
    axum::serve(listener, router(MockState::seeded())).await
}

async fn record_request(State(state): State<MockState>, request: Request, next: Next) -> Response {
    let line = format!("{} {}", request.method(), request.uri().path());
    state.db.lock().await.requests.push(line);
    next.run(request).await
}

fn message(text: impl Into<String>) -> Json<Value> {
    Json(json!({ "message": text.into() }))
}

fn bearer_token(headers: &HeaderMap) -> Result<String, MockError> {
    let header = headers
        .get("Authorization")
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| MockError::Unauthorized("Authorization header is required".to_string()))?;
    header
        .strip_prefix("Bearer ")
        .map(str::to_string)
        .ok_or_else(|| MockError::Unauthorized("Invalid token".to_string()))
}

fn validate_course(req: &CourseRequest) -> Result<(), MockError> {
    let fields = [&req.title, &req.description, &req.category, &req.instructor];
    if fields.iter().any(|f| f.trim().is_empty()) {
        return Err(MockError::BadRequest("Missing required fields".to_string()));
    }
    Ok(())
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok", "message": "Backend is running" }))
}

async fn login(
    State(state): State<MockState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<Value>, MockError> {
    let db = state.db.lock().await;
    let user = db
        .users
        .iter()
        .find(|u| u.email == req.email && u.password == req.password)
        .ok_or_else(|| MockError::Unauthorized("Invalid credentials".to_string()))?;
    Ok(Json(json!({ "token": user.token })))
}

async fn register(
    State(state): State<MockState>,
    Json(req): Json<RegistrationRequest>,
) -> Result<Json<Value>, MockError> {
    if req.nickname.trim().is_empty() || req.email.trim().is_empty() || req.password.is_empty() {
        return Err(MockError::BadRequest("Missing required fields".to_string()));
    }

    let mut db = state.db.lock().await;
    if db.users.iter().any(|u| u.email == req.email) {
        return Err(MockError::Conflict("User already exists".to_string()));
    }

    let id = db.next_user_id();
    db.users.push(MockUser {
        id,
        nickname: req.nickname.clone(),
        email: req.email.clone(),
        password: req.password.clone(),
        role: if req.is_instructor { Role::Admin } else { Role::Student },
        token: format!("mock-jwt-token-{}", Uuid::new_v4()),
    });

    Ok(message(format!("Successful creation of user {}", req.nickname)))
}

async fn authentication(
    State(state): State<MockState>,
    headers: HeaderMap,
) -> Result<Json<Value>, MockError> {
    let token = bearer_token(&headers)?;
    let db = state.db.lock().await;
    let user = db
        .user_by_token(&token)
        .ok_or_else(|| MockError::Unauthorized("Invalid token".to_string()))?;
    Ok(message(user.role.as_str()))
}

async fn user_id(
    State(state): State<MockState>,
    headers: HeaderMap,
) -> Result<Json<Value>, MockError> {
    let token = bearer_token(&headers)?;
    let db = state.db.lock().await;
    let user = db
        .user_by_token(&token)
        .ok_or_else(|| MockError::Unauthorized("Invalid token".to_string()))?;
    Ok(Json(json!({ "message": user.id })))
}

async fn get_user(
    State(state): State<MockState>,
    Path(id): Path<i64>,
) -> Result<Json<User>, MockError> {
    let db = state.db.lock().await;
    let user = db
        .users
        .iter()
        .find(|u| u.id == id)
        .ok_or_else(|| MockError::NotFound(format!("user not found: {}", id)))?;
    Ok(Json(User {
        id: user.id,
        nickname: user.nickname.clone(),
        email: user.email.clone(),
        is_instructor: user.role == Role::Admin,
    }))
}

async fn list_courses(State(state): State<MockState>) -> Json<Value> {
    let db = state.db.lock().await;
    Json(json!({ "result": db.courses }))
}

#[derive(Deserialize)]
struct SearchParams {
    #[serde(default)]
    query: String,
}

async fn search_courses(
    State(state): State<MockState>,
    Query(params): Query<SearchParams>,
) -> Json<Value> {
    let mut db = state.db.lock().await;
    db.last_search_query = Some(params.query.clone());

    let needle = params.query.trim().to_lowercase();
    let results: Vec<Course> = db
        .courses
        .iter()
        .filter(|c| needle.is_empty() || c.title.to_lowercase().contains(&needle))
        .cloned()
        .collect();
    Json(json!({ "results": results }))
}

async fn get_course(
    State(state): State<MockState>,
    Path(id): Path<i64>,
) -> Result<Json<Course>, MockError> {
    let db = state.db.lock().await;
    db.courses
        .iter()
        .find(|c| c.id == id)
        .cloned()
        .map(Json)
        .ok_or_else(|| MockError::NotFound(format!("course not found: {}", id)))
}

async fn courses_by_instructor(
    State(state): State<MockState>,
    Path(instructor): Path<String>,
) -> Json<Value> {
    let db = state.db.lock().await;
    let results: Vec<&Course> = db.courses.iter().filter(|c| c.instructor == instructor).collect();
    Json(json!({ "results": results }))
}

async fn create_course(
    State(state): State<MockState>,
    Json(req): Json<CourseRequest>,
) -> Result<(StatusCode, Json<Value>), MockError> {
    validate_course(&req)?;

    let mut db = state.db.lock().await;
    let id = db.next_course_id();
    let now = Utc::now().to_rfc3339();
    db.courses.push(Course {
        id,
        title: req.title.clone(),
        description: req.description,
        category: req.category,
        instructor: req.instructor,
        duration: req.duration,
        requirement: req.requirement,
        creation_date: Some(now.clone()),
        last_update: Some(now),
    });

    Ok((StatusCode::CREATED, message(format!("Course {} created successfully", req.title))))
}

async fn update_course(
    State(state): State<MockState>,
    Path(id): Path<i64>,
    Json(req): Json<CourseRequest>,
) -> Result<Json<Value>, MockError> {
    validate_course(&req)?;

    let mut db = state.db.lock().await;
    let course = db
        .courses
        .iter_mut()
        .find(|c| c.id == id)
        .ok_or_else(|| MockError::NotFound(format!("course not found: {}", id)))?;

    course.title = req.title;
    course.description = req.description;
    course.category = req.category;
    course.instructor = req.instructor;
    course.duration = req.duration;
    course.requirement = req.requirement;
    course.last_update = Some(Utc::now().to_rfc3339());

    Ok(message("Course updated successfully"))
}

async fn delete_course(
    State(state): State<MockState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, MockError> {
    let mut db = state.db.lock().await;
    let before = db.courses.len();
    db.courses.retain(|c| c.id != id);
    if db.courses.len() == before {
        return Err(MockError::NotFound(format!("error in delete: course {}", id)));
    }
    db.subscriptions.retain(|(_, course_id)| *course_id != id);
    Ok(StatusCode::NO_CONTENT)
}

async fn subscribe(
    State(state): State<MockState>,
    Json(req): Json<SubscribeRequest>,
) -> Result<(StatusCode, Json<Value>), MockError> {
    let mut db = state.db.lock().await;
    if !db.courses.iter().any(|c| c.id == req.course_id) {
        return Err(MockError::NotFound(format!("course not found: {}", req.course_id)));
    }
    if !db.subscriptions.insert((req.user_id, req.course_id)) {
        return Err(MockError::Conflict("user already subscribed to course".to_string()));
    }
    Ok((
        StatusCode::CREATED,
        message(format!("successful subscription of user {} to course {}", req.user_id, req.course_id)),
    ))
}

async fn list_subscriptions(
    State(state): State<MockState>,
    Path(user_id): Path<i64>,
) -> Json<Value> {
    let db = state.db.lock().await;
    let results: Vec<&Course> = db
        .courses
        .iter()
        .filter(|c| db.subscriptions.contains(&(user_id, c.id)))
        .collect();
    Json(json!({ "results": results }))
}

async fn add_comment(
    State(state): State<MockState>,
    Json(req): Json<CommentRequest>,
) -> Result<(StatusCode, Json<Value>), MockError> {
    if req.comment.trim().is_empty() {
        return Err(MockError::BadRequest("Missing required fields".to_string()));
    }

    let mut db = state.db.lock().await;
    let display_name = db
        .users
        .iter()
        .find(|u| u.id == req.user_id)
        .map(|u| u.nickname.clone());
    db.comments.push(Comment {
        user_id: req.user_id,
        course_id: Some(req.course_id),
        comment: req.comment,
        display_name,
    });

    Ok((
        StatusCode::CREATED,
        message(format!("successful comment of user {} to course {}", req.user_id, req.course_id)),
    ))
}

async fn list_comments(State(state): State<MockState>, Path(course_id): Path<i64>) -> Json<Value> {
    let db = state.db.lock().await;
    let results: Vec<&Comment> = db
        .comments
        .iter()
        .filter(|c| c.course_id == Some(course_id))
        .collect();
    Json(json!({ "results": results }))
}

async fn upload(
    State(state): State<MockState>,
    mut multipart: Multipart,
) -> Result<Json<Value>, MockError> {
    let mut file_name = None;
    let mut user_id = None;
    let mut course_id = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| MockError::BadRequest(format!("Invalid multipart body: {}", e)))?
    {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("file") => {
                let name = field.file_name().unwrap_or("upload").to_string();
                field
                    .bytes()
                    .await
                    .map_err(|e| MockError::BadRequest(format!("Error al obtener el archivo: {}", e)))?;
                file_name = Some(name);
            }
            Some("user_id") | Some("course_id") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| MockError::BadRequest(format!("Invalid field: {}", e)))?;
                let value = text
                    .trim()
                    .parse::<i64>()
                    .map_err(|e| MockError::BadRequest(format!("Invalid ID: {}", e)))?;
                if name.as_deref() == Some("user_id") {
                    user_id = Some(value);
                } else {
                    course_id = Some(value);
                }
            }
            _ => {}
        }
    }

    let (Some(file_name), Some(user_id), Some(course_id)) = (file_name, user_id, course_id) else {
        return Err(MockError::BadRequest("Missing required fields".to_string()));
    };

    let mut db = state.db.lock().await;
    let id = db.files.len() as i64 + 1;
    db.files.push(UploadedFile {
        id: Some(id),
        user_id,
        course_id,
        url: format!("/uploads/{}-{}", Uuid::new_v4(), file_name),
        name: file_name.clone(),
        upload_date: Some(Utc::now()),
    });

    Ok(message(format!("Archivo subido exitosamente: {}", file_name)))
}

async fn list_files(State(state): State<MockState>, Path(course_id): Path<i64>) -> Json<Value> {
    let db = state.db.lock().await;
    let results: Vec<&UploadedFile> = db.files.iter().filter(|f| f.course_id == course_id).collect();
    Json(json!({ "results": results }))
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    use super::*;

    async fn body_json(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn login_rejects_unknown_credentials() {
        let app = router(MockState::seeded());
        let request = Request::post("/users/login")
            .header("content-type", "application/json")
            .body(Body::from(r#"{"email":"nobody@example.com","password":"x"}"#))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_json(response).await["message"], "Invalid credentials");
    }

    #[tokio::test]
    async fn authentication_requires_header() {
        let app = router(MockState::seeded());
        let request = Request::get("/users/authentication").body(Body::empty()).unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn static_routes_win_over_course_id() {
        let state = MockState::seeded();
        let app = router(state.clone());
        let request = Request::get("/courses/search?query=go").body(Body::empty()).unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["results"].as_array().unwrap().len(), 1);
        assert_eq!(state.hits("GET /courses/search").await, 1);
    }

    #[tokio::test]
    async fn deleting_twice_is_not_found() {
        let app = router(MockState::seeded());
        let first = app
            .clone()
            .oneshot(Request::delete("/courses/2").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(first.status(), StatusCode::NO_CONTENT);

        let second = app
            .oneshot(Request::delete("/courses/delete/2").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(second.status(), StatusCode::NOT_FOUND);
    }
}
