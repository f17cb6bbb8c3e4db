mod common;

use std::sync::Arc;

use emarve::api::{CourseApi, HttpCourseApi, RouteStyle};
use emarve::error::ErrorKind;
use emarve::mock::fixtures;
use emarve::models::{CommentRequest, CourseRequest, FileUpload, RegistrationRequest, Role, SubscribeRequest};
use emarve::routes::Route;
use emarve::services::AuthService;
use emarve::session::{Session, TOKEN_ID_KEY, TOKEN_TYPE_KEY};
use reqwest::StatusCode;

use common::{config_for, spawn_backend, spawn_backend_with};

fn new_course(title: &str) -> CourseRequest {
    CourseRequest {
        title: title.to_string(),
        description: "Sistemas".to_string(),
        category: "Backend".to_string(),
        instructor: fixtures::ADMIN_NICKNAME.to_string(),
        duration: 10,
        requirement: "Ninguno".to_string(),
    }
}

#[tokio::test]
async fn login_stores_token_under_both_keys() {
    let backend = spawn_backend().await;
    let session = Session::in_memory();
    let auth = AuthService::new(backend.dyn_api(), session.clone());

    let token = auth
        .login(fixtures::STUDENT_EMAIL, fixtures::STUDENT_PASSWORD)
        .await
        .expect("valid credentials should log in");

    assert_eq!(token, "mock-jwt-token-123");
    assert_eq!(session.raw(TOKEN_TYPE_KEY).as_deref(), Some("mock-jwt-token-123"));
    assert_eq!(session.raw(TOKEN_ID_KEY).as_deref(), Some("mock-jwt-token-123"));
}

#[tokio::test]
async fn invalid_login_is_unauthorized_and_stores_nothing() {
    let backend = spawn_backend().await;
    let session = Session::in_memory();
    let auth = AuthService::new(backend.dyn_api(), session.clone());

    let err = auth
        .login(fixtures::STUDENT_EMAIL, "wrong")
        .await
        .expect_err("wrong password must be rejected");

    assert_eq!(err.status(), Some(StatusCode::UNAUTHORIZED));
    assert_eq!(err.kind(), ErrorKind::Client);
    assert!(err.to_string().contains("Invalid credentials"));
    assert!(session.token().is_none());
}

#[tokio::test]
async fn logout_clears_session_and_goes_to_root() {
    let backend = spawn_backend().await;
    let session = Session::in_memory();
    let auth = AuthService::new(backend.dyn_api(), session.clone());
    auth.login(fixtures::STUDENT_EMAIL, fixtures::STUDENT_PASSWORD).await.unwrap();
    session.set_user_id(fixtures::STUDENT_ID).unwrap();

    let route = auth.logout().unwrap();

    assert_eq!(route, Route::Root);
    assert!(session.token().is_none());
    assert!(session.user_id().is_none());
}

#[tokio::test]
async fn registration_conflicts_on_existing_email() {
    let backend = spawn_backend().await;

    let existing = RegistrationRequest {
        nickname: "dup".to_string(),
        email: fixtures::EXISTING_EMAIL.to_string(),
        password: "secret".to_string(),
        is_instructor: false,
    };
    let err = backend.api.register(&existing).await.unwrap_err();
    assert!(err.is_conflict());

    let fresh = RegistrationRequest {
        nickname: "nueva".to_string(),
        email: "nueva@example.com".to_string(),
        password: "secret".to_string(),
        is_instructor: false,
    };
    let message = backend.api.register(&fresh).await.unwrap();
    assert!(message.contains("Successful creation of user nueva"));
}

#[tokio::test]
async fn list_courses_returns_the_two_fixtures() {
    let backend = spawn_backend().await;

    let courses = backend.api.list_courses().await.unwrap();

    assert_eq!(courses.len(), 2);
    assert_eq!(courses[0].title, "Curso de React");
    assert_eq!(courses[1].title, "Curso de Go");
    assert_eq!(courses[1].duration, 60);
}

#[tokio::test]
async fn search_passes_query_through_untouched() {
    let backend = spawn_backend().await;

    let all = backend.api.search_courses("").await.unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(backend.state.last_search_query().await.as_deref(), Some(""));

    let found = backend.api.search_courses("  react ").await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, 1);
    assert_eq!(backend.state.last_search_query().await.as_deref(), Some("  react "));

    let none = backend.api.search_courses("cobol").await.unwrap();
    assert!(none.is_empty());
}

#[tokio::test]
async fn missing_course_is_not_found() {
    let backend = spawn_backend().await;

    let err = backend.api.get_course(999).await.unwrap_err();

    assert_eq!(err.status(), Some(StatusCode::NOT_FOUND));
    assert!(!err.is_conflict());
}

#[tokio::test]
async fn token_resolves_to_role_and_id() {
    let backend = spawn_backend().await;

    assert_eq!(backend.api.authenticate(fixtures::STUDENT_TOKEN).await.unwrap(), Role::Student);
    assert_eq!(backend.api.authenticate(fixtures::ADMIN_TOKEN).await.unwrap(), Role::Admin);
    assert_eq!(
        backend.api.user_id_for_token(fixtures::STUDENT_TOKEN).await.unwrap(),
        fixtures::STUDENT_ID
    );

    let err = backend.api.authenticate("bogus").await.unwrap_err();
    assert_eq!(err.status(), Some(StatusCode::UNAUTHORIZED));
}

#[tokio::test]
async fn duplicate_subscription_is_a_conflict() {
    let backend = spawn_backend().await;
    let request = SubscribeRequest {
        user_id: fixtures::STUDENT_ID,
        course_id: 2,
    };

    backend.api.subscribe(&request).await.unwrap();
    let err = backend.api.subscribe(&request).await.unwrap_err();
    assert!(err.is_conflict());

    let subscribed = backend.api.list_subscriptions(fixtures::STUDENT_ID).await.unwrap();
    assert_eq!(subscribed.len(), 1);
    assert_eq!(subscribed[0].id, 2);
}

#[tokio::test]
async fn comments_are_listed_per_course() {
    let backend = spawn_backend().await;

    backend
        .api
        .add_comment(&CommentRequest {
            user_id: fixtures::STUDENT_ID,
            course_id: 1,
            comment: "Muy bueno".to_string(),
        })
        .await
        .unwrap();

    let comments = backend.api.list_comments(1).await.unwrap();
    assert_eq!(comments.len(), 1);
    assert_eq!(comments[0].comment, "Muy bueno");
    assert_eq!(comments[0].user_id, fixtures::STUDENT_ID);
    assert!(backend.api.list_comments(2).await.unwrap().is_empty());
}

#[tokio::test]
async fn uploaded_files_show_up_for_the_course() {
    let backend = spawn_backend().await;
    let file = FileUpload::new("apuntes.pdf", b"%PDF-1.4".to_vec());

    let message = backend.api.upload_file(&file, fixtures::STUDENT_ID, 2).await.unwrap();
    assert!(message.contains("apuntes.pdf"));

    let files = backend.api.list_course_files(2).await.unwrap();
    assert_eq!(files.len(), 1);
    assert_eq!(files[0].name, "apuntes.pdf");
    assert_eq!(files[0].user_id, fixtures::STUDENT_ID);
    assert!(files[0].url.ends_with("apuntes.pdf"));
    assert!(files[0].upload_date.is_some());
}

#[tokio::test]
async fn instructor_courses_match_by_name() {
    let backend = spawn_backend().await;

    let taught = backend
        .api
        .list_courses_by_instructor(fixtures::ADMIN_NICKNAME)
        .await
        .unwrap();

    assert_eq!(taught.len(), 1);
    assert_eq!(taught[0].title, "Curso de React");
}

#[tokio::test]
async fn legacy_routes_manage_courses() {
    let backend = spawn_backend().await;

    backend.api.create_course(&new_course("Rust")).await.unwrap();
    backend.api.update_course(3, &new_course("Rust avanzado")).await.unwrap();
    assert_eq!(backend.api.get_course(3).await.unwrap().title, "Rust avanzado");
    backend.api.delete_course(3).await.unwrap();

    let requests = backend.state.requests().await;
    assert!(requests.contains(&"POST /courses/create".to_string()));
    assert!(requests.contains(&"PUT /courses/update/3".to_string()));
    assert!(requests.contains(&"DELETE /courses/delete/3".to_string()));
}

#[tokio::test]
async fn rest_routes_manage_courses() {
    let backend = spawn_backend_with(RouteStyle::Rest).await;

    backend.api.create_course(&new_course("Rust")).await.unwrap();
    backend.api.update_course(3, &new_course("Rust avanzado")).await.unwrap();
    backend.api.delete_course(3).await.unwrap();

    let requests = backend.state.requests().await;
    assert!(requests.contains(&"POST /courses".to_string()));
    assert!(requests.contains(&"PUT /courses/3".to_string()));
    assert!(requests.contains(&"DELETE /courses/3".to_string()));
    assert_eq!(backend.state.courses().await.len(), 2);
}

#[tokio::test]
async fn invalid_course_is_a_validation_error() {
    let backend = spawn_backend().await;
    let mut request = new_course("Rust");
    request.title = String::new();

    let err = backend.api.create_course(&request).await.unwrap_err();
    assert_eq!(err.status(), Some(StatusCode::BAD_REQUEST));
}

#[tokio::test]
async fn unreachable_backend_is_a_network_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let api = Arc::new(
        HttpCourseApi::new(&config_for(&format!("http://{}", addr), RouteStyle::Legacy)).unwrap(),
    );
    let err = api.list_courses().await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Network);
    assert_eq!(err.status(), None);
}

/// Backend that answers 200 with bodies the client cannot decode, and 500 on course lookups.
async fn spawn_broken_backend() -> HttpCourseApi {
    use axum::http::StatusCode as AxumStatus;
    use axum::routing::get;

    let app = axum::Router::new()
        .route("/courses", get(|| async { "<html>maintenance</html>" }))
        .route(
            "/courses/{id}",
            get(|| async { (AxumStatus::INTERNAL_SERVER_ERROR, r#"{"error":"db down"}"#) }),
        )
        .route(
            "/users/userId",
            get(|| async { axum::Json(serde_json::json!({ "message": "abc" })) }),
        );
    let base_url = common::serve_router(app).await;
    HttpCourseApi::new(&config_for(&base_url, RouteStyle::Legacy)).unwrap()
}

#[tokio::test]
async fn success_status_with_wrong_body_is_a_decode_error() {
    let api = spawn_broken_backend().await;

    let err = api.list_courses().await.unwrap_err();

    assert!(matches!(err, emarve::ApiError::Decode(_)));
    assert_eq!(err.kind(), ErrorKind::Decode);
    assert_eq!(err.status(), None);
}

#[tokio::test]
async fn server_errors_are_classified_as_server() {
    let api = spawn_broken_backend().await;

    let err = api.get_course(1).await.unwrap_err();

    assert_eq!(err.status(), Some(StatusCode::INTERNAL_SERVER_ERROR));
    assert_eq!(err.kind(), ErrorKind::Server);
    assert!(err.to_string().contains("db down"));
}

#[tokio::test]
async fn non_numeric_user_id_is_a_payload_error() {
    let api = spawn_broken_backend().await;

    let err = api.user_id_for_token("any").await.unwrap_err();

    assert!(matches!(err, emarve::ApiError::UnexpectedPayload(_)));
    assert_eq!(err.kind(), ErrorKind::Decode);
    assert_eq!(err.status(), None);
}

#[tokio::test]
async fn logging_in_as_another_user_forgets_previous_user_id() {
    let backend = spawn_backend().await;
    let session = Session::in_memory();
    let auth = AuthService::new(backend.dyn_api(), session.clone());
    auth.login(fixtures::STUDENT_EMAIL, fixtures::STUDENT_PASSWORD).await.unwrap();
    session.set_user_id(999).unwrap();

    auth.login(fixtures::ADMIN_EMAIL, fixtures::ADMIN_PASSWORD).await.unwrap();

    assert_eq!(session.user_id(), None);
    assert_eq!(session.token().as_deref(), Some(fixtures::ADMIN_TOKEN));
}
