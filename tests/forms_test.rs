mod common;

use emarve::api::CourseApi;
use emarve::mock::fixtures;
use emarve::models::Role;
use emarve::routes::Route;
use emarve::services::AuthService;
use emarve::session::Session;
use emarve::views::forms::{LOGIN_ERROR, REGISTER_ERROR};
use emarve::views::{FormError, LoginForm, RegisterForm};

use common::spawn_backend;

#[tokio::test]
async fn login_form_goes_home_on_success() {
    let backend = spawn_backend().await;
    let session = Session::in_memory();
    let auth = AuthService::new(backend.dyn_api(), session.clone());

    let form = LoginForm {
        email: fixtures::ADMIN_EMAIL.to_string(),
        password: fixtures::ADMIN_PASSWORD.to_string(),
    };

    assert_eq!(form.submit(&auth).await, Ok(Route::Home));
    assert_eq!(session.token().as_deref(), Some(fixtures::ADMIN_TOKEN));
}

#[tokio::test]
async fn login_form_shows_static_message_on_failure() {
    let backend = spawn_backend().await;
    let auth = AuthService::new(backend.dyn_api(), Session::in_memory());

    let form = LoginForm {
        email: "nadie@example.com".to_string(),
        password: "x".to_string(),
    };

    let err = form.submit(&auth).await.unwrap_err();
    assert_eq!(err, FormError::Rejected(LOGIN_ERROR));
    assert_eq!(err.to_string(), LOGIN_ERROR);
}

#[tokio::test]
async fn register_form_reports_duplicate_email() {
    let backend = spawn_backend().await;
    let auth = AuthService::new(backend.dyn_api(), Session::in_memory());

    let form = RegisterForm {
        nickname: "otra".to_string(),
        email: fixtures::EXISTING_EMAIL.to_string(),
        password: "secret".to_string(),
        is_instructor: false,
    };

    assert_eq!(form.submit(&auth).await, Err(FormError::Rejected(REGISTER_ERROR)));
}

#[tokio::test]
async fn registered_instructor_can_log_in_as_admin() {
    let backend = spawn_backend().await;
    let session = Session::in_memory();
    let auth = AuthService::new(backend.dyn_api(), session.clone());

    let form = RegisterForm {
        nickname: "Profe".to_string(),
        email: "profe@example.com".to_string(),
        password: "clave".to_string(),
        is_instructor: true,
    };
    assert_eq!(form.submit(&auth).await, Ok(Route::Home));

    let token = auth.login("profe@example.com", "clave").await.unwrap();
    assert_eq!(backend.api.authenticate(&token).await.unwrap(), Role::Admin);
}
