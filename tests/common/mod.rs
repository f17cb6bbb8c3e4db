#![allow(dead_code)]

use std::sync::Arc;

use emarve::api::{CourseApi, HttpCourseApi, RouteStyle};
use emarve::config::ClientConfig;
use emarve::mock::{router, MockState};
use emarve::pages::PageContext;
use emarve::session::Session;

pub struct TestBackend {
    pub state: MockState,
    pub base_url: String,
    pub api: Arc<HttpCourseApi>,
}

impl TestBackend {
    pub fn dyn_api(&self) -> Arc<dyn CourseApi> {
        self.api.clone()
    }

    /// Page context whose session already holds `token`, if any.
    pub fn context(&self, token: Option<&str>) -> PageContext {
        let session = Session::in_memory();
        if let Some(token) = token {
            session.store_token(token).expect("memory store never fails");
        }
        PageContext::new(self.dyn_api(), session)
    }
}

pub fn config_for(base_url: &str, style: RouteStyle) -> ClientConfig {
    let style = match style {
        RouteStyle::Legacy => "legacy",
        RouteStyle::Rest => "rest",
    };
    let base_url = base_url.to_string();
    ClientConfig::from_lookup(move |key| match key {
        "EMARVE_API_URL" => Some(base_url.clone()),
        "EMARVE_ROUTE_STYLE" => Some(style.to_string()),
        _ => None,
    })
    .expect("test config is valid")
}

pub async fn spawn_backend() -> TestBackend {
    spawn_backend_with(RouteStyle::Legacy).await
}

/// Serves `app` on an ephemeral port and returns its base url.
pub async fn serve_router(app: axum::Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind mock backend");
    let addr = listener.local_addr().expect("listener has an address");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("mock backend stopped");
    });
    format!("http://{}", addr)
}

pub async fn spawn_backend_with(style: RouteStyle) -> TestBackend {
    let state = MockState::seeded();
    let base_url = serve_router(router(state.clone())).await;
    let api = Arc::new(HttpCourseApi::new(&config_for(&base_url, style)).expect("Failed to create client"));

    TestBackend { state, base_url, api }
}
