use std::sync::Arc;

use tracing::info;

use crate::api::CourseApi;
use crate::error::ApiError;
use crate::models::{LoginRequest, RegistrationRequest};
use crate::routes::Route;
use crate::session::Session;

pub struct AuthService {
    api: Arc<dyn CourseApi>,
    session: Session,
}

impl AuthService {
    pub fn new(api: Arc<dyn CourseApi>, session: Session) -> Self {
        Self { api, session }
    }

    /// Stores the token under both session keys only once the backend accepted it.
    pub async fn login(&self, email: &str, password: &str) -> Result<String, ApiError> {
        let request = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let token = self.api.login(&request).await?;
        self.session.store_token(&token)?;
        info!("logged in as {}", email);
        Ok(token)
    }

    pub async fn register(&self, request: &RegistrationRequest) -> Result<String, ApiError> {
        let message = self.api.register(request).await?;
        info!("registered {}", request.email);
        Ok(message)
    }

    pub fn logout(&self) -> Result<Route, ApiError> {
        self.session.clear()?;
        info!("logged out");
        Ok(Route::Root)
    }
}
