use std::sync::Arc;

use tracing::{debug, warn};

use crate::api::CourseApi;
use crate::error::ApiError;
use crate::models::Role;
use crate::session::Session;

/// What a page knows about the signed-in user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Identity {
    pub role: Role,
    pub user_id: Option<i64>,
}

impl Identity {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// Asks the backend who the stored token belongs to. Nothing is decoded
/// locally; each question is its own round trip.
pub struct RoleResolver {
    api: Arc<dyn CourseApi>,
    session: Session,
}

impl RoleResolver {
    pub fn new(api: Arc<dyn CourseApi>, session: Session) -> Self {
        Self { api, session }
    }

    /// `Ok(None)` when there is no token to ask about.
    pub async fn resolve_role(&self) -> Result<Option<Role>, ApiError> {
        let Some(token) = self.session.token() else {
            debug!("no stored token, skipping role lookup");
            return Ok(None);
        };
        let role = self.api.authenticate(&token).await?;
        Ok(Some(role))
    }

    /// Also records the id under `userId` for screens that read it later.
    pub async fn resolve_user_id(&self) -> Result<Option<i64>, ApiError> {
        let Some(token) = self.session.token() else {
            return Ok(None);
        };
        let user_id = self.api.user_id_for_token(&token).await?;
        self.session.set_user_id(user_id)?;
        Ok(Some(user_id))
    }

    /// Failures fall back to the student experience without a user id.
    pub async fn resolve(&self) -> Identity {
        let role = match self.resolve_role().await {
            Ok(role) => role.unwrap_or_default(),
            Err(e) => {
                warn!("Error fetching user type: {}", e);
                Role::default()
            }
        };

        let user_id = match self.resolve_user_id().await {
            Ok(id) => id,
            Err(e) => {
                warn!("Error fetching user id: {}", e);
                None
            }
        };

        Identity { role, user_id }
    }
}
