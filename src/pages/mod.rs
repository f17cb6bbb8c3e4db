pub mod catalog;
pub mod course_details;

use std::sync::Arc;

use thiserror::Error;

use crate::api::CourseApi;
use crate::error::ApiError;
use crate::services::RoleResolver;
use crate::session::Session;
use crate::views::FormError;

pub use catalog::{CatalogPage, CourseModal, PageKind, SubscribeOutcome};
pub use course_details::CourseDetailsPage;

/// Handles every page needs: the backend and the persisted session.
#[derive(Clone)]
pub struct PageContext {
    pub api: Arc<dyn CourseApi>,
    pub session: Session,
}

impl PageContext {
    pub fn new(api: Arc<dyn CourseApi>, session: Session) -> Self {
        Self { api, session }
    }

    pub fn resolver(&self) -> RoleResolver {
        RoleResolver::new(self.api.clone(), self.session.clone())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageState {
    Loading,
    Idle,
}

#[derive(Debug, Error)]
pub enum PageError {
    #[error("Action not available: {0}")]
    NotPermitted(&'static str),

    #[error("Not signed in")]
    NotSignedIn,

    #[error("Nothing to submit")]
    NoModal,

    #[error("No course loaded")]
    NoCourse,

    #[error("Unknown course {0}")]
    UnknownCourse(i64),

    #[error(transparent)]
    Form(#[from] FormError),

    #[error(transparent)]
    Api(#[from] ApiError),
}
