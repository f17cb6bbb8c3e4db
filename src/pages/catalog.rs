use tracing::{info, warn};

use crate::error::ApiError;
use crate::models::{Course, CourseRequest, SubscribeRequest};
use crate::routes::Route;
use crate::services::Identity;
use crate::views::{render, Capabilities, CourseForm, DataSource, SearchBar};

use super::{PageContext, PageError, PageState};

pub const ENROLLED: &str = "Inscripcion Exitosa";
pub const ALREADY_ENROLLED: &str = "Ya se encuentra inscrito";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageKind {
    Home,
    MyCourses,
}

impl PageKind {
    fn capabilities(self, identity: &Identity) -> Capabilities {
        match self {
            PageKind::Home => Capabilities::for_home(identity.role),
            PageKind::MyCourses => Capabilities::for_my_courses(identity.role),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CourseModal {
    Create,
    Update(Course),
}

impl CourseModal {
    /// Prefilled form shown when the modal opens.
    pub fn initial_form(&self) -> CourseForm {
        match self {
            CourseModal::Create => CourseForm::default(),
            CourseModal::Update(course) => CourseForm::from_request(CourseRequest::from(course)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubscribeOutcome {
    Enrolled,
    AlreadyEnrolled,
    /// Any other failure. Nothing is shown.
    Failed,
    NotSignedIn,
}

impl SubscribeOutcome {
    pub fn alert(&self) -> Option<&'static str> {
        match self {
            SubscribeOutcome::Enrolled => Some(ENROLLED),
            SubscribeOutcome::AlreadyEnrolled => Some(ALREADY_ENROLLED),
            SubscribeOutcome::Failed | SubscribeOutcome::NotSignedIn => None,
        }
    }
}

/// A course list screen: Home or My Courses, for any role. Which rows are
/// loaded and which controls exist comes from the capability set alone.
pub struct CatalogPage {
    ctx: PageContext,
    kind: PageKind,
    identity: Identity,
    caps: Capabilities,
    courses: Vec<Course>,
    state: PageState,
    modal: Option<CourseModal>,
    search: SearchBar,
}

impl CatalogPage {
    pub async fn home(ctx: PageContext) -> Self {
        Self::mount(ctx, PageKind::Home).await
    }

    pub async fn my_courses(ctx: PageContext) -> Self {
        Self::mount(ctx, PageKind::MyCourses).await
    }

    pub async fn mount(ctx: PageContext, kind: PageKind) -> Self {
        let identity = ctx.resolver().resolve().await;
        let mut page = Self::with_identity(ctx, kind, identity);
        page.refresh().await;
        page
    }

    /// Builds the page without any request. Call `refresh` to load rows.
    pub fn with_identity(ctx: PageContext, kind: PageKind, identity: Identity) -> Self {
        Self {
            caps: kind.capabilities(&identity),
            ctx,
            kind,
            identity,
            courses: Vec::new(),
            state: PageState::Loading,
            modal: None,
            search: SearchBar::new(),
        }
    }

    pub fn kind(&self) -> PageKind {
        self.kind
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    pub fn capabilities(&self) -> &Capabilities {
        &self.caps
    }

    pub fn courses(&self) -> &[Course] {
        &self.courses
    }

    pub fn state(&self) -> PageState {
        self.state
    }

    pub fn modal(&self) -> Option<&CourseModal> {
        self.modal.as_ref()
    }

    /// Replaces the list from the page's data source. On failure the
    /// previous rows stay on screen.
    pub async fn refresh(&mut self) {
        self.state = PageState::Loading;
        match self.load().await {
            Ok(Some(courses)) => self.courses = courses,
            Ok(None) => {}
            Err(e) => warn!("Error fetching courses: {}", e),
        }
        self.state = PageState::Idle;
    }

    async fn load(&self) -> Result<Option<Vec<Course>>, ApiError> {
        let api = &self.ctx.api;
        match self.caps.data_source {
            DataSource::AllCourses => api.list_courses().await.map(Some),
            DataSource::Subscriptions => match self.identity.user_id {
                Some(user_id) => api.list_subscriptions(user_id).await.map(Some),
                None => Ok(None),
            },
            DataSource::TaughtCourses => match self.identity.user_id {
                Some(user_id) => {
                    let user = api.get_user(user_id).await?;
                    api.list_courses_by_instructor(&user.nickname).await.map(Some)
                }
                None => Ok(None),
            },
        }
    }

    /// Replaces the list with the search result. Failures leave it alone.
    pub async fn search(&mut self, query: &str) {
        self.search.set_query(query);
        match self.search.submit(self.ctx.api.as_ref()).await {
            Ok(courses) => self.courses = courses,
            Err(e) => warn!("Error fetching courses: {}", e),
        }
    }

    pub async fn subscribe(&self, course_id: i64) -> Result<SubscribeOutcome, PageError> {
        if !self.caps.can_subscribe {
            return Err(PageError::NotPermitted("subscribe"));
        }
        let Some(user_id) = self.identity.user_id else {
            return Ok(SubscribeOutcome::NotSignedIn);
        };

        let request = SubscribeRequest { user_id, course_id };
        let outcome = match self.ctx.api.subscribe(&request).await {
            Ok(_) => {
                info!("user {} subscribed to course {}", user_id, course_id);
                SubscribeOutcome::Enrolled
            }
            Err(e) if e.is_conflict() => SubscribeOutcome::AlreadyEnrolled,
            Err(e) => {
                warn!("subscription failed: {}", e);
                SubscribeOutcome::Failed
            }
        };
        Ok(outcome)
    }

    /// Drops the course from the visible list once the backend confirms,
    /// without reloading.
    pub async fn delete(&mut self, course_id: i64) -> Result<(), PageError> {
        if !self.caps.can_delete {
            return Err(PageError::NotPermitted("delete"));
        }
        self.ctx.api.delete_course(course_id).await?;
        self.courses.retain(|c| c.id != course_id);
        info!("course {} deleted", course_id);
        Ok(())
    }

    pub fn open_create(&mut self) -> Result<CourseForm, PageError> {
        if !self.caps.can_create {
            return Err(PageError::NotPermitted("create"));
        }
        let modal = CourseModal::Create;
        let form = modal.initial_form();
        self.modal = Some(modal);
        Ok(form)
    }

    pub fn open_update(&mut self, course_id: i64) -> Result<CourseForm, PageError> {
        if !self.caps.can_edit {
            return Err(PageError::NotPermitted("edit"));
        }
        let course = self
            .courses
            .iter()
            .find(|c| c.id == course_id)
            .cloned()
            .ok_or(PageError::UnknownCourse(course_id))?;
        let modal = CourseModal::Update(course);
        let form = modal.initial_form();
        self.modal = Some(modal);
        Ok(form)
    }

    pub fn close_modal(&mut self) {
        self.modal = None;
    }

    /// Sends the open modal's form, closes it and reloads the list. On
    /// failure the modal stays open.
    pub async fn submit(&mut self, form: &CourseForm) -> Result<(), PageError> {
        let modal = self.modal.as_ref().ok_or(PageError::NoModal)?;
        let request = form.to_request()?;

        match modal {
            CourseModal::Create => {
                self.ctx.api.create_course(&request).await?;
                info!("course created: {}", request.title);
            }
            CourseModal::Update(course) => {
                self.ctx.api.update_course(course.id, &request).await?;
                info!("course {} updated", course.id);
            }
        }

        self.modal = None;
        self.refresh().await;
        Ok(())
    }

    /// Remembers the course for the details screen.
    pub fn open_details(&self, course_id: i64) -> Result<Route, PageError> {
        self.ctx.session.set_course_id(course_id).map_err(ApiError::from)?;
        Ok(Route::CourseDetails)
    }

    pub fn render(&self) -> String {
        let mut out = render::navbar(&self.caps);
        out.push('\n');
        out.push_str(&render::course_list(&self.courses, &self.caps));
        if let Some(modal) = &self.modal {
            let title = match modal {
                CourseModal::Create => "Formulario del Curso (nuevo)".to_string(),
                CourseModal::Update(course) => format!("Formulario del Curso (#{})", course.id),
            };
            out.push('\n');
            out.push_str(&title);
            out.push('\n');
        }
        out
    }
}
