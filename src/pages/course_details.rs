use tracing::{info, warn};

use crate::models::{Comment, CommentRequest, Course, FileUpload, UploadedFile};
use crate::routes::Route;
use crate::services::Identity;
use crate::views::{render, Capabilities, CourseForm, FormError};

use super::{PageContext, PageError, PageState};

pub const FETCH_ERROR: &str = "Error fetching course data.";
pub const UPLOAD_OK: &str = "Archivo subido con éxito.";

pub struct CourseDetailsPage {
    ctx: PageContext,
    identity: Identity,
    caps: Capabilities,
    course: Option<Course>,
    comments: Vec<Comment>,
    files: Vec<UploadedFile>,
    error: Option<String>,
    state: PageState,
}

impl CourseDetailsPage {
    /// Shows the course last opened from a list (the `CourseId` session key).
    pub async fn mount(ctx: PageContext) -> Self {
        let identity = ctx.resolver().resolve().await;
        let mut page = Self::with_identity(ctx, identity);
        page.load().await;
        page
    }

    pub fn with_identity(ctx: PageContext, identity: Identity) -> Self {
        Self {
            caps: Capabilities::for_course_details(identity.role),
            ctx,
            identity,
            course: None,
            comments: Vec::new(),
            files: Vec::new(),
            error: None,
            state: PageState::Loading,
        }
    }

    pub fn course(&self) -> Option<&Course> {
        self.course.as_ref()
    }

    pub fn comments(&self) -> &[Comment] {
        &self.comments
    }

    pub fn files(&self) -> &[UploadedFile] {
        &self.files
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn state(&self) -> PageState {
        self.state
    }

    pub fn capabilities(&self) -> &Capabilities {
        &self.caps
    }

    /// Without a stored course id the page stays in `Loading`.
    pub async fn load(&mut self) {
        let Some(course_id) = self.ctx.session.course_id() else {
            return;
        };

        match self.ctx.api.get_course(course_id).await {
            Ok(course) => {
                self.course = Some(course);
                self.error = None;
            }
            Err(e) => {
                warn!("Error fetching course: {}", e);
                self.error = Some(FETCH_ERROR.to_string());
                return;
            }
        }

        self.refresh_comments(course_id).await;
        self.refresh_files(course_id).await;
        self.state = PageState::Idle;
    }

    async fn refresh_comments(&mut self, course_id: i64) {
        match self.ctx.api.list_comments(course_id).await {
            Ok(comments) => self.comments = comments,
            Err(e) => warn!("Error fetching comments: {}", e),
        }
    }

    async fn refresh_files(&mut self, course_id: i64) {
        match self.ctx.api.list_course_files(course_id).await {
            Ok(files) => self.files = files,
            Err(e) => warn!("Error fetching files: {}", e),
        }
    }

    fn loaded_course_id(&self) -> Result<i64, PageError> {
        self.course.as_ref().map(|c| c.id).ok_or(PageError::NoCourse)
    }

    /// Only the id resolved from the current token counts.
    fn user_id(&self) -> Result<i64, PageError> {
        self.identity.user_id.ok_or(PageError::NotSignedIn)
    }

    pub async fn add_comment(&mut self, text: &str) -> Result<(), PageError> {
        if text.trim().is_empty() {
            return Err(FormError::Required("comment").into());
        }
        let course_id = self.loaded_course_id()?;
        let user_id = self.user_id()?;

        let request = CommentRequest {
            user_id,
            course_id,
            comment: text.to_string(),
        };
        self.ctx.api.add_comment(&request).await?;
        self.refresh_comments(course_id).await;
        Ok(())
    }

    pub async fn upload(&mut self, file: &FileUpload) -> Result<&'static str, PageError> {
        let course_id = self.loaded_course_id()?;
        let user_id = self.user_id()?;

        self.ctx.api.upload_file(file, user_id, course_id).await?;
        info!("uploaded {} to course {}", file.file_name, course_id);
        self.refresh_files(course_id).await;
        Ok(UPLOAD_OK)
    }

    pub async fn update(&mut self, form: &CourseForm) -> Result<(), PageError> {
        if !self.caps.can_edit {
            return Err(PageError::NotPermitted("edit"));
        }
        let course_id = self.loaded_course_id()?;
        let request = form.to_request()?;

        self.ctx.api.update_course(course_id, &request).await?;
        match self.ctx.api.get_course(course_id).await {
            Ok(course) => self.course = Some(course),
            Err(e) => warn!("Error fetching course: {}", e),
        }
        Ok(())
    }

    pub async fn delete(&mut self) -> Result<Route, PageError> {
        if !self.caps.can_delete {
            return Err(PageError::NotPermitted("delete"));
        }
        let course_id = self.loaded_course_id()?;
        self.ctx.api.delete_course(course_id).await?;
        info!("course {} deleted", course_id);
        self.course = None;
        Ok(Route::Home)
    }

    pub fn render(&self) -> String {
        if let Some(error) = &self.error {
            return format!("{}\n", error);
        }
        let Some(course) = &self.course else {
            return format!("{}\n", render::LOADING);
        };

        let mut out = render::course_detail(course, &self.caps);
        out.push('\n');
        out.push_str(&render::files(&self.files));
        out.push('\n');
        out.push_str(&render::comments(&self.comments));
        out
    }
}
