use thiserror::Error;

use crate::models::{CourseRequest, RegistrationRequest};
use crate::routes::Route;
use crate::services::AuthService;

pub const LOGIN_ERROR: &str =
    "Hubo un error al iniciar sesión. Por favor, verifica tus credenciales.";
pub const REGISTER_ERROR: &str =
    "Hubo un error al crear la cuenta. Por favor, verifica los datos ingresados.";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("El campo {0} es obligatorio")]
    Required(&'static str),

    #[error("El campo {0} debe ser mayor a cero")]
    NotPositive(&'static str),

    /// Static message shown under the form when the backend refused it.
    #[error("{0}")]
    Rejected(&'static str),
}

fn require(value: &str, field: &'static str) -> Result<(), FormError> {
    if value.trim().is_empty() {
        Err(FormError::Required(field))
    } else {
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl LoginForm {
    pub fn validate(&self) -> Result<(), FormError> {
        require(&self.email, "email")?;
        require(&self.password, "password")
    }

    /// Any backend failure collapses into the one static message.
    pub async fn submit(&self, auth: &AuthService) -> Result<Route, FormError> {
        self.validate()?;
        match auth.login(&self.email, &self.password).await {
            Ok(_) => Ok(Route::Home),
            Err(e) => {
                tracing::warn!("login rejected: {}", e);
                Err(FormError::Rejected(LOGIN_ERROR))
            }
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct RegisterForm {
    pub nickname: String,
    pub email: String,
    pub password: String,
    pub is_instructor: bool,
}

impl RegisterForm {
    pub fn validate(&self) -> Result<(), FormError> {
        require(&self.nickname, "nickname")?;
        require(&self.email, "email")?;
        require(&self.password, "password")
    }

    pub fn to_request(&self) -> RegistrationRequest {
        RegistrationRequest {
            nickname: self.nickname.clone(),
            email: self.email.clone(),
            password: self.password.clone(),
            is_instructor: self.is_instructor,
        }
    }

    pub async fn submit(&self, auth: &AuthService) -> Result<Route, FormError> {
        self.validate()?;
        match auth.register(&self.to_request()).await {
            Ok(_) => Ok(Route::Home),
            Err(e) => {
                tracing::warn!("registration rejected: {}", e);
                Err(FormError::Rejected(REGISTER_ERROR))
            }
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CourseForm {
    pub title: String,
    pub description: String,
    pub category: String,
    pub instructor: String,
    pub duration: i64,
    pub requirement: String,
}

impl CourseForm {
    pub fn from_request(request: CourseRequest) -> Self {
        Self {
            title: request.title,
            description: request.description,
            category: request.category,
            instructor: request.instructor,
            duration: request.duration,
            requirement: request.requirement,
        }
    }

    pub fn validate(&self) -> Result<(), FormError> {
        require(&self.title, "title")?;
        require(&self.description, "description")?;
        require(&self.category, "category")?;
        require(&self.instructor, "instructor")?;
        if self.duration <= 0 {
            return Err(FormError::NotPositive("duration"));
        }
        require(&self.requirement, "requirement")
    }

    pub fn to_request(&self) -> Result<CourseRequest, FormError> {
        self.validate()?;
        Ok(CourseRequest {
            title: self.title.clone(),
            description: self.description.clone(),
            category: self.category.clone(),
            instructor: self.instructor.clone(),
            duration: self.duration,
            requirement: self.requirement.clone(),
        })
    }
}
