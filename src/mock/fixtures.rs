use crate::models::{Course, Role};

pub const STUDENT_EMAIL: &str = "test@example.com";
pub const STUDENT_PASSWORD: &str = "password123";
pub const STUDENT_TOKEN: &str = "mock-jwt-token-123";
pub const STUDENT_ID: i64 = 123;

pub const ADMIN_EMAIL: &str = "admin@example.com";
pub const ADMIN_PASSWORD: &str = "admin123";
pub const ADMIN_TOKEN: &str = "mock-admin-token-456";
pub const ADMIN_ID: i64 = 1;
pub const ADMIN_NICKNAME: &str = "Juan Pérez";

pub const EXISTING_EMAIL: &str = "existing@example.com";

#[derive(Debug, Clone)]
pub struct MockUser {
    pub id: i64,
    pub nickname: String,
    pub email: String,
    pub password: String,
    pub role: Role,
    pub token: String,
}

pub fn users() -> Vec<MockUser> {
    vec![
        MockUser {
            id: STUDENT_ID,
            nickname: "Estudiante Test".to_string(),
            email: STUDENT_EMAIL.to_string(),
            password: STUDENT_PASSWORD.to_string(),
            role: Role::Student,
            token: STUDENT_TOKEN.to_string(),
        },
        MockUser {
            id: ADMIN_ID,
            nickname: ADMIN_NICKNAME.to_string(),
            email: ADMIN_EMAIL.to_string(),
            password: ADMIN_PASSWORD.to_string(),
            role: Role::Admin,
            token: ADMIN_TOKEN.to_string(),
        },
        MockUser {
            id: 2,
            nickname: "existing".to_string(),
            email: EXISTING_EMAIL.to_string(),
            password: "existing123".to_string(),
            role: Role::Student,
            token: "mock-jwt-token-existing".to_string(),
        },
    ]
}

pub fn courses() -> Vec<Course> {
    vec![
        Course {
            id: 1,
            title: "Curso de React".to_string(),
            description: "Aprende React desde cero".to_string(),
            category: "Frontend".to_string(),
            instructor: ADMIN_NICKNAME.to_string(),
            duration: 40,
            requirement: "Conocimientos básicos de JavaScript".to_string(),
            creation_date: Some("2024-01-15".to_string()),
            last_update: Some("2024-01-20".to_string()),
        },
        Course {
            id: 2,
            title: "Curso de Go".to_string(),
            description: "Programación en Go".to_string(),
            category: "Backend".to_string(),
            instructor: "María García".to_string(),
            duration: 60,
            requirement: "Conocimientos básicos de programación".to_string(),
            creation_date: Some("2024-01-10".to_string()),
            last_update: Some("2024-01-25".to_string()),
        },
    ]
}
