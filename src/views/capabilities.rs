use crate::models::Role;

/// Where a course list page gets its rows from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataSource {
    AllCourses,
    Subscriptions,
    /// Courses whose instructor is the signed-in user.
    TaughtCourses,
}

/// Everything a screen may show or do, decided once from the role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    pub can_create: bool,
    pub can_edit: bool,
    pub can_delete: bool,
    pub can_subscribe: bool,
    pub can_open_details: bool,
    pub data_source: DataSource,
}

impl Capabilities {
    const NONE: Capabilities = Capabilities {
        can_create: false,
        can_edit: false,
        can_delete: false,
        can_subscribe: false,
        can_open_details: false,
        data_source: DataSource::AllCourses,
    };

    pub fn for_home(role: Role) -> Self {
        match role {
            Role::Admin => Self {
                can_create: true,
                can_edit: true,
                can_delete: true,
                ..Self::NONE
            },
            Role::Student => Self {
                can_subscribe: true,
                ..Self::NONE
            },
        }
    }

    pub fn for_my_courses(role: Role) -> Self {
        let data_source = match role {
            Role::Admin => DataSource::TaughtCourses,
            Role::Student => DataSource::Subscriptions,
        };
        Self {
            can_open_details: true,
            data_source,
            ..Self::NONE
        }
    }

    pub fn for_course_details(role: Role) -> Self {
        match role {
            Role::Admin => Self {
                can_edit: true,
                can_delete: true,
                ..Self::NONE
            },
            Role::Student => Self::NONE,
        }
    }
}
