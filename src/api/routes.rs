use std::str::FromStr;

/// Which path family the backend exposes for course mutations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RouteStyle {
    /// `/courses/create`, `/courses/update/:id`, `/courses/delete/:id`
    #[default]
    Legacy,
    /// `POST /courses`, `PUT /courses/:id`, `DELETE /courses/:id`
    Rest,
}

impl RouteStyle {
    pub fn create_course(self) -> String {
        match self {
            RouteStyle::Legacy => "/courses/create".to_string(),
            RouteStyle::Rest => "/courses".to_string(),
        }
    }

    pub fn update_course(self, id: i64) -> String {
        match self {
            RouteStyle::Legacy => format!("/courses/update/{}", id),
            RouteStyle::Rest => format!("/courses/{}", id),
        }
    }

    pub fn delete_course(self, id: i64) -> String {
        match self {
            RouteStyle::Legacy => format!("/courses/delete/{}", id),
            RouteStyle::Rest => format!("/courses/{}", id),
        }
    }
}

impl FromStr for RouteStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "legacy" => Ok(RouteStyle::Legacy),
            "rest" => Ok(RouteStyle::Rest),
            other => Err(other.to_string()),
        }
    }
}
