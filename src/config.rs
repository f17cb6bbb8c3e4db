use std::env;
use std::path::PathBuf;

use crate::api::RouteStyle;
use crate::error::ApiError;

pub const DEFAULT_API_URL: &str = "http://localhost:8080";
pub const DEFAULT_SESSION_FILE: &str = ".emarve_session.json";

#[derive(Clone, Debug)]
pub struct ClientConfig {
    pub api_base_url: String,
    pub session_path: PathBuf,
    pub route_style: RouteStyle,
}

impl ClientConfig {
    pub fn new_from_env() -> Result<Self, ApiError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ApiError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_base_url = lookup("EMARVE_API_URL")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        let session_path = lookup("EMARVE_SESSION_FILE")
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SESSION_FILE));

        let route_style = match lookup("EMARVE_ROUTE_STYLE") {
            Some(value) => value
                .parse::<RouteStyle>()
                .map_err(|_| ApiError::Config(format!("EMARVE_ROUTE_STYLE has unknown value: {}", value)))?,
            None => RouteStyle::default(),
        };

        Ok(Self {
            api_base_url: normalize_base_url(&api_base_url),
            session_path,
            route_style,
        })
    }

    pub fn with_api_url(mut self, url: &str) -> Self {
        self.api_base_url = normalize_base_url(url);
        self
    }
}

fn normalize_base_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}
