use std::time::Duration;

use crate::db::DEFAULT_QUERY_TIMEOUT;

#[derive(Clone, Debug)]
pub struct AppConfig {
    /// Deadline for each repository call.
    pub query_timeout: Duration,
    /// Origins allowed by CORS. Empty means any origin.
    pub allowed_origins: Vec<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            query_timeout: DEFAULT_QUERY_TIMEOUT,
            allowed_origins: Vec::new(),
        }
    }
}

impl AppConfig {
    pub fn allows_any_origin(&self) -> bool {
        self.allowed_origins.is_empty()
    }
}
