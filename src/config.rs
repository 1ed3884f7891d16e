use std::env;

/// Upstream HR API settings.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base URL of the HR backend, without a trailing slash.
    pub base_url: String,
    /// CSRF token forwarded on state-changing calls.
    pub csrf_token: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl ApiConfig {
    /// Reads the upstream settings from the environment.
    /// Variables: HR_API_BASE_URL, HR_API_CSRF_TOKEN, HR_API_TIMEOUT_SECS
    pub fn from_env() -> Self {
        Self {
            base_url: env::var("HR_API_BASE_URL")
                .unwrap_or_else(|_| "http://127.0.0.1:8069".to_string()),
            csrf_token: env::var("HR_API_CSRF_TOKEN").unwrap_or_default(),
            timeout_secs: env::var("HR_API_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(30),
        }
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }
}

/// Service-level settings.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub api: ApiConfig,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(8080),
            api: ApiConfig::from_env(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_joins_without_double_slash() {
        let config = ApiConfig {
            base_url: "http://hr.example.com/".to_string(),
            csrf_token: String::new(),
            timeout_secs: 30,
        };
        assert_eq!(
            config.endpoint("/api/leave-balance"),
            "http://hr.example.com/api/leave-balance"
        );
    }
}
