use std::collections::HashMap;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::Value;

use crate::config::ApiConfig;
use crate::leave_balance::BalanceFigures;

/// Outcome of a profile edit forwarded upstream.
#[derive(Debug, Clone, Serialize)]
pub struct ProfileUpdateOutcome {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_data: Option<Value>,
}

/// Outcome of a profile-image upload or removal.
#[derive(Debug, Clone, Serialize)]
pub struct ImageOutcome {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Client for the upstream HR backend (an opaque JSON-over-HTTP API).
pub struct HrApiClient {
    agent: ureq::Agent,
    config: ApiConfig,
}

impl HrApiClient {
    pub fn new(config: ApiConfig) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build();
        Self { agent, config }
    }

    /// Fetches the leave-type catalog for an employee and returns the type
    /// names. A missing or malformed wrapper degrades to an empty list;
    /// only transport failures are errors.
    pub fn fetch_leave_types(&self, employee_number: &str) -> Result<Vec<String>> {
        let url = self.config.endpoint("/api/time-off-types");
        let json: Value = self
            .agent
            .post(&url)
            .send_json(ureq::json!({ "employee_number": employee_number }))
            .with_context(|| format!("POST {} failed", url))?
            .into_json()
            .context("time-off-types response was not JSON")?;

        Ok(extract_type_names(&json))
    }

    /// Fetches the per-type balance figures, keyed by normalized leave key.
    /// A missing `result` object degrades to an empty map.
    pub fn fetch_leave_balances(
        &self,
        employee_number: &str,
    ) -> Result<HashMap<String, BalanceFigures>> {
        let url = self.config.endpoint("/api/leave-balance");
        let json: Value = self
            .agent
            .post(&url)
            .send_json(ureq::json!({ "employee_number": employee_number }))
            .with_context(|| format!("POST {} failed", url))?
            .into_json()
            .context("leave-balance response was not JSON")?;

        Ok(extract_balance_map(&json))
    }

    /// Forwards an edited profile section upstream. The CSRF token rides in
    /// the X-CSRFToken header, matching what the backend expects from the
    /// portal pages.
    pub fn update_profile(
        &self,
        fields: &HashMap<String, String>,
        section: &str,
    ) -> Result<ProfileUpdateOutcome> {
        let url = self.config.endpoint("/employee/profile/update");

        let mut body = serde_json::Map::new();
        for (key, value) in fields {
            body.insert(key.clone(), Value::String(value.clone()));
        }
        body.insert("section".to_string(), Value::String(section.to_string()));

        let json: Value = self
            .agent
            .post(&url)
            .set("X-Requested-With", "XMLHttpRequest")
            .set("X-CSRFToken", &self.config.csrf_token)
            .send_json(Value::Object(body))
            .with_context(|| format!("POST {} failed", url))?
            .into_json()
            .context("profile update response was not JSON")?;

        let result = json.get("result").cloned().unwrap_or(Value::Null);
        Ok(ProfileUpdateOutcome {
            success: result
                .get("success")
                .and_then(Value::as_bool)
                .unwrap_or(false),
            error: result
                .get("error")
                .and_then(Value::as_str)
                .map(str::to_string),
            updated_data: result.get("updated_data").cloned().filter(|v| !v.is_null()),
        })
    }

    /// Uploads a new profile image as a multipart form.
    pub fn upload_profile_image(
        &self,
        employee_number: &str,
        filename: &str,
        content_type: &str,
        bytes: &[u8],
    ) -> Result<ImageOutcome> {
        let url = self.config.endpoint("/employee/update_profile_image");
        let boundary = multipart_boundary();
        let body = multipart_body(
            &boundary,
            &[
                ("csrf_token", &self.config.csrf_token),
                ("employee_number", employee_number),
            ],
            Some(("image", filename, content_type, bytes)),
        );
        self.send_multipart(&url, &boundary, &body)
    }

    /// Removes the current profile image.
    pub fn remove_profile_image(&self, employee_number: &str) -> Result<ImageOutcome> {
        let url = self.config.endpoint("/employee/remove_profile_image");
        let boundary = multipart_boundary();
        let body = multipart_body(
            &boundary,
            &[
                ("csrf_token", &self.config.csrf_token),
                ("employee_number", employee_number),
            ],
            None,
        );
        self.send_multipart(&url, &boundary, &body)
    }

    fn send_multipart(&self, url: &str, boundary: &str, body: &[u8]) -> Result<ImageOutcome> {
        let json: Value = self
            .agent
            .post(url)
            .set(
                "Content-Type",
                &format!("multipart/form-data; boundary={}", boundary),
            )
            .send_bytes(body)
            .with_context(|| format!("POST {} failed", url))?
            .into_json()
            .context("image endpoint response was not JSON")?;

        Ok(ImageOutcome {
            success: json
                .get("success")
                .and_then(Value::as_bool)
                .unwrap_or(false),
            image_url: json
                .get("image_url")
                .and_then(Value::as_str)
                .map(str::to_string),
            error: json.get("error").and_then(Value::as_str).map(str::to_string),
        })
    }
}

/// Unwraps the nested `result.result` array of the time-off-types response
/// and pulls out the type names. Anything malformed yields an empty list.
pub fn extract_type_names(json: &Value) -> Vec<String> {
    json.get("result")
        .and_then(|r| r.get("result"))
        .and_then(Value::as_array)
        .map(|types| {
            types
                .iter()
                .filter_map(|t| t.get("name").and_then(Value::as_str))
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

/// Pulls the flat key -> figures map out of the leave-balance response.
/// A missing or malformed `result` yields an empty map.
pub fn extract_balance_map(json: &Value) -> HashMap<String, BalanceFigures> {
    json.get("result")
        .cloned()
        .and_then(|r| serde_json::from_value(r).ok())
        .unwrap_or_default()
}

fn multipart_boundary() -> String {
    // nanosecond timestamp is unique enough for one request body
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or(0);
    format!("----hr-dashboard-{}", nanos)
}

/// Builds a multipart/form-data body with text fields and an optional file
/// part, terminated by the closing boundary.
fn multipart_body(
    boundary: &str,
    fields: &[(&str, &str)],
    file: Option<(&str, &str, &str, &[u8])>,
) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(format!("--{}\r\n", boundary).as_bytes());
        body.extend_from_slice(
            format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", name).as_bytes(),
        );
        body.extend_from_slice(value.as_bytes());
        body.extend_from_slice(b"\r\n");
    }
    if let Some((name, filename, content_type, bytes)) = file {
        body.extend_from_slice(format!("--{}\r\n", boundary).as_bytes());
        body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
                name, filename
            )
            .as_bytes(),
        );
        body.extend_from_slice(format!("Content-Type: {}\r\n\r\n", content_type).as_bytes());
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", boundary).as_bytes());
    body
}
