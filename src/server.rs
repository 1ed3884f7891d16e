use axum::{
    body::Bytes,
    extract::{Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::balance_service::BalanceService;
use crate::calendar::DayCell;
use crate::config::AppConfig;
use crate::day_detail::{resolve, Resolution};
use crate::hr_api::HrApiClient;
use crate::render;
use crate::validate;

/// Application state shared across handlers.
pub struct AppState {
    /// Upstream client for the profile endpoints.
    pub api: HrApiClient,
    /// Aggregator owning its own upstream client.
    pub balances: BalanceService<HrApiClient>,
}

#[derive(Deserialize)]
pub struct DayDetailsRequest {
    /// The clicked cell's data attributes, exactly as rendered in the page.
    pub attributes: HashMap<String, String>,
}

#[derive(Deserialize)]
pub struct BalanceRequest {
    pub employee_number: String,
}

#[derive(Deserialize)]
pub struct ProfileUpdateRequest {
    pub section: String,
    pub fields: HashMap<String, String>,
}

#[derive(Deserialize)]
pub struct PasswordRequest {
    pub password: String,
}

#[derive(Serialize)]
pub struct PasswordAdvisory {
    pub strong: bool,
    pub message: String,
}

#[derive(Deserialize)]
pub struct ImageUploadQuery {
    pub employee_number: String,
    pub filename: String,
}

/// Error response
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Starts the HTTP server.
pub async fn run(config: AppConfig) {
    let state = AppState {
        api: HrApiClient::new(config.api.clone()),
        balances: BalanceService::new(HrApiClient::new(config.api.clone())),
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .route("/health", get(health_check))
        .route("/api/day-details", post(day_details))
        .route("/api/leave-balance", post(leave_balance))
        .route("/api/profile/update", post(profile_update))
        .route("/api/profile/image", post(profile_image_upload))
        .route("/api/profile/image/remove", post(profile_image_remove))
        .route("/api/password-strength", post(password_strength))
        .layer(cors)
        .with_state(Arc::new(state));

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.port))
        .await
        .expect("Failed to bind to port");

    log::info!("Server listening on port {}", config.port);
    axum::serve(listener, app).await.expect("Server failed");
}

/// Health check
async fn health_check() -> &'static str {
    "OK"
}

fn html_fragment(html: String) -> Response {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/html; charset=utf-8")],
        html,
    )
        .into_response()
}

/// Resolves a clicked calendar day. Non-interactive days answer 204 so the
/// page knows not to open the modal.
async fn day_details(Json(req): Json<DayDetailsRequest>) -> Response {
    let cell = DayCell::from_attrs(&req.attributes);
    match resolve(&cell) {
        Resolution::Blocked => StatusCode::NO_CONTENT.into_response(),
        Resolution::Plan(plan) => html_fragment(render::render_day_modal(&plan)),
    }
}

/// Runs the leave-balance pipeline and returns the rendered grid. Upstream
/// failures come back as the error placeholder, still with status 200, so
/// the page swaps the fragment in either way.
async fn leave_balance(
    State(state): State<Arc<AppState>>,
    Json(req): Json<BalanceRequest>,
) -> Response {
    if req.employee_number.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse { error: "employee_number is required".to_string() }),
        )
            .into_response();
    }

    let view = state.balances.load(&req.employee_number);
    html_fragment(render::render_balance_grid(&view))
}

/// Forwards an edited profile section to the upstream API.
async fn profile_update(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ProfileUpdateRequest>,
) -> Response {
    match state.api.update_profile(&req.fields, &req.section) {
        Ok(outcome) => (StatusCode::OK, Json(outcome)).into_response(),
        Err(e) => (
            StatusCode::BAD_GATEWAY,
            Json(ErrorResponse { error: format!("Profile update failed: {}", e) }),
        )
            .into_response(),
    }
}

/// Accepts the raw image bytes, validates them, and forwards the multipart
/// upload upstream.
async fn profile_image_upload(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ImageUploadQuery>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();

    if let Err(message) = validate::check_image_upload(&content_type, body.len() as u64) {
        return (StatusCode::BAD_REQUEST, Json(ErrorResponse { error: message })).into_response();
    }

    match state.api.upload_profile_image(
        &query.employee_number,
        &query.filename,
        &content_type,
        &body,
    ) {
        Ok(outcome) => (StatusCode::OK, Json(outcome)).into_response(),
        Err(e) => (
            StatusCode::BAD_GATEWAY,
            Json(ErrorResponse { error: format!("Image upload failed: {}", e) }),
        )
            .into_response(),
    }
}

/// Removes the employee's profile image via the upstream API.
async fn profile_image_remove(
    State(state): State<Arc<AppState>>,
    Json(req): Json<BalanceRequest>,
) -> Response {
    match state.api.remove_profile_image(&req.employee_number) {
        Ok(outcome) => (StatusCode::OK, Json(outcome)).into_response(),
        Err(e) => (
            StatusCode::BAD_GATEWAY,
            Json(ErrorResponse { error: format!("Image removal failed: {}", e) }),
        )
            .into_response(),
    }
}

/// Password-strength advisory for the registration form.
async fn password_strength(Json(req): Json<PasswordRequest>) -> Json<PasswordAdvisory> {
    match validate::password_strength(&req.password) {
        Ok(()) => Json(PasswordAdvisory {
            strong: true,
            message: "Strong password".to_string(),
        }),
        Err(message) => Json(PasswordAdvisory { strong: false, message }),
    }
}
