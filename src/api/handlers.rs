use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use utoipa::OpenApi;

use super::{
    dto::{
        CommentRequest, ErrorDto, LoginRequest, MessageDto, ModerationRequest, RegisterRequest,
        SettingRequest, TankReadingRequest, TankStatusDto, UserProfileDto, UserSummaryDto,
    },
    errors::AppError,
    extract::{ApiJson, LenientJson},
    AppState,
};
use crate::db::models::{
    Comment, CommentStatus, DeviceSettingRecord, SettingType, Status, Timestamps,
};

// ---------------------------------------------------------------------------
// Query parameters
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct SettingsQuery {
    pub user_id: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct CommentsQuery {
    pub status: Option<CommentStatus>,
}

// ---------------------------------------------------------------------------
// Tank
// ---------------------------------------------------------------------------

/// Latest classified tank status, or an all-normal default before the first
/// reading arrives.
#[utoipa::path(
    get,
    path = "/tank/status",
    responses(
        (status = 200, description = "Most recent tank status", body = TankStatusDto),
        (status = 500, description = "Internal server error", body = ErrorDto),
    ),
    tag = "tank"
)]
pub async fn get_tank_status(
    State(state): State<AppState>,
) -> Result<Json<TankStatusDto>, AppError> {
    let latest = state.tank.latest_status().await?;
    Ok(Json(latest.map(Into::into).unwrap_or_default()))
}

/// Record a telemetry push. Missing metrics are accepted and classified as
/// normal; a request without a body counts as an all-null reading. The body
/// is read as JSON whatever the `Content-Type` says.
#[utoipa::path(
    post,
    path = "/tank/status",
    request_body = TankReadingRequest,
    responses(
        (status = 201, description = "Reading recorded", body = MessageDto),
        (status = 500, description = "Internal server error", body = ErrorDto),
    ),
    tag = "tank"
)]
pub async fn post_tank_status(
    State(state): State<AppState>,
    LenientJson(body): LenientJson<TankReadingRequest>,
) -> Result<(StatusCode, Json<MessageDto>), AppError> {
    state.tank.ingest(body.into()).await?;
    Ok((StatusCode::CREATED, Json(MessageDto::new("created"))))
}

/// Append a device setting change to the setting log.
#[utoipa::path(
    post,
    path = "/tank/settings",
    request_body = SettingRequest,
    responses(
        (status = 201, description = "Setting saved", body = MessageDto),
        (status = 400, description = "Missing or invalid fields", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto),
    ),
    tag = "tank"
)]
pub async fn post_tank_setting(
    State(state): State<AppState>,
    LenientJson(body): LenientJson<SettingRequest>,
) -> Result<(StatusCode, Json<MessageDto>), AppError> {
    state.tank.record_setting(body.into()).await?;
    Ok((StatusCode::CREATED, Json(MessageDto::new("setting saved"))))
}

/// Setting history, newest first.
#[utoipa::path(
    get,
    path = "/tank/settings",
    params(
        ("user_id" = Option<i64>, Query, description = "Only settings attributed to this user"),
    ),
    responses(
        (status = 200, description = "Setting log", body = Vec<DeviceSettingRecord>),
        (status = 500, description = "Internal server error", body = ErrorDto),
    ),
    tag = "tank"
)]
pub async fn get_tank_settings(
    State(state): State<AppState>,
    Query(params): Query<SettingsQuery>,
) -> Result<Json<Vec<DeviceSettingRecord>>, AppError> {
    Ok(Json(state.tank.list_settings(params.user_id).await?))
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

#[utoipa::path(
    post,
    path = "/api/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User created", body = UserSummaryDto),
        (status = 400, description = "Missing fields, bad birthday or malformed body", body = ErrorDto),
        (status = 409, description = "Account already exists", body = ErrorDto),
    ),
    tag = "users"
)]
pub async fn register(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<RegisterRequest>,
) -> Result<(StatusCode, Json<UserSummaryDto>), AppError> {
    let user = state.users.register(body.into()).await?;
    Ok((StatusCode::CREATED, Json(user.into())))
}

#[utoipa::path(
    post,
    path = "/api/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Credentials accepted", body = UserSummaryDto),
        (status = 400, description = "Missing fields", body = ErrorDto),
        (status = 401, description = "Wrong password", body = ErrorDto),
        (status = 404, description = "Unknown account", body = ErrorDto),
    ),
    tag = "users"
)]
pub async fn login(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<LoginRequest>,
) -> Result<Json<UserSummaryDto>, AppError> {
    let user = state.users.login(body.into()).await?;
    Ok(Json(user.into()))
}

#[utoipa::path(
    get,
    path = "/api/users/{user_id}",
    params(
        ("user_id" = i64, Path, description = "User ID"),
    ),
    responses(
        (status = 200, description = "User profile", body = UserProfileDto),
        (status = 404, description = "User not found", body = ErrorDto),
    ),
    tag = "users"
)]
pub async fn get_user(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> Result<Json<UserProfileDto>, AppError> {
    let user = state.users.get(user_id).await?;
    Ok(Json(user.into()))
}

// ---------------------------------------------------------------------------
// Comments
// ---------------------------------------------------------------------------

#[utoipa::path(
    post,
    path = "/api/comments",
    request_body = CommentRequest,
    responses(
        (status = 201, description = "Comment submitted as pending", body = Comment),
        (status = 400, description = "Missing fields", body = ErrorDto),
        (status = 404, description = "User not found", body = ErrorDto),
    ),
    tag = "comments"
)]
pub async fn create_comment(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<CommentRequest>,
) -> Result<(StatusCode, Json<Comment>), AppError> {
    let comment = state.comments.create(body.user_id, body.content).await?;
    Ok((StatusCode::CREATED, Json(comment)))
}

/// Comments newest first, optionally filtered by moderation status.
#[utoipa::path(
    get,
    path = "/api/comments",
    params(
        ("status" = Option<CommentStatus>, Query, description = "pending, approved or rejected"),
    ),
    responses(
        (status = 200, description = "Comments", body = Vec<Comment>),
    ),
    tag = "comments"
)]
pub async fn list_comments(
    State(state): State<AppState>,
    Query(params): Query<CommentsQuery>,
) -> Result<Json<Vec<Comment>>, AppError> {
    Ok(Json(state.comments.list(params.status).await?))
}

#[utoipa::path(
    patch,
    path = "/api/comments/{comment_id}/status",
    params(
        ("comment_id" = i64, Path, description = "Comment ID"),
    ),
    request_body = ModerationRequest,
    responses(
        (status = 200, description = "Comment moderated", body = Comment),
        (status = 400, description = "Unknown status or malformed body", body = ErrorDto),
        (status = 404, description = "Comment not found", body = ErrorDto),
    ),
    tag = "comments"
)]
pub async fn moderate_comment(
    State(state): State<AppState>,
    Path(comment_id): Path<i64>,
    ApiJson(body): ApiJson<ModerationRequest>,
) -> Result<Json<Comment>, AppError> {
    Ok(Json(state.comments.moderate(comment_id, body.status).await?))
}

// ---------------------------------------------------------------------------
// System
// ---------------------------------------------------------------------------

#[utoipa::path(
    get,
    path = "/ping",
    responses(
        (status = 200, description = "Liveness probe", body = MessageDto),
    ),
    tag = "system"
)]
pub async fn ping() -> Json<MessageDto> {
    Json(MessageDto::new("pong"))
}

/// Returns `200 OK` with `{"status":"ok"}` when the server is running.
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is healthy"),
    ),
    tag = "system"
)]
pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

// ---------------------------------------------------------------------------
// OpenAPI spec
// ---------------------------------------------------------------------------

#[derive(OpenApi)]
#[openapi(
    paths(
        get_tank_status,
        post_tank_status,
        post_tank_setting,
        get_tank_settings,
        register,
        login,
        get_user,
        create_comment,
        list_comments,
        moderate_comment,
        ping,
        health,
    ),
    components(schemas(
        TankStatusDto,
        TankReadingRequest,
        SettingRequest,
        MessageDto,
        ErrorDto,
        RegisterRequest,
        LoginRequest,
        UserSummaryDto,
        UserProfileDto,
        CommentRequest,
        ModerationRequest,
        Comment,
        CommentStatus,
        DeviceSettingRecord,
        SettingType,
        Status,
        Timestamps,
    )),
    tags(
        (name = "tank",     description = "Tank telemetry and device settings"),
        (name = "users",    description = "Account registration and lookup"),
        (name = "comments", description = "Comment submission and moderation"),
        (name = "system",   description = "System endpoints"),
    ),
    info(
        title = "Aquarium Companion API",
        version = "0.1.0",
        description = "REST API for smart aquarium telemetry, settings, users and comments"
    )
)]
pub struct ApiDoc;

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
