pub mod dto;
pub mod errors;
pub mod extract;
pub mod handlers;

use std::sync::Arc;

use axum::{
    routing::{get, patch, post},
    Router,
};
use utoipa::OpenApi;
use utoipa_axum::router::OpenApiRouter;

use handlers::ApiDoc;

use crate::{
    comments::CommentService, credentials::CredentialService, db::Store, tank::TankService,
    users::UserService,
};

/// Services shared by every handler; each holds the same injected store.
#[derive(Clone)]
pub struct AppState {
    pub tank: TankService,
    pub users: UserService,
    pub comments: CommentService,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self {
            tank: TankService::new(store.clone()),
            users: UserService::new(store.clone(), CredentialService::new()),
            comments: CommentService::new(store),
        }
    }
}

pub fn router(state: AppState) -> Router {
    let (router, api) = OpenApiRouter::with_openapi(ApiDoc::openapi())
        .route(
            "/tank/status",
            get(handlers::get_tank_status).post(handlers::post_tank_status),
        )
        .route(
            "/tank/settings",
            get(handlers::get_tank_settings).post(handlers::post_tank_setting),
        )
        .route("/api/register", post(handlers::register))
        .route("/api/login", post(handlers::login))
        .route("/api/users/{user_id}", get(handlers::get_user))
        .route(
            "/api/comments",
            get(handlers::list_comments).post(handlers::create_comment),
        )
        .route(
            "/api/comments/{comment_id}/status",
            patch(handlers::moderate_comment),
        )
        .with_state(state)
        .split_for_parts();

    router
        .route("/ping", get(handlers::ping))
        .route("/health", get(handlers::health))
        .route(
            "/api-docs/openapi.json",
            get(move || async move { axum::Json(api) }),
        )
}
