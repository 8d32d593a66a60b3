pub mod health;

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::posts::handlers as post_handlers;
use crate::profiles::handlers as profile_handlers;
use crate::sections::handlers as section_handlers;
use crate::state::AppState;

/// Routes:
///
/// ```text
/// GET    /health
/// POST   /api/v1/profiles
/// GET    /api/v1/profiles/:username
/// PATCH  /api/v1/profiles/:username
/// PUT    /api/v1/profiles/:username/section-order
/// PUT    /api/v1/profiles/:username/avatar
/// DELETE /api/v1/profiles/:username/avatar
/// GET    /api/v1/profiles/:username/sections/:kind
/// POST   /api/v1/profiles/:username/sections/:kind     (subaction dispatch)
/// GET    /api/v1/profiles/:username/sections/:kind/:id
/// GET    /api/v1/profiles/:username/posts
/// POST   /api/v1/profiles/:username/posts              (subaction dispatch)
/// GET    /api/v1/profiles/:username/posts/:slug
/// ```
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/profiles", post(profile_handlers::create_profile))
        .route(
            "/api/v1/profiles/:username",
            get(profile_handlers::get_profile).patch(profile_handlers::update_profile),
        )
        .route(
            "/api/v1/profiles/:username/section-order",
            put(profile_handlers::put_section_order),
        )
        .route(
            "/api/v1/profiles/:username/avatar",
            put(profile_handlers::put_avatar).delete(profile_handlers::delete_avatar),
        )
        .route(
            "/api/v1/profiles/:username/sections/:kind",
            get(section_handlers::list_sections).post(section_handlers::mutate_sections),
        )
        .route(
            "/api/v1/profiles/:username/sections/:kind/:id",
            get(section_handlers::get_section),
        )
        .route(
            "/api/v1/profiles/:username/posts",
            get(post_handlers::list_posts).post(post_handlers::mutate_posts),
        )
        .route(
            "/api/v1/profiles/:username/posts/:slug",
            get(post_handlers::get_post),
        )
        .with_state(state)
}
