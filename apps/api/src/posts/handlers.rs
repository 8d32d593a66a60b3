use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::{require_profile_owner, AuthUser};
use crate::errors::AppError;
use crate::models::post::{PostOrigin, PostRow};
use crate::posts::slug::unique_slug;
use crate::posts::store;
use crate::posts::tags::{set_post_tags, tags_for_post};
use crate::profiles::store::find_by_username;
use crate::sections;
use crate::state::AppState;
use crate::validate::{validate_post_fields, ValidationErrors};

#[derive(Debug, Deserialize)]
#[serde(tag = "subaction", rename_all = "snake_case")]
pub enum PostSubaction {
    New {
        title: String,
        #[serde(default)]
        content: String,
        #[serde(default)]
        tags: Vec<String>,
        #[serde(default)]
        origin: PostOrigin,
    },
    Edit {
        id: Uuid,
        title: Option<String>,
        content: Option<String>,
        /// `None` leaves tags alone; `Some` reconciles to the given set.
        tags: Option<Vec<String>>,
    },
    Publish {
        id: Uuid,
    },
    Draft {
        id: Uuid,
    },
    Delete {
        id: Uuid,
    },
}

#[derive(Debug, Serialize)]
pub struct PostView {
    pub id: Uuid,
    pub slug: String,
    pub title: String,
    pub content: String,
    pub published: bool,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PostView {
    pub async fn from_row(pool: &PgPool, row: PostRow) -> Result<Self, AppError> {
        let tags = tags_for_post(pool, row.id)
            .await?
            .into_iter()
            .map(|t| t.name)
            .collect();
        Ok(PostView {
            id: row.id,
            slug: row.slug,
            title: row.title,
            content: row.content,
            published: row.published,
            tags,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// GET /api/v1/profiles/:username/posts
pub async fn list_posts(
    State(state): State<AppState>,
    Path(username): Path<String>,
    user: Option<AuthUser>,
) -> Result<Json<Vec<PostView>>, AppError> {
    let profile = find_by_username(&state.db, &username)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Profile '{username}' not found")))?;
    let include_drafts = user.is_some_and(|u| u.user_id == profile.user_id);

    let rows = store::list_by_profile(&state.db, profile.id, include_drafts).await?;
    let mut posts = Vec::with_capacity(rows.len());
    for row in rows {
        posts.push(PostView::from_row(&state.db, row).await?);
    }
    Ok(Json(posts))
}

/// GET /api/v1/profiles/:username/posts/:slug
pub async fn get_post(
    State(state): State<AppState>,
    Path((username, slug)): Path<(String, String)>,
    user: Option<AuthUser>,
) -> Result<Json<PostView>, AppError> {
    let profile = find_by_username(&state.db, &username)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Profile '{username}' not found")))?;
    let is_owner = user.is_some_and(|u| u.user_id == profile.user_id);

    let row = store::find_by_slug(&state.db, profile.id, &slug)
        .await?
        .filter(|row| row.published || is_owner)
        .ok_or_else(|| AppError::NotFound(format!("Post '{slug}' not found")))?;

    Ok(Json(PostView::from_row(&state.db, row).await?))
}

/// POST /api/v1/profiles/:username/posts
pub async fn mutate_posts(
    State(state): State<AppState>,
    Path(username): Path<String>,
    user: AuthUser,
    Json(action): Json<PostSubaction>,
) -> Result<Response, AppError> {
    let profile = require_profile_owner(&state.db, &username, user).await?;

    match action {
        PostSubaction::New {
            title,
            content,
            tags,
            origin,
        } => {
            validate_post_fields(&title, &content)?;

            // Resolve the origin before writing anything, so a bad section
            // reference fails the whole request.
            let origin_section = match origin {
                PostOrigin::None => None,
                PostOrigin::Section { kind, id } => {
                    let section = sections::store::find_by_id(&state.db, profile.id, kind, id)
                        .await?
                        .ok_or_else(|| {
                            let mut errors = ValidationErrors::default();
                            errors.push("origin.id", format!("unknown {kind} section {id}"));
                            AppError::Validation(errors)
                        })?;
                    Some(section.id)
                }
            };

            let slug = unique_slug(&state.db, &title).await?;
            let row = store::insert_post(&state.db, profile.id, &slug, &title, &content).await?;
            if !tags.is_empty() {
                set_post_tags(&state.db, profile.id, row.id, &tags).await?;
            }
            if let Some(section_id) = origin_section {
                store::link_section(&state.db, section_id, row.id).await?;
            }

            tracing::info!("Created post '{}' ({}) for profile {}", slug, row.id, profile.id);
            let view = PostView::from_row(&state.db, row).await?;
            Ok((StatusCode::CREATED, Json(view)).into_response())
        }
        PostSubaction::Edit {
            id,
            title,
            content,
            tags,
        } => {
            let existing = store::find_by_id(&state.db, profile.id, id)
                .await?
                .ok_or_else(|| AppError::NotFound(format!("Post {id} not found")))?;

            let next_title = title.as_deref().unwrap_or(&existing.title);
            let next_content = content.as_deref().unwrap_or(&existing.content);
            validate_post_fields(next_title, next_content)?;

            let row = store::update_post(&state.db, id, title.as_deref(), content.as_deref())
                .await?
                .ok_or_else(|| AppError::NotFound(format!("Post {id} not found")))?;
            if let Some(tags) = tags {
                set_post_tags(&state.db, profile.id, id, &tags).await?;
            }

            Ok(Json(PostView::from_row(&state.db, row).await?).into_response())
        }
        PostSubaction::Publish { id } => set_published(&state, profile.id, id, true).await,
        PostSubaction::Draft { id } => set_published(&state, profile.id, id, false).await,
        PostSubaction::Delete { id } => {
            store::find_by_id(&state.db, profile.id, id)
                .await?
                .ok_or_else(|| AppError::NotFound(format!("Post {id} not found")))?;
            store::delete_post(&state.db, id).await?;
            tracing::info!("Deleted post {} for profile {}", id, profile.id);
            Ok(StatusCode::NO_CONTENT.into_response())
        }
    }
}

async fn set_published(
    state: &AppState,
    profile_id: Uuid,
    id: Uuid,
    published: bool,
) -> Result<Response, AppError> {
    store::find_by_id(&state.db, profile_id, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Post {id} not found")))?;
    store::set_published(&state.db, id, published).await?;
    Ok(StatusCode::NO_CONTENT.into_response())
}
