use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::auth::{require_profile_owner, AuthUser};
use crate::errors::AppError;
use crate::models::profile::{AvatarRef, ProfileRow};
use crate::posts;
use crate::posts::handlers::PostView;
use crate::profiles::avatar::{avatar_key, extension_for, MAX_AVATAR_BYTES};
use crate::profiles::store;
use crate::sections::handlers::SectionView;
use crate::sections::kind::SectionKind;
use crate::sections::order::{resolve_order, validate_order};
use crate::sections::store as section_store;
use crate::state::AppState;
use crate::validate::{check_required, check_username, ValidationErrors};

#[derive(Debug, Deserialize)]
pub struct CreateProfileRequest {
    pub username: String,
    pub display_name: String,
    pub headline: Option<String>,
    pub about: Option<String>,
    pub location: Option<String>,
}

/// POST /api/v1/profiles
pub async fn create_profile(
    State(state): State<AppState>,
    user: AuthUser,
    Json(req): Json<CreateProfileRequest>,
) -> Result<(StatusCode, Json<ProfileRow>), AppError> {
    let mut errors = ValidationErrors::default();
    check_username(&mut errors, &req.username);
    check_required(&mut errors, "display_name", &req.display_name);
    errors.into_result()?;

    if store::find_by_username(&state.db, &req.username).await?.is_some() {
        return Err(AppError::Conflict(format!(
            "Username '{}' is already taken",
            req.username
        )));
    }

    // The uq_ indexes on username and user_id remain the backstop for
    // anything that races past the check above; violations come back as
    // 409, never as an overwrite.
    let profile = store::insert_profile(
        &state.db,
        store::NewProfile {
            user_id: user.user_id,
            username: &req.username,
            display_name: &req.display_name,
            headline: req.headline.as_deref(),
            about: req.about.as_deref(),
            location: req.location.as_deref(),
        },
    )
    .await?;

    tracing::info!("Created profile '{}' ({})", profile.username, profile.id);
    Ok((StatusCode::CREATED, Json(profile)))
}

#[derive(Debug, Serialize)]
pub struct SectionGroup {
    pub kind: SectionKind,
    pub entries: Vec<SectionView>,
}

/// The shareable profile page payload: profile fields plus sections grouped
/// in the resolved order plus posts.
#[derive(Debug, Serialize)]
pub struct ProfileView {
    pub username: String,
    pub display_name: String,
    pub headline: Option<String>,
    pub about: Option<String>,
    pub location: Option<String>,
    pub avatar: Option<AvatarRef>,
    pub section_order: Vec<SectionKind>,
    pub sections: Vec<SectionGroup>,
    pub posts: Vec<PostView>,
}

/// GET /api/v1/profiles/:username
///
/// Public callers see published content only; the owner also sees drafts.
pub async fn get_profile(
    State(state): State<AppState>,
    Path(username): Path<String>,
    user: Option<AuthUser>,
) -> Result<Json<ProfileView>, AppError> {
    let profile = store::find_by_username(&state.db, &username)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Profile '{username}' not found")))?;
    let is_owner = user.is_some_and(|u| u.user_id == profile.user_id);

    let order = resolve_order(profile.section_order.as_deref());

    let mut sections = Vec::new();
    for kind in &order {
        let rows = section_store::list_by_kind(&state.db, profile.id, *kind, is_owner).await?;
        if rows.is_empty() {
            continue;
        }
        let entries = rows
            .into_iter()
            .map(SectionView::from_row)
            .collect::<Result<Vec<_>, _>>()?;
        sections.push(SectionGroup {
            kind: *kind,
            entries,
        });
    }

    let post_rows = posts::store::list_by_profile(&state.db, profile.id, is_owner).await?;
    let mut post_views = Vec::with_capacity(post_rows.len());
    for row in post_rows {
        post_views.push(PostView::from_row(&state.db, row).await?);
    }

    let avatar = profile.avatar_ref();
    Ok(Json(ProfileView {
        username: profile.username,
        display_name: profile.display_name,
        headline: profile.headline,
        about: profile.about,
        location: profile.location,
        avatar,
        section_order: order,
        sections,
        posts: post_views,
    }))
}

#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    pub display_name: Option<String>,
    pub headline: Option<String>,
    pub about: Option<String>,
    pub location: Option<String>,
}

/// PATCH /api/v1/profiles/:username
pub async fn update_profile(
    State(state): State<AppState>,
    Path(username): Path<String>,
    user: AuthUser,
    Json(req): Json<UpdateProfileRequest>,
) -> Result<Json<ProfileRow>, AppError> {
    let profile = require_profile_owner(&state.db, &username, user).await?;

    let mut errors = ValidationErrors::default();
    if let Some(display_name) = &req.display_name {
        check_required(&mut errors, "display_name", display_name);
    }
    errors.into_result()?;

    let updated = store::update_profile(
        &state.db,
        profile.id,
        store::ProfilePatch {
            display_name: req.display_name.as_deref(),
            headline: req.headline.as_deref(),
            about: req.about.as_deref(),
            location: req.location.as_deref(),
        },
    )
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Profile '{username}' not found")))?;

    Ok(Json(updated))
}

#[derive(Debug, Deserialize)]
pub struct SectionOrderRequest {
    pub order: Vec<String>,
}

/// PUT /api/v1/profiles/:username/section-order
pub async fn put_section_order(
    State(state): State<AppState>,
    Path(username): Path<String>,
    user: AuthUser,
    Json(req): Json<SectionOrderRequest>,
) -> Result<StatusCode, AppError> {
    let profile = require_profile_owner(&state.db, &username, user).await?;

    let order = validate_order(&req.order)?;
    let stored: Vec<String> = order.iter().map(|k| k.as_str().to_string()).collect();
    store::set_section_order(&state.db, profile.id, &stored).await?;

    tracing::info!("Reordered sections for profile {}", profile.id);
    Ok(StatusCode::NO_CONTENT)
}

/// PUT /api/v1/profiles/:username/avatar
///
/// Multipart upload; the first file field is the image. The previous remote
/// object, if any, is deleted after the new one is in place.
pub async fn put_avatar(
    State(state): State<AppState>,
    Path(username): Path<String>,
    user: AuthUser,
    mut multipart: Multipart,
) -> Result<Json<AvatarRef>, AppError> {
    let profile = require_profile_owner(&state.db, &username, user).await?;

    let field = multipart
        .next_field()
        .await
        .map_err(|e| invalid_upload(format!("malformed multipart body: {e}")))?
        .ok_or_else(|| invalid_upload("no file field in upload"))?;

    let content_type = field
        .content_type()
        .map(str::to_string)
        .ok_or_else(|| invalid_upload("missing content type"))?;
    let extension = extension_for(&content_type)
        .ok_or_else(|| invalid_upload(format!("unsupported image type '{content_type}'")))?;

    let bytes = field
        .bytes()
        .await
        .map_err(|e| invalid_upload(format!("failed to read upload: {e}")))?;
    if bytes.is_empty() {
        return Err(invalid_upload("uploaded file is empty"));
    }
    if bytes.len() > MAX_AVATAR_BYTES {
        return Err(invalid_upload(format!(
            "image exceeds the {} MB limit",
            MAX_AVATAR_BYTES / (1024 * 1024)
        )));
    }

    let previous = profile.avatar_ref();

    let key = avatar_key(profile.id, extension);
    let url = state
        .avatars
        .put(&key, bytes, &content_type)
        .await
        .map_err(|e| AppError::Storage(e.to_string()))?;

    let avatar = AvatarRef { id: key, url };
    let value = serde_json::to_value(&avatar).map_err(anyhow::Error::from)?;
    store::set_avatar(&state.db, profile.id, Some(&value)).await?;

    // The new avatar is live; losing the old object is not worth failing
    // the request over.
    if let Some(previous) = previous {
        if let Err(e) = state.avatars.delete(&previous.id).await {
            tracing::warn!("Failed to delete previous avatar {}: {e}", previous.id);
        }
    }

    Ok(Json(avatar))
}

/// DELETE /api/v1/profiles/:username/avatar
pub async fn delete_avatar(
    State(state): State<AppState>,
    Path(username): Path<String>,
    user: AuthUser,
) -> Result<StatusCode, AppError> {
    let profile = require_profile_owner(&state.db, &username, user).await?;

    if let Some(avatar) = profile.avatar_ref() {
        state
            .avatars
            .delete(&avatar.id)
            .await
            .map_err(|e| AppError::Storage(e.to_string()))?;
    }
    store::set_avatar(&state.db, profile.id, None).await?;

    Ok(StatusCode::NO_CONTENT)
}

fn invalid_upload(message: impl Into<String>) -> AppError {
    let mut errors = ValidationErrors::default();
    errors.push("avatar", message);
    AppError::Validation(errors)
}
