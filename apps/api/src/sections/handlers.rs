use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::{require_profile_owner, AuthUser};
use crate::errors::AppError;
use crate::models::post::PostRow;
use crate::models::section::SectionRow;
use crate::profiles::store::find_by_username;
use crate::sections::detail::SectionDetail;
use crate::sections::kind::SectionKind;
use crate::sections::store;
use crate::state::AppState;
use crate::validate::{validate_detail, ValidationErrors};

/// Write protocol for a section collection: one POST endpoint per
/// profile+kind, with the subaction tag selecting the operation.
#[derive(Debug, Deserialize)]
#[serde(tag = "subaction", rename_all = "snake_case")]
pub enum SectionSubaction {
    New {
        detail: SectionDetail,
        #[serde(default)]
        post_ids: Vec<Uuid>,
    },
    Edit {
        id: Uuid,
        detail: SectionDetail,
        /// `None` leaves the attached posts alone; `Some` reconciles to the
        /// given set.
        post_ids: Option<Vec<Uuid>>,
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
pub struct SectionView {
    pub id: Uuid,
    pub kind: SectionKind,
    pub title: String,
    pub published: bool,
    pub detail: SectionDetail,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SectionView {
    pub fn from_row(row: SectionRow) -> Result<Self, AppError> {
        let kind = row.kind().ok_or_else(|| {
            AppError::Internal(anyhow::anyhow!("section {} has unknown kind '{}'", row.id, row.kind))
        })?;
        let detail = row.detail().map_err(|e| {
            AppError::Internal(anyhow::anyhow!("section {} has corrupt data: {e}", row.id))
        })?;
        Ok(SectionView {
            id: row.id,
            kind,
            title: row.title,
            published: row.published,
            detail,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct SectionListResponse {
    pub kind: SectionKind,
    pub entries: Vec<SectionView>,
}

#[derive(Debug, Serialize)]
pub struct SectionGetResponse {
    pub section: SectionView,
    pub posts: Vec<PostRow>,
}

fn parse_kind(raw: &str) -> Result<SectionKind, AppError> {
    SectionKind::parse(raw)
        .ok_or_else(|| AppError::NotFound(format!("No section type '{raw}'")))
}

/// GET /api/v1/profiles/:username/sections/:kind
pub async fn list_sections(
    State(state): State<AppState>,
    Path((username, kind_raw)): Path<(String, String)>,
    user: Option<AuthUser>,
) -> Result<Json<SectionListResponse>, AppError> {
    let kind = parse_kind(&kind_raw)?;
    let profile = find_by_username(&state.db, &username)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Profile '{username}' not found")))?;

    let include_drafts = user.is_some_and(|u| u.user_id == profile.user_id);
    let rows = store::list_by_kind(&state.db, profile.id, kind, include_drafts).await?;
    let entries = rows
        .into_iter()
        .map(SectionView::from_row)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Json(SectionListResponse { kind, entries }))
}

/// GET /api/v1/profiles/:username/sections/:kind/:id
pub async fn get_section(
    State(state): State<AppState>,
    Path((username, kind_raw, id)): Path<(String, String, Uuid)>,
    user: Option<AuthUser>,
) -> Result<Json<SectionGetResponse>, AppError> {
    let kind = parse_kind(&kind_raw)?;
    let profile = find_by_username(&state.db, &username)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Profile '{username}' not found")))?;
    let is_owner = user.is_some_and(|u| u.user_id == profile.user_id);

    let row = store::find_by_id(&state.db, profile.id, kind, id)
        .await?
        .filter(|row| row.published || is_owner)
        .ok_or_else(|| AppError::NotFound(format!("Section {id} not found")))?;

    let mut posts = store::posts_for_section(&state.db, row.id).await?;
    if !is_owner {
        posts.retain(|p| p.published);
    }

    Ok(Json(SectionGetResponse {
        section: SectionView::from_row(row)?,
        posts,
    }))
}

/// POST /api/v1/profiles/:username/sections/:kind
pub async fn mutate_sections(
    State(state): State<AppState>,
    Path((username, kind_raw)): Path<(String, String)>,
    user: AuthUser,
    Json(action): Json<SectionSubaction>,
) -> Result<Response, AppError> {
    let kind = parse_kind(&kind_raw)?;
    let profile = require_profile_owner(&state.db, &username, user).await?;

    match action {
        SectionSubaction::New { detail, post_ids } => {
            check_payload(&state, &profile.id, kind, &detail, Some(&post_ids)).await?;

            let data = serde_json::to_value(&detail).map_err(anyhow::Error::from)?;
            let row =
                store::insert_section(&state.db, profile.id, kind, detail.title(), &data).await?;
            if !post_ids.is_empty() {
                store::set_section_posts(&state.db, row.id, &post_ids).await?;
            }

            tracing::info!("Created {} section {} for profile {}", kind, row.id, profile.id);
            Ok((StatusCode::CREATED, Json(SectionView::from_row(row)?)).into_response())
        }
        SectionSubaction::Edit {
            id,
            detail,
            post_ids,
        } => {
            store::find_by_id(&state.db, profile.id, kind, id)
                .await?
                .ok_or_else(|| AppError::NotFound(format!("Section {id} not found")))?;
            check_payload(&state, &profile.id, kind, &detail, post_ids.as_deref()).await?;

            let data = serde_json::to_value(&detail).map_err(anyhow::Error::from)?;
            let row = store::update_section(&state.db, id, detail.title(), &data)
                .await?
                .ok_or_else(|| AppError::NotFound(format!("Section {id} not found")))?;
            if let Some(post_ids) = post_ids {
                store::set_section_posts(&state.db, id, &post_ids).await?;
            }

            Ok(Json(SectionView::from_row(row)?).into_response())
        }
        SectionSubaction::Publish { id } => set_published(&state, &profile.id, kind, id, true).await,
        SectionSubaction::Draft { id } => set_published(&state, &profile.id, kind, id, false).await,
        SectionSubaction::Delete { id } => {
            store::find_by_id(&state.db, profile.id, kind, id)
                .await?
                .ok_or_else(|| AppError::NotFound(format!("Section {id} not found")))?;
            store::delete_section(&state.db, id).await?;
            tracing::info!("Deleted {} section {} for profile {}", kind, id, profile.id);
            Ok(StatusCode::NO_CONTENT.into_response())
        }
    }
}

async fn set_published(
    state: &AppState,
    profile_id: &Uuid,
    kind: SectionKind,
    id: Uuid,
    published: bool,
) -> Result<Response, AppError> {
    store::find_by_id(&state.db, *profile_id, kind, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Section {id} not found")))?;
    store::set_published(&state.db, id, published).await?;
    Ok(StatusCode::NO_CONTENT.into_response())
}

/// Shared new/edit checks: the payload kind must match the route, the fields
/// must validate, and attached posts must belong to this profile.
async fn check_payload(
    state: &AppState,
    profile_id: &Uuid,
    kind: SectionKind,
    detail: &SectionDetail,
    post_ids: Option<&[Uuid]>,
) -> Result<(), AppError> {
    if detail.kind() != kind {
        let mut errors = ValidationErrors::default();
        errors.push(
            "detail.kind",
            format!("payload is '{}' but the route is '{}'", detail.kind(), kind),
        );
        return Err(errors.into());
    }

    validate_detail(detail)?;

    if let Some(post_ids) = post_ids {
        if !post_ids.is_empty() {
            let foreign = store::foreign_post_ids(&state.db, *profile_id, post_ids).await?;
            if !foreign.is_empty() {
                let mut errors = ValidationErrors::default();
                for id in foreign {
                    errors.push("post_ids", format!("unknown post {id}"));
                }
                return Err(errors.into());
            }
        }
    }

    Ok(())
}
