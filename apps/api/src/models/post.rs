use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::sections::kind::SectionKind;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PostRow {
    pub id: Uuid,
    pub profile_id: Uuid,
    pub slug: String,
    pub title: String,
    pub content: String,
    pub published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct TagRow {
    pub id: Uuid,
    pub profile_id: Uuid,
    pub name: String,
}

/// Where a new post is being written from. A post created off a section's
/// edit page is linked to that section at creation time; the match on this
/// union is exhaustive, unlike a bag of optional foreign keys.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PostOrigin {
    #[default]
    None,
    Section {
        kind: SectionKind,
        id: Uuid,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_origin_default_is_none() {
        assert_eq!(PostOrigin::default(), PostOrigin::None);
    }

    #[test]
    fn test_origin_section_roundtrip() {
        let origin = PostOrigin::Section {
            kind: SectionKind::Awards,
            id: Uuid::new_v4(),
        };
        let json = serde_json::to_string(&origin).unwrap();
        assert!(json.contains("\"type\":\"section\""));
        assert!(json.contains("\"kind\":\"awards\""));
        let back: PostOrigin = serde_json::from_str(&json).unwrap();
        assert_eq!(back, origin);
    }

    #[test]
    fn test_origin_none_shape() {
        let json = serde_json::to_string(&PostOrigin::None).unwrap();
        assert_eq!(json, r#"{"type":"none"}"#);
    }
}
