use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

/// Pointer to a remotely stored avatar image: the object key plus the public
/// URL it is served from. Persisted as JSONB on the profile row.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AvatarRef {
    pub id: String,
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ProfileRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub username: String,
    pub display_name: String,
    pub headline: Option<String>,
    pub about: Option<String>,
    pub location: Option<String>,
    pub avatar: Option<Value>,
    pub section_order: Option<Vec<String>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ProfileRow {
    /// Decodes the stored avatar pointer. A malformed value reads as no
    /// avatar rather than failing the whole profile.
    pub fn avatar_ref(&self) -> Option<AvatarRef> {
        self.avatar
            .as_ref()
            .and_then(|v| serde_json::from_value(v.clone()).ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_avatar_ref_roundtrip() {
        let avatar = AvatarRef {
            id: "avatars/p1/abc.png".to_string(),
            url: "https://cdn.zest.example/avatars/p1/abc.png".to_string(),
        };
        let value = serde_json::to_value(&avatar).unwrap();
        let back: AvatarRef = serde_json::from_value(value).unwrap();
        assert_eq!(back, avatar);
    }
}
