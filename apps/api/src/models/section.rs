use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

use crate::sections::detail::SectionDetail;
use crate::sections::kind::SectionKind;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SectionRow {
    pub id: Uuid,
    pub profile_id: Uuid,
    pub kind: String,
    pub title: String,
    pub published: bool,
    pub data: Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SectionRow {
    pub fn kind(&self) -> Option<SectionKind> {
        SectionKind::parse(&self.kind)
    }

    pub fn detail(&self) -> Result<SectionDetail, serde_json::Error> {
        serde_json::from_value(self.data.clone())
    }
}
