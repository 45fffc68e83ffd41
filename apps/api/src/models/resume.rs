use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

use crate::resume::sections::SectionMap;

/// Metadata row for a stored résumé. The content body lives in S3 at `s3_key`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ResumeRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub format: String,
    pub size_bytes: i64,
    pub sections: Option<Json<SectionMap>>,
    pub s3_key: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
