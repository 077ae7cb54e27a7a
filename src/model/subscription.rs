use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A registered push-notification subscriber endpoint.
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow)]
pub struct PushSubscription {
    pub id: u64,
    pub user_id: u64,
    pub endpoint: String,
    pub created_at: Option<DateTime<Utc>>,
}
