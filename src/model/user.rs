use crate::model::role::Role;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: u64,
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
    pub date_of_joining: NaiveDate,
}

/// User record as exposed to clients (no password hash).
#[derive(Debug, Serialize, sqlx::FromRow, ToSchema)]
pub struct UserProfile {
    pub id: u64,
    pub name: String,
    pub email: String,
    pub role: Role,
    #[schema(example = "2024-01-01", format = "date", value_type = String)]
    pub date_of_joining: NaiveDate,
}
