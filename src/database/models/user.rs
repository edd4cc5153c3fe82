use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "user_role", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Admin,
    Rh,
    Tuteur,
    Stagiaire,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub nom: String,
    pub prenom: String,
    pub role: UserRole,
    pub telephone: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Body of POST /api/users
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub email: String,
    pub nom: String,
    pub prenom: String,
    pub role: UserRole,
    pub telephone: Option<String>,
}

/// Query string of GET /api/users
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserQuery {
    pub role: Option<UserRole>,
}
