use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// User entity - the voting or posting member, looked up but never written here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i32,
    pub nickname: String,
    pub created_at: DateTime<Utc>,
}
