//! Administrator entity

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Admin {
    pub id: Uuid,
    pub last_name: String,
    pub first_name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

impl Admin {
    pub fn new(last_name: String, first_name: String, email: String, password_hash: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            last_name: last_name.trim().to_string(),
            first_name: first_name.trim().to_string(),
            email: email.trim().to_lowercase(),
            password_hash,
            created_at: Utc::now(),
        }
    }
}
