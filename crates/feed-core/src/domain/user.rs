use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Status every account starts with.
pub const DEFAULT_STATUS: &str = "I am new!";

/// User entity - an account that can own posts.
///
/// The user's posts are not stored on the entity; they are the posts whose
/// `user_id` points here, see `PostRepository::find_by_user_id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub password_hash: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new user with generated ID and timestamps.
    pub fn new(email: String, name: String, password_hash: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            email,
            name,
            password_hash,
            status: DEFAULT_STATUS.to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn set_status(&mut self, status: String) {
        self.status = status;
        self.updated_at = Utc::now();
    }
}

/// Registration input, before validation and hashing.
#[derive(Debug, Clone, Deserialize)]
pub struct NewUser {
    pub email: String,
    pub name: String,
    pub password: String,
}
