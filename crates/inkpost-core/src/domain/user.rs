use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{AuthorSummary, Validate};
use crate::utils::validate_email;

/// User entity - an account that can author posts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new user with generated ID and timestamps.
    pub fn new(username: String, email: String, password_hash: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            username,
            email,
            password_hash,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn summary(&self) -> AuthorSummary {
        AuthorSummary {
            id: self.id,
            username: self.username.clone(),
            email: self.email.clone(),
        }
    }
}

impl Validate for User {
    fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        let username_len = self.username.trim().chars().count();
        if username_len == 0 {
            errors.push("Username is required".to_string());
        } else if !(3..=30).contains(&username_len) {
            errors.push("Username must be between 3 and 30 characters".to_string());
        }
        if !validate_email(&self.email) {
            errors.push("Please provide a valid email".to_string());
        }
        if self.password_hash.is_empty() {
            errors.push("Password is required".to_string());
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}
