//! User model for storage and API.

use serde::{Deserialize, Serialize};

/// User profile stored in Firestore.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// User ID (also used as document ID)
    pub user_id: u64,
    /// Display name
    pub name: String,
    /// Email address (may be None if not shared)
    pub email: Option<String>,
    /// Profile picture URL
    pub picture: Option<String>,
    /// When the user first signed in
    pub created_at: String,
    /// Last activity timestamp
    pub last_active: String,
}

impl User {
    /// Derived `@handle` from the email local part, if any.
    pub fn username(&self) -> Option<String> {
        let email = self.email.as_deref()?;
        let local = email.split('@').next()?;
        if local.is_empty() {
            None
        } else {
            Some(format!("@{}", local))
        }
    }
}
