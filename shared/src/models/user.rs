//! User account models

use serde::{Deserialize, Serialize};

/// A registered user as stored in `users.json`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub id: i64,
    pub name: String,
    /// Always stored lower-cased
    pub email: String,
    #[serde(rename = "passwordHash")]
    pub password_hash: String,
}

/// User fields safe to return to clients
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PublicUser {
    pub id: i64,
    pub name: String,
    pub email: String,
}

impl From<&User> for PublicUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
        }
    }
}
