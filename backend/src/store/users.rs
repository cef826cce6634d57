//! User persistence

use shared::User;

use super::{JsonFile, StoreError};

/// Registered users, unique by lower-cased email
pub struct UserStore {
    file: JsonFile<User>,
}

impl UserStore {
    pub fn new(file: JsonFile<User>) -> Self {
        Self { file }
    }

    /// Case-insensitive lookup by email
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let users = self.file.read_all().await?;
        Ok(users
            .into_iter()
            .find(|u| u.email.eq_ignore_ascii_case(email)))
    }

    /// Insert `user` unless its email is taken, returning the stored record.
    ///
    /// A clashing id is bumped past the current maximum.
    pub async fn insert(&self, mut user: User) -> Result<Option<User>, StoreError> {
        self.file
            .update(move |users| {
                if users.iter().any(|u| u.email.eq_ignore_ascii_case(&user.email)) {
                    return None;
                }
                if users.iter().any(|u| u.id == user.id) {
                    user.id = users.iter().map(|u| u.id).max().unwrap_or(0) + 1;
                }
                users.push(user.clone());
                Some(user)
            })
            .await
    }
}
