//! Users repository (in-memory)

use indexmap::IndexMap;

use crate::{
    error::{AppError, AppResult},
    models::user::User,
};

#[derive(Debug, Default)]
pub struct UsersRepository {
    users: IndexMap<String, User>,
}

impl UsersRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a user, replacing any user already stored under the same username
    pub fn upsert(&mut self, user: User) -> Option<User> {
        self.users.insert(user.username.clone(), user)
    }

    pub fn get_by_username(&self, username: &str) -> AppResult<&User> {
        self.users
            .get(username)
            .ok_or_else(|| AppError::NotFound(format!("No user found with username: {}", username)))
    }

    pub fn get_by_username_mut(&mut self, username: &str) -> AppResult<&mut User> {
        self.users
            .get_mut(username)
            .ok_or_else(|| AppError::NotFound(format!("No user found with username: {}", username)))
    }

    /// Remove the only user with the given first name, ignoring case
    pub fn delete_by_firstname(&mut self, firstname: &str) -> AppResult<User> {
        let wanted = firstname.to_lowercase();
        let matching: Vec<&String> = self
            .users
            .values()
            .filter(|u| u.firstname.to_lowercase() == wanted)
            .map(|u| &u.username)
            .collect();

        let username = match matching.as_slice() {
            [] => {
                return Err(AppError::NotFound(format!(
                    "No user found with first name: {}",
                    firstname
                )))
            }
            [one] => (*one).clone(),
            _ => {
                return Err(AppError::AmbiguousMatch(format!(
                    "Multiple users found with first name: {}. Please use a unique identifier.",
                    firstname
                )))
            }
        };

        self.users
            .shift_remove(&username)
            .ok_or_else(|| AppError::NotFound(format!("No user found with username: {}", username)))
    }

    pub fn list(&self) -> impl Iterator<Item = &User> {
        self.users.values()
    }

    pub fn count(&self) -> usize {
        self.users.len()
    }
}
