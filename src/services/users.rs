//! User management service

use crate::{
    error::AppResult,
    models::user::{CreateUser, UpdateUser, User},
    repository::Repository,
};

pub struct UsersService<'a> {
    repository: &'a mut Repository,
}

impl<'a> UsersService<'a> {
    pub fn new(repository: &'a mut Repository) -> Self {
        Self { repository }
    }

    /// Validate and register a user, replacing any user with the same username
    pub fn create_user(&mut self, data: CreateUser) -> AppResult<User> {
        let user = User::new(data)?;
        self.add_user(user.clone());
        Ok(user)
    }

    /// Register a user. An existing user with the same username is overwritten.
    pub fn add_user(&mut self, user: User) -> Option<User> {
        let username = user.username.clone();
        let replaced = self.repository.users.upsert(user);
        if replaced.is_some() {
            tracing::warn!(%username, "Existing user overwritten");
        } else {
            tracing::info!(%username, "User added");
        }
        replaced
    }

    /// Remove the user with this first name, which must be unique
    pub fn remove_user(&mut self, firstname: &str) -> AppResult<User> {
        let user = self.repository.users.delete_by_firstname(firstname)?;
        let on_loan = self.repository.loans.count_for_user(&user.username);
        if on_loan > 0 {
            tracing::warn!(username = %user.username, on_loan, "Removed a user holding active loans");
        }
        tracing::info!(username = %user.username, "User removed");
        Ok(user)
    }

    pub fn get_user(&self, username: &str) -> AppResult<User> {
        self.repository.users.get_by_username(username).cloned()
    }

    /// Update a user's details
    pub fn update_user(&mut self, username: &str, data: UpdateUser) -> AppResult<User> {
        let user = self.repository.users.get_by_username_mut(username)?;
        user.apply(data)?;
        tracing::info!(%username, "User updated");
        Ok(user.clone())
    }

    pub fn list_users(&self) -> Vec<User> {
        self.repository.users.list().cloned().collect()
    }

    pub fn count_users(&self) -> usize {
        self.repository.users.count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use chrono::NaiveDate;

    fn data(username: &str, firstname: &str) -> CreateUser {
        CreateUser {
            username: username.to_string(),
            firstname: firstname.to_string(),
            surname: "Baggins".to_string(),
            house_number: "1".to_string(),
            street_name: "Bagshot Row".to_string(),
            postcode: "HB1 1SH".to_string(),
            email: format!("{}@shire.me", username),
            date_of_birth: NaiveDate::from_ymd_opt(1990, 9, 22).unwrap(),
        }
    }

    #[test]
    fn test_two_sams_cannot_be_removed_by_first_name() {
        let mut repository = Repository::new();
        let mut users = UsersService::new(&mut repository);
        users.create_user(data("sam_g", "Sam")).unwrap();
        users.create_user(data("sam_w", "Sam")).unwrap();

        assert!(matches!(users.remove_user("Sam"), Err(AppError::AmbiguousMatch(_))));
        assert_eq!(users.count_users(), 2);
        assert!(users.get_user("sam_g").is_ok());
        assert!(users.get_user("sam_w").is_ok());
    }

    #[test]
    fn test_create_user_overwrites() {
        let mut repository = Repository::new();
        let mut users = UsersService::new(&mut repository);
        users.create_user(data("frodo", "Frodo")).unwrap();
        users.create_user(data("frodo", "Bilbo")).unwrap();

        assert_eq!(users.count_users(), 1);
        assert_eq!(users.get_user("frodo").unwrap().firstname, "Bilbo");
    }

    #[test]
    fn test_update_unknown_user() {
        let mut repository = Repository::new();
        let mut users = UsersService::new(&mut repository);
        let result = users.update_user(
            "gandalf",
            UpdateUser {
                postcode: Some("X".to_string()),
                ..Default::default()
            },
        );
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }
}
