//! User model and related types

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::AppResult;

/// Library user, keyed by username
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub username: String,
    pub firstname: String,
    pub surname: String,
    pub house_number: String,
    pub street_name: String,
    pub postcode: String,
    pub email: String,
    pub date_of_birth: NaiveDate,
}

/// Create user request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateUser {
    pub username: String,
    #[validate(length(min = 1, message = "First name must be a non-empty string"))]
    pub firstname: String,
    #[validate(length(min = 1, message = "Surname must be a non-empty string"))]
    pub surname: String,
    pub house_number: String,
    pub street_name: String,
    pub postcode: String,
    #[validate(contains(pattern = "@", message = "Invalid email address"))]
    pub email: String,
    pub date_of_birth: NaiveDate,
}

/// Update user request; absent fields are left untouched
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateUser {
    #[validate(length(min = 1, message = "First name must be a non-empty string"))]
    pub firstname: Option<String>,
    #[validate(length(min = 1, message = "Surname must be a non-empty string"))]
    pub surname: Option<String>,
    pub house_number: Option<String>,
    pub street_name: Option<String>,
    pub postcode: Option<String>,
    #[validate(contains(pattern = "@", message = "Invalid email address"))]
    pub email: Option<String>,
}

impl User {
    pub fn new(data: CreateUser) -> AppResult<Self> {
        data.validate()?;
        Ok(Self {
            username: data.username,
            firstname: data.firstname,
            surname: data.surname,
            house_number: data.house_number,
            street_name: data.street_name,
            postcode: data.postcode,
            email: data.email,
            date_of_birth: data.date_of_birth,
        })
    }

    /// Apply an update. Nothing changes unless every supplied field is valid.
    pub fn apply(&mut self, update: UpdateUser) -> AppResult<()> {
        update.validate()?;
        if let Some(firstname) = update.firstname {
            self.firstname = firstname;
        }
        if let Some(surname) = update.surname {
            self.surname = surname;
        }
        if let Some(house_number) = update.house_number {
            self.house_number = house_number;
        }
        if let Some(street_name) = update.street_name {
            self.street_name = street_name;
        }
        if let Some(postcode) = update.postcode {
            self.postcode = postcode;
        }
        if let Some(email) = update.email {
            self.email = email;
        }
        Ok(())
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.firstname, self.surname)
    }

    pub fn address(&self) -> String {
        format!("{} {}, {}", self.house_number, self.street_name, self.postcode)
    }
}
