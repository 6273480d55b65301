//! Validation of user registration input.

use validator::Validate;

use crate::error::CoreError;

/// Registration fields submitted by a new user, before hashing.
#[derive(Debug, Clone, Default, Validate)]
pub struct Registration {
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    #[validate(length(min = 1, message = "surname is required"))]
    pub surname: String,
    #[validate(length(min = 1, message = "nationalId is required"))]
    pub national_id: String,
    #[validate(email(message = "email must be a valid address"))]
    pub email: String,
    #[validate(length(min = 1, message = "phone is required"))]
    pub phone: String,
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
    #[validate(length(min = 1, message = "address is required"))]
    pub address: String,
}

impl Registration {
    /// Trim every text field in place.
    pub fn normalize(&mut self) {
        for field in [
            &mut self.name,
            &mut self.surname,
            &mut self.national_id,
            &mut self.email,
            &mut self.phone,
            &mut self.address,
        ] {
            *field = field.trim().to_string();
        }
    }

    /// Run the field validators, flattening failures into one message.
    pub fn check(&self) -> Result<(), CoreError> {
        self.validate().map_err(|errors| {
            let mut messages: Vec<String> = errors
                .field_errors()
                .into_iter()
                .flat_map(|(field, errs)| {
                    errs.iter().map(move |e| {
                        e.message
                            .as_ref()
                            .map(|m| m.to_string())
                            .unwrap_or_else(|| format!("{field} is invalid"))
                    })
                })
                .collect();
            messages.sort();
            CoreError::Validation(messages.join("; "))
        })
    }
}
