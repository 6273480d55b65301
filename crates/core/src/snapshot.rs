//! Denormalized user contact snapshots embedded in alerts.
//!
//! An alert carries a copy of the owner's contact fields taken at the moment
//! the alert was raised or archived, so alert history stays readable after
//! the user record changes or disappears. Every call site builds the snapshot
//! through [`UserInfoSnapshot::capture`], which owns the single defaulting
//! policy for blank fields.

use serde::{Deserialize, Serialize};

pub const DEFAULT_NAME: &str = "No name";
pub const DEFAULT_SURNAME: &str = "No surname";
pub const DEFAULT_EMAIL: &str = "No email";
pub const DEFAULT_PHONE: &str = "No phone";
pub const DEFAULT_ADDRESS: &str = "No address";

/// Contact fields as returned by the user directory.
///
/// Every field is optional because the directory is an external collaborator
/// and may hold incomplete records.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserContact {
    pub name: Option<String>,
    pub surname: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    /// Stored path or URL of the profile photo; never the bytes.
    pub photo: Option<String>,
}

/// Point-in-time copy of a user's contact fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfoSnapshot {
    pub name: String,
    pub surname: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub photo: Option<String>,
}

impl UserInfoSnapshot {
    /// Build a snapshot from directory contact data.
    ///
    /// Missing or whitespace-only text fields fall back to the `DEFAULT_*`
    /// placeholders. A blank photo reference becomes `None`.
    pub fn capture(contact: &UserContact) -> Self {
        Self {
            name: or_default(&contact.name, DEFAULT_NAME),
            surname: or_default(&contact.surname, DEFAULT_SURNAME),
            email: or_default(&contact.email, DEFAULT_EMAIL),
            phone: or_default(&contact.phone, DEFAULT_PHONE),
            address: or_default(&contact.address, DEFAULT_ADDRESS),
            photo: contact
                .photo
                .as_deref()
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .map(str::to_string),
        }
    }
}

fn or_default(value: &Option<String>, default: &str) -> String {
    match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => default.to_string(),
    }
}
