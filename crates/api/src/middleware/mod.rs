//! Request extractors enforcing authentication.

pub mod auth;
