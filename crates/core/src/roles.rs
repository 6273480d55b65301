//! Role names stored in `users.role` and embedded in JWT claims.

/// Full access; granted to the first registered user.
pub const ROLE_ADMIN: &str = "admin";

/// Default role for every subsequent registration.
pub const ROLE_USER: &str = "user";

/// Pick the role for a new registration given how many users already exist.
pub fn role_for_new_user(existing_users: i64) -> &'static str {
    if existing_users == 0 {
        ROLE_ADMIN
    } else {
        ROLE_USER
    }
}
