//! Diesel table definitions for the SQLite schema.
//!
//! These definitions must match `migrations/` exactly.

diesel::table! {
    /// Registered users.
    ///
    /// `email` carries the unique index `ix_users_email`.
    users (id) {
        /// Primary key assigned by SQLite on insert.
        id -> Integer,
        name -> Text,
        email -> Text,
    }
}
