//! Data models shared across database access and API handlers.

pub mod profile;
pub mod user;
