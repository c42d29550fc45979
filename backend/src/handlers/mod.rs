pub mod auth;
pub mod health;
pub mod profile;

pub use auth::*;
pub use health::*;
pub use profile::*;
