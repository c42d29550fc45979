pub mod id;

pub use id::{ProfileId, UserId};
