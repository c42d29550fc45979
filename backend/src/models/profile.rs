//! Profile records: avatar reference plus biography.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::{
    forms::ValidatedProfile,
    types::{ProfileId, UserId},
};

/// URL prefix under which stored avatars are served.
pub const MEDIA_URL: &str = "/media";

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
/// Database representation of a user's profile.
pub struct Profile {
    pub id: ProfileId,
    /// Owning user; one profile per user.
    pub user_id: UserId,
    /// Storage reference of the avatar image, relative to the media root.
    pub avatar: Option<String>,
    pub bio: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Changes applied to an existing profile.
///
/// `avatar: None` leaves the stored avatar untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileUpdate {
    pub avatar: Option<String>,
    pub bio: String,
}

impl ProfileUpdate {
    /// Maps a validated profile onto an update. The avatar bytes have to be
    /// stored first; `stored_avatar` is the reference the storage returned.
    pub fn from_validated(profile: ValidatedProfile, stored_avatar: Option<String>) -> Self {
        Self {
            avatar: stored_avatar,
            bio: profile.bio,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ProfileResponse {
    pub user_id: UserId,
    pub avatar: Option<String>,
    pub avatar_url: Option<String>,
    pub bio: String,
    pub updated_at: DateTime<Utc>,
}

impl From<Profile> for ProfileResponse {
    fn from(profile: Profile) -> Self {
        let avatar_url = profile
            .avatar
            .as_ref()
            .map(|path| format!("{}/{}", MEDIA_URL, path));
        ProfileResponse {
            user_id: profile.user_id,
            avatar: profile.avatar,
            avatar_url,
            bio: profile.bio,
            updated_at: profile.updated_at,
        }
    }
}
