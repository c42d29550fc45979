//! Profile editor form: avatar upload and biography.

use axum::body::Bytes;
use validator::Validate;

use super::{strip, FieldRule, Form};
use crate::validation::rules::BIO_MAX_LENGTH;

/// Advertised avatar limit, in (binary) megabytes.
pub const AVATAR_LIMIT_MB: f64 = 2.5;
/// 2.5 MiB. Uploads strictly larger than this are rejected.
pub const AVATAR_MAX_BYTES: u64 = (AVATAR_LIMIT_MB * 1024.0 * 1024.0) as u64;

pub const NOT_AN_IMAGE: &str = "Uploaded file is not an image";

pub fn avatar_too_large_message() -> String {
    format!("Image file too large (>{} MB)", AVATAR_LIMIT_MB)
}

/// An uploaded file as described by the upload transport.
///
/// `content_type` and `size` are declared metadata; the bytes are never
/// inspected to confirm them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UploadedFile {
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub size: u64,
    pub data: Bytes,
}

impl UploadedFile {
    pub fn new(file_name: Option<String>, content_type: Option<String>, data: Bytes) -> Self {
        Self {
            file_name,
            content_type,
            size: data.len() as u64,
            data,
        }
    }
}

#[derive(Debug, Clone, Default, Validate)]
pub struct ProfileForm {
    pub avatar: Option<UploadedFile>,
    #[validate(length(
        max = BIO_MAX_LENGTH,
        message = "Ensure this value has at most 500 characters."
    ))]
    pub bio: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedProfile {
    pub avatar: Option<UploadedFile>,
    pub bio: String,
}

fn clean_avatar(form: &ProfileForm) -> Option<String> {
    let avatar = form.avatar.as_ref()?;

    let content_type = avatar.content_type.as_deref().unwrap_or("");
    if !content_type.starts_with("image/") {
        return Some(NOT_AN_IMAGE.to_string());
    }

    if avatar.size > AVATAR_MAX_BYTES {
        return Some(avatar_too_large_message());
    }

    None
}

const RULES: &[FieldRule<ProfileForm>] = &[FieldRule {
    name: "clean_avatar",
    field: "avatar",
    check: clean_avatar,
}];

impl Form for ProfileForm {
    type Validated = ValidatedProfile;

    fn rules() -> &'static [FieldRule<Self>] {
        RULES
    }

    fn clean(&mut self) {
        strip(&mut self.bio);
    }

    fn into_validated(self) -> ValidatedProfile {
        ValidatedProfile {
            avatar: self.avatar,
            bio: self.bio,
        }
    }
}
