use axum::extract::{Multipart, Path, State};
use axum::Json;

use crate::{
    error::AppError,
    forms::{Form, ProfileForm, UploadedFile, ValidatedProfile},
    models::profile::{Profile, ProfileResponse, ProfileUpdate},
    state::AppState,
    types::UserId,
};

pub async fn get_profile(
    State(state): State<AppState>,
    Path(user_id): Path<UserId>,
) -> Result<Json<ProfileResponse>, AppError> {
    let profile = state
        .accounts
        .find_profile(user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Profile not found".into()))?;
    Ok(Json(profile.into()))
}

/// Accepts a `multipart/form-data` body with an optional `avatar` file part
/// and a `bio` text part.
pub async fn update_profile(
    State(state): State<AppState>,
    Path(user_id): Path<UserId>,
    multipart: Multipart,
) -> Result<Json<ProfileResponse>, AppError> {
    let form = read_profile_form(multipart).await?;

    if state.accounts.find_profile(user_id).await?.is_none() {
        return Err(AppError::NotFound("Profile not found".into()));
    }

    let validated = form.validate_form().map_err(|errors| {
        tracing::debug!(
            %user_id,
            fields = ?errors.fields().collect::<Vec<_>>(),
            "profile update rejected"
        );
        AppError::from(errors)
    })?;

    let profile = persist_profile(&state, user_id, validated).await?;

    tracing::info!(%user_id, avatar = ?profile.avatar, "profile updated");
    Ok(Json(profile.into()))
}

/// Stores the avatar, then writes the profile record. When the record cannot
/// be written the stored avatar is removed again.
async fn persist_profile(
    state: &AppState,
    user_id: UserId,
    validated: ValidatedProfile,
) -> Result<Profile, AppError> {
    let stored_avatar = match &validated.avatar {
        Some(file) => Some(state.avatars.save(user_id, file).await?),
        None => None,
    };

    let update = ProfileUpdate::from_validated(validated, stored_avatar.clone());
    match state.accounts.update_profile(user_id, update).await {
        Ok(profile) => Ok(profile),
        Err(err) => {
            if let Some(reference) = stored_avatar {
                // Only logged; the caller still gets the update error.
                if let Err(e) = state.avatars.delete(&reference).await {
                    tracing::error!(
                        avatar = %reference,
                        error = %e,
                        "failed to remove orphaned avatar"
                    );
                }
            }
            Err(err)
        }
    }
}

/// Collects the known parts of a profile submission. An empty file part (no
/// file name, no bytes) is what browsers send when no file was chosen and
/// counts as "no avatar".
async fn read_profile_form(mut multipart: Multipart) -> Result<ProfileForm, AppError> {
    let mut form = ProfileForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Failed to read multipart field: {}", e)))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "avatar" => {
                let file_name = field.file_name().map(str::to_string);
                let content_type = field.content_type().map(str::to_string);
                let data = field.bytes().await.map_err(|e| {
                    AppError::BadRequest(format!("Failed to read avatar upload: {}", e))
                })?;
                if file_name.as_deref().unwrap_or_default().is_empty() && data.is_empty() {
                    continue;
                }
                form.avatar = Some(UploadedFile::new(file_name, content_type, data));
            }
            "bio" => {
                form.bio = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(format!("Failed to read bio: {}", e)))?;
            }
            other => {
                tracing::debug!(field = other, "ignoring unknown profile form field");
            }
        }
    }

    Ok(form)
}
