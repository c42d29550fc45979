use axum::{extract::State, http::StatusCode, Json};

use crate::{
    error::AppError,
    forms::{registration::USERNAME_TAKEN, FieldErrors, Form, RegistrationForm},
    models::user::{NewUser, UserResponse},
    state::AppState,
    utils::password::hash_password,
};

/// Registers a new account and its empty profile.
///
/// Form errors and the username uniqueness check are reported together.
pub async fn register(
    State(state): State<AppState>,
    Json(form): Json<RegistrationForm>,
) -> Result<(StatusCode, Json<UserResponse>), AppError> {
    let username = form.username.trim().to_string();
    let mut errors = FieldErrors::new();

    let validated = match form.validate_form() {
        Ok(user) => Some(user),
        Err(form_errors) => {
            errors.merge(form_errors);
            None
        }
    };

    if !username.is_empty()
        && !errors.contains("username")
        && state.accounts.username_exists(&username).await?
    {
        errors.add("username", USERNAME_TAKEN);
    }

    let validated = match validated {
        Some(user) if errors.is_empty() => user,
        _ => {
            tracing::debug!(
                fields = ?errors.fields().collect::<Vec<_>>(),
                "registration rejected"
            );
            return Err(errors.into());
        }
    };

    let password_hash = hash_password(&validated.password)?;
    let user = state
        .accounts
        .create_user(NewUser::from_validated(validated, password_hash))
        .await?;

    tracing::info!(user_id = %user.id, username = %user.username, "user registered");
    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}
