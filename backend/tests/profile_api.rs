#![cfg(feature = "test-utils")]

use accounts_backend::{
    error::AppError, forms::profile::AVATAR_MAX_BYTES,
    repositories::account::MockAccountRepositoryTrait,
    services::{avatar_storage::MockAvatarStorage, LocalAvatarStorage, StorageError},
    types::UserId,
};
use axum::http::StatusCode;
use serde_json::json;
use tower::ServiceExt;

mod support;

use support::{app, app_with_media_root, get, profile_for, profile_request, response_json, Part};

fn png(file_name: &str, data: Vec<u8>) -> Part<'_> {
    Part::File {
        name: "avatar",
        file_name,
        content_type: "image/png",
        data,
    }
}

#[tokio::test]
async fn get_profile_returns_not_found_for_unknown_user() {
    let mut accounts = MockAccountRepositoryTrait::new();
    accounts.expect_find_profile().returning(|_| Ok(None));

    let response = app(accounts, MockAvatarStorage::new())
        .oneshot(get(format!("/api/users/{}/profile", UserId::new())))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn get_profile_returns_avatar_url() {
    let user_id = UserId::new();
    let mut accounts = MockAccountRepositoryTrait::new();
    accounts
        .expect_find_profile()
        .returning(|id| Ok(Some(profile_for(id, Some("avatars/a.png"), "hi"))));

    let response = app(accounts, MockAvatarStorage::new())
        .oneshot(get(format!("/api/users/{}/profile", user_id)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = response_json(response).await;
    assert_eq!(json["user_id"], user_id.to_string());
    assert_eq!(json["avatar_url"], "/media/avatars/a.png");
    assert_eq!(json["bio"], "hi");
}

#[tokio::test]
async fn update_profile_stores_image_and_bio() {
    let user_id = UserId::new();
    let mut accounts = MockAccountRepositoryTrait::new();
    accounts
        .expect_find_profile()
        .returning(|id| Ok(Some(profile_for(id, None, ""))));
    accounts
        .expect_update_profile()
        .withf(|_, update| {
            update.avatar.as_deref() == Some("avatars/new.png") && update.bio == "About me"
        })
        .times(1)
        .returning(|id, update| Ok(profile_for(id, update.avatar.as_deref(), &update.bio)));

    let mut avatars = MockAvatarStorage::new();
    avatars
        .expect_save()
        .withf(|_, file| {
            file.content_type.as_deref() == Some("image/png")
                && file.file_name.as_deref() == Some("me.png")
                && file.size == 4
        })
        .times(1)
        .returning(|_, _| Ok("avatars/new.png".to_string()));
    avatars.expect_delete().never();

    let response = app(accounts, avatars)
        .oneshot(profile_request(
            user_id,
            &[png("me.png", b"\x89PNG".to_vec()), Part::Text("bio", "About me")],
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = response_json(response).await;
    assert_eq!(json["avatar"], "avatars/new.png");
    assert_eq!(json["bio"], "About me");
}

#[tokio::test]
async fn update_profile_without_file_keeps_existing_avatar() {
    let user_id = UserId::new();
    let mut accounts = MockAccountRepositoryTrait::new();
    accounts
        .expect_find_profile()
        .returning(|id| Ok(Some(profile_for(id, Some("avatars/old.png"), ""))));
    accounts
        .expect_update_profile()
        .withf(|_, update| update.avatar.is_none() && update.bio == "only text")
        .times(1)
        .returning(|id, update| Ok(profile_for(id, Some("avatars/old.png"), &update.bio)));

    let mut avatars = MockAvatarStorage::new();
    avatars.expect_save().never();

    let response = app(accounts, avatars)
        .oneshot(profile_request(
            user_id,
            &[
                Part::File {
                    name: "avatar",
                    file_name: "",
                    content_type: "application/octet-stream",
                    data: Vec::new(),
                },
                Part::Text("bio", "only text"),
            ],
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = response_json(response).await;
    assert_eq!(json["avatar"], "avatars/old.png");
}

#[tokio::test]
async fn update_profile_rejects_non_image_upload() {
    let mut accounts = MockAccountRepositoryTrait::new();
    accounts
        .expect_find_profile()
        .returning(|id| Ok(Some(profile_for(id, None, ""))));
    accounts.expect_update_profile().never();
    let mut avatars = MockAvatarStorage::new();
    avatars.expect_save().never();

    let response = app(accounts, avatars)
        .oneshot(profile_request(
            UserId::new(),
            &[Part::File {
                name: "avatar",
                file_name: "cv.pdf",
                content_type: "application/pdf",
                data: b"%PDF-1.7".to_vec(),
            }],
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = response_json(response).await;
    assert_eq!(
        json["details"]["errors"]["avatar"],
        json!(["Uploaded file is not an image"])
    );
}

#[tokio::test]
async fn update_profile_rejects_oversized_image() {
    let mut accounts = MockAccountRepositoryTrait::new();
    accounts
        .expect_find_profile()
        .returning(|id| Ok(Some(profile_for(id, None, ""))));
    accounts.expect_update_profile().never();
    let mut avatars = MockAvatarStorage::new();
    avatars.expect_save().never();

    let response = app(accounts, avatars)
        .oneshot(profile_request(
            UserId::new(),
            &[Part::File {
                name: "avatar",
                file_name: "big.jpg",
                content_type: "image/jpeg",
                data: vec![0u8; AVATAR_MAX_BYTES as usize + 1],
            }],
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = response_json(response).await;
    assert_eq!(
        json["details"]["errors"]["avatar"],
        json!(["Image file too large (>2.5 MB)"])
    );
}

#[tokio::test]
async fn update_profile_accepts_image_at_limit() {
    let mut accounts = MockAccountRepositoryTrait::new();
    accounts
        .expect_find_profile()
        .returning(|id| Ok(Some(profile_for(id, None, ""))));
    accounts
        .expect_update_profile()
        .times(1)
        .returning(|id, update| Ok(profile_for(id, update.avatar.as_deref(), &update.bio)));
    let mut avatars = MockAvatarStorage::new();
    avatars
        .expect_save()
        .withf(|_, file| file.size == AVATAR_MAX_BYTES)
        .times(1)
        .returning(|_, _| Ok("avatars/limit.png".to_string()));

    let response = app(accounts, avatars)
        .oneshot(profile_request(
            UserId::new(),
            &[png("limit.png", vec![0u8; AVATAR_MAX_BYTES as usize])],
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn update_profile_returns_not_found_for_unknown_user() {
    let mut accounts = MockAccountRepositoryTrait::new();
    accounts.expect_find_profile().returning(|_| Ok(None));
    accounts.expect_update_profile().never();

    let response = app(accounts, MockAvatarStorage::new())
        .oneshot(profile_request(UserId::new(), &[Part::Text("bio", "hi")]))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn failed_update_removes_the_stored_avatar() {
    let media = tempfile::tempdir().expect("tempdir");
    let mut accounts = MockAccountRepositoryTrait::new();
    accounts
        .expect_find_profile()
        .returning(|id| Ok(Some(profile_for(id, None, ""))));
    accounts
        .expect_update_profile()
        .times(1)
        .returning(|_, _| Err(AppError::NotFound("Profile not found".into())));

    let response = app_with_media_root(
        accounts,
        LocalAvatarStorage::new(media.path()),
        media.path(),
    )
    .oneshot(profile_request(
        UserId::new(),
        &[png("me.png", b"\x89PNG".to_vec())],
    ))
    .await
    .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let avatar_dir = media.path().join("avatars");
    let left: Vec<_> = std::fs::read_dir(&avatar_dir)
        .map(|entries| entries.filter_map(Result::ok).collect())
        .unwrap_or_default();
    assert!(left.is_empty(), "orphaned avatars: {:?}", left);
}

#[tokio::test]
async fn failed_update_propagates_error_when_cleanup_fails() {
    let mut accounts = MockAccountRepositoryTrait::new();
    accounts
        .expect_find_profile()
        .returning(|id| Ok(Some(profile_for(id, None, ""))));
    accounts
        .expect_update_profile()
        .returning(|_, _| Err(AppError::Conflict("write conflict".into())));

    let mut avatars = MockAvatarStorage::new();
    avatars
        .expect_save()
        .returning(|_, _| Ok("avatars/tmp.png".to_string()));
    avatars
        .expect_delete()
        .times(1)
        .returning(|_| Err(StorageError::Io(std::io::Error::other("read-only"))));

    let response = app(accounts, avatars)
        .oneshot(profile_request(
            UserId::new(),
            &[png("me.png", b"\x89PNG".to_vec())],
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CONFLICT);
}
