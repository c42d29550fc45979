#![allow(dead_code)]
use std::{path::Path, sync::Arc};

use accounts_backend::{
    config::Config,
    models::profile::Profile,
    repositories::AccountRepositoryTrait,
    routes::router,
    services::AvatarStorage,
    state::AppState,
    types::{ProfileId, UserId},
};
use axum::{
    body::Body,
    http::{header::CONTENT_TYPE, Request},
    response::Response,
    Router,
};
use chrono::Utc;

const BOUNDARY: &str = "X-ACCOUNTS-BOUNDARY";

pub fn test_config(media_root: &Path) -> Config {
    let media_root = media_root.to_string_lossy().into_owned();
    Config::from_lookup(|key| match key {
        "MEDIA_ROOT" => Some(media_root.clone()),
        _ => None,
    })
    .expect("config")
}

pub fn app_with_media_root<A, S>(accounts: A, avatars: S, media_root: &Path) -> Router
where
    A: AccountRepositoryTrait + 'static,
    S: AvatarStorage + 'static,
{
    router(AppState::new(
        Arc::new(accounts),
        Arc::new(avatars),
        test_config(media_root),
    ))
}

pub fn app<A, S>(accounts: A, avatars: S) -> Router
where
    A: AccountRepositoryTrait + 'static,
    S: AvatarStorage + 'static,
{
    app_with_media_root(accounts, avatars, &std::env::temp_dir())
}

pub fn profile_for(user_id: UserId, avatar: Option<&str>, bio: &str) -> Profile {
    let now = Utc::now();
    Profile {
        id: ProfileId::new(),
        user_id,
        avatar: avatar.map(str::to_string),
        bio: bio.to_string(),
        created_at: now,
        updated_at: now,
    }
}

pub async fn response_json(response: Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    serde_json::from_slice(&bytes).expect("json")
}

pub fn get(uri: impl AsRef<str>) -> Request<Body> {
    Request::builder()
        .uri(uri.as_ref())
        .body(Body::empty())
        .unwrap()
}

pub fn register_request(body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/auth/register")
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub enum Part<'a> {
    Text(&'a str, &'a str),
    File {
        name: &'a str,
        file_name: &'a str,
        content_type: &'a str,
        data: Vec<u8>,
    },
}

pub fn multipart_body(parts: &[Part<'_>]) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        match part {
            Part::Text(name, value) => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", name)
                        .as_bytes(),
                );
                body.extend_from_slice(value.as_bytes());
            }
            Part::File {
                name,
                file_name,
                content_type,
                data,
            } => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n\
                         Content-Type: {}\r\n\r\n",
                        name, file_name, content_type
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(data);
            }
        }
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
    body
}

pub fn profile_request(user_id: UserId, parts: &[Part<'_>]) -> Request<Body> {
    Request::builder()
        .method("PUT")
        .uri(format!("/api/users/{}/profile", user_id))
        .header(
            CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(multipart_body(parts)))
        .unwrap()
}
