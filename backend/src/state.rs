use std::sync::Arc;

use crate::{
    config::Config, repositories::AccountRepositoryTrait, services::AvatarStorage,
};

#[derive(Clone)]
pub struct AppState {
    pub accounts: Arc<dyn AccountRepositoryTrait>,
    pub avatars: Arc<dyn AvatarStorage>,
    pub config: Config,
}

impl AppState {
    pub fn new(
        accounts: Arc<dyn AccountRepositoryTrait>,
        avatars: Arc<dyn AvatarStorage>,
        config: Config,
    ) -> Self {
        Self {
            accounts,
            avatars,
            config,
        }
    }
}
