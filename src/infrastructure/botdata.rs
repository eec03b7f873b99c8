use std::{
    collections::HashMap,
    sync::RwLock,
    time::Instant,
};

use poise::serenity_prelude::{ChannelId, RoleId, UserId};
use sea_orm::DatabaseConnection;
use tracing::info;

use crate::{
    infrastructure::environment::{self, parse_env_var},
    wordle::{Round, SessionRegistry, WordleConfig},
};

/// Who may manage the word bank, and where changes are reported.
#[derive(Debug, Clone, Default)]
pub struct ManagementConfig {
    pub staff_role: Option<RoleId>,
    pub log_channel: Option<ChannelId>,
}

impl ManagementConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let config = Self {
            staff_role: parse_env_var::<u64>(environment::WORDLE_STAFF_ROLE)?.map(RoleId::new),
            log_channel: parse_env_var::<u64>(environment::WORDLE_LOG_CHANNEL)?
                .map(ChannelId::new),
        };
        info!(
            staff_role = ?config.staff_role,
            log_channel = ?config.log_channel,
            "Loaded word bank management configuration"
        );
        Ok(config)
    }
}

pub struct Data {
    pub db_pool: DatabaseConnection,
    pub invoc_time: RwLock<HashMap<u64, Instant>>,
    pub wordle: WordleConfig,
    pub management: ManagementConfig,
    pub sessions: SessionRegistry<UserId, Round>,
}

impl Data {
    pub fn new(db_pool: DatabaseConnection, wordle: WordleConfig, management: ManagementConfig) -> Self {
        Self {
            db_pool,
            invoc_time: Default::default(),
            wordle,
            management,
            sessions: SessionRegistry::new(),
        }
    }
}
