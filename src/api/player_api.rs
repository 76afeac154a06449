// ==========================================
// Slayer 任务追踪系统 - 玩家档案 API
// ==========================================

use std::sync::Arc;

use tracing::info;

use crate::api::error::{ApiError, ApiResult};
use crate::config::{ConfigManager, EngineConfigReader};
use crate::domain::PlayerProfile;
use crate::repository::PlayerProfileRepository;

const MAX_COMBAT_LEVEL: i32 = 126;
const MAX_SKILL_LEVEL: i32 = 99;

pub struct PlayerApi {
    player_repo: Arc<PlayerProfileRepository>,
    config: Arc<ConfigManager>,
}

impl PlayerApi {
    pub fn new(player_repo: Arc<PlayerProfileRepository>, config: Arc<ConfigManager>) -> Self {
        Self { player_repo, config }
    }

    pub fn get_profile(&self) -> ApiResult<PlayerProfile> {
        let defaults = self
            .config
            .profile_defaults()
            .map_err(|e| ApiError::InternalError(e.to_string()))?;
        Ok(self.player_repo.get_profile(defaults)?)
    }

    pub fn save_profile(&self, profile: &PlayerProfile) -> ApiResult<()> {
        if !(3..=MAX_COMBAT_LEVEL).contains(&profile.combat_level) {
            return Err(ApiError::InvalidInput(format!(
                "战斗等级超出范围 3-{}: {}",
                MAX_COMBAT_LEVEL, profile.combat_level
            )));
        }
        if !(1..=MAX_SKILL_LEVEL).contains(&profile.slayer_level) {
            return Err(ApiError::InvalidInput(format!(
                "Slayer 等级超出范围 1-{}: {}",
                MAX_SKILL_LEVEL, profile.slayer_level
            )));
        }

        self.player_repo.save_profile(profile)?;
        info!(
            combat_level = profile.combat_level,
            slayer_level = profile.slayer_level,
            quests = profile.completed_quests.len(),
            unlocks = profile.slayer_unlocks.len(),
            "玩家档案已保存"
        );
        Ok(())
    }
}
