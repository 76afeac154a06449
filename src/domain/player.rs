// ==========================================
// Slayer 任务追踪系统 - 玩家档案
// ==========================================
// 固定结构: 两个等级 + 两个字符串集合
// 键值存储到该结构的映射由仓储层负责
// ==========================================

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// 默认战斗等级 (新角色)
pub const DEFAULT_COMBAT_LEVEL: i32 = 3;
/// 默认 Slayer 等级
pub const DEFAULT_SLAYER_LEVEL: i32 = 1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerProfile {
    pub combat_level: i32,
    pub slayer_level: i32,
    #[serde(default)]
    pub completed_quests: BTreeSet<String>,
    #[serde(default)]
    pub slayer_unlocks: BTreeSet<String>,
}

impl Default for PlayerProfile {
    fn default() -> Self {
        Self {
            combat_level: DEFAULT_COMBAT_LEVEL,
            slayer_level: DEFAULT_SLAYER_LEVEL,
            completed_quests: BTreeSet::new(),
            slayer_unlocks: BTreeSet::new(),
        }
    }
}

impl PlayerProfile {
    pub fn has_completed(&self, quest: &str) -> bool {
        self.completed_quests.contains(quest)
    }

    pub fn has_unlock(&self, unlock: &str) -> bool {
        self.slayer_unlocks.contains(unlock)
    }
}
