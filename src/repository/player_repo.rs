// ==========================================
// Slayer 任务追踪系统 - 玩家档案仓储
// ==========================================
// 存储: player_data 键值表
// 职责: 键值存储 ↔ 固定结构 PlayerProfile 的映射
// ==========================================

use crate::domain::PlayerProfile;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::BTreeSet;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::warn;

/// player_data 键名
pub mod player_keys {
    pub const COMBAT_LEVEL: &str = "combat_level";
    pub const SLAYER_LEVEL: &str = "slayer_level";
    pub const COMPLETED_QUESTS: &str = "completed_quests";
    pub const SLAYER_UNLOCKS: &str = "slayer_unlocks";
}

/// 缺失字段的默认等级
#[derive(Debug, Clone, Copy)]
pub struct ProfileDefaults {
    pub combat_level: i32,
    pub slayer_level: i32,
}

impl Default for ProfileDefaults {
    fn default() -> Self {
        let base = PlayerProfile::default();
        Self {
            combat_level: base.combat_level,
            slayer_level: base.slayer_level,
        }
    }
}

pub struct PlayerProfileRepository {
    conn: Arc<Mutex<Connection>>,
}

impl PlayerProfileRepository {
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    pub fn get_value(&self, key: &str) -> RepositoryResult<Option<String>> {
        let conn = self.get_conn()?;
        let value = conn
            .query_row(
                "SELECT value FROM player_data WHERE key = ?1",
                params![key],
                |row| row.get::<_, Option<String>>(0),
            )
            .optional()?
            .flatten();
        Ok(value)
    }

    pub fn set_value(&self, key: &str, value: &str) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            "INSERT OR REPLACE INTO player_data (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }

    /// 读取玩家档案
    ///
    /// # 规则
    /// - 等级缺失或无法解析 → 使用默认值
    /// - 列表缺失或无法解析 → 空集合
    pub fn get_profile(&self, defaults: ProfileDefaults) -> RepositoryResult<PlayerProfile> {
        Ok(PlayerProfile {
            combat_level: self.read_level(player_keys::COMBAT_LEVEL, defaults.combat_level)?,
            slayer_level: self.read_level(player_keys::SLAYER_LEVEL, defaults.slayer_level)?,
            completed_quests: self.read_set(player_keys::COMPLETED_QUESTS)?,
            slayer_unlocks: self.read_set(player_keys::SLAYER_UNLOCKS)?,
        })
    }

    /// 保存玩家档案 (四个键全部覆写)
    pub fn save_profile(&self, profile: &PlayerProfile) -> RepositoryResult<()> {
        let quests = serde_json::to_string(&profile.completed_quests)?;
        let unlocks = serde_json::to_string(&profile.slayer_unlocks)?;

        let mut conn = self.get_conn()?;
        let tx = conn.transaction()?;
        for (key, value) in [
            (player_keys::COMBAT_LEVEL, profile.combat_level.to_string()),
            (player_keys::SLAYER_LEVEL, profile.slayer_level.to_string()),
            (player_keys::COMPLETED_QUESTS, quests),
            (player_keys::SLAYER_UNLOCKS, unlocks),
        ] {
            tx.execute(
                "INSERT OR REPLACE INTO player_data (key, value) VALUES (?1, ?2)",
                params![key, value],
            )?;
        }
        tx.commit()?;
        Ok(())
    }

    fn read_level(&self, key: &str, default: i32) -> RepositoryResult<i32> {
        let level = match self.get_value(key)? {
            Some(raw) => raw.trim().parse::<i32>().unwrap_or_else(|_| {
                warn!(key, raw = %raw, "玩家等级无法解析,使用默认值");
                default
            }),
            None => default,
        };
        Ok(level)
    }

    fn read_set(&self, key: &str) -> RepositoryResult<BTreeSet<String>> {
        let set = match self.get_value(key)? {
            Some(raw) if !raw.trim().is_empty() => {
                serde_json::from_str::<Vec<String>>(&raw).unwrap_or_else(|e| {
                    warn!(key, error = %e, "玩家列表字段无法解析,视为空");
                    Vec::new()
                })
                .into_iter()
                .collect()
            }
            _ => BTreeSet::new(),
        };
        Ok(set)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn repo() -> PlayerProfileRepository {
        let conn = Connection::open_in_memory().unwrap();
        crate::db::init_schema(&conn).unwrap();
        PlayerProfileRepository::from_connection(Arc::new(Mutex::new(conn)))
    }

    #[test]
    fn test_missing_profile_uses_defaults() {
        let profile = repo().get_profile(ProfileDefaults::default()).unwrap();
        assert_eq!(profile, PlayerProfile::default());
    }

    #[test]
    fn test_malformed_values_fall_back() {
        let repo = repo();
        repo.set_value(player_keys::COMBAT_LEVEL, "ninety").unwrap();
        repo.set_value(player_keys::COMPLETED_QUESTS, "{broken").unwrap();
        repo.set_value(player_keys::SLAYER_LEVEL, " 72 ").unwrap();

        let profile = repo
            .get_profile(ProfileDefaults {
                combat_level: 3,
                slayer_level: 1,
            })
            .unwrap();
        assert_eq!(profile.combat_level, 3);
        assert_eq!(profile.slayer_level, 72);
        assert!(profile.completed_quests.is_empty());
    }

    #[test]
    fn test_save_then_load_profile() {
        let repo = repo();
        let mut profile = PlayerProfile {
            combat_level: 110,
            slayer_level: 87,
            ..PlayerProfile::default()
        };
        profile.completed_quests.insert("Regicide".to_string());
        profile.slayer_unlocks.insert("Reptile got ripped".to_string());

        repo.save_profile(&profile).unwrap();
        assert_eq!(repo.get_profile(ProfileDefaults::default()).unwrap(), profile);
    }
}
