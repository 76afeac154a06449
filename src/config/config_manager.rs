// ==========================================
// Slayer 任务追踪系统 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、覆写管理
// 存储: config_kv 表 (key-value + scope)
// ==========================================

use crate::config::engine_config_trait::EngineConfigReader;
use crate::domain::{DEFAULT_COMBAT_LEVEL, DEFAULT_SLAYER_LEVEL};
use crate::engine::efficiency::DEFAULT_SKIP_COST_POINTS;
use rusqlite::{params, Connection};
use serde_json::json;
use std::collections::BTreeMap;
use std::error::Error;
use std::str::FromStr;
use std::sync::{Arc, Mutex};

const GLOBAL_SCOPE: &str = "global";

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 从已有连接创建 ConfigManager
    ///
    /// 说明：为保证连接行为一致，会对传入连接再次应用统一 PRAGMA（幂等）。
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Result<Self, Box<dyn Error>> {
        {
            let conn_guard = conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
            crate::db::configure_sqlite_connection(&conn_guard)?;
        }

        Ok(Self { conn })
    }

    /// 从 config_kv 表读取配置值（scope_id='global'）
    fn get_config_value(&self, key: &str) -> Result<Option<String>, Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let result = conn.query_row(
            "SELECT value FROM config_kv WHERE scope_id = ?1 AND key = ?2",
            params![GLOBAL_SCOPE, key],
            |row| row.get::<_, String>(0),
        );

        match result {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(Box::new(e)),
        }
    }

    /// 写入 global scope 的配置值 (upsert)
    pub fn set_config_value(&self, key: &str, value: &str) -> Result<(), Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
        conn.execute(
            r#"
            INSERT INTO config_kv (scope_id, key, value, updated_at)
            VALUES (?1, ?2, ?3, datetime('now'))
            ON CONFLICT(scope_id, key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            "#,
            params![GLOBAL_SCOPE, key, value],
        )?;
        Ok(())
    }

    /// 读取并解析配置; 缺失时返回默认值,解析失败时报错
    fn get_parsed_or_default<T>(&self, key: &str, default: T) -> Result<T, Box<dyn Error>>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        match self.get_config_value(key)? {
            Some(raw) => raw
                .trim()
                .parse::<T>()
                .map_err(|e| format!("配置项 {} 解析失败 ({}): {}", key, raw, e).into()),
            None => Ok(default),
        }
    }

    /// 获取所有配置的快照（JSON格式）
    pub fn get_config_snapshot(&self) -> Result<String, Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let mut stmt = conn.prepare(
            "SELECT key, value FROM config_kv WHERE scope_id = ?1 ORDER BY key",
        )?;

        let mut config_map: BTreeMap<String, String> = BTreeMap::new();
        let rows = stmt.query_map(params![GLOBAL_SCOPE], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        for row in rows {
            let (key, value) = row?;
            config_map.insert(key, value);
        }

        Ok(serde_json::to_string(&json!(config_map))?)
    }
}

impl EngineConfigReader for ConfigManager {
    fn get_skip_cost_points(&self) -> Result<f64, Box<dyn Error>> {
        let value = self.get_parsed_or_default(config_keys::SKIP_COST_POINTS, DEFAULT_SKIP_COST_POINTS)?;
        if !value.is_finite() || value < 0.0 {
            return Err(format!("配置项 {} 必须为非负数: {}", config_keys::SKIP_COST_POINTS, value).into());
        }
        Ok(value)
    }

    fn get_default_combat_level(&self) -> Result<i32, Box<dyn Error>> {
        self.get_parsed_or_default(config_keys::DEFAULT_COMBAT_LEVEL, DEFAULT_COMBAT_LEVEL)
    }

    fn get_default_slayer_level(&self) -> Result<i32, Box<dyn Error>> {
        self.get_parsed_or_default(config_keys::DEFAULT_SLAYER_LEVEL, DEFAULT_SLAYER_LEVEL)
    }
}

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    // 效率评分
    pub const SKIP_COST_POINTS: &str = "skip_cost_points";

    // 玩家档案默认值
    pub const DEFAULT_COMBAT_LEVEL: &str = "default_combat_level";
    pub const DEFAULT_SLAYER_LEVEL: &str = "default_slayer_level";
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager() -> ConfigManager {
        let conn = Connection::open_in_memory().unwrap();
        crate::db::init_schema(&conn).unwrap();
        ConfigManager::from_connection(Arc::new(Mutex::new(conn))).unwrap()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = manager();
        assert_eq!(config.get_skip_cost_points().unwrap(), 30.0);
        assert_eq!(config.get_default_combat_level().unwrap(), 3);
        assert_eq!(config.get_default_slayer_level().unwrap(), 1);
    }

    #[test]
    fn test_override_skip_cost() {
        let config = manager();
        config.set_config_value(config_keys::SKIP_COST_POINTS, "25.5").unwrap();
        assert_eq!(config.efficiency_policy().unwrap().skip_cost_points, 25.5);

        config.set_config_value(config_keys::SKIP_COST_POINTS, "-1").unwrap();
        assert!(config.get_skip_cost_points().is_err());
    }

    #[test]
    fn test_unparsable_value_is_error() {
        let config = manager();
        config.set_config_value(config_keys::DEFAULT_COMBAT_LEVEL, "high").unwrap();
        assert!(config.get_default_combat_level().is_err());
    }

    #[test]
    fn test_snapshot_lists_values() {
        let config = manager();
        config.set_config_value(config_keys::SKIP_COST_POINTS, "30").unwrap();
        let snapshot = config.get_config_snapshot().unwrap();
        assert_eq!(snapshot, r#"{"skip_cost_points":"30"}"#);
    }
}
