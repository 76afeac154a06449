// ==========================================
// Slayer 任务追踪系统 - 导师仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// ==========================================

use crate::domain::SlayerMaster;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, OptionalExtension, Result as SqliteResult, Row};
use std::sync::{Arc, Mutex, MutexGuard};

const MASTER_COLUMNS: &str = "id, name, combat_requirement, slayer_requirement, \
     points_per_task, points_per_10th, is_location_based";

/// 导师仓储
/// 职责: 管理 slayer_masters 表的读写
pub struct SlayerMasterRepository {
    conn: Arc<Mutex<Connection>>,
}

impl SlayerMasterRepository {
    /// 从已有连接创建仓储实例
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 新增导师,同名已存在时忽略
    ///
    /// # 返回
    /// - Ok(id): 新建或已存在导师的 id
    pub fn insert(&self, master: &SlayerMaster) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT OR IGNORE INTO slayer_masters (
                name, combat_requirement, slayer_requirement,
                points_per_task, points_per_10th, is_location_based
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
            params![
                master.name,
                master.combat_requirement,
                master.slayer_requirement,
                master.points_per_task,
                master.points_per_tenth_task,
                master.is_location_based,
            ],
        )?;

        let id = conn.query_row(
            "SELECT id FROM slayer_masters WHERE name = ?1",
            params![master.name],
            |row| row.get(0),
        )?;
        Ok(id)
    }

    /// 按战斗要求升序列出所有导师
    pub fn list_all(&self) -> RepositoryResult<Vec<SlayerMaster>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM slayer_masters ORDER BY combat_requirement ASC, id ASC",
            MASTER_COLUMNS
        ))?;

        let masters = stmt
            .query_map([], map_master_row)?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(masters)
    }

    /// 按 id 查询
    ///
    /// # 返回
    /// - Ok(None): 导师不存在
    pub fn find_by_id(&self, master_id: i64) -> RepositoryResult<Option<SlayerMaster>> {
        let conn = self.get_conn()?;
        let master = conn
            .query_row(
                &format!("SELECT {} FROM slayer_masters WHERE id = ?1", MASTER_COLUMNS),
                params![master_id],
                map_master_row,
            )
            .optional()?;
        Ok(master)
    }
}

fn map_master_row(row: &Row<'_>) -> SqliteResult<SlayerMaster> {
    Ok(SlayerMaster {
        id: row.get(0)?,
        name: row.get(1)?,
        combat_requirement: row.get(2)?,
        slayer_requirement: row.get(3)?,
        points_per_task: row.get(4)?,
        points_per_tenth_task: row.get(5)?,
        is_location_based: row.get(6)?,
    })
}
