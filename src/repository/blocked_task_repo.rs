// ==========================================
// Slayer 任务追踪系统 - 屏蔽任务仓储
// ==========================================

use crate::domain::BlockedTask;
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, Result as SqliteResult};
use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};

pub struct BlockedTaskRepository {
    conn: Arc<Mutex<Connection>>,
}

impl BlockedTaskRepository {
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 屏蔽任务
    ///
    /// # 返回
    /// - Ok(true): 新屏蔽
    /// - Ok(false): 已处于屏蔽状态
    pub fn block(&self, master_id: i64, task_id: i64) -> RepositoryResult<bool> {
        let conn = self.get_conn()?;
        let inserted = conn.execute(
            r#"
            INSERT OR IGNORE INTO blocked_tasks (slayer_master_id, task_id, blocked_at)
            VALUES (?1, ?2, ?3)
            "#,
            params![master_id, task_id, Utc::now()],
        )?;
        Ok(inserted > 0)
    }

    /// 取消屏蔽 (幂等)
    pub fn unblock(&self, master_id: i64, task_id: i64) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            "DELETE FROM blocked_tasks WHERE slayer_master_id = ?1 AND task_id = ?2",
            params![master_id, task_id],
        )?;
        Ok(())
    }

    pub fn is_blocked(&self, master_id: i64, task_id: i64) -> RepositoryResult<bool> {
        let conn = self.get_conn()?;
        let found = conn
            .query_row(
                "SELECT 1 FROM blocked_tasks WHERE slayer_master_id = ?1 AND task_id = ?2",
                params![master_id, task_id],
                |_row| Ok(()),
            )
            .optional()?;
        Ok(found.is_some())
    }

    /// 导师下被屏蔽的全部 task_id
    pub fn find_blocked_task_ids(&self, master_id: i64) -> RepositoryResult<HashSet<i64>> {
        let conn = self.get_conn()?;
        let mut stmt =
            conn.prepare("SELECT task_id FROM blocked_tasks WHERE slayer_master_id = ?1")?;
        let ids = stmt
            .query_map(params![master_id], |row| row.get(0))?
            .collect::<SqliteResult<HashSet<i64>>>()?;
        Ok(ids)
    }

    pub fn list_by_master(&self, master_id: i64) -> RepositoryResult<Vec<BlockedTask>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT slayer_master_id, task_id, blocked_at
            FROM blocked_tasks
            WHERE slayer_master_id = ?1
            ORDER BY task_id ASC
            "#,
        )?;
        let blocked = stmt
            .query_map(params![master_id], |row| {
                Ok(BlockedTask {
                    master_id: row.get(0)?,
                    task_id: row.get(1)?,
                    blocked_at: row.get(2)?,
                })
            })?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(blocked)
    }
}
