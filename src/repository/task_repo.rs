// ==========================================
// Slayer 任务追踪系统 - 任务与分配规则仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// 存储: quest_unlocks 以 JSON 数组文本存放
// ==========================================

use crate::domain::{AssignmentRule, LocationRestriction, NewAssignmentRule, Task, UnlockCatalog};
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, OptionalExtension, Result as SqliteResult};
use std::collections::BTreeSet;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::warn;

/// master_tasks 原始行
struct RuleRow {
    id: i64,
    master_id: i64,
    task: Task,
    weight: f64,
    min_amount: i32,
    max_amount: i32,
    quest_unlocks: Option<String>,
    slayer_unlock: Option<String>,
    location_restriction: Option<String>,
}

/// 任务仓储
/// 职责: 管理 tasks / master_tasks 表
pub struct TaskRepository {
    conn: Arc<Mutex<Connection>>,
}

impl TaskRepository {
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    // ==========================================
    // tasks
    // ==========================================

    /// 新增任务,同名已存在时忽略
    ///
    /// # 返回
    /// - Ok(id): 新建或已存在任务的 id
    pub fn add_task(&self, name: &str, slayer_requirement: i32) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        conn.execute(
            "INSERT OR IGNORE INTO tasks (name, slayer_requirement) VALUES (?1, ?2)",
            params![name, slayer_requirement],
        )?;
        let id = conn.query_row("SELECT id FROM tasks WHERE name = ?1", params![name], |row| {
            row.get(0)
        })?;
        Ok(id)
    }

    /// 按名称升序列出全部任务
    pub fn list_tasks(&self) -> RepositoryResult<Vec<Task>> {
        let conn = self.get_conn()?;
        let mut stmt =
            conn.prepare("SELECT id, name, slayer_requirement FROM tasks ORDER BY name ASC")?;
        let tasks = stmt
            .query_map([], |row| {
                Ok(Task {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    slayer_requirement: row.get(2)?,
                })
            })?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(tasks)
    }

    pub fn find_task(&self, task_id: i64) -> RepositoryResult<Option<Task>> {
        let conn = self.get_conn()?;
        let task = conn
            .query_row(
                "SELECT id, name, slayer_requirement FROM tasks WHERE id = ?1",
                params![task_id],
                |row| {
                    Ok(Task {
                        id: row.get(0)?,
                        name: row.get(1)?,
                        slayer_requirement: row.get(2)?,
                    })
                },
            )
            .optional()?;
        Ok(task)
    }

    // ==========================================
    // master_tasks
    // ==========================================

    /// 新增分配规则
    ///
    /// # 返回
    /// - Ok(true): 新增成功
    /// - Ok(false): 同一 (导师, 任务, 地点限制) 已存在
    pub fn add_assignment(&self, rule: &NewAssignmentRule) -> RepositoryResult<bool> {
        let conn = self.get_conn()?;
        let restriction = rule.location_restriction.as_ref().map(|r| r.to_db_str());

        let exists = conn
            .query_row(
                r#"
                SELECT 1 FROM master_tasks
                WHERE slayer_master_id = ?1 AND task_id = ?2 AND location_restriction IS ?3
                "#,
                params![rule.master_id, rule.task_id, restriction],
                |_row| Ok(()),
            )
            .optional()?
            .is_some();
        if exists {
            return Ok(false);
        }

        conn.execute(
            r#"
            INSERT INTO master_tasks (
                slayer_master_id, task_id, weight, min_amount, max_amount,
                quest_unlocks, slayer_unlock, location_restriction
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
            params![
                rule.master_id,
                rule.task_id,
                rule.weight,
                rule.min_amount,
                rule.max_amount,
                serde_json::to_string(&rule.quest_unlocks)?,
                rule.slayer_unlock,
                restriction,
            ],
        )?;
        Ok(true)
    }

    /// 查询导师的全部分配规则
    ///
    /// 排序: 任务名称,再按地点限制 (同一任务的变体相邻)
    pub fn find_rules_by_master(&self, master_id: i64) -> RepositoryResult<Vec<AssignmentRule>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT mt.id, mt.slayer_master_id,
                   t.id, t.name, t.slayer_requirement,
                   mt.weight, mt.min_amount, mt.max_amount,
                   mt.quest_unlocks, mt.slayer_unlock, mt.location_restriction
            FROM master_tasks mt
            JOIN tasks t ON mt.task_id = t.id
            WHERE mt.slayer_master_id = ?1
            ORDER BY t.name ASC, mt.location_restriction ASC, mt.id ASC
            "#,
        )?;

        let rows = stmt
            .query_map(params![master_id], |row| {
                Ok(RuleRow {
                    id: row.get(0)?,
                    master_id: row.get(1)?,
                    task: Task {
                        id: row.get(2)?,
                        name: row.get(3)?,
                        slayer_requirement: row.get(4)?,
                    },
                    weight: row.get(5)?,
                    min_amount: row.get(6)?,
                    max_amount: row.get(7)?,
                    quest_unlocks: row.get(8)?,
                    slayer_unlock: row.get(9)?,
                    location_restriction: row.get(10)?,
                })
            })?
            .collect::<SqliteResult<Vec<_>>>()?;

        Ok(rows.into_iter().map(into_assignment_rule).collect())
    }

    /// 所有规则引用过的任务解锁与 Slayer 解锁 (去重、排序)
    pub fn list_unlocks(&self) -> RepositoryResult<UnlockCatalog> {
        let conn = self.get_conn()?;

        let mut quests = BTreeSet::new();
        let mut stmt = conn.prepare(
            "SELECT DISTINCT quest_unlocks FROM master_tasks \
             WHERE quest_unlocks IS NOT NULL AND quest_unlocks != '[]'",
        )?;
        let raw_lists = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<SqliteResult<Vec<_>>>()?;
        for raw in raw_lists {
            quests.extend(parse_quest_unlocks(Some(&raw)));
        }

        let mut stmt = conn.prepare(
            "SELECT DISTINCT slayer_unlock FROM master_tasks \
             WHERE slayer_unlock IS NOT NULL AND slayer_unlock != '' \
             ORDER BY slayer_unlock ASC",
        )?;
        let slayer_unlocks = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<SqliteResult<Vec<_>>>()?;

        Ok(UnlockCatalog {
            quests: quests.into_iter().collect(),
            slayer_unlocks,
        })
    }
}

/// 解析 quest_unlocks JSON
///
/// 缺失、空白、`null` 或无法解析都视为无要求
fn parse_quest_unlocks(raw: Option<&str>) -> Vec<String> {
    match raw.map(str::trim) {
        None | Some("") => Vec::new(),
        Some(text) => serde_json::from_str::<Option<Vec<String>>>(text)
            .unwrap_or_else(|e| {
                warn!(raw = %text, error = %e, "quest_unlocks 无法解析,视为无要求");
                None
            })
            .unwrap_or_default(),
    }
}

fn into_assignment_rule(row: RuleRow) -> AssignmentRule {
    let slayer_unlock = row
        .slayer_unlock
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());

    AssignmentRule {
        id: row.id,
        master_id: row.master_id,
        task: row.task,
        weight: row.weight,
        min_amount: row.min_amount,
        max_amount: row.max_amount,
        quest_unlocks: parse_quest_unlocks(row.quest_unlocks.as_deref()),
        slayer_unlock,
        location_restriction: LocationRestriction::parse_optional(
            row.location_restriction.as_deref(),
        ),
    }
}
