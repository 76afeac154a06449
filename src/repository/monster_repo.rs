// ==========================================
// Slayer 任务追踪系统 - 怪物与击杀计数仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// 红线: 击杀计数只能通过原子 upsert 累加
// ==========================================

use crate::domain::{remaining_kills, Location, Monster, MonsterSummary, TaskRef};
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Result as SqliteResult, Transaction};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::debug;

/// 新建怪物的输入
#[derive(Debug, Clone)]
pub struct NewMonster {
    pub name: String,
    pub kill_cap: i64,
    pub task_ids: Vec<i64>,
    pub locations: Vec<Location>,
}

/// 怪物仓储
/// 职责: 管理 monsters / kills / locations / monster_locations / task_monsters 表
pub struct MonsterRepository {
    conn: Arc<Mutex<Connection>>,
}

impl MonsterRepository {
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 新增怪物: 初始化击杀计数、关联任务与地点 (单事务)
    ///
    /// # 返回
    /// - Ok(id): 新怪物 id
    /// - Err(UniqueConstraintViolation): 同名怪物已存在
    pub fn add_monster(&self, monster: &NewMonster) -> RepositoryResult<i64> {
        let mut conn = self.get_conn()?;
        let tx = conn.transaction()?;

        tx.execute(
            "INSERT INTO monsters (name, kill_cap, added_at) VALUES (?1, ?2, ?3)",
            params![monster.name, monster.kill_cap, Utc::now()],
        )?;
        let monster_id = tx.last_insert_rowid();

        tx.execute(
            "INSERT INTO kills (monster_id, kills) VALUES (?1, 0)",
            params![monster_id],
        )?;

        for task_id in &monster.task_ids {
            tx.execute(
                "INSERT OR IGNORE INTO task_monsters (task_id, monster_id) VALUES (?1, ?2)",
                params![task_id, monster_id],
            )?;
        }

        for location in &monster.locations {
            let location_id = upsert_location(&tx, location)?;
            tx.execute(
                "INSERT OR IGNORE INTO monster_locations (monster_id, location_id) VALUES (?1, ?2)",
                params![monster_id, location_id],
            )?;
        }

        tx.commit()?;
        debug!(monster_id, name = %monster.name, "怪物已新增");
        Ok(monster_id)
    }

    /// 修改击杀上限
    pub fn update_kill_cap(&self, monster_id: i64, kill_cap: i64) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let affected = conn.execute(
            "UPDATE monsters SET kill_cap = ?1 WHERE id = ?2",
            params![kill_cap, monster_id],
        )?;
        if affected == 0 {
            return Err(RepositoryError::NotFound {
                entity: "Monster".to_string(),
                id: monster_id.to_string(),
            });
        }
        Ok(())
    }

    /// 记录击杀 (原子 upsert: 存在则累加,否则初始化)
    ///
    /// # 返回
    /// - Ok(total): 累加后的击杀数
    pub fn record_kills(&self, monster_id: i64, kills: i64) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        let total = conn.query_row(
            r#"
            INSERT INTO kills (monster_id, kills) VALUES (?1, ?2)
            ON CONFLICT(monster_id) DO UPDATE SET kills = kills + excluded.kills
            RETURNING kills
            "#,
            params![monster_id, kills],
            |row| row.get(0),
        )?;
        Ok(total)
    }

    /// 按 id 查询怪物 (含地点)
    pub fn find_by_id(&self, monster_id: i64) -> RepositoryResult<Option<Monster>> {
        let conn = self.get_conn()?;
        let monster = conn
            .query_row(
                r#"
                SELECT m.id, m.name, m.kill_cap, COALESCE(k.kills, 0), m.added_at
                FROM monsters m
                LEFT JOIN kills k ON m.id = k.monster_id
                WHERE m.id = ?1
                "#,
                params![monster_id],
                map_monster_row,
            )
            .optional()?;

        match monster {
            Some(mut m) => {
                m.locations = load_locations(&conn, &[m.id])?
                    .remove(&m.id)
                    .unwrap_or_default();
                Ok(Some(m))
            }
            None => Ok(None),
        }
    }

    /// 查询任务关联的全部怪物 (含击杀数与地点)
    pub fn find_by_task(&self, task_id: i64) -> RepositoryResult<Vec<Monster>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT m.id, m.name, m.kill_cap, COALESCE(k.kills, 0), m.added_at
            FROM task_monsters tm
            JOIN monsters m ON tm.monster_id = m.id
            LEFT JOIN kills k ON m.id = k.monster_id
            WHERE tm.task_id = ?1
            ORDER BY m.name ASC
            "#,
        )?;
        let mut monsters = stmt
            .query_map(params![task_id], map_monster_row)?
            .collect::<SqliteResult<Vec<_>>>()?;

        let ids: Vec<i64> = monsters.iter().map(|m| m.id).collect();
        let mut locations = load_locations(&conn, &ids)?;
        for monster in &mut monsters {
            monster.locations = locations.remove(&monster.id).unwrap_or_default();
        }
        Ok(monsters)
    }

    /// 怪物列表 (按名称排序,含所属任务)
    pub fn list_summaries(&self) -> RepositoryResult<Vec<MonsterSummary>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT m.id, m.name, m.kill_cap, COALESCE(k.kills, 0), m.added_at
            FROM monsters m
            LEFT JOIN kills k ON m.id = k.monster_id
            ORDER BY m.name ASC
            "#,
        )?;
        let monsters = stmt
            .query_map([], map_monster_row)?
            .collect::<SqliteResult<Vec<_>>>()?;

        let mut task_stmt = conn.prepare(
            r#"
            SELECT tm.monster_id, t.id, t.name
            FROM task_monsters tm
            JOIN tasks t ON tm.task_id = t.id
            ORDER BY t.name ASC
            "#,
        )?;
        let mut tasks_by_monster: HashMap<i64, Vec<TaskRef>> = HashMap::new();
        let task_rows = task_stmt.query_map([], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                TaskRef {
                    id: row.get(1)?,
                    name: row.get(2)?,
                },
            ))
        })?;
        for row in task_rows {
            let (monster_id, task) = row?;
            tasks_by_monster.entry(monster_id).or_default().push(task);
        }

        let ids: Vec<i64> = monsters.iter().map(|m| m.id).collect();
        let mut locations = load_locations(&conn, &ids)?;

        Ok(monsters
            .into_iter()
            .map(|m| MonsterSummary {
                id: m.id,
                remaining: remaining_kills(m.kill_cap, m.kill_count),
                tasks: tasks_by_monster.remove(&m.id).unwrap_or_default(),
                locations: locations.remove(&m.id).unwrap_or_default(),
                name: m.name,
                kill_cap: m.kill_cap,
                kill_count: m.kill_count,
            })
            .collect())
    }
}

fn map_monster_row(row: &rusqlite::Row<'_>) -> SqliteResult<Monster> {
    Ok(Monster {
        id: row.get(0)?,
        name: row.get(1)?,
        kill_cap: row.get(2)?,
        kill_count: row.get(3)?,
        locations: Vec::new(),
        added_at: row.get::<_, Option<DateTime<Utc>>>(4)?,
    })
}

/// 新增或复用地点,返回地点 id
fn upsert_location(tx: &Transaction<'_>, location: &Location) -> RepositoryResult<i64> {
    tx.execute(
        "INSERT OR IGNORE INTO locations (name, is_wilderness) VALUES (?1, ?2)",
        params![location.name, location.is_wilderness],
    )?;
    let id = tx.query_row(
        "SELECT id FROM locations WHERE name = ?1",
        params![location.name],
        |row| row.get(0),
    )?;
    Ok(id)
}

/// 批量加载怪物地点: monster_id → 地点列表
fn load_locations(
    conn: &Connection,
    monster_ids: &[i64],
) -> RepositoryResult<HashMap<i64, Vec<Location>>> {
    let mut result: HashMap<i64, Vec<Location>> = HashMap::new();
    if monster_ids.is_empty() {
        return Ok(result);
    }

    let mut stmt = conn.prepare(
        r#"
        SELECT ml.monster_id, l.name, l.is_wilderness
        FROM monster_locations ml
        JOIN locations l ON ml.location_id = l.id
        WHERE ml.monster_id = ?1
        ORDER BY l.name ASC
        "#,
    )?;

    for monster_id in monster_ids {
        let rows = stmt.query_map(params![monster_id], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                Location {
                    name: row.get(1)?,
                    is_wilderness: row.get(2)?,
                },
            ))
        })?;
        for row in rows {
            let (id, location) = row?;
            result.entry(id).or_default().push(location);
        }
    }

    Ok(result)
}
