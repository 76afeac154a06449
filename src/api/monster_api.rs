// ==========================================
// Slayer 任务追踪系统 - 怪物 API
// ==========================================
// 职责: 怪物录入、击杀上限修改、击杀记录
// ==========================================

use std::sync::Arc;

use tracing::info;

use crate::api::error::{ApiError, ApiResult};
use crate::domain::{Location, MonsterSummary, UNLIMITED_KILL_CAP};
use crate::repository::{MonsterRepository, NewMonster};

pub struct MonsterApi {
    monster_repo: Arc<MonsterRepository>,
}

impl MonsterApi {
    pub fn new(monster_repo: Arc<MonsterRepository>) -> Self {
        Self { monster_repo }
    }

    /// 怪物列表 (按名称排序)
    pub fn list_monsters(&self) -> ApiResult<Vec<MonsterSummary>> {
        Ok(self.monster_repo.list_summaries()?)
    }

    /// 新增怪物
    ///
    /// # 参数
    /// - kill_cap: None 表示无上限 (-1)
    /// - task_ids: 至少一个
    pub fn add_monster(
        &self,
        name: &str,
        kill_cap: Option<i64>,
        task_ids: Vec<i64>,
        locations: Vec<Location>,
    ) -> ApiResult<i64> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ApiError::InvalidInput("怪物名称不能为空".to_string()));
        }
        if task_ids.is_empty() {
            return Err(ApiError::InvalidInput("至少需要选择一个任务".to_string()));
        }
        let kill_cap = kill_cap.unwrap_or(UNLIMITED_KILL_CAP);
        validate_kill_cap(kill_cap)?;

        let monster_id = self.monster_repo.add_monster(&NewMonster {
            name: name.to_string(),
            kill_cap,
            task_ids,
            locations,
        })?;
        info!(monster_id, name, kill_cap, "新增怪物");
        Ok(monster_id)
    }

    /// 修改击杀上限
    pub fn update_kill_cap(&self, monster_id: i64, kill_cap: i64) -> ApiResult<()> {
        validate_kill_cap(kill_cap)?;
        self.monster_repo.update_kill_cap(monster_id, kill_cap)?;
        info!(monster_id, kill_cap, "击杀上限已更新");
        Ok(())
    }

    /// 记录击杀
    ///
    /// # 返回
    /// - Ok(total): 累加后的击杀数
    pub fn record_kills(&self, monster_id: i64, kills: i64) -> ApiResult<i64> {
        if kills <= 0 {
            return Err(ApiError::InvalidInput(format!("无效的击杀数: {}", kills)));
        }
        if self.monster_repo.find_by_id(monster_id)?.is_none() {
            return Err(ApiError::NotFound(format!("怪物(id={})不存在", monster_id)));
        }

        let total = self.monster_repo.record_kills(monster_id, kills)?;
        info!(monster_id, kills, total, "击杀已记录");
        Ok(total)
    }
}

fn validate_kill_cap(kill_cap: i64) -> ApiResult<()> {
    if kill_cap == UNLIMITED_KILL_CAP || kill_cap >= 0 {
        Ok(())
    } else {
        Err(ApiError::InvalidInput(format!(
            "击杀上限必须为 -1 (无上限) 或非负数: {}",
            kill_cap
        )))
    }
}
