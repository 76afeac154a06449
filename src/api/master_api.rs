// ==========================================
// Slayer 任务追踪系统 - 导师 API
// ==========================================
// 职责: 导师列表 + 效率、导师任务视图、任务屏蔽
// ==========================================

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::api::error::{ApiError, ApiResult};
use crate::config::ConfigManager;
use crate::domain::SlayerMaster;
use crate::engine::{EfficiencySummary, MasterEvaluationService, TaskView};
use crate::repository::{BlockedTaskRepository, SlayerMasterRepository, TaskRepository};

/// 导师 + 效率汇总
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MasterWithEfficiency {
    #[serde(flatten)]
    pub master: SlayerMaster,
    pub efficiency: EfficiencySummary,
}

pub struct MasterApi {
    evaluation: Arc<MasterEvaluationService<ConfigManager>>,
    master_repo: Arc<SlayerMasterRepository>,
    task_repo: Arc<TaskRepository>,
    blocked_repo: Arc<BlockedTaskRepository>,
}

impl MasterApi {
    pub fn new(
        evaluation: Arc<MasterEvaluationService<ConfigManager>>,
        master_repo: Arc<SlayerMasterRepository>,
        task_repo: Arc<TaskRepository>,
        blocked_repo: Arc<BlockedTaskRepository>,
    ) -> Self {
        Self {
            evaluation,
            master_repo,
            task_repo,
            blocked_repo,
        }
    }

    /// 全部导师及其效率 (按战斗要求排序)
    pub fn list_masters_with_efficiency(&self) -> ApiResult<Vec<MasterWithEfficiency>> {
        let evaluated = self.evaluation.evaluate_all()?;
        Ok(evaluated
            .into_iter()
            .map(|(master, efficiency)| MasterWithEfficiency { master, efficiency })
            .collect())
    }

    /// 单个导师的效率 (导师不存在 → 全零汇总,不是错误)
    pub fn get_master_efficiency(&self, master_id: i64) -> ApiResult<EfficiencySummary> {
        Ok(self.evaluation.evaluate_master(master_id)?.summary)
    }

    /// 导师的任务视图列表
    pub fn get_master_tasks(&self, master_id: i64) -> ApiResult<Vec<TaskView>> {
        Ok(self.evaluation.evaluate_master(master_id)?.tasks)
    }

    /// 屏蔽任务
    ///
    /// # 返回
    /// - Ok(true): 新屏蔽
    /// - Ok(false): 已处于屏蔽状态
    pub fn block_task(&self, master_id: i64, task_id: i64) -> ApiResult<bool> {
        self.ensure_master_and_task(master_id, task_id)?;
        let blocked = self.blocked_repo.block(master_id, task_id)?;
        info!(master_id, task_id, newly_blocked = blocked, "屏蔽任务");
        Ok(blocked)
    }

    /// 取消屏蔽 (幂等)
    pub fn unblock_task(&self, master_id: i64, task_id: i64) -> ApiResult<bool> {
        self.ensure_master_and_task(master_id, task_id)?;
        self.blocked_repo.unblock(master_id, task_id)?;
        info!(master_id, task_id, "取消屏蔽任务");
        Ok(true)
    }

    fn ensure_master_and_task(&self, master_id: i64, task_id: i64) -> ApiResult<()> {
        if master_id <= 0 || task_id <= 0 {
            return Err(ApiError::InvalidInput(format!(
                "无效的导师或任务ID: master_id={}, task_id={}",
                master_id, task_id
            )));
        }
        if self.master_repo.find_by_id(master_id)?.is_none() {
            return Err(ApiError::NotFound(format!("导师(id={})不存在", master_id)));
        }
        if self.task_repo.find_task(task_id)?.is_none() {
            return Err(ApiError::NotFound(format!("任务(id={})不存在", task_id)));
        }
        Ok(())
    }
}
