// ==========================================
// Slayer 任务追踪系统 - 任务 API
// ==========================================

use std::sync::Arc;

use crate::api::error::{ApiError, ApiResult};
use crate::domain::{NewAssignmentRule, Task, UnlockCatalog};
use crate::repository::TaskRepository;

/// 新任务的默认 Slayer 要求
pub const DEFAULT_TASK_SLAYER_REQUIREMENT: i32 = 1;

pub struct TaskApi {
    task_repo: Arc<TaskRepository>,
}

impl TaskApi {
    pub fn new(task_repo: Arc<TaskRepository>) -> Self {
        Self { task_repo }
    }

    pub fn list_tasks(&self) -> ApiResult<Vec<Task>> {
        Ok(self.task_repo.list_tasks()?)
    }

    /// 新增任务 (同名已存在时返回已有 id)
    pub fn add_task(&self, name: &str, slayer_requirement: Option<i32>) -> ApiResult<i64> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ApiError::InvalidInput("任务名称不能为空".to_string()));
        }
        let requirement = slayer_requirement.unwrap_or(DEFAULT_TASK_SLAYER_REQUIREMENT);
        if !(1..=99).contains(&requirement) {
            return Err(ApiError::InvalidInput(format!(
                "Slayer 要求超出范围 1-99: {}",
                requirement
            )));
        }
        Ok(self.task_repo.add_task(name, requirement)?)
    }

    /// 新增分配规则
    ///
    /// # 校验
    /// - weight >= 0
    /// - 0 < min_amount <= max_amount
    pub fn add_assignment(&self, rule: &NewAssignmentRule) -> ApiResult<bool> {
        if !rule.weight.is_finite() || rule.weight < 0.0 {
            return Err(ApiError::InvalidInput(format!("权重必须为非负数: {}", rule.weight)));
        }
        if rule.min_amount <= 0 || rule.min_amount > rule.max_amount {
            return Err(ApiError::InvalidInput(format!(
                "任务数量范围无效: {}-{}",
                rule.min_amount, rule.max_amount
            )));
        }
        Ok(self.task_repo.add_assignment(rule)?)
    }

    /// 全部可选的任务解锁与 Slayer 解锁
    pub fn list_unlocks(&self) -> ApiResult<UnlockCatalog> {
        Ok(self.task_repo.list_unlocks()?)
    }
}
