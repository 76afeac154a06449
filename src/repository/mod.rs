// ==========================================
// Slayer 任务追踪系统 - 数据仓储层
// ==========================================
// 红线: Repository 不含业务逻辑
// 职责: 提供数据访问接口,屏蔽数据库细节
// 约束: 所有查询使用参数化
// ==========================================

pub mod blocked_task_repo;
pub mod error;
pub mod master_repo;
pub mod monster_repo;
pub mod player_repo;
pub mod task_repo;

// 重导出核心仓储
pub use blocked_task_repo::BlockedTaskRepository;
pub use error::{RepositoryError, RepositoryResult};
pub use master_repo::SlayerMasterRepository;
pub use monster_repo::{MonsterRepository, NewMonster};
pub use player_repo::{player_keys, PlayerProfileRepository, ProfileDefaults};
pub use task_repo::TaskRepository;
