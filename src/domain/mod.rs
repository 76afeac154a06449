// ==========================================
// Slayer 任务追踪系统 - 领域模型层
// ==========================================
// 职责: 定义领域实体、类型
// 红线: 不含数据访问逻辑,不含引擎逻辑
// ==========================================

pub mod master;
pub mod monster;
pub mod player;
pub mod task;
pub mod types;

// 重导出核心类型
pub use master::SlayerMaster;
pub use monster::{Location, Monster, MonsterSummary, TaskRef};
pub use player::{PlayerProfile, DEFAULT_COMBAT_LEVEL, DEFAULT_SLAYER_LEVEL};
pub use task::{AssignmentRule, BlockedTask, NewAssignmentRule, Task, UnlockCatalog};
pub use types::{remaining_kills, LocationRestriction, UNLIMITED_KILL_CAP, WILDERNESS_MARKER};
