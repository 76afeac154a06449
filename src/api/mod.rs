// ==========================================
// Slayer 任务追踪系统 - API 层
// ==========================================
// 职责: 提供业务 API 接口 (不含 HTTP)
// ==========================================

pub mod error;
pub mod master_api;
pub mod monster_api;
pub mod player_api;
pub mod task_api;

// 重导出核心类型
pub use error::{ApiError, ApiResult};
pub use master_api::{MasterApi, MasterWithEfficiency};
pub use monster_api::MonsterApi;
pub use player_api::PlayerApi;
pub use task_api::TaskApi;
