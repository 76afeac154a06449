// ==========================================
// Slayer 任务追踪系统 - 引擎配置读取 Trait
// ==========================================
// 职责: 定义评估引擎所需的配置读取接口（不包含实现）
// 红线: 不包含配置写入、不包含业务逻辑
// ==========================================

use crate::engine::efficiency::EfficiencyPolicy;
use crate::repository::ProfileDefaults;
use std::error::Error;

// ==========================================
// EngineConfigReader Trait
// ==========================================
// 实现者: ConfigManager（从 config_kv 表读取）
pub trait EngineConfigReader: Send + Sync {
    /// 跳过一个无法完成任务的点数成本
    ///
    /// # 默认值
    /// - 30.0
    fn get_skip_cost_points(&self) -> Result<f64, Box<dyn Error>>;

    /// 玩家档案缺失时的默认战斗等级
    ///
    /// # 默认值
    /// - 3
    fn get_default_combat_level(&self) -> Result<i32, Box<dyn Error>>;

    /// 玩家档案缺失时的默认 Slayer 等级
    ///
    /// # 默认值
    /// - 1
    fn get_default_slayer_level(&self) -> Result<i32, Box<dyn Error>>;

    /// 组装评分策略
    fn efficiency_policy(&self) -> Result<EfficiencyPolicy, Box<dyn Error>> {
        Ok(EfficiencyPolicy {
            skip_cost_points: self.get_skip_cost_points()?,
        })
    }

    /// 组装玩家档案默认值
    fn profile_defaults(&self) -> Result<ProfileDefaults, Box<dyn Error>> {
        Ok(ProfileDefaults {
            combat_level: self.get_default_combat_level()?,
            slayer_level: self.get_default_slayer_level()?,
        })
    }
}
