// ==========================================
// 救灾物资调度系统 - 领域模型层
// ==========================================
// 职责: 定义领域实体、类型、业务规则接口
// 红线: 不含数据访问逻辑,不含引擎逻辑
// ==========================================

pub mod area;
pub mod assignment;
pub mod truck;

// 重导出核心类型
pub use area::Area;
pub use assignment::{AllocationOutcome, AreaResult, Assignment, UnassignedReason};
pub use truck::Truck;

use std::collections::BTreeMap;

/// 资源映射: 物资名称 → 数量
///
/// 使用 BTreeMap 保证序列化顺序稳定（同输入同输出）
pub type ResourceMap = BTreeMap<String, i64>;

/// 行车时间映射: area_id → 行车时间（小时）
///
/// 缺失键表示"没有已知路线"
pub type TravelTimeMap = BTreeMap<String, i64>;
