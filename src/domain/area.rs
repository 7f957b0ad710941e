// ==========================================
// 救灾物资调度系统 - 受灾区域领域模型
// ==========================================
// 用途: 区域管理接口写入,引擎层只读
// 对齐: area 表
// ==========================================

use crate::domain::ResourceMap;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ==========================================
// Area - 受灾区域
// ==========================================
/// 受灾区域
///
/// 引擎只读取区域快照，绝不修改区域实体。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Area {
    // ===== 主键 =====
    pub area_id: String, // 区域唯一标识（不可变）

    // ===== 分配参数 =====
    pub urgency_level: i32,           // 紧急等级 [1,5]，越高越先服务
    pub required_resources: ResourceMap, // 所需物资（至少一项，数量 > 0）
    pub time_constraint_hours: i64,   // 可接受的最长行车时间（小时，> 0）

    // ===== 审计字段 =====
    pub created_at: DateTime<Utc>, // 记录创建时间
    pub updated_at: DateTime<Utc>, // 记录更新时间
}

impl Area {
    /// 构造新区域（审计字段取当前时间）
    pub fn new(
        area_id: impl Into<String>,
        urgency_level: i32,
        required_resources: ResourceMap,
        time_constraint_hours: i64,
    ) -> Self {
        let now = Utc::now();
        Self {
            area_id: area_id.into(),
            urgency_level,
            required_resources,
            time_constraint_hours,
            created_at: now,
            updated_at: now,
        }
    }
}
