// ==========================================
// 救灾物资调度系统 - 运输车辆领域模型
// ==========================================
// 用途: 车辆管理接口写入,引擎层在"工作副本"上扣减
// 对齐: truck 表
// ==========================================

use crate::domain::{ResourceMap, TravelTimeMap};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ==========================================
// Truck - 运输车辆
// ==========================================
/// 运输车辆
///
/// 一次分配运行内，引擎只在 `working_copy` 产生的副本上扣减库存，
/// 调用方持有的原始快照不会被修改，也不会泄漏到下一次运行。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Truck {
    // ===== 主键 =====
    pub truck_id: String, // 车辆唯一标识（不可变）

    // ===== 分配参数 =====
    pub available_resources: ResourceMap, // 车载物资（数量 ≥ 0）
    pub travel_time_to_area: TravelTimeMap, // area_id → 行车时间（小时）

    // ===== 审计字段 =====
    pub created_at: DateTime<Utc>, // 记录创建时间
    pub updated_at: DateTime<Utc>, // 记录更新时间
}

impl Truck {
    /// 构造新车辆（审计字段取当前时间）
    pub fn new(
        truck_id: impl Into<String>,
        available_resources: ResourceMap,
        travel_time_to_area: TravelTimeMap,
    ) -> Self {
        let now = Utc::now();
        Self {
            truck_id: truck_id.into(),
            available_resources,
            travel_time_to_area,
            created_at: now,
            updated_at: now,
        }
    }

    /// 生成本次运行的工作副本
    ///
    /// BTreeMap 按值克隆，副本与原快照完全独立。
    pub fn working_copy(&self) -> Truck {
        self.clone()
    }

    /// 是否有通往指定区域、且满足时限的路线
    pub fn can_reach_in_time(&self, area_id: &str, time_constraint_hours: i64) -> bool {
        self.travel_time_to_area
            .get(area_id)
            .map(|t| *t <= time_constraint_hours)
            .unwrap_or(false)
    }

    /// 是否能同时满足全部所需物资的数量
    pub fn can_supply(&self, required: &ResourceMap) -> bool {
        required.iter().all(|(name, qty)| {
            self.available_resources
                .get(name)
                .map(|available| available >= qty)
                .unwrap_or(false)
        })
    }

    /// 按需求扣减车载物资
    ///
    /// 前置条件: `can_supply(required)` 已验证为 true，
    /// 扣减后数量可以为零但不会为负。
    pub fn deduct(&mut self, required: &ResourceMap) {
        for (name, qty) in required {
            if let Some(available) = self.available_resources.get_mut(name) {
                *available -= qty;
            }
        }
    }
}
