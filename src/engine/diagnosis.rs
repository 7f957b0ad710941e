// ==========================================
// 救灾物资调度系统 - 未分配原因判定
// ==========================================
// 职责: 对匹配失败的区域，基于当前车队状态给出唯一诊断原因
// 红线: 优先级为固定契约，按序评估、先命中先赢,
//       禁止用嵌套条件重新推导顺序
// ==========================================
// 输入: 区域 + 当前车队（已反映本次运行中先前的扣减）
// 输出: UnassignedReason
// ==========================================

use crate::domain::{Area, Truck, UnassignedReason};

// ==========================================
// DiagnosisClassifier - 未分配原因判定器
// ==========================================
pub struct DiagnosisClassifier {
    // 无状态引擎,不需要注入依赖
}

impl DiagnosisClassifier {
    /// 构造函数
    pub fn new() -> Self {
        Self {}
    }

    /// 判定未分配原因
    ///
    /// 诊断基于传入时刻的车队库存（即本次运行已发生的扣减会影响诊断），
    /// 这与"稀缺性在同一趟运行内顺序传播"的语义一致。
    ///
    /// # 参数
    /// - `area`: 匹配失败的区域
    /// - `trucks`: 当前车队工作副本
    ///
    /// # 返回
    /// 按固定优先级命中的第一条原因
    pub fn classify(&self, area: &Area, trucks: &[Truck]) -> UnassignedReason {
        // 该区域在所有车辆的行车时间表中都不存在
        let has_no_travel_info = trucks
            .iter()
            .all(|t| !t.travel_time_to_area.contains_key(&area.area_id));

        // 至少一种所需物资种类在所有车辆上都未装载
        let missing_resource_type = area.required_resources.keys().any(|name| {
            !trucks
                .iter()
                .any(|t| t.available_resources.contains_key(name))
        });

        // 没有车辆能在时限内到达
        let time_issue = !trucks
            .iter()
            .any(|t| t.can_reach_in_time(&area.area_id, area.time_constraint_hours));

        // 没有车辆能同时满足全部物资数量
        let resource_issue = !trucks.iter().any(|t| t.can_supply(&area.required_resources));

        // 固定顺序的规则表，先命中先赢
        let rules = [
            (has_no_travel_info, UnassignedReason::NoTravelInfo),
            (missing_resource_type, UnassignedReason::MissingResourceType),
            (time_issue && resource_issue, UnassignedReason::TimeAndResource),
            (time_issue, UnassignedReason::TimeIssue),
            (resource_issue, UnassignedReason::ResourceIssue),
        ];

        rules
            .iter()
            .find(|(hit, _)| *hit)
            .map(|(_, reason)| *reason)
            .unwrap_or(UnassignedReason::Unallocatable)
    }
}

impl Default for DiagnosisClassifier {
    fn default() -> Self {
        Self::new()
    }
}
